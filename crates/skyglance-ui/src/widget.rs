//! The weather lookup widget.
//!
//! Owns the autocomplete controller, the displayed snapshot and the error
//! banner. UI triggers come in through [`WeatherWidget::handle_event`];
//! timer elapses and finished lookups come back through
//! [`WeatherWidget::next_message`] and [`WeatherWidget::handle_message`].
//! Those two methods are the only places state changes.

use std::sync::Arc;
use std::time::Duration;

use skyglance_core::{AppError, Config};
use skyglance_weather::{
    Coordinates, ForecastSnapshot, ForecastSource, Geocoder, LocationSource, PlaceCandidate,
    Units,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::autocomplete::{AutocompleteController, Key};
use crate::debounce::Debouncer;
use crate::services::{
    request_city, request_forecast, request_position, request_suggestions, LookupError,
    LookupOrigin, WeatherServiceMessage,
};
use crate::view::{self, DayKey, SuggestionList, ViewOptions, WeatherView};

/// UI-originated triggers
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Seed the field with the default city and look it up
    Startup,
    /// The text field now holds this text
    InputChanged(String),
    Key(Key),
    /// Pointer pressed on a suggestion row
    PointerDown(usize),
    /// The text field lost focus
    Blur,
    SearchClicked,
    GeolocateClicked,
    DaySelected(DayKey),
}

/// Everything delivered back to the widget from spawned tasks
#[derive(Debug)]
pub enum WidgetMessage {
    DebounceElapsed(u64),
    BlurElapsed(u64),
    Service(WeatherServiceMessage),
}

impl From<WeatherServiceMessage> for WidgetMessage {
    fn from(msg: WeatherServiceMessage) -> Self {
        WidgetMessage::Service(msg)
    }
}

/// Timing and lookup settings, usually taken from [`Config`]
#[derive(Debug, Clone)]
pub struct WidgetSettings {
    pub debounce: Duration,
    pub blur_grace: Duration,
    pub min_query_len: usize,
    pub discard_stale_responses: bool,
    pub suggest_limit: u32,
    pub default_city: String,
    pub view: ViewOptions,
}

impl WidgetSettings {
    pub fn from_config(config: &Config) -> Self {
        let units = match config.weather.units {
            skyglance_core::Units::Metric => Units::Metric,
            skyglance_core::Units::Imperial => Units::Imperial,
        };
        Self {
            debounce: Duration::from_millis(config.autocomplete.debounce_ms),
            blur_grace: Duration::from_millis(config.autocomplete.blur_grace_ms),
            min_query_len: config.autocomplete.min_query_len,
            discard_stale_responses: config.autocomplete.discard_stale_responses,
            suggest_limit: config.weather.suggest_limit,
            default_city: config.weather.default_city.clone(),
            view: ViewOptions {
                units,
                icon_base_url: config.weather.icon_base_url.clone(),
            },
        }
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct WeatherWidget {
    settings: WidgetSettings,
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastSource>,
    locator: Arc<dyn LocationSource>,

    input: String,
    autocomplete: AutocompleteController,
    debounce: Debouncer,
    blur: Debouncer,

    snapshot: Option<ForecastSnapshot>,
    place: Option<PlaceCandidate>,
    selected_day: DayKey,
    view: Option<WeatherView>,
    error: Option<String>,

    tx: UnboundedSender<WidgetMessage>,
    rx: UnboundedReceiver<WidgetMessage>,
}

impl WeatherWidget {
    pub fn new(
        settings: WidgetSettings,
        geocoder: Arc<dyn Geocoder>,
        forecast: Arc<dyn ForecastSource>,
        locator: Arc<dyn LocationSource>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            autocomplete: AutocompleteController::new(
                settings.min_query_len,
                settings.discard_stale_responses,
            ),
            debounce: Debouncer::new(settings.debounce),
            blur: Debouncer::new(settings.blur_grace),
            settings,
            geocoder,
            forecast,
            locator,
            input: String::new(),
            snapshot: None,
            place: None,
            selected_day: DayKey::Today,
            view: None,
            error: None,
            tx,
            rx,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn autocomplete(&self) -> &AutocompleteController {
        &self.autocomplete
    }

    pub fn suggestions(&self) -> Option<SuggestionList> {
        view::render_suggestions(&self.autocomplete)
    }

    pub fn snapshot(&self) -> Option<&ForecastSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn place(&self) -> Option<&PlaceCandidate> {
        self.place.as_ref()
    }

    pub fn selected_day(&self) -> DayKey {
        self.selected_day
    }

    pub fn view(&self) -> Option<&WeatherView> {
        self.view.as_ref()
    }

    /// Current error banner text
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Wait for the next timer elapse or finished lookup.
    pub async fn next_message(&mut self) -> Option<WidgetMessage> {
        self.rx.recv().await
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::Startup => {
                self.input = self.settings.default_city.clone();
                self.lookup_city_text(LookupOrigin::Startup);
            }
            UiEvent::InputChanged(text) => {
                self.input = text;
                self.autocomplete.on_input();
                self.debounce
                    .schedule(&self.tx, WidgetMessage::DebounceElapsed);
            }
            UiEvent::Key(key) => {
                if let Some(chosen) = self.autocomplete.on_key(key) {
                    self.commit(chosen);
                }
            }
            UiEvent::PointerDown(index) => {
                if let Some(chosen) = self.autocomplete.on_pointer_down(index) {
                    self.commit(chosen);
                }
            }
            UiEvent::Blur => {
                self.blur.schedule(&self.tx, WidgetMessage::BlurElapsed);
            }
            UiEvent::SearchClicked => {
                self.error = None;
                self.lookup_city_text(LookupOrigin::Search);
            }
            UiEvent::GeolocateClicked => {
                self.error = None;
                request_position(&self.tx, Arc::clone(&self.locator));
            }
            UiEvent::DaySelected(day) => self.select_day(day),
        }
    }

    pub fn handle_message(&mut self, msg: WidgetMessage) {
        match msg {
            WidgetMessage::DebounceElapsed(ticket) => {
                if !self.debounce.accept(ticket) {
                    return;
                }
                self.error = None;
                if let Some(request) = self.autocomplete.on_debounce_elapsed(&self.input) {
                    request_suggestions(
                        &self.tx,
                        Arc::clone(&self.geocoder),
                        request,
                        self.settings.suggest_limit,
                    );
                }
            }
            WidgetMessage::BlurElapsed(ticket) => {
                if self.blur.accept(ticket) {
                    self.autocomplete.on_blur_elapsed();
                }
            }
            WidgetMessage::Service(msg) => self.handle_service_message(msg),
        }
    }

    fn handle_service_message(&mut self, msg: WeatherServiceMessage) {
        match msg {
            WeatherServiceMessage::SuggestionsDone { request, result } => {
                self.autocomplete.on_suggestions(&request, result);
            }
            WeatherServiceMessage::CityResolved { origin, result } => match result {
                Ok(place) => self.fetch_forecast(place.coordinates(), Some(place), origin),
                Err(e) => self.fail(origin, e),
            },
            WeatherServiceMessage::PositionDone(result) => match result {
                Ok(coords) => self.fetch_forecast(coords, None, LookupOrigin::Geolocation),
                Err(e) => self.fail(LookupOrigin::Geolocation, e),
            },
            WeatherServiceMessage::ForecastDone {
                origin,
                place,
                result,
            } => match result {
                Ok(snapshot) => self.show(snapshot, place),
                Err(e) => self.fail(origin, e),
            },
        }
    }

    fn lookup_city_text(&mut self, origin: LookupOrigin) {
        let query = self.input.trim().to_string();
        if query.is_empty() {
            self.fail(origin, LookupError::EmptyQuery);
            return;
        }
        request_city(&self.tx, Arc::clone(&self.geocoder), query, origin);
    }

    fn commit(&mut self, chosen: PlaceCandidate) {
        self.debounce.cancel();
        self.input = chosen.label();
        self.fetch_forecast(chosen.coordinates(), Some(chosen), LookupOrigin::Suggestion);
    }

    fn fetch_forecast(
        &mut self,
        coords: Coordinates,
        place: Option<PlaceCandidate>,
        origin: LookupOrigin,
    ) {
        self.error = None;
        request_forecast(&self.tx, Arc::clone(&self.forecast), coords, place, origin);
    }

    /// Replace the displayed snapshot wholesale and reset to today.
    fn show(&mut self, snapshot: ForecastSnapshot, place: Option<PlaceCandidate>) {
        self.selected_day = DayKey::Today;
        self.view = Some(view::render(
            &snapshot,
            place.as_ref(),
            self.selected_day,
            &self.settings.view,
        ));
        self.snapshot = Some(snapshot);
        self.place = place;
        self.error = None;
    }

    fn select_day(&mut self, day: DayKey) {
        self.selected_day = day;
        if let (Some(snapshot), Some(view)) = (&self.snapshot, &mut self.view) {
            view.select_day(snapshot, day, &self.settings.view);
        }
    }

    fn fail(&mut self, origin: LookupOrigin, e: LookupError) {
        let app_error = AppError::from(e);
        if origin == LookupOrigin::Startup {
            tracing::warn!("Startup lookup failed: {}", app_error);
            return;
        }
        tracing::warn!("{:?} lookup failed: {}", origin, app_error);
        self.error = Some(app_error.user_message());
    }
}
