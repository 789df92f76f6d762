use std::sync::Arc;

use anyhow::{Context, Result};
use skyglance_core::Config;
use skyglance_ui::{
    DayKey, Key, SuggestionList, UiEvent, WeatherView, WeatherWidget, WidgetMessage,
    WidgetSettings,
};
use skyglance_weather::{
    Coordinates, FixedLocation, LocationSource, NoLocation, OpenWeatherGeocoder, WeatherProvider,
};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Type a city to get suggestions. Commands:
  /search          look up the typed city
  /geo             use the configured home location
  /up /down        move through suggestions
  /enter /esc      pick or dismiss the highlighted suggestion
  /pick N          pick suggestion N
  /blur            leave the text field
  /day KEY         show yesterday, today or tomorrow
  /quit            exit";

/// Map one line of terminal input onto a widget event.
fn parse_command(line: &str) -> Option<UiEvent> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(command) = line.strip_prefix('/') else {
        return Some(UiEvent::InputChanged(line.to_string()));
    };

    let (name, arg) = command
        .split_once(' ')
        .map_or((command, ""), |(n, a)| (n, a.trim()));
    match name {
        "search" => Some(UiEvent::SearchClicked),
        "geo" => Some(UiEvent::GeolocateClicked),
        "up" => Some(UiEvent::Key(Key::ArrowUp)),
        "down" => Some(UiEvent::Key(Key::ArrowDown)),
        "enter" => Some(UiEvent::Key(Key::Enter)),
        "esc" => Some(UiEvent::Key(Key::Escape)),
        "blur" => Some(UiEvent::Blur),
        "pick" => arg.parse().ok().map(UiEvent::PointerDown),
        "day" => arg.parse::<DayKey>().ok().map(UiEvent::DaySelected),
        _ => None,
    }
}

enum Step {
    Line(Option<String>),
    Message(Option<WidgetMessage>),
}

#[derive(Default, PartialEq)]
struct Screen {
    view: Option<WeatherView>,
    suggestions: Option<SuggestionList>,
    error: Option<String>,
}

impl Screen {
    fn capture(widget: &WeatherWidget) -> Self {
        Self {
            view: widget.view().cloned(),
            suggestions: widget.suggestions(),
            error: widget.error().map(str::to_string),
        }
    }

    fn print(&self, previous: &Screen) {
        if let Some(error) = &self.error {
            if previous.error.as_ref() != Some(error) {
                println!("! {error}");
            }
        }
        if self.view != previous.view {
            if let Some(view) = &self.view {
                println!("\n{view}");
            }
        }
        if self.suggestions != previous.suggestions {
            if let Some(list) = &self.suggestions {
                print!("{list}");
            }
        }
    }
}

fn build_widget(config: &Config) -> Result<WeatherWidget> {
    let settings = WidgetSettings::from_config(config);
    let weather = &config.weather;
    let timeout = weather.request_timeout();

    let geocoder = OpenWeatherGeocoder::new(&weather.geocode_url, &weather.api_key, timeout)
        .context("Failed to create geocoding client")?;
    let provider = WeatherProvider::new(
        &weather.forecast_url,
        &weather.api_key,
        settings.view.units,
        timeout,
    )
    .context("Failed to create forecast client")?;
    let locator: Arc<dyn LocationSource> = match weather.home_location {
        Some(home) => Arc::new(FixedLocation::new(Coordinates::new(
            home.latitude,
            home.longitude,
        ))),
        None => Arc::new(NoLocation),
    };

    Ok(WeatherWidget::new(
        settings,
        Arc::new(geocoder),
        Arc::new(provider),
        locator,
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    skyglance_core::init()?;

    let (config, _) = Config::load_validated()?;
    if !config.weather.is_configured() {
        tracing::warn!("No OpenWeather API key configured; lookups will fail");
    }

    let mut widget = build_widget(&config)?;
    tracing::info!("Skyglance started");
    println!("Skyglance weather\n{HELP}");

    let mut screen = Screen::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    widget.handle_event(UiEvent::Startup);

    loop {
        let step = tokio::select! {
            line = lines.next_line() => Step::Line(line.context("Failed to read input")?),
            msg = widget.next_message() => Step::Message(msg),
        };

        match step {
            Step::Line(None) | Step::Message(None) => break,
            Step::Line(Some(line)) if line.trim() == "/quit" => break,
            Step::Line(Some(line)) => match parse_command(&line) {
                Some(event) => widget.handle_event(event),
                None => println!("{HELP}"),
            },
            Step::Message(Some(msg)) => widget.handle_message(msg),
        }

        let next = Screen::capture(&widget);
        next.print(&screen);
        screen = next;
    }

    tracing::info!("Skyglance shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_input() {
        assert_eq!(
            parse_command("Paris\n"),
            Some(UiEvent::InputChanged("Paris".to_string()))
        );
    }

    #[test]
    fn commands_map_to_events() {
        assert_eq!(parse_command("/down"), Some(UiEvent::Key(Key::ArrowDown)));
        assert_eq!(parse_command("/pick 2"), Some(UiEvent::PointerDown(2)));
        assert_eq!(
            parse_command("/day tomorrow"),
            Some(UiEvent::DaySelected(DayKey::Tomorrow))
        );
        assert_eq!(parse_command("/day someday"), None);
        assert_eq!(parse_command("/bogus"), None);
    }
}
