//! Weather view renderer.
//!
//! Pure projection from a [`ForecastSnapshot`] onto display structs. Every
//! render replaces its section wholesale; nothing is patched in place.
//! `Display` impls turn the structs into terminal text.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use skyglance_weather::format::{
    capitalize, fmt_day, fmt_local_time, fmt_temp, fmt_time, title_case,
};
use skyglance_weather::{ForecastSnapshot, HourlyReading, PlaceCandidate, Units, WeatherCondition};

use crate::autocomplete::AutocompleteController;

const PLACEHOLDER: &str = "—";
const FALLBACK_ICON: &str = "01d";
const UNKNOWN_PLACE: &str = "Selected location";
const NO_HOURLY_DATA: &str = "No hourly data available.";
const YESTERDAY_NOTE: &str =
    "Yesterday is approximated from the first 24 forecast hours; no historical data is used.";

/// Which day the hourly panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DayKey {
    Yesterday,
    #[default]
    Today,
    Tomorrow,
}

impl DayKey {
    pub const ALL: [DayKey; 3] = [DayKey::Yesterday, DayKey::Today, DayKey::Tomorrow];

    /// Hourly indices shown for this day. Yesterday reuses today's window.
    pub fn hourly_range(self) -> Range<usize> {
        match self {
            DayKey::Yesterday | DayKey::Today => 0..24,
            DayKey::Tomorrow => 24..48,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayKey::Yesterday => "Yesterday (last 24h)",
            DayKey::Today => "Today",
            DayKey::Tomorrow => "Tomorrow",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            DayKey::Yesterday => "Hourly — Yesterday (last 24h)",
            DayKey::Today => "Hourly — Today",
            DayKey::Tomorrow => "Hourly — Tomorrow",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            DayKey::Yesterday => "Approximation using last 24 hours (free-friendly)",
            DayKey::Today => "Next 24 hours",
            DayKey::Tomorrow => "Forecast hours 24–48",
        }
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yesterday" => Ok(DayKey::Yesterday),
            "today" => Ok(DayKey::Today),
            "tomorrow" => Ok(DayKey::Tomorrow),
            other => Err(format!("unknown day: {other}")),
        }
    }
}

/// Settings that shape rendering but not data
#[derive(Debug, Clone)]
pub struct ViewOptions {
    pub units: Units,
    pub icon_base_url: String,
}

impl ViewOptions {
    fn icon_url(&self, condition: Option<&WeatherCondition>, large: bool) -> String {
        let code = condition
            .map(|c| c.icon.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(FALLBACK_ICON);
        let base = self.icon_base_url.trim_end_matches('/');
        if large {
            format!("{base}/{code}@2x.png")
        } else {
            format!("{base}/{code}.png")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NowView {
    pub place: String,
    pub description: String,
    /// "Updated: HH:MM" in the viewer's timezone
    pub updated: String,
    pub meta_line: String,
    pub temperature: String,
    pub icon_url: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayRow {
    pub key: DayKey,
    pub label: &'static str,
    pub min: String,
    pub max: String,
    pub icon_url: String,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyCard {
    pub time: String,
    pub temperature: String,
    pub icon_url: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HourlyContent {
    Cards(Vec<HourlyCard>),
    /// Explicit placeholder shown instead of an empty grid
    NoData(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyPanel {
    pub heading: &'static str,
    pub subtitle: &'static str,
    pub content: HourlyContent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub now: NowView,
    pub days: Vec<DayRow>,
    pub yesterday_note: &'static str,
    pub hourly: HourlyPanel,
    pub selected: DayKey,
}

impl WeatherView {
    /// Re-render only the hourly panel and move the active row marker.
    pub fn select_day(&mut self, snapshot: &ForecastSnapshot, day: DayKey, opts: &ViewOptions) {
        self.hourly = render_hourly(snapshot, day, opts);
        for row in &mut self.days {
            row.active = row.key == day;
        }
        self.selected = day;
    }
}

/// Render everything for a freshly fetched snapshot.
pub fn render(
    snapshot: &ForecastSnapshot,
    place: Option<&PlaceCandidate>,
    day: DayKey,
    opts: &ViewOptions,
) -> WeatherView {
    WeatherView {
        now: render_now(snapshot, place, opts),
        days: render_days(snapshot, day, opts),
        yesterday_note: YESTERDAY_NOTE,
        hourly: render_hourly(snapshot, day, opts),
        selected: day,
    }
}

pub fn render_now(
    snapshot: &ForecastSnapshot,
    place: Option<&PlaceCandidate>,
    opts: &ViewOptions,
) -> NowView {
    let tz = snapshot.timezone_id.as_str();
    let c = &snapshot.current;

    let description = c
        .condition
        .as_ref()
        .map(|w| w.description.as_str())
        .filter(|d| !d.is_empty())
        .map(capitalize)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    NowView {
        place: place
            .map(PlaceCandidate::label)
            .unwrap_or_else(|| UNKNOWN_PLACE.to_string()),
        description,
        updated: format!("Updated: {}", fmt_local_time(c.observed_at)),
        meta_line: format!(
            "{} • {} • Lat {:.2}, Lon {:.2}",
            fmt_day(c.observed_at, tz),
            fmt_time(c.observed_at, tz),
            snapshot.latitude,
            snapshot.longitude
        ),
        temperature: fmt_temp(c.temperature),
        icon_url: opts.icon_url(c.condition.as_ref(), true),
        feels_like: fmt_temp(c.feels_like),
        humidity: format!("{}%", c.humidity),
        wind: format!("{} {}", c.wind_speed, opts.units.wind_unit()),
        pressure: format!("{} hPa", c.pressure),
    }
}

fn fmt_bound(value: Option<f64>) -> String {
    value.map(fmt_temp).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn condition_text(condition: Option<&WeatherCondition>) -> String {
    condition
        .map(|c| c.description.as_str())
        .filter(|d| !d.is_empty())
        .map(title_case)
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Minimum and maximum temperature over `hours`, if any
fn min_max(hours: &[HourlyReading]) -> (Option<f64>, Option<f64>) {
    hours.iter().fold((None, None), |(lo, hi), h| {
        let t = h.temperature;
        (
            Some(lo.map_or(t, |l: f64| l.min(t))),
            Some(hi.map_or(t, |m: f64| m.max(t))),
        )
    })
}

/// The three-row day table. Yesterday is derived from the first 24 hourly
/// readings; today and tomorrow come from the daily summaries.
pub fn render_days(snapshot: &ForecastSnapshot, selected: DayKey, opts: &ViewOptions) -> Vec<DayRow> {
    DayKey::ALL
        .iter()
        .map(|&key| {
            let (min, max, condition) = match key {
                DayKey::Yesterday => {
                    let last24 = snapshot.hourly_window(DayKey::Yesterday.hourly_range());
                    let (min, max) = min_max(last24);
                    (min, max, last24.first().and_then(|h| h.condition.as_ref()))
                }
                DayKey::Today => {
                    let d = snapshot.today();
                    (
                        d.and_then(|d| d.min),
                        d.and_then(|d| d.max),
                        d.and_then(|d| d.condition.as_ref()),
                    )
                }
                DayKey::Tomorrow => {
                    let d = snapshot.tomorrow();
                    (
                        d.and_then(|d| d.min),
                        d.and_then(|d| d.max),
                        d.and_then(|d| d.condition.as_ref()),
                    )
                }
            };

            DayRow {
                key,
                label: key.label(),
                min: fmt_bound(min),
                max: fmt_bound(max),
                icon_url: opts.icon_url(condition, false),
                description: condition_text(condition),
                active: key == selected,
            }
        })
        .collect()
}

pub fn render_hourly(snapshot: &ForecastSnapshot, day: DayKey, opts: &ViewOptions) -> HourlyPanel {
    let hours = snapshot.hourly_window(day.hourly_range());
    let tz = snapshot.timezone_id.as_str();

    let content = if hours.is_empty() {
        HourlyContent::NoData(NO_HOURLY_DATA)
    } else {
        HourlyContent::Cards(
            hours
                .iter()
                .map(|h| HourlyCard {
                    time: fmt_time(h.timestamp, tz),
                    temperature: fmt_temp(h.temperature),
                    icon_url: opts.icon_url(h.condition.as_ref(), false),
                    description: h
                        .condition
                        .as_ref()
                        .map(|c| title_case(&c.description))
                        .unwrap_or_default(),
                })
                .collect(),
        )
    };

    HourlyPanel {
        heading: day.heading(),
        subtitle: day.subtitle(),
        content,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionRow {
    pub name: String,
    pub subtitle: String,
    /// "lat, lon" to two decimals
    pub coordinates: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionList {
    pub rows: Vec<SuggestionRow>,
}

/// The open suggestion list, or `None` when it is closed.
pub fn render_suggestions(controller: &AutocompleteController) -> Option<SuggestionList> {
    if !controller.is_open() {
        return None;
    }
    let active = controller.active_index();
    let rows = controller
        .suggestions()
        .iter()
        .enumerate()
        .map(|(i, p)| SuggestionRow {
            name: p.name.clone(),
            subtitle: p.subtitle(),
            coordinates: format!("{:.2}, {:.2}", p.latitude, p.longitude),
            active: active == Some(i),
        })
        .collect();
    Some(SuggestionList { rows })
}

impl fmt::Display for SuggestionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            let marker = if row.active { '>' } else { ' ' };
            write!(f, "{marker} {i}. {}", row.name)?;
            if !row.subtitle.is_empty() {
                write!(f, " ({})", row.subtitle)?;
            }
            writeln!(f, "  [{}]", row.coordinates)?;
        }
        Ok(())
    }
}

impl fmt::Display for WeatherView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = &self.now;
        writeln!(f, "{}  ({})", n.place, n.updated)?;
        writeln!(f, "{}", n.meta_line)?;
        writeln!(f, "{}  {}", n.temperature, n.description)?;
        writeln!(
            f,
            "Feels like {} | Humidity {} | Wind {} | Pressure {}",
            n.feels_like, n.humidity, n.wind, n.pressure
        )?;
        writeln!(f)?;

        for row in &self.days {
            let marker = if row.active { '*' } else { ' ' };
            writeln!(
                f,
                "{marker} {:<22} {:>5} {:>5}  {}",
                row.label, row.min, row.max, row.description
            )?;
        }
        writeln!(f, "  {}", self.yesterday_note)?;
        writeln!(f)?;

        writeln!(f, "{}", self.hourly.heading)?;
        writeln!(f, "{}", self.hourly.subtitle)?;
        match &self.hourly.content {
            HourlyContent::NoData(msg) => writeln!(f, "  {msg}")?,
            HourlyContent::Cards(cards) => {
                for card in cards {
                    writeln!(f, "  {}  {:>4}  {}", card.time, card.temperature, card.description)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyglance_weather::{CurrentReading, DailySummary};

    fn opts() -> ViewOptions {
        ViewOptions {
            units: Units::Metric,
            icon_base_url: "https://openweathermap.org/img/wn".to_string(),
        }
    }

    fn condition(description: &str, icon: &str) -> Option<WeatherCondition> {
        Some(WeatherCondition {
            description: description.to_string(),
            icon: icon.to_string(),
        })
    }

    fn snapshot(hours: usize) -> ForecastSnapshot {
        ForecastSnapshot {
            timezone_id: "UTC".to_string(),
            latitude: 48.8534,
            longitude: 2.3488,
            current: CurrentReading {
                observed_at: 1_705_320_000,
                temperature: 9.5,
                feels_like: 7.2,
                humidity: 76,
                wind_speed: 3.6,
                pressure: 1021.0,
                condition: condition("broken clouds", "04d"),
            },
            daily: vec![
                DailySummary {
                    min: Some(5.0),
                    max: Some(12.0),
                    condition: condition("light rain", "10d"),
                },
                DailySummary {
                    min: Some(7.0),
                    max: Some(14.0),
                    condition: condition("clear sky", "01d"),
                },
            ],
            hourly: (0..hours)
                .map(|i| HourlyReading {
                    timestamp: 1_705_320_000 + i as i64 * 3600,
                    temperature: i as f64,
                    condition: condition("few clouds", "02d"),
                })
                .collect(),
        }
    }

    fn paris() -> PlaceCandidate {
        PlaceCandidate {
            name: "Paris".to_string(),
            region: String::new(),
            country: "FR".to_string(),
            latitude: 48.85,
            longitude: 2.35,
        }
    }

    fn cards(panel: &HourlyPanel) -> &[HourlyCard] {
        match &panel.content {
            HourlyContent::Cards(cards) => cards,
            HourlyContent::NoData(_) => &[],
        }
    }

    fn row(view: &WeatherView, key: DayKey) -> &DayRow {
        view.days.iter().find(|r| r.key == key).unwrap()
    }

    #[test]
    fn day_table_today_and_tomorrow_from_daily() {
        let view = render(&snapshot(48), None, DayKey::Today, &opts());
        let today = row(&view, DayKey::Today);
        assert_eq!((today.min.as_str(), today.max.as_str()), ("5°", "12°"));
        let tomorrow = row(&view, DayKey::Tomorrow);
        assert_eq!((tomorrow.min.as_str(), tomorrow.max.as_str()), ("7°", "14°"));
        assert_eq!(tomorrow.description, "Clear Sky");
    }

    #[test]
    fn yesterday_row_uses_first_24_hours() {
        let view = render(&snapshot(48), None, DayKey::Today, &opts());
        let yesterday = row(&view, DayKey::Yesterday);
        assert_eq!(yesterday.min, "0°");
        assert_eq!(yesterday.max, "23°");
        assert_eq!(yesterday.description, "Few Clouds");
    }

    #[test]
    fn missing_values_render_placeholder() {
        let mut snap = snapshot(0);
        snap.daily.truncate(1);
        snap.daily[0].max = None;
        let view = render(&snap, None, DayKey::Today, &opts());

        assert_eq!(row(&view, DayKey::Yesterday).min, "—");
        assert_eq!(row(&view, DayKey::Today).max, "—");
        assert_eq!(row(&view, DayKey::Tomorrow).min, "—");
        assert_eq!(row(&view, DayKey::Tomorrow).description, "—");
        assert!(row(&view, DayKey::Tomorrow).icon_url.ends_with("/01d.png"));
    }

    #[test]
    fn hourly_windows_per_day() {
        let snap = snapshot(48);
        for (day, first_temp) in [
            (DayKey::Yesterday, "0°"),
            (DayKey::Today, "0°"),
            (DayKey::Tomorrow, "24°"),
        ] {
            let panel = render_hourly(&snap, day, &opts());
            let cards = cards(&panel);
            assert_eq!(cards.len(), 24, "{day:?}");
            assert_eq!(cards[0].temperature, first_temp);
        }
    }

    #[test]
    fn hourly_headings_and_subtitles_per_day() {
        let snap = snapshot(48);
        for (day, heading, subtitle) in [
            (
                DayKey::Yesterday,
                "Hourly — Yesterday (last 24h)",
                "Approximation using last 24 hours (free-friendly)",
            ),
            (DayKey::Today, "Hourly — Today", "Next 24 hours"),
            (DayKey::Tomorrow, "Hourly — Tomorrow", "Forecast hours 24–48"),
        ] {
            let panel = render_hourly(&snap, day, &opts());
            assert_eq!(panel.heading, heading);
            assert_eq!(panel.subtitle, subtitle);
        }
    }

    #[test]
    fn hourly_card_descriptions_capitalise_each_word() {
        let panel = render_hourly(&snapshot(24), DayKey::Today, &opts());
        assert_eq!(cards(&panel)[0].description, "Few Clouds");
    }

    #[test]
    fn empty_hourly_renders_no_data_for_every_day() {
        let snap = snapshot(0);
        for day in DayKey::ALL {
            let panel = render_hourly(&snap, day, &opts());
            assert_eq!(panel.content, HourlyContent::NoData(NO_HOURLY_DATA));
        }
    }

    #[test]
    fn tomorrow_without_second_day_of_hours_is_no_data() {
        let panel = render_hourly(&snapshot(20), DayKey::Tomorrow, &opts());
        assert!(matches!(panel.content, HourlyContent::NoData(_)));
    }

    #[test]
    fn now_block_fields() {
        let now = render_now(&snapshot(1), Some(&paris()), &opts());
        assert_eq!(now.place, "Paris, FR");
        assert_eq!(now.description, "Broken clouds");
        assert_eq!(now.temperature, "10°");
        assert_eq!(now.feels_like, "7°");
        assert_eq!(now.humidity, "76%");
        assert_eq!(now.wind, "3.6 m/s");
        assert_eq!(now.pressure, "1021 hPa");
        assert_eq!(now.icon_url, "https://openweathermap.org/img/wn/04d@2x.png");
        assert_eq!(now.meta_line, "Mon, Jan 15 • 12:00 • Lat 48.85, Lon 2.35");
        assert!(now.updated.starts_with("Updated: "));
    }

    #[test]
    fn now_block_without_place_metadata() {
        let mut o = opts();
        o.units = Units::Imperial;
        let now = render_now(&snapshot(1), None, &o);
        assert_eq!(now.place, "Selected location");
        assert_eq!(now.wind, "3.6 mph");
    }

    #[test]
    fn select_day_only_touches_hourly_and_markers() {
        let snap = snapshot(48);
        let mut view = render(&snap, Some(&paris()), DayKey::Today, &opts());
        let now_before = view.now.clone();
        assert!(row(&view, DayKey::Today).active);

        view.select_day(&snap, DayKey::Tomorrow, &opts());
        assert_eq!(view.selected, DayKey::Tomorrow);
        assert_eq!(view.hourly.heading, "Hourly — Tomorrow");
        assert!(row(&view, DayKey::Tomorrow).active);
        assert!(!row(&view, DayKey::Today).active);
        assert_eq!(view.now, now_before);
    }

    #[test]
    fn day_key_parsing() {
        assert_eq!("Tomorrow".parse::<DayKey>(), Ok(DayKey::Tomorrow));
        assert!("next week".parse::<DayKey>().is_err());
        assert_eq!(DayKey::Tomorrow.hourly_range(), 24..48);
        assert_eq!(DayKey::Yesterday.hourly_range(), 0..24);
    }

    #[test]
    fn suggestions_render_active_marker() {
        let mut ac = AutocompleteController::new(2, false);
        assert!(render_suggestions(&ac).is_none());

        let req = ac.on_debounce_elapsed("par").unwrap();
        ac.on_suggestions(&req, Ok(vec![paris()]));
        ac.on_key(crate::autocomplete::Key::ArrowDown);

        let list = render_suggestions(&ac).unwrap();
        assert_eq!(list.rows.len(), 1);
        assert!(list.rows[0].active);
        assert_eq!(list.rows[0].subtitle, "FR");
        assert_eq!(list.rows[0].coordinates, "48.85, 2.35");
    }

    #[test]
    fn display_includes_sections() {
        let view = render(&snapshot(0), Some(&paris()), DayKey::Today, &opts());
        let text = view.to_string();
        assert!(text.contains("Paris, FR"));
        assert!(text.contains("Hourly — Today"));
        assert!(text.contains(NO_HOURLY_DATA));
    }
}
