//! Interactive weather lookup widget for Skyglance
//!
//! Debounced city autocomplete, forecast orchestration and a text renderer,
//! driven by [`UiEvent`]s and the widget's own message channel.

pub mod autocomplete;
pub mod debounce;
mod error_mapping;
pub mod services;
pub mod view;
pub mod widget;

pub use autocomplete::{AutocompleteController, AutocompleteState, Key, SuggestRequest};
pub use view::{DayKey, SuggestionList, ViewOptions, WeatherView};
pub use widget::{UiEvent, WeatherWidget, WidgetMessage, WidgetSettings};
