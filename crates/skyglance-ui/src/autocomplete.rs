//! Autocomplete state machine.
//!
//! Pure state: the controller never performs I/O. The widget feeds it timer
//! elapses, lookup results and key presses, and acts on what it returns
//! (a [`SuggestRequest`] to issue, or a committed [`PlaceCandidate`]).

use skyglance_weather::{PlaceCandidate, WeatherError};

/// Where the suggestion list currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutocompleteState {
    /// No list shown, nothing scheduled
    #[default]
    Idle,
    /// Waiting on the debounce timer or an in-flight lookup
    Pending,
    /// A non-empty list is shown
    Open,
}

/// Keys handled while the list is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
}

/// A lookup the controller wants issued.
///
/// Comes back alongside the result so late responses can be recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestRequest {
    /// Trimmed query text
    pub query: String,
    /// Monotonic request token
    pub id: u64,
    /// Commit epoch at the time of the request
    pub epoch: u64,
}

#[derive(Debug)]
pub struct AutocompleteController {
    state: AutocompleteState,
    suggestions: Vec<PlaceCandidate>,
    /// -1 means nothing highlighted
    active_index: isize,
    min_query_len: usize,
    discard_stale: bool,
    latest_request: u64,
    commit_epoch: u64,
}

impl AutocompleteController {
    pub fn new(min_query_len: usize, discard_stale: bool) -> Self {
        Self {
            state: AutocompleteState::Idle,
            suggestions: Vec::new(),
            active_index: -1,
            min_query_len,
            discard_stale,
            latest_request: 0,
            commit_epoch: 0,
        }
    }

    pub fn state(&self) -> AutocompleteState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == AutocompleteState::Open
    }

    pub fn suggestions(&self) -> &[PlaceCandidate] {
        &self.suggestions
    }

    /// Highlighted row, if any
    pub fn active_index(&self) -> Option<usize> {
        usize::try_from(self.active_index).ok()
    }

    /// Number of selections committed so far
    pub fn commit_epoch(&self) -> u64 {
        self.commit_epoch
    }

    /// Text changed; the debounce timer is being (re)started.
    pub fn on_input(&mut self) {
        if self.state == AutocompleteState::Idle {
            self.state = AutocompleteState::Pending;
        }
    }

    /// Debounce timer fired with the field's current text.
    ///
    /// Returns the lookup to issue, or `None` when the text is too short, in
    /// which case the list is closed.
    pub fn on_debounce_elapsed(&mut self, input: &str) -> Option<SuggestRequest> {
        let query = input.trim();
        if query.chars().count() < self.min_query_len {
            self.close();
            return None;
        }

        if self.state != AutocompleteState::Open {
            self.state = AutocompleteState::Pending;
        }
        self.latest_request += 1;

        Some(SuggestRequest {
            query: query.to_string(),
            id: self.latest_request,
            epoch: self.commit_epoch,
        })
    }

    /// A lookup finished. Failures close the list without surfacing an error.
    pub fn on_suggestions(
        &mut self,
        request: &SuggestRequest,
        result: Result<Vec<PlaceCandidate>, WeatherError>,
    ) {
        if request.epoch != self.commit_epoch {
            tracing::debug!("Dropping suggestions for {:?}: selection committed since", request.query);
            return;
        }
        if self.discard_stale && request.id != self.latest_request {
            tracing::debug!("Dropping stale suggestions for {:?}", request.query);
            return;
        }

        match result {
            Ok(places) if !places.is_empty() => {
                self.suggestions = places;
                self.active_index = -1;
                self.state = AutocompleteState::Open;
            }
            Ok(_) => self.close(),
            Err(e) => {
                tracing::debug!("Suggestion lookup for {:?} failed: {}", request.query, e);
                self.close();
            }
        }
    }

    /// Keyboard input. Returns the candidate when Enter commits one.
    pub fn on_key(&mut self, key: Key) -> Option<PlaceCandidate> {
        if !self.is_open() || self.suggestions.is_empty() {
            return None;
        }

        let count = self.suggestions.len() as isize;
        match key {
            Key::ArrowDown => {
                self.active_index = (self.active_index + 1).rem_euclid(count);
                None
            }
            Key::ArrowUp => {
                self.active_index = (self.active_index - 1 + count).rem_euclid(count);
                None
            }
            Key::Enter => self.active_index().and_then(|i| self.commit(i)),
            Key::Escape => {
                self.close();
                None
            }
        }
    }

    /// Pointer pressed on row `index`. Commits before any focus-loss close.
    pub fn on_pointer_down(&mut self, index: usize) -> Option<PlaceCandidate> {
        if !self.is_open() {
            return None;
        }
        self.commit(index)
    }

    /// Focus-loss grace delay elapsed.
    pub fn on_blur_elapsed(&mut self) {
        self.close();
    }

    fn commit(&mut self, index: usize) -> Option<PlaceCandidate> {
        let chosen = self.suggestions.get(index).cloned()?;
        self.close();
        self.commit_epoch += 1;
        tracing::debug!("Committed suggestion {}", chosen.label());
        Some(chosen)
    }

    pub fn close(&mut self) {
        self.suggestions.clear();
        self.active_index = -1;
        self.state = AutocompleteState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str) -> PlaceCandidate {
        PlaceCandidate {
            name: name.to_string(),
            region: String::new(),
            country: "FR".to_string(),
            latitude: 1.0,
            longitude: 2.0,
        }
    }

    fn open_with(names: &[&str]) -> AutocompleteController {
        let mut ac = AutocompleteController::new(2, false);
        ac.on_input();
        let req = ac.on_debounce_elapsed("pa").unwrap();
        ac.on_suggestions(&req, Ok(names.iter().map(|n| place(n)).collect()));
        ac
    }

    #[test]
    fn short_query_closes_without_request() {
        let mut ac = open_with(&["Paris"]);
        assert!(ac.on_debounce_elapsed(" p ").is_none());
        assert_eq!(ac.state(), AutocompleteState::Idle);
        assert!(ac.suggestions().is_empty());
    }

    #[test]
    fn query_is_trimmed() {
        let mut ac = AutocompleteController::new(2, false);
        let req = ac.on_debounce_elapsed("  Paris  ").unwrap();
        assert_eq!(req.query, "Paris");
        assert_eq!(ac.state(), AutocompleteState::Pending);
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let mut ac = AutocompleteController::new(2, false);
        assert!(ac.on_debounce_elapsed("é").is_none());
        assert!(ac.on_debounce_elapsed("éa").is_some());
    }

    #[test]
    fn results_open_with_nothing_highlighted() {
        let ac = open_with(&["Paris", "Parma"]);
        assert!(ac.is_open());
        assert_eq!(ac.active_index(), None);
        assert_eq!(ac.suggestions().len(), 2);
    }

    #[test]
    fn empty_results_go_idle() {
        let mut ac = AutocompleteController::new(2, false);
        let req = ac.on_debounce_elapsed("zz").unwrap();
        ac.on_suggestions(&req, Ok(vec![]));
        assert_eq!(ac.state(), AutocompleteState::Idle);
    }

    #[test]
    fn failure_goes_idle() {
        let mut ac = open_with(&["Paris"]);
        let req = ac.on_debounce_elapsed("par").unwrap();
        ac.on_suggestions(&req, Err(WeatherError::Parse("bad".into())));
        assert_eq!(ac.state(), AutocompleteState::Idle);
        assert!(ac.suggestions().is_empty());
    }

    #[test]
    fn arrow_down_wraps() {
        let mut ac = open_with(&["A1", "A2", "A3"]);
        for expected in [0, 1, 2, 0] {
            ac.on_key(Key::ArrowDown);
            assert_eq!(ac.active_index(), Some(expected));
        }
    }

    #[test]
    fn arrow_up_wraps() {
        let mut ac = open_with(&["A1", "A2", "A3"]);
        ac.on_key(Key::ArrowDown);
        assert_eq!(ac.active_index(), Some(0));
        ac.on_key(Key::ArrowUp);
        assert_eq!(ac.active_index(), Some(2));
    }

    #[test]
    fn arrow_up_from_nothing_follows_modular_step() {
        let mut ac = open_with(&["A1", "A2", "A3"]);
        ac.on_key(Key::ArrowUp);
        assert_eq!(ac.active_index(), Some(1));

        let mut single = open_with(&["A1"]);
        single.on_key(Key::ArrowUp);
        assert_eq!(single.active_index(), Some(0));
    }

    #[test]
    fn keys_ignored_when_closed() {
        let mut ac = AutocompleteController::new(2, false);
        assert!(ac.on_key(Key::ArrowDown).is_none());
        assert!(ac.on_key(Key::Enter).is_none());
        assert_eq!(ac.active_index(), None);
    }

    #[test]
    fn enter_without_highlight_does_nothing() {
        let mut ac = open_with(&["Paris"]);
        assert!(ac.on_key(Key::Enter).is_none());
        assert!(ac.is_open());
    }

    #[test]
    fn enter_commits_highlighted() {
        let mut ac = open_with(&["Paris", "Parma"]);
        ac.on_key(Key::ArrowDown);
        ac.on_key(Key::ArrowDown);
        let chosen = ac.on_key(Key::Enter).unwrap();
        assert_eq!(chosen.name, "Parma");
        assert_eq!(ac.state(), AutocompleteState::Idle);
        assert_eq!(ac.commit_epoch(), 1);
    }

    #[test]
    fn escape_closes() {
        let mut ac = open_with(&["Paris"]);
        ac.on_key(Key::Escape);
        assert_eq!(ac.state(), AutocompleteState::Idle);
        assert_eq!(ac.commit_epoch(), 0);
    }

    #[test]
    fn pointer_down_commits_clicked_row() {
        let mut ac = open_with(&["Paris", "Parma"]);
        let chosen = ac.on_pointer_down(1).unwrap();
        assert_eq!(chosen.name, "Parma");
        assert!(!ac.is_open());
    }

    #[test]
    fn pointer_down_out_of_range_is_ignored() {
        let mut ac = open_with(&["Paris"]);
        assert!(ac.on_pointer_down(5).is_none());
        assert!(ac.is_open());
    }

    #[test]
    fn blur_closes_unconditionally() {
        let mut ac = open_with(&["Paris"]);
        ac.on_key(Key::ArrowDown);
        ac.on_blur_elapsed();
        assert_eq!(ac.state(), AutocompleteState::Idle);
        assert_eq!(ac.active_index(), None);
    }

    #[test]
    fn late_response_after_commit_is_dropped() {
        let mut ac = open_with(&["Paris"]);
        let late = ac.on_debounce_elapsed("pari").unwrap();
        ac.on_key(Key::ArrowDown);
        ac.on_key(Key::Enter).unwrap();

        ac.on_suggestions(&late, Ok(vec![place("Paris")]));
        assert_eq!(ac.state(), AutocompleteState::Idle);
    }

    #[test]
    fn stale_response_accepted_by_default() {
        let mut ac = AutocompleteController::new(2, false);
        let first = ac.on_debounce_elapsed("pa").unwrap();
        let second = ac.on_debounce_elapsed("par").unwrap();

        ac.on_suggestions(&second, Ok(vec![place("Parma")]));
        ac.on_suggestions(&first, Ok(vec![place("Pamplona")]));
        assert_eq!(ac.suggestions()[0].name, "Pamplona");
    }

    #[test]
    fn stale_response_dropped_when_guarded() {
        let mut ac = AutocompleteController::new(2, true);
        let first = ac.on_debounce_elapsed("pa").unwrap();
        let second = ac.on_debounce_elapsed("par").unwrap();

        ac.on_suggestions(&second, Ok(vec![place("Parma")]));
        ac.on_suggestions(&first, Ok(vec![place("Pamplona")]));
        assert_eq!(ac.suggestions()[0].name, "Parma");
    }

    #[test]
    fn request_ids_increase() {
        let mut ac = AutocompleteController::new(2, false);
        let a = ac.on_debounce_elapsed("pa").unwrap();
        let b = ac.on_debounce_elapsed("pa").unwrap();
        assert!(b.id > a.id);
    }
}
