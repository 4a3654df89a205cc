//! Debounced search and autocomplete resolution.
//!
//! A query resolves through three tiers: the instant local filter over the
//! rendered catalog, a remote catalog search, and - only on explicit user
//! action when the remote search comes back empty - the AI-generation
//! fallback. The controller owns the debounce deadline and the
//! autocomplete panel state.
//!
//! Every remote call carries a monotonically increasing token. Responses
//! for any token other than the current one are stale and must be
//! discarded; the transport itself is never cancelled.

use std::time::{Duration, Instant};

/// Quiescence window before a keystroke triggers a remote search.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// A remote operation the runtime should start on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCommand {
    /// Catalog-only search (generation disabled).
    RemoteSearch { query: String, token: u64 },
    /// AI-generation fallback (generation enabled).
    Generate { query: String, token: u64 },
    /// Resolve a single record by exact name.
    Fetch { name: String, token: u64 },
}

/// One autocomplete row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub plant_type: String,
    /// Already present in the catalog, or pending addition.
    pub in_catalog: bool,
}

/// Autocomplete panel content.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Hidden,
    /// Remote results, each selectable.
    Suggestions(Vec<Suggestion>),
    /// Remote search found nothing: offer the generation fallback.
    /// Not an error - rendered as an affordance, not a banner.
    OfferGenerate,
    /// Generation or fetch-by-name in flight.
    Resolving,
}

/// What a confirmed suggestion asks the caller to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    /// Record exists in the catalog: toggle it selected, close the panel.
    ToggleExisting(String),
    /// Not yet materialized: fetch by name, then merge and select.
    FetchPending(SearchCommand),
}

#[derive(Debug, Default)]
pub struct SearchController {
    query: String,
    deadline: Option<Instant>,
    token: u64,
    in_flight: bool,
    panel: Panel,
    cursor: usize,
}

impl SearchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn panel(&self) -> &Panel {
        &self.panel
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Record a keystroke. A non-empty query (re-)arms the debounce
    /// deadline; an empty query returns the controller to idle, restoring
    /// full catalog visibility and invalidating any in-flight response.
    pub fn on_input(&mut self, query: &str, now: Instant) {
        self.query = query.to_string();
        if self.query.is_empty() {
            self.reset();
        } else {
            self.deadline = Some(now + DEBOUNCE);
        }
    }

    /// Back to idle. Bumps the token so a late response cannot repopulate
    /// the panel.
    pub fn reset(&mut self) {
        self.query.clear();
        self.deadline = None;
        self.panel = Panel::Hidden;
        self.cursor = 0;
        self.in_flight = false;
        self.token += 1;
    }

    /// Check the debounce deadline. If the input has been quiescent for the
    /// full window, fire exactly one remote search for the latest query.
    pub fn poll(&mut self, now: Instant) -> Option<SearchCommand> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;
        self.token += 1;
        self.in_flight = true;
        Some(SearchCommand::RemoteSearch {
            query: self.query.clone(),
            token: self.token,
        })
    }

    /// Apply remote search results. Returns false (and changes nothing)
    /// when the token identifies a superseded request.
    pub fn apply_results(&mut self, token: u64, suggestions: Vec<Suggestion>) -> bool {
        if token != self.token {
            return false;
        }
        self.in_flight = false;
        self.cursor = 0;
        self.panel = if suggestions.is_empty() {
            Panel::OfferGenerate
        } else {
            Panel::Suggestions(suggestions)
        };
        true
    }

    /// A remote tier failed. Stale failures are discarded like stale
    /// results; a current one just closes the panel (the caller surfaces
    /// the notification).
    pub fn apply_failure(&mut self, token: u64) -> bool {
        if token != self.token {
            return false;
        }
        self.in_flight = false;
        self.panel = Panel::Hidden;
        true
    }

    /// Explicit user action on the generate affordance.
    pub fn begin_generate(&mut self) -> Option<SearchCommand> {
        if self.panel != Panel::OfferGenerate {
            return None;
        }
        self.token += 1;
        self.in_flight = true;
        self.panel = Panel::Resolving;
        Some(SearchCommand::Generate {
            query: self.query.clone(),
            token: self.token,
        })
    }

    /// Generation (or fetch-by-name) finished, successfully or not. On
    /// success the caller has merged and selected the record; the panel
    /// closes and the query clears so the full grid shows the new entry.
    /// On failure the generate affordance comes back for a retry.
    pub fn finish_resolve(&mut self, token: u64, success: bool) -> bool {
        if token != self.token {
            return false;
        }
        self.in_flight = false;
        if success {
            self.reset();
        } else {
            self.panel = Panel::OfferGenerate;
        }
        true
    }

    pub fn move_cursor(&mut self, delta: i64) {
        if let Panel::Suggestions(items) = &self.panel {
            let len = items.len() as i64;
            if len > 0 {
                self.cursor = (self.cursor as i64 + delta).rem_euclid(len) as usize;
            }
        }
    }

    /// Confirm the row under the cursor.
    pub fn choose(&mut self) -> Option<Choice> {
        match &self.panel {
            Panel::Suggestions(items) => {
                let item = items.get(self.cursor)?.clone();
                if item.in_catalog {
                    self.reset();
                    Some(Choice::ToggleExisting(item.name))
                } else {
                    self.token += 1;
                    self.in_flight = true;
                    self.panel = Panel::Resolving;
                    Some(Choice::FetchPending(SearchCommand::Fetch {
                        name: item.name,
                        token: self.token,
                    }))
                }
            }
            Panel::OfferGenerate => self.begin_generate().map(Choice::FetchPending),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(name: &str, in_catalog: bool) -> Suggestion {
        Suggestion {
            name: name.to_string(),
            plant_type: "vegetable".to_string(),
            in_catalog,
        }
    }

    #[test]
    fn test_rapid_keystrokes_fire_one_remote_search() {
        let mut search = SearchController::new();
        let start = Instant::now();

        search.on_input("a", start);
        assert!(search.poll(start + Duration::from_millis(100)).is_none());
        search.on_input("ab", start + Duration::from_millis(100));
        assert!(search.poll(start + Duration::from_millis(200)).is_none());
        search.on_input("abc", start + Duration::from_millis(200));

        let fired = search.poll(start + Duration::from_millis(500));
        match fired {
            Some(SearchCommand::RemoteSearch { query, .. }) => assert_eq!(query, "abc"),
            other => panic!("expected one remote search, got {:?}", other),
        }
        // The deadline is consumed; nothing fires again.
        assert!(search.poll(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut search = SearchController::new();
        let start = Instant::now();

        search.on_input("tom", start);
        let first = search.poll(start + DEBOUNCE).unwrap();
        let SearchCommand::RemoteSearch { token: old, .. } = first else {
            panic!()
        };

        // A newer query supersedes the in-flight one.
        search.on_input("toma", start + Duration::from_millis(400));
        let second = search.poll(start + Duration::from_secs(1)).unwrap();
        let SearchCommand::RemoteSearch { token: new, .. } = second else {
            panic!()
        };

        assert!(!search.apply_results(old, vec![suggestion("Stale", true)]));
        assert_eq!(*search.panel(), Panel::Hidden);
        assert!(search.apply_results(new, vec![suggestion("Tomato", true)]));
        assert!(matches!(search.panel(), Panel::Suggestions(_)));
    }

    #[test]
    fn test_empty_results_offer_generation() {
        let mut search = SearchController::new();
        let start = Instant::now();
        search.on_input("dragonfruit", start);
        let SearchCommand::RemoteSearch { token, .. } = search.poll(start + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        assert!(search.apply_results(token, vec![]));
        assert_eq!(*search.panel(), Panel::OfferGenerate);

        let cmd = search.begin_generate().unwrap();
        match cmd {
            SearchCommand::Generate { query, .. } => assert_eq!(query, "dragonfruit"),
            other => panic!("expected generate, got {:?}", other),
        }
        assert_eq!(*search.panel(), Panel::Resolving);
    }

    #[test]
    fn test_generation_is_explicit_not_automatic() {
        let mut search = SearchController::new();
        // No empty-result state: generation cannot start.
        assert!(search.begin_generate().is_none());
    }

    #[test]
    fn test_clearing_query_returns_to_idle_and_invalidates() {
        let mut search = SearchController::new();
        let start = Instant::now();
        search.on_input("kale", start);
        let SearchCommand::RemoteSearch { token, .. } = search.poll(start + DEBOUNCE).unwrap()
        else {
            panic!()
        };

        search.on_input("", start + Duration::from_secs(1));
        assert_eq!(*search.panel(), Panel::Hidden);
        assert_eq!(search.query(), "");
        // The in-flight response is now stale.
        assert!(!search.apply_results(token, vec![suggestion("Kale", true)]));
    }

    #[test]
    fn test_choose_existing_toggles_and_closes() {
        let mut search = SearchController::new();
        let start = Instant::now();
        search.on_input("b", start);
        let SearchCommand::RemoteSearch { token, .. } = search.poll(start + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        search.apply_results(
            token,
            vec![suggestion("Basil", true), suggestion("Borage", false)],
        );

        assert_eq!(search.choose(), Some(Choice::ToggleExisting("Basil".into())));
        assert_eq!(*search.panel(), Panel::Hidden);
    }

    #[test]
    fn test_choose_pending_fetches_by_name() {
        let mut search = SearchController::new();
        let start = Instant::now();
        search.on_input("bo", start);
        let SearchCommand::RemoteSearch { token, .. } = search.poll(start + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        search.apply_results(
            token,
            vec![suggestion("Basil", true), suggestion("Borage", false)],
        );
        search.move_cursor(1);

        match search.choose() {
            Some(Choice::FetchPending(SearchCommand::Fetch { name, .. })) => {
                assert_eq!(name, "Borage")
            }
            other => panic!("expected fetch, got {:?}", other),
        }
        assert_eq!(*search.panel(), Panel::Resolving);
    }

    #[test]
    fn test_failed_generation_restores_affordance() {
        let mut search = SearchController::new();
        let start = Instant::now();
        search.on_input("yuzu", start);
        let SearchCommand::RemoteSearch { token, .. } = search.poll(start + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        search.apply_results(token, vec![]);
        let SearchCommand::Generate { token, .. } = search.begin_generate().unwrap() else {
            panic!()
        };

        assert!(search.finish_resolve(token, false));
        assert_eq!(*search.panel(), Panel::OfferGenerate);

        // Success closes everything down.
        let SearchCommand::Generate { token, .. } = search.begin_generate().unwrap() else {
            panic!()
        };
        assert!(search.finish_resolve(token, true));
        assert_eq!(*search.panel(), Panel::Hidden);
        assert_eq!(search.query(), "");
    }
}
