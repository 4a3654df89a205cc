//! Session state and the plan-request orchestrator.
//!
//! One struct owns the catalog, the selection, the search controller, the
//! progress simulator and the notification queue - there is no free
//! module state. The orchestrator joins the progress state machine and
//! the request state machine only at the finalize/cancel transition; the
//! response handler never reaches into timer internals.

use crate::api::{CreatePlanRequest, GardenPlan, PlantListResponse};
use crate::catalog::{CatalogStore, PlantRecord};
use crate::notify::Notifications;
use crate::progress::ProgressSimulator;
use crate::search::{SearchController, Suggestion};
use crate::selection::SelectionSet;
use crate::util::truncate;
use std::fmt;
use std::time::{Duration, Instant};

/// Pause after finalize so the 100% state is visibly perceivable before
/// the results surface takes over.
const REVEAL_PAUSE: Duration = Duration::from_millis(600);

pub const SUBMIT_LABEL: &str = "Generate my garden plan";
pub const SUBMIT_LABEL_BUSY: &str = "Generating...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GardenSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl GardenSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            GardenSize::Small => "small",
            GardenSize::Medium => "medium",
            GardenSize::Large => "large",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            GardenSize::Small => GardenSize::Medium,
            GardenSize::Medium => GardenSize::Large,
            GardenSize::Large => GardenSize::Small,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "small" => Some(GardenSize::Small),
            "medium" => Some(GardenSize::Medium),
            "large" => Some(GardenSize::Large),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExperienceLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Beginner => "beginner",
            ExperienceLevel::Intermediate => "intermediate",
            ExperienceLevel::Advanced => "advanced",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ExperienceLevel::Beginner => ExperienceLevel::Intermediate,
            ExperienceLevel::Intermediate => ExperienceLevel::Advanced,
            ExperienceLevel::Advanced => ExperienceLevel::Beginner,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(ExperienceLevel::Beginner),
            "intermediate" => Some(ExperienceLevel::Intermediate),
            "advanced" => Some(ExperienceLevel::Advanced),
            _ => None,
        }
    }
}

/// Local validation failure: blocks submission before any network
/// activity or simulator start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    MissingLocation,
    EmptySelection,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::MissingLocation => {
                write!(f, "Enter a zip code first (press 'z' to set it)")
            }
            SubmitError::EmptySelection => {
                write!(f, "Select at least one plant before generating a plan")
            }
        }
    }
}

/// An accepted submission: the payload a background task should send,
/// tagged with the token its response must carry back.
#[derive(Debug)]
pub struct PlanSubmission {
    pub token: u64,
    pub request: CreatePlanRequest,
}

pub struct SessionState {
    pub catalog: CatalogStore,
    pub selection: SelectionSet,
    pub search: SearchController,
    pub progress: ProgressSimulator,
    pub notices: Notifications,

    pub zip_code: String,
    pub garden_size: GardenSize,
    pub experience: ExperienceLevel,

    pub submit_enabled: bool,
    pub submit_label: &'static str,

    pub plan: Option<GardenPlan>,
    plan_token: u64,
    plan_in_flight: bool,
    reveal_at: Option<Instant>,

    /// Superseded responses discarded this session, for the debug footer.
    pub stale_discards: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            catalog: CatalogStore::new(),
            selection: SelectionSet::new(),
            search: SearchController::new(),
            progress: ProgressSimulator::new(),
            notices: Notifications::new(),
            zip_code: String::new(),
            garden_size: GardenSize::default(),
            experience: ExperienceLevel::default(),
            submit_enabled: true,
            submit_label: SUBMIT_LABEL,
            plan: None,
            plan_token: 0,
            plan_in_flight: false,
            reveal_at: None,
            stale_discards: 0,
        }
    }

    pub fn plan_in_flight(&self) -> bool {
        self.plan_in_flight
    }

    // ── catalog bootstrap ────────────────────────────────────────────────

    pub fn on_catalog_loaded(&mut self, response: PlantListResponse) {
        let count = response.plants.len();
        self.catalog.load(response.plants);
        self.catalog.source = response.source;
        self.notices
            .info(&format!("{} plants loaded from the catalog", count));
    }

    /// Unreachable catalog source: proceed with an empty catalog and tell
    /// the user, rather than failing the session.
    pub fn on_catalog_failed(&mut self, error: &str) {
        self.catalog.load(Vec::new());
        self.notices.error(&format!(
            "Couldn't load the plant catalog: {}. Search can still find plants.",
            error
        ));
    }

    // ── search resolution ────────────────────────────────────────────────

    /// Remote catalog search came back. Tags each result against the
    /// current catalog so the panel can distinguish pending additions.
    pub fn on_search_results(&mut self, token: u64, plants: Vec<PlantRecord>) {
        let suggestions: Vec<Suggestion> = plants
            .into_iter()
            .map(|p| Suggestion {
                in_catalog: self.catalog.contains(&p.name),
                name: p.name,
                plant_type: p.plant_type,
            })
            .collect();
        if !self.search.apply_results(token, suggestions) {
            self.stale_discards += 1;
        }
    }

    pub fn on_search_failed(&mut self, token: u64, error: &str) {
        if self.search.apply_failure(token) {
            self.notices.error(&format!(
                "Search failed: {}. Try again in a moment.",
                truncate(error, 120)
            ));
        } else {
            self.stale_discards += 1;
        }
    }

    /// AI-generation fallback finished. On success the record is merged,
    /// tagged AI-sourced and auto-selected - a deliberate convenience
    /// default. Returns whether the catalog changed (grid rebuild).
    pub fn on_generated(&mut self, token: u64, query: &str, record: Option<PlantRecord>) -> bool {
        if !self.search.finish_resolve(token, record.is_some()) {
            self.stale_discards += 1;
            return false;
        }
        match record {
            Some(record) => {
                let name = record.name.clone();
                self.catalog.merge(record.ai_generated());
                self.select_if_unselected(&name);
                self.notices
                    .success(&format!("{} added to your garden (AI-sourced)", name));
                true
            }
            None => {
                self.notices.error(&format!(
                    "Couldn't generate a plant for \"{}\" - try a different name",
                    query
                ));
                false
            }
        }
    }

    /// Fetch-by-name for a pending-addition suggestion finished; same
    /// merge/select sequence as generation.
    pub fn on_item_fetched(&mut self, token: u64, name: &str, record: Option<PlantRecord>) -> bool {
        if !self.search.finish_resolve(token, record.is_some()) {
            self.stale_discards += 1;
            return false;
        }
        match record {
            Some(record) => {
                let name = record.name.clone();
                // Duplicate-name merge is a storage no-op but selection
                // state still updates.
                self.catalog.merge(record);
                self.select_if_unselected(&name);
                self.notices.success(&format!("{} added to your garden", name));
                true
            }
            None => {
                self.notices
                    .error(&format!("\"{}\" is no longer available", name));
                false
            }
        }
    }

    /// Confirm the autocomplete row under the cursor. An in-catalog
    /// suggestion is selected immediately; a pending-addition one hands
    /// back the fetch command for the runtime to start.
    pub fn confirm_suggestion(&mut self) -> Option<crate::search::SearchCommand> {
        match self.search.choose()? {
            crate::search::Choice::ToggleExisting(name) => {
                // Re-validate before reuse; the record can vanish on reload.
                if self.catalog.find(&name).is_some() {
                    self.select_if_unselected(&name);
                }
                None
            }
            crate::search::Choice::FetchPending(cmd) => Some(cmd),
        }
    }

    fn select_if_unselected(&mut self, name: &str) {
        if !self.selection.contains(name) {
            self.selection.toggle(name);
        }
    }

    // ── plan request orchestration ───────────────────────────────────────

    /// Validate the form and, if satisfied, disable the submit affordance,
    /// start the simulator and hand back the request payload. Violations
    /// surface a field-specific error and nothing else happens.
    pub fn submit(&mut self, now: Instant) -> Result<PlanSubmission, SubmitError> {
        if self.zip_code.trim().is_empty() {
            return Err(SubmitError::MissingLocation);
        }
        if self.selection.count() == 0 {
            return Err(SubmitError::EmptySelection);
        }

        self.submit_enabled = false;
        self.submit_label = SUBMIT_LABEL_BUSY;
        self.plan = None;
        self.reveal_at = None;
        self.plan_token += 1;
        self.plan_in_flight = true;
        self.progress.start(self.selection.count(), now);

        Ok(PlanSubmission {
            token: self.plan_token,
            request: CreatePlanRequest {
                zip_code: self.zip_code.trim().to_string(),
                selected_plants: self.selection.names(),
                garden_size: self.garden_size.as_str().to_string(),
                experience_level: self.experience.as_str().to_string(),
            },
        })
    }

    /// The real response arrived: finalize the simulator synchronously,
    /// then reveal the result after a short pause.
    pub fn on_plan_ready(&mut self, token: u64, plan: GardenPlan, now: Instant) {
        if !self.plan_in_flight || token != self.plan_token {
            self.stale_discards += 1;
            return;
        }
        self.plan_in_flight = false;
        self.progress.finalize();
        self.reveal_at = Some(now + REVEAL_PAUSE);
        let where_for = plan
            .location
            .city
            .clone()
            .unwrap_or_else(|| plan.location.zip_code.clone());
        self.notices
            .success(&format!("Garden plan ready for {}", where_for));
        self.plan = Some(plan);
        self.restore_submit();
    }

    /// Transport failure: stop (not finalize) the simulator, surface
    /// retry guidance, re-enable submission.
    pub fn on_plan_failed(&mut self, token: u64, error: &str) {
        if !self.plan_in_flight || token != self.plan_token {
            self.stale_discards += 1;
            return;
        }
        self.plan_in_flight = false;
        self.progress.cancel();
        self.notices.error(&format!(
            "Plan generation failed: {}. Your selections are kept - press Enter to retry.",
            truncate(error, 120)
        ));
        self.restore_submit();
    }

    /// User closed the progress view. The request is abandoned: the token
    /// bump guarantees its eventual response is discarded.
    pub fn cancel_plan(&mut self) {
        if !self.plan_in_flight {
            return;
        }
        self.plan_in_flight = false;
        self.plan_token += 1;
        self.progress.cancel();
        self.notices.info("Plan generation canceled");
        self.restore_submit();
    }

    fn restore_submit(&mut self) {
        self.submit_enabled = true;
        self.submit_label = SUBMIT_LABEL;
    }

    /// True exactly once, when the post-finalize pause elapses and the
    /// plan should be handed to the results surface.
    pub fn poll_reveal(&mut self, now: Instant) -> bool {
        match self.reveal_at {
            Some(at) if now >= at => {
                self.reveal_at = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NoticeKind;
    use crate::search::{Panel, SearchCommand, DEBOUNCE};

    fn plan(id: &str) -> GardenPlan {
        serde_json::from_value(serde_json::json!({
            "plan_id": id,
            "location": {"zip_code": "97201", "city": "Portland"},
        }))
        .unwrap()
    }

    fn session_with_selection() -> SessionState {
        let mut session = SessionState::new();
        session.catalog.merge(PlantRecord::new("Tomato", "vegetable"));
        session.zip_code = "97201".to_string();
        session.selection.toggle("Tomato");
        session
    }

    #[test]
    fn test_submit_rejects_empty_selection_without_side_effects() {
        let mut session = SessionState::new();
        session.zip_code = "97201".to_string();
        let err = session.submit(Instant::now()).unwrap_err();
        assert_eq!(err, SubmitError::EmptySelection);
        // No network payload, no simulator start, submit still enabled.
        assert_eq!(session.progress.pending_timers(), 0);
        assert!(session.submit_enabled);
        assert!(!session.plan_in_flight());
    }

    #[test]
    fn test_submit_rejects_missing_location_first() {
        let mut session = SessionState::new();
        session.selection.toggle("Tomato");
        let err = session.submit(Instant::now()).unwrap_err();
        assert_eq!(err, SubmitError::MissingLocation);
        assert_eq!(session.progress.pending_timers(), 0);
    }

    #[test]
    fn test_submit_starts_simulator_and_builds_payload() {
        let mut session = session_with_selection();
        session.selection.toggle("Basil");
        let submission = session.submit(Instant::now()).unwrap();

        assert!(!session.submit_enabled);
        assert_eq!(session.submit_label, SUBMIT_LABEL_BUSY);
        assert!(session.progress.is_running());
        assert_eq!(
            submission.request.selected_plants,
            vec!["Basil".to_string(), "Tomato".to_string()]
        );
        assert_eq!(submission.request.zip_code, "97201");
        assert_eq!(submission.request.garden_size, "medium");
    }

    #[test]
    fn test_plan_success_finalizes_and_reveals_after_pause() {
        let mut session = session_with_selection();
        let now = Instant::now();
        let submission = session.submit(now).unwrap();

        session.on_plan_ready(submission.token, plan("p1"), now);
        assert_eq!(session.progress.percent(), 100.0);
        assert_eq!(session.progress.pending_timers(), 0);
        assert!(session.submit_enabled);
        assert_eq!(session.submit_label, SUBMIT_LABEL);

        // The reveal waits out the pause so 100% is perceivable.
        assert!(!session.poll_reveal(now + Duration::from_millis(100)));
        assert!(session.poll_reveal(now + Duration::from_millis(700)));
        // And fires exactly once.
        assert!(!session.poll_reveal(now + Duration::from_secs(5)));
        assert_eq!(session.plan.as_ref().unwrap().plan_id, "p1");
    }

    #[test]
    fn test_plan_failure_cancels_simulator_and_reenables_submit() {
        let mut session = session_with_selection();
        let now = Instant::now();
        let submission = session.submit(now).unwrap();

        // Let the simulator get partway through.
        session.progress.tick(now + Duration::from_secs(5));

        session.on_plan_failed(submission.token, "connection reset");
        assert!(session.submit_enabled);
        assert_eq!(session.submit_label, SUBMIT_LABEL);
        assert_eq!(session.progress.pending_timers(), 0);
        assert!(!session.progress.is_finalized());
        let latest = session.notices.latest().unwrap();
        assert_eq!(latest.kind, NoticeKind::Error);
        assert!(latest.message.contains("retry"));
    }

    #[test]
    fn test_canceled_plan_discards_late_response() {
        let mut session = session_with_selection();
        let now = Instant::now();
        let submission = session.submit(now).unwrap();

        session.cancel_plan();
        assert!(session.submit_enabled);
        assert_eq!(session.progress.pending_timers(), 0);

        // The abandoned request completes anyway; its token no longer
        // matches so nothing visible changes.
        session.on_plan_ready(submission.token, plan("late"), now);
        assert!(session.plan.is_none());
        assert_eq!(session.stale_discards, 1);
    }

    #[test]
    fn test_ai_fallback_merges_selects_and_notifies() {
        let mut session = session_with_selection();
        let now = Instant::now();
        session.search.on_input("dragonfruit", now);
        let SearchCommand::RemoteSearch { token, .. } = session.search.poll(now + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        session.on_search_results(token, vec![]);
        assert_eq!(*session.search.panel(), Panel::OfferGenerate);

        let SearchCommand::Generate { token, .. } = session.search.begin_generate().unwrap() else {
            panic!()
        };
        let before = session.catalog.len();
        let rebuilt =
            session.on_generated(token, "dragonfruit", Some(PlantRecord::new("Dragonfruit", "fruit")));

        assert!(rebuilt);
        assert_eq!(session.catalog.len(), before + 1);
        assert_eq!(
            session.catalog.find("Dragonfruit").unwrap().origin,
            crate::catalog::Origin::AiGenerated
        );
        assert!(session.selection.contains("Dragonfruit"));
        let latest = session.notices.latest().unwrap();
        assert_eq!(latest.kind, NoticeKind::Success);
        assert!(latest.message.contains("Dragonfruit"));
    }

    #[test]
    fn test_failed_generation_names_query_and_keeps_catalog() {
        let mut session = session_with_selection();
        let now = Instant::now();
        session.search.on_input("moonmelon", now);
        let SearchCommand::RemoteSearch { token, .. } = session.search.poll(now + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        session.on_search_results(token, vec![]);
        let SearchCommand::Generate { token, .. } = session.search.begin_generate().unwrap() else {
            panic!()
        };

        let before = session.catalog.len();
        assert!(!session.on_generated(token, "moonmelon", None));
        assert_eq!(session.catalog.len(), before);
        let latest = session.notices.latest().unwrap();
        assert_eq!(latest.kind, NoticeKind::Error);
        assert!(latest.message.contains("moonmelon"));
    }

    #[test]
    fn test_search_results_tag_catalog_membership() {
        let mut session = session_with_selection();
        let now = Instant::now();
        session.search.on_input("t", now);
        let SearchCommand::RemoteSearch { token, .. } = session.search.poll(now + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        session.on_search_results(
            token,
            vec![
                PlantRecord::new("Tomato", "vegetable"),
                PlantRecord::new("Tomatillo", "vegetable"),
            ],
        );
        let Panel::Suggestions(items) = session.search.panel() else {
            panic!()
        };
        assert!(items[0].in_catalog);
        assert!(!items[1].in_catalog);
    }

    #[test]
    fn test_fetched_duplicate_still_updates_selection() {
        use crate::search::Choice;

        let mut session = session_with_selection();
        let now = Instant::now();
        session.search.on_input("bor", now);
        let SearchCommand::RemoteSearch { token, .. } = session.search.poll(now + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        session.on_search_results(token, vec![PlantRecord::new("Borage", "herb")]);

        let Some(Choice::FetchPending(SearchCommand::Fetch { name, token })) =
            session.search.choose()
        else {
            panic!()
        };
        assert_eq!(name, "Borage");

        // The record lands in the catalog while the fetch is in flight;
        // the merge becomes a storage no-op but selection still updates.
        session.catalog.merge(PlantRecord::new("Borage", "herb"));
        let before = session.catalog.len();
        session.on_item_fetched(token, "Borage", Some(PlantRecord::new("Borage", "herb")));
        assert_eq!(session.catalog.len(), before);
        assert!(session.selection.contains("Borage"));
    }

    #[test]
    fn test_confirm_existing_suggestion_selects_once() {
        let mut session = session_with_selection();
        let now = Instant::now();
        session.search.on_input("toma", now);
        let SearchCommand::RemoteSearch { token, .. } = session.search.poll(now + DEBOUNCE).unwrap()
        else {
            panic!()
        };
        session.on_search_results(token, vec![PlantRecord::new("Tomato", "vegetable")]);

        // Tomato is already selected; confirming must not deselect it.
        assert!(session.selection.contains("Tomato"));
        assert!(session.confirm_suggestion().is_none());
        assert!(session.selection.contains("Tomato"));
        assert_eq!(*session.search.panel(), Panel::Hidden);
    }

    #[test]
    fn test_catalog_failure_leaves_empty_catalog_and_notifies() {
        let mut session = SessionState::new();
        session.on_catalog_failed("connection refused");
        assert!(session.catalog.is_empty());
        assert_eq!(session.notices.latest().unwrap().kind, NoticeKind::Error);
    }
}
