use crate::api::{GardenPlan, PlantListResponse};
use crate::catalog::PlantRecord;
use std::path::PathBuf;

/// Messages from background tasks to the main UI thread. Search-related
/// variants carry the request token they were issued with; the drain loop
/// discards any whose token no longer matches.
pub enum BackgroundMessage {
    CatalogLoaded(PlantListResponse),
    CatalogFailed(String),
    SearchResults {
        token: u64,
        plants: Vec<PlantRecord>,
    },
    SearchFailed {
        token: u64,
        error: String,
    },
    /// AI-generation fallback finished. `None` covers both an empty result
    /// and a transport failure - either way the catalog is untouched and
    /// the notification names the query.
    Generated {
        token: u64,
        query: String,
        record: Option<PlantRecord>,
    },
    /// Fetch-by-name for a pending-addition suggestion finished.
    ItemFetched {
        token: u64,
        name: String,
        record: Option<PlantRecord>,
    },
    PlanReady {
        token: u64,
        plan: GardenPlan,
    },
    PlanFailed {
        token: u64,
        error: String,
    },
    DocumentSaved(PathBuf),
    DocumentFailed(String),
    /// A background task panicked; surfaced as an error notice.
    TaskFailed(String),
}
