//! HTTP client for the garden-planner backend.
//!
//! Every call is caught at the point of use and converted to a
//! notification; nothing here is allowed to crash the session loop.
//! Error messages are status-specific so the toast the user sees says
//! something actionable.

use crate::catalog::PlantRecord;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use url::Url;

/// Full catalog listing.
#[derive(Debug, Deserialize)]
pub struct PlantListResponse {
    pub plants: Vec<PlantRecord>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub source: String,
}

/// Tiered search / generation entry point.
#[derive(Debug, Deserialize)]
pub struct PlantSearchResponse {
    pub query: String,
    pub plants: Vec<PlantRecord>,
    #[serde(default)]
    pub total_results: usize,
    #[serde(default)]
    pub search_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct CreatePlanRequest {
    pub zip_code: String,
    pub selected_plants: Vec<String>,
    pub garden_size: String,
    pub experience_level: String,
}

/// Location summary returned with a plan.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LocationSummary {
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub usda_zone: Option<String>,
    #[serde(default)]
    pub climate_type: Option<String>,
    #[serde(default)]
    pub growing_season_days: Option<u32>,
}

/// The generated plan. Only the fields the hand-off surface needs are
/// typed; per-plant details stay opaque JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct GardenPlan {
    pub plan_id: String,
    #[serde(default)]
    pub location: LocationSummary,
    #[serde(default)]
    pub selected_plants: Vec<String>,
    #[serde(default)]
    pub plant_information: Vec<serde_json::Value>,
    #[serde(default)]
    pub general_tips: Vec<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| anyhow::anyhow!("Invalid endpoint {}: {}", path, e))
    }

    /// Full catalog fetch at session start.
    pub async fn list_catalog(&self) -> Result<PlantListResponse> {
        let url = self.endpoint("api/plants")?;
        let response = self.http.get(url).send().await?;
        read_json(response, "catalog").await
    }

    /// Search the catalog. With `include_generated` the backend falls
    /// through to AI generation when nothing matches.
    pub async fn search_catalog(
        &self,
        query: &str,
        include_generated: bool,
    ) -> Result<PlantSearchResponse> {
        let mut url = self.endpoint("api/plants/search")?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("include_generated", if include_generated { "true" } else { "false" });
        let response = self.http.get(url).send().await?;
        read_json(response, "search").await
    }

    /// Resolve a single record by exact name. `None` when the backend
    /// neither knows nor can generate it.
    pub async fn fetch_item(&self, name: &str) -> Result<Option<PlantRecord>> {
        let url = self.endpoint(&format!("api/plants/{}", name))?;
        let response = self.http.get(url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        read_json(response, "plant lookup").await.map(Some)
    }

    /// The long-running generation call the progress simulator shadows.
    pub async fn generate_plan(&self, request: &CreatePlanRequest) -> Result<GardenPlan> {
        let url = self.endpoint("api/plans")?;
        let response = self.http.post(url).json(request).send().await?;
        read_json(response, "plan generation").await
    }

    /// Retrieve the generated downloadable document.
    pub async fn fetch_document(&self, plan_id: &str) -> Result<Vec<u8>> {
        let url = self.endpoint(&format!("api/pdf/{}", plan_id))?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("{}", status_message(status, "document download"));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Decode a JSON body, mapping non-success statuses and malformed payloads
/// to messages worth showing in a toast.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        anyhow::bail!("{}", status_message(status, what));
    }
    serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("Malformed {} response: {}", what, e))
}

fn status_message(status: reqwest::StatusCode, what: &str) -> String {
    match status.as_u16() {
        429 => format!(
            "The server is rate limiting {} requests. Wait a minute and try again.",
            what
        ),
        500..=599 => format!(
            "Server error during {} ({}). The backend may be restarting - try again shortly.",
            what, status
        ),
        _ => format!("Request failed during {} ({})", what, status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_response_carries_opaque_fields() {
        let body = r#"{
            "plants": [{
                "name": "Tomato",
                "plant_type": "vegetable",
                "scientific_name": "Solanum lycopersicum",
                "days_to_harvest": 75
            }],
            "total_count": 1,
            "source": "database"
        }"#;
        let parsed: PlantListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.plants[0].name, "Tomato");
        assert_eq!(
            parsed.plants[0].extra["days_to_harvest"],
            serde_json::json!(75)
        );
        assert_eq!(parsed.source, "database");
    }

    #[test]
    fn test_plan_response_tolerates_missing_optionals() {
        let body = r#"{"plan_id": "abc123", "location": {"zip_code": "97201"}}"#;
        let plan: GardenPlan = serde_json::from_str(body).unwrap();
        assert_eq!(plan.plan_id, "abc123");
        assert_eq!(plan.location.zip_code, "97201");
        assert!(plan.general_tips.is_empty());
    }

    #[test]
    fn test_status_messages_are_actionable() {
        let msg = status_message(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "plan generation");
        assert!(msg.contains("try again"));
        let msg = status_message(reqwest::StatusCode::TOO_MANY_REQUESTS, "search");
        assert!(msg.contains("rate limiting"));
    }

    #[test]
    fn test_search_url_includes_generation_flag() {
        let client = ApiClient::new(Url::parse("http://localhost:8000").unwrap());
        let url = client.endpoint("api/plants/search").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/plants/search");
    }
}
