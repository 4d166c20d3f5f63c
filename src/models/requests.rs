use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to open a search session for a region
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = 2, max = 8))]
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    "nsw".to_string()
}

/// Radius search request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(max = 120))]
    pub location: String,
    #[validate(range(exclusive_min = 0.0))]
    #[serde(alias = "radius_km", rename = "radiusKm")]
    pub radius_km: Option<f64>,
    #[serde(default = "default_sector")]
    pub sector: String,
}

fn default_sector() -> String {
    "all".to_string()
}

/// Secondary filter toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    #[serde(alias = "emails_only", rename = "emailsOnly")]
    pub emails_only: bool,
}

/// Single row checkbox toggle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub index: usize,
}
