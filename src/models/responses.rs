use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::models::domain::ResultRow;

/// Rendered result row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub index: usize,
    pub school_name: String,
    pub sector: String,
    pub suburb: String,
    pub postcode: String,
    pub phone: Option<String>,
    pub distance_km: f64,
    pub email: Option<String>,
    pub contact_form_url: Option<String>,
    pub website_url: Option<String>,
    pub selected: bool,
}

impl RowView {
    pub fn from_row(index: usize, row: &ResultRow, selected: bool) -> Self {
        let school = &row.school;
        Self {
            index,
            school_name: school.name.clone(),
            sector: school.sector.clone(),
            suburb: school.suburb.clone(),
            postcode: school.postcode.clone(),
            phone: school.phone().map(str::to_string),
            distance_km: row.distance_km,
            email: school.email().map(str::to_string),
            contact_form_url: school.contact_form_url().map(str::to_string),
            website_url: school.website_url().map(str::to_string),
            selected,
        }
    }
}

/// Checkbox tri-state of the current display rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub count: usize,
    pub total: usize,
    pub all_checked: bool,
    pub indeterminate: bool,
    pub can_copy: bool,
}

/// Response for search and filter endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchView {
    pub meta: String,
    pub center_label: String,
    pub radius_km: f64,
    pub total_results: usize,
    pub emails_only: bool,
    pub flavour: Option<String>,
    pub rows: Vec<RowView>,
    pub selection: SelectionState,
}

/// Session creation response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub region: String,
    pub region_name: String,
    pub school_count: usize,
    pub message: String,
}

/// Clipboard copy response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyResponse {
    pub copied: bool,
    pub mode: String,
    pub count: usize,
    pub text: String,
    pub message: String,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub regions_cached: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
