use thiserror::Error;

/// Failures surfaced to the user by the search and export core
///
/// Every variant is recoverable; callers report the message and keep running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    NotFound(String),

    #[error("None of the selected schools have a public email.")]
    EmptySelection,

    #[error("No public emails found in current result set.")]
    EmptyResult,

    #[error("{0} dataset not loaded yet.")]
    DatasetNotLoaded(String),

    #[error("Run a search first.")]
    NoSearch,
}

impl SearchError {
    /// Stable machine-readable code for error bodies
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::Input(_) => "input_error",
            SearchError::NotFound(_) => "not_found",
            SearchError::EmptySelection => "empty_selection",
            SearchError::EmptyResult => "empty_result",
            SearchError::DatasetNotLoaded(_) => "dataset_not_loaded",
            SearchError::NoSearch => "no_search",
        }
    }
}
