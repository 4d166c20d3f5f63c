// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Coordinate, Dataset, PostcodeTable, ResolvedCenter, ResultRow, School, SearchCriteria,
    SearchResult, SectorFilter, SuburbCentroid,
};
pub use requests::{CreateSessionRequest, FilterRequest, SearchRequest, ToggleRequest};
pub use responses::{
    CopyResponse, ErrorResponse, HealthResponse, RowView, SearchView, SelectionState,
    SessionResponse,
};
