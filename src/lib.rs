//! School Radius - radius search and result curation for school contact lists
//!
//! Resolves a postcode or suburb to a coordinate, finds schools within a travel
//! radius, and lets a user curate the rows before copying emails or exporting CSV.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;

// Re-export commonly used types
pub use crate::core::{distance::distance_km, pipeline::search, resolver::resolve, SearchError};
pub use models::{Coordinate, Dataset, ResolvedCenter, ResultRow, School, SearchCriteria, SearchResult, SectorFilter};
pub use session::SearchSession;
