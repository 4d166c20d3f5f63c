// Core algorithm exports
pub mod distance;
pub mod error;
pub mod export;
pub mod filters;
pub mod pipeline;
pub mod resolver;
pub mod selection;

pub use distance::{distance_km, haversine_distance, round_km};
pub use error::SearchError;
pub use export::{csv_filename, format_as_csv, format_selection_for_clipboard, ClipboardText, CopyMode};
pub use filters::{matches_sector, within_radius, SecondaryFilter};
pub use pipeline::search;
pub use resolver::{resolve, LocationResolver};
pub use selection::{apply_secondary_filter, DisplaySet, Selection};
