// Service exports
pub mod cache;
pub mod clipboard;
pub mod dataset;
pub mod flavour;
pub mod sessions;

pub use cache::DatasetCache;
pub use clipboard::{Clipboard, ClipboardError, DisabledClipboard, MemoryClipboard, SystemClipboard};
pub use dataset::{DataLoadError, DatasetLoader, DatasetSource};
pub use flavour::{FlavourError, FlavourLookup, FlavourTable};
pub use sessions::{SessionStore, SharedSession};
