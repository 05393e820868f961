//! Hill catalog
//!
//! The in-memory hill/route data model and everything that operates on it:
//! - data types for hills, routes and attached media
//! - the immutable catalog store with id lookup and derived indexes
//! - the pure query engine (filter, search, curation, name resolution)
//! - asset manifest association via the filename naming convention
//! - the transient selection controller

pub mod assets;
pub mod loader;
pub mod model;
pub mod query;
pub mod selection;
pub mod store;

// Re-export commonly used types from submodules
pub use assets::ManifestEntry;
pub use loader::load_default;
pub use model::{Comment, Difficulty, Hill, HillId, Image, Route, Webcam};
pub use query::{FilterCriteria, POPULAR_HILLS};
pub use selection::SelectionController;
pub use store::Catalog;
