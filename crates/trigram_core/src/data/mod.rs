//! Data structures for the combat catalog.
//!
//! This module contains the raw catalog tables and the built-in data. All
//! structs are designed to be deserialized from RON files.
//!
//! **Note:** This module contains no IO - it only defines data types.
//! File loading is handled by `trigram_tools`.

mod catalog_data;
mod technique_data;
mod vital_point_data;

pub use catalog_data::CatalogData;
pub use technique_data::builtin_techniques;
pub use vital_point_data::builtin_vital_points;
