//! Export the built-in catalog so it can be edited and reloaded.

use clap::ValueEnum;
use trigram_core::catalog::Catalog;

use crate::error::{Result, ToolError};

/// Export encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// RON, the format `validate` and `Catalog::from_ron_str` read.
    #[default]
    Ron,
    /// Pretty-printed JSON.
    Json,
}

/// Encode `catalog` in `format`.
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn export_catalog(catalog: &Catalog, format: Format) -> Result<String> {
    let data = catalog.to_data();
    match format {
        Format::Ron => ron::ser::to_string_pretty(&data, ron::ser::PrettyConfig::default())
            .map_err(|e| ToolError::Export(e.to_string())),
        Format::Json => {
            serde_json::to_string_pretty(&data).map_err(|e| ToolError::Export(e.to_string()))
        }
    }
}
