//! Data validation utilities.
//!
//! A data directory holds RON files: `config.ron` is read as a
//! [`CombatConfig`], every other `.ron` file as a catalog.

use std::fs;
use std::path::{Path, PathBuf};

use trigram_core::catalog::Catalog;
use trigram_core::config::CombatConfig;

use crate::error::{Result, ToolError};

/// File stem read as a combat config rather than a catalog.
pub const CONFIG_STEM: &str = "config";

/// What a validated file turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedFile {
    /// A catalog with this many techniques and vital points.
    Catalog {
        /// File path.
        path: PathBuf,
        /// Technique count.
        techniques: usize,
        /// Vital point count.
        vital_points: usize,
    },
    /// A combat config.
    Config {
        /// File path.
        path: PathBuf,
    },
}

/// Validate one catalog file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse or
/// validate.
pub fn validate_catalog_file(path: &Path) -> Result<ValidatedFile> {
    let source = read(path)?;
    let catalog = Catalog::from_ron_str(&source).map_err(|source| ToolError::InvalidData {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ValidatedFile::Catalog {
        path: path.to_path_buf(),
        techniques: catalog.techniques().len(),
        vital_points: catalog.all_vital_points().len(),
    })
}

/// Validate one combat config file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse or
/// validate.
pub fn validate_config_file(path: &Path) -> Result<ValidatedFile> {
    let source = read(path)?;
    CombatConfig::from_ron_str(&source).map_err(|source| ToolError::InvalidData {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ValidatedFile::Config {
        path: path.to_path_buf(),
    })
}

/// Validate a single file or every `.ron` file in a directory.
///
/// Files are checked in name order. Every file is checked even after a
/// failure; the failures come back together.
///
/// # Errors
///
/// Returns an error if the path cannot be read or holds no data files.
pub fn validate_path(path: &Path) -> Result<Vec<Result<ValidatedFile>>> {
    if path.is_file() {
        return Ok(vec![validate_file(path)]);
    }

    let entries = fs::read_dir(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    if files.is_empty() {
        return Err(ToolError::NoDataFiles(path.to_path_buf()));
    }
    files.sort();

    Ok(files.iter().map(|file| validate_file(file)).collect())
}

/// Validate all RON data files in a directory, stopping at the first
/// failure.
///
/// # Errors
///
/// Returns an error if any data file fails validation.
pub fn validate_data_directory(path: &Path) -> Result<Vec<ValidatedFile>> {
    validate_path(path)?.into_iter().collect()
}

fn validate_file(path: &Path) -> Result<ValidatedFile> {
    tracing::debug!(path = %path.display(), "Validating");
    if path.file_stem().is_some_and(|stem| stem == CONFIG_STEM) {
        validate_config_file(path)
    } else {
        validate_catalog_file(path)
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| ToolError::Io {
        path: path.to_path_buf(),
        source,
    })
}
