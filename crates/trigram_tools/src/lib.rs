//! # Trigram Development Tools
//!
//! Command-line tools for development:
//! - Catalog and config validators
//! - Effectiveness matrix and transition reports
//! - Built-in data export

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod export;
pub mod report;
pub mod validate;
