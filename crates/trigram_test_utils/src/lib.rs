//! # Trigram Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Determinism test harness
//! - Fixture builders and scripted rolls
//! - Matchup balance statistics
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod balance;
pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;

/// Re-export the scripted RNG for convenience.
pub use trigram_core::rng::ScriptedRng;
