// src/core/mod.rs

//! Core data structures and types

pub mod error;
pub mod precision;
pub mod state;

// Re-export public types for convenient access via `autopsi::core::TypeName`
pub use error::AutopsiError;
pub use precision::{Element, Precision};
pub use state::{AmplitudeVector, Outcome, ResultType, View};
