//! Shared building blocks for the light switcher workspace.
//!
//! Every error enum in the workspace carries an [`ErrorLocation`] so that a
//! log line points straight at the `?` that produced it.

pub mod error;

pub use error::error_location::ErrorLocation;
