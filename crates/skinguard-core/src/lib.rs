//! skinguard-core — shared library for skin-lesion classification.
//!
//! Provides model loading, image preprocessing, output interpretation,
//! and upload validation used by both the CLI and the HTTP server.

pub mod classify;
pub mod error;
pub mod inference;
pub mod interpret;
pub mod preprocess;
pub mod report;
pub mod upload;

pub use classify::Classifier;
pub use error::{ClassifyError, Result};
pub use inference::{InferenceEngine, ModelOptions, OnnxModel};
pub use interpret::{Classification, Label, OutputHead};
