//! Error taxonomy for the classification core.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = ClassifyError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The uploaded bytes are not an image we can read.
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The model produced something other than a 1- or 2-wide probability vector.
    #[error("unexpected model output: {0}")]
    ModelOutput(String),

    /// Startup only. The service must not begin serving after this.
    #[error("failed to load model from {}: {source}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("inference engine lock poisoned")]
    Poisoned,

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClassifyError {
    /// True when the caller sent bad input, as opposed to a server-side fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ClassifyError::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_are_client_errors() {
        let err = image::load_from_memory(b"definitely not an image").unwrap_err();
        assert!(ClassifyError::from(err).is_client_error());
    }

    #[test]
    fn model_output_errors_are_server_errors() {
        let err = ClassifyError::ModelOutput("width 3".into());
        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "unexpected model output: width 3");
    }
}
