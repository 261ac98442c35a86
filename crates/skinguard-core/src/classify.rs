//! The classification service: decode -> preprocess -> infer -> interpret.

use std::path::Path;

use image::DynamicImage;

use crate::error::{ClassifyError, Result};
use crate::inference::{InferenceEngine, ModelOptions, OnnxModel};
use crate::interpret::{Classification, OutputHead};
use crate::preprocess;

/// An immutable, loaded classifier. Share it behind an `Arc`.
pub struct Classifier {
    engine: Box<dyn InferenceEngine>,
    head: OutputHead,
}

impl Classifier {
    /// Wrap an engine, resolving its output head with one probe inference.
    ///
    /// Fails with [`ClassifyError::ModelOutput`] when the model's output is
    /// neither one sigmoid score nor a two-class distribution.
    pub fn new(engine: Box<dyn InferenceEngine>) -> Result<Self> {
        let probe = engine.predict(&preprocess::zero_batch())?;
        let head = OutputHead::from_width(probe.len())?;
        log::info!("resolved {head:?} output head (width {})", probe.len());
        Ok(Self { engine, head })
    }

    /// Load an ONNX model from disk and wrap it.
    pub fn load(model_path: &Path, options: &ModelOptions) -> Result<Self> {
        let model = OnnxModel::load(model_path, options)?;
        Self::new(Box::new(model))
    }

    pub fn head(&self) -> OutputHead {
        self.head
    }

    /// Classify encoded image bytes.
    pub fn classify(&self, bytes: &[u8]) -> Result<Classification> {
        let image = preprocess::decode(bytes)?;
        self.classify_image(&image)
    }

    pub fn classify_image(&self, image: &DynamicImage) -> Result<Classification> {
        let batch = preprocess::image_to_batch(image);
        let raw = self.engine.predict(&batch)?;
        let result = self.head.interpret(&raw)?;
        log::debug!(
            "classified {}x{} image as {} ({:.2}%)",
            image.width(),
            image.height(),
            result.label,
            result.confidence
        );
        Ok(result)
    }

    /// Read an image file and classify it.
    pub fn classify_path(&self, path: &Path) -> Result<Classification> {
        let bytes = std::fs::read(path).map_err(|source| ClassifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.classify(&bytes)
    }
}
