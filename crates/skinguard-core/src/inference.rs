//! ONNX model loading and inference via the `ort` crate.

use std::path::Path;
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;

use crate::error::{ClassifyError, Result};

/// Anything that maps a `[1, 150, 150, 3]` batch to raw output scores.
///
/// Implementations must not mutate the underlying model and must be
/// deterministic for a fixed input.
pub trait InferenceEngine: Send + Sync {
    /// Returns the flattened output row for the single image in `batch`.
    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>>;
}

#[derive(Debug, Clone)]
pub struct ModelOptions {
    pub intra_threads: usize,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self { intra_threads: 4 }
    }
}

/// A frozen ONNX classifier.
///
/// `Session::run` needs exclusive access, so calls are serialized.
pub struct OnnxModel {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
}

impl OnnxModel {
    /// Load an ONNX model from the given path.
    pub fn load(model_path: &Path, options: &ModelOptions) -> Result<Self> {
        let session = build_session(model_path, options).map_err(|e| ClassifyError::ModelLoad {
            path: model_path.to_path_buf(),
            source: e.into(),
        })?;

        let input_name = first_name(model_path, "input", session.inputs.iter().map(|i| &i.name))?;
        let output_name =
            first_name(model_path, "output", session.outputs.iter().map(|o| &o.name))?;

        log::info!(
            "loaded model {} (input '{}', output '{}')",
            model_path.display(),
            input_name,
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
        })
    }
}

/// The first declared graph input or output. A graph without one cannot be
/// served, so this is a load failure.
fn first_name<'a>(
    model_path: &Path,
    kind: &str,
    mut names: impl Iterator<Item = &'a String>,
) -> Result<String> {
    names.next().cloned().ok_or_else(|| ClassifyError::ModelLoad {
        path: model_path.to_path_buf(),
        source: format!("model declares no {kind}s").into(),
    })
}

fn build_session(model_path: &Path, options: &ModelOptions) -> ort::Result<Session> {
    let session = Session::builder()?
        .with_intra_threads(options.intra_threads)?
        .commit_from_file(model_path)?;
    Ok(session)
}

impl InferenceEngine for OnnxModel {
    fn predict(&self, batch: &Array4<f32>) -> Result<Vec<f32>> {
        let input_tensor = TensorRef::from_array_view(batch)?;

        let mut session = self.session.lock().map_err(|_| ClassifyError::Poisoned)?;
        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let output_array = outputs[self.output_name.as_str()].try_extract_array::<f32>()?;
        Ok(output_array.iter().copied().collect())
    }
}
