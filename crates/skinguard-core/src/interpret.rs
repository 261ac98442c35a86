//! Mapping raw network output to a diagnosis label and confidence.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, Result};

/// Threshold above which a single sigmoid score means "Malignant".
pub const SIGMOID_THRESHOLD: f32 = 0.5;

/// How far a softmax row may sum away from 1.
const SOFTMAX_SUM_TOLERANCE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Benign,
    Malignant,
}

impl Label {
    /// Softmax class order: index 0 is Benign, index 1 is Malignant.
    pub const CLASSES: [Label; 2] = [Label::Benign, Label::Malignant];

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Benign => "Benign",
            Label::Malignant => "Malignant",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one image. `confidence` is a percentage in (0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(rename = "prediction")]
    pub label: Label,
    pub confidence: f32,
}

/// Shape of the loaded model's output layer, resolved once at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputHead {
    /// One neuron holding P(malignant).
    Sigmoid,
    /// Two neurons holding [P(benign), P(malignant)].
    Softmax,
}

impl OutputHead {
    pub fn from_width(width: usize) -> Result<Self> {
        match width {
            1 => Ok(OutputHead::Sigmoid),
            2 => Ok(OutputHead::Softmax),
            n => Err(ClassifyError::ModelOutput(format!(
                "expected 1 (sigmoid) or 2 (softmax) output values, model produced {n}"
            ))),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            OutputHead::Sigmoid => 1,
            OutputHead::Softmax => 2,
        }
    }

    /// Turn one raw output row into a label and a percentage confidence.
    pub fn interpret(&self, raw: &[f32]) -> Result<Classification> {
        if raw.len() != self.width() {
            return Err(ClassifyError::ModelOutput(format!(
                "{self:?} head expects {} output values, got {}",
                self.width(),
                raw.len()
            )));
        }
        if let Some(bad) = raw.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ClassifyError::ModelOutput(format!(
                "output value {bad} is not a probability"
            )));
        }

        let (label, confidence) = match self {
            OutputHead::Sigmoid => {
                let p = raw[0];
                // Exactly 0.5 falls to Benign.
                if p > SIGMOID_THRESHOLD {
                    (Label::Malignant, p)
                } else {
                    (Label::Benign, 1.0 - p)
                }
            }
            OutputHead::Softmax => {
                let sum: f32 = raw.iter().sum();
                if (sum - 1.0).abs() > SOFTMAX_SUM_TOLERANCE {
                    return Err(ClassifyError::ModelOutput(format!(
                        "softmax output {raw:?} sums to {sum}, not 1"
                    )));
                }
                // First max wins, so an exact tie resolves to Benign.
                let idx = if raw[1] > raw[0] { 1 } else { 0 };
                if raw[idx] <= 0.0 {
                    return Err(ClassifyError::ModelOutput(format!(
                        "softmax output {raw:?} has no positive class probability"
                    )));
                }
                (Label::CLASSES[idx], raw[idx])
            }
        };

        Ok(Classification {
            label,
            confidence: confidence * 100.0,
        })
    }
}
