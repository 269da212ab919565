//! Binary probability predictors
//!
//! Training happens elsewhere; a [`Classifier`] is an opaque, immutable
//! function from the normalized profile to `P(category is relevant)`.

use metricrec_core::{Error, Result};
use serde::{Deserialize, Serialize};

pub trait Classifier: Send + Sync {
    /// Probability in `[0, 1]` that the profile cares about the category
    fn predict_proba(&self, input: &[f32]) -> Result<f32>;

    /// Expected input width, when the model knows it
    fn input_dim(&self) -> Option<usize> {
        None
    }
}

impl<F> Classifier for F
where
    F: Fn(&[f32]) -> f32 + Send + Sync,
{
    fn predict_proba(&self, input: &[f32]) -> Result<f32> {
        Ok(self(input))
    }
}

/// Logistic regression: `sigmoid(w . x + b)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticClassifier {
    pub weights: Vec<f32>,
    #[serde(default)]
    pub intercept: f32,
}

impl LogisticClassifier {
    pub fn new(weights: Vec<f32>, intercept: f32) -> Self {
        Self { weights, intercept }
    }
}

impl Classifier for LogisticClassifier {
    fn predict_proba(&self, input: &[f32]) -> Result<f32> {
        if input.len() != self.weights.len() {
            return Err(Error::InvalidDimension {
                expected: self.weights.len(),
                actual: input.len(),
            });
        }

        let z: f32 = self
            .weights
            .iter()
            .zip(input)
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.intercept;
        Ok(sigmoid(z))
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}

#[inline]
fn sigmoid(z: f32) -> f32 {
    1.0 / (1.0 + (-z).exp())
}
