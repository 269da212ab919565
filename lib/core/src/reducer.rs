//! Dimensionality reduction for the reduced-space deployment.

use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};

/// A pre-fitted projection from vectorizer space into a compact space
pub trait DimensionReducer: Send + Sync + std::fmt::Debug {
    fn input_dim(&self) -> usize;

    fn output_dim(&self) -> usize;

    fn project(&self, input: &Vector) -> Result<Vector>;
}

/// Truncated SVD: `k` component rows, each as wide as the vectorizer output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruncatedSvd {
    components: Vec<Vec<f32>>,
}

impl TruncatedSvd {
    pub fn new(components: Vec<Vec<f32>>) -> Result<Self> {
        let svd = Self { components };
        svd.validate()?;
        Ok(svd)
    }

    /// All component rows must share one width
    pub fn validate(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(Error::ModelLoad("reducer has no components".to_string()));
        }
        let width = self.components[0].len();
        if let Some(row) = self.components.iter().find(|row| row.len() != width) {
            return Err(Error::ModelLoad(format!(
                "reducer component width {} differs from {}",
                row.len(),
                width
            )));
        }
        Ok(())
    }
}

impl DimensionReducer for TruncatedSvd {
    fn input_dim(&self) -> usize {
        self.components.first().map(Vec::len).unwrap_or(0)
    }

    fn output_dim(&self) -> usize {
        self.components.len()
    }

    fn project(&self, input: &Vector) -> Result<Vector> {
        if input.dim() != self.input_dim() {
            return Err(Error::InvalidDimension {
                expected: self.input_dim(),
                actual: input.dim(),
            });
        }

        let data = self
            .components
            .iter()
            .map(|row| row.iter().zip(input.as_slice()).map(|(c, x)| c * x).sum())
            .collect();
        Ok(Vector::new(data))
    }
}
