//! The similarity capability shared by both corpus representations.
//!
//! Callers build a [`SimilarityQuery`] and hand it to whichever
//! [`SimilarityEngine`] the deployment loaded; they never need to know
//! whether a multi-feature corpus or a reduced-space matrix backs it.

use crate::weights::FeatureWeights;
use metricrec_core::{Profile, Recommendation, Result};
use serde::{Deserialize, Serialize};

/// Neighbour count when a request does not ask for one
pub const DEFAULT_TOP_N: usize = 5;

/// What the caller knows about the user
#[derive(Debug, Clone, PartialEq)]
pub enum QueryInput {
    /// Structured profile, one value per feature
    Profile(Profile),
    /// A single free-text description
    Text(String),
}

/// How affinities are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffinityMode {
    /// The similarity score itself
    #[default]
    Raw,
    /// Each score as a percentage of the sum of the retained scores
    Percentage,
}

impl AffinityMode {
    pub fn present(self, scores: &[f32]) -> Vec<f32> {
        match self {
            AffinityMode::Raw => scores.to_vec(),
            AffinityMode::Percentage => {
                let sum: f32 = scores.iter().sum();
                scores
                    .iter()
                    .map(|s| if sum > 0.0 { s / sum * 100.0 } else { 0.0 })
                    .collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityQuery {
    pub input: QueryInput,
    pub top_n: usize,
    /// Overrides merged over the engine's default weights
    pub weights: Option<FeatureWeights>,
    pub affinity_mode: AffinityMode,
}

impl SimilarityQuery {
    pub fn profile(profile: Profile) -> Self {
        Self::with_input(QueryInput::Profile(profile))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::with_input(QueryInput::Text(text.into()))
    }

    fn with_input(input: QueryInput) -> Self {
        Self {
            input,
            top_n: DEFAULT_TOP_N,
            weights: None,
            affinity_mode: AffinityMode::Raw,
        }
    }

    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn weights(mut self, weights: FeatureWeights) -> Self {
        self.weights = Some(weights);
        self
    }

    pub fn affinity_mode(mut self, mode: AffinityMode) -> Self {
        self.affinity_mode = mode;
        self
    }
}

/// Result of a similarity search
#[derive(Debug, Clone, PartialEq)]
pub enum SimilarityOutcome {
    Recommendations(Vec<Recommendation>),
    /// Candidates existed but none was similar enough. Distinct from an
    /// empty recommendation list.
    NoMatch { message: String },
}

impl SimilarityOutcome {
    pub fn recommendations(&self) -> Option<&[Recommendation]> {
        match self {
            SimilarityOutcome::Recommendations(recs) => Some(recs),
            SimilarityOutcome::NoMatch { .. } => None,
        }
    }

    pub fn is_no_match(&self) -> bool {
        matches!(self, SimilarityOutcome::NoMatch { .. })
    }
}

pub trait SimilarityEngine: Send + Sync {
    /// Short name used in logs and health output
    fn name(&self) -> &'static str;

    /// Number of reference profiles searched
    fn corpus_len(&self) -> usize;

    fn find_similar(&self, query: &SimilarityQuery) -> Result<SimilarityOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentage_mode() {
        let shares = AffinityMode::Percentage.present(&[0.6, 0.3, 0.1]);
        assert!((shares[0] - 60.0).abs() < 1e-4);
        assert!((shares.iter().sum::<f32>() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_percentage_of_zero_sum() {
        assert_eq!(AffinityMode::Percentage.present(&[0.0, 0.0]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_raw_mode_is_identity() {
        assert_eq!(AffinityMode::Raw.present(&[0.4, 0.2]), vec![0.4, 0.2]);
    }

    #[test]
    fn test_query_builder_defaults() {
        let query = SimilarityQuery::text("scrum master");
        assert_eq!(query.top_n, DEFAULT_TOP_N);
        assert_eq!(query.affinity_mode, AffinityMode::Raw);
        assert!(query.weights.is_none());
    }

    #[test]
    fn test_affinity_mode_serde() {
        let mode: AffinityMode = serde_json::from_str("\"percentage\"").unwrap();
        assert_eq!(mode, AffinityMode::Percentage);
    }
}
