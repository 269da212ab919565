//! Reduced-space similarity (alternate deployment)
//!
//! Corpus profiles are stored pre-compressed: text-vectorized, then
//! projected by a fitted reducer. A query goes through the same two steps
//! and is compared by cosine similarity in the compact space.

use crate::engine::{QueryInput, SimilarityEngine, SimilarityOutcome, SimilarityQuery};
use metricrec_core::{
    DimensionReducer, Error, MetricCatalog, Profile, Recommendation, Result, TextVectorizer,
    Vector,
};
use metricrec_schema::{FeatureDef, FeatureKind};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, info};

/// Candidates below this similarity are discarded
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.2;

pub const NO_MATCH_MESSAGE: &str = "No profile found with sufficient similarity.";

/// A corpus profile in the compact space
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedProfile {
    pub id: i64,
    pub embedding: Vector,
    pub metric: Option<String>,
}

pub struct ReducedSpaceEngine {
    vectorizer: Arc<dyn TextVectorizer>,
    reducer: Arc<dyn DimensionReducer>,
    profiles: Vec<ReducedProfile>,
    fields: Vec<FeatureDef>,
    min_similarity: f32,
    catalog: Arc<MetricCatalog>,
}

impl ReducedSpaceEngine {
    pub fn new(
        vectorizer: Arc<dyn TextVectorizer>,
        reducer: Arc<dyn DimensionReducer>,
        profiles: Vec<ReducedProfile>,
        catalog: Arc<MetricCatalog>,
    ) -> Result<Self> {
        if vectorizer.dim() != reducer.input_dim() {
            return Err(Error::ModelLoad(format!(
                "vectorizer produces {} columns but reducer expects {}",
                vectorizer.dim(),
                reducer.input_dim()
            )));
        }

        let expected = reducer.output_dim();
        if let Some(bad) = profiles.iter().find(|p| p.embedding.dim() != expected) {
            return Err(Error::ModelLoad(format!(
                "profile {} has embedding dimension {}, reducer outputs {}",
                bad.id,
                bad.embedding.dim(),
                expected
            )));
        }

        info!(
            "Reduced-space engine ready: {} profiles, {} -> {} dimensions",
            profiles.len(),
            reducer.input_dim(),
            expected
        );

        Ok(Self {
            vectorizer,
            reducer,
            profiles,
            fields: Vec::new(),
            min_similarity: DEFAULT_MIN_SIMILARITY,
            catalog,
        })
    }

    /// Profile fields used to compose query text, in order
    pub fn with_fields(mut self, fields: Vec<FeatureDef>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    pub fn min_similarity(&self) -> f32 {
        self.min_similarity
    }

    pub fn fields(&self) -> &[FeatureDef] {
        &self.fields
    }

    /// Flatten a structured profile into query text: text values verbatim,
    /// binary flags by name when set to 1. Numeric fields are not textual
    /// and are ignored.
    pub fn compose_text(&self, profile: &Profile) -> String {
        let mut parts: Vec<String> = Vec::new();
        for field in &self.fields {
            let Some(value) = profile.get(&field.name) else {
                continue;
            };
            match field.kind {
                FeatureKind::Text => {
                    let text = value.as_text();
                    if !text.trim().is_empty() {
                        parts.push(text.into_owned());
                    }
                }
                FeatureKind::Binary => {
                    if value.as_number() == Some(1.0) {
                        parts.push(field.name.clone());
                    }
                }
                FeatureKind::Numeric => {}
            }
        }
        parts.join(" ")
    }

    /// Embed free text into the compact space
    pub fn embed(&self, text: &str) -> Result<Vector> {
        self.reducer.project(&self.vectorizer.transform(text))
    }

    pub fn recommend(&self, text: &str, top_n: usize) -> Result<SimilarityOutcome> {
        let query = self.embed(text)?;

        let mut candidates: Vec<(usize, f32)> = self
            .profiles
            .iter()
            .enumerate()
            .map(|(i, p)| (i, query.cosine_similarity(&p.embedding)))
            .filter(|&(_, score)| score >= self.min_similarity)
            .collect();

        if candidates.is_empty() {
            debug!("No candidate reached similarity {}", self.min_similarity);
            return Ok(SimilarityOutcome::NoMatch {
                message: NO_MATCH_MESSAGE.to_string(),
            });
        }

        candidates.sort_by_key(|&(_, score)| Reverse(OrderedFloat(score)));
        candidates.truncate(top_n);

        let recommendations = candidates
            .into_iter()
            .filter_map(|(i, score)| {
                let profile = &self.profiles[i];
                let metric = profile.metric.as_deref()?;
                let description = self.catalog.description(metric).map(str::to_string);
                Some(
                    Recommendation::new(metric, score)
                        .with_description(description)
                        .with_similar_profile(profile.id),
                )
            })
            .collect();

        Ok(SimilarityOutcome::Recommendations(recommendations))
    }
}

impl SimilarityEngine for ReducedSpaceEngine {
    fn name(&self) -> &'static str {
        "reduced"
    }

    fn corpus_len(&self) -> usize {
        self.profiles.len()
    }

    fn find_similar(&self, query: &SimilarityQuery) -> Result<SimilarityOutcome> {
        let text = match &query.input {
            QueryInput::Text(text) => text.clone(),
            QueryInput::Profile(profile) => self.compose_text(profile),
        };

        let outcome = self.recommend(&text, query.top_n)?;
        let SimilarityOutcome::Recommendations(mut recommendations) = outcome else {
            return Ok(outcome);
        };

        let scores: Vec<f32> = recommendations.iter().map(|r| r.affinity).collect();
        for (rec, affinity) in recommendations
            .iter_mut()
            .zip(query.affinity_mode.present(&scores))
        {
            rec.affinity = affinity;
        }
        Ok(SimilarityOutcome::Recommendations(recommendations))
    }
}

impl std::fmt::Debug for ReducedSpaceEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReducedSpaceEngine")
            .field("profiles", &self.profiles.len())
            .field("fields", &self.fields.len())
            .field("min_similarity", &self.min_similarity)
            .finish()
    }
}
