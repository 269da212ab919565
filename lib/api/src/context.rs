//! Shared, immutable engine state and the request-level operations
//!
//! An [`EngineContext`] is built once at startup and handed to every
//! handler behind an `Arc`. Request bodies arrive as raw JSON; this module
//! validates them and turns them into engine calls, so the HTTP layer only
//! maps results to responses.

use metricrec_classify::{AffinityExpander, ClassifierEnsemble, DEFAULT_THRESHOLD};
use metricrec_core::domain::collaborative_required_fields;
use metricrec_core::{Error, MetricCatalog, Profile, Recommendation, Result};
use metricrec_schema::ProfileNormalizer;
use metricrec_similarity::{
    AffinityMode, FeatureWeights, SimilarityEngine, SimilarityOutcome, SimilarityQuery,
    WeightedSimilarityEngine, DEFAULT_TOP_N,
};
use metricrec_storage::LoadedModels;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// The classification path handles a batch of one user
pub const USER_INDEX: &str = "0";

/// Request defaults
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub threshold: f32,
    pub top_n: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResponse {
    pub threshold: f32,
    pub metric_recommendations: BTreeMap<String, Vec<Recommendation>>,
}

/// Body of `POST /recommend`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendRequest {
    #[serde(default)]
    pub features: Option<String>,
    #[serde(default)]
    pub top_n: Option<u64>,
    #[serde(default)]
    pub affinity_mode: Option<AffinityMode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub corpus_profiles: usize,
    pub categories: usize,
    pub reduced_space: bool,
}

pub struct EngineContext {
    config: EngineConfig,
    normalizer: ProfileNormalizer,
    ensemble: ClassifierEnsemble,
    expander: AffinityExpander,
    collaborative: Box<dyn SimilarityEngine>,
    /// Corpus feature names; the collaborative query is reduced to these
    collaborative_features: Vec<String>,
    reduced: Option<Box<dyn SimilarityEngine>>,
}

impl EngineContext {
    pub fn new(
        config: EngineConfig,
        normalizer: ProfileNormalizer,
        ensemble: ClassifierEnsemble,
        catalog: Arc<MetricCatalog>,
        weighted: WeightedSimilarityEngine,
        reduced: Option<Box<dyn SimilarityEngine>>,
    ) -> Self {
        let collaborative_features = weighted
            .corpus()
            .features()
            .iter()
            .map(|f| f.name.clone())
            .collect();

        Self {
            config,
            normalizer,
            ensemble,
            expander: AffinityExpander::new(catalog),
            collaborative: Box::new(weighted),
            collaborative_features,
            reduced,
        }
    }

    pub fn from_models(models: LoadedModels, config: EngineConfig) -> Self {
        let reduced = models
            .reduced
            .map(|engine| Box::new(engine) as Box<dyn SimilarityEngine>);
        Self::new(
            config,
            models.normalizer,
            models.ensemble,
            models.catalog,
            models.weighted,
            reduced,
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn reduced_enabled(&self) -> bool {
        self.reduced.is_some()
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok",
            corpus_profiles: self.collaborative.corpus_len(),
            categories: self.ensemble.len(),
            reduced_space: self.reduced.is_some(),
        }
    }

    /// Classification path: normalize, classify per category, expand the
    /// categories at or above the threshold into metrics.
    pub fn recommend_multilabel(&self, body: &Value) -> Result<ClassificationResponse> {
        let object = as_object(body)?;

        let threshold = match object.get("threshold") {
            None | Some(Value::Null) => self.config.threshold,
            Some(value) => value
                .as_f64()
                .ok_or_else(|| Error::Validation("threshold must be a number".to_string()))?
                as f32,
        };

        let mut fields = object.clone();
        fields.remove("threshold");
        let profile = Profile::from_json_map(&fields);

        let vector = self.normalizer.normalize(&profile)?;
        let affinities = self.ensemble.classify(&vector)?;
        let recommendations = self.expander.expand(&affinities, threshold);

        let mut metric_recommendations = BTreeMap::new();
        metric_recommendations.insert(USER_INDEX.to_string(), recommendations);

        Ok(ClassificationResponse {
            threshold,
            metric_recommendations,
        })
    }

    /// Collaborative path over the weighted corpus
    pub fn recommend_collaborative(&self, body: &Value) -> Result<SimilarityOutcome> {
        let object = as_object(body)?;

        if let Some(missing) = collaborative_required_fields()
            .into_iter()
            .find(|field| !object.contains_key(field))
        {
            return Err(Error::required(&missing));
        }

        let top_n = self.parse_top_n(object)?;
        let weights = match object.get("feature_weights") {
            None | Some(Value::Null) => None,
            Some(value) => Some(FeatureWeights::from_json(value)?),
        };

        let profile = Profile::from_json_map(object).select(self.collaborative_features.as_slice());
        debug!("Collaborative query over {} features, top_n {}", profile.len(), top_n);

        let mut query = SimilarityQuery::profile(profile).top_n(top_n);
        if let Some(weights) = weights {
            query = query.weights(weights);
        }
        self.collaborative.find_similar(&query)
    }

    /// Reduced-space path from a free-text description
    pub fn recommend_reduced(&self, request: &RecommendRequest) -> Result<SimilarityOutcome> {
        let Some(engine) = self.reduced.as_ref() else {
            return Err(Error::InvalidConfig(
                "reduced-space recommendations are not enabled".to_string(),
            ));
        };

        let features = request
            .features
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::required("features"))?;

        let query = SimilarityQuery::text(features)
            .top_n(self.resolve_top_n(request.top_n)?)
            .affinity_mode(request.affinity_mode.unwrap_or_default());
        engine.find_similar(&query)
    }

    fn parse_top_n(&self, object: &Map<String, Value>) -> Result<usize> {
        match object.get("top_n") {
            None | Some(Value::Null) => Ok(self.config.top_n),
            Some(value) => match value.as_u64() {
                Some(n) => self.resolve_top_n(Some(n)),
                None => Err(top_n_error()),
            },
        }
    }

    fn resolve_top_n(&self, top_n: Option<u64>) -> Result<usize> {
        match top_n {
            None => Ok(self.config.top_n),
            Some(0) => Err(top_n_error()),
            Some(n) => Ok(usize::try_from(n).unwrap_or(usize::MAX)),
        }
    }
}

fn top_n_error() -> Error {
    Error::Validation("top_n must be a positive integer".to_string())
}

fn as_object(body: &Value) -> Result<&Map<String, Value>> {
    body.as_object()
        .ok_or_else(|| Error::Validation("request body must be a JSON object".to_string()))
}
