//! On-disk JSON documents of a model directory

use metricrec_core::{TfidfVectorizer, TruncatedSvd};
use metricrec_schema::FeatureDef;
use metricrec_similarity::{FeatureWeights, DEFAULT_MIN_SIMILARITY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const SCHEMA_FILE: &str = "schema.json";
pub const CATALOG_FILE: &str = "catalog.json";
pub const CORPUS_FILE: &str = "corpus.json";
pub const REDUCED_FILE: &str = "reduced.json";
pub const CLASSIFIER_DIR: &str = "classifiers";

/// `corpus.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub features: Vec<FeatureDef>,
    /// Replaces the built-in default table when present
    #[serde(default)]
    pub weights: Option<FeatureWeights>,
    /// One fitted vectorizer per text feature
    #[serde(default)]
    pub vectorizers: HashMap<String, TfidfVectorizer>,
    pub profiles: Vec<CorpusProfileDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusProfileDocument {
    pub id: i64,
    pub values: Map<String, Value>,
    #[serde(default)]
    pub matched_metrics: Option<String>,
}

/// `reduced.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReducedDocument {
    pub vectorizer: TfidfVectorizer,
    pub reducer: TruncatedSvd,
    #[serde(default)]
    pub fields: Vec<FeatureDef>,
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f32,
    pub profiles: Vec<ReducedProfileDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReducedProfileDocument {
    pub id: i64,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub metric: Option<String>,
}

fn default_min_similarity() -> f32 {
    DEFAULT_MIN_SIMILARITY
}
