//! # metricrec
//!
//! Recommends software-process metrics to agile teams from a short profile
//! (role, organization size, experience, ceremonies that use metrics, agile
//! methods, categories of interest).
//!
//! Two recommendation paths are offered:
//!
//! - **Classification**: one binary classifier per metric category scores the
//!   normalized profile; categories at or above a threshold are expanded into
//!   their catalog metrics.
//! - **Collaborative**: the profile is compared with a reference corpus of
//!   historical profiles by weighted multi-feature cosine similarity (or, in
//!   the alternate deployment, a single cosine in a reduced text space), and
//!   the neighbours' metrics are reported.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! metricrec --model-dir ./models --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use metricrec::prelude::*;
//!
//! let models = ModelStore::new("./models").load().unwrap();
//! let context = EngineContext::from_models(models, EngineConfig::default());
//!
//! let response = context
//!     .recommend_multilabel(&serde_json::json!({"role": "Developer", "threshold": 0.6}))
//!     .unwrap();
//! println!("{:?}", response.metric_recommendations);
//! ```
//!
//! ## Crate Structure
//!
//! - `metricrec-core` - profiles, catalog, vectors, TF-IDF and SVD, errors
//! - `metricrec-schema` - feature schema and profile normalization
//! - `metricrec-classify` - category classifiers and affinity expansion
//! - `metricrec-similarity` - weighted and reduced-space similarity engines
//! - `metricrec-storage` - model directory loading
//! - `metricrec-api` - engine context and REST API

// Re-export core types
pub use metricrec_core::{
    Error, FeatureValue, MetricCatalog, MetricEntry, Profile, Recommendation, Result,
    TfidfVectorizer, TruncatedSvd, Vector, CATEGORIES,
};

pub use metricrec_schema::{FeatureDef, FeatureKind, FeatureSchema, ProfileNormalizer};

pub use metricrec_classify::{AffinityExpander, ClassifierEnsemble, LogisticClassifier};

pub use metricrec_similarity::{
    AffinityMode, Corpus, CorpusProfile, FeatureWeights, ReducedSpaceEngine, SimilarityEngine,
    SimilarityOutcome, SimilarityQuery, WeightedSimilarityEngine,
};

// Re-export storage
pub use metricrec_storage::ModelStore;

// Re-export API
pub use metricrec_api::{EngineConfig, EngineContext, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AffinityMode, EngineConfig, EngineContext, Error, FeatureWeights, MetricCatalog,
        ModelStore, Profile, Recommendation, Result, SimilarityEngine, SimilarityOutcome,
        SimilarityQuery,
    };
}
