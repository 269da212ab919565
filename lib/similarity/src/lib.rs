//! # metricrec Similarity
//!
//! Collaborative recommendation: find the reference profiles most similar
//! to a user and report the metrics they were matched to.
//!
//! Two corpus representations sit behind one [`SimilarityEngine`]
//! capability:
//!
//! - [`WeightedSimilarityEngine`]: per-feature cosine similarity summed
//!   with configurable [`FeatureWeights`]
//! - [`ReducedSpaceEngine`]: a single cosine in a text-vectorized,
//!   dimensionality-reduced space, with a minimum-similarity cut-off
//!
//! ```rust
//! use metricrec_core::{MetricCatalog, MetricEntry, Profile};
//! use metricrec_schema::FeatureDef;
//! use metricrec_similarity::{
//!     Corpus, CorpusProfile, FeatureWeights, SimilarityEngine, SimilarityQuery,
//!     WeightedSimilarityEngine,
//! };
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! let corpus = Corpus::new(
//!     vec![FeatureDef::binary("agile_methods_scrum")],
//!     vec![CorpusProfile::new(
//!         0,
//!         Profile::new().with("agile_methods_scrum", 1.0),
//!         Some("Velocity".to_string()),
//!     )],
//! )
//! .unwrap();
//! let catalog = MetricCatalog::new(
//!     vec![MetricEntry { name: "Velocity".into(), description: "Points per sprint".into() }],
//!     Vec::<(String, Vec<Option<String>>)>::new(),
//! );
//!
//! let engine = WeightedSimilarityEngine::new(
//!     Arc::new(corpus),
//!     &HashMap::new(),
//!     FeatureWeights::profile_defaults(),
//!     Arc::new(catalog),
//! )
//! .unwrap();
//!
//! let query = SimilarityQuery::profile(Profile::new().with("agile_methods_scrum", 1.0));
//! let outcome = engine.find_similar(&query).unwrap();
//! assert_eq!(outcome.recommendations().unwrap()[0].metric, "Velocity");
//! ```

pub mod corpus;
pub mod engine;
pub mod reduced;
pub mod weighted;
pub mod weights;

pub use corpus::{Corpus, CorpusProfile};
pub use engine::{
    AffinityMode, QueryInput, SimilarityEngine, SimilarityOutcome, SimilarityQuery, DEFAULT_TOP_N,
};
pub use reduced::{ReducedProfile, ReducedSpaceEngine, DEFAULT_MIN_SIMILARITY, NO_MATCH_MESSAGE};
pub use weighted::{WeightedSimilarityEngine, MAX_AFFINITY};
pub use weights::{FeatureWeights, DEFAULT_FEATURE_WEIGHT};
