//! # metricrec Classify
//!
//! The classification recommendation path.
//!
//! 1. [`ClassifierEnsemble`] runs one binary [`Classifier`] per metric
//!    category over a normalized profile, producing [`CategoryAffinities`].
//! 2. [`AffinityExpander`] keeps the categories at or above a threshold and
//!    expands them into concrete metric [`Recommendation`](metricrec_core::Recommendation)s.
//!
//! ```rust
//! use metricrec_classify::{AffinityExpander, CategoryAffinities, CategoryAffinity};
//! use metricrec_core::{MetricCatalog, MetricEntry, CATEGORIES};
//! use std::sync::Arc;
//!
//! let catalog = MetricCatalog::new(
//!     vec![MetricEntry { name: "NPS".into(), description: "Net promoter score".into() }],
//!     vec![("Cliente".to_string(), vec![Some("NPS".to_string())])],
//! );
//! let expander = AffinityExpander::new(Arc::new(catalog));
//!
//! let affinities = CategoryAffinities::new(vec![CategoryAffinity {
//!     category: CATEGORIES[5],
//!     affinity: 0.8,
//! }]);
//! let recs = expander.expand(&affinities, 0.5);
//! assert_eq!(recs[0].metric, "NPS");
//! ```

pub mod classifier;
pub mod ensemble;
pub mod expander;

pub use classifier::{Classifier, LogisticClassifier};
pub use ensemble::{CategoryAffinities, CategoryAffinity, ClassifierEnsemble};
pub use expander::{AffinityExpander, DEFAULT_THRESHOLD};
