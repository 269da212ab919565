//! # metricrec Core
//!
//! Core types for the metricrec recommendation engine.
//!
//! - [`Profile`] / [`FeatureValue`] - a user's declared attributes
//! - [`MetricCatalog`] - metric descriptions and category -> metric lists
//! - [`Recommendation`] - the per-request output record
//! - [`Vector`] - dense vectors with cosine similarity
//! - [`TextVectorizer`] / [`TfidfVectorizer`] - fitted text vectorization
//! - [`DimensionReducer`] / [`TruncatedSvd`] - fitted projection
//!
//! ## Example
//!
//! ```rust
//! use metricrec_core::{TextVectorizer, TfidfVectorizer};
//!
//! let vectorizer = TfidfVectorizer::fit(&["developer", "scrum master"]);
//! let a = vectorizer.transform("Scrum Master");
//! let b = vectorizer.transform("scrum master");
//! assert!((a.cosine_similarity(&b) - 1.0).abs() < 1e-6);
//! ```

pub mod catalog;
pub mod domain;
pub mod error;
pub mod profile;
pub mod recommendation;
pub mod reducer;
pub mod text;
pub mod vector;

pub use catalog::{CatalogDocument, MetricCatalog, MetricEntry};
pub use domain::{Category, CATEGORIES};
pub use error::{Error, Result};
pub use profile::{FeatureValue, Profile};
pub use recommendation::Recommendation;
pub use reducer::{DimensionReducer, TruncatedSvd};
pub use text::{TextVectorizer, TfidfVectorizer};
pub use vector::Vector;
