//! # metricrec Schema
//!
//! Canonical feature space for the classification path.
//!
//! A [`FeatureSchema`] lists the columns a trained model expects, which of
//! them are label columns, which request fields are one-hot encoded and
//! which request keys are copied under another column name. The
//! [`ProfileNormalizer`] turns any request profile into a [`SchemaVector`]
//! aligned to that schema.
//!
//! ```rust
//! use metricrec_core::Profile;
//! use metricrec_schema::{FeatureSchema, ProfileNormalizer};
//!
//! let schema = FeatureSchema::for_profile(&["Developer"], &["Small"], &["1-3"]);
//! let normalizer = ProfileNormalizer::new(schema).unwrap();
//!
//! let profile = Profile::new().with("role", "Developer").with("agile_methods_scrum", 1.0);
//! let vector = normalizer.normalize(&profile).unwrap();
//! assert_eq!(vector.to_numeric().unwrap()[0], 1.0);
//! ```

pub mod normalize;
pub mod schema;

pub use normalize::{ProfileNormalizer, SchemaVector};
pub use schema::{FeatureDef, FeatureKind, FeatureSchema, SchemaError};
