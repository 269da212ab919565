//! Per-feature weights for the weighted similarity engine
//!
//! The default table is shared, read-only state. Every similarity
//! computation works on its own clone because binary features present in
//! the query get their weight doubled for that call.

use metricrec_core::domain::{AGILE_METHODS, CATEGORIES};
use metricrec_core::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Weight of a feature absent from the table
pub const DEFAULT_FEATURE_WEIGHT: f32 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureWeights(BTreeMap<String, f32>);

impl FeatureWeights {
    pub fn new(weights: BTreeMap<String, f32>) -> Result<Self> {
        let weights = Self(weights);
        weights.validate()?;
        Ok(weights)
    }

    /// Default table for the collaborative profile features:
    ///
    /// | feature | weight |
    /// |---|---|
    /// | `role` | 2.0 |
    /// | `years_exp`, `org_size` | 1.0 |
    /// | `use_metrics_*` | 0.5 |
    /// | `agile_methods_*` | 1.0 |
    /// | `metrics_category_*` | 1.5 |
    pub fn profile_defaults() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert("role".to_string(), 2.0);
        weights.insert("years_exp".to_string(), 1.0);
        weights.insert("org_size".to_string(), 1.0);
        for flag in ["planning", "review", "weekly", "daily", "retro"] {
            weights.insert(format!("use_metrics_{}", flag), 0.5);
        }
        for method in AGILE_METHODS {
            weights.insert(format!("agile_methods_{}", method), 1.0);
        }
        for category in CATEGORIES {
            weights.insert(category.column.to_string(), 1.5);
        }
        Self(weights)
    }

    /// Parse a request override. The value must be an object of
    /// non-negative numbers.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::Validation("feature_weights must be an object".to_string()))?;

        let weights = object
            .iter()
            .map(|(name, w)| {
                w.as_f64()
                    .filter(|w| w.is_finite() && *w >= 0.0)
                    .map(|w| (name.clone(), w as f32))
                    .ok_or_else(|| {
                        Error::Validation(format!(
                            "feature_weights.{} must be a non-negative number",
                            name
                        ))
                    })
            })
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(Self(weights))
    }

    pub fn validate(&self) -> Result<()> {
        match self.0.iter().find(|(_, w)| !w.is_finite() || **w < 0.0) {
            Some((name, w)) => Err(Error::InvalidConfig(format!(
                "feature '{}' has invalid weight {}",
                name, w
            ))),
            None => Ok(()),
        }
    }

    pub fn get(&self, name: &str) -> f32 {
        self.0.get(name).copied().unwrap_or(DEFAULT_FEATURE_WEIGHT)
    }

    /// Double a feature's weight in this copy
    pub fn amplify(&mut self, name: &str) {
        let weight = self.get(name) * 2.0;
        self.0.insert(name.to_string(), weight);
    }

    /// A new table with `overrides` applied on top of `self`
    pub fn merged(&self, overrides: &FeatureWeights) -> FeatureWeights {
        let mut merged = self.clone();
        for (name, weight) in &overrides.0 {
            merged.0.insert(name.clone(), *weight);
        }
        merged
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_feature_defaults_to_one() {
        let weights = FeatureWeights::default();
        assert_eq!(weights.get("role"), DEFAULT_FEATURE_WEIGHT);
    }

    #[test]
    fn test_profile_defaults_cover_required_fields() {
        let weights = FeatureWeights::profile_defaults();
        assert_eq!(weights.len(), 20);
        assert_eq!(weights.get("role"), 2.0);
        assert_eq!(weights.get("use_metrics_retro"), 0.5);
        assert_eq!(weights.get("metrics_category_cliente"), 1.5);
    }

    #[test]
    fn test_amplify_only_touches_the_copy() {
        let defaults = FeatureWeights::profile_defaults();
        let mut copy = defaults.clone();
        copy.amplify("agile_methods_scrum");
        copy.amplify("unknown");

        assert_eq!(copy.get("agile_methods_scrum"), 2.0);
        assert_eq!(copy.get("unknown"), 2.0);
        assert_eq!(defaults.get("agile_methods_scrum"), 1.0);
    }

    #[test]
    fn test_merged_overrides() {
        let defaults = FeatureWeights::profile_defaults();
        let overrides = FeatureWeights::from_json(&json!({"role": 0.25, "custom": 3})).unwrap();
        let merged = defaults.merged(&overrides);

        assert_eq!(merged.get("role"), 0.25);
        assert_eq!(merged.get("custom"), 3.0);
        assert_eq!(merged.get("org_size"), 1.0);
        assert_eq!(defaults.get("role"), 2.0);
    }

    #[test]
    fn test_from_json_rejects_bad_input() {
        assert!(matches!(
            FeatureWeights::from_json(&json!([1, 2])),
            Err(Error::Validation(_))
        ));
        let err = FeatureWeights::from_json(&json!({"role": -1})).unwrap_err();
        assert_eq!(err.to_string(), "feature_weights.role must be a non-negative number");
        assert!(FeatureWeights::from_json(&json!({"role": "heavy"})).is_err());
    }

    #[test]
    fn test_new_rejects_negative_weight() {
        let table = BTreeMap::from([("role".to_string(), -0.5)]);
        assert!(matches!(FeatureWeights::new(table), Err(Error::InvalidConfig(_))));
    }
}
