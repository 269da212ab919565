//! Reference corpus of historical profiles
//!
//! Loaded once at startup and never mutated; engines hold it behind an `Arc`.

use metricrec_core::{Error, Profile, Result};
use metricrec_schema::FeatureDef;
use std::collections::HashSet;

/// A historical profile and the metric it was matched to
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusProfile {
    /// Opaque identifier reported as `similar_profile_index`
    pub id: i64,
    pub values: Profile,
    pub matched_metric: Option<String>,
}

impl CorpusProfile {
    pub fn new(id: i64, values: Profile, matched_metric: Option<String>) -> Self {
        Self { id, values, matched_metric }
    }
}

#[derive(Debug, Clone)]
pub struct Corpus {
    features: Vec<FeatureDef>,
    profiles: Vec<CorpusProfile>,
}

impl Corpus {
    pub fn new(features: Vec<FeatureDef>, profiles: Vec<CorpusProfile>) -> Result<Self> {
        if features.is_empty() {
            return Err(Error::ModelLoad("corpus declares no features".to_string()));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = features.iter().find(|f| !seen.insert(f.name.as_str())) {
            return Err(Error::ModelLoad(format!(
                "corpus feature '{}' declared twice",
                dup.name
            )));
        }

        Ok(Self { features, profiles })
    }

    pub fn features(&self) -> &[FeatureDef] {
        &self.features
    }

    pub fn profiles(&self) -> &[CorpusProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// The first declared feature the query does not carry
    pub fn first_missing_feature(&self, query: &Profile) -> Option<&str> {
        self.features
            .iter()
            .map(|f| f.name.as_str())
            .find(|name| !query.contains(name))
    }
}
