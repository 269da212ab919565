//! One independent classifier per metric category.
//!
//! This is a multi-label problem: affinities are independent and need not
//! sum to one.

use crate::classifier::Classifier;
use metricrec_core::{Category, Error, Result};
use metricrec_schema::SchemaVector;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Affinity of a profile to one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryAffinity {
    pub category: Category,
    pub affinity: f32,
}

/// Per-category affinities, in ensemble order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryAffinities(Vec<CategoryAffinity>);

impl CategoryAffinities {
    pub fn new(affinities: Vec<CategoryAffinity>) -> Self {
        Self(affinities)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryAffinity> {
        self.0.iter()
    }

    pub fn get(&self, column: &str) -> Option<f32> {
        self.0
            .iter()
            .find(|a| a.category.column == column)
            .map(|a| a.affinity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub struct ClassifierEnsemble {
    members: Vec<(Category, Arc<dyn Classifier>)>,
}

impl ClassifierEnsemble {
    /// Pair each category with its classifier, keyed by category column.
    /// A category without a classifier is a configuration error.
    pub fn new(
        categories: &[Category],
        mut classifiers: HashMap<String, Arc<dyn Classifier>>,
    ) -> Result<Self> {
        let members = categories
            .iter()
            .map(|category| {
                classifiers
                    .remove(category.column)
                    .map(|model| (*category, model))
                    .ok_or_else(|| {
                        Error::ModelLoad(format!("no classifier for category '{}'", category.column))
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { members })
    }

    /// Check every classifier that declares an input width against `width`
    pub fn check_input_dim(&self, width: usize) -> Result<()> {
        for (category, model) in &self.members {
            if let Some(expected) = model.input_dim() {
                if expected != width {
                    return Err(Error::ModelLoad(format!(
                        "classifier '{}' expects {} inputs, schema provides {}",
                        category.column, expected, width
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.members.iter().map(|(c, _)| c)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Run every classifier on the normalized profile
    pub fn classify(&self, input: &SchemaVector) -> Result<CategoryAffinities> {
        let features = input.to_numeric()?;

        let affinities = self
            .members
            .iter()
            .map(|(category, model)| {
                let p = model.predict_proba(&features)?;
                let affinity = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
                debug!("Affinity for {}: {}", category.column, affinity);
                Ok(CategoryAffinity { category: *category, affinity })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CategoryAffinities(affinities))
    }
}

impl std::fmt::Debug for ClassifierEnsemble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.members.iter().map(|(c, _)| c.column))
            .finish()
    }
}
