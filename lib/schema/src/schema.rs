//! Feature schema definitions
//!
//! The schema is the canonical, ordered list of columns a trained model
//! expects. It is constructed once from the model directory and validated
//! up front, so normalization never has to infer columns from the request.

use metricrec_core::domain::{AGILE_METHOD_COLUMNS, CATEGORIES, ONE_HOT_FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Feature schema version 1
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureSchema {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Training columns, in model order
    pub columns: Vec<FeatureDef>,

    /// Target columns that must never reach inference input
    #[serde(default)]
    pub label_columns: Vec<String>,

    /// Request fields expanded into `{field}_{value}` indicator columns
    #[serde(default)]
    pub one_hot_fields: Vec<String>,

    /// Request key -> column copied through under a different name
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    1
}

impl FeatureSchema {
    /// Create a schema over the given columns with no labels, one-hot
    /// fields or renames
    pub fn new(columns: Vec<FeatureDef>) -> Self {
        Self {
            version: 1,
            columns,
            label_columns: Vec::new(),
            one_hot_fields: Vec::new(),
            renames: BTreeMap::new(),
        }
    }

    /// The standard profile layout: one-hot columns for role, organization
    /// size and experience, the meeting-usage flags, one column per agile
    /// method and the six category label columns.
    pub fn for_profile(roles: &[&str], org_sizes: &[&str], years_exp: &[&str]) -> Self {
        let one_hot = |field: &str, values: &[&str]| -> Vec<FeatureDef> {
            values
                .iter()
                .map(|v| FeatureDef::binary(format!("{}_{}", field, v)))
                .collect()
        };

        let mut columns = Vec::new();
        columns.extend(one_hot("role", roles));
        columns.extend(one_hot("org_size", org_sizes));
        columns.extend(one_hot("years_exp", years_exp));
        for flag in ["planning", "review", "weekly", "daily", "retro"] {
            columns.push(FeatureDef::binary(format!("use_metrics_{}", flag)));
        }
        for (_, column) in AGILE_METHOD_COLUMNS {
            columns.push(FeatureDef::binary(column));
        }
        for category in CATEGORIES {
            columns.push(FeatureDef::binary(category.column));
        }

        Self {
            version: 1,
            columns,
            label_columns: CATEGORIES.iter().map(|c| c.column.to_string()).collect(),
            one_hot_fields: ONE_HOT_FIELDS.iter().map(|f| f.to_string()).collect(),
            renames: AGILE_METHOD_COLUMNS
                .iter()
                .map(|(key, column)| (key.to_string(), column.to_string()))
                .collect(),
        }
    }

    pub fn with_labels<S: Into<String>>(mut self, labels: impl IntoIterator<Item = S>) -> Self {
        self.label_columns = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_one_hot<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.one_hot_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Validate the schema
    /// - at least one column, no duplicate names
    /// - at least one column left once labels are removed
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn(column.name.clone()));
            }
        }

        if self.inference_columns().next().is_none() {
            return Err(SchemaError::NoInferenceColumns);
        }

        Ok(())
    }

    pub fn is_label(&self, name: &str) -> bool {
        self.label_columns.iter().any(|l| l == name)
    }

    /// Columns fed to the classifiers, in schema order
    pub fn inference_columns(&self) -> impl Iterator<Item = &FeatureDef> {
        self.columns.iter().filter(move |c| !self.is_label(&c.name))
    }

    pub fn inference_len(&self) -> usize {
        self.inference_columns().count()
    }
}

/// A single column of the schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureDef {
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: FeatureKind,
}

impl FeatureDef {
    pub fn text(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FeatureKind::Text }
    }

    pub fn binary(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FeatureKind::Binary }
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: FeatureKind::Numeric }
    }
}

/// Column kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    /// Free text, compared through a fitted vectorizer. Defaults to `""`.
    Text,
    /// 0/1 indicator. Defaults to 0.
    #[default]
    Binary,
    /// Any other number. Defaults to 0.
    Numeric,
}

impl FeatureKind {
    pub fn is_text(self) -> bool {
        self == FeatureKind::Text
    }
}

/// Errors raised while validating a schema or normalizing against it
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("Schema has no columns left after removing labels")]
    NoInferenceColumns,

    #[error("Normalized columns differ from the schema (missing: {missing:?}, extra: {extra:?})")]
    Mismatch {
        missing: Vec<String>,
        extra: Vec<String>,
    },

    #[error("Column '{0}' holds text where a number is required")]
    NonNumeric(String),
}

impl From<SchemaError> for metricrec_core::Error {
    fn from(e: SchemaError) -> Self {
        metricrec_core::Error::SchemaMismatch(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_layout() {
        let schema = FeatureSchema::for_profile(&["Developer"], &["Small"], &["1-3"]);
        schema.validate().unwrap();

        assert_eq!(schema.columns[0].name, "role_Developer");
        assert_eq!(schema.columns.len(), 3 + 5 + 6 + 6);
        assert_eq!(schema.inference_len(), 3 + 5 + 6);
        assert!(schema.is_label("metrics_category_produto"));
        assert_eq!(schema.renames.get("agile_methods_scrumban").map(String::as_str), Some("ScrumBan"));
    }

    #[test]
    fn test_empty_schema_error() {
        assert_eq!(FeatureSchema::new(Vec::new()).validate(), Err(SchemaError::EmptySchema));
    }

    #[test]
    fn test_duplicate_column_error() {
        let schema = FeatureSchema::new(vec![FeatureDef::binary("a"), FeatureDef::binary("a")]);
        assert_eq!(schema.validate(), Err(SchemaError::DuplicateColumn("a".into())));
    }

    #[test]
    fn test_only_labels_error() {
        let schema = FeatureSchema::new(vec![FeatureDef::binary("label")]).with_labels(["label"]);
        assert_eq!(schema.validate(), Err(SchemaError::NoInferenceColumns));
    }

    #[test]
    fn test_serde_defaults() {
        let schema: FeatureSchema = serde_json::from_str(
            r#"{"columns": [{"name": "role_Developer"}, {"name": "bio", "type": "text"}]}"#,
        )
        .unwrap();

        assert_eq!(schema.version, 1);
        assert_eq!(schema.columns[0].kind, FeatureKind::Binary);
        assert_eq!(schema.columns[1].kind, FeatureKind::Text);
        assert!(schema.label_columns.is_empty());
    }
}
