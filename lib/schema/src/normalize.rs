//! Profile normalization
//!
//! Maps an arbitrary request profile onto the schema: every column present,
//! in schema order, defaults for anything the request left out, label
//! columns removed. Unknown request keys and unknown one-hot values are
//! ignored silently.

use crate::schema::{FeatureKind, FeatureSchema, SchemaError};
use ahash::AHashMap;
use metricrec_core::{FeatureValue, Profile};
use tracing::debug;

/// A profile aligned to the inference columns of a schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaVector {
    names: Vec<String>,
    values: Vec<FeatureValue>,
}

impl SchemaVector {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.values[i])
    }

    /// Dense numeric view for the classifiers
    pub fn to_numeric(&self) -> Result<Vec<f32>, SchemaError> {
        self.names
            .iter()
            .zip(self.values.iter())
            .map(|(name, value)| match value {
                FeatureValue::Number(n) => Ok(*n as f32),
                FeatureValue::Text(_) => Err(SchemaError::NonNumeric(name.clone())),
            })
            .collect()
    }
}

/// Aligns request profiles to a [`FeatureSchema`]
#[derive(Debug, Clone)]
pub struct ProfileNormalizer {
    schema: FeatureSchema,
    positions: AHashMap<String, usize>,
}

impl ProfileNormalizer {
    pub fn new(schema: FeatureSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        let positions = schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.name.clone(), i))
            .collect();
        Ok(Self { schema, positions })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// The all-default vector: `""` for text columns, 0 otherwise
    pub fn default_vector(&self) -> SchemaVector {
        let (names, values) = self
            .schema
            .inference_columns()
            .map(|c| (c.name.clone(), default_value(c.kind)))
            .unzip();
        SchemaVector { names, values }
    }

    /// Normalize a request profile
    pub fn normalize(&self, raw: &Profile) -> Result<SchemaVector, SchemaError> {
        let mut aligned: Vec<FeatureValue> = self
            .schema
            .columns
            .iter()
            .map(|c| default_value(c.kind))
            .collect();

        // keys that already name a column
        for (key, value) in raw.iter() {
            if let Some(&i) = self.positions.get(key) {
                aligned[i] = coerce(value, self.schema.columns[i].kind);
            }
        }

        for field in &self.schema.one_hot_fields {
            if let Some(value) = raw.get(field) {
                let column = format!("{}_{}", field, value.as_text());
                match self.positions.get(&column) {
                    Some(&i) => aligned[i] = FeatureValue::Number(1.0),
                    None => debug!("No one-hot column '{}'", column),
                }
            }
        }

        for (key, column) in &self.schema.renames {
            if let (Some(value), Some(&i)) = (raw.get(key), self.positions.get(column)) {
                aligned[i] = coerce(value, self.schema.columns[i].kind);
            }
        }

        let (names, values): (Vec<String>, Vec<FeatureValue>) = self
            .schema
            .columns
            .iter()
            .zip(aligned)
            .filter(|(c, _)| !self.schema.is_label(&c.name))
            .map(|(c, v)| (c.name.clone(), v))
            .unzip();

        self.check_columns(&names)?;
        Ok(SchemaVector { names, values })
    }

    fn check_columns(&self, names: &[String]) -> Result<(), SchemaError> {
        let expected: Vec<&str> = self.schema.inference_columns().map(|c| c.name.as_str()).collect();
        if expected.len() == names.len() && expected.iter().zip(names).all(|(e, n)| *e == n) {
            return Ok(());
        }

        let missing = expected
            .iter()
            .filter(|e| !names.iter().any(|n| n == *e))
            .map(|e| e.to_string())
            .collect();
        let extra = names
            .iter()
            .filter(|n| !expected.contains(&n.as_str()))
            .cloned()
            .collect();
        Err(SchemaError::Mismatch { missing, extra })
    }
}

fn default_value(kind: FeatureKind) -> FeatureValue {
    match kind {
        FeatureKind::Text => FeatureValue::Text(String::new()),
        FeatureKind::Binary | FeatureKind::Numeric => FeatureValue::Number(0.0),
    }
}

fn coerce(value: &FeatureValue, kind: FeatureKind) -> FeatureValue {
    match kind {
        FeatureKind::Text => FeatureValue::Text(value.as_text().into_owned()),
        FeatureKind::Binary | FeatureKind::Numeric => {
            FeatureValue::Number(value.as_number().unwrap_or(0.0))
        }
    }
}
