//! Text vectorization
//!
//! The engine never trains vectorizers; it loads fitted ones. The
//! [`TextVectorizer`] capability lets the similarity engines stay agnostic
//! of the concrete model, and [`TfidfVectorizer`] is the fitted TF-IDF model
//! the artifact documents describe.

use crate::{Error, Result, Vector};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A pre-fitted text vectorizer: maps a document to a fixed-size vector
pub trait TextVectorizer: Send + Sync + std::fmt::Debug {
    /// Output dimension
    fn dim(&self) -> usize;

    /// Vectorize a single document
    fn transform(&self, text: &str) -> Vector;
}

/// Fitted TF-IDF model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// term -> column
    vocabulary: HashMap<String, usize>,
    /// inverse document frequency per column
    idf: Vec<f32>,
    /// use `1 + ln(tf)` instead of raw counts
    #[serde(default)]
    sublinear_tf: bool,
}

impl TfidfVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>, idf: Vec<f32>) -> Result<Self> {
        let vectorizer = Self {
            vocabulary,
            idf,
            sublinear_tf: false,
        };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Fit a vocabulary with smoothed idf: `ln((1 + n) / (1 + df)) + 1`.
    /// Columns follow the lexicographic order of the terms.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut doc_freq: BTreeMap<String, u32> = BTreeMap::new();
        for doc in documents {
            let terms: BTreeSet<String> = Self::tokenize(doc.as_ref()).into_iter().collect();
            for term in terms {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n = documents.len() as f32;
        let mut vocabulary = HashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());
        for (column, (term, df)) in doc_freq.into_iter().enumerate() {
            vocabulary.insert(term, column);
            idf.push(((1.0 + n) / (1.0 + df as f32)).ln() + 1.0);
        }

        Self {
            vocabulary,
            idf,
            sublinear_tf: false,
        }
    }

    /// Lowercase, split on anything that is not alphanumeric or `_`, and
    /// drop single-character tokens
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().count() > 1)
            .map(str::to_string)
            .collect()
    }

    /// Check that every vocabulary column has an idf entry
    pub fn validate(&self) -> Result<()> {
        if let Some((term, &column)) = self
            .vocabulary
            .iter()
            .find(|(_, &column)| column >= self.idf.len())
        {
            return Err(Error::ModelLoad(format!(
                "term '{}' maps to column {} but idf has {} entries",
                term,
                column,
                self.idf.len()
            )));
        }
        Ok(())
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn dim(&self) -> usize {
        self.idf.len()
    }

    fn transform(&self, text: &str) -> Vector {
        let mut counts = vec![0.0f32; self.idf.len()];
        for token in Self::tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                counts[column] += 1.0;
            }
        }

        for (value, idf) in counts.iter_mut().zip(self.idf.iter()) {
            if *value > 0.0 {
                let tf = if self.sublinear_tf { 1.0 + value.ln() } else { *value };
                *value = tf * idf;
            }
        }

        let mut vector = Vector::new(counts);
        vector.normalize();
        vector
    }
}
