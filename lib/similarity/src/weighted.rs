//! Weighted multi-feature similarity (collaborative path)
//!
//! The query is scored against every corpus profile feature by feature:
//! text features through their fitted vectorizer, scalar features as
//! one-dimensional vectors. Per-feature cosine similarities are summed
//! with the feature weights, and the metrics of the best neighbours are
//! reported.

use crate::corpus::Corpus;
use crate::engine::{QueryInput, SimilarityEngine, SimilarityOutcome, SimilarityQuery};
use crate::weights::FeatureWeights;
use metricrec_core::{
    Error, FeatureValue, MetricCatalog, Profile, Recommendation, Result, TextVectorizer, Vector,
};
use metricrec_schema::FeatureKind;
use ordered_float::OrderedFloat;
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Highest affinity reported for a neighbour
pub const MAX_AFFINITY: f32 = 100.0;

/// Corpus column, prepared once at construction
enum FeatureColumn {
    Text {
        vectorizer: Arc<dyn TextVectorizer>,
        rows: Vec<Vector>,
    },
    Scalar {
        rows: Vec<f32>,
    },
}

pub struct WeightedSimilarityEngine {
    corpus: Arc<Corpus>,
    columns: Vec<FeatureColumn>,
    default_weights: FeatureWeights,
    catalog: Arc<MetricCatalog>,
}

impl WeightedSimilarityEngine {
    /// Prepare the engine. Every text feature of the corpus needs a fitted
    /// vectorizer; corpus rows are vectorized here, once.
    pub fn new(
        corpus: Arc<Corpus>,
        vectorizers: &HashMap<String, Arc<dyn TextVectorizer>>,
        default_weights: FeatureWeights,
        catalog: Arc<MetricCatalog>,
    ) -> Result<Self> {
        default_weights.validate()?;

        let columns = corpus
            .features()
            .iter()
            .map(|feature| match feature.kind {
                FeatureKind::Text => {
                    let vectorizer = vectorizers.get(&feature.name).cloned().ok_or_else(|| {
                        Error::ModelLoad(format!(
                            "no vectorizer for text feature '{}'",
                            feature.name
                        ))
                    })?;
                    let rows = corpus
                        .profiles()
                        .iter()
                        .map(|p| vectorizer.transform(&text_value(p.values.get(&feature.name))))
                        .collect();
                    Ok(FeatureColumn::Text { vectorizer, rows })
                }
                FeatureKind::Binary | FeatureKind::Numeric => {
                    let rows = corpus
                        .profiles()
                        .iter()
                        .map(|p| scalar_value(p.values.get(&feature.name)))
                        .collect();
                    Ok(FeatureColumn::Scalar { rows })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Weighted similarity engine ready: {} profiles, {} features",
            corpus.len(),
            corpus.features().len()
        );

        Ok(Self {
            corpus,
            columns,
            default_weights,
            catalog,
        })
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn default_weights(&self) -> &FeatureWeights {
        &self.default_weights
    }

    /// Weighted similarity of `query` to every corpus row.
    ///
    /// The returned vector has one extra trailing slot for the query
    /// itself, always `-1.0` so it can never rank as its own neighbour.
    /// A scalar feature whose query value is 1 has its weight doubled for
    /// this call only.
    pub fn total_similarity(
        &self,
        query: &Profile,
        overrides: Option<&FeatureWeights>,
    ) -> Result<Vec<f32>> {
        if let Some(missing) = self.corpus.first_missing_feature(query) {
            return Err(Error::IncompleteProfile(missing.to_string()));
        }

        let mut weights = match overrides {
            Some(overrides) => self.default_weights.merged(overrides),
            None => self.default_weights.clone(),
        };

        let n = self.corpus.len();
        let mut total = vec![0.0f32; n + 1];

        for (feature, column) in self.corpus.features().iter().zip(&self.columns) {
            let value = query.get(&feature.name);
            let (query_vector, rows): (Vector, Cow<'_, [Vector]>) = match column {
                FeatureColumn::Text { vectorizer, rows } => {
                    (vectorizer.transform(&text_value(value)), Cow::Borrowed(rows.as_slice()))
                }
                FeatureColumn::Scalar { rows } => {
                    let q = scalar_value(value);
                    if q == 1.0 {
                        weights.amplify(&feature.name);
                    }
                    let rows = rows.iter().map(|r| Vector::scalar(*r)).collect();
                    (Vector::scalar(q), Cow::Owned(rows))
                }
            };

            let weight = weights.get(&feature.name);
            for (score, row) in total.iter_mut().zip(rows.iter()) {
                *score += query_vector.cosine_similarity(row) * weight;
            }
            total[n] += query_vector.cosine_similarity(&query_vector) * weight;
        }

        total[n] = -1.0;
        Ok(total)
    }

    /// Metrics of the nearest neighbours, best first.
    ///
    /// Neighbours without a metric are skipped, as are metrics already
    /// reported; the scan stops once `top_n` distinct metrics are found or
    /// the corpus runs out.
    pub fn recommend(
        &self,
        query: &Profile,
        top_n: usize,
        overrides: Option<&FeatureWeights>,
    ) -> Result<Vec<Recommendation>> {
        let total = self.total_similarity(query, overrides)?;
        let query_index = self.corpus.len();

        // stable sort: equal scores keep corpus order
        let mut ranked: Vec<usize> = (0..total.len()).collect();
        ranked.sort_by_key(|&i| Reverse(OrderedFloat(total[i])));

        let mut recommendations: Vec<Recommendation> = Vec::with_capacity(top_n.min(self.corpus.len()));
        for i in ranked {
            if recommendations.len() >= top_n {
                break;
            }
            if i == query_index {
                continue;
            }

            let profile = &self.corpus.profiles()[i];
            let Some(metric) = profile.matched_metric.as_deref() else {
                continue;
            };

            let (name, description) = match self.catalog.lookup(metric) {
                Some(entry) => (entry.name.clone(), Some(entry.description.clone())),
                None => (metric.to_string(), None),
            };
            if recommendations.iter().any(|r| r.metric == name) {
                continue;
            }

            debug!("Neighbour {} ({}) -> {}", profile.id, total[i], name);
            recommendations.push(
                Recommendation::new(name, total[i].min(MAX_AFFINITY))
                    .with_description(description)
                    .with_similar_profile(profile.id),
            );
        }

        Ok(recommendations)
    }
}

impl SimilarityEngine for WeightedSimilarityEngine {
    fn name(&self) -> &'static str {
        "weighted"
    }

    fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    fn find_similar(&self, query: &SimilarityQuery) -> Result<SimilarityOutcome> {
        let QueryInput::Profile(profile) = &query.input else {
            return Err(Error::Validation(
                "a structured profile is required".to_string(),
            ));
        };

        let mut recommendations = self.recommend(profile, query.top_n, query.weights.as_ref())?;
        let scores: Vec<f32> = recommendations.iter().map(|r| r.affinity).collect();
        for (rec, affinity) in recommendations
            .iter_mut()
            .zip(query.affinity_mode.present(&scores))
        {
            rec.affinity = affinity;
        }

        Ok(SimilarityOutcome::Recommendations(recommendations))
    }
}

fn text_value(value: Option<&FeatureValue>) -> Cow<'_, str> {
    value.map(FeatureValue::as_text).unwrap_or(Cow::Borrowed(""))
}

fn scalar_value(value: Option<&FeatureValue>) -> f32 {
    value.and_then(FeatureValue::as_number).unwrap_or(0.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::CorpusProfile;
    use crate::engine::AffinityMode;
    use metricrec_core::{MetricEntry, TfidfVectorizer};
    use metricrec_schema::FeatureDef;
    use std::collections::BTreeMap;

    fn catalog() -> Arc<MetricCatalog> {
        let no_categories: Vec<(String, Vec<Option<String>>)> = Vec::new();
        Arc::new(MetricCatalog::new(
            vec![
                MetricEntry { name: "Velocity".into(), description: "Points per sprint".into() },
                MetricEntry { name: "Lead Time".into(), description: "Request to delivery".into() },
            ],
            no_categories,
        ))
    }

    fn vectorizers(feature: &str, docs: &[&str]) -> HashMap<String, Arc<dyn TextVectorizer>> {
        let vectorizer: Arc<dyn TextVectorizer> = Arc::new(TfidfVectorizer::fit(docs));
        HashMap::from([(feature.to_string(), vectorizer)])
    }

    fn unit_weights() -> FeatureWeights {
        FeatureWeights::new(BTreeMap::from([("a".to_string(), 1.0), ("b".to_string(), 1.0)])).unwrap()
    }

    fn two_profile_engine() -> WeightedSimilarityEngine {
        let corpus = Corpus::new(
            vec![FeatureDef::text("a"), FeatureDef::binary("b")],
            vec![
                CorpusProfile::new(10, Profile::new().with("a", "scrum").with("b", 1.0), Some("M1".into())),
                CorpusProfile::new(20, Profile::new().with("a", "kanban").with("b", 0.0), Some("M2".into())),
            ],
        )
        .unwrap();
        WeightedSimilarityEngine::new(
            Arc::new(corpus),
            &vectorizers("a", &["scrum", "kanban"]),
            unit_weights(),
            catalog(),
        )
        .unwrap()
    }

    fn query() -> Profile {
        Profile::new().with("a", "scrum").with("b", 1.0)
    }

    #[test]
    fn test_binary_weight_doubles_for_present_feature() {
        let engine = two_profile_engine();
        let total = engine.total_similarity(&query(), None).unwrap();

        // text match (1 * 1) + binary match (1 * 2)
        assert!((total[0] - 3.0).abs() < 1e-5, "got {}", total[0]);
        assert!(total[1].abs() < 1e-5);
        assert_eq!(total[2], -1.0);
        assert_eq!(engine.default_weights().get("b"), 1.0);
    }

    #[test]
    fn test_exact_match_ranks_first() {
        let engine = two_profile_engine();
        let recs = engine.recommend(&query(), 5, None).unwrap();

        let metrics: Vec<&str> = recs.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(metrics, vec!["M1", "M2"]);
        assert_eq!(recs[0].similar_profile_index, Some(10));
        assert!(recs[0].description.is_none());
    }

    #[test]
    fn test_repeated_queries_are_identical() {
        let engine = two_profile_engine();
        let first = engine.recommend(&query(), 5, None).unwrap();
        let second = engine.recommend(&query(), 5, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_feature_is_incomplete_profile() {
        let engine = two_profile_engine();
        let err = engine
            .recommend(&Profile::new().with("a", "scrum"), 5, None)
            .unwrap_err();
        assert!(matches!(err, Error::IncompleteProfile(f) if f == "b"));
    }

    #[test]
    fn test_missing_vectorizer_is_load_error() {
        let corpus = Corpus::new(vec![FeatureDef::text("role")], Vec::new()).unwrap();
        let result = WeightedSimilarityEngine::new(
            Arc::new(corpus),
            &HashMap::new(),
            FeatureWeights::default(),
            catalog(),
        );
        assert!(matches!(result, Err(Error::ModelLoad(_))));
    }

    fn flag_engine(rows: Vec<(i64, f64, Option<&str>)>) -> WeightedSimilarityEngine {
        let profiles = rows
            .into_iter()
            .map(|(id, flag, metric)| {
                CorpusProfile::new(id, Profile::new().with("flag", flag), metric.map(str::to_string))
            })
            .collect();
        let corpus = Corpus::new(vec![FeatureDef::binary("flag")], profiles).unwrap();
        WeightedSimilarityEngine::new(
            Arc::new(corpus),
            &HashMap::new(),
            FeatureWeights::default(),
            catalog(),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicates_and_missing_metrics_skipped() {
        let engine = flag_engine(vec![
            (1, 1.0, Some("velocity")),
            (2, 1.0, None),
            (3, 1.0, Some("Velocity")),
            (4, 1.0, Some("Lead Time")),
            (5, 0.0, Some("Throughput")),
        ]);
        let recs = engine.recommend(&Profile::new().with("flag", 1.0), 5, None).unwrap();

        let metrics: Vec<&str> = recs.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(metrics, vec!["Velocity", "Lead Time", "Throughput"]);
        assert_eq!(recs[0].similar_profile_index, Some(1));
        assert_eq!(recs[0].description.as_deref(), Some("Points per sprint"));
    }

    #[test]
    fn test_output_length_is_bounded_by_top_n() {
        let engine = flag_engine(vec![
            (1, 1.0, Some("A")),
            (2, 1.0, Some("B")),
            (3, 1.0, Some("C")),
        ]);
        let query = Profile::new().with("flag", 1.0);

        assert_eq!(engine.recommend(&query, 2, None).unwrap().len(), 2);
        assert_eq!(engine.recommend(&query, 10, None).unwrap().len(), 3);
        assert!(engine.recommend(&query, 0, None).unwrap().is_empty());
    }

    #[test]
    fn test_huge_top_n_is_bounded_by_corpus() {
        let engine = flag_engine(vec![(1, 1.0, Some("A")), (2, 1.0, Some("B"))]);
        let recs = engine
            .recommend(&Profile::new().with("flag", 1.0), 1_000_000_000_000, None)
            .unwrap();
        assert_eq!(recs.len(), 2);
    }

    #[test]
    fn test_nan_text_value_counts_as_absent_flag() {
        let profiles = vec![
            CorpusProfile::new(1, Profile::new().with("flag", 0.0).with("other", 0.0), Some("A".into())),
            CorpusProfile::new(2, Profile::new().with("flag", 1.0).with("other", 1.0), Some("B".into())),
        ];
        let corpus = Corpus::new(vec![FeatureDef::binary("flag"), FeatureDef::binary("other")], profiles).unwrap();
        let engine = WeightedSimilarityEngine::new(
            Arc::new(corpus),
            &HashMap::new(),
            FeatureWeights::default(),
            catalog(),
        )
        .unwrap();

        let query = Profile::new().with("flag", "NaN").with("other", 1.0);
        let total = engine.total_similarity(&query, None).unwrap();
        assert!(total.iter().all(|s| s.is_finite()));
        assert!((total[1] - 2.0).abs() < 1e-5);

        let recs = engine.recommend(&query, 5, None).unwrap();
        assert_eq!(recs[0].metric, "B");
        assert!((recs[0].affinity - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let engine = flag_engine(vec![
            (7, 0.0, Some("A")),
            (8, 1.0, Some("B")),
            (9, 1.0, Some("C")),
        ]);
        let recs = engine.recommend(&Profile::new().with("flag", 1.0), 2, None).unwrap();
        let ids: Vec<Option<i64>> = recs.iter().map(|r| r.similar_profile_index).collect();
        assert_eq!(ids, vec![Some(8), Some(9)]);
    }

    #[test]
    fn test_affinity_is_capped() {
        let engine = flag_engine(vec![(1, 1.0, Some("A"))]);
        let overrides = FeatureWeights::from_json(&serde_json::json!({"flag": 500.0})).unwrap();
        let recs = engine
            .recommend(&Profile::new().with("flag", 1.0), 5, Some(&overrides))
            .unwrap();
        assert_eq!(recs[0].affinity, MAX_AFFINITY);
    }

    #[test]
    fn test_find_similar_percentage_and_text_rejection() {
        let engine = flag_engine(vec![(1, 1.0, Some("A")), (2, 1.0, Some("B"))]);
        let query = SimilarityQuery::profile(Profile::new().with("flag", 1.0))
            .affinity_mode(AffinityMode::Percentage);
        let outcome = engine.find_similar(&query).unwrap();
        let recs = outcome.recommendations().unwrap();
        assert!((recs[0].affinity - 50.0).abs() < 1e-4);

        let err = engine.find_similar(&SimilarityQuery::text("scrum")).unwrap_err();
        assert!(err.is_client_error());
    }
}
