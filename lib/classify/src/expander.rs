//! Category -> metric expansion
//!
//! Every category whose affinity clears the threshold contributes all of
//! its catalog metrics, each carrying the category affinity and label.
//! Metrics are not deduplicated across categories: the same metric may
//! appear under two categories with two affinities.

use crate::ensemble::CategoryAffinities;
use metricrec_core::{MetricCatalog, Recommendation};
use std::sync::Arc;
use tracing::debug;

/// Default affinity threshold
pub const DEFAULT_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct AffinityExpander {
    catalog: Arc<MetricCatalog>,
}

impl AffinityExpander {
    pub fn new(catalog: Arc<MetricCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    /// Expand affinities into recommendations, highest affinity first.
    /// Ties keep category order, then catalog order.
    pub fn expand(&self, affinities: &CategoryAffinities, threshold: f32) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = affinities
            .iter()
            .filter(|a| a.affinity >= threshold)
            .flat_map(|a| {
                self.catalog
                    .metrics_for(a.category.label)
                    .iter()
                    .flatten()
                    .map(move |metric| {
                        Recommendation::new(metric.clone(), a.affinity)
                            .with_category(a.category.label)
                            .with_description(self.catalog.description(metric).map(str::to_string))
                    })
            })
            .collect();

        // stable: equal affinities keep their insertion order
        recommendations.sort_by(|a, b| {
            b.affinity
                .partial_cmp(&a.affinity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!("Expanded {} recommendations at threshold {}", recommendations.len(), threshold);
        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::CategoryAffinity;
    use metricrec_core::{MetricEntry, CATEGORIES};

    fn catalog() -> Arc<MetricCatalog> {
        let descriptions = vec![
            MetricEntry { name: "Velocity".into(), description: "Points per sprint".into() },
            MetricEntry { name: "Lead Time".into(), description: "Request to delivery".into() },
            MetricEntry { name: "NPS".into(), description: "Net promoter score".into() },
        ];
        let categories = vec![
            ("Processo".to_string(), vec![Some("Velocity".to_string()), None, Some("lead time".to_string())]),
            ("Cliente".to_string(), vec![Some("NPS".to_string()), Some("Velocity".to_string())]),
            ("Produto".to_string(), vec![Some("Defect Density".to_string())]),
        ];
        Arc::new(MetricCatalog::new(descriptions, categories))
    }

    fn affinities(values: [f32; 6]) -> CategoryAffinities {
        CategoryAffinities::new(
            CATEGORIES
                .iter()
                .zip(values)
                .map(|(c, affinity)| CategoryAffinity { category: *c, affinity })
                .collect(),
        )
    }

    // order: cronograma, produto, processo, tecnologia, pessoas, cliente
    #[test]
    fn test_all_affinities_meet_threshold() {
        let expander = AffinityExpander::new(catalog());
        let recs = expander.expand(&affinities([0.9, 0.2, 0.6, 0.7, 0.1, 0.8]), 0.5);

        assert!(!recs.is_empty());
        assert!(recs.iter().all(|r| r.affinity >= 0.5));
        assert!(recs.iter().all(|r| r.category.as_deref() != Some("Produto")));
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let expander = AffinityExpander::new(catalog());
        let recs = expander.expand(&affinities([0.0, 0.0, 0.6, 0.0, 0.0, 0.8]), 0.5);

        let names: Vec<&str> = recs.iter().map(|r| r.metric.as_str()).collect();
        assert_eq!(names, vec!["NPS", "Velocity", "Velocity", "lead time"]);
        assert_eq!(recs[1].category.as_deref(), Some("Cliente"));
        assert_eq!(recs[2].category.as_deref(), Some("Processo"));
    }

    #[test]
    fn test_missing_entries_dropped_and_descriptions_attached() {
        let expander = AffinityExpander::new(catalog());
        let recs = expander.expand(&affinities([0.0, 0.7, 0.7, 0.0, 0.0, 0.0]), 0.5);

        assert_eq!(recs.len(), 3);
        let lead = recs.iter().find(|r| r.metric == "lead time").unwrap();
        assert_eq!(lead.description.as_deref(), Some("Request to delivery"));
        let defect = recs.iter().find(|r| r.metric == "Defect Density").unwrap();
        assert!(defect.description.is_none());
    }

    #[test]
    fn test_lowering_threshold_only_adds() {
        let expander = AffinityExpander::new(catalog());
        let affs = affinities([0.3, 0.45, 0.6, 0.1, 0.2, 0.55]);

        let mut previous = 0;
        for threshold in [0.9, 0.6, 0.5, 0.4, 0.0] {
            let recs = expander.expand(&affs, threshold);
            assert!(recs.len() >= previous);
            previous = recs.len();
        }
    }

    #[test]
    fn test_high_threshold_yields_empty_list() {
        let expander = AffinityExpander::new(catalog());
        let recs = expander.expand(&affinities([0.5; 6]), 0.9);
        assert!(recs.is_empty());
    }
}
