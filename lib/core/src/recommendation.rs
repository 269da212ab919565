use serde::{Deserialize, Serialize};

/// A single metric recommendation, produced per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub metric: String,
    pub affinity: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Corpus identifier of the neighbour the metric came from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similar_profile_index: Option<i64>,
}

impl Recommendation {
    pub fn new(metric: impl Into<String>, affinity: f32) -> Self {
        Self {
            metric: metric.into(),
            affinity,
            category: None,
            description: None,
            similar_profile_index: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn with_similar_profile(mut self, id: i64) -> Self {
        self.similar_profile_index = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_fields_are_not_serialized() {
        let rec = Recommendation::new("Velocity", 0.75).with_category("Processo");
        let json = serde_json::to_value(&rec).unwrap();

        assert_eq!(json["metric"], "Velocity");
        assert_eq!(json["category"], "Processo");
        assert!(json.get("description").is_none());
        assert!(json.get("similar_profile_index").is_none());
    }
}
