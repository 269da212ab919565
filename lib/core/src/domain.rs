//! Domain vocabulary shared by every recommendation path.

/// A metric category: the indicator column used by the models and the
/// human label used by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub column: &'static str,
    pub label: &'static str,
}

pub const CATEGORIES: [Category; 6] = [
    Category { column: "metrics_category_cronograma_e_progresso", label: "Cronograma e progresso" },
    Category { column: "metrics_category_produto", label: "Produto" },
    Category { column: "metrics_category_processo", label: "Processo" },
    Category { column: "metrics_category_tecnologia", label: "Tecnologia" },
    Category { column: "metrics_category_pessoas", label: "Pessoas" },
    Category { column: "metrics_category_cliente", label: "Cliente" },
];

/// Agile methods, as they appear in request keys (`agile_methods_<method>`)
pub const AGILE_METHODS: [&str; 6] = ["scrum", "kanban", "scrumban", "xp", "safe", "lean"];

/// Classifier column names for each agile method request key
pub const AGILE_METHOD_COLUMNS: [(&str, &str); 6] = [
    ("agile_methods_scrum", "Scrum"),
    ("agile_methods_kanban", "Kanban"),
    ("agile_methods_lean", "Lean"),
    ("agile_methods_xp", "XP"),
    ("agile_methods_safe", "Safe"),
    ("agile_methods_scrumban", "ScrumBan"),
];

/// Profile fields every collaborative request must carry, before the
/// agile-method and category flags
pub const PROFILE_FIELDS: [&str; 8] = [
    "role",
    "years_exp",
    "org_size",
    "use_metrics_planning",
    "use_metrics_review",
    "use_metrics_weekly",
    "use_metrics_daily",
    "use_metrics_retro",
];

/// One-hot encoded request fields
pub const ONE_HOT_FIELDS: [&str; 3] = ["role", "org_size", "years_exp"];

/// Look up the catalog label for a category column
pub fn category_label(column: &str) -> Option<&'static str> {
    CATEGORIES.iter().find(|c| c.column == column).map(|c| c.label)
}

/// Every field the collaborative path requires, in validation order
pub fn collaborative_required_fields() -> Vec<String> {
    PROFILE_FIELDS
        .iter()
        .map(|f| f.to_string())
        .chain(AGILE_METHODS.iter().map(|m| format!("agile_methods_{}", m)))
        .chain(CATEGORIES.iter().map(|c| c.column.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields_order() {
        let fields = collaborative_required_fields();
        assert_eq!(fields.len(), 20);
        assert_eq!(fields[0], "role");
        assert_eq!(fields[8], "agile_methods_scrum");
        assert_eq!(fields[13], "agile_methods_lean");
        assert_eq!(fields[14], "metrics_category_cronograma_e_progresso");
        assert_eq!(fields[19], "metrics_category_cliente");
    }

    #[test]
    fn test_category_label() {
        assert_eq!(category_label("metrics_category_produto"), Some("Produto"));
        assert_eq!(category_label("Produto"), None);
    }
}
