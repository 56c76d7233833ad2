use serde::{Deserialize, Serialize};

use super::Category;

/// A catalog record. Read-only from the client's point of view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct University {
    pub id: i64,
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub ranking: Option<i32>,
    /// Fraction in `0.0..=1.0`.
    #[serde(default)]
    pub acceptance_rate: Option<f64>,
    /// JSON array of program names, stored as text.
    #[serde(default)]
    pub programs_offered: Option<String>,
    #[serde(default)]
    pub tuition_min: Option<f64>,
    #[serde(default)]
    pub tuition_max: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub living_cost_estimate: Option<f64>,
    #[serde(default)]
    pub min_gpa: Option<f64>,
    #[serde(default)]
    pub toefl_required: Option<bool>,
    #[serde(default)]
    pub ielts_required: Option<bool>,
    #[serde(default)]
    pub gre_required: Option<bool>,
    #[serde(default)]
    pub gmat_required: Option<bool>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl University {
    /// Exams the university asks for, in display order.
    pub fn required_exams(&self) -> Vec<&'static str> {
        [
            (self.toefl_required, "TOEFL"),
            (self.ielts_required, "IELTS"),
            (self.gre_required, "GRE"),
            (self.gmat_required, "GMAT"),
        ]
        .into_iter()
        .filter(|(flag, _)| flag.unwrap_or(false))
        .map(|(_, name)| name)
        .collect()
    }
}

/// A catalog entry ranked against the caller's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedUniversity {
    #[serde(flatten)]
    pub university: University,
    pub match_score: f64,
    pub suggested_category: Category,
}

/// A university on the caller's shortlist, with how they filed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ShortlistedUniversity {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub university: University,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub category: Category,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_exams_lists_only_set_flags() {
        let uni = University {
            toefl_required: Some(true),
            ielts_required: Some(false),
            gre_required: Some(true),
            ..Default::default()
        };
        assert_eq!(uni.required_exams(), vec!["TOEFL", "GRE"]);
    }

    #[test]
    fn test_shortlisted_university_flattens_catalog_fields() {
        let json = r#"{"id": 7, "name": "ETH Zurich", "country": "Switzerland",
                       "ranking": 7, "category": "dream", "notes": null}"#;
        let entry: ShortlistedUniversity = serde_json::from_str(json).unwrap();
        assert_eq!(entry.university.id, 7);
        assert_eq!(entry.university.ranking, Some(7));
        assert_eq!(entry.category, Category::Dream);
    }

    #[test]
    fn test_university_ignores_ranking_annotations() {
        let json = r#"{"id": 1, "name": "MIT", "country": "United States",
                       "match_score": 0.42, "suggested_category": "dream"}"#;
        let uni: University = serde_json::from_str(json).unwrap();
        assert_eq!(uni.name, "MIT");
        assert_eq!(uni.tuition_min, None);
    }
}
