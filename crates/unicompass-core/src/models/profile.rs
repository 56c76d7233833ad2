use serde::{Deserialize, Serialize};

/// Onboarding answers. One per user; every answer is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    pub id: i64,
    pub user_id: i64,

    // Academic background
    pub current_degree: Option<String>,
    pub current_gpa: Option<f64>,
    pub current_institution: Option<String>,
    pub field_of_study: Option<String>,
    pub graduation_year: Option<i32>,

    // Study goals
    pub desired_degree: Option<String>,
    pub desired_field: Option<String>,
    pub preferred_countries: Option<String>,
    pub study_start_year: Option<i32>,

    // Budget
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    pub currency: Option<String>,

    // Exam readiness
    pub toefl_score: Option<i32>,
    pub ielts_score: Option<f64>,
    pub gre_score: Option<i32>,
    pub gmat_score: Option<i32>,
    pub exam_status: Option<String>,

    pub work_experience_years: Option<i32>,
    pub research_experience: Option<bool>,
    pub publications: Option<i32>,
}

/// Body of `POST /api/profile`. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_gpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_countries: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub study_start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toefl_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ielts_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gre_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gmat_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exam_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_experience_years: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub research_experience: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<i32>,
}

impl Profile {
    /// The budget range as `(min, max)` with missing bounds reported as 0.
    pub fn budget_range(&self) -> (f64, f64) {
        (
            self.budget_min.unwrap_or(0.0),
            self.budget_max.unwrap_or(0.0),
        )
    }
}
