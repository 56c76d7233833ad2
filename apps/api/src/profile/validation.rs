use serde::Serialize;
use unicompass_core::ProfileInput;

/// One rejected field, shaped like the `detail` entries clients already parse.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub loc: Vec<String>,
    pub msg: String,
}

impl FieldError {
    fn new(field: &str, msg: impl Into<String>) -> Self {
        Self {
            loc: vec!["body".to_string(), field.to_string()],
            msg: msg.into(),
        }
    }
}

fn check_range<T>(errors: &mut Vec<FieldError>, field: &str, value: Option<T>, min: T, max: T)
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if let Some(v) = value {
        if v < min || v > max {
            errors.push(FieldError::new(
                field,
                format!("{field} must be between {min} and {max}"),
            ));
        }
    }
}

/// Range checks for the onboarding answers. Empty when the input is valid.
pub fn validate_profile(input: &ProfileInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_range(&mut errors, "current_gpa", input.current_gpa, 0.0, 10.0);
    check_range(&mut errors, "graduation_year", input.graduation_year, 1950, 2100);
    check_range(&mut errors, "study_start_year", input.study_start_year, 2000, 2100);
    check_range(&mut errors, "toefl_score", input.toefl_score, 0, 120);
    check_range(&mut errors, "ielts_score", input.ielts_score, 0.0, 9.0);
    check_range(&mut errors, "gre_score", input.gre_score, 260, 340);
    check_range(&mut errors, "gmat_score", input.gmat_score, 200, 800);
    check_range(&mut errors, "work_experience_years", input.work_experience_years, 0, 60);
    check_range(&mut errors, "publications", input.publications, 0, 1000);

    for (field, value) in [("budget_min", input.budget_min), ("budget_max", input.budget_max)] {
        if value.is_some_and(|v| v < 0.0) {
            errors.push(FieldError::new(field, format!("{field} cannot be negative")));
        }
    }
    if let (Some(min), Some(max)) = (input.budget_min, input.budget_max) {
        if min > max {
            errors.push(FieldError::new(
                "budget_max",
                "budget_max must not be lower than budget_min",
            ));
        }
    }

    errors
}
