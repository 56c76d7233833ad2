pub mod handlers;
pub mod validation;

use sqlx::{PgExecutor, PgPool};
use unicompass_core::{Profile, ProfileInput};

use crate::errors::AppError;

/// Applies the submitted answers over the stored profile. A first save starts
/// from the onboarding defaults (USD, no experience, no publications).
pub fn merge_profile(existing: Option<Profile>, user_id: i64, input: ProfileInput) -> Profile {
    let base = existing.unwrap_or_else(|| Profile {
        user_id,
        currency: Some("USD".to_string()),
        work_experience_years: Some(0),
        research_experience: Some(false),
        publications: Some(0),
        ..Default::default()
    });

    Profile {
        id: base.id,
        user_id,
        current_degree: input.current_degree.or(base.current_degree),
        current_gpa: input.current_gpa.or(base.current_gpa),
        current_institution: input.current_institution.or(base.current_institution),
        field_of_study: input.field_of_study.or(base.field_of_study),
        graduation_year: input.graduation_year.or(base.graduation_year),
        desired_degree: input.desired_degree.or(base.desired_degree),
        desired_field: input.desired_field.or(base.desired_field),
        preferred_countries: input.preferred_countries.or(base.preferred_countries),
        study_start_year: input.study_start_year.or(base.study_start_year),
        budget_min: input.budget_min.or(base.budget_min),
        budget_max: input.budget_max.or(base.budget_max),
        currency: input.currency.or(base.currency),
        toefl_score: input.toefl_score.or(base.toefl_score),
        ielts_score: input.ielts_score.or(base.ielts_score),
        gre_score: input.gre_score.or(base.gre_score),
        gmat_score: input.gmat_score.or(base.gmat_score),
        exam_status: input.exam_status.or(base.exam_status),
        work_experience_years: input.work_experience_years.or(base.work_experience_years),
        research_experience: input.research_experience.or(base.research_experience),
        publications: input.publications.or(base.publications),
    }
}

pub async fn get_profile<'e>(
    executor: impl PgExecutor<'e>,
    user_id: i64,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>("SELECT * FROM user_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// Writes the full profile row, inserting it on first save.
pub async fn upsert_profile<'e>(
    executor: impl PgExecutor<'e>,
    profile: &Profile,
) -> Result<Profile, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO user_profiles
            (user_id, current_degree, current_gpa, current_institution, field_of_study,
             graduation_year, desired_degree, desired_field, preferred_countries,
             study_start_year, budget_min, budget_max, currency, toefl_score, ielts_score,
             gre_score, gmat_score, exam_status, work_experience_years, research_experience,
             publications)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21)
        ON CONFLICT (user_id) DO UPDATE SET
            current_degree = EXCLUDED.current_degree,
            current_gpa = EXCLUDED.current_gpa,
            current_institution = EXCLUDED.current_institution,
            field_of_study = EXCLUDED.field_of_study,
            graduation_year = EXCLUDED.graduation_year,
            desired_degree = EXCLUDED.desired_degree,
            desired_field = EXCLUDED.desired_field,
            preferred_countries = EXCLUDED.preferred_countries,
            study_start_year = EXCLUDED.study_start_year,
            budget_min = EXCLUDED.budget_min,
            budget_max = EXCLUDED.budget_max,
            currency = EXCLUDED.currency,
            toefl_score = EXCLUDED.toefl_score,
            ielts_score = EXCLUDED.ielts_score,
            gre_score = EXCLUDED.gre_score,
            gmat_score = EXCLUDED.gmat_score,
            exam_status = EXCLUDED.exam_status,
            work_experience_years = EXCLUDED.work_experience_years,
            research_experience = EXCLUDED.research_experience,
            publications = EXCLUDED.publications,
            updated_at = now()
        RETURNING *
        "#,
    )
    .bind(profile.user_id)
    .bind(&profile.current_degree)
    .bind(profile.current_gpa)
    .bind(&profile.current_institution)
    .bind(&profile.field_of_study)
    .bind(profile.graduation_year)
    .bind(&profile.desired_degree)
    .bind(&profile.desired_field)
    .bind(&profile.preferred_countries)
    .bind(profile.study_start_year)
    .bind(profile.budget_min)
    .bind(profile.budget_max)
    .bind(&profile.currency)
    .bind(profile.toefl_score)
    .bind(profile.ielts_score)
    .bind(profile.gre_score)
    .bind(profile.gmat_score)
    .bind(&profile.exam_status)
    .bind(profile.work_experience_years)
    .bind(profile.research_experience)
    .bind(profile.publications)
    .fetch_one(executor)
    .await
}

/// Loads the caller's profile for features that need one.
pub async fn require_profile(pool: &PgPool, user_id: i64) -> Result<Profile, AppError> {
    get_profile(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_save_applies_defaults() {
        let profile = merge_profile(
            None,
            9,
            ProfileInput {
                current_degree: Some("Bachelor's".into()),
                ..Default::default()
            },
        );
        assert_eq!(profile.user_id, 9);
        assert_eq!(profile.currency.as_deref(), Some("USD"));
        assert_eq!(profile.work_experience_years, Some(0));
        assert_eq!(profile.research_experience, Some(false));
        assert_eq!(profile.current_degree.as_deref(), Some("Bachelor's"));
    }

    #[test]
    fn test_absent_fields_keep_stored_values() {
        let existing = Profile {
            id: 3,
            user_id: 9,
            current_gpa: Some(3.2),
            desired_field: Some("Robotics".into()),
            currency: Some("EUR".into()),
            ..Default::default()
        };
        let merged = merge_profile(
            Some(existing),
            9,
            ProfileInput {
                current_gpa: Some(3.5),
                ..Default::default()
            },
        );
        assert_eq!(merged.id, 3);
        assert_eq!(merged.current_gpa, Some(3.5));
        assert_eq!(merged.desired_field.as_deref(), Some("Robotics"));
        assert_eq!(merged.currency.as_deref(), Some("EUR"));
    }
}
