use crate::models::Profile;

/// Number of onboarding answers that count toward completion.
pub const COMPLETION_FIELDS: usize = 13;

/// Names of the answers that count, in onboarding order.
pub const COMPLETION_FIELD_NAMES: [&str; COMPLETION_FIELDS] = [
    "current_degree",
    "current_gpa",
    "current_institution",
    "field_of_study",
    "graduation_year",
    "desired_degree",
    "desired_field",
    "preferred_countries",
    "study_start_year",
    "budget_min",
    "budget_max",
    "exam_status",
    "work_experience_years",
];

fn text_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

/// Which of the counted answers are present, aligned with
/// [`COMPLETION_FIELD_NAMES`].
pub fn filled_fields(profile: &Profile) -> [bool; COMPLETION_FIELDS] {
    [
        text_filled(&profile.current_degree),
        profile.current_gpa.is_some(),
        text_filled(&profile.current_institution),
        text_filled(&profile.field_of_study),
        profile.graduation_year.is_some(),
        text_filled(&profile.desired_degree),
        text_filled(&profile.desired_field),
        text_filled(&profile.preferred_countries),
        profile.study_start_year.is_some(),
        profile.budget_min.is_some(),
        profile.budget_max.is_some(),
        text_filled(&profile.exam_status),
        profile.work_experience_years.is_some(),
    ]
}

/// `round(100 * filled / 13)`, half rounding up.
pub fn completion_percent(profile: &Profile) -> u8 {
    let filled = filled_fields(profile).iter().filter(|f| **f).count();
    ((200 * filled + COMPLETION_FIELDS) / (2 * COMPLETION_FIELDS)) as u8
}

/// Counted answers that are still empty.
pub fn missing_fields(profile: &Profile) -> Vec<&'static str> {
    COMPLETION_FIELD_NAMES
        .iter()
        .zip(filled_fields(profile))
        .filter(|(_, filled)| !filled)
        .map(|(name, _)| *name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile() -> Profile {
        Profile {
            current_degree: Some("Bachelor's".into()),
            current_gpa: Some(3.6),
            current_institution: Some("Anna University".into()),
            field_of_study: Some("Computer Science".into()),
            graduation_year: Some(2025),
            desired_degree: Some("Master's".into()),
            desired_field: Some("Machine Learning".into()),
            preferred_countries: Some("Germany, Canada".into()),
            study_start_year: Some(2026),
            budget_min: Some(10_000.0),
            budget_max: Some(30_000.0),
            exam_status: Some("completed".into()),
            work_experience_years: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_profile_is_zero() {
        assert_eq!(completion_percent(&Profile::default()), 0);
        assert_eq!(missing_fields(&Profile::default()).len(), COMPLETION_FIELDS);
    }

    #[test]
    fn test_full_profile_is_hundred() {
        let profile = full_profile();
        assert_eq!(completion_percent(&profile), 100);
        assert!(missing_fields(&profile).is_empty());
    }

    #[test]
    fn test_matches_rounded_ratio() {
        // filled -> round(100 * filled / 13)
        let expected = [0, 8, 15, 23, 31, 38, 46, 54, 62, 69, 77, 85, 92, 100];
        let mut profile = Profile::default();
        let setters: [fn(&mut Profile); COMPLETION_FIELDS] = [
            |p| p.current_degree = Some("BSc".into()),
            |p| p.current_gpa = Some(3.0),
            |p| p.current_institution = Some("X".into()),
            |p| p.field_of_study = Some("Physics".into()),
            |p| p.graduation_year = Some(2024),
            |p| p.desired_degree = Some("MSc".into()),
            |p| p.desired_field = Some("Physics".into()),
            |p| p.preferred_countries = Some("Japan".into()),
            |p| p.study_start_year = Some(2026),
            |p| p.budget_min = Some(0.0),
            |p| p.budget_max = Some(1.0),
            |p| p.exam_status = Some("scheduled".into()),
            |p| p.work_experience_years = Some(0),
        ];
        assert_eq!(completion_percent(&profile), expected[0]);
        let mut previous = 0;
        for (i, set) in setters.iter().enumerate() {
            set(&mut profile);
            let pct = completion_percent(&profile);
            assert_eq!(pct, expected[i + 1], "after {} fields", i + 1);
            assert!(pct >= previous);
            previous = pct;
        }
    }

    #[test]
    fn test_blank_text_does_not_count() {
        let profile = Profile {
            current_degree: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(completion_percent(&profile), 0);
    }

    #[test]
    fn test_uncounted_fields_are_ignored() {
        let profile = Profile {
            toefl_score: Some(110),
            gre_score: Some(320),
            research_experience: Some(true),
            ..Default::default()
        };
        assert_eq!(completion_percent(&profile), 0);
    }
}
