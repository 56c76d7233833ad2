//! Catalog discovery: filters the catalog for a student and ranks the page
//! by how well each university matches their profile.
//!
//! Filtering happens in SQL; scoring and categorisation are pure functions
//! over the fetched rows.

use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};
use unicompass_core::{Category, Profile, RecommendedUniversity, University};

const PAGE_LIMIT: i64 = 50;
const SHOW_ALL_LIMIT: i64 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Filters
// ────────────────────────────────────────────────────────────────────────────

/// Query string of `GET /api/universities`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogQuery {
    pub country: Option<String>,
    pub budget_min: Option<f64>,
    pub budget_max: Option<f64>,
    #[serde(default)]
    pub show_all: bool,
}

/// One SQL predicate over the `universities` table.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Case-insensitive substring match on country.
    CountryContains(String),
    TuitionMaxAtLeast(f64),
    TuitionMinAtMost(f64),
    TuitionMaxAtMost(f64),
    TuitionMinAtLeast(f64),
    /// `min_gpa` is unknown or not above the value.
    MinGpaAtMost(f64),
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Resolves the query and the caller's profile into SQL predicates.
///
/// Explicit budget bounds overlap-match the tuition range. Without explicit
/// bounds the profile budget applies, and then the whole tuition range must
/// sit inside it.
pub fn build_conditions(query: &CatalogQuery, profile: Option<&Profile>) -> Vec<Condition> {
    let mut conditions = Vec::new();
    if query.show_all {
        return conditions;
    }

    if let Some(country) = query.country.as_deref().map(str::trim) {
        if !country.is_empty() {
            conditions.push(Condition::CountryContains(country.to_string()));
        }
    }

    if let Some(min) = query.budget_min {
        conditions.push(Condition::TuitionMaxAtLeast(min));
    }
    if let Some(max) = query.budget_max {
        conditions.push(Condition::TuitionMinAtMost(max));
    }

    if let Some(profile) = profile {
        if query.budget_min.is_none() && query.budget_max.is_none() {
            if let Some(max) = positive(profile.budget_max) {
                conditions.push(Condition::TuitionMaxAtMost(max));
            }
            if let Some(min) = positive(profile.budget_min) {
                conditions.push(Condition::TuitionMinAtLeast(min));
            }
        }
        if let Some(gpa) = positive(profile.current_gpa) {
            conditions.push(Condition::MinGpaAtMost(gpa));
        }
    }

    conditions
}

/// Escapes `%`, `_` and `\` so user input matches literally inside `ILIKE`.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn push_condition(qb: &mut QueryBuilder<'_, Postgres>, condition: &Condition) {
    match condition {
        Condition::CountryContains(country) => {
            qb.push(" AND country ILIKE ")
                .push_bind(format!("%{}%", escape_like(country)));
        }
        Condition::TuitionMaxAtLeast(v) => {
            qb.push(" AND tuition_max >= ").push_bind(*v);
        }
        Condition::TuitionMinAtMost(v) => {
            qb.push(" AND tuition_min <= ").push_bind(*v);
        }
        Condition::TuitionMaxAtMost(v) => {
            qb.push(" AND tuition_max <= ").push_bind(*v);
        }
        Condition::TuitionMinAtLeast(v) => {
            qb.push(" AND tuition_min >= ").push_bind(*v);
        }
        Condition::MinGpaAtMost(v) => {
            qb.push(" AND (min_gpa IS NULL OR min_gpa <= ")
                .push_bind(*v)
                .push(")");
        }
    }
}

pub async fn fetch_catalog(
    pool: &PgPool,
    query: &CatalogQuery,
    profile: Option<&Profile>,
) -> Result<Vec<University>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM universities WHERE TRUE");
    for condition in build_conditions(query, profile) {
        push_condition(&mut qb, &condition);
    }
    let limit = if query.show_all {
        SHOW_ALL_LIMIT
    } else {
        PAGE_LIMIT
    };
    qb.push(" ORDER BY id LIMIT ").push_bind(limit);
    qb.build_query_as::<University>().fetch_all(pool).await
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

const BUDGET_WEIGHT: f64 = 0.4;
const GPA_WEIGHT: f64 = 0.2;
const RANKING_WEIGHT: f64 = 0.2;
const ACCEPTANCE_WEIGHT: f64 = 0.2;

/// Score for a caller without a profile.
const NEUTRAL_SCORE: f64 = 0.5;

/// How well a university fits the profile, in `0.0..=1.0`.
///
/// budget 40%: affordable tuition, cheaper within the budget range scores higher
/// GPA 20%: only when the student meets the minimum
/// ranking 20%: linear from rank 1 (1.0) to rank 1001 (0.0)
/// acceptance 20%: the acceptance rate itself
pub fn match_score(university: &University, profile: Option<&Profile>) -> f64 {
    let Some(profile) = profile else {
        return NEUTRAL_SCORE;
    };
    let mut score = 0.0;

    if let (Some(budget_max), Some(tuition_max)) =
        (positive(profile.budget_max), university.tuition_max)
    {
        if tuition_max <= budget_max {
            let budget_min = profile.budget_min.unwrap_or(0.0);
            let budget_match = if budget_max > budget_min {
                1.0 - (tuition_max - budget_min) / (budget_max - budget_min)
            } else {
                1.0
            };
            score += budget_match.clamp(0.0, 1.0) * BUDGET_WEIGHT;
        }
    }

    if let (Some(gpa), Some(min_gpa)) = (positive(profile.current_gpa), university.min_gpa) {
        if min_gpa > 0.0 && gpa >= min_gpa {
            score += (gpa / (min_gpa + 0.5)).min(1.0) * GPA_WEIGHT;
        }
    }

    if let Some(ranking) = university.ranking.filter(|r| *r > 0) {
        let ranking_score = (1.0 - f64::from(ranking - 1) / 1000.0).max(0.0);
        score += ranking_score * RANKING_WEIGHT;
    }

    if let Some(rate) = university.acceptance_rate {
        score += rate.clamp(0.0, 1.0) * ACCEPTANCE_WEIGHT;
    }

    score
}

/// Suggests where the university belongs on the student's shortlist.
pub fn suggest_category(university: &University, profile: Option<&Profile>) -> Category {
    let score = match_score(university, profile);

    let meets_gpa = match (profile.and_then(|p| positive(p.current_gpa)), university.min_gpa) {
        (Some(gpa), Some(min_gpa)) if min_gpa > 0.0 => gpa >= min_gpa,
        _ => true,
    };
    let acceptance = university.acceptance_rate.unwrap_or(0.5);

    if !meets_gpa || acceptance < 0.3 {
        Category::Dream
    } else if acceptance >= 0.5 && score > 0.6 {
        Category::Safe
    } else {
        Category::Target
    }
}

/// Scores every university and orders the page best match first. Ties keep
/// catalog order.
pub fn rank_catalog(
    universities: Vec<University>,
    profile: Option<&Profile>,
) -> Vec<RecommendedUniversity> {
    let mut ranked: Vec<RecommendedUniversity> = universities
        .into_iter()
        .map(|university| RecommendedUniversity {
            match_score: match_score(&university, profile),
            suggested_category: suggest_category(&university, profile),
            university,
        })
        .collect();
    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            current_gpa: Some(3.6),
            budget_min: Some(10_000.0),
            budget_max: Some(50_000.0),
            ..Default::default()
        }
    }

    fn university(id: i64) -> University {
        University {
            id,
            name: format!("U{id}"),
            country: "Canada".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_show_all_ignores_every_filter() {
        let query = CatalogQuery {
            country: Some("Canada".into()),
            budget_max: Some(1.0),
            show_all: true,
            ..Default::default()
        };
        assert!(build_conditions(&query, Some(&profile())).is_empty());
    }

    #[test]
    fn test_explicit_budget_overrides_profile_budget() {
        let query = CatalogQuery {
            budget_max: Some(30_000.0),
            ..Default::default()
        };
        let conditions = build_conditions(&query, Some(&profile()));
        assert_eq!(
            conditions,
            vec![
                Condition::TuitionMinAtMost(30_000.0),
                Condition::MinGpaAtMost(3.6),
            ]
        );
    }

    #[test]
    fn test_profile_budget_applies_without_explicit_bounds() {
        let query = CatalogQuery {
            country: Some("  germany ".into()),
            ..Default::default()
        };
        let conditions = build_conditions(&query, Some(&profile()));
        assert_eq!(
            conditions,
            vec![
                Condition::CountryContains("germany".into()),
                Condition::TuitionMaxAtMost(50_000.0),
                Condition::TuitionMinAtLeast(10_000.0),
                Condition::MinGpaAtMost(3.6),
            ]
        );
    }

    #[test]
    fn test_no_profile_means_query_filters_only() {
        let query = CatalogQuery {
            country: Some("".into()),
            budget_min: Some(5_000.0),
            ..Default::default()
        };
        assert_eq!(
            build_conditions(&query, None),
            vec![Condition::TuitionMaxAtLeast(5_000.0)]
        );
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%_uni\\x"), "100\\%\\_uni\\\\x");
    }

    #[test]
    fn test_match_score_without_profile_is_neutral() {
        assert_eq!(match_score(&university(1), None), NEUTRAL_SCORE);
    }

    #[test]
    fn test_match_score_components() {
        let uni = University {
            tuition_max: Some(30_000.0),
            min_gpa: Some(3.0),
            ranking: Some(1),
            acceptance_rate: Some(0.5),
            ..university(1)
        };
        // budget: 1 - (30k - 10k) / 40k = 0.5 -> 0.2
        // gpa: min(1, 3.6 / 3.5) = 1 -> 0.2
        // ranking: 1 -> 0.2
        // acceptance: 0.5 -> 0.1
        let score = match_score(&uni, Some(&profile()));
        assert!((score - 0.7).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn test_unaffordable_tuition_earns_no_budget_credit() {
        let uni = University {
            tuition_max: Some(90_000.0),
            ..university(1)
        };
        assert_eq!(match_score(&uni, Some(&profile())), 0.0);
    }

    #[test]
    fn test_suggest_category() {
        let selective = University {
            acceptance_rate: Some(0.07),
            ..university(1)
        };
        assert_eq!(suggest_category(&selective, Some(&profile())), Category::Dream);

        let above_gpa = University {
            min_gpa: Some(3.9),
            acceptance_rate: Some(0.6),
            ..university(2)
        };
        assert_eq!(suggest_category(&above_gpa, Some(&profile())), Category::Dream);

        let easy = University {
            tuition_max: Some(10_000.0),
            min_gpa: Some(3.0),
            ranking: Some(50),
            acceptance_rate: Some(0.7),
            ..university(3)
        };
        assert_eq!(suggest_category(&easy, Some(&profile())), Category::Safe);

        let middle = University {
            acceptance_rate: Some(0.4),
            ..university(4)
        };
        assert_eq!(suggest_category(&middle, Some(&profile())), Category::Target);
    }

    #[test]
    fn test_rank_catalog_orders_best_first() {
        let ranked = rank_catalog(
            vec![
                University {
                    ranking: Some(900),
                    ..university(1)
                },
                University {
                    ranking: Some(5),
                    acceptance_rate: Some(0.3),
                    ..university(2)
                },
            ],
            Some(&profile()),
        );
        assert_eq!(ranked[0].university.id, 2);
        assert!(ranked[0].match_score > ranked[1].match_score);
    }
}
