use std::collections::HashSet;
use std::fmt::Write as _;

use tracing::{info, warn};
use unicompass_core::sorting::{compare as compare_by, SortKey};
use unicompass_core::{
    Action, Category, InterestState, MessageResponse, RecommendedUniversity,
    ShortlistedUniversity, University,
};

use crate::client::{ApiClient, CatalogFilters};
use crate::error::ClientError;
use crate::views::{format_money, format_percent, university_heading};

/// Local refusal shown when locking something that is not on the shortlist.
pub const SHORTLIST_FIRST: &str = "Please shortlist the university first";

/// Membership of the caller's lists, as last fetched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Membership {
    shortlisted: HashSet<i64>,
    locked: HashSet<i64>,
}

impl Membership {
    pub fn new(shortlisted: &[ShortlistedUniversity], locked: &[University]) -> Self {
        Self {
            shortlisted: shortlisted.iter().map(|s| s.university.id).collect(),
            locked: locked.iter().map(|u| u.id).collect(),
        }
    }

    pub fn state_of(&self, university_id: i64) -> InterestState {
        InterestState::from_membership(
            self.shortlisted.contains(&university_id),
            self.locked.contains(&university_id),
        )
    }
}

async fn membership(client: &ApiClient) -> Result<Membership, ClientError> {
    let (shortlisted, locked) = tokio::try_join!(client.list_shortlisted(), client.list_locked())?;
    Ok(Membership::new(&shortlisted, &locked))
}

/// Sorts a fetched page in place. Stable, so ties keep the server's order.
pub fn sort_page(page: &mut [RecommendedUniversity], key: SortKey) {
    page.sort_by(|a, b| compare_by(key, &a.university, &b.university));
}

pub struct CatalogPage {
    pub universities: Vec<RecommendedUniversity>,
    pub membership: Membership,
}

pub async fn browse(
    client: &ApiClient,
    filters: &CatalogFilters,
    sort: SortKey,
) -> Result<CatalogPage, ClientError> {
    let (universities, membership) =
        tokio::try_join!(client.list_universities(filters), membership(client))?;
    let mut universities = universities;
    sort_page(&mut universities, sort);
    Ok(CatalogPage {
        universities,
        membership,
    })
}

fn action_hint(action: Action, id: i64) -> String {
    match action {
        Action::Shortlist => format!("shortlist {id} --category <dream|target|safe>"),
        Action::Lock => format!("lock {id}"),
        Action::Unlock => format!("unlock {id}"),
    }
}

pub fn render_page(page: &CatalogPage) -> String {
    if page.universities.is_empty() {
        return "No universities match these filters. Try --all.\n".to_string();
    }

    let mut out = String::new();
    for entry in &page.universities {
        let u = &entry.university;
        let state = page.membership.state_of(u.id);
        let badge = match state {
            InterestState::Unlisted => "",
            InterestState::Shortlisted => " [shortlisted]",
            InterestState::Locked => " [locked]",
        };
        let _ = writeln!(out, "{:>4}  {}{badge}", u.id, university_heading(u));
        let _ = writeln!(
            out,
            "      tuition {} - {} | acceptance {} | match {:.0}% | suggested: {}",
            format_money(u.tuition_min, u.currency.as_deref()),
            format_money(u.tuition_max, u.currency.as_deref()),
            format_percent(u.acceptance_rate),
            entry.match_score * 100.0,
            entry.suggested_category,
        );
        let hints: Vec<String> = state
            .available_actions()
            .into_iter()
            .map(|a| action_hint(a, u.id))
            .collect();
        let _ = writeln!(out, "      next: {}", hints.join(" | "));
    }
    out
}

pub fn render_detail(university: &University) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", university_heading(university));
    if let Some(description) = &university.description {
        let _ = writeln!(out, "{description}");
    }
    let _ = writeln!(
        out,
        "Tuition: {} - {}",
        format_money(university.tuition_min, university.currency.as_deref()),
        format_money(university.tuition_max, university.currency.as_deref()),
    );
    let _ = writeln!(
        out,
        "Living costs: {}",
        format_money(university.living_cost_estimate, university.currency.as_deref())
    );
    let _ = writeln!(
        out,
        "Acceptance rate: {}",
        format_percent(university.acceptance_rate)
    );
    if let Some(min_gpa) = university.min_gpa {
        let _ = writeln!(out, "Minimum GPA: {min_gpa}");
    }
    let exams = university.required_exams();
    if !exams.is_empty() {
        let _ = writeln!(out, "Required exams: {}", exams.join(", "));
    }
    if let Some(website) = &university.website {
        let _ = writeln!(out, "Website: {website}");
    }
    out
}

pub fn render_shortlisted(entries: &[ShortlistedUniversity]) -> String {
    if entries.is_empty() {
        return "Your shortlist is empty.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{:>4}  {} [{}]",
            entry.university.id,
            university_heading(&entry.university),
            entry.category
        );
        if let Some(notes) = &entry.notes {
            let _ = writeln!(out, "      notes: {notes}");
        }
    }
    out
}

pub fn render_locked(universities: &[University]) -> String {
    if universities.is_empty() {
        return "No locked universities yet.\n".to_string();
    }
    universities
        .iter()
        .map(|u| format!("{:>4}  {}\n", u.id, university_heading(u)))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Actions
// ────────────────────────────────────────────────────────────────────────────

pub async fn shortlist(
    client: &ApiClient,
    university_id: i64,
    category: Category,
    notes: Option<String>,
) -> Result<MessageResponse, ClientError> {
    let reply = client.shortlist(university_id, category, notes).await?;
    info!("Shortlisted university {university_id} as {category}");
    Ok(reply)
}

/// Locks after checking the freshly fetched shortlist. The server re-checks;
/// this only saves a round trip that is bound to fail.
pub async fn lock(client: &ApiClient, university_id: i64) -> Result<MessageResponse, ClientError> {
    let shortlisted = client.list_shortlisted().await?;
    if !shortlisted.iter().any(|s| s.university.id == university_id) {
        return Err(ClientError::Precondition(SHORTLIST_FIRST.to_string()));
    }

    let reply = client.lock(university_id).await?;
    // Locking moves the journey to the application stage.
    client.refresh_user().await?;
    Ok(reply)
}

pub async fn unlock(
    client: &ApiClient,
    university_id: i64,
) -> Result<MessageResponse, ClientError> {
    client.unlock(university_id).await
}

// ────────────────────────────────────────────────────────────────────────────
// Compare
// ────────────────────────────────────────────────────────────────────────────

pub const MAX_COMPARED: usize = 4;
pub const COMPARE_NEEDS_TWO: &str = "Select at least two universities to compare";
const NOTHING_TO_COMPARE: &str =
    "Shortlist universities to compare them. Run `unicompass universities list` to pick some.";

/// Comparison candidates: the shortlist in order, then locked entries that
/// are not on it.
pub fn comparison_pool(
    shortlisted: Vec<ShortlistedUniversity>,
    locked: Vec<University>,
) -> Vec<University> {
    let mut seen = HashSet::new();
    shortlisted
        .into_iter()
        .map(|s| s.university)
        .chain(locked)
        .filter(|u| seen.insert(u.id))
        .collect()
}

/// Picks the columns to compare. No ids means the first [`MAX_COMPARED`]
/// candidates; explicit ids keep their order and must all be candidates.
pub fn select_for_comparison(
    pool: Vec<University>,
    ids: &[i64],
) -> Result<Vec<University>, ClientError> {
    if pool.is_empty() {
        return Err(ClientError::Precondition(NOTHING_TO_COMPARE.to_string()));
    }

    let selected = if ids.is_empty() {
        pool.into_iter().take(MAX_COMPARED).collect::<Vec<_>>()
    } else {
        let mut wanted: Vec<i64> = Vec::with_capacity(ids.len());
        for id in ids {
            if !wanted.contains(id) {
                wanted.push(*id);
            }
        }
        if wanted.len() > MAX_COMPARED {
            return Err(ClientError::Precondition(format!(
                "Compare at most {MAX_COMPARED} universities at a time"
            )));
        }
        let mut picked = Vec::with_capacity(wanted.len());
        for id in wanted {
            match pool.iter().find(|u| u.id == id) {
                Some(university) => picked.push(university.clone()),
                None => {
                    return Err(ClientError::Precondition(format!(
                        "University {id} is not on your shortlist or locked list"
                    )))
                }
            }
        }
        picked
    };

    if selected.len() < 2 {
        return Err(ClientError::Precondition(COMPARE_NEEDS_TWO.to_string()));
    }
    Ok(selected)
}

fn or_empty<T>(what: &str, result: Result<Vec<T>, ClientError>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!("Compare could not load {what} universities: {e}");
        Vec::new()
    })
}

/// Loads both lists together. One failing list only shrinks the pool; the
/// command fails when neither loads.
pub async fn compare(client: &ApiClient, ids: &[i64]) -> Result<Vec<University>, ClientError> {
    let (shortlisted, locked) =
        match tokio::join!(client.list_shortlisted(), client.list_locked()) {
            (Err(e), Err(_)) => return Err(e),
            (shortlisted, locked) => (
                or_empty("shortlisted", shortlisted),
                or_empty("locked", locked),
            ),
        };
    select_for_comparison(comparison_pool(shortlisted, locked), ids)
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn tuition_cell(university: &University) -> String {
    let currency = university.currency.as_deref().unwrap_or("USD");
    match (university.tuition_min, university.tuition_max) {
        (None, _) => "-".to_string(),
        (Some(min), Some(max)) if max != min => format!("{currency} {min:.0} - {max:.0}"),
        (Some(min), _) => format!("{currency} {min:.0}"),
    }
}

/// Side-by-side table, one column per university.
pub fn render_comparison(universities: &[University]) -> String {
    let rows: Vec<(&str, Vec<String>)> = vec![
        ("", universities.iter().map(|u| u.name.clone()).collect()),
        (
            "Location",
            universities
                .iter()
                .map(|u| match &u.city {
                    Some(city) => format!("{city}, {}", u.country),
                    None => u.country.clone(),
                })
                .collect(),
        ),
        (
            "Ranking",
            universities
                .iter()
                .map(|u| or_dash(u.ranking.map(|r| format!("#{r}"))))
                .collect(),
        ),
        ("Tuition", universities.iter().map(tuition_cell).collect()),
        (
            "Acceptance",
            universities
                .iter()
                .map(|u| or_dash(u.acceptance_rate.map(|r| format!("{:.0}%", r * 100.0))))
                .collect(),
        ),
        (
            "Website",
            universities.iter().map(|u| or_dash(u.website.clone())).collect(),
        ),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let widths: Vec<usize> = (0..universities.len())
        .map(|col| {
            rows.iter()
                .map(|(_, cells)| cells[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for (label, cells) in &rows {
        let mut line = format!("{label:<label_width$}");
        for (cell, width) in cells.iter().zip(&widths) {
            let _ = write!(line, "  {cell:<width$}");
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uni(id: i64, tuition_min: Option<f64>) -> RecommendedUniversity {
        RecommendedUniversity {
            university: University {
                id,
                name: format!("U{id}"),
                country: "Canada".into(),
                tuition_min,
                ..Default::default()
            },
            match_score: 0.5,
            suggested_category: Category::Target,
        }
    }

    #[test]
    fn test_sort_page_by_tuition_low_puts_unknown_last() {
        let mut page = vec![uni(1, Some(5000.0)), uni(2, None), uni(3, Some(2000.0))];
        sort_page(&mut page, SortKey::TuitionLow);
        let order: Vec<Option<f64>> = page.iter().map(|e| e.university.tuition_min).collect();
        assert_eq!(order, vec![Some(2000.0), Some(5000.0), None]);
    }

    #[test]
    fn test_membership_derives_interest_state() {
        let shortlisted = vec![
            ShortlistedUniversity {
                university: uni(1, None).university,
                category: Category::Dream,
                notes: None,
            },
            ShortlistedUniversity {
                university: uni(2, None).university,
                category: Category::Safe,
                notes: None,
            },
        ];
        let locked = vec![uni(2, None).university];
        let membership = Membership::new(&shortlisted, &locked);
        assert_eq!(membership.state_of(1), InterestState::Shortlisted);
        assert_eq!(membership.state_of(2), InterestState::Locked);
        assert_eq!(membership.state_of(3), InterestState::Unlisted);
    }

    #[test]
    fn test_render_page_offers_only_valid_actions() {
        let page = CatalogPage {
            universities: vec![uni(7, Some(1000.0))],
            membership: Membership::default(),
        };
        let text = render_page(&page);
        assert!(text.contains("shortlist 7 --category"));
        assert!(!text.contains("lock 7"));
    }

    #[test]
    fn test_render_empty_page() {
        let page = CatalogPage {
            universities: vec![],
            membership: Membership::default(),
        };
        assert!(render_page(&page).contains("--all"));
    }

    fn shortlisted(id: i64) -> ShortlistedUniversity {
        ShortlistedUniversity {
            university: uni(id, None).university,
            category: Category::Target,
            notes: None,
        }
    }

    fn pool_ids(pool: &[University]) -> Vec<i64> {
        pool.iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_comparison_pool_is_deduplicated_union() {
        let pool = comparison_pool(
            vec![shortlisted(3), shortlisted(1)],
            vec![uni(1, None).university, uni(9, None).university],
        );
        assert_eq!(pool_ids(&pool), vec![3, 1, 9]);
    }

    #[test]
    fn test_default_selection_caps_at_four() {
        let pool: Vec<University> = (1..=6).map(|id| uni(id, None).university).collect();
        let picked = select_for_comparison(pool, &[]).unwrap();
        assert_eq!(pool_ids(&picked), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_explicit_selection_keeps_order_and_collapses_duplicates() {
        let pool: Vec<University> = (1..=3).map(|id| uni(id, None).university).collect();
        let picked = select_for_comparison(pool, &[3, 1, 3]).unwrap();
        assert_eq!(pool_ids(&picked), vec![3, 1]);
    }

    #[test]
    fn test_selection_rejects_outsiders_and_singletons() {
        let pool: Vec<University> = (1..=3).map(|id| uni(id, None).university).collect();

        let err = select_for_comparison(pool.clone(), &[1, 42]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "University 42 is not on your shortlist or locked list"
        );

        let err = select_for_comparison(pool.clone(), &[2]).unwrap_err();
        assert_eq!(err.to_string(), COMPARE_NEEDS_TWO);

        let err = select_for_comparison(vec![pool[0].clone()], &[]).unwrap_err();
        assert_eq!(err.to_string(), COMPARE_NEEDS_TWO);

        let err = select_for_comparison(pool, &[1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(err, ClientError::Precondition(_)));

        assert!(select_for_comparison(vec![], &[]).is_err());
    }

    #[test]
    fn test_render_comparison_lines_up_columns() {
        let eth = University {
            id: 1,
            name: "ETH Zurich".into(),
            country: "Switzerland".into(),
            city: Some("Zurich".into()),
            ranking: Some(7),
            acceptance_rate: Some(0.27),
            tuition_min: Some(730.0),
            tuition_max: Some(730.0),
            currency: Some("CHF".into()),
            website: Some("https://ethz.ch".into()),
            ..Default::default()
        };
        let toronto = University {
            id: 2,
            name: "University of Toronto".into(),
            country: "Canada".into(),
            tuition_min: Some(45000.0),
            tuition_max: Some(60000.0),
            currency: Some("CAD".into()),
            ..Default::default()
        };

        let table = render_comparison(&[eth, toronto]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "            ETH Zurich           University of Toronto");
        assert_eq!(lines[1], "Location    Zurich, Switzerland  Canada");
        assert_eq!(lines[2], "Ranking     #7                   -");
        assert_eq!(lines[3], "Tuition     CHF 730              CAD 45000 - 60000");
        assert_eq!(lines[4], "Acceptance  27%                  -");
        assert_eq!(lines[5], "Website     https://ethz.ch      -");
    }
}
