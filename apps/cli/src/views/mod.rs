//! Page views. Each loads what it needs through the [`ApiClient`] on every
//! call and renders plain text; nothing is cached between loads.
//!
//! [`ApiClient`]: crate::client::ApiClient

pub mod application;
pub mod dashboard;
pub mod universities;

use unicompass_core::{Stage, University};

/// One-line journey bar, e.g. `[x] Onboarding > [x] Dashboard > [ ] Discovery`.
pub fn stage_bar(current: Stage) -> String {
    Stage::ALL
        .iter()
        .map(|stage| {
            let mark = if stage.position() <= current.position() {
                'x'
            } else {
                ' '
            };
            format!("[{mark}] {}", stage.label())
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

pub fn format_money(amount: Option<f64>, currency: Option<&str>) -> String {
    match amount {
        Some(v) => format!("{} {:.0}", currency.unwrap_or("USD"), v),
        None => "n/a".to_string(),
    }
}

pub fn format_percent(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.0}%", r * 100.0),
        None => "n/a".to_string(),
    }
}

/// `Name (City, Country) #rank`
pub fn university_heading(university: &University) -> String {
    let place = match &university.city {
        Some(city) => format!("{city}, {}", university.country),
        None => university.country.clone(),
    };
    match university.ranking {
        Some(rank) => format!("{} ({place}) #{rank}", university.name),
        None => format!("{} ({place})", university.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_bar_marks_reached_stages() {
        let bar = stage_bar(Stage::Discovery);
        assert!(bar.starts_with("[x] Onboarding > [x] Dashboard > [x] Discovery"));
        assert!(bar.ends_with("[ ] Application"));
    }

    #[test]
    fn test_formatting_helpers() {
        assert_eq!(format_money(Some(42_500.4), Some("EUR")), "EUR 42500");
        assert_eq!(format_money(None, None), "n/a");
        assert_eq!(format_percent(Some(0.07)), "7%");

        let uni = University {
            id: 1,
            name: "University of Toronto".into(),
            country: "Canada".into(),
            city: Some("Toronto".into()),
            ranking: Some(21),
            ..Default::default()
        };
        assert_eq!(
            university_heading(&uni),
            "University of Toronto (Toronto, Canada) #21"
        );
    }
}
