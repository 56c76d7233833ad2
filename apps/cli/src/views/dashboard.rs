use std::fmt::Write as _;

use tracing::warn;
use unicompass_core::completion::{completion_percent, missing_fields};
use unicompass_core::{application_unlocked, Profile, ShortlistedUniversity, University, User};

use crate::client::ApiClient;
use crate::error::ClientError;
use crate::views::{stage_bar, university_heading};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub profile: Option<Profile>,
    pub analysis: Option<String>,
    pub shortlisted: Vec<ShortlistedUniversity>,
    pub locked: Vec<University>,
}

fn or_log<T>(what: &str, result: Result<T, ClientError>, fallback: T) -> T {
    result.unwrap_or_else(|e| {
        warn!("Dashboard could not load {what}: {e}");
        fallback
    })
}

/// Fires the four independent GETs together. A failing branch degrades to
/// an absent or empty value and never blocks the others.
pub async fn load(client: &ApiClient) -> Dashboard {
    let (profile, analysis, shortlisted, locked) = tokio::join!(
        client.get_profile(),
        client.analysis(),
        client.list_shortlisted(),
        client.list_locked(),
    );

    Dashboard {
        profile: or_log("profile", profile, None),
        analysis: or_log("analysis", analysis.map(Some), None),
        shortlisted: or_log("shortlisted universities", shortlisted, Vec::new()),
        locked: or_log("locked universities", locked, Vec::new()),
    }
}

pub fn render(user: &User, dashboard: &Dashboard) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Welcome back, {}!", user.full_name);
    let _ = writeln!(out, "{}", stage_bar(user.current_stage));
    let _ = writeln!(out, "Current stage: {}", user.current_stage.label());
    let _ = writeln!(out);

    match &dashboard.profile {
        Some(profile) => {
            let _ = writeln!(out, "Profile completion: {}%", completion_percent(profile));
            let missing = missing_fields(profile);
            if !missing.is_empty() {
                let _ = writeln!(out, "  Still missing: {}", missing.join(", "));
            }
        }
        None => {
            let _ = writeln!(out, "Profile completion: 0% (complete onboarding to begin)");
        }
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Shortlisted ({}):", dashboard.shortlisted.len());
    for entry in &dashboard.shortlisted {
        let _ = writeln!(
            out,
            "  - {} [{}]",
            university_heading(&entry.university),
            entry.category
        );
    }
    let _ = writeln!(out, "Locked ({}):", dashboard.locked.len());
    for university in &dashboard.locked {
        let _ = writeln!(out, "  - {}", university_heading(university));
    }
    let _ = writeln!(out);

    if application_unlocked(dashboard.locked.len()) {
        let _ = writeln!(
            out,
            "Application guidance is open: run `unicompass application`."
        );
    } else if dashboard.shortlisted.is_empty() {
        let _ = writeln!(
            out,
            "Next step: browse universities with `unicompass universities list`."
        );
    } else {
        let _ = writeln!(
            out,
            "Next step: lock a shortlisted university to unlock application guidance."
        );
    }

    if let Some(analysis) = &dashboard.analysis {
        let _ = writeln!(out);
        let _ = writeln!(out, "Counsellor analysis:");
        let _ = writeln!(out, "{analysis}");
    }
    out
}
