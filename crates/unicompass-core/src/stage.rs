use serde::{Deserialize, Serialize};

use crate::models::{text_enum, ParseEnumError};

/// Where a student is in their journey. Drives the dashboard progress bar
/// only; no endpoint is gated on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Onboarding,
    Dashboard,
    Discovery,
    Shortlisting,
    Application,
}

text_enum!(Stage, "stage", {
    Onboarding => "onboarding",
    Dashboard => "dashboard",
    Discovery => "discovery",
    Shortlisting => "shortlisting",
    Application => "application",
});

impl Stage {
    /// Zero-based position on the progress bar.
    pub fn position(&self) -> usize {
        Stage::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Onboarding => "Onboarding",
            Stage::Dashboard => "Dashboard",
            Stage::Discovery => "Discovery",
            Stage::Shortlisting => "Shortlisting",
            Stage::Application => "Application",
        }
    }
}
