//! Records and request bodies exchanged between the API and its clients.
//!
//! Persisted records derive `sqlx::FromRow` when the `sqlx` feature is on.
//! Enum columns are stored as lowercase `TEXT` and converted through
//! `TryFrom<String>`.

mod profile;
mod todo;
mod university;
mod user;
mod wire;

use thiserror::Error;

pub use profile::{Profile, ProfileInput};
pub use todo::{Todo, TodoInput, TodoPatch};
pub use university::{RecommendedUniversity, ShortlistedUniversity, University};
pub use user::User;
pub use wire::{
    AnalysisResponse, ChatRequest, ChatResponse, LockRequest, MessageResponse, RegisterRequest,
    ShortlistRequest, TokenResponse,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Implements the string conversions shared by every lowercase `TEXT` enum.
macro_rules! text_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub(crate) use text_enum;

/// How ambitious a shortlisted university is for the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dream,
    Target,
    Safe,
}

text_enum!(Category, "category", {
    Dream => "dream",
    Target => "target",
    Safe => "safe",
});

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

text_enum!(Priority, "priority", {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

text_enum!(TodoStatus, "status", {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
});
