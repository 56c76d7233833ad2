//! Shared domain types and the pure policies behind UniCompass.
//!
//! Everything here is deterministic and free of I/O so that the API and the
//! client agree on one definition of each rule:
//!
//! - [`gate`]: the shortlist/lock state machine and the application gate
//! - [`completion`]: profile completion percentage
//! - [`sorting`]: client-side catalog ordering
//! - [`seeding`]: default application to-dos
//! - [`stage`]: the journey stages shown on the progress bar

pub mod completion;
pub mod gate;
pub mod models;
pub mod seeding;
pub mod sorting;
pub mod stage;

pub use gate::{application_unlocked, Action, InterestState, TransitionError};
pub use models::{
    AnalysisResponse, Category, ChatRequest, ChatResponse, LockRequest, MessageResponse,
    ParseEnumError, Priority, Profile, ProfileInput, RecommendedUniversity, RegisterRequest,
    ShortlistRequest, ShortlistedUniversity, Todo, TodoInput, TodoPatch, TodoStatus,
    TokenResponse, University, User,
};
pub use stage::Stage;
