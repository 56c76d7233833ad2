pub mod handlers;
pub mod prompts;

use async_trait::async_trait;
use tracing::warn;
use unicompass_core::{Profile, Stage};

use crate::errors::AppError;
use crate::llm_client::{LlmClient, LlmError};

/// Reply used when the model API keeps rate limiting us.
pub const RATE_LIMIT_MESSAGE: &str = "The AI Counsellor has reached its rate limit. \
    Please try again in about a minute.";

/// What the counsellor knows about the student's progress besides the profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatContext {
    pub stage: Stage,
    /// `"<name> (<category>)"` per shortlisted university.
    pub shortlisted: Vec<String>,
    pub locked: Vec<String>,
}

/// Counsellor backend. Carried in `AppState` as `Arc<dyn Counsellor>` so
/// tests can swap in a canned implementation.
#[async_trait]
pub trait Counsellor: Send + Sync {
    async fn chat(
        &self,
        profile: &Profile,
        context: &ChatContext,
        message: &str,
    ) -> Result<String, AppError>;

    async fn analyze(&self, profile: &Profile) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmCounsellor
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmCounsellor {
    llm: LlmClient,
}

impl LlmCounsellor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    async fn ask(&self, prompt: &str) -> Result<String, AppError> {
        match self.llm.call_text(prompt, prompts::COUNSELLOR_SYSTEM).await {
            Ok(text) => Ok(text),
            Err(e) => recover(e),
        }
    }
}

/// Rate limits become a friendly reply; everything else is a server error.
fn recover(err: LlmError) -> Result<String, AppError> {
    if err.is_rate_limited() {
        warn!("Counsellor rate limited: {err}");
        Ok(RATE_LIMIT_MESSAGE.to_string())
    } else {
        Err(AppError::Llm(err.to_string()))
    }
}

#[async_trait]
impl Counsellor for LlmCounsellor {
    async fn chat(
        &self,
        profile: &Profile,
        context: &ChatContext,
        message: &str,
    ) -> Result<String, AppError> {
        self.ask(&prompts::chat_prompt(profile, context, message))
            .await
    }

    async fn analyze(&self, profile: &Profile) -> Result<String, AppError> {
        self.ask(&prompts::analysis_prompt(profile)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_becomes_friendly_reply() {
        let reply = recover(LlmError::RateLimited { retries: 3 }).unwrap();
        assert_eq!(reply, RATE_LIMIT_MESSAGE);
    }

    #[test]
    fn test_other_failures_surface_as_errors() {
        let result = recover(LlmError::Api {
            status: 400,
            message: "bad request".into(),
        });
        assert!(matches!(result, Err(AppError::Llm(_))));
        assert!(matches!(recover(LlmError::EmptyContent), Err(AppError::Llm(_))));
    }
}
