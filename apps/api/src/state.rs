use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::counsellor::Counsellor;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable counsellor backend. Default: `LlmCounsellor`.
    pub counsellor: Arc<dyn Counsellor>,
    pub config: Config,
}
