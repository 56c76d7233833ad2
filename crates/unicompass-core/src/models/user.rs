use serde::{Deserialize, Serialize};

use crate::stage::Stage;

/// Public view of an account. The password hash never leaves the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_onboarded: bool,
    #[cfg_attr(feature = "sqlx", sqlx(try_from = "String"))]
    pub current_stage: Stage,
}
