//! REST client for the UniCompass API.
//!
//! Every request carries the session's bearer token when there is one. A 401
//! clears the session (and its file) before the error is returned; there is no
//! retry and no timeout.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use unicompass_core::{
    AnalysisResponse, Category, ChatRequest, ChatResponse, LockRequest, MessageResponse, Profile,
    ProfileInput, RecommendedUniversity, RegisterRequest, ShortlistRequest,
    ShortlistedUniversity, Todo, TodoInput, TodoPatch, TokenResponse, University, User,
};

use crate::envelope::normalize_list;
use crate::error::{extract_detail, ClientError};
use crate::session::{Session, SessionStore};

/// Query parameters of the catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CatalogFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget_max: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub show_all: bool,
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<RwLock<Session>>,
    store: Option<SessionStore>,
}

impl ApiClient {
    /// `store`, when given, receives every change to the session.
    pub fn new(base_url: impl Into<String>, session: Session, store: Option<SessionStore>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            session: Arc::new(RwLock::new(session)),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// A copy of the current session.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn persist_session(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let session = self.session.read().await.clone();
        if let Err(e) = store.persist(&session) {
            warn!("Could not save session to {}: {e}", store.path().display());
        }
    }

    async fn expire_session(&self) {
        self.session.write().await.clear();
        self.persist_session().await;
    }

    // ────────────────────────────────────────────────────────────────────────
    // Transport
    // ────────────────────────────────────────────────────────────────────────

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let token = self.session.read().await.token.clone();
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|source| ClientError::Unreachable {
                url: self.base_url.clone(),
                source,
            })?;

        let status = response.status();
        debug!("{} {}", status.as_u16(), response.url().path());
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(status.as_u16(), &body);
        if status == StatusCode::UNAUTHORIZED {
            self.expire_session().await;
            return Err(ClientError::Unauthorized { detail });
        }
        Err(ClientError::Api {
            status: status.as_u16(),
            detail,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Vec<T>, ClientError> {
        normalize_list(self.fetch::<Value>(request).await?)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Auth
    // ────────────────────────────────────────────────────────────────────────

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<User, ClientError> {
        let body = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        };
        self.fetch(self.http.post(self.url("/api/auth/register")).json(&body))
            .await
    }

    /// Exchanges credentials for a token, then loads the user into the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ClientError> {
        let form = [("username", email), ("password", password)];
        let token: TokenResponse = self
            .fetch(self.http.post(self.url("/api/auth/login")).form(&form))
            .await?;

        self.session.write().await.token = Some(token.access_token);
        self.refresh_user().await
    }

    /// Re-reads the user into the session, e.g. after a stage change.
    pub async fn refresh_user(&self) -> Result<User, ClientError> {
        let user: User = self.fetch(self.http.get(self.url("/api/auth/me"))).await?;
        self.session.write().await.user = Some(user.clone());
        self.persist_session().await;
        Ok(user)
    }

    /// Revokes the token server-side when possible; the local session is
    /// cleared either way.
    pub async fn logout(&self) {
        if self.session.read().await.is_authenticated() {
            let revoked = self
                .fetch::<MessageResponse>(self.http.post(self.url("/api/auth/logout")))
                .await;
            if let Err(e) = revoked {
                warn!("Server-side logout failed: {e}");
            }
        }
        self.expire_session().await;
    }

    // ────────────────────────────────────────────────────────────────────────
    // Profile
    // ────────────────────────────────────────────────────────────────────────

    /// `None` until onboarding has saved a profile.
    pub async fn get_profile(&self) -> Result<Option<Profile>, ClientError> {
        match self.fetch(self.http.get(self.url("/api/profile"))).await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn save_profile(&self, input: &ProfileInput) -> Result<Profile, ClientError> {
        let profile = self
            .fetch(self.http.post(self.url("/api/profile")).json(input))
            .await?;
        self.refresh_user().await?;
        Ok(profile)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Universities
    // ────────────────────────────────────────────────────────────────────────

    pub async fn list_universities(
        &self,
        filters: &CatalogFilters,
    ) -> Result<Vec<RecommendedUniversity>, ClientError> {
        self.fetch_list(self.http.get(self.url("/api/universities")).query(filters))
            .await
    }

    pub async fn get_university(&self, id: i64) -> Result<University, ClientError> {
        self.fetch(self.http.get(self.url(&format!("/api/universities/{id}"))))
            .await
    }

    pub async fn shortlist(
        &self,
        university_id: i64,
        category: Category,
        notes: Option<String>,
    ) -> Result<MessageResponse, ClientError> {
        let body = ShortlistRequest {
            university_id,
            category,
            notes,
        };
        self.fetch(
            self.http
                .post(self.url("/api/universities/shortlist"))
                .json(&body),
        )
        .await
    }

    pub async fn list_shortlisted(&self) -> Result<Vec<ShortlistedUniversity>, ClientError> {
        self.fetch_list(self.http.get(self.url("/api/universities/shortlisted")))
            .await
    }

    pub async fn lock(&self, university_id: i64) -> Result<MessageResponse, ClientError> {
        self.fetch(
            self.http
                .post(self.url("/api/universities/lock"))
                .json(&LockRequest { university_id }),
        )
        .await
    }

    pub async fn list_locked(&self) -> Result<Vec<University>, ClientError> {
        self.fetch_list(self.http.get(self.url("/api/universities/locked")))
            .await
    }

    pub async fn unlock(&self, university_id: i64) -> Result<MessageResponse, ClientError> {
        self.fetch(
            self.http
                .delete(self.url(&format!("/api/universities/lock/{university_id}"))),
        )
        .await
    }

    // ────────────────────────────────────────────────────────────────────────
    // To-dos
    // ────────────────────────────────────────────────────────────────────────

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        self.fetch_list(self.http.get(self.url("/api/todos"))).await
    }

    pub async fn create_todo(&self, input: &TodoInput) -> Result<Todo, ClientError> {
        self.fetch(self.http.post(self.url("/api/todos")).json(input))
            .await
    }

    pub async fn update_todo(&self, id: i64, patch: &TodoPatch) -> Result<Todo, ClientError> {
        self.fetch(
            self.http
                .patch(self.url(&format!("/api/todos/{id}")))
                .json(patch),
        )
        .await
    }

    pub async fn delete_todo(&self, id: i64) -> Result<MessageResponse, ClientError> {
        self.fetch(self.http.delete(self.url(&format!("/api/todos/{id}"))))
            .await
    }

    // ────────────────────────────────────────────────────────────────────────
    // Counsellor
    // ────────────────────────────────────────────────────────────────────────

    pub async fn chat(&self, message: &str) -> Result<String, ClientError> {
        let body = ChatRequest {
            message: message.to_string(),
        };
        let reply: ChatResponse = self
            .fetch(self.http.post(self.url("/api/counsellor/chat")).json(&body))
            .await?;
        Ok(reply.response)
    }

    pub async fn analysis(&self) -> Result<String, ClientError> {
        let reply: AnalysisResponse = self
            .fetch(self.http.get(self.url("/api/counsellor/analysis")))
            .await?;
        Ok(reply.analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_omit_unset_params() {
        let filters = CatalogFilters {
            country: Some("Germany".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            serde_json::json!({"country": "Germany"})
        );

        let all = CatalogFilters {
            show_all: true,
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&all).unwrap(),
            serde_json::json!({"show_all": true})
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/", Session::default(), None);
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/api/todos"), "http://localhost:8080/api/todos");
    }
}
