pub mod health;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::counsellor::handlers as counsellor;
use crate::profile::handlers as profile;
use crate::state::AppState;
use crate::todos::handlers as todos;
use crate::universities::handlers as universities;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::health_handler))
        // Auth
        .route("/api/auth/register", post(auth::handle_register))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/me", get(auth::handle_me))
        .route("/api/auth/logout", post(auth::handle_logout))
        // Profile
        .route(
            "/api/profile",
            get(profile::handle_get_profile).post(profile::handle_save_profile),
        )
        // Counsellor
        .route("/api/counsellor/chat", post(counsellor::handle_chat))
        .route("/api/counsellor/analysis", get(counsellor::handle_analysis))
        // Universities: static paths win over `:id`
        .route("/api/universities", get(universities::handle_list_universities))
        .route(
            "/api/universities/shortlist",
            post(universities::handle_shortlist),
        )
        .route(
            "/api/universities/shortlisted",
            get(universities::handle_list_shortlisted),
        )
        .route("/api/universities/lock", post(universities::handle_lock))
        .route(
            "/api/universities/lock/:id",
            delete(universities::handle_unlock),
        )
        .route(
            "/api/universities/locked",
            get(universities::handle_list_locked),
        )
        .route(
            "/api/universities/:id",
            get(universities::handle_get_university),
        )
        // To-dos
        .route(
            "/api/todos",
            get(todos::handle_list_todos).post(todos::handle_create_todo),
        )
        .route(
            "/api/todos/:id",
            patch(todos::handle_update_todo).delete(todos::handle_delete_todo),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{test_state, TEST_DATABASE_URL};

    /// The pool never connects; only routes that answer before touching the
    /// database are exercised here.
    fn test_router() -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy(TEST_DATABASE_URL)
            .expect("lazy pool");
        build_router(test_state(db))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        for uri in ["/health", "/api/health"] {
            let response = test_router()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let body = body_json(response).await;
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["service"], "unicompass-api");
        }
    }

    #[tokio::test]
    async fn test_root_names_the_service() {
        let response = test_router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "UniCompass API");
    }

    #[tokio::test]
    async fn test_protected_routes_require_a_token() {
        for uri in [
            "/api/auth/me",
            "/api/profile",
            "/api/universities",
            "/api/universities/shortlisted",
            "/api/universities/locked",
            "/api/todos",
            "/api/counsellor/analysis",
        ] {
            let response = test_router()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
            let body = body_json(response).await;
            assert_eq!(body["detail"], "Could not validate credentials", "{uri}");
            assert_eq!(body["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_malformed_bearer_is_rejected_before_lookup() {
        let response = test_router()
            .oneshot(
                Request::post("/api/universities/lock")
                    .header(header::AUTHORIZATION, "Bearer not-a-uuid")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"university_id": 1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_router()
            .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
