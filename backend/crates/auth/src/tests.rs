//! Unit tests for the auth crate
//! Service behaviour against the in-memory stores, then the HTTP surface.

#[cfg(test)]
fn memory_service() -> crate::AuthService<
    crate::infra::memory::MemoryUserRepository,
    crate::infra::memory::MemorySessionStore,
> {
    use std::sync::Arc;

    crate::AuthService::new(
        Arc::new(crate::infra::memory::MemoryUserRepository::new()),
        Arc::new(crate::infra::memory::MemorySessionStore::new()),
        Arc::new(crate::AuthConfig::testing()),
    )
}

#[cfg(test)]
mod service_tests {
    use super::memory_service;
    use crate::application::{SignInInput, SignUpInput};
    use crate::domain::repository::SessionStore;
    use crate::error::AuthError;

    fn sign_up(email: &str, password: &str, name: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        }
    }

    fn sign_in(email: &str, password: &str) -> SignInInput {
        SignInInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_validate_session() {
        let service = memory_service();
        let out = service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        let identity = service
            .validate_session(&out.session_id.to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(identity.id, out.user.id);
        assert_eq!(identity.email.as_str(), "a@x.com");
        assert_eq!(identity.name.as_str(), "A");
    }

    #[tokio::test]
    async fn test_validate_user() {
        let service = memory_service();
        service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        let ok = service.validate_user("a@x.com", "pw".into()).await.unwrap();
        assert_eq!(ok.unwrap().email.as_str(), "a@x.com");

        assert!(service.validate_user("a@x.com", "nope".into()).await.unwrap().is_none());
        assert!(service.validate_user("b@x.com", "pw".into()).await.unwrap().is_none());
        assert!(service.validate_user("not-an-email", "pw".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_registration_leaves_first_user() {
        let service = memory_service();
        let first = service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        let err = service
            .register(sign_up("a@x.com", "other", "B"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let user = service.current_user(first.user.id).await.unwrap();
        assert_eq!(user.name.as_str(), "A");
        assert!(service.validate_user("a@x.com", "pw".into()).await.unwrap().is_some());
        assert!(service.validate_user("a@x.com", "other".into()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let service = memory_service();
        service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        let wrong = service.authenticate(sign_in("a@x.com", "nope")).await.unwrap_err();
        let unknown = service.authenticate(sign_in("z@x.com", "pw")).await.unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(
            wrong.to_app_error().to_string(),
            unknown.to_app_error().to_string()
        );
    }

    #[tokio::test]
    async fn test_unknown_email_still_runs_a_verification() {
        let service = memory_service();
        assert!(!service.credentials().decoy_ready());

        assert!(service.validate_user("z@x.com", "pw".into()).await.unwrap().is_none());
        assert!(service.credentials().decoy_ready());
    }

    #[tokio::test]
    async fn test_unusable_input_still_runs_a_verification() {
        for (email, password) in [("not-an-email", "pw"), ("a@x.com", "   ")] {
            let service = memory_service();
            assert!(service.validate_user(email, password.into()).await.unwrap().is_none());
            assert!(service.credentials().decoy_ready(), "{email:?} / {password:?}");
        }
    }

    #[tokio::test]
    async fn test_known_email_verifies_against_its_own_hash() {
        let service = memory_service();
        service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        assert!(service.validate_user("a@x.com", "nope".into()).await.unwrap().is_none());
        assert!(!service.credentials().decoy_ready());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_unknown_email_costs_as_much_as_wrong_password() {
        use std::sync::Arc;
        use std::time::{Duration, Instant};

        use platform::password::HashCost;

        use crate::AuthConfig;
        use crate::infra::memory::{MemorySessionStore, MemoryUserRepository};

        let config = AuthConfig {
            hash_cost: HashCost {
                memory_kib: 4096,
                iterations: 2,
                parallelism: 1,
            },
            ..AuthConfig::testing()
        };
        let service = crate::AuthService::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(MemorySessionStore::new()),
            Arc::new(config),
        );
        service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        // first unknown lookup also builds the decoy hash
        service.validate_user("z@x.com", "pw".into()).await.unwrap();

        let mut known = Duration::ZERO;
        let mut unknown = Duration::ZERO;
        for _ in 0..3 {
            let start = Instant::now();
            service.validate_user("a@x.com", "nope".into()).await.unwrap();
            known += start.elapsed();

            let start = Instant::now();
            service.validate_user("z@x.com", "nope".into()).await.unwrap();
            unknown += start.elapsed();
        }

        assert!(
            unknown * 4 >= known,
            "unknown email took {unknown:?}, wrong password took {known:?}"
        );
    }

    #[tokio::test]
    async fn test_two_logins_give_independent_sessions() {
        let service = memory_service();
        service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        let one = service.authenticate(sign_in("a@x.com", "pw")).await.unwrap();
        let two = service.authenticate(sign_in("a@x.com", "pw")).await.unwrap();
        assert_ne!(one.session_id, two.session_id);

        service.logout(&one.session_id).await.unwrap();
        assert!(service.validate_session(&one.session_id.to_string()).await.unwrap().is_none());
        assert!(service.validate_session(&two.session_id.to_string()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let service = memory_service();
        let out = service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        service.logout(&out.session_id).await.unwrap();
        assert!(service.validate_session(&out.session_id.to_string()).await.unwrap().is_none());
        service.logout(&out.session_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_logout_all_only_touches_one_user() {
        let service = memory_service();
        let a = service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();
        service.authenticate(sign_in("a@x.com", "pw")).await.unwrap();
        let b = service.register(sign_up("b@x.com", "pw", "B")).await.unwrap();

        assert_eq!(service.active_sessions(a.user.id).await.unwrap().len(), 2);
        assert_eq!(service.logout_all_sessions(a.user.id).await.unwrap(), 2);

        assert!(service.active_sessions(a.user.id).await.unwrap().is_empty());
        assert!(service.validate_session(&b.session_id.to_string()).await.unwrap().is_some());
        assert_eq!(service.session_store().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_token_is_not_an_error() {
        let service = memory_service();
        assert!(service.validate_session("abc").await.unwrap().is_none());
        assert!(service.validate_session("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_registration_input() {
        let service = memory_service();
        let err = service.register(sign_up("nope", "pw", "A")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = service.register(sign_up("a@x.com", "  ", "A")).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
        assert!(service.session_store().is_empty());
    }

    #[tokio::test]
    async fn test_extend_session() {
        let service = memory_service();
        let out = service.register(sign_up("a@x.com", "pw", "A")).await.unwrap();

        assert!(service.extend_session(&out.session_id).await.unwrap());
        service.logout(&out.session_id).await.unwrap();
        assert!(!service.extend_session(&out.session_id).await.unwrap());
        assert!(
            service
                .session_store()
                .get_session(&out.session_id)
                .await
                .unwrap()
                .is_none()
        );
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::memory_service;
    use crate::domain::entity::session::SessionData;
    use crate::domain::repository::SessionStore;
    use crate::domain::value_object::{SessionId, user_id::UserId};
    use crate::error::AuthResult;
    use crate::infra::memory::MemoryUserRepository;
    use crate::presentation::router::auth_router_generic;
    use crate::{AuthConfig, AuthService};
    use platform::kv::KvError;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn app() -> Router {
        auth_router_generic(memory_service())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn with_header(method: &str, uri: &str, name: &str, value: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    async fn register(app: &Router, email: &str) -> String {
        let (status, body) = send(
            app,
            post_json(
                "/register",
                json!({ "email": email, "password": "pw", "name": "A" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["sessionId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_register_response_shape() {
        let app = app();
        let (status, body) = send(
            &app,
            post_json(
                "/register",
                json!({ "email": "a@x.com", "password": "pw", "name": "A" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["sessionId"].as_str().unwrap().len(), 36);
        assert_eq!(body["user"]["id"], 1);
        assert_eq!(body["user"]["email"], "a@x.com");
        assert_eq!(body["user"]["name"], "A");
        assert!(body["user"]["createdAt"].is_string());
        assert!(body["user"].get("password").is_none());
        assert!(body["user"].get("passwordHash").is_none());
    }

    #[tokio::test]
    async fn test_duplicate_register_is_conflict() {
        let app = app();
        register(&app, "a@x.com").await;

        let (status, body) = send(
            &app,
            post_json(
                "/register",
                json!({ "email": "a@x.com", "password": "pw2", "name": "B" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "User with this email already exists");
    }

    #[tokio::test]
    async fn test_login() {
        let app = app();
        register(&app, "a@x.com").await;

        let (status, body) = send(
            &app,
            post_json("/login", json!({ "email": "a@x.com", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["email"], "a@x.com");
        assert!(body["user"].get("createdAt").is_none());

        let (status, _) = send(
            &app,
            post_json("/login", json!({ "email": "a@x.com", "password": "bad" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_guard_rejects_missing_and_unknown_sessions_alike() {
        let app = app();
        let random = kernel::id::SessionId::new().to_string();

        let (missing, missing_body) = send(
            &app,
            Request::builder().uri("/me").body(Body::empty()).unwrap(),
        )
        .await;
        let (unknown, unknown_body) = send(&app, with_header("GET", "/me", "x-session-id", &random)).await;
        let (malformed, malformed_body) =
            send(&app, with_header("GET", "/me", "x-session-id", "abc")).await;

        assert_eq!(missing, StatusCode::UNAUTHORIZED);
        assert_eq!(unknown, StatusCode::UNAUTHORIZED);
        assert_eq!(malformed, StatusCode::UNAUTHORIZED);
        assert_eq!(missing_body, unknown_body);
        assert_eq!(unknown_body, malformed_body);
    }

    #[tokio::test]
    async fn test_authorization_header_equals_session_header() {
        let app = app();
        let session_id = register(&app, "a@x.com").await;

        let (via_custom, custom_body) =
            send(&app, with_header("GET", "/me", "x-session-id", &session_id)).await;
        let (via_auth, auth_body) = send(
            &app,
            with_header("GET", "/me", "authorization", &format!("Session {session_id}")),
        )
        .await;

        assert_eq!(via_custom, StatusCode::OK);
        assert_eq!(via_auth, StatusCode::OK);
        assert_eq!(custom_body, auth_body);
        assert_eq!(custom_body["email"], "a@x.com");

        let (bearer, _) = send(
            &app,
            with_header("GET", "/me", "authorization", &format!("Bearer {session_id}")),
        )
        .await;
        assert_eq!(bearer, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let app = app();
        let session_id = register(&app, "a@x.com").await;

        let (status, body) = send(&app, with_header("POST", "/logout", "x-session-id", &session_id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Logged out successfully");

        let (status, _) = send(&app, with_header("GET", "/me", "x-session-id", &session_id)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, with_header("POST", "/logout", "x-session-id", &session_id)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_sessions_and_logout_all() {
        let app = app();
        let first = register(&app, "a@x.com").await;
        let (_, body) = send(
            &app,
            post_json("/login", json!({ "email": "a@x.com", "password": "pw" })),
        )
        .await;
        let second = body["sessionId"].as_str().unwrap().to_string();

        let (status, body) = send(&app, with_header("GET", "/sessions", "x-session-id", &first)).await;
        assert_eq!(status, StatusCode::OK);
        let mut sessions: Vec<String> = serde_json::from_value(body["sessions"].clone()).unwrap();
        sessions.sort();
        let mut expected = vec![first.clone(), second.clone()];
        expected.sort();
        assert_eq!(sessions, expected);

        let (status, body) =
            send(&app, with_header("POST", "/logout-all", "x-session-id", &second)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sessionsRevoked"], 2);

        let (status, _) = send(&app, with_header("GET", "/me", "x-session-id", &first)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    /// Session store that is always unreachable.
    struct DownSessionStore;

    impl SessionStore for DownSessionStore {
        async fn set_session(&self, _: &SessionId, _: &SessionData, _: Duration) -> AuthResult<()> {
            Err(KvError::Closed.into())
        }

        async fn get_session(&self, _: &SessionId) -> AuthResult<Option<SessionData>> {
            Err(KvError::Closed.into())
        }

        async fn delete_session(&self, _: &SessionId) -> AuthResult<()> {
            Err(KvError::Closed.into())
        }

        async fn extend_session(&self, _: &SessionId, _: Duration) -> AuthResult<bool> {
            Err(KvError::Closed.into())
        }

        async fn delete_all_user_sessions(&self, _: UserId) -> AuthResult<u64> {
            Err(KvError::Closed.into())
        }

        async fn get_active_sessions(&self, _: UserId) -> AuthResult<Vec<SessionId>> {
            Err(KvError::Closed.into())
        }
    }

    fn down_app() -> Router {
        auth_router_generic(AuthService::new(
            Arc::new(MemoryUserRepository::new()),
            Arc::new(DownSessionStore),
            Arc::new(AuthConfig::testing()),
        ))
    }

    #[tokio::test]
    async fn test_store_outage_on_guard_is_unauthorized() {
        let app = down_app();
        let random = SessionId::new().to_string();

        let (missing, missing_body) = send(
            &app,
            Request::builder().uri("/me").body(Body::empty()).unwrap(),
        )
        .await;
        let (status, body) = send(&app, with_header("GET", "/me", "x-session-id", &random)).await;

        assert_eq!(missing, StatusCode::UNAUTHORIZED);
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, missing_body);
    }

    #[tokio::test]
    async fn test_store_outage_on_register_and_login_is_unavailable() {
        let app = down_app();

        let (status, body) = send(
            &app,
            post_json(
                "/register",
                json!({ "email": "a@x.com", "password": "pw", "name": "A" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["detail"], "Service temporarily unavailable");
        assert!(!body.to_string().contains("closed"));

        // the user row was written before the session failed
        let (status, body) = send(
            &app,
            post_json("/login", json!({ "email": "a@x.com", "password": "pw" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["detail"], "Service temporarily unavailable");
    }

    #[tokio::test]
    async fn test_extend_session_route() {
        let app = app();
        let session_id = register(&app, "a@x.com").await;

        let (status, body) = send(
            &app,
            with_header("POST", "/session/extend", "x-session-id", &session_id),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Session extended");
    }
}

#[cfg(test)]
mod dto_tests {
    use crate::presentation::dto::{LoginRequest, LogoutAllResponse, RegisterRequest};

    #[test]
    fn test_register_request_deserialization() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"pw","name":"A"}"#).unwrap();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.name, "A");
    }

    #[test]
    fn test_login_request_requires_password() {
        assert!(serde_json::from_str::<LoginRequest>(r#"{"email":"a@x.com"}"#).is_err());
    }

    #[test]
    fn test_logout_all_serialization() {
        let json = serde_json::to_value(LogoutAllResponse {
            message: "done".into(),
            sessions_revoked: 3,
        })
        .unwrap();
        assert_eq!(json["sessionsRevoked"], 3);
    }
}
