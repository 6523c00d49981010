//! Unit tests for the notes crate
//! Handlers are driven end to end through the session guard with in-memory
//! stores.

#[cfg(test)]
mod http_tests {
    use std::sync::Arc;

    use auth::application::{AuthService, SignUpInput};
    use auth::infra::memory::{MemorySessionStore, MemoryUserRepository};
    use auth::{AuthConfig, SessionGuard};
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::application::config::NotesConfig;
    use crate::infra::memory::{MemoryBlobStore, MemoryNotesRepository};
    use crate::presentation::handlers::NotesAppState;
    use crate::presentation::router::{folders_router_generic, notes_router_generic};

    type Auth = AuthService<MemoryUserRepository, MemorySessionStore>;
    type State = NotesAppState<MemoryNotesRepository, MemoryBlobStore>;

    struct TestApp {
        router: Router,
        auth: Auth,
        state: State,
    }

    impl TestApp {
        fn new() -> Self {
            Self::with_blob_store(MemoryBlobStore::new())
        }

        fn with_blob_store(blob_store: MemoryBlobStore) -> Self {
            let auth = AuthService::new(
                Arc::new(MemoryUserRepository::new()),
                Arc::new(MemorySessionStore::new()),
                Arc::new(AuthConfig::testing()),
            );
            let state = NotesAppState::new(
                MemoryNotesRepository::new(),
                blob_store,
                NotesConfig::default(),
            );
            let guard = SessionGuard::from(&auth);

            let router = Router::new()
                .nest("/notes", notes_router_generic(state.clone(), guard.clone()))
                .nest("/folders", folders_router_generic(state.clone(), guard));

            Self {
                router,
                auth,
                state,
            }
        }

        async fn session_for(&self, email: &str) -> String {
            self.auth
                .register(SignUpInput {
                    email: email.to_string(),
                    password: "pw".to_string(),
                    name: "A".to_string(),
                })
                .await
                .unwrap()
                .session_id
                .to_string()
        }

        async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
            let res = self.router.clone().oneshot(req).await.unwrap();
            let status = res.status();
            let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }

        async fn call(
            &self,
            method: &str,
            uri: &str,
            session: &str,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let builder = Request::builder()
                .method(method)
                .uri(uri)
                .header("x-session-id", session);
            let req = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string())),
                None => builder.body(Body::empty()),
            };
            self.send(req.unwrap()).await
        }
    }

    const BOUNDARY: &str = "X-NOTES-BOUNDARY";

    fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some((file_name, content_type, bytes)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(session: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/notes/upload")
            .header("x-session-id", session)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // Guard
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_notes_require_a_session() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;

        let (status, body) = app.call("GET", "/notes", &session, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let random = kernel::id::SessionId::new().to_string();
        let (status, _) = app.call("GET", "/notes", &random, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let req = Request::builder().uri("/folders").body(Body::empty()).unwrap();
        let (status, _) = app.send(req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_authorization_header_is_accepted() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;

        let req = Request::builder()
            .uri("/notes")
            .header(header::AUTHORIZATION, format!("Session {session}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = app.send(req).await;
        assert_eq!(status, StatusCode::OK);
    }

    // ------------------------------------------------------------------------
    // Notes
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_note_crud() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;

        let (status, created) = app
            .call(
                "POST",
                "/notes",
                &session,
                Some(json!({ "title": "First", "content": "hello" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "First");
        assert_eq!(created["userId"], 1);
        assert!(created["fileUrl"].is_null());
        assert!(created["folderId"].is_null());
        let id = created["id"].as_i64().unwrap();

        let (status, updated) = app
            .call(
                "PATCH",
                &format!("/notes/{id}"),
                &session,
                Some(json!({ "content": "edited" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "First");
        assert_eq!(updated["content"], "edited");

        let (status, deleted) = app
            .call("DELETE", &format!("/notes/{id}"), &session, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted["id"], id);

        let (status, body) = app
            .call("DELETE", &format!("/notes/{id}"), &session, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Note not found");
    }

    #[tokio::test]
    async fn test_other_users_notes_are_invisible() {
        let app = TestApp::new();
        let alice = app.session_for("a@x.com").await;
        let bob = app.session_for("b@x.com").await;

        let (_, note) = app
            .call(
                "POST",
                "/notes",
                &alice,
                Some(json!({ "title": "secret", "content": "x" })),
            )
            .await;
        let id = note["id"].as_i64().unwrap();

        let (_, listed) = app.call("GET", "/notes", &bob, None).await;
        assert_eq!(listed, json!([]));

        let (status, _) = app
            .call(
                "PATCH",
                &format!("/notes/{id}"),
                &bob,
                Some(json!({ "title": "mine now" })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .call("DELETE", &format!("/notes/{id}"), &bob, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_search() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;
        for title in ["Work plan", "Groceries", "homework"] {
            app.call(
                "POST",
                "/notes",
                &session,
                Some(json!({ "title": title, "content": "" })),
            )
            .await;
        }

        let (_, found) = app
            .call("GET", "/notes/search?q=%20WORK%20", &session, None)
            .await;
        let titles: Vec<&str> = found
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["homework", "Work plan"]);

        let (_, all) = app.call("GET", "/notes/search?q=%20", &session, None).await;
        assert_eq!(all.as_array().unwrap().len(), 3);

        let (_, all) = app.call("GET", "/notes/search", &session, None).await;
        assert_eq!(all.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_note_in_foreign_folder_is_rejected() {
        let app = TestApp::new();
        let alice = app.session_for("a@x.com").await;
        let bob = app.session_for("b@x.com").await;

        let (_, folder) = app
            .call("POST", "/folders", &alice, Some(json!({ "name": "Work" })))
            .await;

        let (status, body) = app
            .call(
                "POST",
                "/notes",
                &bob,
                Some(json!({ "title": "t", "content": "c", "folderId": folder["id"] })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Folder not found");
    }

    // ------------------------------------------------------------------------
    // Upload
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_upload_stores_blob_and_links_it() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;

        let body = multipart_body(
            &[("title", "Photo"), ("content", "look")],
            Some(("cat.png", "image/png", &b"\x89PNG"[..])),
        );
        let (status, note) = app.send(upload_request(&session, body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(note["title"], "Photo");

        let url = note["fileUrl"].as_str().unwrap();
        let key = url
            .strip_prefix("http://localhost:9000/notes/")
            .expect("public url prefix");
        assert!(key.ends_with(".png"));
        assert_eq!(key.len(), 36 + 4);

        let stored = app.state.blob_store.get(key).unwrap();
        assert_eq!(stored.content_type, "image/png");
        assert_eq!(&stored.bytes[..], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_upload_requires_fields() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;

        let no_file = multipart_body(&[("title", "t"), ("content", "c")], None);
        let (status, body) = app.send(upload_request(&session, no_file)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "File is required");

        let no_title = multipart_body(&[("content", "c")], Some(("a.txt", "text/plain", &b"x"[..])));
        let (status, body) = app.send(upload_request(&session, no_title)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Title is required");

        let bad_folder = multipart_body(
            &[("title", "t"), ("content", "c"), ("folderId", "abc")],
            Some(("a.txt", "text/plain", &b"x"[..])),
        );
        let (status, _) = app.send(upload_request(&session, bad_folder)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(app.state.blob_store.is_empty());
    }

    #[tokio::test]
    async fn test_upload_blob_failure_is_server_error() {
        let app = TestApp::with_blob_store(MemoryBlobStore::unavailable());
        let session = app.session_for("a@x.com").await;

        let body = multipart_body(
            &[("title", "t"), ("content", "c")],
            Some(("a.txt", "text/plain", &b"x"[..])),
        );
        let (status, body) = app.send(upload_request(&session, body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "File upload failed");

        let (_, notes) = app.call("GET", "/notes", &session, None).await;
        assert_eq!(notes, json!([]));
    }

    // ------------------------------------------------------------------------
    // Folders
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_folder_lifecycle() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;

        let (status, folder) = app
            .call(
                "POST",
                "/folders",
                &session,
                Some(json!({ "name": "Work", "color": "#FF5733" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(folder["noteCount"], 0);
        assert_eq!(folder["color"], "#FF5733");
        let folder_id = folder["id"].as_i64().unwrap();

        let (_, note) = app
            .call(
                "POST",
                "/notes",
                &session,
                Some(json!({ "title": "t", "content": "c", "folderId": folder_id })),
            )
            .await;
        let note_id = note["id"].as_i64().unwrap();

        let (status, fetched) = app
            .call("GET", &format!("/folders/{folder_id}"), &session, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["noteCount"], 1);
        assert_eq!(fetched["notes"][0]["id"], note_id);

        let (status, renamed) = app
            .call(
                "PATCH",
                &format!("/folders/{folder_id}"),
                &session,
                Some(json!({ "name": "Office" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(renamed["name"], "Office");
        assert_eq!(renamed["color"], "#FF5733");

        let (status, _) = app
            .call("DELETE", &format!("/folders/{folder_id}"), &session, None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, notes) = app.call("GET", "/notes", &session, None).await;
        assert!(notes[0]["folderId"].is_null());

        let (status, body) = app
            .call("GET", &format!("/folders/{folder_id}"), &session, None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Folder not found");
    }

    #[tokio::test]
    async fn test_folder_validation() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;

        let (status, _) = app
            .call(
                "POST",
                "/folders",
                &session,
                Some(json!({ "name": "Work", "color": "orange" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call("POST", "/folders", &session, Some(json!({ "name": "  " })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_folders_listed_by_name() {
        let app = TestApp::new();
        let session = app.session_for("a@x.com").await;
        for name in ["Personal", "Archive", "Work"] {
            app.call("POST", "/folders", &session, Some(json!({ "name": name })))
                .await;
        }

        let (_, folders) = app.call("GET", "/folders", &session, None).await;
        let names: Vec<&str> = folders
            .as_array()
            .unwrap()
            .iter()
            .map(|f| f["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Archive", "Personal", "Work"]);
    }

    #[tokio::test]
    async fn test_move_note() {
        let app = TestApp::new();
        let alice = app.session_for("a@x.com").await;
        let bob = app.session_for("b@x.com").await;

        let (_, folder) = app
            .call("POST", "/folders", &alice, Some(json!({ "name": "Work" })))
            .await;
        let (_, note) = app
            .call(
                "POST",
                "/notes",
                &alice,
                Some(json!({ "title": "t", "content": "c" })),
            )
            .await;
        let move_uri = format!("/folders/notes/{}/move", note["id"]);

        let (status, moved) = app
            .call("PUT", &move_uri, &alice, Some(json!({ "folderId": folder["id"] })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(moved["folderId"], folder["id"]);

        let (status, moved) = app
            .call("PUT", &move_uri, &alice, Some(json!({ "folderId": null })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(moved["folderId"].is_null());

        let (status, body) = app
            .call("PUT", &move_uri, &alice, Some(json!({ "folderId": 999 })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Folder not found");

        let (status, body) = app
            .call("PUT", &move_uri, &bob, Some(json!({ "folderId": null })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Note not found");
    }
}
