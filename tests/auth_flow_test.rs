use httpmock::prelude::*;
use safepath::{AuthService, FirebaseAuthBackend};
use std::sync::Arc;
use std::time::Duration;

fn auth(server: &MockServer) -> AuthService {
    let backend =
        FirebaseAuthBackend::new(server.base_url(), "test-key", Duration::from_secs(5)).unwrap();
    AuthService::new(Arc::new(backend))
}

#[tokio::test]
async fn test_sign_up_then_verify_flow() {
    let server = MockServer::start();
    let sign_up = server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signUp");
        then.status(200).json_body(serde_json::json!({
            "idToken": "id-token", "email": "ana@example.com", "localId": "uid-1"
        }));
    });
    let oob = server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:sendOobCode");
        then.status(200)
            .json_body(serde_json::json!({"email": "ana@example.com"}));
    });
    let lookup = server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:lookup");
        then.status(200).json_body(serde_json::json!({
            "users": [{"localId": "uid-1", "email": "ana@example.com", "emailVerified": true}]
        }));
    });

    let mut auth = auth(&server);
    assert!(auth.sign_up("ana@example.com", "secreto", "secreto").await);
    sign_up.assert();
    oob.assert();
    assert!(auth.needs_verification());

    assert!(auth.reload().await);
    lookup.assert();
    assert!(!auth.needs_verification());

    assert!(auth.sign_out().await);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_backend_errors_become_user_messages() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signInWithPassword");
        then.status(400).json_body(serde_json::json!({
            "error": {"code": 400, "message": "INVALID_LOGIN_CREDENTIALS"}
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signUp");
        then.status(400).json_body(serde_json::json!({
            "error": {"code": 400, "message": "SOME_NEW_CODE"}
        }));
    });

    let mut auth = auth(&server);
    assert!(!auth.sign_in("ana@example.com", "wrong-password").await);
    assert_eq!(auth.error_message(), Some("Correo o contraseña incorrectos"));

    // unknown codes fall back to the backend message
    assert!(!auth.sign_up("ana@example.com", "secreto", "secreto").await);
    assert_eq!(auth.error_message(), Some("SOME_NEW_CODE"));
}

#[tokio::test]
async fn test_local_validation_skips_backend() {
    let server = MockServer::start();
    let sign_up = server.mock(|when, then| {
        when.method(POST).path("/v1/accounts:signUp");
        then.status(200);
    });

    let mut auth = auth(&server);
    assert!(!auth.sign_up("ana@example.com", "abc", "abc").await);
    assert!(auth.error_message().is_some());
    sign_up.assert_hits(0);
}
