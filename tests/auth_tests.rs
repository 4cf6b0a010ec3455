//! Integration tests for the password and device-code grants against mocked
//! authority endpoints

use groupctl::config::AppSettings;
use groupctl::error::GroupctlError;
use groupctl::graph::auth::{GraphAuth, Password};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> AppSettings {
    AppSettings::from_json(
        &serde_json::json!({
            "applicationId": "app-1",
            "tenantId": "tenant-1",
            "authorityHost": server.uri()
        })
        .to_string(),
    )
    .unwrap()
}

fn password(secret: &str) -> Password {
    let mut password = Password::new();
    for c in secret.chars() {
        password.push(c);
    }
    password
}

#[tokio::test]
async fn test_password_grant_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=app-1"))
        .and(body_string_contains("username=adele%40contoso.com"))
        .and(body_string_contains("Group.ReadWrite.All"))
        .and(body_string_contains("Directory.Read.All"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "scope": "User.Read User.ReadBasic.All Group.Read.All Group.ReadWrite.All Directory.Read.All",
            "expires_in": 3599,
            "access_token": "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9.test"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let auth = GraphAuth::new(&settings);
    assert_eq!(auth.authority(), format!("{}/tenant-1/v2.0", server.uri()));

    let token = auth
        .login_password("adele@contoso.com", password("p@ss"))
        .await
        .unwrap();

    assert_eq!(token.secret(), "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9.test");
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_password_grant_invalid_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "AADSTS50126: Error validating credentials due to invalid username or password."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let err = GraphAuth::new(&settings)
        .login_password("adele@contoso.com", password("wrong"))
        .await
        .unwrap_err();

    match err {
        GroupctlError::AuthError(msg) => {
            assert!(msg.contains("invalid_grant"));
            assert!(msg.contains("AADSTS50126"));
            assert!(!msg.contains("wrong"));
        }
        other => panic!("expected AuthError, got {:?}", other),
    }
}

async fn mount_device_authorization(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/devicecode"))
        .and(body_string_contains("client_id=app-1"))
        .and(body_string_contains("User.ReadBasic.All"))
        .and(body_string_contains("Group.Read.All"))
        .and(body_string_contains("Directory.Read.All"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "device_code": "dev-code-1",
            "user_code": "ABCD-EFGH",
            "verification_uri": "https://microsoft.com/devicelogin",
            "expires_in": 900,
            "interval": 1,
            "message": "To sign in, use a web browser to open the page https://microsoft.com/devicelogin and enter the code ABCD-EFGH to authenticate."
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_device_code_grant_polls_until_token() {
    let server = MockServer::start().await;
    mount_device_authorization(&server).await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(body_string_contains("device_code=dev-code-1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "authorization_pending",
            "error_description": "AADSTS70016: OAuth 2.0 device flow error. Authorization is pending."
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .and(body_string_contains("grant-type%3Adevice_code"))
        .and(body_string_contains("device_code=dev-code-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "scope": "User.Read User.ReadBasic.All Group.Read.All Group.ReadWrite.All Directory.Read.All",
            "expires_in": 3599,
            "access_token": "device-flow-token"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let token = GraphAuth::new(&settings).login_device_code().await.unwrap();

    assert_eq!(token.secret(), "device-flow-token");
    assert!(!token.is_expired());
}

#[tokio::test]
async fn test_device_code_grant_access_denied() {
    let server = MockServer::start().await;
    mount_device_authorization(&server).await;

    Mock::given(method("POST"))
        .and(path("/tenant-1/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "access_denied",
            "error_description": "AADSTS70000: The user denied the authorization request."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let err = GraphAuth::new(&settings)
        .login_device_code()
        .await
        .unwrap_err();

    match err {
        GroupctlError::AuthError(msg) => {
            assert!(msg.contains("access_denied"));
            assert!(msg.contains("AADSTS70000"));
        }
        other => panic!("expected AuthError, got {:?}", other),
    }
}
