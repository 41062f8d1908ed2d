//! Login, whoami, cpd status and logout against a mock backend, with the
//! session kept in a temporary file.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cea_backend::{BackendClient, BackendConfig};
use cea_cli::account::{run_cpd_status, run_login, run_logout, run_whoami, CpdArgs, CpdCommand, LoginArgs};
use cea_cli::session::SessionFile;
use cea_cli::EXIT_NOT_COMPLIANT;

const USER_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

fn client(server: &MockServer) -> BackendClient {
    let mut config = BackendConfig::new(server.uri().parse().unwrap(), "anon-key");
    config.timeout_secs = 5;
    BackendClient::new(config).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
}

async fn mount_account(server: &MockServer, license_until: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "user-token",
            "user": {"id": USER_ID, "email": "tan@agency.sg"}
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": USER_ID, "email": "tan@agency.sg"})))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/cea_licenses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "user_id": USER_ID,
            "license_number": "R123456A",
            "status": "Active",
            "valid_until": license_until
        }])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/user_profiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"name": "Tan Mei Ling", "role": "keo"}])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"cpd_compliance_status": false}])))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .respond_with(ResponseTemplate::new(204))
        .mount(server)
        .await;
}

fn login_args(var: &str) -> LoginArgs {
    LoginArgs {
        email: "tan@agency.sg".into(),
        password_env: var.into(),
    }
}

#[tokio::test]
async fn login_persists_session_and_logout_removes_it() {
    let server = MockServer::start().await;
    mount_account(&server, "2027-12-31").await;
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionFile::new(dir.path().join("session.json"));
    let backend = client(&server);
    std::env::set_var("CEA_TEST_PASSWORD_ROUND_TRIP", "pw");

    let code = run_login(&login_args("CEA_TEST_PASSWORD_ROUND_TRIP"), &backend, &sessions, today())
        .await
        .unwrap();
    assert_eq!(code, 0);
    let stored = sessions.load().unwrap().unwrap();
    assert_eq!(stored.access_token.as_str(), "user-token");
    assert_eq!(stored.profile.name, "Tan Mei Ling");
    assert_eq!(stored.profile.cea_registration_number, "R123456A");

    assert_eq!(run_whoami(Some(&backend), &sessions).await.unwrap(), 0);
    assert_eq!(run_whoami(None, &sessions).await.unwrap(), 0);

    assert_eq!(run_logout(Some(&backend), &sessions).await.unwrap(), 0);
    assert!(sessions.load().unwrap().is_none());
    assert!(run_whoami(None, &sessions).await.is_err());
}

#[tokio::test]
async fn login_with_expired_license_saves_nothing() {
    let server = MockServer::start().await;
    mount_account(&server, "2025-12-31").await;
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionFile::new(dir.path().join("session.json"));
    std::env::set_var("CEA_TEST_PASSWORD_EXPIRED", "pw");

    let err = run_login(&login_args("CEA_TEST_PASSWORD_EXPIRED"), &client(&server), &sessions, today())
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("No valid CEA license found"));
    assert!(sessions.load().unwrap().is_none());
}

#[tokio::test]
async fn missing_password_variable_is_reported() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionFile::new(dir.path().join("session.json"));

    let err = run_login(&login_args("CEA_TEST_PASSWORD_UNSET"), &client(&server), &sessions, today())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("CEA_TEST_PASSWORD_UNSET"));
}

#[tokio::test]
async fn cpd_status_evaluates_backend_records() {
    let server = MockServer::start().await;
    mount_account(&server, "2027-12-31").await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/cpd_records"))
        .and(query_param("compliance_year", "eq.2026"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "user_id": USER_ID,
            "course_name": "AML",
            "completion_date": "2026-01-10",
            "compliance_year": 2026,
            "status": "Completed",
            "cpd_category": "Structured_Learning_PE",
            "training_hours": 4
        }])))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempfile::tempdir().unwrap();
    let sessions = SessionFile::new(dir.path().join("session.json"));
    let backend = client(&server);
    std::env::set_var("CEA_TEST_PASSWORD_STATUS", "pw");
    run_login(&login_args("CEA_TEST_PASSWORD_STATUS"), &backend, &sessions, today())
        .await
        .unwrap();

    let args = CpdArgs {
        command: CpdCommand::Status { year: None, json: false },
    };
    let code = run_cpd_status(&args, &backend, &sessions, today()).await.unwrap();
    assert_eq!(code, EXIT_NOT_COMPLIANT);
}
