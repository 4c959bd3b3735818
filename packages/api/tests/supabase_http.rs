//! `SupabaseClient` and the session re-check against a local stand-in for the
//! hosted REST and auth endpoints.

#![cfg(feature = "server")]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use api::session::{self, Checked, StoredSession};
use api::settings::Supabase;
use api::supabase::SupabaseClient;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use domain::{
    AuthBackend, AuthEvent, AuthUser, BackendErrorKind, Client, GatewayConfig, NewClient,
    RecordGateway, SessionTokens,
};
use serde_json::{json, Value};

const ANON_KEY: &str = "anon-key";

#[derive(Default)]
struct Stub {
    rows: Vec<Client>,
    next_id: i64,
    bearers: Vec<String>,
    bootstrapped: bool,
}

type Shared = Arc<Mutex<Stub>>;

fn record(state: &Shared, headers: &HeaderMap) -> Result<(), StatusCode> {
    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some(ANON_KEY) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.lock().unwrap().bearers.push(bearer);
    Ok(())
}

fn id_param(params: &HashMap<String, String>) -> i64 {
    params["id"].trim_start_matches("eq.").parse().unwrap()
}

async fn select(
    State(state): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Err(status) = record(&state, &headers) {
        return (status, Json(json!({}))).into_response();
    }
    if table != "clients" && !state.lock().unwrap().bootstrapped {
        let body = json!({
            "code": "PGRST205",
            "details": null,
            "hint": null,
            "message": format!("Could not find the table 'public.{table}' in the schema cache"),
        });
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }
    Json(state.lock().unwrap().rows.clone()).into_response()
}

async fn insert(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(row): Json<NewClient>,
) -> impl IntoResponse {
    if let Err(status) = record(&state, &headers) {
        return (status, Json(json!({}))).into_response();
    }
    if headers.get("prefer").and_then(|v| v.to_str().ok()) != Some("return=representation") {
        return (StatusCode::CREATED, Json(json!([]))).into_response();
    }
    let mut stub = state.lock().unwrap();
    stub.next_id += 1;
    let client = row.with_id(stub.next_id);
    stub.rows.push(client.clone());
    (StatusCode::CREATED, Json(vec![client])).into_response()
}

async fn update(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<NewClient>,
) -> StatusCode {
    if let Err(status) = record(&state, &headers) {
        return status;
    }
    let id = id_param(&params);
    let mut stub = state.lock().unwrap();
    if let Some(row) = stub.rows.iter_mut().find(|c| c.id == id) {
        *row = patch.with_id(id);
    }
    StatusCode::NO_CONTENT
}

async fn delete(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> StatusCode {
    if let Err(status) = record(&state, &headers) {
        return status;
    }
    let id = id_param(&params);
    state.lock().unwrap().rows.retain(|c| c.id != id);
    StatusCode::NO_CONTENT
}

async fn rpc(State(state): State<Shared>, Path(procedure): Path<String>) -> impl IntoResponse {
    if procedure != "create_clients_table" {
        let body = json!({"code": "PGRST202", "message": "Could not find the function"});
        return (StatusCode::NOT_FOUND, Json(body)).into_response();
    }
    state.lock().unwrap().bootstrapped = true;
    StatusCode::NO_CONTENT.into_response()
}

async fn token(
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if body["refresh_token"] == "rt-down" {
        return (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response();
    }
    let accepted = match params.get("grant_type").map(String::as_str) {
        Some("password") => body["password"] == "secret",
        Some("refresh_token") => body["refresh_token"] == "rt-1",
        _ => false,
    };
    if !accepted {
        let body = json!({
            "code": 400,
            "error_code": "invalid_credentials",
            "msg": "Invalid login credentials",
        });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }
    Json(json!({
        "access_token": "at-1",
        "token_type": "bearer",
        "expires_in": 3600,
        "refresh_token": "rt-1",
        "user": {"id": "u1", "email": "ana@clients.io"},
    }))
    .into_response()
}

async fn signup(Json(body): Json<Value>) -> impl IntoResponse {
    if body["email"] == "taken@clients.io" {
        let body = json!({
            "code": 422,
            "error_code": "user_already_exists",
            "msg": "User already registered",
        });
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
    }
    Json(json!({"id": "u2", "email": body["email"], "confirmation_sent_at": "2024-01-01T00:00:00Z"}))
        .into_response()
}

async fn user(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Bearer at-1") => {
            Json(json!({"id": "u1", "email": "ana@clients.io"})).into_response()
        }
        Some("Bearer at-down") => {
            (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response()
        }
        _ => {
            let body = json!({"code": 403, "error_code": "bad_jwt", "msg": "invalid JWT"});
            (StatusCode::FORBIDDEN, Json(body)).into_response()
        }
    }
}

async fn spawn_stub() -> (SupabaseClient, Shared) {
    let state = Shared::default();
    let app = Router::new()
        .route(
            "/rest/v1/{table}",
            get(select).post(insert).patch(update).delete(delete),
        )
        .route("/rest/v1/rpc/{procedure}", post(rpc))
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/logout", post(|| async { StatusCode::NO_CONTENT }))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

    let project = Supabase {
        url: format!("http://{addr}/"),
        anon_key: ANON_KEY.to_string(),
    };
    (SupabaseClient::new(reqwest::Client::new(), project), state)
}

#[tokio::test]
async fn test_record_round_trip() {
    let (client, state) = spawn_stub().await;
    let gateway = RecordGateway::new(client);

    let ana = gateway.create(NewClient::new("Ana", "a@x.com", "")).await.unwrap();
    let bob = gateway.create(NewClient::new("Bob", "b@x.com", "555")).await.unwrap();
    assert_eq!((ana.id, bob.id), (1, 2));

    gateway
        .update(ana.id, NewClient::new("Ana B", "a@x.com", "1"))
        .await
        .unwrap();
    gateway.delete(bob.id).await.unwrap();

    let rows = gateway.list().await.unwrap();
    assert_eq!(rows, vec![NewClient::new("Ana B", "a@x.com", "1").with_id(1)]);

    // No user attached: every call went out with the anon key as bearer.
    let bearers = state.lock().unwrap().bearers.clone();
    assert!(bearers.iter().all(|b| b == &format!("Bearer {ANON_KEY}")));
}

#[tokio::test]
async fn test_ensure_schema_bootstraps_missing_relation() {
    let (client, state) = spawn_stub().await;
    let gateway =
        RecordGateway::with_config(client, GatewayConfig::default().with_table("missing"));

    let err = gateway.list().await.unwrap_err();
    assert_eq!(err.backend().kind, BackendErrorKind::RelationNotFound);

    assert!(gateway.ensure_schema().await);
    assert!(state.lock().unwrap().bootstrapped);

    // Present now: probing again does not bootstrap.
    assert!(!gateway.ensure_schema().await);
}

#[tokio::test]
async fn test_password_sign_in_and_user_lookup() {
    let (client, state) = spawn_stub().await;
    let mut events = client.events().subscribe();

    let err = client.sign_in_with_password("ana@clients.io", "nope").await.unwrap_err();
    assert_eq!(err.kind, BackendErrorKind::InvalidCredentials);
    assert_eq!(err.message, "Invalid login credentials");

    let session = client.sign_in_with_password("ana@clients.io", "secret").await.unwrap();
    assert_eq!(session.user.email, "ana@clients.io");
    assert!(events.has_changed().unwrap());
    assert!(matches!(*events.borrow_and_update(), Some(AuthEvent::SignedIn(_))));

    let tokens = session.tokens.unwrap();
    assert!(tokens.expires_at.is_some());
    let client = client.with_tokens(tokens);
    assert_eq!(client.get_user().await.unwrap().id, "u1");

    RecordGateway::new(client.clone()).list().await.unwrap();
    assert_eq!(state.lock().unwrap().bearers.last().unwrap(), "Bearer at-1");

    let current = client.current_session().await.unwrap().unwrap();
    assert_eq!(current.user.id, "u1");

    client.sign_out().await.unwrap();
    assert_eq!(*client.events().subscribe().borrow(), Some(AuthEvent::SignedOut));
}

#[tokio::test]
async fn test_sign_up_pending_confirmation() {
    let (client, _) = spawn_stub().await;

    assert_eq!(client.sign_up("bob@clients.io", "secret").await.unwrap(), None);

    let err = client.sign_up("taken@clients.io", "secret").await.unwrap_err();
    assert_eq!(err.code.as_deref(), Some("user_already_exists"));
    assert_eq!(err.to_string(), "User already registered");
}

#[tokio::test]
async fn test_refresh_and_rejected_tokens() {
    let (client, _) = spawn_stub().await;

    let refreshed = client.refresh_session("rt-1").await.unwrap();
    assert_eq!(refreshed.tokens.unwrap().access_token, "at-1");
    assert!(client.refresh_session("stale").await.is_err());

    let mut stale = client.refresh_session("rt-1").await.unwrap().tokens.unwrap();
    stale.access_token = "revoked".to_string();
    let err = client.with_tokens(stale).current_session().await.unwrap_err();
    assert_eq!(err.code.as_deref(), Some("bad_jwt"));
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    let project = Supabase {
        url: "http://127.0.0.1:9".to_string(),
        anon_key: ANON_KEY.to_string(),
    };
    let client = SupabaseClient::new(reqwest::Client::new(), project);

    let err = RecordGateway::new(client).list().await.unwrap_err();
    assert_eq!(err.backend().kind, BackendErrorKind::Transport);
}

const NOW: i64 = 1_700_000_000;

fn stored(access_token: &str, refresh_token: &str, expires_at: i64) -> StoredSession {
    StoredSession {
        user: AuthUser {
            id: "u1".to_string(),
            email: "ana@clients.io".to_string(),
        },
        tokens: SessionTokens {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
            expires_at: Some(expires_at),
        },
    }
}

#[tokio::test]
async fn test_check_keeps_fresh_tokens() {
    let (client, _) = spawn_stub().await;

    let checked = session::check(&client, stored("at-1", "rt-1", NOW + 60), NOW)
        .await
        .unwrap();
    match checked {
        Checked::Valid { user, refreshed } => {
            assert_eq!(user.id, "u1");
            assert_eq!(refreshed, None);
        }
        other => panic!("expected a valid session, got {other:?}"),
    }
}

#[tokio::test]
async fn test_check_refreshes_expired_tokens() {
    let (client, _) = spawn_stub().await;

    // The old access token would be refused; only the refreshed one works.
    let checked = session::check(&client, stored("expired", "rt-1", NOW - 60), NOW)
        .await
        .unwrap();
    match checked {
        Checked::Valid { user, refreshed } => {
            assert_eq!(user.email, "ana@clients.io");
            let refreshed = StoredSession::from_auth(&refreshed.unwrap()).unwrap();
            assert_eq!(refreshed.tokens.access_token, "at-1");
            assert_eq!(refreshed.tokens.refresh_token, "rt-1");
        }
        other => panic!("expected a refreshed session, got {other:?}"),
    }
}

#[tokio::test]
async fn test_check_rejects_refused_tokens() {
    let (client, _) = spawn_stub().await;

    let checked = session::check(&client, stored("expired", "stale", NOW - 60), NOW)
        .await
        .unwrap();
    assert!(
        matches!(&checked, Checked::Rejected(e) if e.kind == BackendErrorKind::InvalidCredentials),
        "{checked:?}"
    );

    let checked = session::check(&client, stored("revoked", "rt-1", NOW + 60), NOW)
        .await
        .unwrap();
    assert!(
        matches!(&checked, Checked::Rejected(e) if e.code.as_deref() == Some("bad_jwt")),
        "{checked:?}"
    );
}

#[tokio::test]
async fn test_check_survives_an_outage() {
    let (client, _) = spawn_stub().await;

    let err = session::check(&client, stored("at-down", "rt-1", NOW + 60), NOW)
        .await
        .unwrap_err();
    assert_eq!(err.kind, BackendErrorKind::Transport);
    assert_eq!(err.message, "upstream down");

    let err = session::check(&client, stored("expired", "rt-down", NOW - 60), NOW)
        .await
        .unwrap_err();
    assert_eq!(err.kind, BackendErrorKind::Transport);
}
