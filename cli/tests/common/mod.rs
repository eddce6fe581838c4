//! Fake Portainer server for integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{json, Value};

use portainer_util::app::options::{CreateStackOptions, DEFAULT_COMPOSE_FILE};
use portainer_util::http::client::{ConnectionConfig, PortainerClient};

pub const API_KEY: &str = "ptr_integration";

/// A request as seen by the fake server
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct FakePortainer {
    pub stacks: Mutex<Vec<Value>>,
    pub requests: Mutex<Vec<Recorded>>,
    /// Answer every create with 409
    pub reject_creates: bool,
    next_id: Mutex<u64>,
}

impl FakePortainer {
    pub fn with_stacks(stacks: Vec<Value>) -> Self {
        Self {
            stacks: Mutex::new(stacks),
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    pub fn rejecting_creates() -> Self {
        Self {
            reject_creates: true,
            ..Self::with_stacks(Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    fn record(&self, method: Method, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        self.requests.lock().unwrap().push(Recorded {
            method,
            uri: uri.to_string(),
            api_key: header("x-api-key"),
            content_type: header("content-type"),
            body,
        });
    }
}

#[derive(Deserialize)]
struct EndpointQuery {
    #[serde(rename = "endpointId")]
    endpoint_id: u64,
}

fn unauthorized(headers: &HeaderMap) -> Option<Response> {
    let key = headers.get("x-api-key").and_then(|value| value.to_str().ok());
    if key == Some(API_KEY) {
        return None;
    }
    Some(
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthorized", "details": "A valid authorisation token is missing"})),
        )
            .into_response(),
    )
}

async fn list_stacks(
    State(fake): State<Arc<FakePortainer>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    fake.record(method, &uri, &headers, None);
    if let Some(response) = unauthorized(&headers) {
        return response;
    }
    Json(Value::Array(fake.stacks.lock().unwrap().clone())).into_response()
}

async fn create_stack(
    State(fake): State<Arc<FakePortainer>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<EndpointQuery>,
    body: String,
) -> Response {
    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    fake.record(method, &uri, &headers, Some(body.clone()));
    if let Some(response) = unauthorized(&headers) {
        return response;
    }
    if fake.reject_creates {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "A stack with the normalized name already exists", "details": "conflict"})),
        )
            .into_response();
    }

    let id = {
        let mut next = fake.next_id.lock().unwrap();
        *next += 1;
        *next
    };
    let entry = json!({
        "Id": id,
        "Name": body["name"],
        "EndpointId": query.endpoint_id,
        "SwarmId": body["swarmID"],
        "GitConfig": {
            "URL": body["repositoryURL"],
            "ReferenceName": body["repositoryReferenceName"],
            "ConfigFilePath": body["composeFile"],
            "TLSSkipVerify": body["tlsskipVerify"]
        },
        "Env": body["Env"],
        "AutoUpdate": {"Interval": body["AutoUpdate"]["interval"]}
    });
    fake.stacks.lock().unwrap().push(entry.clone());
    Json(entry).into_response()
}

async fn delete_stack(
    State(fake): State<Arc<FakePortainer>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Query(query): Query<EndpointQuery>,
) -> Response {
    fake.record(method, &uri, &headers, None);
    if let Some(response) = unauthorized(&headers) {
        return response;
    }

    let mut stacks = fake.stacks.lock().unwrap();
    let before = stacks.len();
    stacks.retain(|stack| !(stack["Id"] == id && stack["EndpointId"] == query.endpoint_id));
    if stacks.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Unable to find a stack with the specified identifier inside the database"})),
        )
            .into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

/// Serve the fake on an ephemeral port and return its base URL
pub async fn spawn(fake: Arc<FakePortainer>) -> String {
    let app = Router::new()
        .route("/api/stacks", get(list_stacks))
        .route("/api/stacks/create/swarm/repository", post(create_stack))
        .route("/api/stacks/{id}", delete(delete_stack))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

pub fn client_for(url: &str, api_key: &str) -> PortainerClient {
    let config = ConnectionConfig::new(
        url,
        SecretString::from(api_key.to_string()),
        1,
        "swarm-1",
        false,
    )
    .unwrap();
    PortainerClient::new(config).unwrap()
}

pub fn create_options(name: &str) -> CreateStackOptions {
    CreateStackOptions {
        name: name.to_string(),
        compose_file: DEFAULT_COMPOSE_FILE.to_string(),
        additional_files: Vec::new(),
        repository_url: "https://github.com/ops/web".to_string(),
        repository_reference_name: "refs/heads/main".to_string(),
        repository_username: "deploy".to_string(),
        repository_password: SecretString::from("token".to_string()),
        env: vec![("FOO".to_string(), "bar".to_string())],
        auto_update_interval: "5m".to_string(),
    }
}

pub fn entry(id: u64, name: &str, endpoint_id: u64) -> Value {
    json!({"Id": id, "Name": name, "EndpointId": endpoint_id, "GitConfig": null})
}
