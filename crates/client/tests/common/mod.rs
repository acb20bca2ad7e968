#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

use legalease_client::LegalEaseApi;
use legalease_core::session::{MemorySessionStore, SessionProvider};

pub const TEST_TOKEN: &str = "test-token";

/// One request the mock backend received.
#[derive(Debug, Clone)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Call {
    pub fn body_str(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    /// Value of a text field in a multipart body.
    pub fn form_field(&self, name: &str) -> Option<String> {
        let body = self.body_str();
        let marker = format!("name=\"{name}\"");
        let start = body.find(&marker)?;
        let rest = &body[start..];
        let value_start = rest.find("\r\n\r\n")? + 4;
        let value = &rest[value_start..];
        let value_end = value.find("\r\n--")?;
        Some(value[..value_end].to_string())
    }
}

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    content_type: &'static str,
    body: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<Call>>,
    routes: Mutex<HashMap<(Method, String), Canned>>,
}

/// In-process stand-in for the LegalEase backend.
///
/// Every request is recorded. Responses are canned per method and path;
/// a path ending in `*` matches any path with that prefix. Unmatched
/// requests get `404 {"detail": "Not Found"}`.
#[derive(Clone)]
pub struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api(&self) -> LegalEaseApi {
        LegalEaseApi::new(self.url())
    }

    pub fn respond_json(&self, method: Method, path: &str, status: u16, body: Value) {
        self.respond(method, path, status, "application/json", body.to_string().into_bytes());
    }

    pub fn respond_bytes(&self, method: Method, path: &str, status: u16, body: &[u8]) {
        self.respond(method, path, status, "application/octet-stream", body.to_vec());
    }

    /// Error response with a `detail` body.
    pub fn fail(&self, method: Method, path: &str, status: u16, detail: &str) {
        self.respond_json(method, path, status, json!({ "detail": detail }));
    }

    fn respond(&self, method: Method, path: &str, status: u16, content_type: &'static str, body: Vec<u8>) {
        let canned = Canned {
            status: StatusCode::from_u16(status).unwrap(),
            content_type,
            body,
        };
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), canned);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path_prefix: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path.starts_with(path_prefix))
            .collect()
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let header = |name: HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    state.calls.lock().unwrap().push(Call {
        method: method.clone(),
        path: path.clone(),
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        body: body.to_vec(),
    });

    let routes = state.routes.lock().unwrap();
    let canned = routes.get(&(method.clone(), path.clone())).or_else(|| {
        routes.iter().find_map(|((m, p), canned)| {
            let prefix = p.strip_suffix('*')?;
            (*m == method && path.starts_with(prefix)).then_some(canned)
        })
    });

    match canned {
        Some(canned) => (
            canned.status,
            [(CONTENT_TYPE, canned.content_type)],
            canned.body.clone(),
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            json!({ "detail": "Not Found" }).to_string(),
        )
            .into_response(),
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn user_json() -> Value {
    json!({
        "id": "user-1",
        "email": "ada@example.com",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "createdAt": "2024-01-01T09:00:00",
        "lastLoginAt": null
    })
}

pub fn auth_json() -> Value {
    json!({
        "user": user_json(),
        "accessToken": TEST_TOKEN,
        "tokenType": "bearer"
    })
}

/// Session provider that is already signed in with [`TEST_TOKEN`].
pub fn signed_in() -> SessionProvider {
    let provider = SessionProvider::new(MemorySessionStore::new());
    provider
        .begin(&serde_json::from_value(auth_json()).unwrap())
        .unwrap();
    provider
}

pub fn signed_out() -> SessionProvider {
    SessionProvider::new(MemorySessionStore::new())
}

pub fn document_json(id: &str, status: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "filename": format!("{id}.pdf"),
        "originalFilename": format!("{id} lease.pdf"),
        "fileSize": "1.00 MB",
        "mimeType": "application/pdf",
        "status": status,
        "createdAt": created_at,
        "updatedAt": created_at
    })
}

pub fn completed_document_json(id: &str) -> Value {
    let mut doc = document_json(id, "completed", "2024-03-01T10:00:00.123456");
    doc["aiSummary"] = json!("Ten-year office lease with two renewal options.");
    doc["extractedLeaseData"] = json!({
        "parties": { "landlord": "Acme Properties LLC", "tenant": "Widget Co" },
        "dates": { "effectiveDate": "2024-01-01", "expirationDate": "2033-12-31" },
        "rent": { "baseRent": "$12,000 per month", "escalationClauses": ["3% annually"] },
        "options": { "renewalOptions": ["Two 5-year terms"] },
        "use_clauses": ["General office use"]
    });
    doc
}
