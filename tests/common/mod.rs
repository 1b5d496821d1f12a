//! Stub parsing service served by axum on an ephemeral port.

#![allow(dead_code)]

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use parse_uploader::config::Config;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// One multipart part as the stub decoded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received {
    Upload(Vec<UploadedPart>),
    Staging(String),
}

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    body: String,
    delay: Duration,
    received: Arc<Mutex<Vec<Received>>>,
}

impl Stub {
    fn record(&self, request: Received) {
        self.received.lock().unwrap().push(request);
    }

    async fn reply(&self) -> Response {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body.clone(),
        )
            .into_response()
    }
}

async fn upload(State(stub): State<Stub>, mut multipart: Multipart) -> Response {
    let mut parts = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        parts.push(UploadedPart {
            name,
            file_name,
            content,
        });
    }
    stub.record(Received::Upload(parts));
    stub.reply().await
}

async fn staging(State(stub): State<Stub>, Path(id): Path<String>) -> Response {
    stub.record(Received::Staging(id));
    stub.reply().await
}

pub struct StubServer {
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
}

impl StubServer {
    /// Answers every request with `status` and the JSON `body`.
    pub async fn respond(status: u16, body: &str) -> Self {
        Self::respond_after(status, body, Duration::ZERO).await
    }

    pub async fn respond_after(status: u16, body: &str, delay: Duration) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let stub = Stub {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            delay,
            received: Arc::clone(&received),
        };

        let app = Router::new()
            .route("/api/upload/parse", post(upload))
            .route("/api/operation/:id/staging", get(staging))
            .with_state(stub);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base_url, received }
    }

    pub fn config(&self, timeout_seconds: u64) -> Config {
        Config {
            base_url: self.base_url.clone(),
            timeout_seconds,
        }
    }

    /// Requests handled so far, in arrival order.
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().unwrap().clone()
    }
}

/// An address nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
