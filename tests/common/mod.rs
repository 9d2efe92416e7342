#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path as UrlPath, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use video_washer::Washer;
use video_washer::config::{GateConfig, WasherConfig};
use video_washer::error::WasherError;
use video_washer::models::{
    Metadata, SelectedFile, UploadProgress, UploadResponse, WashRequest, WashResponse,
};
use video_washer::services::overlay::{ProcessKind, StepState};
use video_washer::services::transport::WasherTransport;
use video_washer::view::{Renderer, ViewState};

pub const MIB: u64 = 1024 * 1024;

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

#[derive(Clone, Default)]
pub struct RecordingRenderer {
    views: Arc<Mutex<Vec<ViewState>>>,
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingRenderer {
    pub fn views(&self) -> Vec<ViewState> {
        self.views.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.views.lock().unwrap().clear();
        self.alerts.lock().unwrap().clear();
    }

    /// States one overlay step went through, consecutive repeats collapsed
    pub fn step_history(&self, kind: ProcessKind, step_id: &str) -> Vec<StepState> {
        let mut history: Vec<StepState> = Vec::new();
        for view in self.views.lock().unwrap().iter() {
            let Some(overlay) = view.overlay.as_ref().filter(|o| o.kind == kind) else {
                continue;
            };
            if let Some(step) = overlay.steps.iter().find(|s| s.id == step_id) {
                if history.last() != Some(&step.state) {
                    history.push(step.state);
                }
            }
        }
        history
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &ViewState) {
        self.views.lock().unwrap().push(view.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}

// ---------------------------------------------------------------------------
// Mock transport
// ---------------------------------------------------------------------------

pub fn metadata(value: Value) -> Metadata {
    value.as_object().cloned().unwrap_or_default()
}

pub fn upload_ok(file_id: &str, filename: &str, file_size: u64) -> UploadResponse {
    UploadResponse {
        file_id: Some(file_id.to_string()),
        filename: filename.to_string(),
        file_size,
        file_ext: None,
        metadata_before: Some(metadata(json!({"Make": "Apple"}))),
    }
}

pub fn wash_ok(washed_filename: &str, file_size: u64) -> WashResponse {
    WashResponse {
        washed_filename: washed_filename.to_string(),
        metadata_after: Some(metadata(json!({"Make": "Apple", "Model": "iPhone 15 Pro"}))),
        file_size,
    }
}

#[derive(Default)]
pub struct MockTransport {
    pub upload_calls: AtomicUsize,
    pub wash_calls: AtomicUsize,
    pub download_calls: AtomicUsize,
    upload_replies: Mutex<VecDeque<Result<UploadResponse, WasherError>>>,
    wash_replies: Mutex<VecDeque<Result<WashResponse, WasherError>>>,
    pub wash_requests: Mutex<Vec<WashRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_upload(&self, reply: Result<UploadResponse, WasherError>) {
        self.upload_replies.lock().unwrap().push_back(reply);
    }

    pub fn push_wash(&self, reply: Result<WashResponse, WasherError>) {
        self.wash_replies.lock().unwrap().push_back(reply);
    }

    pub fn uploads(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn washes(&self) -> usize {
        self.wash_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WasherTransport for MockTransport {
    async fn upload(
        &self,
        file: &SelectedFile,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<UploadResponse, WasherError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        progress.send_replace(UploadProgress {
            sent: file.size / 2,
            total: file.size,
        });
        tokio::task::yield_now().await;
        progress.send_replace(UploadProgress {
            sent: file.size,
            total: file.size,
        });

        self.upload_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(upload_ok("abc123", &file.name, file.size)))
    }

    async fn wash(&self, request: &WashRequest) -> Result<WashResponse, WasherError> {
        self.wash_calls.fetch_add(1, Ordering::SeqCst);
        self.wash_requests.lock().unwrap().push(request.clone());
        self.wash_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(wash_ok(
                    &format!("{}_washed.{}", request.file_id, request.file_ext),
                    9_999_999,
                ))
            })
    }

    async fn download(
        &self,
        washed_filename: &str,
        dest_dir: &Path,
    ) -> Result<PathBuf, WasherError> {
        self.download_calls.fetch_add(1, Ordering::SeqCst);
        Ok(dest_dir.join(washed_filename))
    }
}

pub fn washer_with(
    transport: Arc<dyn WasherTransport>,
    gate: GateConfig,
) -> (Washer, RecordingRenderer) {
    let renderer = RecordingRenderer::default();
    let config = WasherConfig::development().with_gate(gate);
    let washer = Washer::new(config, transport, Box::new(renderer.clone()));
    (washer, renderer)
}

pub fn clip(size: u64) -> SelectedFile {
    SelectedFile::new("/tmp/clip.mov", "clip.mov", size)
}

// ---------------------------------------------------------------------------
// Stub washer service
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    pub fn json(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

pub struct StubState {
    pub uploads: AtomicUsize,
    pub washes: AtomicUsize,
    pub received_file: Mutex<Option<(String, usize)>>,
    pub wash_bodies: Mutex<Vec<Value>>,
    pub upload_reply: Mutex<Reply>,
    pub wash_reply: Mutex<Reply>,
    pub download_name: String,
    pub download_bytes: Vec<u8>,
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            uploads: AtomicUsize::new(0),
            washes: AtomicUsize::new(0),
            received_file: Mutex::new(None),
            wash_bodies: Mutex::new(Vec::new()),
            upload_reply: Mutex::new(Reply::json(
                StatusCode::OK,
                json!({
                    "file_id": "abc123",
                    "filename": "clip.mov",
                    "file_size": 10_485_760,
                    "metadata_before": {"Make": "Apple"}
                }),
            )),
            wash_reply: Mutex::new(Reply::json(
                StatusCode::OK,
                json!({
                    "success": true,
                    "washed_filename": "clip_washed.mov",
                    "metadata_after": {"Make": "Apple"},
                    "file_size": 9_999_999
                }),
            )),
            download_name: "clip_washed.mov".to_string(),
            download_bytes: b"washed video bytes".to_vec(),
        }
    }
}

fn respond(reply: Reply) -> impl IntoResponse {
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
}

async fn upload_handler(
    State(state): State<Arc<StubState>>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    state.uploads.fetch_add(1, Ordering::SeqCst);
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let len = field.bytes().await.map(|b| b.len()).unwrap_or(0);
        *state.received_file.lock().unwrap() = Some((name, len));
    }
    let reply = state.upload_reply.lock().unwrap().clone();
    respond(reply)
}

async fn wash_handler(
    State(state): State<Arc<StubState>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.washes.fetch_add(1, Ordering::SeqCst);
    state.wash_bodies.lock().unwrap().push(body);
    let reply = state.wash_reply.lock().unwrap().clone();
    respond(reply)
}

async fn download_handler(
    State(state): State<Arc<StubState>>,
    UrlPath(name): UrlPath<String>,
) -> axum::response::Response {
    if name == state.download_name {
        (StatusCode::OK, state.download_bytes.clone()).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "File not found"})),
        )
            .into_response()
    }
}

pub struct StubServer {
    pub base_url: String,
    pub state: Arc<StubState>,
}

pub async fn spawn_stub_server(state: StubState) -> StubServer {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/upload", post(upload_handler))
        .route("/wash", post(wash_handler))
        .route("/download/:name", get(download_handler))
        .layer(DefaultBodyLimit::disable())
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubServer {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// A sparse file of `size` bytes on disk
pub async fn write_sparse_file(dir: &Path, name: &str, size: u64) -> SelectedFile {
    let path = dir.join(name);
    let file = tokio::fs::File::create(&path).await.unwrap();
    file.set_len(size).await.unwrap();
    SelectedFile::from_path(&path).await.unwrap()
}
