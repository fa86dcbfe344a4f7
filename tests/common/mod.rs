//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{Router, body::Body, http::Request, response::Response};
use http_body_util::BodyExt;
use parking_lot::Mutex;
use tower::util::ServiceExt;

use amd_orchestrator::{
    AppState, CallEvent, CallPlacer, CallRequest, ClipRef, EventLogError, EventSink, LaunchError,
    Orchestrator, PlacedCall, ServerConfig, config::AmdSettings, routes,
};

/// Call placer that records every request instead of dialing out
#[derive(Default)]
pub struct MockPlacer {
    pub calls: Mutex<Vec<ClipRef>>,
}

#[async_trait]
impl CallPlacer for MockPlacer {
    async fn place_call(&self, request: &CallRequest) -> Result<PlacedCall, LaunchError> {
        let mut calls = self.calls.lock();
        calls.push(request.clip.clone());
        Ok(PlacedCall {
            sid: format!("CA{:04}", calls.len()),
            status: "queued".to_string(),
        })
    }
}

impl MockPlacer {
    /// Wait until at least `count` placements happened (bounded), then return them.
    pub async fn wait_for(&self, count: usize) -> Vec<ClipRef> {
        for _ in 0..200 {
            if self.calls.lock().len() >= count {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.calls.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }
}

/// Event sink kept in memory; optionally failing every append
#[derive(Default)]
pub struct MemoryEventLog {
    pub events: Mutex<Vec<CallEvent>>,
    pub fail: bool,
}

impl EventSink for MemoryEventLog {
    fn append(&self, event: &CallEvent) -> Result<(), EventLogError> {
        if self.fail {
            return Err(EventLogError::Flush(std::io::Error::other("disk full")));
        }
        self.events.lock().push(event.clone());
        Ok(())
    }
}

impl MemoryEventLog {
    pub fn snapshot(&self) -> Vec<CallEvent> {
        self.events.lock().clone()
    }
}

pub fn test_config(dir: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 5000,
        public_url: "https://owlbank.ngrok.io".to_string(),
        twilio_account_sid: None,
        twilio_auth_token: None,
        twilio_api_base: "https://api.twilio.com".to_string(),
        from_number: None,
        to_number: None,
        amd: AmdSettings::default(),
        clip_list_path: dir.join("recording_urls.csv"),
        audio_dir: dir.join("audio"),
        reports_dir: dir.join("reports"),
        current_clip_path: dir.join("current_audio_url.txt"),
        launch_spacing_ms: 0,
        auto_start: false,
        advance_on_any_terminal: false,
    }
}

pub struct Harness {
    pub app: Router,
    pub state: Arc<AppState>,
    pub placer: Arc<MockPlacer>,
    pub log: Arc<MemoryEventLog>,
}

/// Router over a seeded orchestrator with mock placer and in-memory log.
pub fn harness(dir: &Path, clips: &[String]) -> Harness {
    harness_with_log(dir, clips, MemoryEventLog::default())
}

pub fn harness_with_log(dir: &Path, clips: &[String], log: MemoryEventLog) -> Harness {
    harness_with_config(test_config(dir), clips, log)
}

pub fn harness_with_config(config: ServerConfig, clips: &[String], log: MemoryEventLog) -> Harness {
    let placer = Arc::new(MockPlacer::default());
    let log = Arc::new(log);
    let orchestrator = Arc::new(Orchestrator::new(
        placer.clone(),
        None,
        Duration::ZERO,
    ));
    orchestrator.seed(clips.iter().map(|c| ClipRef::from(c.as_str())));

    let state = AppState::with_components(config, orchestrator, log.clone());
    Harness {
        app: routes::create_app(state.clone()),
        state,
        placer,
        log,
    }
}

pub fn clip_url(recording: &str) -> String {
    format!("https://owlbank.ngrok.io/audio.wav?recording={recording}")
}

pub async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn temp_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().to_path_buf()
}
