use std::sync::Arc;

use crate::config::ServerConfig;
use crate::core::{
    CallEvent, CsvEventLog, EventSink, Orchestrator, PointerStore, TwilioCallPlacer, load_clips,
};
use crate::errors::AppResult;

/// Shared state handed to every route.
///
/// Built once before the listener starts. All run state lives inside the
/// orchestrator; handlers never touch it directly.
pub struct AppState {
    pub config: ServerConfig,
    pub orchestrator: Arc<Orchestrator>,
    pub event_log: Arc<dyn EventSink>,
}

impl AppState {
    /// Wire up the production components from configuration:
    /// CSV event log, provider REST client, pointer file, and the seeded queue.
    pub fn new(config: ServerConfig) -> AppResult<Arc<Self>> {
        let clips = load_clips(&config.clip_list_path)?;
        let event_log = Arc::new(CsvEventLog::open(config.event_log_path())?);
        let placer = Arc::new(TwilioCallPlacer::from_config(&config)?);

        if !config.has_provider_credentials() {
            tracing::warn!(
                "Provider credentials or phone numbers missing; call placement will fail until configured"
            );
        }

        let orchestrator = Arc::new(Orchestrator::new(
            placer,
            Some(PointerStore::new(config.current_clip_path.clone())),
            config.launch_spacing(),
        ));
        orchestrator.seed(clips);

        Ok(Self::with_components(config, orchestrator, event_log))
    }

    /// Assemble state from pre-built components.
    pub fn with_components(
        config: ServerConfig,
        orchestrator: Arc<Orchestrator>,
        event_log: Arc<dyn EventSink>,
    ) -> Arc<Self> {
        Arc::new(Self {
            config,
            orchestrator,
            event_log,
        })
    }

    /// Append to the event log. Failures are reported, never propagated.
    ///
    /// The append flushes and fsyncs, so it runs on the blocking pool. It is
    /// awaited so each delivery's row lands before its response is sent.
    pub async fn record_event(&self, event: CallEvent) {
        let sink = Arc::clone(&self.event_log);
        let call_sid = event.call_sid.clone();
        match tokio::task::spawn_blocking(move || sink.append(&event)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::error!(call_sid = %call_sid, "Failed to record call event: {}", e);
            }
            Err(e) => {
                tracing::error!(call_sid = %call_sid, "Event log task failed: {}", e);
            }
        }
    }
}
