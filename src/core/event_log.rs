//! Append-only call event log
//!
//! Every webhook delivery produces exactly one [`CallEvent`]. Events are written
//! as CSV rows to `reports/call_results.csv` and are the permanent record used
//! for post-run analysis; nothing in the orchestrator reads them back.
//!
//! Rows are flushed and synced to disk before `append` returns, in the order
//! the appends were made.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::macros::format_description;

use super::clip::ClipRef;

/// Column order of the event log
pub const EVENT_LOG_HEADER: [&str; 7] = [
    "timestamp",
    "call_sid",
    "audio_url",
    "event_sequence",
    "call_status",
    "answered_by",
    "callback_source",
];

/// Callback-source tag written for connect (`/incoming-call`) events
pub const INBOUND_SOURCE: &str = "inbound";

#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("Failed to open event log {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write event log row: {0}")]
    Write(#[from] csv::Error),

    #[error("Failed to flush event log: {0}")]
    Flush(#[from] io::Error),
}

/// One observed call event. Field order matches [`EVENT_LOG_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallEvent {
    pub timestamp: String,
    pub call_sid: String,
    pub clip: ClipRef,
    pub sequence: Option<String>,
    pub call_status: Option<String>,
    pub answered_by: Option<String>,
    pub callback_source: Option<String>,
}

impl CallEvent {
    /// Event for a connect request, recording the asset actually served.
    pub fn inbound(timestamp: String, call_sid: &str, clip: &ClipRef) -> Self {
        Self {
            timestamp,
            call_sid: call_sid.to_string(),
            clip: ClipRef::new(clip.served_asset()),
            sequence: None,
            call_status: None,
            answered_by: None,
            callback_source: Some(INBOUND_SOURCE.to_string()),
        }
    }
}

/// UTC timestamp used when the provider does not send one.
pub fn now_timestamp() -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    OffsetDateTime::now_utc()
        .format(&format)
        .unwrap_or_default()
}

/// Durable sink for call events.
pub trait EventSink: Send + Sync {
    fn append(&self, event: &CallEvent) -> Result<(), EventLogError>;
}

/// CSV file sink. The header row is written only when the file is new.
pub struct CsvEventLog {
    path: PathBuf,
    writer: Mutex<csv::Writer<File>>,
}

impl CsvEventLog {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EventLogError> {
        let path = path.as_ref().to_path_buf();
        let open_err = |source| EventLogError::Open {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(open_err)?;
        let is_new = file.metadata().map_err(open_err)?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if is_new {
            writer.write_record(EVENT_LOG_HEADER)?;
            writer.flush()?;
        }

        tracing::info!(path = %path.display(), "Event log opened");

        Ok(Self {
            path,
            writer: Mutex::new(writer),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for CsvEventLog {
    fn append(&self, event: &CallEvent) -> Result<(), EventLogError> {
        let mut writer = self.writer.lock();
        writer.serialize(event)?;
        writer.flush()?;
        writer.get_ref().sync_data()?;
        Ok(())
    }
}
