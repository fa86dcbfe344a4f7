//! AMD tuning parameters for outbound test calls
//!
//! Loaded from a JSON document using the provider's own parameter names, e.g.
//!
//! ```json
//! {
//!   "MachineDetection": "DetectMessageEnd",
//!   "AsyncAmd": true,
//!   "AsyncAmdStatusCallback": "https://example.ngrok.io/webhook",
//!   "MachineDetectionTimeout": 30,
//!   "MachineDetectionSpeechThreshold": 2400,
//!   "MachineDetectionSpeechEndThreshold": 1200,
//!   "MachineDetectionSilenceTimeout": 5000,
//!   "StatusCallbackEvent": ["initiated", "ringing", "answered", "completed"]
//! }
//! ```
//!
//! Keys that are absent are left out of the call placement request so the
//! provider applies its own defaults.

use std::path::Path;

use serde::{Deserialize, Deserializer};

/// Status callback events requested when the settings do not list any
pub const DEFAULT_STATUS_CALLBACK_EVENTS: [&str; 4] =
    ["initiated", "ringing", "answered", "completed"];

const DEFAULT_STATUS_CALLBACK_METHOD: &str = "POST";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AmdSettings {
    pub machine_detection: Option<String>,
    #[serde(deserialize_with = "bool_or_string")]
    pub async_amd: Option<bool>,
    pub async_amd_status_callback: Option<String>,
    pub async_amd_status_callback_method: Option<String>,
    pub machine_detection_timeout: Option<u32>,
    pub machine_detection_speech_threshold: Option<u32>,
    pub machine_detection_speech_end_threshold: Option<u32>,
    pub machine_detection_silence_timeout: Option<u32>,
    pub status_callback: Option<String>,
    pub status_callback_method: Option<String>,
    pub status_callback_event: Option<Vec<String>>,
    /// Overrides the connect URL the provider fetches playback markup from
    pub twiml_url: Option<String>,
}

/// Accept `true`, `"true"` and `"True"` alike; the provider takes a string.
fn bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Option::<Flag>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Flag::Bool(b)) => Ok(Some(b)),
        Some(Flag::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Some(true)),
            "false" => Ok(Some(false)),
            other => Err(serde::de::Error::custom(format!(
                "expected boolean for AsyncAmd, got '{other}'"
            ))),
        },
    }
}

impl AmdSettings {
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read AMD config {}: {e}", path.display()))?;
        let settings = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse AMD config {}: {e}", path.display()))?;
        Ok(settings)
    }

    pub fn status_callback_method(&self) -> &str {
        self.status_callback_method
            .as_deref()
            .unwrap_or(DEFAULT_STATUS_CALLBACK_METHOD)
    }

    pub fn status_callback_events(&self) -> Vec<String> {
        match &self.status_callback_event {
            Some(events) => events.clone(),
            None => DEFAULT_STATUS_CALLBACK_EVENTS
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    /// Provider form parameters for the AMD and status-callback settings.
    ///
    /// `default_status_callback` is used when no `StatusCallback` is set.
    pub fn form_params(&self, default_status_callback: &str) -> Vec<(&'static str, String)> {
        let mut params: Vec<(&'static str, String)> = Vec::new();

        let optional: [(&'static str, Option<String>); 8] = [
            ("MachineDetection", self.machine_detection.clone()),
            ("AsyncAmd", self.async_amd.map(|b| b.to_string())),
            (
                "AsyncAmdStatusCallback",
                self.async_amd_status_callback.clone(),
            ),
            (
                "AsyncAmdStatusCallbackMethod",
                self.async_amd_status_callback_method.clone(),
            ),
            (
                "MachineDetectionTimeout",
                self.machine_detection_timeout.map(|v| v.to_string()),
            ),
            (
                "MachineDetectionSpeechThreshold",
                self.machine_detection_speech_threshold
                    .map(|v| v.to_string()),
            ),
            (
                "MachineDetectionSpeechEndThreshold",
                self.machine_detection_speech_end_threshold
                    .map(|v| v.to_string()),
            ),
            (
                "MachineDetectionSilenceTimeout",
                self.machine_detection_silence_timeout
                    .map(|v| v.to_string()),
            ),
        ];
        params.extend(
            optional
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v))),
        );

        let status_callback = self
            .status_callback
            .clone()
            .unwrap_or_else(|| default_status_callback.to_string());
        params.push(("StatusCallback", status_callback));
        params.push((
            "StatusCallbackMethod",
            self.status_callback_method().to_string(),
        ));
        for event in self.status_callback_events() {
            params.push(("StatusCallbackEvent", event));
        }

        params
    }
}
