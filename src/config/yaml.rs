use serde::Deserialize;
use std::path::PathBuf;

use super::amd::AmdSettings;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 5000
///   public_url: "https://owlbank.ngrok.io"
///
/// twilio:
///   account_sid: "ACxxxxxxxx"
///   auth_token: "your-auth-token"
///   from_number: "+15550001111"
///   to_number: "+15550002222"
///
/// amd:
///   config_path: "amd_config.json"
///   # or inline, using the provider's parameter names:
///   settings:
///     MachineDetection: "DetectMessageEnd"
///     AsyncAmd: true
///
/// run:
///   clip_list: "recording_urls.csv"
///   audio_dir: "channel_audio/left"
///   reports_dir: "reports"
///   current_clip_path: "current_audio_url.txt"
///   launch_spacing_ms: 1000
///   auto_start: true
///   advance_on_any_terminal: false
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub twilio: Option<TwilioYaml>,
    pub amd: Option<AmdYaml>,
    pub run: Option<RunYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Public base URL the provider reaches this server on
    pub public_url: Option<String>,
}

/// Telephony provider account from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TwilioYaml {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub api_base: Option<String>,
    pub from_number: Option<String>,
    pub to_number: Option<String>,
}

/// AMD settings source from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AmdYaml {
    pub config_path: Option<String>,
    /// Inline settings take precedence over `config_path`
    pub settings: Option<AmdSettings>,
}

/// Test run inputs and outputs from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RunYaml {
    pub clip_list: Option<String>,
    pub audio_dir: Option<String>,
    pub reports_dir: Option<String>,
    pub current_clip_path: Option<String>,
    pub launch_spacing_ms: Option<u64>,
    pub auto_start: Option<bool>,
    pub advance_on_any_terminal: Option<bool>,
}

impl YamlConfig {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file cannot be read
    /// - The YAML is malformed
    /// - Fields have invalid types
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}
