//! Configuration module for the AMD orchestrator
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `amd`: AMD tuning parameters forwarded to the call placement API
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//!
//! # Example
//! ```rust,no_run
//! use amd_orchestrator::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

pub mod amd;
mod env;
mod merge;
mod validation;
mod yaml;

pub use amd::AmdSettings;

pub(crate) const DEFAULT_HOST: &str = "0.0.0.0";
pub(crate) const DEFAULT_PORT: u16 = 5000;
pub(crate) const DEFAULT_PUBLIC_URL: &str = "http://localhost:5000";
pub(crate) const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";
pub(crate) const DEFAULT_AMD_CONFIG_PATH: &str = "amd_config.json";
pub(crate) const DEFAULT_CLIP_LIST_PATH: &str = "recording_urls.csv";
pub(crate) const DEFAULT_AUDIO_DIR: &str = "channel_audio/left";
pub(crate) const DEFAULT_REPORTS_DIR: &str = "reports";
pub(crate) const DEFAULT_CURRENT_CLIP_PATH: &str = "current_audio_url.txt";
pub(crate) const DEFAULT_LAUNCH_SPACING_MS: u64 = 1000;

/// File name of the event log inside the reports directory
pub const EVENT_LOG_FILE: &str = "call_results.csv";

/// Server configuration
///
/// Contains all configuration needed to run the orchestrator, including:
/// - Server settings (host, port, public URL the provider calls back on)
/// - Telephony provider credentials and phone numbers
/// - AMD tuning parameters
/// - Test run inputs (clip list, audio directory) and outputs (reports, pointer file)
/// - Launch pacing
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,
    /// Public base URL without trailing slash, e.g. `https://owlbank.ngrok.io`
    pub public_url: String,

    // Provider account
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    /// REST API base, overridable for testing
    pub twilio_api_base: String,
    /// Caller number (`OUTBOUND_PHONE_NUMBER`)
    pub from_number: Option<String>,
    /// Number under test (`INBOUND_PHONE_NUMBER`)
    pub to_number: Option<String>,

    pub amd: AmdSettings,

    // Test run
    pub clip_list_path: PathBuf,
    /// Directory served by `/audio.wav`
    pub audio_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub current_clip_path: PathBuf,
    /// Minimum time between two call launches
    pub launch_spacing_ms: u64,
    /// Place the first call as soon as the server starts
    pub auto_start: bool,
    /// Advance on busy/failed/no-answer/canceled too, not only `completed`
    pub advance_on_any_terminal: bool,
}

impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut token) = self.twilio_auth_token {
            token.zeroize();
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables (and `.env` values) only
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - The AMD settings file cannot be loaded
    /// - Configuration validation fails
    pub fn from_file(path: &PathBuf) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        validation::validate_port(self.port)?;
        validation::validate_public_url(&self.public_url)?;
        validation::validate_launch_spacing(self.launch_spacing_ms)?;
        Ok(())
    }

    /// Get the server address as a string in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL the provider fetches playback markup from when a call connects
    pub fn connect_url(&self) -> String {
        self.amd
            .twiml_url
            .clone()
            .unwrap_or_else(|| format!("{}/incoming-call", self.public_url))
    }

    /// Default status callback URL (the progress webhook)
    pub fn status_callback_url(&self) -> String {
        format!("{}/webhook", self.public_url)
    }

    pub fn event_log_path(&self) -> PathBuf {
        self.reports_dir.join(EVENT_LOG_FILE)
    }

    pub fn launch_spacing(&self) -> Duration {
        Duration::from_millis(self.launch_spacing_ms)
    }

    /// Check if provider credentials and both phone numbers are configured
    pub fn has_provider_credentials(&self) -> bool {
        self.twilio_account_sid.is_some()
            && self.twilio_auth_token.is_some()
            && self.from_number.is_some()
            && self.to_number.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    const ENV_KEYS: [&str; 16] = [
        "HOST",
        "PORT",
        "PUBLIC_DOMAIN",
        "TWILIO_ACCOUNT_SID",
        "TWILIO_AUTH_TOKEN",
        "TWILIO_API_BASE",
        "OUTBOUND_PHONE_NUMBER",
        "INBOUND_PHONE_NUMBER",
        "AMD_CONFIG_PATH",
        "CLIP_LIST_PATH",
        "AUDIO_DIR",
        "REPORTS_DIR",
        "CURRENT_CLIP_PATH",
        "LAUNCH_SPACING_MS",
        "AUTO_START",
        "ADVANCE_ON_ANY_TERMINAL",
    ];

    fn cleanup_env_vars() {
        for key in ENV_KEYS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    fn test_config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            public_url: "https://owlbank.ngrok.io".to_string(),
            twilio_account_sid: Some("AC123".to_string()),
            twilio_auth_token: Some("token".to_string()),
            twilio_api_base: DEFAULT_TWILIO_API_BASE.to_string(),
            from_number: Some("+15550001111".to_string()),
            to_number: Some("+15550002222".to_string()),
            amd: AmdSettings::default(),
            clip_list_path: PathBuf::from("recording_urls.csv"),
            audio_dir: PathBuf::from("channel_audio/left"),
            reports_dir: PathBuf::from("reports"),
            current_clip_path: PathBuf::from("current_audio_url.txt"),
            launch_spacing_ms: 1000,
            auto_start: true,
            advance_on_any_terminal: false,
        }
    }

    #[test]
    fn test_derived_urls() {
        let config = test_config();
        assert_eq!(config.address(), "127.0.0.1:5000");
        assert_eq!(
            config.connect_url(),
            "https://owlbank.ngrok.io/incoming-call"
        );
        assert_eq!(
            config.status_callback_url(),
            "https://owlbank.ngrok.io/webhook"
        );
        assert_eq!(
            config.event_log_path(),
            PathBuf::from("reports").join("call_results.csv")
        );
        assert_eq!(config.launch_spacing(), Duration::from_secs(1));
    }

    #[test]
    fn test_connect_url_override() {
        let mut config = test_config();
        config.amd.twiml_url = Some("https://other.example/twiml".to_string());
        assert_eq!(config.connect_url(), "https://other.example/twiml");
    }

    #[test]
    fn test_has_provider_credentials() {
        let mut config = test_config();
        assert!(config.has_provider_credentials());
        config.to_number = None;
        assert!(!config.has_provider_credentials());
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        cleanup_env_vars();
        // Run from an empty directory so no amd_config.json is picked up
        let temp_dir = TempDir::new().unwrap();
        let previous = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp_dir.path()).unwrap();

        let config = ServerConfig::from_env();
        std::env::set_current_dir(previous).unwrap();
        let config = config.unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.public_url, "http://localhost:5000");
        assert_eq!(config.twilio_api_base, "https://api.twilio.com");
        assert_eq!(config.audio_dir, PathBuf::from("channel_audio/left"));
        assert_eq!(config.launch_spacing_ms, 1000);
        assert!(config.auto_start);
        assert!(!config.advance_on_any_terminal);
        assert_eq!(config.amd, AmdSettings::default());
        assert!(!config.has_provider_credentials());
    }

    #[test]
    #[serial]
    fn test_from_env_values() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let amd_path = temp_dir.path().join("amd.json");
        fs::write(&amd_path, r#"{"MachineDetection": "Enable"}"#).unwrap();

        unsafe {
            std::env::set_var("PORT", "8081");
            std::env::set_var("PUBLIC_DOMAIN", "https://owlbank.ngrok.io/");
            std::env::set_var("TWILIO_ACCOUNT_SID", "AC999");
            std::env::set_var("AMD_CONFIG_PATH", amd_path.to_str().unwrap());
            std::env::set_var("LAUNCH_SPACING_MS", "250");
            std::env::set_var("AUTO_START", "false");
            std::env::set_var("ADVANCE_ON_ANY_TERMINAL", "yes");
        }

        let config = ServerConfig::from_env().unwrap();
        cleanup_env_vars();

        assert_eq!(config.port, 8081);
        assert_eq!(config.public_url, "https://owlbank.ngrok.io");
        assert_eq!(config.twilio_account_sid.as_deref(), Some("AC999"));
        assert_eq!(config.amd.machine_detection.as_deref(), Some("Enable"));
        assert_eq!(config.launch_spacing_ms, 250);
        assert!(!config.auto_start);
        assert!(config.advance_on_any_terminal);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_port() {
        cleanup_env_vars();
        unsafe {
            std::env::set_var("PORT", "eighty");
        }
        let result = ServerConfig::from_env();
        cleanup_env_vars();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_missing_explicit_amd_file() {
        cleanup_env_vars();
        unsafe {
            std::env::set_var("AMD_CONFIG_PATH", "/nonexistent/amd_config.json");
        }
        let result = ServerConfig::from_env();
        cleanup_env_vars();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            r#"
server:
  port: 7000
  public_url: "https://yaml.example.com"
amd:
  settings:
    AsyncAmd: true
run:
  audio_dir: "yaml/audio"
"#,
        )
        .unwrap();

        unsafe {
            std::env::set_var("PORT", "6000");
            std::env::set_var("AUDIO_DIR", "env/audio");
            std::env::set_var("TWILIO_ACCOUNT_SID", "ACenv");
        }

        let config = ServerConfig::from_file(&config_path).unwrap();
        cleanup_env_vars();

        assert_eq!(config.port, 7000);
        assert_eq!(config.public_url, "https://yaml.example.com");
        assert_eq!(config.audio_dir, PathBuf::from("yaml/audio"));
        // Not present in YAML, so the environment value is kept
        assert_eq!(config.twilio_account_sid.as_deref(), Some("ACenv"));
        assert_eq!(config.amd.async_amd, Some(true));
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_public_url() {
        cleanup_env_vars();
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "server:\n  public_url: \"ftp://example.com\"\namd:\n  settings: {}\n",
        )
        .unwrap();

        let result = ServerConfig::from_file(&config_path);
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();
        let result = ServerConfig::from_file(&PathBuf::from("/nonexistent/config.yaml"));
        assert!(result.is_err());
    }
}
