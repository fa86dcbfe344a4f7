//! Merging environment variables (base) with YAML overrides.

use std::path::PathBuf;

use super::amd::AmdSettings;
use super::env::{env_bool, env_parse, env_string};
use super::yaml::YamlConfig;
use super::{
    DEFAULT_AMD_CONFIG_PATH, DEFAULT_AUDIO_DIR, DEFAULT_CLIP_LIST_PATH, DEFAULT_CURRENT_CLIP_PATH,
    DEFAULT_HOST, DEFAULT_LAUNCH_SPACING_MS, DEFAULT_PORT, DEFAULT_PUBLIC_URL,
    DEFAULT_REPORTS_DIR, DEFAULT_TWILIO_API_BASE, ServerConfig,
};

/// Build a [`ServerConfig`] from environment variables and optional YAML.
///
/// YAML values win over environment variables, which win over defaults.
pub(crate) fn merge_config(
    yaml: Option<YamlConfig>,
) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    let yaml = yaml.unwrap_or_default();
    let server = yaml.server.unwrap_or_default();
    let twilio = yaml.twilio.unwrap_or_default();
    let amd = yaml.amd.unwrap_or_default();
    let run = yaml.run.unwrap_or_default();

    let host = server
        .host
        .or_else(|| env_string("HOST"))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let port = match server.port {
        Some(port) => port,
        None => env_parse::<u16>("PORT")?.unwrap_or(DEFAULT_PORT),
    };
    let public_url = server
        .public_url
        .or_else(|| env_string("PUBLIC_DOMAIN"))
        .unwrap_or_else(|| DEFAULT_PUBLIC_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    let twilio_account_sid = twilio
        .account_sid
        .or_else(|| env_string("TWILIO_ACCOUNT_SID"));
    let twilio_auth_token = twilio
        .auth_token
        .or_else(|| env_string("TWILIO_AUTH_TOKEN"));
    let twilio_api_base = twilio
        .api_base
        .or_else(|| env_string("TWILIO_API_BASE"))
        .unwrap_or_else(|| DEFAULT_TWILIO_API_BASE.to_string())
        .trim_end_matches('/')
        .to_string();
    let from_number = twilio
        .from_number
        .or_else(|| env_string("OUTBOUND_PHONE_NUMBER"));
    let to_number = twilio
        .to_number
        .or_else(|| env_string("INBOUND_PHONE_NUMBER"));

    let explicit_amd_path = amd.config_path.or_else(|| env_string("AMD_CONFIG_PATH"));
    let amd_settings = match amd.settings {
        Some(settings) => settings,
        None => load_amd_settings(explicit_amd_path)?,
    };

    let path_or = |yaml_value: Option<String>, env_key: &str, default: &str| -> PathBuf {
        PathBuf::from(
            yaml_value
                .or_else(|| env_string(env_key))
                .unwrap_or_else(|| default.to_string()),
        )
    };
    let clip_list_path = path_or(run.clip_list, "CLIP_LIST_PATH", DEFAULT_CLIP_LIST_PATH);
    let audio_dir = path_or(run.audio_dir, "AUDIO_DIR", DEFAULT_AUDIO_DIR);
    let reports_dir = path_or(run.reports_dir, "REPORTS_DIR", DEFAULT_REPORTS_DIR);
    let current_clip_path = path_or(
        run.current_clip_path,
        "CURRENT_CLIP_PATH",
        DEFAULT_CURRENT_CLIP_PATH,
    );

    let launch_spacing_ms = match run.launch_spacing_ms {
        Some(ms) => ms,
        None => env_parse::<u64>("LAUNCH_SPACING_MS")?.unwrap_or(DEFAULT_LAUNCH_SPACING_MS),
    };
    let auto_start = match run.auto_start {
        Some(flag) => flag,
        None => env_bool("AUTO_START")?.unwrap_or(true),
    };
    let advance_on_any_terminal = match run.advance_on_any_terminal {
        Some(flag) => flag,
        None => env_bool("ADVANCE_ON_ANY_TERMINAL")?.unwrap_or(false),
    };

    Ok(ServerConfig {
        host,
        port,
        public_url,
        twilio_account_sid,
        twilio_auth_token,
        twilio_api_base,
        from_number,
        to_number,
        amd: amd_settings,
        clip_list_path,
        audio_dir,
        reports_dir,
        current_clip_path,
        launch_spacing_ms,
        auto_start,
        advance_on_any_terminal,
    })
}

/// An explicitly configured AMD file must exist; the default one is optional.
fn load_amd_settings(
    explicit_path: Option<String>,
) -> Result<AmdSettings, Box<dyn std::error::Error>> {
    match explicit_path {
        Some(path) => AmdSettings::from_file(&PathBuf::from(path)),
        None => {
            let default_path = PathBuf::from(DEFAULT_AMD_CONFIG_PATH);
            if default_path.exists() {
                AmdSettings::from_file(&default_path)
            } else {
                tracing::warn!(
                    "No {} found, placing calls without AMD parameters",
                    DEFAULT_AMD_CONFIG_PATH
                );
                Ok(AmdSettings::default())
            }
        }
    }
}
