//! Standalone test calls outside the orchestrated run.
//!
//! This module powers the `amd-orchestrator call` CLI command: place a fixed
//! number of calls with the configured AMD settings, spaced by the launch
//! spacing, and print what the provider answered. No queue is involved; the
//! server (if running) decides what each call plays.
//!
//! ```text
//! $ amd-orchestrator call --count 5
//! ```

use anyhow::Result;

use crate::config::ServerConfig;
use crate::core::{CallPlacer, CallRequest, ClipRef, TwilioCallPlacer};

/// Place `count` calls one after another. Failures are reported and skipped.
///
/// Returns the number of calls the provider accepted.
pub async fn run(config: &ServerConfig, count: u32) -> Result<u32> {
    let placer = TwilioCallPlacer::from_config(config)?;
    run_with(&placer, config, count).await
}

pub(crate) async fn run_with(
    placer: &dyn CallPlacer,
    config: &ServerConfig,
    count: u32,
) -> Result<u32> {
    println!(
        "Placing {} call(s) to {} via {}",
        count,
        config.to_number.as_deref().unwrap_or("<unset>"),
        config.connect_url()
    );

    let request = CallRequest {
        clip: ClipRef::empty(),
    };
    let mut placed = 0;
    for i in 0..count {
        println!("--- Call {}/{} ---", i + 1, count);
        match placer.place_call(&request).await {
            Ok(call) => {
                placed += 1;
                println!("Call SID: {} | Status: {}", call.sid, call.status);
            }
            Err(e) => {
                tracing::error!("Error placing call: {}", e);
                println!("Error placing call: {e}");
            }
        }
        if i + 1 < count {
            tokio::time::sleep(config.launch_spacing()).await;
        }
    }

    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AmdSettings;
    use crate::core::{LaunchError, PlacedCall};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakyPlacer {
        attempts: AtomicU32,
    }

    #[async_trait]
    impl CallPlacer for FlakyPlacer {
        async fn place_call(&self, _request: &CallRequest) -> Result<PlacedCall, LaunchError> {
            let n = self.attempts.fetch_add(1, Ordering::SeqCst);
            if n == 1 {
                return Err(LaunchError::MissingCredentials("TWILIO_AUTH_TOKEN"));
            }
            Ok(PlacedCall {
                sid: format!("CA{n}"),
                status: "queued".to_string(),
            })
        }
    }

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            public_url: "http://localhost:5000".to_string(),
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_api_base: "https://api.twilio.com".to_string(),
            from_number: None,
            to_number: None,
            amd: AmdSettings::default(),
            clip_list_path: PathBuf::from("recording_urls.csv"),
            audio_dir: PathBuf::from("channel_audio/left"),
            reports_dir: PathBuf::from("reports"),
            current_clip_path: PathBuf::from("current_audio_url.txt"),
            launch_spacing_ms: 0,
            auto_start: false,
            advance_on_any_terminal: false,
        }
    }

    #[tokio::test]
    async fn test_failures_are_skipped() {
        let placer = FlakyPlacer {
            attempts: AtomicU32::new(0),
        };
        let placed = run_with(&placer, &config(), 3).await.unwrap();
        assert_eq!(placed, 2);
        assert_eq!(placer.attempts.load(Ordering::SeqCst), 3);
    }
}
