use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::info;

use amd_orchestrator::{AppError, LaunchOutcome, ServerConfig, batch, routes, state::AppState};

/// AMD regression harness - plays queued test clips into outbound calls
#[derive(Parser, Debug)]
#[command(name = "amd-orchestrator")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory holding the recordings served by /audio.wav
    #[arg(long = "audio-dir", value_name = "DIR")]
    audio_dir: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Place standalone test calls without running the orchestrator
    Call {
        /// Number of calls to place
        #[arg(short = 'n', long = "count", default_value_t = 1)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut config = if let Some(config_path) = cli.config {
        println!("Loading configuration from {}", config_path.display());
        ServerConfig::from_file(&config_path).map_err(|e| AppError::Config(e.to_string()))?
    } else {
        ServerConfig::from_env().map_err(|e| AppError::Config(e.to_string()))?
    };
    if let Some(audio_dir) = cli.audio_dir {
        config.audio_dir = audio_dir;
    }

    if let Some(Commands::Call { count }) = cli.command {
        let placed = batch::run(&config, count).await?;
        println!("{placed}/{count} call(s) placed");
        return Ok(());
    }

    let address = config.address();
    let auto_start = config.auto_start;
    println!("Starting AMD test server on {address}");
    info!(
        public_url = %config.public_url,
        audio_dir = %config.audio_dir.display(),
        "Serving playback markup on /incoming-call"
    );

    let app_state = AppState::new(config)?;

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_CONTENT_TYPE_OPTIONS,
            http::HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            http::header::X_FRAME_OPTIONS,
            http::HeaderValue::from_static("DENY"),
        ));

    let app = routes::create_app(app_state.clone()).layer(security_headers);

    let socket_addr: SocketAddr = address
        .parse()
        .map_err(|e| anyhow!("Invalid server address '{}': {}", address, e))?;
    let listener = TcpListener::bind(&socket_addr).await?;
    println!("Server listening on http://{}", socket_addr);

    // The provider can reach us now; place the first test call.
    if auto_start {
        match app_state.orchestrator.launch_next() {
            LaunchOutcome::Launched(clip) => info!(clip = %clip, "Test run started"),
            LaunchOutcome::Exhausted => info!("Clip list is empty, nothing to test"),
        }
    } else {
        info!("Auto start disabled; waiting for an externally placed call");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
