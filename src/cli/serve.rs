//! Run the verification service.
//!
//! Wires the durable store, the prover SDK client, the mail notifier and
//! the lifecycle controller together, then serves the API until the
//! process exits.
//!
//! ## Configuration Loading
//!
//! Configuration is loaded from one of these sources (in order of
//! precedence):
//! 1. `--config` flag if provided
//! 2. Default config at `~/.local/share/veriflow/config.toml`
//!
//! If the config file doesn't exist, a commented default is written and the
//! command exits so the operator can fill in the prover and mail sections.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use veriflow::http;
use veriflow::lifecycle::LifecycleController;
use veriflow::notify::HttpNotifier;
use veriflow::prover::HttpProverSdk;
use veriflow::store::SqliteStore;

use super::config::{default_config_path, default_data_dir, load_secret, VeriflowConfig};

pub async fn execute(config_path: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        println!("No config file found. Creating default configuration...");
        VeriflowConfig::create_default(&config_path, &default_data_dir())?;
        println!("   Created: {}", config_path.display());
        println!("Edit the prover and mail sections, then run: veriflow serve");
        return Ok(());
    }

    let config = VeriflowConfig::load(&config_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .init();

    tracing::info!(config = %config_path.display(), "starting veriflow");

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .map_err(|e| format!("Invalid bind address '{}': {}", config.server.bind, e))?;
    let session_ttl = config.session_ttl()?;

    let store = SqliteStore::connect(&config.store.db_path).await?;

    let client = reqwest::Client::new();
    let prover_secret = load_secret(
        "VERIFLOW_PROVER_SECRET",
        config.prover.secret_file.as_deref(),
    )?;
    let sdk = HttpProverSdk::new(
        client.clone(),
        config.prover.api_url.clone(),
        config.prover.app_id.clone(),
        prover_secret.to_string(),
    );

    let mail_token = load_secret("VERIFLOW_MAIL_TOKEN", config.mail.token_file.as_deref())?;
    let notifier = HttpNotifier::new(
        client,
        config.mail.api_url.clone(),
        mail_token.to_string(),
        config.mail.from.clone(),
    );

    let controller = Arc::new(LifecycleController::new(
        Arc::new(store),
        Arc::new(sdk),
        Arc::new(notifier),
        &config.server.public_base_url,
        session_ttl,
    ));

    http::serve(addr, controller).await?;
    Ok(())
}
