use std::process;
use std::sync::Arc;

use vault_client::VaultClient;
use vault_ui::{api::server, UiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logger (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = UiConfig::from_env();

    if let Err(e) = config.client.contract_files.preflight() {
        log::error!("❌ {}", e);
        process::exit(1);
    }

    let client = Arc::new(VaultClient::from_config(&config.client)?);

    log::info!("Starting vault UI on {}", config.bind_address);
    server::start_server(&config, client).await?;
    Ok(())
}
