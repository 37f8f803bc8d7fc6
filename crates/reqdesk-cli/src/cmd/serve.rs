use super::load_config;
use anyhow::Context;
use reqdesk_server::AppState;
use std::path::Path;

pub fn run(config_path: &Path, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    for w in config.validate() {
        tracing::warn!("config: {}", w.message);
    }

    let state = AppState::from_config(&config).context("failed to build server state")?;
    let addr = config.bind_addr();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(reqdesk_server::serve(state, &addr))
}
