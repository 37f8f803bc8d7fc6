use super::load_config;
use crate::output::print_json;
use anyhow::Context;
use reqdesk_core::classifier::Classifier;
use reqdesk_core::webhook::{Dispatcher, WebhookOutcome};
use reqdesk_core::ReqdeskError;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

/// Replay a webhook envelope from `file` (or stdin) and print the response
/// the server would send.
pub fn run(config_path: &Path, file: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let catalog = config.catalog().context("invalid catalog in config")?;
    let dispatcher = Dispatcher::new(Classifier::new(Arc::new(catalog)));

    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let body: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| ReqdeskError::MalformedPayload(e.to_string()))
        .context("webhook processing failed")?;
    let outcome = dispatcher
        .handle(&body)
        .context("webhook processing failed")?;

    if let WebhookOutcome::TaskClassified { bot_message, .. } = &outcome {
        eprintln!("{bot_message}");
    }
    print_json(&outcome.to_response())
}
