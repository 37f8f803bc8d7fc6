pub mod classify;
pub mod config;
pub mod generate;
pub mod questions;
pub mod serve;
pub mod webhook;

use anyhow::Context;
use reqdesk_core::config::Config;
use std::path::Path;

pub(crate) fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).with_context(|| format!("failed to load config {}", path.display()))
}
