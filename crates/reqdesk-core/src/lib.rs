pub mod catalog;
pub mod classifier;
pub mod config;
pub mod document;
pub mod error;
pub mod id;
pub mod io;
pub mod questions;
pub mod webhook;

pub use error::{ReqdeskError, Result};
