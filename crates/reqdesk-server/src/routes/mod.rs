pub mod analyze;
pub mod generate;
pub mod meta;
pub mod webhook;
