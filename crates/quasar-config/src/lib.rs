//! Engine configuration: RON persistence with defaults and CLI overrides.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, GenerationConfig, WorldConfig};
pub use error::ConfigError;
