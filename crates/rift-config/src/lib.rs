//! Configuration system for the Rift Engine.
//!
//! Provides runtime-configurable settings that persist to disk as RON files,
//! with CLI overrides via clap and a validation pass for the invariants the
//! engine depends on.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DEFAULT_BACKGROUND_BLOCK, DebugConfig, RenderConfig, WorldConfig};
pub use error::ConfigError;
