//! Command-line argument parsing for the Rift Engine.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Rift Engine command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "rift", about = "Rift portal engine")]
pub struct CliArgs {
    /// Horizontal portal effect half-extent in blocks.
    #[arg(long)]
    pub portal_effect_size_xz: Option<f64>,

    /// Vertical portal effect half-extent in blocks.
    #[arg(long)]
    pub portal_effect_size_y: Option<f64>,

    /// Ticks between nearby-entity list refreshes.
    #[arg(long)]
    pub entity_check_interval: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(xz) = args.portal_effect_size_xz {
            self.render.portal_effect_size_xz = xz;
        }
        if let Some(y) = args.portal_effect_size_y {
            self.render.portal_effect_size_y = y;
        }
        if let Some(interval) = args.entity_check_interval {
            self.world.entity_check_interval = interval;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }

    /// Default config directory: `<user config dir>/rift`, falling back to
    /// the working directory when the platform has no config dir.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("rift"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
