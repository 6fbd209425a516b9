//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Quasar Engine command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "quasar", about = "Quasar voxel engine")]
pub struct CliArgs {
    /// Render distance in chunks.
    #[arg(long)]
    pub render_distance: Option<u32>,

    /// Chunk edge length in voxels (power of two).
    #[arg(long)]
    pub chunk_size: Option<u32>,

    /// World-population worker threads (0 = one per logical CPU).
    #[arg(long)]
    pub workers: Option<usize>,

    /// World seed.
    #[arg(long)]
    pub seed: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to the config file (overrides the default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Applies CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(rd) = args.render_distance {
            self.world.render_distance = rd;
        }
        if let Some(cs) = args.chunk_size {
            self.world.chunk_size = cs;
        }
        if let Some(w) = args.workers {
            self.world.workers = w;
        }
        if let Some(seed) = args.seed {
            self.generation.seed = seed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_only_when_present() {
        let mut config = Config::default();
        let args = CliArgs {
            render_distance: Some(7),
            chunk_size: None,
            workers: Some(3),
            seed: None,
            log_level: Some("debug".to_string()),
            config: None,
        };
        config.apply_cli_overrides(&args);

        assert_eq!(config.world.render_distance, 7);
        assert_eq!(config.world.chunk_size, 32);
        assert_eq!(config.world.workers, 3);
        assert_eq!(config.generation.seed, 0);
        assert_eq!(config.debug.log_level, "debug");
    }

    #[test]
    fn test_parses_long_flags() {
        let args =
            CliArgs::try_parse_from(["quasar", "--render-distance", "3", "--seed", "99"]).unwrap();
        assert_eq!(args.render_distance, Some(3));
        assert_eq!(args.seed, Some(99));
        assert_eq!(args.chunk_size, None);
    }
}
