use anyhow::{Context as _, Result};
use tracing::{debug, error};

use super::commands::{CliArgs, Commands, ConfigArgs, StageArgs};
use super::output::OutputFormatter;
use crate::config::{ConfigError, FsConfig};
use crate::fs::FilesystemService;
use crate::manifests::{self, StagedManifests};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CONFIG_ERROR: i32 = 2;

/// Collects manifests from `args.path` and writes them to the output
/// directory, or to a fresh temp dir when none was given.
pub fn handle_stage(
    args: &StageArgs,
    fs: &dyn FilesystemService,
    config: &FsConfig,
) -> Result<String> {
    let ctx = config.context();

    let collected = manifests::collect(&ctx, fs, &args.path)
        .with_context(|| format!("Failed to collect manifests from {}", args.path.display()))?;

    let staged = match &args.output {
        Some(out_dir) => {
            let files = manifests::save(&ctx, fs, out_dir, &collected, config.write_modes())
                .with_context(|| format!("Failed to save manifests to {}", out_dir.display()))?;
            StagedManifests {
                directory: out_dir.clone(),
                files,
            }
        }
        None => manifests::stage(&ctx, fs, &collected, config)
            .context("Failed to stage manifests")?,
    };

    OutputFormatter::new(args.format.into()).format_staged(&staged)
}

pub fn handle_config(args: &ConfigArgs, config: &FsConfig) -> Result<String> {
    OutputFormatter::new(args.format.into()).format_config(config)
}

/// Runs the parsed command against a configuration already loaded with
/// [`FsConfig::load`] and returns the process exit code.
pub fn run(
    args: &CliArgs,
    fs: &dyn FilesystemService,
    config: Result<FsConfig, ConfigError>,
) -> i32 {
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            return EXIT_CONFIG_ERROR;
        }
    };
    debug!(?config, "loaded configuration");

    let result = match &args.command {
        Commands::Stage(stage_args) => handle_stage(stage_args, fs, &config),
        Commands::Config(config_args) => handle_config(config_args, &config),
    };

    match result {
        Ok(output) => {
            if !args.quiet {
                print!("{}", output);
                if !output.ends_with('\n') {
                    println!();
                }
            }
            EXIT_SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}
