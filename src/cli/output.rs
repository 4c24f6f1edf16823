//! Output formatting for command results
//!
//! JSON for machines, plain text for humans.

use anyhow::{Context, Result};
use std::fmt::Write;

use super::commands::OutputFormatArg;
use crate::config::FsConfig;
use crate::manifests::StagedManifests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Human,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Human => OutputFormat::Human,
        }
    }
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format_staged(&self, staged: &StagedManifests) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(staged).context("Failed to serialize staged manifests")
            }
            OutputFormat::Human => {
                let mut out = String::new();
                writeln!(
                    out,
                    "Staged {} manifest(s) in {}",
                    staged.files.len(),
                    staged.directory.display()
                )?;
                for file in &staged.files {
                    writeln!(out, "  {}", file.display())?;
                }
                Ok(out)
            }
        }
    }

    pub fn format_config(&self, config: &FsConfig) -> Result<String> {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(&config.to_display_map())
                .context("Failed to serialize configuration"),
            OutputFormat::Human => Ok(config.to_string()),
        }
    }
}
