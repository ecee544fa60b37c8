//! CLI definition, output configuration and alias expansion

use crate::types::DiffError;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Command-line interface for stordiff
#[derive(Debug, Parser)]
#[command(
    name = "stordiff",
    version,
    about = "Compare storage trees without moving a byte"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Emit machine-readable JSON records
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Alias definitions file (toml with an [aliases] table)
    #[arg(long, global = true, value_name = "FILE")]
    pub aliases: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report differences between two storage locations
    Diff {
        /// Location whose entries drive the comparison
        first: String,

        /// Location compared against
        second: String,

        /// Compare full trees instead of a single level
        #[arg(short, long)]
        recursive: bool,
    },

    /// Make a bucket or folder at each target
    Mb {
        #[arg(required = true)]
        targets: Vec<String>,
    },
}

/// Presentation switches threaded into the rendering layer.
///
/// An explicit value rather than process-global state, so the engine and the
/// renderer stay testable in isolation.
#[derive(Debug, Clone, Copy)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

impl OutputConfig {
    /// Whether the scan spinner may draw.
    pub fn progress_enabled(&self) -> bool {
        !self.json && !self.quiet
    }
}

impl From<&Cli> for OutputConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            quiet: cli.quiet,
        }
    }
}

/// URL alias table, loaded from an optional toml file:
///
/// ```toml
/// [aliases]
/// backup = "/mnt/backup"
/// play = "https://play.example.com:9000"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Aliases {
    #[serde(default)]
    aliases: BTreeMap<String, String>,
}

impl Aliases {
    /// Load aliases from `path`; no path means no aliases.
    pub fn load(path: Option<&Path>) -> Result<Self, DiffError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DiffError::Config(format!("cannot read alias file '{}': {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            DiffError::Config(format!("invalid alias file '{}': {}", path.display(), e))
        })
    }

    /// Expand a leading `alias/rest` (or bare `alias`) to its target URL;
    /// anything that does not start with a known alias passes through.
    pub fn expand(&self, raw: &str) -> String {
        let (head, rest) = match raw.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (raw, None),
        };
        match self.aliases.get(head) {
            Some(base) => match rest {
                Some(rest) => format!("{}/{}", base.trim_end_matches('/'), rest),
                None => base.clone(),
            },
            None => raw.to_string(),
        }
    }
}
