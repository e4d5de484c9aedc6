use crate::domain::model::Strategy;
use crate::utils::error::Result;
use crate::utils::validation::{validate_positive_number, validate_repo_slug, Validate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format of the log records written to stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line records.
    #[default]
    Compact,
    /// One JSON object per record, for log collectors.
    Json,
}

/// Command line arguments of the `ghia` binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "ghia")]
#[command(about = "Assign GitHub issues to users based on pattern rules")]
pub struct CliConfig {
    /// How to handle assignment collisions.
    #[arg(short, long, value_enum, default_value_t = Strategy::Append)]
    pub strategy: Strategy,

    /// Run without making any changes.
    #[arg(short, long)]
    pub dry_run: bool,

    /// File with authorization configuration.
    #[arg(short = 'a', long, value_name = "FILE")]
    pub config_auth: PathBuf,

    /// File with assignment rules configuration.
    #[arg(short = 'r', long, value_name = "FILE")]
    pub config_rules: PathBuf,

    /// Repository to process, overriding github.repo from the auth configuration.
    #[arg(long, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Maximum number of issue updates in flight.
    #[arg(long, default_value = "1")]
    pub concurrency: usize,

    /// Log record format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Checks the values clap cannot express as types: a positive concurrency and a
/// well-formed repository override.
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_positive_number("concurrency", self.concurrency, 1)?;
        if let Some(repo) = &self.repo {
            validate_repo_slug("repo", repo)?;
        }
        Ok(())
    }
}
