//! rust-changelog-lint: a schema-aware validator for database migration changelogs
//!
//! Changelogs are replayed change by change onto a simulated schema. Each
//! change first updates the [`state::SchemaStore`] through the listeners and is
//! then checked by the validators that apply to its type. Findings are
//! collected as [`ValidationIssue`] values; what to do with them is up to the
//! caller.

pub mod error;
pub mod loader;
pub mod model;
pub mod report;
pub mod rules;
pub mod state;
pub mod util;
pub mod validator;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

pub use error::LintError;
pub use model::{Change, ChangeLog, ChangeSet};
pub use validator::{ValidationIssue, ValidatorConfig, ValidatorFactory};

/// Options for validating a set of changelog files
#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Directory searched for changelog files
    pub source_dir: Option<PathBuf>,
    /// Glob patterns of additional changelog files
    pub changelogs: Vec<String>,
    /// Extension of changelog files found in the source directory
    pub extension: String,
    pub config: ValidatorConfig,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            source_dir: None,
            changelogs: Vec::new(),
            extension: "json".to_string(),
            config: ValidatorConfig::default(),
        }
    }
}

/// Validate changelogs in order within one session, so cross-file duplicates are seen
pub fn validate_changelogs(
    change_logs: &[ChangeLog],
    config: &ValidatorConfig,
) -> Result<Vec<ValidationIssue>, LintError> {
    let mut factory = ValidatorFactory::new(config)?;
    let mut issues = Vec::new();
    for change_log in change_logs {
        issues.extend(factory.validate_change_log(change_log)?);
    }
    Ok(issues)
}

/// Load every changelog named by the options and validate them together
pub fn run_validation(options: &ValidateOptions) -> Result<Vec<ValidationIssue>> {
    let mut files = loader::expand_patterns(&options.changelogs)?;
    if let Some(source_dir) = &options.source_dir {
        files.extend(loader::collect_changelogs(source_dir, &options.extension)?);
    }
    // a file matched by a pattern and the source walk is loaded once
    files.sort();
    files.dedup();
    info!(files = files.len(), "validating changelogs");

    let change_logs = files
        .iter()
        .map(|path| loader::load_changelog(path))
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = options.config.clone();
    if config.source_dir.is_none() {
        config.source_dir = options.source_dir.clone();
    }
    let issues = validate_changelogs(&change_logs, &config)
        .context("failed to validate changelogs")?;
    info!(issues = issues.len(), "validation finished");
    Ok(issues)
}
