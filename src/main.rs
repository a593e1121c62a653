use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use rust_changelog_lint::{report, run_validation, ValidateOptions, ValidatorConfig};

#[derive(Parser)]
#[command(name = "rust-changelog-lint")]
#[command(author, version, about = "Schema-aware validator for database migration changelogs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate changelog files against the validator catalog
    Validate {
        /// Directory searched for changelog files
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Additional changelog files or glob patterns
        #[arg(short = 'f', long = "changelog")]
        changelogs: Vec<String>,

        /// Extension of changelog files in the source directory
        #[arg(short, long, default_value = "json")]
        extension: String,

        /// JSON validator configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Validator names to suppress
        #[arg(long = "ignore-rule")]
        ignore_rules: Vec<String>,

        /// Change types to allow exclusively
        #[arg(long = "include-change")]
        include_changes: Vec<String>,

        /// Change types to reject
        #[arg(long = "exclude-change")]
        exclude_changes: Vec<String>,

        /// Change set ids to skip when they are DB specific
        #[arg(long = "skip-change-set")]
        skip_change_sets: Vec<String>,

        /// Identifier pattern change set ids must start with
        #[arg(long)]
        issue_pattern: Option<String>,

        /// Expected logical file path of every changelog
        #[arg(long)]
        artifact_id: Option<String>,

        /// Validator parameter as <validatorName>.<key>=<value>
        #[arg(short = 'D', long = "param", value_parser = parse_parameter)]
        parameters: Vec<(String, String)>,

        /// Print issues as JSON
        #[arg(long)]
        json: bool,

        /// Report issues without failing
        #[arg(long)]
        no_fail_on_error: bool,
    },
}

fn parse_parameter(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected <validatorName>.<key>=<value>, got '{}'", raw))
}

fn load_config(path: Option<&PathBuf>) -> Result<ValidatorConfig> {
    let Some(path) = path else {
        return Ok(ValidatorConfig::default());
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rust_changelog_lint=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            source,
            changelogs,
            extension,
            config,
            ignore_rules,
            include_changes,
            exclude_changes,
            skip_change_sets,
            issue_pattern,
            artifact_id,
            parameters,
            json,
            no_fail_on_error,
        } => {
            let mut config = load_config(config.as_ref())?;
            config.ignore_rules.extend(ignore_rules);
            config.include_changes.extend(include_changes);
            config.exclude_changes.extend(exclude_changes);
            config.skip_change_sets.extend(skip_change_sets);
            config.parameters.extend(parameters);
            if issue_pattern.is_some() {
                config.issue_pattern = issue_pattern;
            }
            if artifact_id.is_some() {
                config.artifact_id = artifact_id;
            }

            let options = ValidateOptions {
                source_dir: source,
                changelogs,
                extension,
                config,
            };
            let issues = run_validation(&options)?;

            if json {
                println!("{}", report::to_json(&issues)?);
            } else {
                report::print_issues(&issues);
            }

            if !issues.is_empty() && !no_fail_on_error {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
