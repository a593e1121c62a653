//! Changelog loading
//!
//! Changelogs arrive already parsed, serialised as JSON record trees. This
//! module only materialises them into [`ChangeLog`] values and finds them on
//! disk; it does not understand any changelog source format.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::LintError;
use crate::model::ChangeLog;

/// Load one changelog, recording where it was read from when the file does not say
pub fn load_changelog(path: &Path) -> Result<ChangeLog, LintError> {
    let content = fs::read_to_string(path).map_err(|source| LintError::ChangeLogReadError {
        path: path.to_path_buf(),
        source,
    })?;
    let mut change_log = parse_changelog(&content).map_err(|source| {
        LintError::ChangeLogParseError {
            path: path.to_path_buf(),
            source,
        }
    })?;
    if change_log.physical_file_path.is_empty() {
        change_log.physical_file_path = path.to_string_lossy().replace('\\', "/");
    }
    debug!(
        path = %path.display(),
        change_sets = change_log.change_sets.len(),
        "loaded changelog"
    );
    Ok(change_log)
}

/// Parse a changelog from JSON text
pub fn parse_changelog(content: &str) -> Result<ChangeLog, serde_json::Error> {
    serde_json::from_str(content)
}

/// Find changelog files with the given extension below a source directory, in path order
pub fn collect_changelogs(source_dir: &Path, extension: &str) -> Result<Vec<PathBuf>, LintError> {
    let extension = extension.trim_start_matches('.');
    let mut files = Vec::new();
    for entry in WalkDir::new(source_dir).sort_by_file_name() {
        let entry = entry.map_err(|source| LintError::SourceWalkError {
            path: source_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file()
            && path
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case(extension))
        {
            files.push(path.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

/// Expand glob patterns into a sorted, deduplicated list of changelog files
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, LintError> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|source| LintError::InvalidIncludePattern {
            pattern: pattern.clone(),
            source,
        })?;
        files.extend(paths.filter_map(|p| p.ok()).filter(|p| p.is_file()));
    }
    files.sort();
    files.dedup();
    Ok(files)
}
