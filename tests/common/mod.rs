//! Common test utilities for rust-changelog-lint tests

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

use rust_changelog_lint::{validate_changelogs, ChangeLog, ValidationIssue, ValidatorConfig};

/// Build a changelog from JSON change sets
pub fn changelog(physical: &str, logical: Option<&str>, change_sets: Value) -> ChangeLog {
    let mut change_log: ChangeLog = serde_json::from_value(json!({
        "logicalFilePath": logical,
        "changeSets": change_sets,
    }))
    .expect("Failed to build changelog");
    change_log.physical_file_path = physical.to_string();
    change_log
}

/// A change set with a well-formed id and author
pub fn change_set(id: &str, changes: Value) -> Value {
    json!({ "id": id, "author": "dev", "changes": changes })
}

/// Changelog holding a single change set
pub fn single_set(changes: Value) -> ChangeLog {
    changelog(
        "db/orders/changelog.json",
        Some("orders"),
        json!([change_set("ORDS-1-1", changes)]),
    )
}

/// Validate with the default configuration, panicking on session errors
pub fn validate(change_logs: &[ChangeLog]) -> Vec<ValidationIssue> {
    validate_with(change_logs, &ValidatorConfig::default())
}

pub fn validate_with(change_logs: &[ChangeLog], config: &ValidatorConfig) -> Vec<ValidationIssue> {
    validate_changelogs(change_logs, config).expect("Validation session failed")
}

/// Messages of the issues containing a fragment
pub fn messages_containing(issues: &[ValidationIssue], fragment: &str) -> Vec<String> {
    issues
        .iter()
        .filter(|issue| issue.message.contains(fragment))
        .map(|issue| issue.message.clone())
        .collect()
}

/// A column declaration
pub fn column(name: &str, data_type: &str) -> Value {
    json!({ "name": name, "type": data_type })
}

/// A column declaration with an inline not-null constraint and a default
pub fn not_null_column(name: &str, data_type: &str, default: &str) -> Value {
    json!({
        "name": name,
        "type": data_type,
        "defaultValueNumeric": default,
        "constraints": { "nullable": false }
    })
}

/// Source tree of changelog files in a temporary directory
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub source_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            source_dir,
        }
    }

    /// Write a changelog below the source directory
    pub fn write(&self, relative: &str, content: &Value) -> PathBuf {
        let path = self.source_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create changelog directory");
        }
        fs::write(&path, serde_json::to_string_pretty(content).expect("Failed to serialise"))
            .expect("Failed to write changelog");
        path
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.source_dir.join(relative)
    }
}

/// Path as it appears in issues loaded from disk
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
