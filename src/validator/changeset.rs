//! Change set validators

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use regex::Regex;

use super::{ChangeSetValidator, ValidationIssue};
use crate::error::LintError;
use crate::model::ChangeSetRef;

/// Checksums that would accept any content
const PERMISSIVE_CHECKSUMS: &[&str] = &["1:any", "1:all", "1:1:*", "1:*"];

// ============================================================================
// Duplicated ids
// ============================================================================

/// A change set id may be used once per logical changelog
pub struct DuplicatedIdValidator<'s> {
    ids: &'s mut HashMap<(Option<String>, String), String>,
}

impl<'s> DuplicatedIdValidator<'s> {
    pub fn new(ids: &'s mut HashMap<(Option<String>, String), String>) -> Self {
        Self { ids }
    }
}

impl ChangeSetValidator for DuplicatedIdValidator<'_> {
    fn name(&self) -> &'static str {
        "duplicatedId"
    }

    fn validate(&mut self, change_set: ChangeSetRef<'_>) -> Result<Vec<ValidationIssue>, LintError> {
        let change_log = change_set.change_log;
        let key = (change_log.logical_file_path.clone(), change_set.id().to_string());
        let Some(first) = self.ids.get(&key) else {
            self.ids.insert(key, change_log.physical_file_path.clone());
            return Ok(Vec::new());
        };
        let message = if *first == change_log.physical_file_path {
            format!("the changeSet {} is already defined in the same file", change_set.id())
        } else {
            format!("the changeSet {} is already defined in {}", change_set.id(), first)
        };
        Ok(vec![ValidationIssue::for_change_set(change_set, Some("id"), message)])
    }
}

// ============================================================================
// Checksums
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckSumValidator;

impl ChangeSetValidator for CheckSumValidator {
    fn name(&self) -> &'static str {
        "checksum"
    }

    fn validate(&mut self, change_set: ChangeSetRef<'_>) -> Result<Vec<ValidationIssue>, LintError> {
        Ok(change_set
            .change_set
            .valid_check_sums
            .iter()
            .map(|checksum| checksum.trim().to_lowercase())
            .filter(|checksum| PERMISSIVE_CHECKSUMS.contains(&checksum.as_str()))
            .map(|checksum| {
                ValidationIssue::for_change_set_element(
                    change_set,
                    "validCheckSum",
                    format!("the {} validateCheckSum is not allowed", checksum),
                )
            })
            .collect())
    }
}

// ============================================================================
// Issue ids
// ============================================================================

/// Change set ids must start with an issue key and end with a progressive number
#[derive(Debug, Clone)]
pub struct IssueIdValidator {
    issue: Regex,
    progressive: Regex,
}

impl IssueIdValidator {
    pub fn new(pattern: &str) -> Result<Self, LintError> {
        let compile = |source: String| {
            Regex::new(&source).map_err(|source| LintError::InvalidIssuePattern {
                pattern: pattern.to_string(),
                source,
            })
        };
        Ok(Self {
            issue: compile(format!("^(?:{})", pattern))?,
            progressive: compile(format!(r"^(?:{})-\d+$", pattern))?,
        })
    }
}

impl ChangeSetValidator for IssueIdValidator {
    fn name(&self) -> &'static str {
        "issueId"
    }

    fn validate(&mut self, change_set: ChangeSetRef<'_>) -> Result<Vec<ValidationIssue>, LintError> {
        let mut issues = Vec::new();
        let id = change_set.id();
        if !id.is_empty() {
            if !self.issue.is_match(id) {
                issues.push(ValidationIssue::for_change_set(
                    change_set,
                    Some("id"),
                    "The changeset id does not matches the issue pattern",
                ));
            } else if !self.progressive.is_match(id) {
                issues.push(ValidationIssue::for_change_set(
                    change_set,
                    Some("id"),
                    "The changeset id does not end with progressive number after the issue id",
                ));
            }
        }
        if change_set.author().map_or(true, str::is_empty) {
            issues.push(ValidationIssue::for_change_set(
                change_set,
                Some("author"),
                "The author is required",
            ));
        }
        Ok(issues)
    }
}

// ============================================================================
// Logical file paths
// ============================================================================

/// Where the expected logical file path of a changelog comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpectedPath {
    /// Every changelog belongs to one artifact
    Artifact(String),
    /// Dotted directory of the changelog relative to the source root
    SourceDir {
        root: PathBuf,
        suffix: Option<String>,
    },
}

impl ExpectedPath {
    pub fn for_file(&self, physical_path: &str) -> String {
        match self {
            ExpectedPath::Artifact(artifact) => artifact.clone(),
            ExpectedPath::SourceDir { root, suffix } => {
                let parent = Path::new(physical_path).parent().unwrap_or(Path::new(""));
                let relative = parent.strip_prefix(root).unwrap_or(parent);
                let mut expected = relative
                    .components()
                    .filter_map(|component| match component {
                        Component::Normal(part) => Some(part.to_string_lossy()),
                        _ => None,
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                if let Some(suffix) = suffix {
                    expected.push('.');
                    expected.push_str(suffix);
                }
                expected
            }
        }
    }
}

/// Every changelog declares the logical file path of its project, checked once per file
pub struct FilePathValidator<'s> {
    expected: &'s ExpectedPath,
    checked: &'s mut HashSet<String>,
}

impl<'s> FilePathValidator<'s> {
    pub fn new(expected: &'s ExpectedPath, checked: &'s mut HashSet<String>) -> Self {
        Self { expected, checked }
    }
}

impl ChangeSetValidator for FilePathValidator<'_> {
    fn name(&self) -> &'static str {
        "filePath"
    }

    fn validate(&mut self, change_set: ChangeSetRef<'_>) -> Result<Vec<ValidationIssue>, LintError> {
        let change_log = change_set.change_log;
        let physical = &change_log.physical_file_path;
        if !self.checked.insert(physical.clone()) {
            return Ok(Vec::new());
        }
        let message = match change_log.logical_file_path.as_deref() {
            None | Some("") => "The logicalFilePath attribute is required",
            Some(logical) if logical == physical.as_str() => "The logicalFilePath attribute is required",
            Some(logical) if logical != self.expected.for_file(physical) => {
                "The logicalFilePath attribute does not match the artifactId of the project"
            }
            Some(_) => return Ok(Vec::new()),
        };
        Ok(vec![ValidationIssue::for_change_log(
            change_log,
            Some("logicalFilePath"),
            message,
        )])
    }
}
