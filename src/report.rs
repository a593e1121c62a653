//! Human-readable issue report printer

use crate::validator::ValidationIssue;

/// Issues grouped by changelog file, files in first-seen order
pub fn group_by_file(issues: &[ValidationIssue]) -> Vec<(&str, Vec<&ValidationIssue>)> {
    let mut groups: Vec<(&str, Vec<&ValidationIssue>)> = Vec::new();
    for issue in issues {
        match groups.iter_mut().find(|(file, _)| *file == issue.file) {
            Some((_, group)) => group.push(issue),
            None => groups.push((issue.file.as_str(), vec![issue])),
        }
    }
    groups
}

/// One report line for an issue
pub fn format_issue(issue: &ValidationIssue) -> String {
    match (&issue.change_set_id, &issue.element) {
        (Some(id), Some(element)) => format!(
            "ChangeSet {}, element {} has a violation: {}",
            id, element, issue.message
        ),
        (Some(id), None) => format!("ChangeSet {}, has a violation: {}", id, issue.message),
        (None, _) => format!("ChangeLog {} has a violation: {}", issue.file, issue.message),
    }
}

/// Render the grouped report as text
pub fn render_issues(issues: &[ValidationIssue]) -> String {
    let mut out = String::new();
    for (file, group) in group_by_file(issues) {
        out.push_str(&format!("There are violations on changelog {}\n", file));
        for issue in group {
            out.push_str("  ");
            out.push_str(&format_issue(issue));
            out.push('\n');
        }
    }
    out
}

/// Print the grouped report to stdout
pub fn print_issues(issues: &[ValidationIssue]) {
    print!("{}", render_issues(issues));
}

/// Serialise issues as a JSON array
pub fn to_json(issues: &[ValidationIssue]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(issues)
}
