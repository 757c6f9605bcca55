//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Every entity (project, file, page) leads with its positional index and
//! identity. Details such as file type or include targets follow on indented
//! context lines, so the output reads as an inventory.
//!
//! # Output Format
//!
//! ## Files
//!
//! ```text
//! Files
//! 001 index.html (page, html)
//!     Includes: partials/header.html
//! 002 partials/header.html (partial, html)
//! 003 styles.css (style, css)
//! ```
//!
//! ## Generation
//!
//! ```text
//! 001 index.html
//! 002 partials/header.html
//! Saved 2 files to bakery
//! ```
//!
//! ## Build
//!
//! ```text
//! 001 index.html → dist/index.html
//! 002 blog/post.html → dist/blog/post.html
//! Built 2 pages for bakery
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::generate::{BuildReport, GenerationReport};
use crate::include::include_targets;
use crate::types::{FileType, Project, ProjectFile};

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Files
// ============================================================================

/// Format a file listing: index, path, type and language, plus the include
/// targets of each HTML file.
pub fn format_files(files: &[ProjectFile]) -> Vec<String> {
    if files.is_empty() {
        return vec!["No files".to_string()];
    }

    let mut lines = vec!["Files".to_string()];
    for (i, file) in files.iter().enumerate() {
        lines.push(format!(
            "{} {} ({}, {})",
            format_index(i + 1),
            file.path,
            file.file_type,
            file.language
        ));
        if matches!(file.file_type, FileType::Page | FileType::Partial) {
            let targets = include_targets(&file.content);
            if !targets.is_empty() {
                lines.push(format!("{}Includes: {}", indent(1), targets.join(", ")));
            }
        }
    }
    lines
}

pub fn print_files(files: &[ProjectFile]) {
    print_lines(format_files(files));
}

// ============================================================================
// Projects
// ============================================================================

/// Format the project list with truncated descriptions.
pub fn format_projects(projects: &[Project]) -> Vec<String> {
    if projects.is_empty() {
        return vec!["No projects".to_string()];
    }

    let mut lines = Vec::new();
    for (i, project) in projects.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), project.name));
        if let Some(desc) = project.description.as_deref().filter(|d| !d.trim().is_empty()) {
            let flat = desc.split_whitespace().collect::<Vec<_>>().join(" ");
            lines.push(format!("{}Description: {}", indent(1), truncate_desc(&flat, 60)));
        }
    }
    lines
}

pub fn print_projects(projects: &[Project]) {
    print_lines(format_projects(projects));
}

// ============================================================================
// Generation
// ============================================================================

/// Format the result of a generation or import.
pub fn format_generation_report(report: &GenerationReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .saved
        .iter()
        .enumerate()
        .map(|(i, path)| format!("{} {}", format_index(i + 1), path))
        .collect();
    if report.used_fallback {
        lines.push("No usable files in the response, saved fallback page".to_string());
    }
    lines.push(format!(
        "Saved {} to {}",
        plural(report.saved.len(), "file", "files"),
        report.project
    ));
    lines
}

pub fn print_generation_report(report: &GenerationReport) {
    print_lines(format_generation_report(report));
}

// ============================================================================
// Build
// ============================================================================

/// Format the result of a site build.
pub fn format_build_report(report: &BuildReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                page,
                report.output_dir.join(page).display()
            )
        })
        .collect();
    lines.push(format!(
        "Built {} for {}",
        plural(report.pages.len(), "page", "pages"),
        report.project
    ));
    lines
}

pub fn print_build_report(report: &BuildReport) {
    print_lines(format_build_report(report));
}

// ============================================================================
// Tests
// ============================================================================
