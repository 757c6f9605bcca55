//! Shared types used across all pipeline stages.
//!
//! These types are produced by the parse stage, serialized by the project
//! store, and consumed by the assemble stage, so they must stay identical
//! across all three.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source language of a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Css,
    Javascript,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Css => "css",
            Language::Javascript => "javascript",
        }
    }

    /// The file type a file of this language gets when nothing overrides it.
    ///
    /// HTML has two candidates; the page/partial split is decided by the
    /// classifier, so this returns [`FileType::Page`] for HTML.
    pub fn default_file_type(self) -> FileType {
        match self {
            Language::Html => FileType::Page,
            Language::Css => FileType::Style,
            Language::Javascript => FileType::Script,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a file during assembly.
///
/// - `Page`: servable on its own; the assembler's entry point
/// - `Partial`: HTML fragment only reachable through `<!-- include:path -->`
/// - `Style`: inlined into every page's `<head>`
/// - `Script`: inlined before every page's `</body>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Page,
    Partial,
    Style,
    Script,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Page => "page",
            FileType::Partial => "partial",
            FileType::Style => "style",
            FileType::Script => "script",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One generated file, addressed by its project-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Forward-slash relative path, never empty, never starting with `/`.
    pub path: String,
    /// Raw content exactly as it appeared between the fence markers.
    pub content: String,
    pub language: Language,
    pub file_type: FileType,
}

impl ProjectFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        language: Language,
        file_type: FileType,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language,
            file_type,
        }
    }
}

/// Files parsed from one model response, in order of appearance.
///
/// Paths are unique within one output. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedOutput {
    files: Vec<ProjectFile>,
}

impl ParsedOutput {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[ProjectFile] {
        &self.files
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectFile> {
        self.files.iter()
    }

    pub fn get(&self, path: &str) -> Option<&ProjectFile> {
        self.files.iter().find(|f| f.path == path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    pub fn into_files(self) -> Vec<ProjectFile> {
        self.files
    }
}

impl From<Vec<ProjectFile>> for ParsedOutput {
    fn from(files: Vec<ProjectFile>) -> Self {
        Self { files }
    }
}

impl<'a> IntoIterator for &'a ParsedOutput {
    type Item = &'a ProjectFile;
    type IntoIter = std::slice::Iter<'a, ProjectFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl IntoIterator for ParsedOutput {
    type Item = ProjectFile;
    type IntoIter = std::vec::IntoIter<ProjectFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// A persisted project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// The prompt the site was generated from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
