//! Output parsing: raw model text in, ordered typed files out.
//!
//! ```text
//! raw text ──fences()──▶ Fence* ──Classifier::classify──▶ ProjectFile* ──▶ ParsedOutput
//! ```
//!
//! [`parse_output`] never fails. Prose without fences, fences with only
//! whitespace, and truncated responses all yield whatever files could be
//! recovered, possibly none. An empty result is the caller's signal to fall
//! back to [`generate_fallback_html`].
//!
//! Paths are unique in the result. When two blocks name the same path the
//! later content wins, but the file keeps the position and type of its first
//! appearance.

use crate::classify::Classifier;
use crate::fence::fences;
use crate::store::{ProjectStore, StoreError};
use crate::types::{FileType, Language, ParsedOutput, ProjectFile};
use maud::{DOCTYPE, html};

/// Parse a raw model response into typed files, in appearance order.
pub fn parse_output(raw: &str) -> ParsedOutput {
    let mut classifier = Classifier::new();
    let mut files: Vec<ProjectFile> = Vec::new();

    for fence in fences(raw) {
        if fence.content.trim().is_empty() {
            continue;
        }
        let file = classifier.classify(fence.language, fence.path, fence.content);
        match files.iter_mut().find(|f| f.path == file.path) {
            Some(existing) => existing.content = file.content,
            None => files.push(file),
        }
    }

    ParsedOutput::from(files)
}

/// Persist parsed files under `project`. Returns the saved paths in order.
pub fn save_output(
    store: &mut impl ProjectStore,
    project: &str,
    output: &ParsedOutput,
) -> Result<Vec<String>, StoreError> {
    store.save_files(project, output.files())
}

/// Parse `raw` and persist the result in one step.
pub fn parse_and_save(
    store: &mut impl ProjectStore,
    project: &str,
    raw: &str,
) -> Result<(ParsedOutput, Vec<String>), StoreError> {
    let output = parse_output(raw);
    let saved = save_output(store, project, &output)?;
    Ok((output, saved))
}

/// Minimal standalone page shown when generation produced nothing usable.
///
/// The description and job id are escaped; the result is always well-formed.
pub fn generate_fallback_html(description: &str, job_id: &str) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Site " (job_id) }
            }
            body {
                main {
                    h1 { "Site " (job_id) }
                    p { (description) }
                }
            }
        }
    }
    .into_string()
}

/// The fallback page as a parsed output holding a single `index.html` page.
pub fn fallback_output(description: &str, job_id: &str) -> ParsedOutput {
    ParsedOutput::from(vec![ProjectFile::new(
        "index.html",
        generate_fallback_html(description, job_id),
        Language::Html,
        FileType::Page,
    )])
}
