//! Site generation and building.
//!
//! Two pipelines sit on top of the pure core:
//!
//! ## Generation
//!
//! [`generate_site`] turns a prompt into a stored project:
//!
//! ```text
//! prompt ──Generator──▶ raw text ──parse_output──▶ files ──save──▶ store
//!              │                         │
//!              └── error ──┐   empty ────┘
//!                          ▼
//!                fallback index.html
//! ```
//!
//! A failing or empty generation is not an error: the project gets a single
//! fallback page built from the prompt and the job id, and the report says so.
//! Files whose paths would escape the project are dropped with a warning
//! before anything is written; if none remain, the fallback page is used.
//! Only store failures abort the pipeline. The project record is written
//! after its files, so an aborted import never leaves an empty project.
//!
//! The AI call itself lives behind [`Generator`]. The crate ships
//! [`ResponseFile`], which replays a response saved to disk; closures
//! `Fn(&str) -> Result<String, GenerateError>` also implement the trait.
//!
//! ## Building
//!
//! [`build_site`] assembles every page of a stored project into an output
//! directory, mirroring project paths:
//!
//! ```text
//! dist/
//! ├── index.html        # styles/scripts inlined, includes resolved
//! └── blog/
//!     └── post.html
//! ```
//!
//! Pages are assembled and written in parallel with rayon. Partials, styles
//! and scripts are not written on their own; they only exist inlined.

use crate::assemble::{AssembleError, AssemblyContext, assemble_all};
use crate::config::SiteConfig;
use crate::parse::{fallback_output, parse_output, save_output};
use crate::store::{ProjectStore, StoreError, validate_file_path, validate_project_name};
use crate::types::{ParsedOutput, Project};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Generation failed: {0}")]
    Failed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Assembly error: {0}")]
    Assemble(#[from] AssembleError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Generators
// ============================================================================

/// Produces the raw model text for a prompt.
pub trait Generator {
    fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

impl<F> Generator for F
where
    F: Fn(&str) -> Result<String, GenerateError>,
{
    fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        self(prompt)
    }
}

/// Replays a model response saved to a file. The prompt is ignored.
#[derive(Debug, Clone)]
pub struct ResponseFile {
    path: PathBuf,
}

impl ResponseFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Generator for ResponseFile {
    fn generate(&self, _prompt: &str) -> Result<String, GenerateError> {
        Ok(fs::read_to_string(&self.path)?)
    }
}

// ============================================================================
// Generation pipeline
// ============================================================================

/// Outcome of [`generate_site`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub project: String,
    /// Saved paths in response order.
    pub saved: Vec<String>,
    /// True when the fallback page was saved instead of parsed files.
    pub used_fallback: bool,
}

/// Generate, parse, and store a site for `prompt` under `project`.
///
/// A non-blank prompt is recorded as the project description.
pub fn generate_site(
    generator: &impl Generator,
    store: &mut impl ProjectStore,
    project: &str,
    prompt: &str,
    job_id: &str,
) -> Result<GenerationReport, PipelineError> {
    validate_project_name(project)?;

    let parsed = match generator.generate(prompt) {
        Ok(raw) => {
            let parsed = drop_unsafe_paths(parse_output(&raw), job_id);
            if parsed.is_empty() {
                warn!("Job {job_id}: response for {project} has no usable code blocks, using fallback page");
                None
            } else {
                debug!("Job {job_id}: parsed {} files for {project}", parsed.len());
                Some(parsed)
            }
        }
        Err(e) => {
            warn!("Job {job_id}: generation for {project} failed ({e}), using fallback page");
            None
        }
    };
    let used_fallback = parsed.is_none();
    let output = parsed.unwrap_or_else(|| fallback_output(prompt, job_id));

    let saved = save_output(store, project, &output)?;
    let description = (!prompt.trim().is_empty()).then(|| prompt.to_string());
    if description.is_some() {
        store.put_project(&Project {
            name: project.to_string(),
            description,
        })?;
    }
    info!("Job {job_id}: saved {} files to {project}", saved.len());

    Ok(GenerationReport {
        project: project.to_string(),
        saved,
        used_fallback,
    })
}

/// Remove files the store would refuse, so one bad path cannot sink the rest.
fn drop_unsafe_paths(parsed: ParsedOutput, job_id: &str) -> ParsedOutput {
    parsed
        .into_files()
        .into_iter()
        .filter(|file| match validate_file_path(&file.path) {
            Ok(()) => true,
            Err(e) => {
                warn!("Job {job_id}: dropping {} ({e})", file.path);
                false
            }
        })
        .collect::<Vec<_>>()
        .into()
}

// ============================================================================
// Site build
// ============================================================================

/// Outcome of [`build_site`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    pub project: String,
    pub output_dir: PathBuf,
    /// Written page paths, relative to `output_dir`, in project order.
    pub pages: Vec<String>,
}

/// Assemble every page of `project` and write it under `output_dir`.
pub fn build_site(
    store: &impl ProjectStore,
    project: &str,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<BuildReport, BuildError> {
    let files = store.get_files(project)?;
    let ctx = AssemblyContext::new("", &files)
        .with_project(project)
        .with_route_prefix(&config.route_prefix)
        .with_metadata(&config.metadata);
    let rendered = assemble_all(&ctx)?;

    fs::create_dir_all(output_dir)?;

    let pages = rendered
        .par_iter()
        .map(|(path, html)| -> Result<String, BuildError> {
            let target = output_dir.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, html)?;
            debug!("wrote {}", target.display());
            Ok(path.clone())
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("Built {} pages for {project} into {}", pages.len(), output_dir.display());
    Ok(BuildReport {
        project: project.to_string(),
        output_dir: output_dir.to_path_buf(),
        pages,
    })
}
