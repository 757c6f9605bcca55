//! Project persistence.
//!
//! Parsing and assembly are pure; persistence is a collaborator behind the
//! [`ProjectStore`] trait, a key-value store keyed by project name and file
//! path. Two implementations ship with the crate:
//!
//! - [`FsStore`]: one directory per project, used by the CLI
//! - [`MemoryStore`]: a map, used by tests and embedders
//!
//! ## On-disk layout
//!
//! ```text
//! projects/                    # store root
//! └── my-project/
//!     ├── project.json         # Project record
//!     ├── files.json           # Ordered index: path, language, file_type
//!     └── files/
//!         ├── index.html       # Raw content, byte-for-byte
//!         ├── styles.css
//!         └── partials/
//!             └── header.html
//! ```
//!
//! Content lives in plain files so a project directory can be inspected (or
//! served) without the tool; `files.json` carries the ordering and typing
//! that the assembler needs.
//!
//! ## Writes
//!
//! [`ProjectStore::save_files`] upserts by path: existing entries keep their
//! position, new ones are appended. Files are written one at a time with no
//! transaction; if a write fails the error is returned and the caller decides
//! whether to retry or abandon the batch.

use crate::types::{FileType, Language, Project, ProjectFile};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    #[error("Invalid project name: {0:?}")]
    InvalidProjectName(String),
    #[error("Unsafe file path: {0:?}")]
    UnsafePath(String),
}

/// CRUD over persisted projects and their files.
pub trait ProjectStore {
    /// Look up a project record. `Ok(None)` if it doesn't exist.
    fn get_project(&self, name: &str) -> Result<Option<Project>, StoreError>;

    /// Create or replace a project record.
    fn put_project(&mut self, project: &Project) -> Result<(), StoreError>;

    /// All files of a project, in stored order.
    fn get_files(&self, name: &str) -> Result<Vec<ProjectFile>, StoreError>;

    /// One file of a project. `Ok(None)` if the project has no such path.
    fn get_file(&self, name: &str, path: &str) -> Result<Option<ProjectFile>, StoreError>;

    /// Upsert files into a project, creating the project if needed.
    /// Returns the saved paths in input order.
    fn save_files(&mut self, name: &str, files: &[ProjectFile]) -> Result<Vec<String>, StoreError>;
}

/// Reject names that could escape the store root.
pub fn validate_project_name(name: &str) -> Result<(), StoreError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\', ':'])
        && name.chars().all(|c| !c.is_control());
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidProjectName(name.to_string()))
    }
}

/// Reject file paths that are absolute or climb out of the project.
pub fn validate_file_path(path: &str) -> Result<(), StoreError> {
    let valid = !path.is_empty()
        && !path.starts_with('/')
        && !path.contains(['\\', ':'])
        && path.split('/').all(|s| !s.is_empty() && s != "." && s != "..");
    if valid {
        Ok(())
    } else {
        Err(StoreError::UnsafePath(path.to_string()))
    }
}

// ============================================================================
// Filesystem store
// ============================================================================

const PROJECT_FILENAME: &str = "project.json";
const INDEX_FILENAME: &str = "files.json";
const FILES_DIR: &str = "files";

/// Entry in `files.json`. Content is stored separately under `files/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    path: String,
    language: Language,
    file_type: FileType,
}

/// Directory-backed [`ProjectStore`].
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Names of all projects in the store, sorted.
    pub fn list_projects(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut names: Vec<String> = fs::read_dir(&self.root)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().join(PROJECT_FILENAME).is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    fn project_dir(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_project_name(name)?;
        Ok(self.root.join(name))
    }

    fn load_index(&self, name: &str) -> Result<Vec<IndexEntry>, StoreError> {
        let dir = self.project_dir(name)?;
        if !dir.join(PROJECT_FILENAME).is_file() {
            return Err(StoreError::ProjectNotFound(name.to_string()));
        }
        let index_path = dir.join(INDEX_FILENAME);
        if !index_path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(index_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn read_entry(&self, name: &str, entry: IndexEntry) -> Result<ProjectFile, StoreError> {
        validate_file_path(&entry.path)?;
        let content = fs::read_to_string(self.root.join(name).join(FILES_DIR).join(&entry.path))?;
        Ok(ProjectFile::new(entry.path, content, entry.language, entry.file_type))
    }
}

impl ProjectStore for FsStore {
    fn get_project(&self, name: &str) -> Result<Option<Project>, StoreError> {
        let path = self.project_dir(name)?.join(PROJECT_FILENAME);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn put_project(&mut self, project: &Project) -> Result<(), StoreError> {
        let dir = self.project_dir(&project.name)?;
        fs::create_dir_all(&dir)?;
        let json = serde_json::to_string_pretty(project)?;
        fs::write(dir.join(PROJECT_FILENAME), json)?;
        Ok(())
    }

    fn get_files(&self, name: &str) -> Result<Vec<ProjectFile>, StoreError> {
        self.load_index(name)?
            .into_iter()
            .map(|entry| self.read_entry(name, entry))
            .collect()
    }

    fn get_file(&self, name: &str, path: &str) -> Result<Option<ProjectFile>, StoreError> {
        let entry = self.load_index(name)?.into_iter().find(|e| e.path == path);
        entry.map(|e| self.read_entry(name, e)).transpose()
    }

    fn save_files(&mut self, name: &str, files: &[ProjectFile]) -> Result<Vec<String>, StoreError> {
        for file in files {
            validate_file_path(&file.path)?;
        }
        if self.get_project(name)?.is_none() {
            self.put_project(&Project {
                name: name.to_string(),
                description: None,
            })?;
        }

        let mut index = self.load_index(name)?;
        let files_dir = self.project_dir(name)?.join(FILES_DIR);
        let mut saved = Vec::with_capacity(files.len());

        for file in files {
            let target = files_dir.join(&file.path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &file.content)?;
            debug!("wrote {}/{}", name, file.path);

            let entry = IndexEntry {
                path: file.path.clone(),
                language: file.language,
                file_type: file.file_type,
            };
            match index.iter_mut().find(|e| e.path == file.path) {
                Some(existing) => *existing = entry,
                None => index.push(entry),
            }
            saved.push(file.path.clone());
        }

        let json = serde_json::to_string_pretty(&index)?;
        fs::write(self.project_dir(name)?.join(INDEX_FILENAME), json)?;
        Ok(saved)
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Map-backed [`ProjectStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    projects: BTreeMap<String, (Project, Vec<ProjectFile>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    fn get_project(&self, name: &str) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.get(name).map(|(p, _)| p.clone()))
    }

    fn put_project(&mut self, project: &Project) -> Result<(), StoreError> {
        validate_project_name(&project.name)?;
        self.projects
            .entry(project.name.clone())
            .and_modify(|(p, _)| *p = project.clone())
            .or_insert_with(|| (project.clone(), Vec::new()));
        Ok(())
    }

    fn get_files(&self, name: &str) -> Result<Vec<ProjectFile>, StoreError> {
        self.projects
            .get(name)
            .map(|(_, files)| files.clone())
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))
    }

    fn get_file(&self, name: &str, path: &str) -> Result<Option<ProjectFile>, StoreError> {
        let (_, files) = self
            .projects
            .get(name)
            .ok_or_else(|| StoreError::ProjectNotFound(name.to_string()))?;
        Ok(files.iter().find(|f| f.path == path).cloned())
    }

    fn save_files(&mut self, name: &str, files: &[ProjectFile]) -> Result<Vec<String>, StoreError> {
        validate_project_name(name)?;
        for file in files {
            validate_file_path(&file.path)?;
        }
        let (_, stored) = self.projects.entry(name.to_string()).or_insert_with(|| {
            (
                Project {
                    name: name.to_string(),
                    description: None,
                },
                Vec::new(),
            )
        });
        for file in files {
            match stored.iter_mut().find(|f| f.path == file.path) {
                Some(existing) => *existing = file.clone(),
                None => stored.push(file.clone()),
            }
        }
        Ok(files.iter().map(|f| f.path.clone()).collect())
    }
}
