//! File classification: turns a fenced block into a typed [`ProjectFile`].
//!
//! Classification is order-dependent. The first HTML block of a response is
//! the page and every later HTML block is a partial, so the classifier is a
//! fold over the blocks in appearance order: [`Classifier`] is the
//! accumulator, and each call to [`Classifier::classify`] is one step.
//!
//! ## Rules, in priority order
//!
//! 1. **Path hint present**: normalized and used as-is. The language comes
//!    from the tag; if the tag is missing or unrecognized, from the path's
//!    extension; failing both, HTML.
//! 2. **No path hint**: a default path is synthesized per language
//!    (`index.html`, `styles.css`, `script.js`, then `index-2.html`,
//!    `style-2.css`, ...), skipping any path already used in this response.
//! 3. **File type**: CSS is a style, JavaScript is a script. HTML is a page
//!    if no page has been seen yet or if the block names the root index path
//!    itself; otherwise it is a partial. A synthesized `index.html` does not
//!    count as naming the root index.
//!
//! ## Explicit tags
//!
//! A tag of `page` or `partial` (e.g. `` ```partial:header.html ``) takes its
//! language from the path and bypasses rule 3 for HTML. A non-HTML path keeps
//! its language's file type, so `partial:theme.css` is still a style.
//!
//! ## Known limitation
//!
//! Rule 3 misclassifies multi-page sites: in a response emitting
//! `index.html` then `about.html`, `about.html` becomes a partial. The
//! heuristic is kept as-is; models that want several pages must tag them
//! with `page:`.

use crate::naming;
use crate::types::{FileType, Language, ProjectFile};
use std::collections::{HashMap, HashSet};

/// Fold state for classifying the blocks of one response.
#[derive(Debug, Default)]
pub struct Classifier {
    page_seen: bool,
    defaults_issued: HashMap<Language, usize>,
    used_paths: HashSet<String>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one block. Never fails: unknown tags fall back to the path
    /// extension, then to HTML.
    pub fn classify(
        &mut self,
        language_tag: &str,
        path_hint: Option<&str>,
        content: &str,
    ) -> ProjectFile {
        let explicit = explicit_file_type(language_tag);
        let hinted = path_hint.and_then(naming::normalize_path);

        let language = match (explicit, &hinted) {
            (Some(_), Some(path)) => naming::language_from_path(path).unwrap_or(Language::Html),
            (None, Some(path)) => naming::language_from_tag(language_tag)
                .or_else(|| naming::language_from_path(path))
                .unwrap_or(Language::Html),
            (_, None) => naming::language_from_tag(language_tag).unwrap_or(Language::Html),
        };

        let names_root_index = hinted.as_deref().is_some_and(naming::is_root_index);
        let path = match hinted {
            Some(path) => path,
            None => self.next_default_path(language),
        };
        self.used_paths.insert(path.clone());

        let file_type = match language {
            Language::Html => {
                let file_type = explicit.unwrap_or_else(|| {
                    if !self.page_seen || names_root_index {
                        FileType::Page
                    } else {
                        FileType::Partial
                    }
                });
                if file_type == FileType::Page {
                    self.page_seen = true;
                }
                file_type
            }
            other => other.default_file_type(),
        };

        ProjectFile::new(path, content, language, file_type)
    }

    fn next_default_path(&mut self, language: Language) -> String {
        let ordinal = self.defaults_issued.entry(language).or_insert(0);
        loop {
            *ordinal += 1;
            let candidate = naming::default_path(language, *ordinal);
            if !self.used_paths.contains(&candidate) {
                return candidate;
            }
        }
    }
}

/// `page` / `partial` tags force the HTML file type.
fn explicit_file_type(tag: &str) -> Option<FileType> {
    match tag.trim().to_ascii_lowercase().as_str() {
        "page" => Some(FileType::Page),
        "partial" => Some(FileType::Partial),
        _ => None,
    }
}
