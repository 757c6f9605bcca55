//! Centralized naming rules for generated files.
//!
//! Every file a model emits is addressed by a project-relative path, but the
//! model is sloppy about it: paths arrive with leading slashes, `./` prefixes,
//! surrounding whitespace, or not at all. Language tags are just as loose
//! (`js`, `JavaScript`, `htm`). This module owns the conventions that turn
//! those hints into canonical values:
//!
//! - `"/pages/about.html "` → `pages/about.html`
//! - `"JS"`, `"javascript"`, `"mjs"` → [`Language::Javascript`]
//! - no path, first CSS block → `styles.css`; second → `style-2.css`
//!
//! ## Default paths
//!
//! | Language | First path-less block | Nth path-less block |
//! |----------|-----------------------|---------------------|
//! | HTML | `index.html` | `index-N.html` |
//! | CSS | `styles.css` | `style-N.css` |
//! | JavaScript | `script.js` | `script-N.js` |

use crate::types::Language;

/// Normalize a path hint into a project-relative, forward-slash path.
///
/// Trims whitespace, converts backslashes, strips leading `/` and `./`
/// segments, and collapses repeated separators. Returns `None` when nothing
/// is left.
pub fn normalize_path(hint: &str) -> Option<String> {
    let unified = hint.trim().replace('\\', "/");
    let segments: Vec<&str> = unified
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    if segments.is_empty() {
        None
    } else {
        Some(segments.join("/"))
    }
}

/// Resolve a fence language tag to a [`Language`].
///
/// Case-insensitive. Returns `None` for empty or unrecognized tags so the
/// caller can fall back to the path extension.
pub fn language_from_tag(tag: &str) -> Option<Language> {
    match tag.trim().to_ascii_lowercase().as_str() {
        "html" | "htm" | "xhtml" | "html5" => Some(Language::Html),
        "css" => Some(Language::Css),
        "javascript" | "js" | "mjs" | "cjs" | "ecmascript" => Some(Language::Javascript),
        _ => None,
    }
}

/// Resolve a path's extension to a [`Language`].
pub fn language_from_path(path: &str) -> Option<Language> {
    let file_name = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = file_name.rsplit_once('.')?;
    language_from_tag(ext)
}

/// Default path for the `ordinal`-th (1-based) path-less block of a language.
pub fn default_path(language: Language, ordinal: usize) -> String {
    match (language, ordinal) {
        (Language::Html, 1) => "index.html".to_string(),
        (Language::Css, 1) => "styles.css".to_string(),
        (Language::Javascript, 1) => "script.js".to_string(),
        (Language::Html, n) => format!("index-{n}.html"),
        (Language::Css, n) => format!("style-{n}.css"),
        (Language::Javascript, n) => format!("script-{n}.js"),
    }
}

/// Whether a path names the conventional root page.
pub fn is_root_index(path: &str) -> bool {
    path.eq_ignore_ascii_case("index.html") || path.eq_ignore_ascii_case("index.htm")
}
