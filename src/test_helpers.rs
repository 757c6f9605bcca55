//! Shared test utilities for the sitesmith test suite.
//!
//! Provides file constructors, lookups that panic with the available keys on
//! a miss, and canned model responses.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let files = vec![
//!     page("index.html", "<body><!-- include:header.html --></body>"),
//!     partial("header.html", "<header></header>"),
//!     style("styles.css", "body{}"),
//! ];
//! assert_eq!(find_file(&files, "styles.css").content, "body{}");
//! ```

use crate::types::{FileType, Language, ProjectFile};

// =========================================================================
// File constructors
// =========================================================================

pub fn page(path: &str, content: &str) -> ProjectFile {
    ProjectFile::new(path, content, Language::Html, FileType::Page)
}

pub fn partial(path: &str, content: &str) -> ProjectFile {
    ProjectFile::new(path, content, Language::Html, FileType::Partial)
}

pub fn style(path: &str, content: &str) -> ProjectFile {
    ProjectFile::new(path, content, Language::Css, FileType::Style)
}

pub fn script(path: &str, content: &str) -> ProjectFile {
    ProjectFile::new(path, content, Language::Javascript, FileType::Script)
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a file by path. Panics if not found.
pub fn find_file<'a>(files: &'a [ProjectFile], path: &str) -> &'a ProjectFile {
    files.iter().find(|f| f.path == path).unwrap_or_else(|| {
        let paths = file_paths(files);
        panic!("file '{path}' not found. Available: {paths:?}")
    })
}

pub fn file_paths(files: &[ProjectFile]) -> Vec<&str> {
    files.iter().map(|f| f.path.as_str()).collect()
}

// =========================================================================
// Canned responses
// =========================================================================

/// A typical response: prose, a page with an include, a partial, a
/// stylesheet and a script.
pub const LANDING_RESPONSE: &str = r#"Here is your landing page.

```html:index.html
<!DOCTYPE html>
<html>
<head>
<title>Bakery</title>
</head>
<body>
<!-- include:partials/header.html -->
<main>Fresh bread daily.</main>
</body>
</html>
```

The header is shared:

```html:partials/header.html
<header>Bakery</header>
```

```css:styles.css
body { margin: 0; }
```

```javascript:script.js
console.log("ready");
```

Enjoy!
"#;
