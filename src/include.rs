//! Partial include resolution.
//!
//! Pages compose partials with an HTML comment directive:
//!
//! ```html
//! <body>
//!   <!-- include:partials/header.html -->
//!   <main>...</main>
//! </body>
//! ```
//!
//! Each directive is replaced by the referenced file's content, itself
//! resolved first, so partials can include partials.
//!
//! ## Misses and cycles
//!
//! - A directive naming a path that isn't in the file set is removed. A model
//!   that forgot to emit a partial should cost the page a header, not the
//!   whole render.
//! - A directive naming a path already being expanded higher up the current
//!   chain is removed. `a → b → a` expands `b` inside `a` once and stops.
//!   Visited paths are per chain, not global: the same partial included twice
//!   side by side is expanded twice.
//!
//! ## Bound
//!
//! Chain-scoped cycle breaking terminates, but a diamond-shaped include graph
//! (a partial including another partial twice, repeated a few levels deep)
//! still multiplies work at every level. Resolution therefore carries a
//! substitution budget of `directives × files`; once spent, remaining
//! directives are removed like misses.

use crate::naming::normalize_path;
use crate::types::ProjectFile;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// `<!-- include:path -->`, whitespace-tolerant. Group 1 is the path.
static INCLUDE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*include:\s*(\S+?)\s*-->").expect("include directive pattern is valid")
});

/// Replace every include directive in `html` with the resolved content of
/// the file it names.
pub fn resolve_includes(html: &str, files: &[ProjectFile]) -> String {
    Resolver::new(html, files).resolve(html, &[])
}

/// Resolve the includes of `file` itself, treating its own path as already
/// visited so it can never be expanded inside itself.
pub fn resolve_file_includes(file: &ProjectFile, files: &[ProjectFile]) -> String {
    Resolver::new(&file.content, files).resolve(&file.content, &[file.path.as_str()])
}

/// Paths named by the include directives in `html`, in order.
pub fn include_targets(html: &str) -> Vec<String> {
    INCLUDE_DIRECTIVE
        .captures_iter(html)
        .filter_map(|caps| normalize_path(&caps[1]))
        .collect()
}

struct Resolver<'a> {
    files: HashMap<&'a str, &'a str>,
    budget: usize,
    substitutions: usize,
}

impl<'a> Resolver<'a> {
    fn new(root: &str, files: &'a [ProjectFile]) -> Self {
        let directives = INCLUDE_DIRECTIVE.find_iter(root).count()
            + files
                .iter()
                .map(|f| INCLUDE_DIRECTIVE.find_iter(&f.content).count())
                .sum::<usize>();
        Self {
            files: files
                .iter()
                .map(|f| (f.path.as_str(), f.content.as_str()))
                .collect(),
            budget: directives.max(1) * files.len().max(1),
            substitutions: 0,
        }
    }

    fn resolve(&mut self, html: &str, visited: &[&'a str]) -> String {
        let mut chain = visited.to_vec();
        self.expand(html, &mut chain)
    }

    fn expand(&mut self, html: &str, chain: &mut Vec<&'a str>) -> String {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;

        for caps in INCLUDE_DIRECTIVE.captures_iter(html) {
            let Some(directive) = caps.get(0) else {
                continue;
            };
            out.push_str(&html[last..directive.start()]);
            last = directive.end();

            if self.substitutions >= self.budget {
                continue;
            }
            self.substitutions += 1;

            let Some((path, content)) = normalize_path(&caps[1])
                .and_then(|target| self.files.get_key_value(target.as_str()))
                .map(|(path, content)| (*path, *content))
            else {
                continue;
            };
            if chain.contains(&path) {
                continue;
            }

            chain.push(path);
            let resolved = self.expand(content, chain);
            chain.pop();
            out.push_str(&resolved);
        }

        out.push_str(&html[last..]);
        out
    }
}
