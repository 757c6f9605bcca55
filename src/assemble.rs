//! Page assembly: one project page in, one self-contained HTML document out.
//!
//! The model emits a site as separate files; a browser wants one document.
//! [`assemble`] bridges the two at request time:
//!
//! 1. Look up the requested page (a missing page is a caller bug and fails
//!    with [`AssembleError::PageNotFound`]).
//! 2. Resolve its `<!-- include:... -->` directives.
//! 3. Inline every `style` file into `<head>` and every `script` file before
//!    `</body>`, each tagged with `data-file="<path>"`.
//! 4. Inject `<base href="<prefix>/<project>/">` so relative asset links
//!    still resolve when the page is served from a sub-path.
//! 5. Inject favicon and SEO tags, per-page overrides first.
//!
//! ## Injection model
//!
//! Nothing is parsed into a DOM. The resolved page is scanned once for the
//! handful of landmarks that matter (`<html>`, `<head>`, `</head>`,
//! `<title>`, `</body>`), the injections are collected into ordered lists,
//! and a single splice pass writes the output. When a landmark is missing the
//! skeleton is completed instead:
//!
//! | Page has | Result |
//! |----------|--------|
//! | full document | injections spliced into the existing `<head>` / `</body>` |
//! | no `<html>` | `<html>` inserted after `<!DOCTYPE>` (or at the top), `</html>` appended |
//! | no `<head>` | `<head>` synthesized right after `<html>` |
//! | no `<body>` | `<body>` inserted right after the head |
//! | no `</body>` | scripts and `</body>` go before `</html>`, or at the end |
//! | bare fragment (no `<html>`, `<head>` or `<body>`) | wrapped in a full `<!DOCTYPE html>` skeleton |
//!
//! A synthesized head holds only the injections, so a page with a project
//! name and no styles gets exactly `<head><base href="..."></head>`. When an
//! SEO title is configured, a stray `<title>` before `<body>` moves into the
//! synthesized head instead of being duplicated.
//!
//! ## Escaping
//!
//! All injected markup is rendered with maud, so attribute values (paths,
//! project names, SEO text) are escaped. Inlined style and script bodies are
//! inserted verbatim; sanitizing generated CSS/JS is out of scope.

use crate::include::resolve_file_includes;
use crate::types::{FileType, ProjectFile};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssembleError {
    #[error("Page not found in file set: {0}")]
    PageNotFound(String),
}

/// Route prefix sites are served under unless configured otherwise.
pub const DEFAULT_ROUTE_PREFIX: &str = "/results";

// ============================================================================
// Metadata
// ============================================================================

/// SEO fields for a page. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeoMetadata {
    /// `<title>` and `og:title`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// `meta name="description"` and `og:description`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `meta name="keywords"`, joined with `, `.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    /// `og:image`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl SeoMetadata {
    /// Field-by-field merge: values set on `self` win, unset ones come from `base`.
    pub fn merged_over(&self, base: &SeoMetadata) -> SeoMetadata {
        SeoMetadata {
            title: self.title.clone().or_else(|| base.title.clone()),
            description: self.description.clone().or_else(|| base.description.clone()),
            keywords: if self.keywords.is_empty() {
                base.keywords.clone()
            } else {
                self.keywords.clone()
            },
            image: self.image.clone().or_else(|| base.image.clone()),
        }
    }
}

/// Site-level metadata injected into every assembled page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageMetadata {
    /// Favicon as a URL, path, or `data:` URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    /// Global SEO defaults.
    pub seo: SeoMetadata,
    /// Per-page overrides keyed by project path (e.g. `"about.html"`).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub pages: BTreeMap<String, SeoMetadata>,
}

impl PageMetadata {
    /// Effective SEO for a page: its override merged over the global defaults.
    pub fn seo_for(&self, page_path: &str) -> SeoMetadata {
        match self.pages.get(page_path) {
            Some(page) => page.merged_over(&self.seo),
            None => self.seo.clone(),
        }
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// Everything one render needs. Built per request, never persisted.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub page_path: &'a str,
    pub files: &'a [ProjectFile],
    pub project_name: Option<&'a str>,
    pub metadata: Option<&'a PageMetadata>,
    pub route_prefix: &'a str,
}

impl<'a> AssemblyContext<'a> {
    pub fn new(page_path: &'a str, files: &'a [ProjectFile]) -> Self {
        Self {
            page_path,
            files,
            project_name: None,
            metadata: None,
            route_prefix: DEFAULT_ROUTE_PREFIX,
        }
    }

    pub fn with_project(mut self, project_name: &'a str) -> Self {
        self.project_name = Some(project_name);
        self
    }

    pub fn with_metadata(mut self, metadata: &'a PageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_route_prefix(mut self, route_prefix: &'a str) -> Self {
        self.route_prefix = route_prefix;
        self
    }

    /// `<prefix>/<project>/`, if a project name is set.
    pub fn base_href(&self) -> Option<String> {
        self.project_name
            .map(|name| format!("{}/{}/", self.route_prefix.trim_end_matches('/'), name))
    }
}

/// Assemble the page at `ctx.page_path` into a self-contained HTML document.
pub fn assemble(ctx: &AssemblyContext<'_>) -> Result<String, AssembleError> {
    let page = ctx
        .files
        .iter()
        .find(|f| f.path == ctx.page_path)
        .ok_or_else(|| AssembleError::PageNotFound(ctx.page_path.to_string()))?;

    let resolved = resolve_file_includes(page, ctx.files);
    let injections = Injections::collect(ctx);
    Ok(injections.apply(&resolved))
}

/// Assemble every `page` file of a project in parallel. `ctx.page_path` is
/// ignored; results are `(path, html)` pairs in file order.
pub fn assemble_all(
    ctx: &AssemblyContext<'_>,
) -> Result<Vec<(String, String)>, AssembleError> {
    ctx.files
        .par_iter()
        .filter(|f| f.file_type == FileType::Page)
        .map(|f| -> Result<(String, String), AssembleError> {
            let html = assemble(&AssemblyContext {
                page_path: &f.path,
                ..*ctx
            })?;
            Ok((f.path.clone(), html))
        })
        .collect()
}

// ============================================================================
// Injection builder
// ============================================================================

static DOCTYPE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype\b[^>]*>").expect("valid pattern"));
static HTML_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html\b[^>]*>").expect("valid pattern"));
static HEAD_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head\b[^>]*>").expect("valid pattern"));
static HEAD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("valid pattern"));
static BODY_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<body\b[^>]*>").expect("valid pattern"));
static BODY_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").expect("valid pattern"));
static HTML_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</html\s*>").expect("valid pattern"));
static TITLE_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>.*?</title\s*>").expect("valid pattern"));

/// Markup to add to a page, grouped by where it goes.
#[derive(Debug, Default)]
struct Injections {
    /// Right after `<head>`: the base element must precede anything with a URL.
    head_start: Vec<String>,
    /// Replaces an existing `<title>`, or joins `head_end`.
    title: Option<String>,
    /// Right before `</head>`: favicon, SEO, styles.
    head_end: Vec<String>,
    /// Right before `</body>`: scripts.
    body_end: Vec<String>,
}

/// A replacement of `range` in the source with `text`. Empty ranges insert.
struct Splice {
    range: Range<usize>,
    text: String,
}

impl Splice {
    fn insert(at: usize, text: String) -> Self {
        Self { range: at..at, text }
    }
}

impl Injections {
    fn collect(ctx: &AssemblyContext<'_>) -> Self {
        let mut inj = Injections::default();

        if let Some(href) = ctx.base_href() {
            inj.head_start.push(html! { base href=(href); }.into_string());
        }

        if let Some(metadata) = ctx.metadata {
            if let Some(favicon) = &metadata.favicon {
                inj.head_end.push(favicon_link(favicon).into_string());
            }
            let seo = metadata.seo_for(ctx.page_path);
            if let Some(title) = &seo.title {
                inj.title = Some(html! { title { (title) } }.into_string());
            }
            inj.head_end.push(seo_tags(&seo).into_string());
        }

        for file in ctx.files.iter().filter(|f| f.file_type == FileType::Style) {
            inj.head_end.push(
                html! { style data-file=(file.path) { (PreEscaped(&file.content)) } }.into_string(),
            );
        }
        for file in ctx.files.iter().filter(|f| f.file_type == FileType::Script) {
            inj.body_end.push(
                html! { script data-file=(file.path) { (PreEscaped(&file.content)) } }
                    .into_string(),
            );
        }

        inj.head_end.retain(|s| !s.is_empty());
        inj
    }

    /// Write `html` with every injection in place, in one pass, completing
    /// any missing `<html>`, `<head>` or `<body>` element.
    fn apply(self, html: &str) -> String {
        let html_open = HTML_OPEN.find(html);
        let head_open = HEAD_OPEN.find(html);
        let body_open = BODY_OPEN.find(html);
        if html_open.is_none() && head_open.is_none() && body_open.is_none() {
            return self.wrap_fragment(html);
        }

        let mut splices = Vec::new();

        let doc_start = match html_open {
            Some(open) => open.end(),
            None => {
                let at = DOCTYPE_TAG.find(html).map(|m| m.end()).unwrap_or(0);
                splices.push(Splice::insert(at, "<html>".to_string()));
                at
            }
        };

        // Children of the head: the real one, or whatever precedes `<body>`
        // when the head is synthesized.
        let head_close = head_open.and_then(|open| HEAD_CLOSE.find_at(html, open.end()));
        let region_start = head_open.map(|m| m.end()).unwrap_or(doc_start);
        let region_end = match head_close {
            Some(close) => close.start(),
            None => body_open
                .map(|m| m.start())
                .filter(|&at| at >= region_start)
                .unwrap_or(region_start),
        };
        let existing_title = TITLE_ELEMENT
            .find_at(html, region_start)
            .filter(|m| m.end() <= region_end);

        let mut head_end = String::new();
        let mut title_splice = None;
        if let Some(title) = self.title {
            match existing_title {
                Some(existing) if head_open.is_some() => {
                    title_splice = Some(Splice {
                        range: existing.range(),
                        text: title,
                    });
                }
                stray => {
                    // A title outside any head moves into the synthesized one.
                    title_splice = stray.map(|m| Splice {
                        range: m.range(),
                        text: String::new(),
                    });
                    head_end.push_str(&title);
                }
            }
        }
        head_end.push_str(&self.head_end.concat());

        let after_head = match (head_open, head_close) {
            (Some(_), Some(close)) => {
                splices.push(Splice::insert(region_start, self.head_start.concat()));
                splices.extend(title_splice);
                splices.push(Splice::insert(region_end, head_end));
                close.end()
            }
            (Some(_), None) => {
                splices.push(Splice::insert(region_start, self.head_start.concat()));
                splices.extend(title_splice);
                splices.push(Splice::insert(region_end, head_end));
                splices.push(Splice::insert(region_end, "</head>".to_string()));
                region_end
            }
            (None, _) => {
                let head = format!("<head>{}{}</head>", self.head_start.concat(), head_end);
                splices.push(Splice::insert(doc_start, head));
                splices.extend(title_splice);
                doc_start
            }
        };

        if body_open.is_none() {
            splices.push(Splice::insert(after_head, "<body>".to_string()));
        }

        let body_close = BODY_CLOSE.find_iter(html).last();
        let html_close = HTML_CLOSE.find_iter(html).last();
        let body_end = body_close
            .or(html_close)
            .map(|m| m.start())
            .unwrap_or(html.len());
        splices.push(Splice::insert(body_end, self.body_end.concat()));
        if body_close.is_none() {
            splices.push(Splice::insert(body_end, "</body>".to_string()));
        }
        if html_close.is_none() {
            splices.push(Splice::insert(html.len(), "</html>".to_string()));
        }

        apply_splices(html, splices)
    }

    fn wrap_fragment(self, fragment: &str) -> String {
        format!(
            "{}<html><head>{}{}{}</head><body>{}{}</body></html>",
            html! { (DOCTYPE) }.into_string(),
            self.head_start.concat(),
            self.title.unwrap_or_default(),
            self.head_end.concat(),
            fragment,
            self.body_end.concat()
        )
    }
}

fn apply_splices(html: &str, mut splices: Vec<Splice>) -> String {
    // Stable: insertions at the same offset keep their push order.
    splices.sort_by_key(|s| s.range.start);
    let extra: usize = splices.iter().map(|s| s.text.len()).sum();
    let mut out = String::with_capacity(html.len() + extra);
    let mut cursor = 0;
    for splice in splices {
        let start = splice.range.start.max(cursor);
        out.push_str(&html[cursor..start]);
        out.push_str(&splice.text);
        cursor = splice.range.end.max(start);
    }
    out.push_str(&html[cursor..]);
    out
}

fn favicon_link(href: &str) -> Markup {
    html! { link rel="icon" type=[favicon_type(href)] href=(href); }
}

/// Media type for a favicon reference, from a `data:` URI or the extension.
fn favicon_type(href: &str) -> Option<&str> {
    if let Some(rest) = href.strip_prefix("data:") {
        return rest.split([';', ',']).next().filter(|m| !m.is_empty());
    }
    let ext = href.rsplit('.').next()?.split(['?', '#']).next()?;
    match ext.to_ascii_lowercase().as_str() {
        "ico" => Some("image/x-icon"),
        "png" => Some("image/png"),
        "svg" => Some("image/svg+xml"),
        "gif" => Some("image/gif"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn seo_tags(seo: &SeoMetadata) -> Markup {
    html! {
        @if let Some(description) = &seo.description {
            meta name="description" content=(description);
        }
        @if !seo.keywords.is_empty() {
            meta name="keywords" content=(seo.keywords.join(", "));
        }
        @if let Some(title) = &seo.title {
            meta property="og:title" content=(title);
        }
        @if let Some(description) = &seo.description {
            meta property="og:description" content=(description);
        }
        @if let Some(image) = &seo.image {
            meta property="og:image" content=(image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const FULL_PAGE: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n</head>\n<body>\n<h1>Hi</h1>\n</body>\n</html>\n";

    fn render(page_path: &str, files: &[ProjectFile]) -> String {
        assemble(&AssemblyContext::new(page_path, files)).unwrap()
    }

    #[test]
    fn missing_page_is_an_error() {
        let files = vec![page("index.html", FULL_PAGE)];
        let err = assemble(&AssemblyContext::new("about.html", &files)).unwrap_err();
        assert_eq!(err, AssembleError::PageNotFound("about.html".into()));
    }

    #[test]
    fn style_is_inlined_unmodified() {
        let files = vec![
            page("index.html", FULL_PAGE),
            style("styles.css", "body{color:red;}"),
        ];
        let out = render("index.html", &files);
        assert!(out.contains(r#"<style data-file="styles.css">body{color:red;}</style>"#));
    }

    #[test]
    fn styles_land_inside_head() {
        let files = vec![
            page("index.html", FULL_PAGE),
            style("a.css", "a{}"),
            style("b.css", "b{}"),
        ];
        let out = render("index.html", &files);
        let head_close = out.find("</head>").unwrap();
        let a = out.find(r#"data-file="a.css""#).unwrap();
        let b = out.find(r#"data-file="b.css""#).unwrap();
        assert!(a < b && b < head_close);
    }

    #[test]
    fn scripts_land_before_body_close() {
        let files = vec![
            page("index.html", FULL_PAGE),
            script("script.js", "console.log(1 < 2 && 3 > 2);"),
        ];
        let out = render("index.html", &files);
        let tag = r#"<script data-file="script.js">console.log(1 < 2 && 3 > 2);</script>"#;
        let script_at = out.find(tag).unwrap();
        assert!(script_at > out.find("<h1>Hi</h1>").unwrap());
        assert!(script_at < out.find("</body>").unwrap());
    }

    #[test]
    fn missing_body_is_completed() {
        let files = vec![
            page("index.html", "<html><head></head><p>x</p>"),
            script("script.js", "go()"),
        ];
        assert_eq!(
            render("index.html", &files),
            r#"<html><head></head><body><p>x</p><script data-file="script.js">go()</script></body></html>"#
        );
    }

    #[test]
    fn unclosed_body_is_closed_before_html_close() {
        let files = vec![
            page("index.html", "<html><head></head><body><p>x</p></html>"),
            script("script.js", "go()"),
        ];
        assert_eq!(
            render("index.html", &files),
            r#"<html><head></head><body><p>x</p><script data-file="script.js">go()</script></body></html>"#
        );
    }

    #[test]
    fn body_only_page_gets_html_and_head() {
        let files = vec![page("index.html", "<body>x</body>")];
        let ctx = AssemblyContext::new("index.html", &files).with_project("p");
        assert_eq!(
            assemble(&ctx).unwrap(),
            r#"<html><head><base href="/results/p/"></head><body>x</body></html>"#
        );
    }

    #[test]
    fn unclosed_head_is_closed() {
        let files = vec![page("index.html", "<html><head><meta charset=\"UTF-8\"><body>x</body></html>")];
        let ctx = AssemblyContext::new("index.html", &files).with_project("p");
        assert_eq!(
            assemble(&ctx).unwrap(),
            r#"<html><head><base href="/results/p/"><meta charset="UTF-8"></head><body>x</body></html>"#
        );
    }

    #[test]
    fn base_href_for_project() {
        let files = vec![page("index.html", FULL_PAGE)];
        let ctx = AssemblyContext::new("index.html", &files).with_project("my-project");
        let out = assemble(&ctx).unwrap();
        assert!(out.contains(r#"<base href="/results/my-project/">"#));
        // First thing in the head.
        assert!(out.contains("<head><base href=\"/results/my-project/\">"));
    }

    #[test]
    fn head_is_synthesized_with_only_the_base() {
        let files = vec![page("index.html", "<html><body><p>hi</p></body></html>")];
        let ctx = AssemblyContext::new("index.html", &files).with_project("my-project");
        let out = assemble(&ctx).unwrap();
        assert_eq!(
            out,
            r#"<html><head><base href="/results/my-project/"></head><body><p>hi</p></body></html>"#
        );
    }

    #[test]
    fn head_is_synthesized_after_doctype_without_html_tag() {
        let files = vec![page("index.html", "<!DOCTYPE html><body>x</body>")];
        let ctx = AssemblyContext::new("index.html", &files).with_project("p");
        assert_eq!(
            assemble(&ctx).unwrap(),
            r#"<!DOCTYPE html><html><head><base href="/results/p/"></head><body>x</body></html>"#
        );
    }

    #[test]
    fn fragment_is_wrapped_in_full_skeleton() {
        let files = vec![
            page("index.html", "<p>bare</p>"),
            style("styles.css", "p{}"),
            script("script.js", "go()"),
        ];
        let ctx = AssemblyContext::new("index.html", &files).with_project("p");
        assert_eq!(
            assemble(&ctx).unwrap(),
            concat!(
                "<!DOCTYPE html><html><head>",
                r#"<base href="/results/p/">"#,
                r#"<style data-file="styles.css">p{}</style>"#,
                "</head><body><p>bare</p>",
                r#"<script data-file="script.js">go()</script>"#,
                "</body></html>"
            )
        );
    }

    #[test]
    fn custom_route_prefix() {
        let files = vec![page("index.html", FULL_PAGE)];
        let ctx = AssemblyContext::new("index.html", &files)
            .with_project("demo")
            .with_route_prefix("/sites/");
        assert!(assemble(&ctx).unwrap().contains(r#"<base href="/sites/demo/">"#));
    }

    #[test]
    fn no_project_means_no_base() {
        let out = render("index.html", &[page("index.html", FULL_PAGE)]);
        assert!(!out.contains("<base"));
    }

    #[test]
    fn header_element_is_not_mistaken_for_head() {
        let files = vec![page(
            "index.html",
            "<html><body><header>Top</header></body></html>",
        )];
        let ctx = AssemblyContext::new("index.html", &files).with_project("p");
        let out = assemble(&ctx).unwrap();
        assert!(out.starts_with(r#"<html><head><base href="/results/p/"></head><body><header>"#));
    }

    #[test]
    fn uppercase_landmarks_are_found() {
        let files = vec![
            page("index.html", "<HTML><HEAD></HEAD><BODY>x</BODY></HTML>"),
            script("s.js", "go()"),
        ];
        let out = render("index.html", &files);
        assert_eq!(
            out,
            r#"<HTML><HEAD></HEAD><BODY>x<script data-file="s.js">go()</script></BODY></HTML>"#
        );
    }

    #[test]
    fn includes_are_resolved() {
        let files = vec![
            page(
                "index.html",
                "<html><head></head><body><!-- include:partials/header.html --><main></main></body></html>",
            ),
            partial("partials/header.html", "<header>My Header</header>"),
        ];
        let out = render("index.html", &files);
        assert!(out.contains("<body><header>My Header</header><main></main></body>"));
        assert!(!out.contains("include:"));
    }

    #[test]
    fn missing_include_renders_empty() {
        let files = vec![page(
            "index.html",
            "<html><head></head><body><!-- include:nav.html --><p>ok</p></body></html>",
        )];
        assert!(render("index.html", &files).contains("<body><p>ok</p></body>"));
    }

    #[test]
    fn partial_styles_and_scripts_apply_to_every_page() {
        let files = vec![
            page("index.html", FULL_PAGE),
            page("about.html", FULL_PAGE),
            style("styles.css", "x{}"),
        ];
        assert!(render("about.html", &files).contains(r#"data-file="styles.css""#));
    }

    #[test]
    fn favicon_and_seo_tags() {
        let files = vec![page("index.html", FULL_PAGE)];
        let metadata = PageMetadata {
            favicon: Some("favicon.png".into()),
            seo: SeoMetadata {
                title: Some("Bakery".into()),
                description: Some("Fresh \"bread\" & <cakes>".into()),
                keywords: vec!["bread".into(), "cake".into()],
                image: Some("https://example.com/og.png".into()),
            },
            pages: BTreeMap::new(),
        };
        let ctx = AssemblyContext::new("index.html", &files).with_metadata(&metadata);
        let out = assemble(&ctx).unwrap();

        assert!(out.contains(r#"<link rel="icon" type="image/png" href="favicon.png">"#));
        assert!(out.contains("<title>Bakery</title>"));
        assert!(out.contains(
            r#"<meta name="description" content="Fresh &quot;bread&quot; &amp; &lt;cakes&gt;">"#
        ));
        assert!(out.contains(r#"<meta name="keywords" content="bread, cake">"#));
        assert!(out.contains(r#"<meta property="og:title" content="Bakery">"#));
        assert!(out.contains(r#"<meta property="og:image" content="https://example.com/og.png">"#));
        assert!(out.find("<title>").unwrap() < out.find("</head>").unwrap());
    }

    #[test]
    fn seo_title_replaces_existing_title() {
        let files = vec![page(
            "index.html",
            "<html><head><title>Old</title></head><body></body></html>",
        )];
        let metadata = PageMetadata {
            seo: SeoMetadata {
                title: Some("New".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let ctx = AssemblyContext::new("index.html", &files).with_metadata(&metadata);
        let out = assemble(&ctx).unwrap();
        assert!(out.contains("<title>New</title>"));
        assert!(!out.contains("Old"));
        assert_eq!(out.matches("<title>").count(), 1);
    }

    #[test]
    fn stray_title_moves_into_synthesized_head() {
        let files = vec![page(
            "index.html",
            "<html><title>Old</title><body>x</body></html>",
        )];
        let metadata = PageMetadata {
            seo: SeoMetadata {
                title: Some("New".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let ctx = AssemblyContext::new("index.html", &files).with_metadata(&metadata);
        assert_eq!(
            assemble(&ctx).unwrap(),
            concat!(
                "<html><head><title>New</title>",
                r#"<meta property="og:title" content="New">"#,
                "</head><body>x</body></html>"
            )
        );
    }

    #[test]
    fn stray_title_is_kept_without_seo_title() {
        let files = vec![page(
            "index.html",
            "<html><title>Old</title><body>x</body></html>",
        )];
        let ctx = AssemblyContext::new("index.html", &files).with_project("p");
        assert_eq!(
            assemble(&ctx).unwrap(),
            r#"<html><head><base href="/results/p/"></head><title>Old</title><body>x</body></html>"#
        );
    }

    #[test]
    fn title_in_body_svg_is_left_alone() {
        let files = vec![page(
            "index.html",
            "<html><head></head><body><svg><title>Icon</title></svg></body></html>",
        )];
        let metadata = PageMetadata {
            seo: SeoMetadata {
                title: Some("Page".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let ctx = AssemblyContext::new("index.html", &files).with_metadata(&metadata);
        let out = assemble(&ctx).unwrap();
        assert!(out.contains("<svg><title>Icon</title></svg>"));
        assert!(out.contains("<head><title>Page</title>"));
    }

    #[test]
    fn per_page_seo_overrides_global() {
        let files = vec![page("index.html", FULL_PAGE), page("about.html", FULL_PAGE)];
        let mut pages = BTreeMap::new();
        pages.insert(
            "about.html".to_string(),
            SeoMetadata {
                title: Some("About us".into()),
                ..Default::default()
            },
        );
        let metadata = PageMetadata {
            favicon: None,
            seo: SeoMetadata {
                title: Some("Home".into()),
                description: Some("Shared description".into()),
                ..Default::default()
            },
            pages,
        };

        let about = assemble(&AssemblyContext::new("about.html", &files).with_metadata(&metadata))
            .unwrap();
        assert!(about.contains("<title>About us</title>"));
        assert!(about.contains(r#"content="Shared description""#));

        let home = assemble(&AssemblyContext::new("index.html", &files).with_metadata(&metadata))
            .unwrap();
        assert!(home.contains("<title>Home</title>"));
    }

    #[test]
    fn empty_metadata_injects_nothing() {
        let files = vec![page("index.html", FULL_PAGE)];
        let metadata = PageMetadata::default();
        let ctx = AssemblyContext::new("index.html", &files).with_metadata(&metadata);
        assert_eq!(assemble(&ctx).unwrap(), FULL_PAGE);
    }

    #[test]
    fn assembly_is_deterministic() {
        let files = vec![
            page("index.html", FULL_PAGE),
            style("styles.css", "a{}"),
            script("script.js", "b()"),
        ];
        let ctx = AssemblyContext::new("index.html", &files).with_project("p");
        assert_eq!(assemble(&ctx).unwrap(), assemble(&ctx).unwrap());
    }

    #[test]
    fn assemble_all_renders_only_pages() {
        let files = vec![
            page("index.html", FULL_PAGE),
            partial("header.html", "<header></header>"),
            page("about.html", FULL_PAGE),
            style("styles.css", "a{}"),
        ];
        let rendered = assemble_all(&AssemblyContext::new("", &files)).unwrap();
        let paths: Vec<&str> = rendered.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["index.html", "about.html"]);
    }

    #[test]
    fn favicon_types() {
        assert_eq!(favicon_type("data:image/svg+xml,<svg/>"), Some("image/svg+xml"));
        assert_eq!(favicon_type("data:image/png;base64,AAAA"), Some("image/png"));
        assert_eq!(favicon_type("/favicon.ico?v=2"), Some("image/x-icon"));
        assert_eq!(favicon_type("icon.SVG"), Some("image/svg+xml"));
        assert_eq!(favicon_type("icon"), None);
        assert_eq!(favicon_type("data:,"), None);
    }

    #[test]
    fn seo_merge_is_field_by_field() {
        let base = SeoMetadata {
            title: Some("Base".into()),
            description: Some("Base desc".into()),
            keywords: vec!["a".into()],
            image: None,
        };
        let page = SeoMetadata {
            description: Some("Page desc".into()),
            ..Default::default()
        };
        let merged = page.merged_over(&base);
        assert_eq!(merged.title.as_deref(), Some("Base"));
        assert_eq!(merged.description.as_deref(), Some("Page desc"));
        assert_eq!(merged.keywords, vec!["a".to_string()]);
    }
}
