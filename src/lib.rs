//! # Sitesmith
//!
//! Turns a language model's free-form answer to "build me a website" into a
//! project of typed files, and any page of that project into one
//! self-contained HTML document.
//!
//! # Architecture: Parse, Store, Assemble
//!
//! ```text
//! 1. Parse     raw text   →  ParsedOutput   (fenced blocks → typed files)
//! 2. Store     files      →  project store  (one directory per project)
//! 3. Assemble  project    →  HTML document  (includes, inlining, head tags)
//! ```
//!
//! Parsing and assembly are pure: same input, same output, no I/O, no
//! logging. Everything that touches the outside world (the model, the
//! filesystem) sits behind a trait at the edge, so the core is testable with
//! plain strings.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`fence`] | Lazy iterator over fenced code blocks in raw model text |
//! | [`classify`] | Fold that assigns each block a path, language and file type |
//! | [`parse`] | `parse_output`, store-writing variant, fallback page |
//! | [`include`] | Cycle-safe `<!-- include:path -->` expansion |
//! | [`assemble`] | Inlines styles/scripts, injects base-href, favicon and SEO tags |
//! | [`store`] | `ProjectStore` trait with filesystem and in-memory implementations |
//! | [`generate`] | `Generator` trait, generate→parse→save pipeline, parallel site build |
//! | [`config`] | `sitesmith.toml` loading, merging over stock defaults, validation |
//! | [`types`] | Shared types: `ProjectFile`, `Language`, `FileType`, `ParsedOutput` |
//! | [`naming`] | Path normalization, language tags, default file names |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Never Fail on Model Output
//!
//! Model output is untrusted and often sloppy: prose around the code, missing
//! closing fences, empty blocks, partials that were promised but never
//! emitted. None of that is an error. Parsing returns whatever files it can
//! recover, a missing partial renders as nothing, and a response with no
//! usable code gets a fallback page. The only hard failure in the core is
//! asking the assembler for a page that doesn't exist, because that is a
//! caller bug rather than a model quirk.
//!
//! ## First HTML Block Is the Page
//!
//! Models rarely say which HTML file is the entry point. The classifier
//! treats the first HTML block (and any block naming `index.html`) as the page and
//! every later HTML block as a partial. This misreads sites with several
//! top-level pages; such responses can tag blocks `page:about.html` or
//! `partial:nav.html` explicitly. See [`classify`].
//!
//! ## One Document Per Page
//!
//! Assembled pages inline every stylesheet and script instead of linking
//! them, and carry a `<base href="/results/<project>/">`. A page can then be
//! served from any route, or saved to disk, and still render. Inlined blocks
//! keep a `data-file` attribute naming their source file.
//!
//! ## Maud for Generated Markup
//!
//! Every tag the crate writes (the fallback page, base, favicon and meta
//! tags, style and script wrappers) is built with
//! [Maud](https://maud.lambda.xyz/), so interpolated text is escaped by
//! construction. Model-written HTML, CSS and JavaScript pass through
//! verbatim.
//!
//! ## Plain Files on Disk
//!
//! The filesystem store keeps each file's raw content as a real file next to
//! a small JSON index. A project directory can be inspected, diffed, or
//! served without the tool.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod fence;
pub mod generate;
pub mod include;
pub mod naming;
pub mod output;
pub mod parse;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
