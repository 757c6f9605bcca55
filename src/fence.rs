//! Fenced block extraction from raw model output.
//!
//! Models return a site as prose interleaved with fenced code blocks. Each
//! block's opening line carries a language tag and, optionally, the path the
//! block should be saved under:
//!
//! ````text
//! Here is your landing page:
//!
//! ```html:index.html
//! <!DOCTYPE html>
//! ...
//! ```
//!
//! ```css:styles.css
//! body { margin: 0; }
//! ```
//! ````
//!
//! ## Delimiters
//!
//! - An opening line starts with three backticks (leading indentation is
//!   tolerated). Whatever follows is the tag.
//! - A closing line is exactly three backticks, ignoring surrounding
//!   whitespace and a trailing `\r`.
//! - Nested fences are not supported: the first closing line ends the block.
//!
//! ## Tags
//!
//! | Opening line | Language | Path hint |
//! |--------------|----------|-----------|
//! | `` ```html:index.html `` | `html` | `index.html` |
//! | `` ```css `` | `css` | none |
//! | `` ```js app/main.js `` | `js` | `app/main.js` |
//! | `` ``` `` | empty | none |
//!
//! A whitespace-separated second token is only taken as a path when it
//! contains a `.`, so `` ```html example `` stays path-less.
//!
//! ## Unterminated blocks
//!
//! A block with no closing line extends to the end of the input. Responses
//! truncated by a token limit still yield their last file, and
//! [`Fence::terminated`] lets callers tell the two cases apart.

/// One fenced block, borrowing from the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence<'a> {
    /// Language tag as written (may be empty).
    pub language: &'a str,
    /// Path hint following the language tag, if any.
    pub path: Option<&'a str>,
    /// Text between the opening and closing lines, markers excluded.
    pub content: &'a str,
    /// False when the block ran to the end of the input.
    pub terminated: bool,
}

/// Lazily scan `text` for fenced blocks.
pub fn fences(text: &str) -> Fences<'_> {
    Fences { text, pos: 0 }
}

/// Iterator returned by [`fences`].
#[derive(Debug, Clone)]
pub struct Fences<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Fences<'a> {
    type Item = Fence<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        while self.pos < text.len() {
            let (line, after_opener) = line_at(text, self.pos);
            self.pos = after_opener;
            let Some(tag) = line.trim_start().strip_prefix("```") else {
                continue;
            };
            let (language, path) = parse_tag(tag);

            let mut cursor = after_opener;
            while cursor < text.len() {
                let (line, after) = line_at(text, cursor);
                if line.trim() == "```" {
                    self.pos = after;
                    return Some(Fence {
                        language,
                        path,
                        content: strip_line_ending(&text[after_opener..cursor]),
                        terminated: true,
                    });
                }
                cursor = after;
            }

            self.pos = text.len();
            return Some(Fence {
                language,
                path,
                content: strip_line_ending(&text[after_opener..]),
                terminated: false,
            });
        }
        None
    }
}

/// Returns the line starting at `start` (without its `\n`) and the offset of
/// the next line.
fn line_at(text: &str, start: usize) -> (&str, usize) {
    match text[start..].find('\n') {
        Some(i) => (&text[start..start + i], start + i + 1),
        None => (&text[start..], text.len()),
    }
}

fn strip_line_ending(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}

/// Split an opening-line tag into `(language, path hint)`.
fn parse_tag(tag: &str) -> (&str, Option<&str>) {
    let tag = tag.trim();
    if let Some((language, path)) = tag.split_once(':') {
        let path = path.trim();
        return (language.trim(), (!path.is_empty()).then_some(path));
    }
    let mut tokens = tag.split_whitespace();
    let language = tokens.next().unwrap_or("");
    let path = tokens.next().filter(|t| t.contains('.'));
    (language, path)
}
