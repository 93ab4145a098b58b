//! JSDoc extraction for the JavaScript/TypeScript family.
//!
//! No real parser here: declaration counting is regex-based and block
//! capture is a brace scan. The three counting patterns are unioned
//! without deduplication, which double-counts some constructs; that
//! imprecision is part of the scoring contract, not a bug to fix in
//! isolation.

pub mod scanner;

use crate::core::{CommentSample, Language};
use crate::extractors::{Extraction, Extractor};
use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use scanner::{find_block_end, BlockEnd};

/// Bytes captured past the declaration when no block brace exists.
const DEFAULT_SPAN_BYTES: usize = 100;

/// Shortest JSDoc body worth scoring, after trimming.
const MIN_DOC_CHARS: usize = 3;

// Function declarations: function name() with optional export/async
static FUNCTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^|\s)(?:export\s+)?(?:async\s+)?function\s+\w+").unwrap());

// Arrow functions assigned to const/let/var: const name = () =>
static ARROW_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:const|let|var)\s+\w+\s*=\s*(?:async\s+)?\([^)]*\)\s*=>").unwrap());

// Class declarations: class Name with optional export
static CLASS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(?:^|\s)(?:export\s+)?class\s+\w+").unwrap());

// JSDoc block immediately followed by a declaration keyword and name
static JSDOC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)/\*\*(.+?)\*/\s*(?:export\s+)?(?:async\s+)?(function|class|const|let|var)\s+(\w+)",
    )
    .unwrap()
});

pub struct JavaScriptExtractor;

impl JavaScriptExtractor {
    pub fn new() -> Self {
        Self
    }

    fn count_declarations(&self, content: &str) -> usize {
        FUNCTION_PATTERN.find_iter(content).count()
            + ARROW_PATTERN.find_iter(content).count()
            + CLASS_PATTERN.find_iter(content).count()
    }
}

impl Default for JavaScriptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for JavaScriptExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let lines: Vec<&str> = content.lines().collect();
        let mut samples = Vec::new();

        for caps in JSDOC_PATTERN.captures_iter(content) {
            let doc = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
            if doc.chars().count() < MIN_DOC_CHARS {
                continue;
            }

            // The declaration starts at the keyword following the comment.
            let decl_start = caps.get(2).map(|m| m.start()).unwrap_or(caps.get(0).unwrap().start());
            let span_end = match find_block_end(content, decl_start) {
                BlockEnd::Closed(end) => end,
                BlockEnd::NoBrace => default_span_end(content, decl_start),
                BlockEnd::Unterminated => content.len(),
            };

            let code = slice_line_span(content, &lines, decl_start, span_end);
            if code.is_empty() {
                continue;
            }

            samples.push(CommentSample {
                documentation_text: doc.to_string(),
                associated_code: code,
                language: Language::JavaScript,
            });
        }

        Ok(Extraction {
            samples,
            declaration_count: self.count_declarations(content),
        })
    }

    fn language(&self) -> Language {
        Language::JavaScript
    }
}

fn default_span_end(content: &str, from: usize) -> usize {
    let mut end = (from + DEFAULT_SPAN_BYTES).min(content.len());
    while end > from && !content.is_char_boundary(end) {
        end -= 1;
    }
    end
}

/// Expand a byte span to whole lines and return the covered source text.
fn slice_line_span(content: &str, lines: &[&str], start_byte: usize, end_byte: usize) -> String {
    if lines.is_empty() || end_byte <= start_byte {
        return String::new();
    }
    let start_line = line_of(content, start_byte);
    let end_line = line_of(content, end_byte.saturating_sub(1)).min(lines.len() - 1);
    lines[start_line..=end_line].join("\n").trim().to_string()
}

fn line_of(content: &str, byte: usize) -> usize {
    content.as_bytes()[..byte.min(content.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn extract(content: &str) -> Extraction {
        JavaScriptExtractor::new().extract(content).unwrap()
    }

    #[test]
    fn test_jsdoc_function_sample() {
        let source = "/** Adds two numbers */\nfunction add(a, b) { return a + b; }\n";
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        let sample = &extraction.samples[0];
        assert_eq!(sample.documentation_text, "Adds two numbers");
        assert_eq!(
            sample.associated_code,
            "function add(a, b) { return a + b; }"
        );
        assert_eq!(sample.language, Language::JavaScript);
    }

    #[test]
    fn test_brace_inside_string_does_not_truncate() {
        let source = indoc! {r#"
            /** Returns an opening brace */
            function brace() {
                return "{";
            }
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        assert!(extraction.samples[0].associated_code.ends_with('}'));
        assert!(extraction.samples[0].associated_code.contains(r#"return "{";"#));
    }

    #[test]
    fn test_multiline_jsdoc_class() {
        let source = indoc! {r#"
            /**
             * Tracks a user session.
             */
            export class Session {
                constructor(id) {
                    this.id = id;
                }
            }
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        let sample = &extraction.samples[0];
        assert!(sample.documentation_text.contains("Tracks a user session."));
        assert!(sample.associated_code.starts_with("export class Session"));
        assert!(sample.associated_code.ends_with('}'));
    }

    #[test]
    fn test_short_comment_discarded() {
        let source = "/** ok */\nfunction f() { return 1; }\n";
        let extraction = extract(source);
        assert!(extraction.samples.is_empty());
        assert_eq!(extraction.declaration_count, 1);
    }

    #[test]
    fn test_arrow_function_sample() {
        let source = indoc! {r#"
            /** Doubles the input value */
            const double = (x) => {
                return x * 2;
            };
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        assert!(extraction.samples[0].associated_code.starts_with("const double"));
    }

    #[test]
    fn test_plain_block_comment_not_sampled() {
        let source = "/* Not a JSDoc comment */\nfunction f() { return 1; }\n";
        let extraction = extract(source);
        assert!(extraction.samples.is_empty());
    }

    #[test]
    fn test_count_all_three_families() {
        let source = indoc! {r#"
            export function a() {}
            async function b() {}
            const c = async (x) => x;
            let d = () => 0;
            class E {}
            export class F {}
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.declaration_count, 6);
    }

    #[test]
    fn test_unterminated_block_takes_rest_of_file() {
        let source = "/** Never closed properly */\nfunction f() {\n  return 1;\n";
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        assert!(extraction.samples[0].associated_code.contains("return 1;"));
    }

    #[test]
    fn test_jsdoc_inside_code_comment_scan() {
        // A line comment containing a brace between the JSDoc and the
        // close must not end the block early.
        let source = indoc! {r#"
            /** Uses a commented brace */
            function g() {
                // weird }
                return 2;
            }
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        assert!(extraction.samples[0].associated_code.ends_with('}'));
    }

    #[test]
    fn test_typescript_source_works_the_same() {
        let source = indoc! {r#"
            /** Formats a label for display */
            export function formatLabel(label: string): string {
                return label.trim();
            }
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        assert_eq!(
            extraction.samples[0].documentation_text,
            "Formats a label for display"
        );
    }
}
