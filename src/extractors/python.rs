//! Docstring extraction for Python sources.
//!
//! Only structured documentation strings attached to a definable unit are
//! sampled; plain `#` comments have no reliable doc+implementation pairing
//! and are excluded.

use crate::core::{CommentSample, Language};
use crate::errors::DocscoreError;
use crate::extractors::{Extraction, Extractor};
use anyhow::{Context, Result};
use tree_sitter::{Node, Parser};

/// How many lines of the file stand in for "the module" when the module
/// itself carries a docstring.
const MODULE_PREFIX_LINES: usize = 50;

/// Window used when a definition's end cannot be determined from the tree.
const DEFINITION_FALLBACK_LINES: usize = 10;

pub struct PythonExtractor;

impl PythonExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PythonExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for PythonExtractor {
    fn extract(&self, content: &str) -> Result<Extraction> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .context("Failed to set Python language")?;
        let tree = parser
            .parse(content, None)
            .ok_or_else(|| DocscoreError::parse("Python parse produced no tree"))?;
        let root = tree.root_node();

        let lines: Vec<&str> = content.lines().collect();
        let mut extraction = Extraction::default();

        if let Some(doc) = module_docstring(root, content) {
            extraction.samples.push(CommentSample {
                documentation_text: doc,
                associated_code: module_prefix(&lines),
                language: Language::Python,
            });
        }

        visit(root, content, &lines, &mut extraction);
        Ok(extraction)
    }

    fn language(&self) -> Language {
        Language::Python
    }
}

/// Walk the whole tree, counting every function and class definition
/// (nested ones included) and sampling the documented ones.
fn visit(node: Node, content: &str, lines: &[&str], extraction: &mut Extraction) {
    if matches!(node.kind(), "function_definition" | "class_definition") {
        extraction.declaration_count += 1;

        if let Some(doc) = definition_docstring(node, content) {
            let start = node.start_position().row;
            let end = definition_end_row(node);
            extraction.samples.push(CommentSample {
                documentation_text: doc,
                associated_code: slice_lines(lines, start, end),
                language: Language::Python,
            });
        }
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        visit(child, content, lines, extraction);
    }
}

/// Docstring of a function or class: the first statement of its body must
/// be a bare string expression.
fn definition_docstring(node: Node, content: &str) -> Option<String> {
    let body = node.child_by_field_name("body")?;
    first_statement_string(body, content)
}

/// Docstring of the module itself, when the file opens with a bare string.
fn module_docstring(root: Node, content: &str) -> Option<String> {
    if root.kind() != "module" {
        return None;
    }
    first_statement_string(root, content)
}

fn first_statement_string(block: Node, content: &str) -> Option<String> {
    // Comments are named nodes in the grammar but not statements; a
    // shebang or leading comment must not hide the docstring.
    let mut cursor = block.walk();
    let first = block
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let expr = first.named_child(0)?;
    if expr.kind() != "string" {
        return None;
    }
    let raw = expr.utf8_text(content.as_bytes()).ok()?;
    let text = string_literal_content(raw)?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Strip prefix letters and quote delimiters from a Python string literal,
/// returning the raw content.
fn string_literal_content(raw: &str) -> Option<&str> {
    let stripped =
        raw.trim_start_matches(|c: char| matches!(c, 'r' | 'R' | 'b' | 'B' | 'u' | 'U' | 'f' | 'F'));

    for quote in ["\"\"\"", "'''"] {
        if stripped.len() >= 6 && stripped.starts_with(quote) && stripped.ends_with(quote) {
            return Some(&stripped[3..stripped.len() - 3]);
        }
    }
    for quote in ['"', '\''] {
        if stripped.len() >= 2 && stripped.starts_with(quote) && stripped.ends_with(quote) {
            return Some(&stripped[1..stripped.len() - 1]);
        }
    }
    None
}

/// Last line of a definition. Preference order: the node's own end
/// position, the end of the last statement in its body, a fixed window
/// past the signature.
fn definition_end_row(node: Node) -> usize {
    let start = node.start_position().row;
    let end = node.end_position().row;
    if end >= start {
        return end;
    }

    node.child_by_field_name("body")
        .and_then(|body| {
            let count = body.named_child_count();
            if count > 0 {
                body.named_child(count - 1)
            } else {
                None
            }
        })
        .map(|last| last.end_position().row)
        .filter(|&row| row >= start)
        .unwrap_or(start + DEFINITION_FALLBACK_LINES)
}

fn slice_lines(lines: &[&str], start: usize, end: usize) -> String {
    if lines.is_empty() || start >= lines.len() {
        return String::new();
    }
    let end = end.min(lines.len() - 1);
    lines[start..=end].join("\n").trim().to_string()
}

fn module_prefix(lines: &[&str]) -> String {
    let end = lines.len().min(MODULE_PREFIX_LINES);
    lines[..end].join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn extract(content: &str) -> Extraction {
        PythonExtractor::new().extract(content).unwrap()
    }

    #[test]
    fn test_simple_function_docstring() {
        let extraction = extract("def f():\n    \"\"\"doc\"\"\"\n    return 1\n");
        assert_eq!(extraction.declaration_count, 1);
        assert_eq!(extraction.samples.len(), 1);
        let sample = &extraction.samples[0];
        assert_eq!(sample.documentation_text, "doc");
        assert_eq!(sample.associated_code, "def f():\n    \"\"\"doc\"\"\"\n    return 1");
        assert_eq!(sample.language, Language::Python);
    }

    #[test]
    fn test_undocumented_function_counted_but_not_sampled() {
        let extraction = extract("def f():\n    return 1\n");
        assert_eq!(extraction.declaration_count, 1);
        assert!(extraction.samples.is_empty());
    }

    #[test]
    fn test_nested_definitions_counted() {
        let source = indoc! {r#"
            class Outer:
                """A class."""

                def method(self):
                    """A method."""
                    def inner():
                        return 2
                    return inner()

            async def fetch():
                """Fetch things."""
                return await thing()
        "#};
        let extraction = extract(source);
        // Outer, method, inner, fetch
        assert_eq!(extraction.declaration_count, 4);
        assert_eq!(extraction.samples.len(), 3);
    }

    #[test]
    fn test_class_docstring_spans_whole_class() {
        let source = indoc! {r#"
            class Greeter:
                """Says hello."""

                def greet(self):
                    return "hello"
        "#};
        let extraction = extract(source);
        let class_sample = &extraction.samples[0];
        assert_eq!(class_sample.documentation_text, "Says hello.");
        assert!(class_sample.associated_code.starts_with("class Greeter:"));
        assert!(class_sample.associated_code.contains("def greet"));
    }

    #[test]
    fn test_module_docstring_uses_bounded_prefix() {
        let mut source = String::from("\"\"\"Module help.\"\"\"\n");
        for i in 0..80 {
            source.push_str(&format!("x{i} = {i}\n"));
        }
        let extraction = extract(&source);
        assert_eq!(extraction.samples.len(), 1);
        let sample = &extraction.samples[0];
        assert_eq!(sample.documentation_text, "Module help.");
        assert!(sample.associated_code.lines().count() <= MODULE_PREFIX_LINES);
        // Module docstrings do not inflate the declaration count.
        assert_eq!(extraction.declaration_count, 0);
    }

    #[test]
    fn test_single_quoted_docstring() {
        let extraction = extract("def f():\n    'short doc'\n    return 1\n");
        assert_eq!(extraction.samples.len(), 1);
        assert_eq!(extraction.samples[0].documentation_text, "short doc");
    }

    #[test]
    fn test_raw_prefix_docstring() {
        let extraction = extract("def f():\n    r\"\"\"raw doc\"\"\"\n    return 1\n");
        assert_eq!(extraction.samples.len(), 1);
        assert_eq!(extraction.samples[0].documentation_text, "raw doc");
    }

    #[test]
    fn test_inline_comments_ignored() {
        let source = indoc! {r#"
            # setup constants
            X = 1  # inline note

            def f():
                # not a docstring
                return X
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.declaration_count, 1);
        assert!(extraction.samples.is_empty());
    }

    #[test]
    fn test_string_literal_content_variants() {
        assert_eq!(string_literal_content(r#""""abc""""#), Some("abc"));
        assert_eq!(string_literal_content("'''abc'''"), Some("abc"));
        assert_eq!(string_literal_content(r#""abc""#), Some("abc"));
        assert_eq!(string_literal_content("'abc'"), Some("abc"));
        assert_eq!(string_literal_content(r#"rb"abc""#), Some("abc"));
        assert_eq!(string_literal_content("abc"), None);
    }

    #[test]
    fn test_module_docstring_after_shebang() {
        let source = "#!/usr/bin/env python\n\"\"\"CLI entry point.\"\"\"\nx = 1\n";
        let extraction = extract(source);
        assert_eq!(extraction.samples.len(), 1);
        assert_eq!(extraction.samples[0].documentation_text, "CLI entry point.");
    }

    #[test]
    fn test_decorated_function_docstring() {
        let source = indoc! {r#"
            @cached
            def f():
                """Cached helper."""
                return 1
        "#};
        let extraction = extract(source);
        assert_eq!(extraction.declaration_count, 1);
        assert_eq!(extraction.samples.len(), 1);
        // The sample starts at the def line, not the decorator.
        assert!(extraction.samples[0].associated_code.starts_with("def f():"));
    }
}
