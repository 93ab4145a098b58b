//! The classifier's input unit: documentation and code joined by a fixed
//! separator token.
//!
//! No escaping happens if the token occurs inside either part; the split is
//! first-occurrence and only used for reporting, so the ambiguity is
//! accepted.

use crate::core::CommentSample;

/// Separator the classifier was trained with.
pub const CODE_SEPARATOR: &str = "<CODESPLIT>";

/// Join a sample into the single string fed to the classifier.
pub fn format_sample(sample: &CommentSample) -> String {
    format!(
        "{}{CODE_SEPARATOR}{}",
        sample.documentation_text, sample.associated_code
    )
}

/// Inverse of [`format_sample`], splitting on the first separator
/// occurrence. Text without a separator comes back as documentation with
/// empty code.
pub fn split_formatted(formatted: &str) -> (&str, &str) {
    match formatted.split_once(CODE_SEPARATOR) {
        Some((doc, code)) => (doc, code),
        None => (formatted, ""),
    }
}
