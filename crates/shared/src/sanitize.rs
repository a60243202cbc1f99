//! Sanitization helpers for filenames and archive entry names.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Runs of anything that is not a letter or digit collapse to one underscore.
    static ref NON_WORD_RUN: Regex = Regex::new(r"[^\p{L}\p{N}]+").unwrap();
}

/// Maximum length of a single sanitized component, in characters.
const MAX_COMPONENT_CHARS: usize = 40;

/// Placeholder used when sanitization leaves nothing usable.
const EMPTY_PLACEHOLDER: &str = "unnamed";

/// Sanitizes a free-form name (person, company) into a filename component.
///
/// Letters and digits are kept (including non-ASCII letters), everything
/// else collapses to a single underscore. The result is trimmed of leading
/// and trailing underscores and capped at 40 characters; an empty result
/// becomes `"unnamed"`.
pub fn sanitize_filename_component(input: &str) -> String {
    let replaced = NON_WORD_RUN.replace_all(input, "_");
    let trimmed = replaced.trim_matches('_');

    let capped: String = trimmed.chars().take(MAX_COMPONENT_CHARS).collect();
    let capped = capped.trim_matches('_').to_string();

    if capped.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        capped
    }
}
