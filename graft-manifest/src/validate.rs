//! Validation utilities for manifest names.

use miette::SourceSpan;

use crate::{Result, SourceContext};

/// Validate that a name is a valid editor identifier.
pub(crate) fn validate_name(ctx: &SourceContext, name: &str, context: &str) -> Result<()> {
    if let Some(reason) = validate_identifier(name) {
        return Err(ctx.invalid_identifier_error(
            name,
            context,
            reason,
            find_name_span(ctx.src(), name, 0),
        ));
    }
    Ok(())
}

/// Validate a feature name (same rules as identifiers).
pub(crate) fn validate_feature(ctx: &SourceContext, feature: &str, context: &str) -> Result<()> {
    if let Some(reason) = validate_identifier(feature) {
        let span = find_quoted_span(ctx.src(), feature);
        return Err(ctx.invalid_identifier_error(feature, context, reason, span));
    }
    Ok(())
}

/// Validate that a name is a dashed identifier.
/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_identifier(name: &str) -> Option<&'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Some("name cannot be empty"),
        Some(c) if !c.is_ascii_alphabetic() => {
            return Some("name must start with a letter");
        }
        _ => {}
    }

    if name.ends_with('-') || name.ends_with('_') {
        return Some("name cannot end with a dash or underscore");
    }

    if chars.any(|c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_')) {
        return Some("name contains invalid characters");
    }

    None
}

/// Find the span of the n-th `name = "<value>"` occurrence in the TOML source,
/// starting at the first `[[editor]]` table.
pub(crate) fn find_name_span(src: &str, name: &str, occurrence: usize) -> Option<SourceSpan> {
    let offset = src.find("[[editor]]").unwrap_or(0);
    for quote in ['"', '\''] {
        let pattern = format!("name = {quote}{name}{quote}");
        if let Some((pos, _)) = src[offset..].match_indices(&pattern).nth(occurrence) {
            // The value starts after 'name = "' (8 characters)
            let start = offset + pos + 8;
            return Some(SourceSpan::from((start, name.len())));
        }
    }
    None
}

/// Find the span of a `key =` assignment.
pub(crate) fn find_key_span(src: &str, key: &str) -> Option<SourceSpan> {
    let pattern = format!("{} =", key);
    src.find(&pattern)
        .map(|pos| SourceSpan::from((pos, key.len())))
}

/// Find the span of a quoted string value.
fn find_quoted_span(src: &str, value: &str) -> Option<SourceSpan> {
    let pattern = format!("\"{}\"", value);
    src.find(&pattern)
        .map(|pos| SourceSpan::from((pos + 1, value.len())))
}
