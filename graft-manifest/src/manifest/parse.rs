//! Manifest parsing from files and strings.

use std::{collections::HashSet, path::Path, str::FromStr};

use super::Manifest;
use crate::{Error, Result, error::SourceContext, validate};

impl FromStr for Manifest {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_manifest(s, "graft.toml")
    }
}

impl Manifest {
    /// Parse a graft.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_manifest(&content, &path.display().to_string())
    }

    /// Parse a graft.toml from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        parse_manifest(content, filename)
    }
}

/// Parse a manifest from content with the given filename for error reporting.
pub fn parse_manifest(content: &str, filename: &str) -> Result<Manifest> {
    let source_ctx = SourceContext::new(content, filename);
    let manifest: Manifest = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    validate_manifest(&manifest, &source_ctx)?;
    Ok(manifest)
}

/// Validate the manifest after parsing.
fn validate_manifest(manifest: &Manifest, ctx: &SourceContext) -> Result<()> {
    if manifest.pipeline.name.trim().is_empty() {
        return Err(ctx.validation_error(
            "pipeline name must not be empty",
            validate::find_key_span(ctx.src(), "name"),
        ));
    }

    for feature in &manifest.pipeline.host_features {
        validate::validate_feature(ctx, feature, "host feature")?;
    }

    let mut seen: HashSet<&str> = HashSet::new();
    for editor in &manifest.editors {
        validate::validate_name(ctx, &editor.name, "editor")?;

        if editor.kind.trim().is_empty() {
            return Err(ctx.validation_error(
                format!("editor '{}' has an empty kind", editor.name),
                validate::find_name_span(ctx.src(), &editor.name, 0),
            ));
        }

        for feature in &editor.requires {
            validate::validate_feature(ctx, feature, "required feature")?;
        }

        if !seen.insert(editor.name.as_str()) {
            let first_span = validate::find_name_span(ctx.src(), &editor.name, 0);
            let second_span = validate::find_name_span(ctx.src(), &editor.name, 1);
            return Err(match (first_span, second_span) {
                (Some(first), Some(second)) => {
                    ctx.duplicate_editor_error(&editor.name, first, second)
                }
                _ => ctx.validation_error(format!("duplicate editor '{}'", editor.name), None),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let manifest: Manifest = r#"
            [pipeline]
            name = "demo"
        "#
        .parse()
        .expect("minimal manifest should parse");

        assert_eq!(manifest.pipeline.name, "demo");
        assert!(manifest.editors.is_empty());
        assert!(!manifest.pipeline.fail_on_warnings);
    }

    #[test]
    fn test_editors_keep_declaration_order() {
        let manifest: Manifest = r#"
            [pipeline]
            name = "demo"
            host_features = ["extended-symbol-info"]

            [[editor]]
            name = "strip"
            kind = "strip-calls"
            attribute = "Conditional"

            [[editor]]
            name = "defines"
            kind = "define-constants"
            order = -10
            enabled = false
        "#
        .parse()
        .expect("manifest should parse");

        let names: Vec<&str> = manifest.editors.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["strip", "defines"]);
        assert_eq!(manifest.enabled_editors().count(), 1);
        assert_eq!(manifest.editor("defines").map(|e| e.order), Some(-10));
        assert_eq!(manifest.pipeline.host_features, vec!["extended-symbol-info"]);
    }

    #[test]
    fn test_duplicate_editor_names() {
        let result: Result<Manifest> = r#"
            [pipeline]
            name = "demo"

            [[editor]]
            name = "strip"
            kind = "strip-calls"

            [[editor]]
            name = "strip"
            kind = "strip-calls"
        "#
        .parse();

        let err = result.expect_err("duplicate names should be rejected");
        assert!(matches!(*err, Error::DuplicateEditor { ref name, .. } if name == "strip"));
    }

    #[test]
    fn test_duplicate_editor_sharing_pipeline_name() {
        let src = r#"
            [pipeline]
            name = "strip"

            [[editor]]
            name = "strip"
            kind = "strip-calls"

            [[editor]]
            name = "strip"
            kind = "strip-calls"
        "#;
        let err = src
            .parse::<Manifest>()
            .expect_err("duplicate names should be rejected");

        let Error::DuplicateEditor {
            first_span,
            second_span,
            ..
        } = *err
        else {
            panic!("expected a duplicate editor error");
        };
        let pipeline = src.find("\"strip\"").unwrap() + 1;
        assert!(first_span.offset() > pipeline);
        assert!(second_span.offset() > first_span.offset());
    }

    #[test]
    fn test_invalid_editor_name() {
        let result: Result<Manifest> = r#"
            [pipeline]
            name = "demo"

            [[editor]]
            name = "9lives"
            kind = "strip-calls"
        "#
        .parse();

        let err = result.expect_err("names must start with a letter");
        assert!(matches!(*err, Error::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_empty_kind() {
        let result: Result<Manifest> = r#"
            [pipeline]
            name = "demo"

            [[editor]]
            name = "strip"
            kind = ""
        "#
        .parse();

        assert!(matches!(*result.expect_err("empty kind"), Error::Validation { .. }));
    }

    #[test]
    fn test_parse_error_has_span() {
        let result: Result<Manifest> = "[pipeline\nname = 1".parse();
        let err = result.expect_err("malformed toml");
        assert!(matches!(*err, Error::Parse { span: Some(_), .. }));
    }
}
