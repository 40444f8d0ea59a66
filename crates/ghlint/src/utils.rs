//! Helper routines.

use std::collections::VecDeque;
use std::fmt::Write;
use std::ops::Range;
use std::sync::LazyLock;

use anyhow::{Context as _, Error, anyhow};
use jsonschema::{
    BasicOutput::{Invalid, Valid},
    Validator,
    output::{ErrorDescription, OutputUnit},
    validator_for,
};

use crate::models::InputError;

#[allow(clippy::unwrap_used)]
pub(crate) static WORKFLOW_VALIDATOR: LazyLock<Validator> = LazyLock::new(|| {
    validator_for(&serde_json::from_str(include_str!("./data/github-workflow.json")).unwrap())
        .unwrap()
});

fn parse_validation_errors(errors: VecDeque<OutputUnit<ErrorDescription>>) -> Error {
    let mut message = String::new();

    for error in errors {
        let description = error.error_description().to_string();
        // Unmatched `oneOf`s describe themselves as a JSON blob of every
        // branch, which isn't useful to a reader.
        if description.starts_with('{') {
            continue;
        }

        let location = error.instance_location().as_str();
        if location.is_empty() {
            let _ = writeln!(message, "{description}");
        } else {
            // `/jobs/test/steps/0` becomes `jobs.test.steps.0`.
            let dotted_location = location[1..].replace('/', ".");
            let _ = writeln!(message, "{dotted_location}: {description}");
        }
    }

    anyhow!(message)
}

/// Like `serde_yaml::from_str`, but with a JSON schema validator
/// and an error type that distinguishes between syntax, schema and
/// model errors.
///
/// The document is first parsed as a plain YAML value, which also rejects
/// duplicate mapping keys; the model types use ordered maps that would
/// otherwise keep the last duplicate silently.
pub(crate) fn from_str_with_validation<T>(
    contents: &str,
    validator: &'static Validator,
) -> Result<T, InputError>
where
    T: serde::de::DeserializeOwned,
{
    let raw_value = serde_yaml::from_str::<serde_yaml::Value>(contents)
        .map_err(|e| InputError::Syntax(e.into()))?;

    let instance = serde_json::to_value(&raw_value)
        .context("document can't be represented as JSON")
        .map_err(InputError::Schema)?;

    match validator.apply(&instance).basic() {
        Valid(_) => serde_yaml::from_str(contents)
            .context("this suggests a bug in ghlint; please report it!")
            .map_err(InputError::Model),
        Invalid(errors) => Err(InputError::Schema(parse_validation_errors(errors))),
    }
}

/// Finds the next `${{ ... }}` expression in `text` at or after `offset`,
/// returning its span. Braces inside single-quoted strings don't
/// terminate the expression.
fn extract_expression(text: &str, offset: usize) -> Option<Range<usize>> {
    let view = &text[offset..];
    let start = view.find("${{")?;

    let bytes = view.as_bytes();
    let mut in_string = false;

    // Skip the opening fence itself, so `${{}}` still needs a closing pair.
    for (idx, byte) in bytes.iter().enumerate().skip(start + 3) {
        match *byte {
            b'\'' => in_string = !in_string,
            b'}' if !in_string && bytes[idx - 1] == b'}' && idx > start + 3 => {
                return Some(start + offset..idx + offset + 1);
            }
            _ => {}
        }
    }

    None
}

/// Extract zero or more fenced expressions from the given free-form text.
pub(crate) fn extract_expressions(text: &str) -> Vec<&str> {
    let mut exprs = vec![];
    let mut offset = 0;

    while let Some(span) = extract_expression(text, offset) {
        offset = span.end;
        exprs.push(&text[span]);

        if offset >= text.len() {
            break;
        }
    }

    exprs
}

/// Whether `text` contains at least one complete `${{ ... }}` expression.
pub fn contains_expression(text: &str) -> bool {
    !extract_expressions(text).is_empty()
}

#[cfg(test)]
mod tests {
    use super::{WORKFLOW_VALIDATOR, contains_expression, extract_expressions};

    #[test]
    fn test_extract_expressions() {
        let exprs = extract_expressions("echo ${{ github.sha }} and ${{ inputs.name }}");
        assert_eq!(exprs, ["${{ github.sha }}", "${{ inputs.name }}"]);

        // Braces inside string literals don't end the expression.
        let exprs = extract_expressions("${{ format('}}', 1) }}");
        assert_eq!(exprs, ["${{ format('}}', 1) }}"]);

        assert_eq!(extract_expressions("${{}}"), ["${{}}"]);
        assert!(extract_expressions("no expressions here").is_empty());
        assert!(extract_expressions("${{ unterminated").is_empty());
        assert!(extract_expressions("${ { not.one } }").is_empty());
    }

    #[test]
    fn test_contains_expression() {
        for (text, expected) in [
            ("owner/repo@${{ github.sha }}", true),
            ("owner/repo@main", false),
            ("${{ env.X }}", true),
            ("$ {{ env.X }}", false),
            ("{{ env.X }}", false),
            ("", false),
        ] {
            assert_eq!(contains_expression(text), expected, "{text}");
        }
    }

    #[test]
    fn test_validator_loads() {
        assert!(WORKFLOW_VALIDATOR.is_valid(&serde_json::json!({ "jobs": {} })));
        assert!(!WORKFLOW_VALIDATOR.is_valid(&serde_json::json!({ "jobs": [] })));
    }
}
