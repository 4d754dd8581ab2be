//! `{key}` placeholder resolution.
//!
//! Placeholders are a step key inside single braces. A key starts with an
//! ASCII letter, digit or underscore and may continue with `.` and `-`, so
//! `{budget_spreadsheet.csv}` names a table step. Anything else in braces is
//! left untouched. Resolution is a
//! single pass: text substituted from an artifact is never scanned again.

use std::sync::LazyLock;

use folio_core::RunContext;
use folio_error::{PipelineError, PipelineErrorKind, PipelineResult};
use regex::Regex;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z0-9_][A-Za-z0-9_.\-]*)\}").expect("placeholder pattern is a valid regex")
});

static KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").expect("key pattern is a valid regex")
});

/// Whether `key` can be referenced as a `{key}` placeholder.
///
/// ```
/// use folio_pipeline::is_placeholder_key;
///
/// assert!(is_placeholder_key("budget_spreadsheet.csv"));
/// assert!(!is_placeholder_key("../escape"));
/// assert!(!is_placeholder_key("two words"));
/// ```
pub fn is_placeholder_key(key: &str) -> bool {
    KEY.is_match(key)
}

/// Keys referenced by `template`, in first-use order without repeats.
///
/// ```
/// use folio_pipeline::placeholders;
///
/// assert_eq!(
///     placeholders("Plot from {concept} for {user_prompt}, see {concept}"),
///     vec!["concept", "user_prompt"]
/// );
/// assert!(placeholders("no {placeholders here} or {}").is_empty());
/// ```
pub fn placeholders(template: &str) -> Vec<String> {
    placeholders_all([template])
}

/// Keys referenced by any of `templates`, in first-use order without repeats.
pub fn placeholders_all<'a>(templates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for template in templates {
        for captures in PLACEHOLDER.captures_iter(template) {
            let key = &captures[1];
            if !keys.iter().any(|existing| existing == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

/// Substitute every placeholder in `template` with the prompt text of the
/// matching artifact in `context`.
///
/// # Errors
///
/// [`PipelineErrorKind::UnresolvedPlaceholder`] when a placeholder names a key
/// that is not (yet) in the context.
pub fn resolve(template: &str, context: &RunContext, step: &str) -> PipelineResult<String> {
    let mut resolved = String::with_capacity(template.len());
    let mut cursor = 0;

    for captures in PLACEHOLDER.captures_iter(template) {
        let (Some(whole), Some(key)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let artifact = context.get(key.as_str()).ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::UnresolvedPlaceholder {
                step: step.to_string(),
                key: key.as_str().to_string(),
            })
        })?;

        resolved.push_str(&template[cursor..whole.start()]);
        resolved.push_str(&artifact.prompt_text());
        cursor = whole.end();
    }

    resolved.push_str(&template[cursor..]);
    Ok(resolved)
}
