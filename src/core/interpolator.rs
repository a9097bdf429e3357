// src/core/interpolator.rs

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use thiserror::Error;

lazy_static! {
    // `{{ NAME }}`; whitespace inside the braces is optional.
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid");
}

/// The variables a template may reference, keyed by name.
pub type TemplateContext = BTreeMap<String, String>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Undefined variable '{name}' in template '{template}' (known variables: {known})")]
    UndefinedVariable {
        name: String,
        template: String,
        known: String,
    },
}

/// Substitutes every `{{ NAME }}` placeholder in `template` with its value from `context`.
///
/// Rendering is strict: a placeholder naming a variable absent from `context` fails with
/// [`TemplateError::UndefinedVariable`]. Text that does not match the placeholder syntax
/// is copied unchanged, and substituted values are never expanded again.
pub fn render(template: &str, context: &TemplateContext) -> Result<String, TemplateError> {
    let mut missing: Option<String> = None;

    let rendered = PLACEHOLDER_RE.replace_all(template, |caps: &Captures<'_>| {
        let name = caps.get(1).map_or("", |m| m.as_str());
        match context.get(name) {
            Some(value) => value.clone(),
            None => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    if let Some(name) = missing {
        return Err(TemplateError::UndefinedVariable {
            name,
            template: template.to_string(),
            known: context.keys().cloned().collect::<Vec<_>>().join(", "),
        });
    }

    Ok(rendered.into_owned())
}

/// Returns the names of every placeholder referenced by `template`, in order of appearance.
pub fn referenced_variables(template: &str) -> Vec<String> {
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
