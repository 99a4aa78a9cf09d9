//! Prompt template parsing and rendering
//!
//! Variable syntax: `${var:name}` (required) or `${var:name:default}`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{var:([a-zA-Z0-9][-a-zA-Z0-9]*)(?::([^}]*))?\}").unwrap());

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
}

impl PromptTemplate {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Names of variables without a default value
    pub fn required_variables(&self) -> Vec<String> {
        let mut names = Vec::new();
        for cap in VARIABLE_PATTERN.captures_iter(&self.content) {
            if cap.get(2).is_none() {
                let name = cap.get(1).unwrap().as_str().to_string();
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute variables; a variable missing from `values` falls back to
    /// its default, and errors when it has none.
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        let mut missing: Option<String> = None;

        let rendered = VARIABLE_PATTERN.replace_all(&self.content, |cap: &regex::Captures| {
            let name = cap.get(1).unwrap().as_str();

            if let Some(value) = values.get(name) {
                (*value).to_string()
            } else if let Some(default) = cap.get(2) {
                default.as_str().to_string()
            } else {
                if missing.is_none() {
                    missing = Some(name.to_string());
                }
                String::new()
            }
        });

        match missing {
            Some(name) => Err(TemplateError::MissingVariable { name }),
            None => Ok(rendered.into_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_render_with_values() {
        let template = PromptTemplate::new("Signs in ${var:locale} please");
        let rendered = template.render(&values(&[("locale", "Belgium")])).unwrap();
        assert_eq!(rendered, "Signs in Belgium please");
    }

    #[test]
    fn test_render_with_default() {
        let template = PromptTemplate::new("Signs in ${var:locale:the applicable jurisdiction}");
        let rendered = template.render(&HashMap::new()).unwrap();
        assert_eq!(rendered, "Signs in the applicable jurisdiction");
    }

    #[test]
    fn test_missing_required_variable() {
        let template = PromptTemplate::new("Compare ${var:first} with ${var:second}");
        let result = template.render(&values(&[("first", "A")]));
        assert_eq!(
            result,
            Err(TemplateError::MissingVariable {
                name: "second".to_string()
            })
        );
    }

    #[test]
    fn test_required_variables() {
        let template =
            PromptTemplate::new("${var:first} ${var:second} ${var:locale:Belgium} ${var:first}");
        assert_eq!(template.required_variables(), vec!["first", "second"]);
    }

    #[test]
    fn test_repeated_variable_rendered_everywhere() {
        let template = PromptTemplate::new("${var:x} and ${var:x}");
        let rendered = template.render(&values(&[("x", "yield")])).unwrap();
        assert_eq!(rendered, "yield and yield");
    }
}
