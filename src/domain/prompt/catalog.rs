use std::collections::HashMap;

use super::template::{PromptTemplate, TemplateError};
use crate::domain::DomainError;

/// Default instruction for vision recognition requests.
///
/// The wording is configuration, not logic: deployments can override it as
/// long as the replacement keeps the list output, the one-entry-per-sign and
/// no-duplicates instructions, and the locale scoping for code assignment.
pub const DEFAULT_RECOGNIZE_TEMPLATE: &str = "\
List every traffic sign visible in the image. \
Output one bullet per distinct sign and never repeat a sign you already listed. \
For each sign give: a short description of its appearance, what it means for road users, \
and the official sign code under the traffic rules of ${var:locale:the applicable jurisdiction}. \
Assign codes only from that jurisdiction's sign catalog; if no code applies, say so.";

/// Default instruction for cross-model validation requests.
pub const DEFAULT_VALIDATE_TEMPLATE: &str = "\
Two independent models analyzed the same street-level image for traffic signs.\n\
Model A said:\n${var:first}\n\n\
Model B said:\n${var:second}\n\n\
Compare the two answers. Under a heading \"Consistent\", list the signs and meanings \
both answers agree on. Under a heading \"Inconsistent\", list every point where the \
answers disagree or only one answer mentions a sign. \
Check any sign codes against the traffic rules of ${var:locale} and flag codes that \
do not exist in that jurisdiction.";

/// Versioned instruction templates for the two task kinds.
///
/// Rendering is pure and deterministic: the same task and parameters always
/// produce the same instruction string.
#[derive(Debug, Clone)]
pub struct PromptCatalog {
    recognize: PromptTemplate,
    validate: PromptTemplate,
}

impl Default for PromptCatalog {
    fn default() -> Self {
        Self {
            recognize: PromptTemplate::new(DEFAULT_RECOGNIZE_TEMPLATE),
            validate: PromptTemplate::new(DEFAULT_VALIDATE_TEMPLATE),
        }
    }
}

impl PromptCatalog {
    /// Build a catalog with optional template overrides from configuration.
    pub fn new(recognize: Option<String>, validate: Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            recognize: recognize.map(PromptTemplate::new).unwrap_or(defaults.recognize),
            validate: validate.map(PromptTemplate::new).unwrap_or(defaults.validate),
        }
    }

    /// Instruction asking a vision model to enumerate the signs in an image.
    pub fn render_recognize(&self, locale: Option<&str>) -> Result<String, DomainError> {
        let mut values = HashMap::new();
        if let Some(locale) = locale {
            values.insert("locale", locale);
        }
        self.recognize.render(&values).map_err(template_error)
    }

    /// Instruction asking a text model to reconcile two prior answers.
    pub fn render_validate(
        &self,
        first: &str,
        second: &str,
        locale: &str,
    ) -> Result<String, DomainError> {
        let values = HashMap::from([("first", first), ("second", second), ("locale", locale)]);
        self.validate.render(&values).map_err(template_error)
    }
}

fn template_error(err: TemplateError) -> DomainError {
    DomainError::configuration(format!("Prompt template: {err}"))
}
