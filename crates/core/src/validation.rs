//! Boundary drafts and payload validation.
//!
//! Payloads arriving from the wire (or leaving the canvas for the store)
//! are validated here before anything touches the network or the disk.
//! Validation returns the COMPLETE list of violations, not just the first,
//! so a caller can display every problem at once.

use crate::component::{ComponentKind, PrescriptionComponent};
use crate::error::{TemplateError, TemplateResult};
use crate::template::PrescriptionTemplate;
use rxpad_types::HexColor;
use rxpad_uuid::ComponentId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

/// A single validation violation, with a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationIssue {
    #[error("a component list is required")]
    MissingComponents,
    #[error("at least one component is required")]
    NoComponents,
    #[error("component {index}: missing id")]
    MissingId { index: usize },
    #[error("component {index}: malformed id '{id}'")]
    MalformedId { index: usize, id: String },
    #[error("component {index}: duplicate id '{id}'")]
    DuplicateId { index: usize, id: String },
    #[error("component {index}: missing type")]
    MissingKind { index: usize },
    #[error("component {index}: unknown type '{kind}'")]
    UnknownKind { index: usize, kind: String },
    #[error("component {index}: text must be a string")]
    TextNotString { index: usize },
    #[error("a header colour is required")]
    MissingColor,
    #[error("colour must be '#' followed by 3 or 6 hex digits, got '{color}'")]
    BadColor { color: String },
}

/// Loose boundary record for one component.
///
/// Every field is optional and `text` is raw JSON, so a malformed payload
/// deserialises far enough to be reported field by field.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ComponentDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<serde_json::Value>,
}

impl From<&PrescriptionComponent> for ComponentDraft {
    fn from(component: &PrescriptionComponent) -> Self {
        Self {
            id: Some(component.id.to_string()),
            kind: Some(component.kind.as_str().to_owned()),
            text: component
                .text
                .clone()
                .map(serde_json::Value::String),
        }
    }
}

/// Loose boundary record for a whole template payload.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TemplateDraft {
    #[serde(default)]
    pub components: Option<Vec<ComponentDraft>>,
    #[serde(default)]
    pub color: Option<String>,
}

impl TemplateDraft {
    /// Checks the draft against every rule and returns all violations.
    ///
    /// Rules:
    /// - the component list must be present and non-empty (min 1);
    /// - each component must have an id; ids must parse and must not repeat
    ///   across the list;
    /// - each component must have a type from the closed enumeration;
    /// - `text`, when present on a text-bearing type, must be a string;
    /// - the colour must be present and match the strict 3- or 6-digit hex
    ///   pattern.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        match &self.components {
            None => issues.push(ValidationIssue::MissingComponents),
            Some(components) if components.is_empty() => {
                issues.push(ValidationIssue::NoComponents);
            }
            Some(components) => {
                let mut seen_ids: HashSet<&str> = HashSet::new();

                for (index, component) in components.iter().enumerate() {
                    match component.id.as_deref() {
                        None => issues.push(ValidationIssue::MissingId { index }),
                        Some(id) => {
                            if ComponentId::from_str(id).is_err() {
                                issues.push(ValidationIssue::MalformedId {
                                    index,
                                    id: id.to_owned(),
                                });
                            }
                            if !seen_ids.insert(id) {
                                issues.push(ValidationIssue::DuplicateId {
                                    index,
                                    id: id.to_owned(),
                                });
                            }
                        }
                    }

                    let kind = match component.kind.as_deref() {
                        None => {
                            issues.push(ValidationIssue::MissingKind { index });
                            None
                        }
                        Some(token) => match ComponentKind::from_str(token) {
                            Ok(kind) => Some(kind),
                            Err(()) => {
                                issues.push(ValidationIssue::UnknownKind {
                                    index,
                                    kind: token.to_owned(),
                                });
                                None
                            }
                        },
                    };

                    if let (Some(kind), Some(text)) = (kind, &component.text) {
                        if kind.is_text_bearing() && !text.is_string() {
                            issues.push(ValidationIssue::TextNotString { index });
                        }
                    }
                }
            }
        }

        match self.color.as_deref() {
            None => issues.push(ValidationIssue::MissingColor),
            Some(raw) => {
                if HexColor::parse(raw).is_err() {
                    issues.push(ValidationIssue::BadColor {
                        color: raw.to_owned(),
                    });
                }
            }
        }

        issues
    }

    /// Converts a clean draft into a typed template.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Validation`] carrying every violation when
    /// the draft does not validate.
    pub fn into_template(self) -> TemplateResult<PrescriptionTemplate> {
        let issues = self.validate();
        if !issues.is_empty() {
            return Err(TemplateError::Validation(issues));
        }

        // validate() guarantees every unwrap below.
        let components = self
            .components
            .expect("validated: components present")
            .into_iter()
            .map(|draft| {
                let kind = ComponentKind::from_str(&draft.kind.expect("validated: type present"))
                    .expect("validated: type known");
                let text = match draft.text {
                    Some(serde_json::Value::String(s)) if kind.is_text_bearing() => Some(s),
                    _ => None,
                };
                PrescriptionComponent {
                    id: ComponentId::from_str(&draft.id.expect("validated: id present"))
                        .expect("validated: id well-formed"),
                    kind,
                    text,
                }
            })
            .collect();

        let color = HexColor::parse(&self.color.expect("validated: colour present"))
            .expect("validated: colour well-formed");

        Ok(PrescriptionTemplate { components, color })
    }
}

impl From<&PrescriptionTemplate> for TemplateDraft {
    fn from(template: &PrescriptionTemplate) -> Self {
        Self {
            components: Some(template.components.iter().map(ComponentDraft::from).collect()),
            color: Some(template.color.as_str().to_owned()),
        }
    }
}
