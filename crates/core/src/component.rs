//! The prescription component model.
//!
//! A prescription document is an ordered list of typed components. The kind
//! set is closed: the canvas sidebar offers exactly these building blocks,
//! and the template store rejects anything else before persistence.

use rxpad_uuid::ComponentId;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The closed set of prescription component kinds.
///
/// `Divider` carries no text. `Rx` and `Lx` are fixed semantic section
/// markers (prescription body and lab-order section) with fixed default
/// captions; the remaining kinds are free-form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Text,
    Input,
    Date,
    Divider,
    Header,
    Rx,
    Lx,
}

impl ComponentKind {
    /// Every kind, in the order the sidebar presents them.
    pub const ALL: [ComponentKind; 7] = [
        ComponentKind::Text,
        ComponentKind::Input,
        ComponentKind::Date,
        ComponentKind::Divider,
        ComponentKind::Header,
        ComponentKind::Rx,
        ComponentKind::Lx,
    ];

    /// The wire token for this kind, as used in stored payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Text => "text",
            ComponentKind::Input => "input",
            ComponentKind::Date => "date",
            ComponentKind::Divider => "divider",
            ComponentKind::Header => "header",
            ComponentKind::Rx => "rx",
            ComponentKind::Lx => "lx",
        }
    }

    /// Default caption shown (and printed) when a component of this kind
    /// has no text of its own. `Divider` has none.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            ComponentKind::Text => Some("Write here"),
            ComponentKind::Input => Some("Enter value"),
            ComponentKind::Date => Some("Select date"),
            ComponentKind::Divider => None,
            ComponentKind::Header => Some("Section Title"),
            ComponentKind::Rx => Some("Rx"),
            ComponentKind::Lx => Some("Lab Orders"),
        }
    }

    /// Whether this kind carries a text payload at all.
    pub fn is_text_bearing(&self) -> bool {
        !matches!(self, ComponentKind::Divider)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComponentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(ComponentKind::Text),
            "input" => Ok(ComponentKind::Input),
            "date" => Ok(ComponentKind::Date),
            "divider" => Ok(ComponentKind::Divider),
            "header" => Ok(ComponentKind::Header),
            "rx" => Ok(ComponentKind::Rx),
            "lx" => Ok(ComponentKind::Lx),
            _ => Err(()),
        }
    }
}

/// One building block of a prescription template.
///
/// The `id` is allocated client-side at creation time, never reused, and
/// stable for the component's lifetime in the template. List position (not
/// anything in this struct) determines rendering and print order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionComponent {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl PrescriptionComponent {
    /// Creates a component with a fresh identifier.
    ///
    /// No kind validation happens here: the closed enum makes invalid
    /// kinds unrepresentable in typed code, and the draft layer catches
    /// invalid tokens arriving from the wire. Text passed for a `Divider`
    /// is discarded.
    pub fn new(kind: ComponentKind, text: Option<String>) -> Self {
        Self::with_previous(kind, text, None)
    }

    /// Creates a component whose id timestamp is strictly greater than
    /// `previous`, keeping rapid successive drops ordered.
    pub fn with_previous(
        kind: ComponentKind,
        text: Option<String>,
        previous: Option<&ComponentId>,
    ) -> Self {
        let text = if kind.is_text_bearing() { text } else { None };
        Self {
            id: ComponentId::generate(previous),
            kind,
            text,
        }
    }

    /// The text to render for this component: its own text when present,
    /// otherwise the kind's default caption.
    pub fn display_text(&self) -> &str {
        self.text
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| self.kind.placeholder())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_tokens_round_trip() {
        for kind in ComponentKind::ALL {
            let parsed: ComponentKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_kind_rejects_unknown_token() {
        assert!("signature".parse::<ComponentKind>().is_err());
        assert!("".parse::<ComponentKind>().is_err());
        assert!("Text".parse::<ComponentKind>().is_err());
    }

    #[test]
    fn test_divider_carries_no_text() {
        let divider = PrescriptionComponent::new(
            ComponentKind::Divider,
            Some("should be discarded".into()),
        );
        assert_eq!(divider.text, None);
        assert_eq!(divider.display_text(), "");
    }

    #[test]
    fn test_fixed_markers_have_default_captions() {
        let rx = PrescriptionComponent::new(ComponentKind::Rx, None);
        assert_eq!(rx.display_text(), "Rx");

        let lx = PrescriptionComponent::new(ComponentKind::Lx, None);
        assert_eq!(lx.display_text(), "Lab Orders");
    }

    #[test]
    fn test_own_text_wins_over_placeholder() {
        let header =
            PrescriptionComponent::new(ComponentKind::Header, Some("Dosage".into()));
        assert_eq!(header.display_text(), "Dosage");
    }

    #[test]
    fn test_empty_text_falls_back_to_placeholder() {
        let header = PrescriptionComponent::new(ComponentKind::Header, Some(String::new()));
        assert_eq!(header.display_text(), "Section Title");
    }

    #[test]
    fn test_component_serialises_with_wire_field_names() {
        let component = PrescriptionComponent::new(ComponentKind::Rx, None);
        let json = serde_json::to_value(&component).unwrap();

        assert_eq!(json["type"], "rx");
        assert!(json["id"].is_string());
        assert!(json.get("text").is_none());
    }

    #[test]
    fn test_component_deserialises_wire_shape() {
        let raw = r#"{
            "id": "20260806T143522.045Z-550e8400e29b41d4a716446655440000",
            "type": "input",
            "text": "500mg"
        }"#;
        let component: PrescriptionComponent = serde_json::from_str(raw).unwrap();

        assert_eq!(component.kind, ComponentKind::Input);
        assert_eq!(component.text.as_deref(), Some("500mg"));
    }
}
