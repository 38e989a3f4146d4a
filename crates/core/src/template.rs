//! Template carrier types.
//!
//! [`PrescriptionTemplate`] is the typed, validated form that crosses the
//! wire on create/update; [`StoredTemplate`] wraps it with the identity and
//! timestamps the store assigns. Both deserialise strictly; lenient input
//! goes through [`crate::validation::TemplateDraft`] first.

use crate::component::PrescriptionComponent;
use chrono::{DateTime, Utc};
use rxpad_types::HexColor;
use serde::{Deserialize, Serialize};

/// A visual prescription template: ordered components plus one theme colour.
///
/// Component order is document order and is preserved exactly as inserted;
/// nothing here sorts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionTemplate {
    pub components: Vec<PrescriptionComponent>,
    pub color: HexColor,
}

/// A template as held by the store, with server-assigned identity and
/// timestamps. Opaque to the builder beyond seeding the canvas.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTemplate {
    pub id: String,
    pub components: Vec<PrescriptionComponent>,
    pub color: HexColor,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredTemplate {
    /// The template payload without store metadata.
    pub fn template(&self) -> PrescriptionTemplate {
        PrescriptionTemplate {
            components: self.components.clone(),
            color: self.color.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ComponentKind;

    #[test]
    fn test_template_round_trips_through_json() {
        let template = PrescriptionTemplate {
            components: vec![
                PrescriptionComponent::new(ComponentKind::Header, Some("Clinic".into())),
                PrescriptionComponent::new(ComponentKind::Rx, None),
            ],
            color: HexColor::parse("#3B82F6").unwrap(),
        };

        let json = serde_json::to_string(&template).unwrap();
        let back: PrescriptionTemplate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, template);
    }

    #[test]
    fn test_template_rejects_malformed_colour_on_deserialise() {
        let raw = r#"{"components": [], "color": "blue"}"#;
        let result: Result<PrescriptionTemplate, _> = serde_json::from_str(raw);
        assert!(result.is_err());
    }
}
