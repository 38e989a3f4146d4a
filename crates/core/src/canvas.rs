//! The prescription canvas and its drag-and-drop controller.
//!
//! The canvas owns an ordered component list and the current header colour.
//! Every mutation is purely in-memory and synchronous; persistence is the
//! gateway's concern and rendering is the print pipeline's.
//!
//! A drag begins at the sidebar as a [`DragToken`] (a source-side
//! annotation of the component kind, nothing more) and completes as an
//! append when the token is dropped on the canvas. Dropping the same kind
//! repeatedly is fine: there is no de-duplication and no count limit.

use crate::component::{ComponentKind, PrescriptionComponent};
use crate::error::{TemplateError, TemplateResult};
use crate::template::StoredTemplate;
use crate::validation::TemplateDraft;
use rxpad_uuid::ComponentId;

/// Default header theme colour for a fresh canvas.
pub const DEFAULT_HEADER_COLOR: &str = "#3B82F6";

/// The component kind carried by an in-progress drag.
///
/// Stateless: creating a token has no effect on any canvas, and an
/// abandoned token is simply dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragToken {
    kind: ComponentKind,
}

impl DragToken {
    pub fn new(kind: ComponentKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }
}

/// In-memory state of the prescription template builder.
#[derive(Clone, Debug)]
pub struct CanvasState {
    components: Vec<PrescriptionComponent>,
    color: String,
    drag_active: bool,
    last_id: Option<ComponentId>,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasState {
    /// An empty canvas with the default header colour.
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            color: DEFAULT_HEADER_COLOR.to_owned(),
            drag_active: false,
            last_id: None,
        }
    }

    /// Begins a drag from the sidebar for the given kind.
    pub fn begin_drag(kind: ComponentKind) -> DragToken {
        DragToken::new(kind)
    }

    /// A drag has entered the canvas. Visual feedback only, no semantic
    /// effect on the component list.
    pub fn drag_entered(&mut self) {
        self.drag_active = true;
    }

    /// A drag has left the canvas without dropping.
    pub fn drag_left(&mut self) {
        self.drag_active = false;
    }

    /// Whether a drag is currently over the canvas.
    pub fn drag_active(&self) -> bool {
        self.drag_active
    }

    /// Completes a drop: constructs a new component of the token's kind and
    /// appends it to the end of the list. Returns a reference to the new
    /// component.
    pub fn drop_component(&mut self, token: DragToken) -> &PrescriptionComponent {
        let component =
            PrescriptionComponent::with_previous(token.kind(), None, self.last_id.as_ref());
        self.last_id = Some(component.id.clone());
        self.drag_active = false;
        self.components.push(component);
        self.components.last().expect("just pushed")
    }

    /// Replaces one component's text in place. List order and every other
    /// component are untouched.
    ///
    /// # Errors
    ///
    /// - [`TemplateError::UnknownComponent`] when no component has `id`;
    /// - [`TemplateError::NotEditable`] when the component is a divider.
    pub fn edit_text(&mut self, id: &ComponentId, text: impl Into<String>) -> TemplateResult<()> {
        let component = self
            .components
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| TemplateError::UnknownComponent(id.to_string()))?;

        if !component.kind.is_text_bearing() {
            return Err(TemplateError::NotEditable);
        }

        component.text = Some(text.into());
        Ok(())
    }

    /// Removes the component with the given id. Idempotent: removing an
    /// unknown id is a no-op. Returns whether anything was removed.
    pub fn remove(&mut self, id: &ComponentId) -> bool {
        let before = self.components.len();
        self.components.retain(|c| &c.id != id);
        self.components.len() != before
    }

    /// Sets the header colour. Any string is accepted here (the value is
    /// validated only at save time) and the same value feeds the printable
    /// output.
    pub fn set_color(&mut self, raw: impl Into<String>) {
        self.color = raw.into();
    }

    /// Seeds the canvas from a stored template fetched at screen load.
    pub fn seed(&mut self, stored: &StoredTemplate) {
        self.components = stored.components.clone();
        self.color = stored.color.as_str().to_owned();
        self.last_id = None;
    }

    /// Whether the canvas shows placeholder messaging instead of components.
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[PrescriptionComponent] {
        &self.components
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    /// The canvas contents as a save payload, ready for validation.
    pub fn to_draft(&self) -> TemplateDraft {
        TemplateDraft {
            components: Some(self.components.iter().map(Into::into).collect()),
            color: Some(self.color.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_n_drops_yield_n_distinct_ids_in_drop_order() {
        let mut canvas = CanvasState::new();
        let kinds = [
            ComponentKind::Header,
            ComponentKind::Rx,
            ComponentKind::Input,
            ComponentKind::Text,
            ComponentKind::Rx,
            ComponentKind::Divider,
        ];

        for kind in kinds {
            canvas.drop_component(CanvasState::begin_drag(kind));
        }

        assert_eq!(canvas.components().len(), kinds.len());

        let seen: HashSet<String> = canvas
            .components()
            .iter()
            .map(|c| c.id.to_string())
            .collect();
        assert_eq!(seen.len(), kinds.len(), "ids must be distinct");

        let order: Vec<_> = canvas.components().iter().map(|c| c.kind).collect();
        assert_eq!(order, kinds.to_vec(), "drop order must be preserved");
    }

    #[test]
    fn test_repeated_drops_of_same_kind_are_independent() {
        let mut canvas = CanvasState::new();
        for _ in 0..4 {
            canvas.drop_component(CanvasState::begin_drag(ComponentKind::Input));
        }
        assert_eq!(canvas.components().len(), 4);
    }

    #[test]
    fn test_drop_clears_drag_flag() {
        let mut canvas = CanvasState::new();
        canvas.drag_entered();
        assert!(canvas.drag_active());

        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Text));
        assert!(!canvas.drag_active());
    }

    #[test]
    fn test_drag_flag_has_no_semantic_effect() {
        let mut canvas = CanvasState::new();
        canvas.drag_entered();
        canvas.drag_left();
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_removal_is_idempotent() {
        let mut canvas = CanvasState::new();
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Header));
        let id = canvas
            .drop_component(CanvasState::begin_drag(ComponentKind::Rx))
            .id
            .clone();

        assert!(canvas.remove(&id));
        let after_first: Vec<_> = canvas.components().to_vec();

        assert!(!canvas.remove(&id), "second removal is a no-op");
        assert_eq!(canvas.components(), after_first.as_slice());
    }

    #[test]
    fn test_removing_unknown_id_is_a_no_op() {
        let mut canvas = CanvasState::new();
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Header));

        let stranger = ComponentId::generate(None);
        assert!(!canvas.remove(&stranger));
        assert_eq!(canvas.components().len(), 1);
    }

    #[test]
    fn test_edit_isolation() {
        let mut canvas = CanvasState::new();
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Header));
        let target = canvas
            .drop_component(CanvasState::begin_drag(ComponentKind::Input))
            .id
            .clone();
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Rx));

        let before: Vec<_> = canvas.components().to_vec();

        canvas.edit_text(&target, "500mg").unwrap();

        assert_eq!(canvas.components().len(), before.len());
        for (index, (now, then)) in canvas.components().iter().zip(&before).enumerate() {
            assert_eq!(now.id, then.id);
            assert_eq!(now.kind, then.kind);
            if now.id == target {
                assert_eq!(now.text.as_deref(), Some("500mg"));
            } else {
                assert_eq!(now.text, then.text, "component {} text changed", index);
            }
        }
    }

    #[test]
    fn test_edit_unknown_component_fails() {
        let mut canvas = CanvasState::new();
        let stranger = ComponentId::generate(None);

        let err = canvas.edit_text(&stranger, "text").unwrap_err();
        assert!(matches!(err, TemplateError::UnknownComponent(_)));
    }

    #[test]
    fn test_edit_divider_fails() {
        let mut canvas = CanvasState::new();
        let id = canvas
            .drop_component(CanvasState::begin_drag(ComponentKind::Divider))
            .id
            .clone();

        let err = canvas.edit_text(&id, "nope").unwrap_err();
        assert!(matches!(err, TemplateError::NotEditable));
    }

    #[test]
    fn test_set_color_accepts_anything_until_save() {
        let mut canvas = CanvasState::new();
        canvas.set_color("blue");
        assert_eq!(canvas.color(), "blue");

        let issues = canvas.to_draft().validate();
        assert!(issues
            .iter()
            .any(|i| i.to_string().contains("3 or 6 hex digits")));
    }

    #[test]
    fn test_scenario_build_edit_and_validate() {
        // Drop header, rx, input; edit the input; save-validate with #3B82F6.
        let mut canvas = CanvasState::new();
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Header));
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Rx));
        let input = canvas
            .drop_component(CanvasState::begin_drag(ComponentKind::Input))
            .id
            .clone();

        canvas.edit_text(&input, "500mg").unwrap();
        canvas.set_color("#3B82F6");

        let order: Vec<_> = canvas.components().iter().map(|c| c.kind).collect();
        assert_eq!(
            order,
            vec![ComponentKind::Header, ComponentKind::Rx, ComponentKind::Input]
        );
        assert_eq!(canvas.components()[0].text, None);
        assert_eq!(canvas.components()[1].text, None);

        let template = canvas.to_draft().into_template().unwrap();
        assert_eq!(template.components.len(), 3);
        assert_eq!(template.color.as_str(), "#3B82F6");
    }

    #[test]
    fn test_seed_replaces_components_and_colour() {
        let mut canvas = CanvasState::new();
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Text));

        let stored = {
            let mut source = CanvasState::new();
            source.drop_component(CanvasState::begin_drag(ComponentKind::Rx));
            source.set_color("#fff");
            let template = source.to_draft().into_template().unwrap();
            crate::template::StoredTemplate {
                id: "aabbccddeeff00112233445566778899".into(),
                components: template.components,
                color: template.color,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            }
        };

        canvas.seed(&stored);

        assert_eq!(canvas.components().len(), 1);
        assert_eq!(canvas.components()[0].kind, ComponentKind::Rx);
        assert_eq!(canvas.color(), "#fff");
    }
}
