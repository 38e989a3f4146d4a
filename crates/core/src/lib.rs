//! # RxPad Core
//!
//! Core business logic for the RxPad prescription template system.
//!
//! This crate contains pure data operations and the file-backed template
//! store used by the service binary:
//! - The prescription component model and the drag-and-drop canvas state
//! - Boundary drafts with complete-list validation
//! - One-template-per-user storage under sharded user directories
//!
//! **No API concerns**: HTTP serving belongs in the `rxpad-run` binary, and
//! the remote-store client belongs in `rxpad-gateway`.

pub mod canvas;
pub mod component;
pub mod config;
pub mod error;
pub mod repository;
pub mod template;
pub mod validation;

pub use canvas::{CanvasState, DragToken};
pub use component::{ComponentKind, PrescriptionComponent};
pub use config::CoreConfig;
pub use error::{TemplateError, TemplateResult};
pub use repository::TemplateRepository;
pub use template::{PrescriptionTemplate, StoredTemplate};
pub use validation::{ComponentDraft, TemplateDraft, ValidationIssue};

pub use rxpad_types::{HexColor, NonEmptyText};
pub use rxpad_uuid::{ComponentId, UserUuid};
