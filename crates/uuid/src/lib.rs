//! Identifier services for RxPad.
//!
//! Two identifier shapes exist in the system:
//!
//! - **Component identifiers** ([`ComponentId`]): allocated client-side when
//!   a component is dropped onto the canvas. They are a UTC timestamp
//!   followed by a canonical v4 UUID, so they sort in drop order and cannot
//!   collide even when two drops land in the same millisecond.
//! - **User identifiers** ([`UserUuid`]): canonical 32-lowercase-hex UUIDs
//!   identifying the template owner. The template store derives its sharded
//!   on-disk layout from them.
//!
//! ## Canonical UUID form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! Non-canonical values (uppercase, hyphenated, wrong length, non-hex) are
//! rejected rather than normalised; externally supplied identifiers must
//! arrive in canonical form.
//!
//! ## Sharded directory layout
//! For a canonical user UUID `u`, templates are stored under
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`. This keeps fan-out in any single
//! directory bounded as the user population grows.

mod service;

pub use service::{ComponentId, UserUuid, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
