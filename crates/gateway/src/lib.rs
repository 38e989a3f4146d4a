//! # RxPad Gateway
//!
//! Client-side persistence gateway for the remote template store.
//!
//! The store holds at most one template per user; "save" means "create if
//! none exists, else overwrite the existing one". The gateway validates the
//! full payload before anything touches the network, degrades a failed
//! template fetch to an empty canvas rather than blocking the screen, and
//! converts every remote failure into a single user-facing message.

pub mod cache;
pub mod error;
pub mod save;
pub mod store;

pub use cache::{CachedValue, CurrentUser};
pub use error::GatewayError;
pub use save::{LoadOutcome, SaveOutcome, TemplateGateway};
pub use store::{HttpTemplateStore, TemplateStore};
