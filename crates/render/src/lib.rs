//! # RxPad Render
//!
//! Print capture for prescription documents.
//!
//! This crate owns what the repository can own about producing a printable
//! prescription: building a print document from a template in component
//! order, measuring blocks deterministically, and flowing them into
//! A4-sized pages at the fixed capture geometry (210×295 mm, 800 px content
//! width, 2× raster scale).
//!
//! The rasterisation and PDF assembly step itself is an opaque external
//! collaborator behind the narrow [`PdfBackend`] trait. Nothing in the
//! builder core depends on any detail of it, and it is swappable in tests.

pub mod capture;
pub mod layout;

pub use capture::{CaptureError, DocumentCapture, PdfArtifact, PdfBackend};
pub use layout::{paginate, Page, PageSpec, PrintBlock, PrintDocument};
