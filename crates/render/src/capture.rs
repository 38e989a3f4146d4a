//! Capture of a built document into a PDF artifact.

use crate::layout::{paginate, Page, PageSpec, PrintDocument};
use rxpad_core::PrescriptionTemplate;

/// Errors raised while capturing a prescription document.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// There is nothing to render. Fatal to this save attempt only; the
    /// message matches what the builder surfaces to the user.
    #[error("Prescription content not found")]
    ContentNotFound,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The rasterisation/assembly collaborator failed.
    #[error("rendering backend failed: {0}")]
    Backend(String),
}

/// The binary artifact produced for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PdfArtifact {
    /// Always `<stem>.pdf`.
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// The opaque rasterisation and PDF-assembly collaborator.
///
/// Implementations receive the fully laid-out document and its page
/// breakdown and return the bytes of a finished PDF. Their internals
/// (rasteriser, assembler, fonts) are out of scope here; the capture
/// pipeline only relies on this contract.
pub trait PdfBackend {
    fn assemble(
        &self,
        document: &PrintDocument,
        pages: &[Page],
        spec: &PageSpec,
    ) -> Result<Vec<u8>, CaptureError>;
}

/// Drives layout, pagination, and the backend to produce a [`PdfArtifact`].
#[derive(Clone, Debug)]
pub struct DocumentCapture<B> {
    backend: B,
    spec: PageSpec,
}

impl<B: PdfBackend> DocumentCapture<B> {
    /// Capture at the default A4 geometry.
    pub fn new(backend: B) -> Self {
        Self::with_spec(backend, PageSpec::default())
    }

    pub fn with_spec(backend: B, spec: PageSpec) -> Self {
        Self { backend, spec }
    }

    /// Captures the template as a named PDF artifact.
    ///
    /// # Errors
    ///
    /// - [`CaptureError::ContentNotFound`] when the template has no
    ///   components (nothing to render);
    /// - [`CaptureError::InvalidInput`] when `file_stem` is empty;
    /// - [`CaptureError::Backend`] when the collaborator fails. Either way
    ///   the caller must not proceed to the network step of its save.
    pub fn capture(
        &self,
        template: &PrescriptionTemplate,
        file_stem: &str,
    ) -> Result<PdfArtifact, CaptureError> {
        if template.components.is_empty() {
            return Err(CaptureError::ContentNotFound);
        }

        let stem = file_stem.trim();
        if stem.is_empty() {
            return Err(CaptureError::InvalidInput(
                "artifact file name cannot be empty".into(),
            ));
        }

        let document = PrintDocument::build(template);
        let pages = paginate(&document.blocks, self.spec.page_height_px());
        let bytes = self.backend.assemble(&document, &pages, &self.spec)?;

        Ok(PdfArtifact {
            file_name: format!("{}.pdf", stem),
            bytes,
            page_count: pages.len(),
        })
    }
}
