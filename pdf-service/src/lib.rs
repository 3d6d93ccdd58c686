//! PDF Service
//!
//! Fixed-grid PDF rendering for Daily Time Record documents. Callers build
//! a [`PdfRequest`] and drive [`PdfService`] via `tower::Service`, the same
//! InProcess call convention the other services use.

pub mod layout;
pub mod render;
pub mod service;

pub use layout::PageGeometry;
pub use render::{render, RenderError};
pub use service::{PdfRequest, PdfResult, PdfService, BATCH_FILENAME, DEFAULT_OFFICIAL_HOURS};
