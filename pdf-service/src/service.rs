//! PDF generation service front.
//!
//! Exposes rendering as a `tower::Service` so callers drive it the same way
//! the other services are driven for InProcess calls.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;

use dtr_service::DtrDocument;

use crate::layout::PageGeometry;
use crate::render::{render, RenderError};

/// Fixed filename of the combined batch artifact.
pub const BATCH_FILENAME: &str = "daily_time_records.pdf";

/// Official-hours line printed on each DTR unless overridden.
pub const DEFAULT_OFFICIAL_HOURS: &str = "Regular days 8:00 AM - 5:00 PM";

/// Render request for one or more DTR documents.
pub struct PdfRequest {
    pub documents: Vec<DtrDocument>,
    pub output_path: Option<PathBuf>,
    pub official_hours: String,
    pub geometry: PageGeometry,
}

impl PdfRequest {
    pub fn new(documents: Vec<DtrDocument>) -> Self {
        Self {
            documents,
            output_path: None,
            official_hours: DEFAULT_OFFICIAL_HOURS.to_string(),
            geometry: PageGeometry::default(),
        }
    }

    /// Override the artifact destination. The default is
    /// [`BATCH_FILENAME`] inside the service output directory.
    pub fn with_output_path(mut self, output_path: impl AsRef<Path>) -> Self {
        self.output_path = Some(output_path.as_ref().to_path_buf());
        self
    }

    pub fn with_official_hours(mut self, official_hours: impl Into<String>) -> Self {
        self.official_hours = official_hours.into();
        self
    }

    pub fn with_geometry(mut self, geometry: PageGeometry) -> Self {
        self.geometry = geometry;
        self
    }
}

/// Result of a completed render.
#[derive(Debug, Clone)]
pub struct PdfResult {
    pub pdf_path: PathBuf,
    pub page_count: usize,
}

/// PDF generation service.
pub struct PdfService {
    output_dir: PathBuf,
}

impl PdfService {
    /// Create a service writing under the system temp directory.
    pub fn new() -> Self {
        Self {
            output_dir: std::env::temp_dir().join("dtr-pdf"),
        }
    }

    /// Create a service with a custom output directory.
    pub fn with_output_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    async fn generate(request: PdfRequest, output_dir: PathBuf) -> Result<PdfResult, RenderError> {
        let page_count = request.documents.len();

        // The whole artifact is rendered before the filesystem is touched;
        // a failed render leaves no partial file behind.
        let bytes = render(&request.documents, &request.geometry, &request.official_hours)?;

        let output_path = request
            .output_path
            .unwrap_or_else(|| output_dir.join(BATCH_FILENAME));
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&output_path, &bytes).await?;
        tracing::info!(
            "Wrote {} page DTR batch to {}",
            page_count,
            output_path.display()
        );

        Ok(PdfResult {
            pdf_path: output_path,
            page_count,
        })
    }
}

impl Default for PdfService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<PdfRequest> for PdfService {
    type Response = PdfResult;
    type Error = RenderError;
    type Future = Pin<Box<dyn Future<Output = Result<PdfResult, RenderError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: PdfRequest) -> Self::Future {
        let output_dir = self.output_dir.clone();
        Box::pin(Self::generate(request, output_dir))
    }
}
