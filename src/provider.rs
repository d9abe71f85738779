//! Document provider boundary
//!
//! The scheduler never touches document bytes. Opening a remote document,
//! fetching per-page metadata, and painting a page onto a surface all happen
//! behind these traits; the core only decides *what* to draw and *when*.

use crate::draw::DrawTicket;

/// Width and height of a page at some scale, in layout pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageViewport {
    pub width: f32,
    pub height: f32,
}

impl PageViewport {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Height/width ratio, used to estimate placeholder heights for pages
    /// that have never been measured.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f32> {
        (self.width > 0.0).then(|| self.height / self.width)
    }
}

/// How document bytes are fetched from the remote end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadProfile {
    /// Range requests + streaming: fast first paint for large documents.
    Fast,
    /// Single whole-file fetch: fallback for servers that mishandle ranges.
    Compat,
}

/// Options passed to [`DocumentProvider::open`].
#[derive(Clone, Debug)]
pub struct LoadOptions {
    pub profile: LoadProfile,
    /// Send credentials (cookies) with document requests.
    pub with_credentials: bool,
    /// Raw `Authorization` header value, forwarded untouched.
    pub auth_header: Option<String>,
    /// Range request chunk size in bytes. Ignored under [`LoadProfile::Compat`].
    pub range_chunk_size: u32,
}

impl LoadOptions {
    #[must_use]
    pub fn fast(range_chunk_size: u32) -> Self {
        Self {
            profile: LoadProfile::Fast,
            with_credentials: false,
            auth_header: None,
            range_chunk_size,
        }
    }

    /// The same options with the compatibility fetch profile.
    #[must_use]
    pub fn as_compat(&self) -> Self {
        Self {
            profile: LoadProfile::Compat,
            ..self.clone()
        }
    }
}

/// The whole document failed to open. Halts scheduling until a new load.
#[derive(Clone, Debug, thiserror::Error)]
#[error("document load failed: {detail}")]
pub struct LoadError {
    pub detail: String,
}

impl LoadError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// A single page's metadata could not be fetched. The page is skipped for the
/// current scheduling pass and retried on the next one.
#[derive(Clone, Debug, thiserror::Error)]
#[error("page {page}: {detail}")]
pub struct PageError {
    pub page: u32,
    pub detail: String,
}

impl PageError {
    pub fn new(page: u32, detail: impl Into<String>) -> Self {
        Self {
            page,
            detail: detail.into(),
        }
    }
}

/// Drawing failed for a reason other than cancellation.
#[derive(Clone, Debug, thiserror::Error)]
#[error("draw failed on page {page}: {detail}")]
pub struct DrawError {
    pub page: u32,
    pub detail: String,
}

impl DrawError {
    pub fn new(page: u32, detail: impl Into<String>) -> Self {
        Self {
            page,
            detail: detail.into(),
        }
    }
}

/// Handle to one page's drawable surface, owned by the page slot.
///
/// Implementations are cheap handles (canvas-element style): clones refer to
/// the same underlying surface, and layout mutations take effect immediately.
/// The backing store and the layout size are independent — the clamping
/// policy shrinks only the former.
pub trait PageSurface: Clone {
    /// Set the on-screen (layout) size in layout pixels.
    fn set_layout_size(&self, width: u32, height: u32);

    /// Set the backing pixel-store size.
    fn set_backing_size(&self, width: u32, height: u32);

    /// Center the surface horizontally when narrower than the container.
    fn set_centered(&self, centered: bool);
}

/// One page of an open document.
pub trait Page {
    type Surface: PageSurface;

    /// Page dimensions at scale 1.
    fn natural_viewport(&self) -> PageViewport;

    /// Page dimensions at the given scale.
    fn viewport_at(&self, scale: f32) -> PageViewport;

    /// Start painting the page onto `surface` at the given viewport and
    /// backing pixel ratio.
    ///
    /// The call returns immediately; the provider may do the work wherever it
    /// likes but must deliver exactly one completion through `ticket` and
    /// poll the ticket's cancellation cooperatively. Completions are drained
    /// on the scheduling thread.
    fn draw(
        &self,
        surface: Self::Surface,
        viewport: PageViewport,
        pixel_ratio: f32,
        ticket: DrawTicket,
    );
}

/// An open document. Replaced wholesale on reload, never mutated.
pub trait Document {
    type Page: Page;

    fn page_count(&self) -> u32;

    /// Fetch page `number` (1-based, `1 ≤ number ≤ page_count`).
    fn page(&self, number: u32) -> Result<Self::Page, PageError>;
}

/// Opens remote documents.
pub trait DocumentProvider {
    type Doc: Document;

    fn open(&mut self, locator: &str, options: &LoadOptions) -> Result<Self::Doc, LoadError>;
}

pub type SurfaceOf<D> = <<D as Document>::Page as Page>::Surface;
