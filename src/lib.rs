//! Incremental rendering scheduler for remote paginated documents.
//!
//! Decides which pages of a scrollable document to keep rendered, at what
//! resolution, and in what order, while capping concurrent draw work. The
//! embedding shell supplies surfaces and visibility signals; a
//! [`DocumentProvider`] supplies the document itself.

pub mod cancel;
pub mod config;
pub mod draw;
pub mod generation;
pub mod provider;
pub mod raster;
pub mod scheduler;
pub mod slot;
pub mod state;
pub mod target;
pub mod viewer;
pub mod viewport;
pub mod zoom;

pub use cancel::CancellationToken;
pub use config::{DeviceClass, DeviceProfile, RenderConfig};
pub use draw::{DrawEvent, DrawId, DrawOutcome, DrawTicket};
pub use provider::{
    Document, DocumentProvider, DrawError, LoadError, LoadOptions, LoadProfile, Page, PageError,
    PageSurface, PageViewport,
};
pub use raster::{FrameParams, RasterSpec};
pub use scheduler::RenderScheduler;
pub use state::{Command, Effect};
pub use target::target_set;
pub use viewer::{ShellAction, Viewer};
pub use zoom::{Zoom, ZoomChange};
