//! Viewer facade
//!
//! Ties the pieces together for the embedding shell: opens documents through
//! the provider (with the compatibility-profile fallback), feeds shell
//! commands through the state reducer, and executes the resulting effects
//! against the scheduler. The shell talks to this type and nothing else.

use log::{error, warn};

use crate::config::{DeviceProfile, RenderConfig};
use crate::provider::{DocumentProvider, LoadError, LoadOptions, SurfaceOf};
use crate::raster::FrameParams;
use crate::scheduler::RenderScheduler;
use crate::state::{Command, Effect, ViewerState};
use crate::target::target_set;
use crate::viewport::ViewportTracker;

/// Work only the shell can perform, returned from [`Viewer::handle`].
#[derive(Clone, Debug, PartialEq)]
pub enum ShellAction {
    /// Scroll the container so `page`'s top edge sits at the container top.
    ScrollTo { page: u32, offset: f32 },
}

/// One document viewer. Owns the provider, the open document's scheduler,
/// visibility tracking, and the reducer state.
pub struct Viewer<P: DocumentProvider> {
    provider: P,
    config: RenderConfig,
    device: DeviceProfile,
    options: LoadOptions,
    locator: Option<String>,
    scheduler: Option<RenderScheduler<P::Doc>>,
    tracker: ViewportTracker,
    state: ViewerState,
    loading: bool,
    error: Option<LoadError>,
}

impl<P: DocumentProvider> Viewer<P> {
    #[must_use]
    pub fn new(provider: P, config: RenderConfig, device: DeviceProfile) -> Self {
        let options = LoadOptions::fast(config.range_chunk_size);
        let state = ViewerState::new(&config);
        Self {
            provider,
            config,
            device,
            options,
            locator: None,
            scheduler: None,
            tracker: ViewportTracker::new(),
            state,
            loading: false,
            error: None,
        }
    }

    /// Credentials forwarded with document requests. Takes effect on the
    /// next [`open`](Self::open).
    pub fn set_credentials(&mut self, with_credentials: bool, auth_header: Option<String>) {
        self.options.with_credentials = with_credentials;
        self.options.auth_header = auth_header;
    }

    /// Open a document, replacing any currently open one.
    ///
    /// Tries the fast range-request profile first and falls back to a whole
    /// file fetch for servers that mishandle range requests. A failure of
    /// both attempts is recorded in the read model and halts scheduling
    /// until the next open.
    pub fn open(&mut self, locator: &str) -> Result<(), LoadError> {
        self.loading = true;
        self.error = None;
        self.scheduler = None;
        self.tracker.clear();
        self.state.page_count = 0;
        self.state.current_page = 0;

        let opened = self.provider.open(locator, &self.options).or_else(|err| {
            warn!("fast load profile failed ({err}), retrying with compatibility profile");
            self.provider.open(locator, &self.options.as_compat())
        });
        self.loading = false;

        let doc = match opened {
            Ok(doc) => doc,
            Err(err) => {
                error!("{err}");
                self.error = Some(err.clone());
                return Err(err);
            }
        };

        let cap = self.config.concurrency_cap(&self.device);
        let mut scheduler = RenderScheduler::new(doc, self.config.clone(), cap);
        let count = scheduler.page_count();
        self.state.page_count = count;
        self.state.current_page = u32::from(count > 0);
        self.locator = Some(locator.to_string());

        // Mount the first pages before any visibility signal arrives so the
        // initial screen is never blank.
        let burst = self.config.initial_mount_burst.min(count);
        scheduler.request_mount(1..=burst);

        self.scheduler = Some(scheduler);
        self.reschedule();
        Ok(())
    }

    /// Re-open the current document from scratch.
    pub fn reload(&mut self) -> Result<(), LoadError> {
        match self.locator.clone() {
            Some(locator) => self.open(&locator),
            None => Err(LoadError::new("no document to reload")),
        }
    }

    /// Apply one shell command and execute its effects. Returns the actions
    /// the shell itself must carry out.
    pub fn handle(&mut self, command: Command) -> Vec<ShellAction> {
        let effects = self.state.apply(command);
        let mut actions = Vec::new();

        for effect in effects {
            match effect {
                Effect::MarkVisible(page) => self.tracker.page_entered(page),
                Effect::MarkHidden(page) => self.tracker.page_left(page),
                Effect::Reschedule => self.reschedule(),
                Effect::InvalidateAll => {
                    if let Some(scheduler) = &mut self.scheduler {
                        scheduler.advance_generation();
                        scheduler.clear_measurements();
                    }
                }
                Effect::RescaleDrawn { ratio } => {
                    let container_width = self.state.container_width;
                    if let Some(scheduler) = &mut self.scheduler {
                        scheduler.rescale_visible(self.tracker.visible(), ratio, container_width);
                    }
                }
                Effect::CancelInFlight => {
                    if let Some(scheduler) = &mut self.scheduler {
                        scheduler.cancel_in_flight();
                    }
                }
                Effect::RecomputeCurrentPage => {
                    let params = self.frame_params();
                    let offset = self.state.scroll_offset;
                    if let Some(scheduler) = &self.scheduler {
                        if let Some(page) = scheduler.current_page_by_scroll(offset, &params) {
                            self.state.current_page = page;
                        }
                    }
                }
                Effect::ScrollToPage(page) => {
                    let params = self.frame_params();
                    if let Some(scheduler) = &self.scheduler {
                        actions.push(ShellAction::ScrollTo {
                            page,
                            offset: scheduler.page_top(page, &params),
                        });
                    }
                }
                Effect::ReloadDocument => {
                    if let Err(err) = self.reload() {
                        warn!("reload failed: {err}");
                    }
                }
            }
        }

        actions
    }

    /// Drain draw completions. Call regularly (e.g. once per frame). Returns
    /// the number of completions processed.
    pub fn poll(&mut self) -> usize {
        let params = self.frame_params();
        match &mut self.scheduler {
            Some(scheduler) => scheduler.poll(&params),
            None => 0,
        }
    }

    /// Pages the shell should allocate surfaces for, ascending. Drained.
    pub fn take_mount_requests(&mut self) -> Vec<u32> {
        self.scheduler
            .as_mut()
            .map(RenderScheduler::take_mount_requests)
            .unwrap_or_default()
    }

    /// Hand a freshly allocated surface to the scheduler.
    pub fn attach_surface(&mut self, page: u32, surface: SurfaceOf<P::Doc>) {
        if let Some(scheduler) = &mut self.scheduler {
            scheduler.attach_surface(page, surface);
        }
        self.reschedule();
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.state.current_page
    }

    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.state.page_count
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&LoadError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn zoom_scale(&self) -> f32 {
        self.state.zoom.scale()
    }

    /// Current render generation; 0 with no document open.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.scheduler.as_ref().map_or(0, RenderScheduler::generation)
    }

    /// Generation stamp of the page's drawn content, if any. Stale content
    /// (stamp ≠ [`generation`](Self::generation)) is still shown until the
    /// replacement draw lands.
    #[must_use]
    pub fn content_generation(&self, page: u32) -> Option<u64> {
        self.scheduler
            .as_ref()
            .and_then(|scheduler| scheduler.rendered_generation(page))
    }

    #[must_use]
    pub fn should_mount(&self, page: u32) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(|scheduler| scheduler.should_mount(page))
    }

    #[must_use]
    pub fn is_page_failed(&self, page: u32) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(|scheduler| scheduler.is_page_failed(page))
    }

    /// Height the shell should reserve for `page` right now.
    #[must_use]
    pub fn placeholder_height(&self, page: u32) -> u32 {
        let params = self.frame_params();
        self.scheduler
            .as_ref()
            .map_or(0, |scheduler| scheduler.placeholder_height(page, &params))
    }

    /// Top offset of `page` in the scroll container.
    #[must_use]
    pub fn page_top(&self, page: u32) -> f32 {
        let params = self.frame_params();
        self.scheduler
            .as_ref()
            .map_or(0.0, |scheduler| scheduler.page_top(page, &params))
    }

    fn reschedule(&mut self) {
        let params = self.frame_params();
        let current = self.state.current_page;
        let radius = self.config.buffer_radius;
        let Some(scheduler) = &mut self.scheduler else {
            return;
        };

        let targets = target_set(
            self.tracker.visible(),
            current,
            radius,
            scheduler.page_count(),
        );
        scheduler.schedule(targets, current, &params);
    }

    fn frame_params(&self) -> FrameParams {
        FrameParams {
            container_width: self.state.container_width,
            base_scale: self.state.zoom.scale(),
            device: self.device,
        }
    }
}
