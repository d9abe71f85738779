//! Render scheduling core
//!
//! Owns the page slots, the generation clock, the render backlog, and the
//! in-flight draw bookkeeping. Scheduling is single-threaded: draws may run
//! wherever the provider likes, but their completions come back through a
//! channel drained here, so queue mutation and generation stamping never
//! race.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use flume::{Receiver, Sender};
use log::{debug, error, warn};

use crate::cancel::CancellationToken;
use crate::config::RenderConfig;
use crate::draw::{DrawEvent, DrawId, DrawOutcome, DrawTicket};
use crate::generation::GenerationClock;
use crate::provider::{Document, Page, PageSurface, SurfaceOf};
use crate::raster::{FrameParams, RasterSpec};
use crate::slot::PageSlot;
use crate::viewport::nearest_top;
use crate::zoom::rescale_layout;

/// One outstanding draw. The scheduler holds the cancellation token; the
/// provider only ever sees the ticket.
#[derive(Debug)]
struct PendingDraw {
    id: DrawId,
    token: CancellationToken,
    layout: (u32, u32),
    /// Generation current when the draw was dispatched.
    generation_hint: u64,
}

/// Incremental render scheduler for one open document.
pub struct RenderScheduler<D: Document> {
    doc: D,
    config: RenderConfig,
    clock: GenerationClock,
    slots: BTreeMap<u32, PageSlot<SurfaceOf<D>>>,
    /// Pages that must be mounted right now, as of the last pass.
    targets: BTreeSet<u32>,
    /// Stale pages awaiting draw, closest to the current page first.
    /// Replaced wholesale on every pass, never merged.
    backlog: VecDeque<u32>,
    /// At most one outstanding draw per page.
    pending: HashMap<u32, PendingDraw>,
    running: usize,
    cap: usize,
    next_draw_id: u64,
    mount_requests: BTreeSet<u32>,
    events_tx: Sender<DrawEvent>,
    events_rx: Receiver<DrawEvent>,
    /// Height/width ratio of page 1, used to size unmeasured placeholders.
    aspect_ratio: f32,
}

impl<D: Document> RenderScheduler<D> {
    pub fn new(doc: D, config: RenderConfig, cap: usize) -> Self {
        let aspect_ratio = match doc.page(1) {
            Ok(page) => page
                .natural_viewport()
                .aspect_ratio()
                .unwrap_or(config.fallback_aspect_ratio),
            Err(err) => {
                warn!("could not inspect page 1 for height estimation: {err}");
                config.fallback_aspect_ratio
            }
        };

        let (events_tx, events_rx) = flume::unbounded();

        Self {
            doc,
            config,
            clock: GenerationClock::new(),
            slots: BTreeMap::new(),
            targets: BTreeSet::new(),
            backlog: VecDeque::new(),
            pending: HashMap::new(),
            running: 0,
            cap: cap.max(1),
            next_draw_id: 1,
            mount_requests: BTreeSet::new(),
            events_tx,
            events_rx,
            aspect_ratio,
        }
    }

    #[must_use]
    pub fn page_count(&self) -> u32 {
        self.doc.page_count()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.clock.current()
    }

    /// Devalue every previously drawn surface. O(1) in the page count.
    pub fn advance_generation(&mut self) -> u64 {
        let generation = self.clock.advance();
        debug!("generation advanced to {generation}");
        generation
    }

    /// Drop measured heights so placeholders are re-estimated at the new
    /// scale or container width. Drawn layout sizes stay: they reflect what
    /// is on screen until the redraw lands.
    pub fn clear_measurements(&mut self) {
        for slot in self.slots.values_mut() {
            slot.measured_height = None;
        }
    }

    /// Cancel every outstanding draw. Their completion events still arrive
    /// and free the concurrency slots; none of them will stamp a page.
    pub fn cancel_in_flight(&mut self) {
        for (page, pending) in &self.pending {
            debug!("cancelling in-flight draw for page {page}");
            pending.token.cancel();
        }
    }

    /// Ask the shell to mount surfaces for `pages` regardless of the target
    /// set. Used for the initial burst after load.
    pub fn request_mount(&mut self, pages: impl IntoIterator<Item = u32>) {
        let count = self.page_count();
        for page in pages {
            if (1..=count).contains(&page) {
                let slot = self.slot_mut(page);
                if !slot.is_mounted() {
                    self.mount_requests.insert(page);
                }
            }
        }
    }

    /// Pages the shell should allocate surfaces for, ascending. Drained.
    pub fn take_mount_requests(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.mount_requests).into_iter().collect()
    }

    /// The shell allocated a surface for `page`. Re-run [`schedule`] after
    /// attaching so the page gets queued.
    pub fn attach_surface(&mut self, page: u32, surface: SurfaceOf<D>) {
        self.mount_requests.remove(&page);
        self.slot_mut(page).mount(surface);
    }

    /// One scheduling pass: reconcile mounts with the new target set,
    /// rebuild the backlog from stale target pages, and pump.
    pub fn schedule(&mut self, targets: BTreeSet<u32>, current_page: u32, params: &FrameParams) {
        // Pages leaving the target set stop costing anything: their draws
        // are cancelled and their surfaces released.
        for (page, slot) in &mut self.slots {
            if targets.contains(page) || !slot.is_mounted() {
                continue;
            }
            if let Some(pending) = self.pending.get(page) {
                debug!("page {page} left targets, cancelling its draw");
                pending.token.cancel();
            }
            slot.unmount();
            self.mount_requests.remove(page);
        }

        let generation = self.clock.current();
        let max_attempts = self.config.max_draw_attempts;
        let mut stale: Vec<u32> = Vec::new();
        for &page in &targets {
            let slot = self.slot_mut(page);
            if !slot.is_mounted() {
                self.mount_requests.insert(page);
                continue;
            }
            if slot.rendered_generation == Some(generation) {
                continue;
            }
            if slot.is_failed(generation, max_attempts) {
                continue;
            }
            // A draw already racing toward the current generation is left
            // alone; stale in-flight draws get cancelled and replaced when
            // their page is dispatched again. A cancelled draw is not
            // racing anywhere, so its page stays eligible even before the
            // cancellation event has been drained.
            if self.live_generation(page) == Some(generation) {
                continue;
            }
            stale.push(page);
        }

        stale.sort_by_key(|&page| (page.abs_diff(current_page), page));
        debug!(
            "scheduling pass: {} targets, {} stale, generation {generation}",
            targets.len(),
            stale.len()
        );

        self.targets = targets;
        self.backlog = stale.into();
        self.pump(params);
    }

    /// Pull backlog entries while concurrency slots are free. Re-invoked
    /// after every completion, which is what keeps the cap saturated without
    /// a background loop.
    pub fn pump(&mut self, params: &FrameParams) {
        while self.running < self.cap {
            let Some(page) = self.backlog.pop_front() else {
                break;
            };

            // Race guards: the page may have left the target set or been
            // drawn at the current generation since the backlog was built.
            if !self.targets.contains(&page) {
                continue;
            }
            let generation = self.clock.current();
            match self.slots.get(&page) {
                Some(slot) if slot.is_mounted() => {
                    if slot.rendered_generation == Some(generation) {
                        continue;
                    }
                }
                _ => continue,
            }

            if self.start_draw(page, params) {
                self.running += 1;
            }
        }
    }

    /// Drain completion events and pump freed slots. Returns the number of
    /// events processed.
    pub fn poll(&mut self, params: &FrameParams) -> usize {
        let mut processed = 0;

        while let Ok(event) = self.events_rx.try_recv() {
            processed += 1;
            self.running = self.running.saturating_sub(1);

            // Completions of superseded draws only free their slot.
            let live = match self.pending.get(&event.page) {
                Some(pending) if pending.id == event.id => self.pending.remove(&event.page),
                _ => None,
            };

            match event.outcome {
                DrawOutcome::Completed => {
                    if let Some(pending) = live {
                        if let Some(slot) = self.slots.get_mut(&event.page) {
                            slot.mark_rendered(event.generation, pending.layout);
                        }
                        debug!(
                            "page {} drawn at generation {}",
                            event.page, event.generation
                        );
                    }
                }
                DrawOutcome::Cancelled => {
                    // Not an error: the slot keeps no stamp and will be
                    // retried if it becomes a target again.
                    debug!("draw for page {} cancelled", event.page);
                }
                DrawOutcome::Failed(err) => {
                    if live.is_some() {
                        error!("draw failed: {err}");
                        if let Some(slot) = self.slots.get_mut(&event.page) {
                            let attempts = slot.record_failure(event.generation);
                            if attempts >= self.config.max_draw_attempts {
                                warn!(
                                    "page {} failed {attempts} draws, giving up for this generation",
                                    event.page
                                );
                            }
                        }
                    }
                }
            }
        }

        if processed > 0 {
            self.pump(params);
        }
        processed
    }

    /// Synchronously rescale the drawn layout of visible surfaces after a
    /// zoom step. Cheap layout-only feedback; the redraw follows.
    pub fn rescale_visible(&mut self, visible: &BTreeSet<u32>, ratio: f32, container_width: f32) {
        for &page in visible {
            let Some(slot) = self.slots.get_mut(&page) else {
                continue;
            };
            let Some(layout) = slot.layout_size else {
                continue;
            };
            let Some(surface) = slot.surface() else {
                continue;
            };

            let (width, height) = rescale_layout(layout, ratio);
            surface.set_layout_size(width, height);
            surface.set_centered(width as f32 <= container_width);
            slot.layout_size = Some((width, height));
        }
    }

    #[must_use]
    pub fn is_mounted(&self, page: u32) -> bool {
        self.slots.get(&page).is_some_and(PageSlot::is_mounted)
    }

    /// Whether the shell should have a surface allocated for `page`.
    #[must_use]
    pub fn should_mount(&self, page: u32) -> bool {
        self.is_mounted(page) || self.mount_requests.contains(&page)
    }

    /// Generation stamp of the page's drawn content, if any.
    #[must_use]
    pub fn rendered_generation(&self, page: u32) -> Option<u64> {
        self.slots.get(&page).and_then(|slot| slot.rendered_generation)
    }

    /// Whether the page exhausted its draw attempts for this generation.
    #[must_use]
    pub fn is_page_failed(&self, page: u32) -> bool {
        self.slots.get(&page).is_some_and(|slot| {
            slot.is_failed(self.clock.current(), self.config.max_draw_attempts)
        })
    }

    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.running
    }

    /// Placeholder height for unmeasured pages at the current geometry.
    #[must_use]
    pub fn estimated_height(&self, params: &FrameParams) -> u32 {
        let height = params.container_width * params.base_scale * self.aspect_ratio;
        (height.floor() as u32).max(1)
    }

    /// Height the shell should reserve for `page` right now.
    #[must_use]
    pub fn placeholder_height(&self, page: u32, params: &FrameParams) -> u32 {
        self.slots
            .get(&page)
            .and_then(|slot| slot.measured_height)
            .unwrap_or_else(|| self.estimated_height(params))
    }

    /// Top offset of `page` in the scroll container. Unmeasured pages
    /// contribute the estimated height, so this stays O(measured pages).
    #[must_use]
    pub fn page_top(&self, page: u32, params: &FrameParams) -> f32 {
        let estimated = self.estimated_height(params) as f32;
        let mut top = page.saturating_sub(1) as f32 * estimated;

        for (_, slot) in self.slots.range(..page) {
            if let Some(height) = slot.measured_height {
                top += height as f32 - estimated;
            }
        }

        top
    }

    /// The mounted page whose top edge is closest to the scroll offset.
    #[must_use]
    pub fn current_page_by_scroll(&self, scroll_top: f32, params: &FrameParams) -> Option<u32> {
        let tops = self
            .slots
            .iter()
            .filter(|(_, slot)| slot.is_mounted())
            .map(|(&page, _)| (page, self.page_top(page, params)));
        nearest_top(scroll_top, tops)
    }

    fn slot_mut(&mut self, page: u32) -> &mut PageSlot<SurfaceOf<D>> {
        self.slots.entry(page).or_insert_with(|| PageSlot::new(page))
    }

    /// Generation the page's outstanding draw was dispatched at. `None` when
    /// no draw is outstanding or the outstanding one has been cancelled.
    fn live_generation(&self, page: u32) -> Option<u64> {
        self.pending
            .get(&page)
            .filter(|pending| !pending.token.is_cancelled())
            .map(|pending| pending.generation_hint)
    }

    fn start_draw(&mut self, page: u32, params: &FrameParams) -> bool {
        let generation = self.clock.current();

        let handle = match self.doc.page(page) {
            Ok(handle) => handle,
            Err(err) => {
                // Skipped for this pass, retried on the next one.
                warn!("skipping page: {err}");
                return false;
            }
        };

        let natural = handle.natural_viewport();
        let spec = RasterSpec::compute(natural, params, &self.config);

        let Some(slot) = self.slots.get_mut(&page) else {
            return false;
        };
        let Some(surface) = slot.surface() else {
            return false;
        };

        // Size the surface before the paint so the layout settles at once;
        // the centered decision is re-made on every draw.
        surface.set_layout_size(spec.layout_width, spec.layout_height);
        surface.set_backing_size(spec.backing_width, spec.backing_height);
        surface.set_centered(spec.centered);
        let surface = surface.clone();
        slot.layout_size = Some((spec.layout_width, spec.layout_height));

        let id = DrawId(self.next_draw_id);
        self.next_draw_id += 1;
        let token = CancellationToken::new();

        // At most one outstanding draw per page: a new request cancels and
        // replaces its predecessor.
        if let Some(previous) = self.pending.insert(
            page,
            PendingDraw {
                id,
                token: token.clone(),
                layout: (spec.layout_width, spec.layout_height),
                generation_hint: generation,
            },
        ) {
            previous.token.cancel();
        }

        let ticket = DrawTicket::new(page, id, generation, token, self.events_tx.clone());
        let viewport = handle.viewport_at(spec.scale);
        handle.draw(surface, viewport, spec.pixel_ratio, ticket);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use super::*;
    use crate::config::DeviceProfile;
    use crate::provider::{DrawError, PageError, PageViewport};

    #[derive(Clone, Debug, Default)]
    struct TestSurface {
        log: Rc<RefCell<SurfaceLog>>,
    }

    #[derive(Debug, Default)]
    struct SurfaceLog {
        layout: (u32, u32),
        backing: (u32, u32),
        centered: bool,
    }

    impl PageSurface for TestSurface {
        fn set_layout_size(&self, width: u32, height: u32) {
            self.log.borrow_mut().layout = (width, height);
        }

        fn set_backing_size(&self, width: u32, height: u32) {
            self.log.borrow_mut().backing = (width, height);
        }

        fn set_centered(&self, centered: bool) {
            self.log.borrow_mut().centered = centered;
        }
    }

    /// Dispatched draws are parked until the test resolves them.
    #[derive(Default)]
    struct DrawLog {
        parked: Vec<DrawTicket>,
        dispatch_order: Vec<u32>,
    }

    struct TestPage {
        number: u32,
        log: Rc<RefCell<DrawLog>>,
    }

    impl Page for TestPage {
        type Surface = TestSurface;

        fn natural_viewport(&self) -> PageViewport {
            PageViewport::new(600.0, 848.0)
        }

        fn viewport_at(&self, scale: f32) -> PageViewport {
            PageViewport::new(600.0 * scale, 848.0 * scale)
        }

        fn draw(
            &self,
            _surface: TestSurface,
            _viewport: PageViewport,
            _pixel_ratio: f32,
            ticket: DrawTicket,
        ) {
            let mut log = self.log.borrow_mut();
            log.dispatch_order.push(self.number);
            log.parked.push(ticket);
        }
    }

    struct TestDoc {
        pages: u32,
        bad_pages: HashSet<u32>,
        log: Rc<RefCell<DrawLog>>,
    }

    impl Document for TestDoc {
        type Page = TestPage;

        fn page_count(&self) -> u32 {
            self.pages
        }

        fn page(&self, number: u32) -> Result<TestPage, PageError> {
            if self.bad_pages.contains(&number) {
                return Err(PageError::new(number, "metadata fetch failed"));
            }
            Ok(TestPage {
                number,
                log: Rc::clone(&self.log),
            })
        }
    }

    struct Harness {
        scheduler: RenderScheduler<TestDoc>,
        log: Rc<RefCell<DrawLog>>,
        params: FrameParams,
    }

    impl Harness {
        fn new(pages: u32, cap: usize) -> Self {
            Self::with_bad_pages(pages, cap, &[])
        }

        fn with_bad_pages(pages: u32, cap: usize, bad: &[u32]) -> Self {
            let log = Rc::new(RefCell::new(DrawLog::default()));
            let doc = TestDoc {
                pages,
                bad_pages: bad.iter().copied().collect(),
                log: Rc::clone(&log),
            };
            let scheduler = RenderScheduler::new(doc, RenderConfig::default(), cap);
            let params = FrameParams {
                container_width: 1200.0,
                base_scale: 1.0,
                device: DeviceProfile {
                    pixel_ratio: 1.0,
                    ..DeviceProfile::default()
                },
            };
            Self {
                scheduler,
                log,
                params,
            }
        }

        fn schedule(&mut self, targets: &[u32], current: u32) {
            let targets: BTreeSet<u32> = targets.iter().copied().collect();
            self.scheduler.schedule(targets, current, &self.params);
        }

        fn mount_all(&mut self) {
            for page in self.scheduler.take_mount_requests() {
                self.scheduler.attach_surface(page, TestSurface::default());
            }
        }

        fn parked(&self) -> usize {
            self.log.borrow().parked.len()
        }

        fn resolve_next(&mut self) {
            let ticket = self.log.borrow_mut().parked.remove(0);
            ticket.complete();
            self.scheduler.poll(&self.params);
        }

        fn resolve_all(&mut self) {
            while self.parked() > 0 {
                self.resolve_next();
            }
        }

        fn fail_next(&mut self) {
            let ticket = self.log.borrow_mut().parked.remove(0);
            let page = ticket.page();
            ticket.fail(DrawError::new(page, "render backend error"));
            self.scheduler.poll(&self.params);
        }

        fn dispatch_order(&self) -> Vec<u32> {
            self.log.borrow().dispatch_order.clone()
        }
    }

    #[test]
    fn nothing_draws_before_surfaces_attach() {
        let mut h = Harness::new(10, 2);

        h.schedule(&[1, 2, 3], 1);

        assert_eq!(h.parked(), 0);
        assert_eq!(h.scheduler.take_mount_requests(), vec![1, 2, 3]);
        assert!(h.scheduler.take_mount_requests().is_empty());
    }

    #[test]
    fn in_flight_never_exceeds_cap() {
        let mut h = Harness::new(10, 2);
        h.schedule(&[1, 2, 3, 4, 5], 1);
        h.mount_all();

        h.schedule(&[1, 2, 3, 4, 5], 1);
        assert_eq!(h.scheduler.in_flight(), 2);
        assert_eq!(h.parked(), 2);

        // Each completion frees a slot and the pump refills it.
        h.resolve_next();
        assert_eq!(h.scheduler.in_flight(), 2);

        h.resolve_all();
        assert_eq!(h.scheduler.in_flight(), 0);

        let generation = h.scheduler.generation();
        for page in 1..=5 {
            assert_eq!(h.scheduler.rendered_generation(page), Some(generation));
        }
    }

    #[test]
    fn draws_closest_to_current_page_first() {
        let mut h = Harness::new(10, 1);
        h.schedule(&[2, 3, 4, 5, 6, 7], 5);
        h.mount_all();

        h.schedule(&[2, 3, 4, 5, 6, 7], 5);
        h.resolve_all();

        // Distance from page 5, ties to the lower page.
        assert_eq!(h.dispatch_order(), vec![5, 4, 6, 3, 7, 2]);
    }

    #[test]
    fn fresh_pages_are_not_requeued() {
        let mut h = Harness::new(10, 2);
        h.schedule(&[1, 2, 3], 1);
        h.mount_all();
        h.schedule(&[1, 2, 3], 1);
        h.resolve_all();

        let drawn = h.dispatch_order().len();
        h.schedule(&[1, 2, 3], 1);

        assert_eq!(h.parked(), 0);
        assert_eq!(h.dispatch_order().len(), drawn);
    }

    #[test]
    fn leaving_the_target_set_cancels_and_unmounts() {
        let mut h = Harness::new(10, 1);
        h.schedule(&[1, 2, 3], 1);
        h.mount_all();
        h.schedule(&[1, 2, 3], 1);
        assert_eq!(h.parked(), 1);

        h.schedule(&[6, 7, 8], 7);
        assert!(!h.scheduler.is_mounted(1));

        // The cancelled draw resolves without stamping its page.
        h.resolve_next();
        assert_eq!(h.scheduler.rendered_generation(1), None);
        assert_eq!(h.scheduler.in_flight(), 0);

        h.mount_all();
        h.schedule(&[6, 7, 8], 7);
        h.resolve_all();
        assert_eq!(
            h.scheduler.rendered_generation(7),
            Some(h.scheduler.generation())
        );
    }

    #[test]
    fn retargeted_page_is_requeued_while_its_cancellation_is_undrained() {
        let mut h = Harness::new(10, 1);
        h.schedule(&[1, 2, 3], 1);
        h.mount_all();
        h.schedule(&[1, 2, 3], 1);
        assert_eq!(h.parked(), 1);

        // Page 1 leaves the target set (cancelling its draw) and re-enters
        // before the cancelled completion has been drained.
        h.schedule(&[6, 7, 8], 7);
        h.schedule(&[1, 2, 3], 1);
        h.mount_all();
        h.schedule(&[1, 2, 3], 1);

        h.resolve_all();
        assert_eq!(
            h.scheduler.rendered_generation(1),
            Some(h.scheduler.generation())
        );
    }

    #[test]
    fn advancing_the_generation_requeues_rendered_pages() {
        let mut h = Harness::new(5, 2);
        h.schedule(&[1, 2, 3], 1);
        h.mount_all();
        h.schedule(&[1, 2, 3], 1);
        h.resolve_all();

        let old = h.scheduler.generation();
        let new = h.scheduler.advance_generation();
        assert_ne!(old, new);

        h.schedule(&[1, 2, 3], 1);
        h.resolve_all();
        assert_eq!(h.scheduler.rendered_generation(2), Some(new));
    }

    #[test]
    fn cancel_in_flight_leaves_pages_stale() {
        let mut h = Harness::new(5, 2);
        h.schedule(&[1, 2], 1);
        h.mount_all();
        h.schedule(&[1, 2], 1);
        assert_eq!(h.parked(), 2);

        h.scheduler.cancel_in_flight();
        h.resolve_all();

        assert_eq!(h.scheduler.rendered_generation(1), None);
        assert_eq!(h.scheduler.in_flight(), 0);

        // Still stale, so the next pass requeues both.
        h.schedule(&[1, 2], 1);
        assert_eq!(h.parked(), 2);
    }

    #[test]
    fn failures_are_bounded_per_generation() {
        let mut h = Harness::new(3, 1);
        h.schedule(&[1], 1);
        h.mount_all();

        for _ in 0..3 {
            h.schedule(&[1], 1);
            assert_eq!(h.parked(), 1);
            h.fail_next();
        }
        assert!(h.scheduler.is_page_failed(1));

        // Exhausted for this generation.
        h.schedule(&[1], 1);
        assert_eq!(h.parked(), 0);

        // A new generation grants fresh attempts.
        h.scheduler.advance_generation();
        h.schedule(&[1], 1);
        assert_eq!(h.parked(), 1);
        assert!(!h.scheduler.is_page_failed(1));
    }

    #[test]
    fn metadata_error_skips_page_without_marking_it_failed() {
        let mut h = Harness::with_bad_pages(10, 2, &[2]);
        h.schedule(&[1, 2, 3], 1);
        h.mount_all();
        h.schedule(&[1, 2, 3], 1);
        h.resolve_all();

        assert_eq!(h.dispatch_order(), vec![1, 3]);
        assert_eq!(h.scheduler.rendered_generation(2), None);
        assert!(!h.scheduler.is_page_failed(2));
    }

    #[test]
    fn measured_heights_drive_offsets_and_current_page() {
        let mut h = Harness::new(10, 2);
        let estimated = h.scheduler.estimated_height(&h.params);
        assert!(estimated > 0);

        h.schedule(&[1, 2], 1);
        h.mount_all();
        h.schedule(&[1, 2], 1);
        h.resolve_all();

        // Container 1200 over natural 600 doubles the page: 848 → 1696.
        assert_eq!(h.scheduler.placeholder_height(1, &h.params), 1696);
        assert_eq!(h.scheduler.placeholder_height(9, &h.params), estimated);

        let top3 = h.scheduler.page_top(3, &h.params);
        assert!((top3 - 2.0 * 1696.0).abs() < 0.5);

        assert_eq!(h.scheduler.current_page_by_scroll(1700.0, &h.params), Some(2));
    }

    #[test]
    fn surfaces_are_sized_before_the_draw_lands() {
        let mut h = Harness::new(3, 1);
        h.schedule(&[1], 1);
        let page = h.scheduler.take_mount_requests()[0];
        let surface = TestSurface::default();
        h.scheduler.attach_surface(page, surface.clone());

        h.schedule(&[1], 1);
        assert_eq!(h.parked(), 1);

        // Layout, backing, and centering all settle at dispatch.
        let log = surface.log.borrow();
        assert_eq!(log.layout, (1200, 1696));
        assert_eq!(log.backing, (1200, 1696));
        assert!(log.centered);
    }
}
