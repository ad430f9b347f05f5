//! Slide Controller - Index state, geometry sync and lifecycle
//!
//! Owns the host, the timer queue and the current index. Every index
//! change goes through [`SlideController::set_index`], which writes the
//! strip transform and re-syncs indicators and buttons in one pass.
//!
//! # Loop jumps
//!
//! In loop mode the strip is `[clone(last), s0 .. sN-1, clone(first)]`.
//! Navigation may land on the virtual indices `-1` or `N`; the controller
//! then schedules a settle after the transition:
//!
//! ```text
//! t=0     index N   (animated onto clone(first))
//! t=200   transition off, flush, index 0 (same picture, no motion)
//! t=250   transition back on
//! ```
//!
//! # Lifecycle
//!
//! - `new` resolves container + wrapper, builds clones/buttons/indicators,
//!   observes size and child list, sets index 0, starts autoplay
//! - child-list changes tear everything down and rebuild (index back to 0)
//! - `destroy` tears down and hands the host back

use log::{debug, trace};
use spark_signals::{Signal, signal};

use crate::engine::{ElementId, Host, HostEvent, Target, TimerId, TimerQueue};
use crate::error::{ConfigurationError, Result};
use crate::layout;
use crate::types::{
    CarouselOptions, ElementFlags, Indicator, Role, SlideSize, SwitchAction, TRANSITION_MS,
    TRANSITION_RESTORE_MS,
};

// =============================================================================
// TYPES
// =============================================================================

/// Deferred work on the controller's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Task {
    AutoplayTick,
    /// Instant re-snap from a virtual index onto `target`.
    Settle { target: i32 },
    RestoreTransition,
}

/// Generated parts located at init.
#[derive(Debug, Clone, Default)]
pub(super) struct Parts {
    /// Real slides, in order.
    pub(super) slides: Vec<ElementId>,
    /// Loop padding: `[clone(last), clone(first)]` when looping.
    pub(super) clones: Vec<ElementId>,
    pub(super) button_wrapper: Option<ElementId>,
    pub(super) prev: Option<ElementId>,
    pub(super) next: Option<ElementId>,
    pub(super) indicator_wrapper: Option<ElementId>,
    pub(super) indicators: Vec<ElementId>,
}

/// An active pointer drag. Present exactly while move/up are being tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct DragSession {
    pub(super) start_x: f32,
}

/// The carousel state machine.
///
/// ```ignore
/// let (host, _, _) = MemoryHost::with_slides("#app", 3, SlideSize::new(200.0, 100.0));
/// let mut carousel = SlideController::new(host, "#app", CarouselOptions::default())?;
///
/// carousel.switch_to(SwitchAction::Next);
/// assert_eq!(carousel.current_index(), 1);
/// ```
pub struct SlideController<H: Host> {
    pub(super) host: H,
    pub(super) options: CarouselOptions,
    pub(super) container: ElementId,
    pub(super) wrapper: ElementId,
    pub(super) parts: Parts,
    index: Signal<i32>,
    pub(super) timers: TimerQueue<Task>,
    autoplay: Option<TimerId>,
    /// Scheduled settle and the index it lands on.
    pending_jump: Option<(TimerId, i32)>,
    pending_restore: Option<TimerId>,
    pub(super) drag: Option<DragSession>,
    pub(super) hovered: bool,
    observing_children: bool,
}

// =============================================================================
// CONSTRUCTION
// =============================================================================

impl<H: Host> SlideController<H> {
    /// Mount a carousel on the container named by `target`.
    ///
    /// Fails before touching the host if the container does not resolve or
    /// has no wrapper child.
    pub fn new(host: H, target: impl Into<Target>, options: CarouselOptions) -> Result<Self> {
        let target = target.into();
        let container = host
            .resolve(&target)
            .ok_or_else(|| ConfigurationError::HostNotFound(target.to_string()))?;
        let wrapper = host
            .first_child(container)
            .ok_or(ConfigurationError::MissingWrapper(container))?;

        let mut controller = Self {
            host,
            options,
            container,
            wrapper,
            parts: Parts::default(),
            index: signal(0),
            timers: TimerQueue::new(),
            autoplay: None,
            pending_jump: None,
            pending_restore: None,
            drag: None,
            hovered: false,
            observing_children: false,
        };
        controller.init(true)?;
        Ok(controller)
    }

    fn init(&mut self, observe_size: bool) -> Result<()> {
        self.wrapper = self
            .host
            .first_child(self.container)
            .ok_or(ConfigurationError::MissingWrapper(self.container))?;

        self.init_dom();
        if observe_size {
            self.host.observe_size(self.container);
        }
        self.observe_structure();

        self.set_index(0);
        self.run();
        debug!(
            "carousel mounted: {} slides, {}x{}, loop={}",
            self.slide_count(),
            self.options.width,
            self.options.height,
            self.options.looping
        );
        Ok(())
    }

    fn init_dom(&mut self) {
        let wrapper = self.wrapper;
        let slides = self.host.children(wrapper);

        if let Some(&first) = slides.first() {
            if self.options.width <= 0.0 || self.options.height <= 0.0 {
                let measured = self.host.measure(first);
                if self.options.width <= 0.0 {
                    self.options.width = measured.width;
                }
                if self.options.height <= 0.0 {
                    self.options.height = measured.height;
                }
            }
        }
        let size = self.slide_size();

        let mut clones = Vec::new();
        if let (true, Some(&first), Some(&last)) =
            (self.options.looping, slides.first(), slides.last())
        {
            let head = self.host.clone_element(first);
            let tail = self.host.clone_element(last);
            self.host.add_flags(head, ElementFlags::CLONE);
            self.host.add_flags(tail, ElementFlags::CLONE);
            self.host.insert_child(wrapper, tail, 0);
            self.host.append_child(wrapper, head);
            clones = vec![tail, head];
        }

        for &slot in clones.iter().chain(&slides) {
            self.host.set_role(slot, Role::Slide);
            self.host.set_size(slot, size);
        }

        let strip = self.strip_width_for(slides.len());
        self.host.set_role(wrapper, Role::Wrapper);
        self.host.set_size(wrapper, SlideSize::new(strip, size.height));
        self.host.set_transition(wrapper, Some(TRANSITION_MS));

        let mut parts = Parts {
            slides,
            clones,
            ..Default::default()
        };

        if self.options.nav_button {
            let button_wrapper = self.host.create_element(Role::ButtonWrapper);
            let prev = self.host.create_element(Role::PrevButton);
            let next = self.host.create_element(Role::NextButton);
            self.host.append_child(button_wrapper, prev);
            self.host.append_child(button_wrapper, next);
            self.host.append_child(self.container, button_wrapper);
            parts.button_wrapper = Some(button_wrapper);
            parts.prev = Some(prev);
            parts.next = Some(next);
        }

        if self.options.indicator != Indicator::None {
            let indicator_wrapper = self.host.create_element(Role::IndicatorWrapper);
            let modifier = match self.options.indicator {
                Indicator::Number => ElementFlags::NUMBER,
                _ => ElementFlags::DOT,
            };
            for position in 0..parts.slides.len() {
                let indicator = self.host.create_element(Role::Indicator);
                self.host.add_flags(indicator, modifier);
                if self.options.indicator == Indicator::Number {
                    self.host.set_label(indicator, &(position + 1).to_string());
                }
                self.host.append_child(indicator_wrapper, indicator);
                parts.indicators.push(indicator);
            }
            self.host.append_child(self.container, indicator_wrapper);
            parts.indicator_wrapper = Some(indicator_wrapper);
        }

        self.parts = parts;
    }

    /// Remove everything `init_dom` generated.
    fn reset_dom(&mut self) {
        let wrapper = self.wrapper;
        for child in self.host.children(wrapper) {
            if self.host.flags(child).contains(ElementFlags::CLONE) {
                self.host.discard_child(wrapper, child);
            }
        }
        if let Some(button_wrapper) = self.parts.button_wrapper {
            self.host.discard_child(self.container, button_wrapper);
        }
        if let Some(indicator_wrapper) = self.parts.indicator_wrapper {
            self.host.discard_child(self.container, indicator_wrapper);
        }
        self.parts = Parts::default();
        self.drag = None;
        self.hovered = false;
    }

    fn observe_structure(&mut self) {
        if !self.observing_children {
            self.host.observe_children(self.wrapper);
            self.observing_children = true;
        }
    }

    fn unobserve_structure(&mut self) {
        if self.observing_children {
            self.host.unobserve_children(self.wrapper);
            self.observing_children = false;
        }
    }

    /// Tear down and rebuild after the slide set changed.
    ///
    /// The child-list observer stays disconnected for the whole rebuild so
    /// the controller's own clone edits are never reported back to it.
    fn rebuild(&mut self) -> Result<()> {
        debug!("slide set changed, rebuilding");
        self.stop();
        self.cancel_jump();
        self.unobserve_structure();
        self.reset_dom();
        self.init(false)
    }

    /// Stop everything, remove generated parts and return the host.
    pub fn destroy(mut self) -> H {
        self.stop();
        self.cancel_jump();
        self.unobserve_structure();
        self.reset_dom();
        self.timers.clear_all();
        self.host
    }
}

// =============================================================================
// INDEX STATE & GEOMETRY
// =============================================================================

impl<H: Host> SlideController<H> {
    /// Current index. May transiently be `-1` or `N` in loop mode.
    pub fn current_index(&self) -> i32 {
        self.index.get()
    }

    /// Reactive handle on the current index.
    pub fn index_signal(&self) -> Signal<i32> {
        self.index.clone()
    }

    /// Number of real slides (clones excluded).
    pub fn slide_count(&self) -> usize {
        self.parts.slides.len()
    }

    pub fn slide_size(&self) -> SlideSize {
        SlideSize::new(self.options.width, self.options.height)
    }

    /// Leftward strip translation for the current index.
    pub fn transform_x(&self) -> f32 {
        layout::transform_x(self.current_index(), self.options.looping, self.options.width)
    }

    fn strip_width_for(&self, slide_count: usize) -> f32 {
        layout::strip_width(slide_count, self.options.looping, self.options.width)
    }

    /// Set the index and re-render once: transform, indicators, buttons.
    ///
    /// No clamping happens here; callers pass an index inside the
    /// navigation bounds.
    pub(super) fn set_index(&mut self, index: i32) {
        let previous = self.index.get();
        if previous != index {
            debug!("index {previous} -> {index}");
        }
        self.index.set(index);
        self.sync_state();
    }

    fn sync_state(&mut self) {
        self.apply_transform();

        let index = self.current_index();
        for (position, &indicator) in self.parts.indicators.iter().enumerate() {
            if position as i32 == index {
                self.host.add_flags(indicator, ElementFlags::ACTIVE);
            } else {
                self.host.remove_flags(indicator, ElementFlags::ACTIVE);
            }
        }

        if !self.options.looping {
            let last = self.slide_count() as i32 - 1;
            set_flag(&mut self.host, self.parts.prev, ElementFlags::DISABLED, index <= 0);
            set_flag(&mut self.host, self.parts.next, ElementFlags::DISABLED, index >= last);
        }
    }

    /// Write the transform, then schedule a settle when on a virtual index
    /// or drop a stale one when back on a real index.
    pub(super) fn apply_transform(&mut self) {
        let x = self.transform_x();
        self.host.set_translate_x(self.wrapper, -x);

        match layout::settle_target(self.current_index(), self.slide_count(), self.options.looping)
        {
            Some(target) => self.schedule_settle(target),
            None => self.cancel_settle(),
        }
    }

    /// A settle already heading for `target` keeps its deadline.
    fn schedule_settle(&mut self, target: i32) {
        if matches!(self.pending_jump, Some((_, pending)) if pending == target) {
            return;
        }
        self.cancel_settle();
        let id = self
            .timers
            .set_timeout(u64::from(TRANSITION_MS), Task::Settle { target });
        self.pending_jump = Some((id, target));
    }

    fn cancel_settle(&mut self) {
        if let Some((id, target)) = self.pending_jump.take() {
            trace!("settle to {target} cancelled");
            self.timers.clear(id);
        }
    }

    fn cancel_jump(&mut self) {
        self.cancel_settle();
        if let Some(id) = self.pending_restore.take() {
            self.timers.clear(id);
        }
    }

    fn settle(&mut self, target: i32) {
        self.pending_jump = None;
        debug!("jump {} -> {target}", self.current_index());

        self.host.set_transition(self.wrapper, None);
        self.host.flush();
        self.set_index(target);

        if let Some(id) = self.pending_restore.take() {
            self.timers.clear(id);
        }
        self.pending_restore = Some(
            self.timers
                .set_timeout(TRANSITION_RESTORE_MS, Task::RestoreTransition),
        );
    }

    fn restore_transition(&mut self) {
        self.pending_restore = None;
        if self.drag.is_some() {
            trace!("transition restore skipped during drag");
            return;
        }
        self.host.flush();
        self.host.set_transition(self.wrapper, Some(TRANSITION_MS));
    }

    pub fn has_pending_jump(&self) -> bool {
        self.pending_jump.is_some()
    }
}

fn set_flag<H: Host>(host: &mut H, element: Option<ElementId>, flag: ElementFlags, on: bool) {
    let Some(element) = element else {
        return;
    };
    if on {
        host.add_flags(element, flag);
    } else {
        host.remove_flags(element, flag);
    }
}

// =============================================================================
// AUTOPLAY
// =============================================================================

impl<H: Host> SlideController<H> {
    /// (Re)start autoplay if enabled. Always restarts the interval.
    pub fn run(&mut self) {
        self.stop();
        if self.options.autoplay && self.slide_count() > 0 {
            let delay = self.options.effective_delay();
            self.autoplay = Some(self.timers.set_interval(delay, Task::AutoplayTick));
        }
    }

    /// Cancel autoplay. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(id) = self.autoplay.take() {
            self.timers.clear(id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.autoplay.is_some()
    }

    fn autoplay_tick(&mut self) {
        if self.drag.is_some() {
            trace!("autoplay tick dropped during drag");
            return;
        }
        if self.pending_jump.is_some() {
            trace!("autoplay tick dropped while a jump is pending");
            return;
        }
        let next = layout::step(
            self.current_index(),
            SwitchAction::Next,
            self.slide_count(),
            self.options.looping,
        );
        self.set_index(next);
    }
}

// =============================================================================
// RESIZE & EVENT LOOP
// =============================================================================

impl<H: Host> SlideController<H> {
    /// Apply a new container width, keeping the slide aspect ratio.
    ///
    /// Autoplay resumes afterwards only in loop mode.
    pub fn resize(&mut self, width: f32) {
        self.stop();
        let size = layout::rescale(self.slide_size(), width);
        debug!("resize to {}x{}", size.width, size.height);
        self.options.width = size.width;
        self.options.height = size.height;

        let strip = self.strip_width_for(self.slide_count());
        self.host
            .set_size(self.wrapper, SlideSize::new(strip, size.height));
        for slot in self.host.children(self.wrapper) {
            if self.host.role(slot) == Role::Slide {
                self.host.set_size(slot, size);
            }
        }
        self.apply_transform();

        if self.options.looping {
            self.run();
        }
    }

    /// Drain host notifications.
    ///
    /// Any number of child-list changes in one batch cause a single rebuild.
    pub fn pump(&mut self) -> Result<()> {
        let mut structure_changed = false;
        for event in self.host.poll_events() {
            match event {
                HostEvent::Resized { width } => self.resize(width),
                HostEvent::ChildrenChanged { added, removed } => {
                    structure_changed |= added + removed > 0;
                }
            }
        }
        if structure_changed {
            self.rebuild()?;
        }
        Ok(())
    }

    /// Let `ms` milliseconds pass, firing due timers in order.
    pub fn advance(&mut self, ms: u64) -> Result<()> {
        self.pump()?;
        let until = self.timers.now() + ms;
        while let Some(task) = self.timers.pop_due(until) {
            trace!("task {task:?} at {}ms", self.timers.now());
            match task {
                Task::AutoplayTick => self.autoplay_tick(),
                Task::Settle { target } => self.settle(target),
                Task::RestoreTransition => self.restore_transition(),
            }
            self.pump()?;
        }
        self.timers.advance_to(until);
        Ok(())
    }

    /// Controller clock in milliseconds.
    pub fn now(&self) -> u64 {
        self.timers.now()
    }
}

// =============================================================================
// ACCESSORS
// =============================================================================

impl<H: Host> SlideController<H> {
    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable host access for the embedding page (adding slides etc).
    ///
    /// Structural edits made here are picked up on the next `pump`/`advance`.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn wrapper(&self) -> ElementId {
        self.wrapper
    }

    pub fn slides(&self) -> &[ElementId] {
        &self.parts.slides
    }

    pub fn clones(&self) -> &[ElementId] {
        &self.parts.clones
    }

    pub fn prev_button(&self) -> Option<ElementId> {
        self.parts.prev
    }

    pub fn next_button(&self) -> Option<ElementId> {
        self.parts.next
    }

    pub fn indicators(&self) -> &[ElementId] {
        &self.parts.indicators
    }
}
