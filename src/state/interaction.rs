//! Interaction Module - Buttons, indicators, hover and drag
//!
//! Translates discrete input into index changes. Every navigation follows
//! the same sequence: stop autoplay, set the index, restart autoplay, so a
//! manual move always resets the autoplay timer.
//!
//! # Drag
//!
//! ```text
//! down  ─► session starts, autoplay stops, move/up tracked globally
//! move  ─► transition off, strip follows log2-damped offset
//! up    ─► transition on; |dx| > width/2 commits prev/next, else snap back
//! ```
//!
//! While a session is active, autoplay ticks are dropped, so a timer firing
//! mid-drag can never move the index under the pointer.
//!
//! # API
//!
//! - `handle(event)` - dispatch a [`CarouselEvent`], returns true if the
//!   default action should be prevented
//! - `switch_to(action)` / `go_to(index)` - programmatic navigation
//! - `drag_start` / `drag_move` / `drag_end` - pointer phases

use log::{debug, trace};

use super::controller::{DragSession, SlideController};
use crate::engine::{ElementId, Host};
use crate::layout;
use crate::types::{CarouselEvent, ElementFlags, SwitchAction, TRANSITION_MS};

// =============================================================================
// DISPATCH
// =============================================================================

impl<H: Host> SlideController<H> {
    /// Dispatch one input event. Returns true if the event was consumed.
    pub fn handle(&mut self, event: CarouselEvent) -> bool {
        match event {
            CarouselEvent::PointerDown { x } => self.drag_start(x),
            CarouselEvent::PointerMove { x } => self.drag_move(x),
            CarouselEvent::PointerUp { x } => self.drag_end(x),
            CarouselEvent::PointerOver => {
                self.pointer_over();
                false
            }
            CarouselEvent::PointerOut => {
                self.pointer_out();
                false
            }
            CarouselEvent::Click(element) => self.click(element),
            CarouselEvent::Navigate(action) => {
                self.switch_to(action);
                self.slide_count() > 0
            }
            CarouselEvent::Resize { width } => {
                self.resize(width);
                false
            }
        }
    }

    fn click(&mut self, element: ElementId) -> bool {
        // Disabled buttons swallow clicks
        if self.host.flags(element).contains(ElementFlags::DISABLED) {
            return false;
        }
        if Some(element) == self.parts.prev {
            self.switch_to(SwitchAction::Prev);
            true
        } else if Some(element) == self.parts.next {
            self.switch_to(SwitchAction::Next);
            true
        } else {
            self.indicator_click(element)
        }
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

impl<H: Host> SlideController<H> {
    /// Step one slide. Clamped in non-loop mode; may reach a virtual
    /// index in loop mode, which then settles.
    pub fn switch_to(&mut self, action: SwitchAction) {
        if self.slide_count() == 0 {
            return;
        }
        self.stop();
        let target = layout::step(
            self.current_index(),
            action,
            self.slide_count(),
            self.options.looping,
        );
        self.set_index(target);
        self.run();
    }

    /// Jump straight to a real slide. Returns false if out of range.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.slide_count() {
            return false;
        }
        self.stop();
        self.set_index(index as i32);
        self.run();
        true
    }

    /// Navigate to the slide matching the clicked indicator's ordinal.
    pub fn indicator_click(&mut self, element: ElementId) -> bool {
        match self.parts.indicators.iter().position(|&i| i == element) {
            Some(position) => self.go_to(position),
            None => false,
        }
    }

    /// Pointer entered the viewport: pause autoplay.
    pub fn pointer_over(&mut self) {
        self.hovered = true;
        self.stop();
    }

    /// Pointer left the viewport: resume autoplay.
    pub fn pointer_out(&mut self) {
        self.hovered = false;
        self.run();
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }
}

// =============================================================================
// DRAG
// =============================================================================

impl<H: Host> SlideController<H> {
    /// Begin a drag at `x`. No-op unless draggable and non-empty.
    pub fn drag_start(&mut self, x: f32) -> bool {
        if !self.options.draggable || self.slide_count() == 0 {
            return false;
        }
        self.stop();
        self.drag = Some(DragSession { start_x: x });
        debug!("drag start at {x}");
        true
    }

    /// Follow the pointer with the damped offset.
    pub fn drag_move(&mut self, x: f32) -> bool {
        let Some(session) = self.drag else {
            return false;
        };
        self.host.set_transition(self.wrapper, None);
        self.host.flush();

        let offset = layout::damped_offset(x - session.start_x);
        trace!("drag move dx={} offset={offset}", x - session.start_x);
        let x = self.transform_x() - offset;
        self.host.set_translate_x(self.wrapper, -x);
        true
    }

    /// Release the drag: commit past half a slide, else snap back.
    ///
    /// Either way autoplay resumes only if the pointer is not hovering.
    pub fn drag_end(&mut self, x: f32) -> bool {
        let Some(session) = self.drag.take() else {
            return false;
        };
        self.host.set_transition(self.wrapper, Some(TRANSITION_MS));
        self.host.flush();

        let distance = x - session.start_x;
        match layout::drag_commit(distance, self.options.width) {
            Some(action) => {
                debug!("drag commit {action:?} after {distance}px");
                self.switch_to(action);
                if self.hovered {
                    self.stop();
                }
            }
            None => {
                let x = self.transform_x();
                self.host.set_translate_x(self.wrapper, -x);
                if !self.hovered {
                    self.run();
                }
            }
        }
        true
    }

    /// Whether move/up are currently tracked.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MemoryHost;
    use crate::types::{CarouselOptions, SlideSize};

    fn mount(count: usize, options: CarouselOptions) -> SlideController<MemoryHost> {
        let (host, _, _) = MemoryHost::with_slides("#app", count, SlideSize::new(200.0, 100.0));
        SlideController::new(host, "#app", options).expect("mount")
    }

    fn draggable() -> CarouselOptions {
        CarouselOptions::default().with_draggable(true)
    }

    #[test]
    fn test_switch_non_loop_clamps() {
        let mut c = mount(3, CarouselOptions::default());

        c.switch_to(SwitchAction::Prev);
        assert_eq!(c.current_index(), 0);

        c.switch_to(SwitchAction::Next);
        c.switch_to(SwitchAction::Next);
        c.switch_to(SwitchAction::Next);
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_switch_loop_reaches_virtual_then_settles() {
        let mut c = mount(3, CarouselOptions::default().with_loop(true));

        c.switch_to(SwitchAction::Prev);
        assert_eq!(c.current_index(), -1);
        c.advance(200).unwrap();
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_switch_restarts_autoplay_timer() {
        let mut c = mount(3, CarouselOptions::default().with_autoplay(true).with_delay(1000));

        c.advance(900).unwrap();
        c.switch_to(SwitchAction::Next);
        assert_eq!(c.current_index(), 1);

        // Old tick at 1000 is gone; next one is 1000ms after the click
        c.advance(900).unwrap();
        assert_eq!(c.current_index(), 1);
        c.advance(100).unwrap();
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_click_buttons() {
        let mut c = mount(3, CarouselOptions::default());
        let (prev, next) = (c.prev_button().unwrap(), c.next_button().unwrap());

        // prev is disabled at 0
        assert!(!c.handle(CarouselEvent::Click(prev)));
        assert!(c.handle(CarouselEvent::Click(next)));
        assert_eq!(c.current_index(), 1);
        assert!(c.handle(CarouselEvent::Click(prev)));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_click_indicator_jumps() {
        let mut c = mount(4, CarouselOptions::default().with_loop(true));
        let third = c.indicators()[2];

        assert!(c.handle(CarouselEvent::Click(third)));
        assert_eq!(c.current_index(), 2);
        assert!(c.host().flags(third).contains(ElementFlags::ACTIVE));
    }

    #[test]
    fn test_click_elsewhere_ignored() {
        let mut c = mount(3, CarouselOptions::default());
        let slide = c.slides()[1];

        assert!(!c.handle(CarouselEvent::Click(slide)));
        assert_eq!(c.current_index(), 0);
    }

    #[test]
    fn test_go_to_out_of_range() {
        let mut c = mount(3, CarouselOptions::default());
        assert!(!c.go_to(3));
        assert!(c.go_to(2));
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_hover_pauses_and_resumes() {
        let mut c = mount(3, CarouselOptions::default().with_autoplay(true).with_delay(100));

        c.handle(CarouselEvent::PointerOver);
        assert!(!c.is_running());
        c.advance(1000).unwrap();
        assert_eq!(c.current_index(), 0);

        c.handle(CarouselEvent::PointerOut);
        assert!(c.is_running());
        c.advance(100).unwrap();
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn test_drag_requires_draggable() {
        let mut c = mount(3, CarouselOptions::default());

        assert!(!c.handle(CarouselEvent::PointerDown { x: 100.0 }));
        assert!(!c.is_dragging());
        assert!(!c.handle(CarouselEvent::PointerMove { x: 10.0 }));
        assert!(!c.handle(CarouselEvent::PointerUp { x: 10.0 }));
    }

    #[test]
    fn test_drag_move_damped_follow() {
        let mut c = mount(3, draggable());
        c.go_to(1);

        assert!(c.handle(CarouselEvent::PointerDown { x: 100.0 }));
        assert!(c.handle(CarouselEvent::PointerMove { x: 108.0 }));

        // transform 200, dragging right by 8 pulls the strip back by 75
        assert_eq!(c.host().transition(c.wrapper()), None);
        assert!((c.host().translate_x(c.wrapper()) + 125.0).abs() < 1e-3);
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn test_drag_release_at_half_width_snaps_back() {
        let mut c = mount(3, draggable());
        c.go_to(1);

        c.handle(CarouselEvent::PointerDown { x: 300.0 });
        c.handle(CarouselEvent::PointerMove { x: 200.0 });
        c.handle(CarouselEvent::PointerUp { x: 200.0 });

        assert_eq!(c.current_index(), 1);
        assert_eq!(c.host().translate_x(c.wrapper()), -200.0);
        assert_eq!(c.host().transition(c.wrapper()), Some(TRANSITION_MS));
        assert!(!c.is_dragging());
    }

    #[test]
    fn test_drag_release_past_half_width_commits() {
        let mut c = mount(3, draggable());
        c.go_to(1);

        c.handle(CarouselEvent::PointerDown { x: 300.0 });
        c.handle(CarouselEvent::PointerUp { x: 199.0 });
        assert_eq!(c.current_index(), 2);

        c.handle(CarouselEvent::PointerDown { x: 100.0 });
        c.handle(CarouselEvent::PointerUp { x: 201.0 });
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn test_drag_end_releases_listeners() {
        let mut c = mount(3, draggable());

        c.handle(CarouselEvent::PointerDown { x: 0.0 });
        assert!(c.is_dragging());
        c.handle(CarouselEvent::PointerUp { x: 0.0 });
        assert!(!c.is_dragging());

        // Moves after release are not tracked
        let writes = c.host().translate_writes();
        assert!(!c.handle(CarouselEvent::PointerMove { x: 50.0 }));
        assert_eq!(c.host().translate_writes(), writes);
    }

    #[test]
    fn test_autoplay_tick_dropped_during_drag() {
        let mut c = mount(
            3,
            draggable().with_autoplay(true).with_delay(100),
        );

        c.handle(CarouselEvent::PointerDown { x: 0.0 });
        assert!(!c.is_running());

        // Leaving the viewport mid-drag restarts autoplay, but ticks are dropped
        c.handle(CarouselEvent::PointerOut);
        assert!(c.is_running());
        c.advance(500).unwrap();
        assert_eq!(c.current_index(), 0);

        c.handle(CarouselEvent::PointerUp { x: 0.0 });
        c.advance(100).unwrap();
        assert_eq!(c.current_index(), 1);
    }

    #[test]
    fn test_snap_back_resumes_autoplay_unless_hovered() {
        let mut c = mount(3, draggable().with_autoplay(true));

        c.handle(CarouselEvent::PointerOver);
        c.handle(CarouselEvent::PointerDown { x: 0.0 });
        c.handle(CarouselEvent::PointerUp { x: 10.0 });
        assert!(!c.is_running());

        c.handle(CarouselEvent::PointerOut);
        c.handle(CarouselEvent::PointerDown { x: 0.0 });
        c.handle(CarouselEvent::PointerUp { x: 10.0 });
        assert!(c.is_running());
    }

    #[test]
    fn test_drag_commit_resumes_autoplay_unless_hovered() {
        let mut c = mount(3, draggable().with_autoplay(true));

        c.handle(CarouselEvent::PointerOver);
        c.handle(CarouselEvent::PointerDown { x: 300.0 });
        c.handle(CarouselEvent::PointerUp { x: 0.0 });
        assert_eq!(c.current_index(), 1);
        assert!(!c.is_running());

        c.handle(CarouselEvent::PointerOut);
        c.handle(CarouselEvent::PointerDown { x: 300.0 });
        c.handle(CarouselEvent::PointerUp { x: 0.0 });
        assert_eq!(c.current_index(), 2);
        assert!(c.is_running());
    }

    #[test]
    fn test_navigation_during_jump_wins() {
        let mut c = mount(3, CarouselOptions::default().with_loop(true));
        c.go_to(2);
        c.switch_to(SwitchAction::Next);
        assert_eq!(c.current_index(), 3);

        c.advance(100).unwrap();
        let second = c.indicators()[1];
        c.handle(CarouselEvent::Click(second));
        c.advance(150).unwrap();
        assert_eq!(c.current_index(), 1);

        c.switch_to(SwitchAction::Next);
        c.switch_to(SwitchAction::Next);
        assert_eq!(c.current_index(), 3);
        c.advance(100).unwrap();
        c.switch_to(SwitchAction::Prev);
        c.advance(1000).unwrap();
        assert_eq!(c.current_index(), 2);
    }

    #[test]
    fn test_restore_skipped_during_drag() {
        let mut c = mount(3, draggable().with_loop(true));

        c.switch_to(SwitchAction::Next);
        c.switch_to(SwitchAction::Next);
        c.switch_to(SwitchAction::Next);
        assert_eq!(c.current_index(), 3);

        c.handle(CarouselEvent::PointerDown { x: 0.0 });
        c.advance(250).unwrap();

        // Settle still applied (equivalent position), transition left off
        assert_eq!(c.current_index(), 0);
        assert_eq!(c.host().transition(c.wrapper()), None);

        c.handle(CarouselEvent::PointerUp { x: 0.0 });
        assert_eq!(c.host().transition(c.wrapper()), Some(TRANSITION_MS));
    }

    #[test]
    fn test_navigate_event() {
        let mut c = mount(3, CarouselOptions::default());
        assert!(c.handle(CarouselEvent::Navigate(SwitchAction::Next)));
        assert_eq!(c.current_index(), 1);

        let mut empty = mount(0, CarouselOptions::default());
        assert!(!empty.handle(CarouselEvent::Navigate(SwitchAction::Next)));
    }
}
