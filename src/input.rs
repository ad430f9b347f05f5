//! Input Module - crossterm event conversion
//!
//! Turns terminal events into [`CarouselEvent`]s for
//! [`SlideController::handle`](crate::SlideController::handle).
//!
//! # Mapping
//!
//! - Left button down inside the viewport → `PointerDown`
//! - Left button drag anywhere → `PointerMove`
//! - Left button up anywhere → `PointerUp`
//! - Pointer crossing the viewport edge → `PointerOver` / `PointerOut`
//! - Terminal resize → `Resize` (columns × cell width)
//! - `←` / `→` key press → `Navigate(Prev | Next)`
//!
//! Horizontal pixel positions are `column * cell_width`.
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::input::{poll_event, TerminalInput, Viewport};
//! use std::time::Duration;
//!
//! let mut input = TerminalInput::new(Viewport::new(0, 0, 80, 10), 8.0);
//! loop {
//!     if let Some(event) = poll_event(Duration::from_millis(16))? {
//!         for e in input.convert(&event) {
//!             carousel.handle(e);
//!         }
//!     }
//!     carousel.advance(16)?;
//! }
//! ```

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEventKind,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind, poll,
    read,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use crate::types::{CarouselEvent, SwitchAction};

// =============================================================================
// VIEWPORT
// =============================================================================

/// Terminal cells occupied by the slide viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub column: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(column: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            column,
            row,
            width,
            height,
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        column >= self.column
            && row >= self.row
            && (column - self.column) < self.width
            && (row - self.row) < self.height
    }
}

// =============================================================================
// CONVERTER
// =============================================================================

/// Stateful converter: remembers whether the pointer is over the viewport
/// so crossing events come out exactly once.
#[derive(Debug, Clone)]
pub struct TerminalInput {
    viewport: Viewport,
    cell_width: f32,
    inside: bool,
}

impl TerminalInput {
    pub fn new(viewport: Viewport, cell_width: f32) -> Self {
        Self {
            viewport,
            cell_width,
            inside: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Horizontal pixel position of a column.
    pub fn to_px(&self, column: u16) -> f32 {
        f32::from(column) * self.cell_width
    }

    /// Convert one terminal event. May yield zero, one or two events.
    pub fn convert(&mut self, event: &CrosstermEvent) -> Vec<CarouselEvent> {
        match event {
            CrosstermEvent::Mouse(mouse) => self.convert_mouse(mouse),
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Left => vec![CarouselEvent::Navigate(SwitchAction::Prev)],
                KeyCode::Right => vec![CarouselEvent::Navigate(SwitchAction::Next)],
                _ => Vec::new(),
            },
            CrosstermEvent::Resize(columns, _) => vec![CarouselEvent::Resize {
                width: self.to_px(*columns),
            }],
            _ => Vec::new(),
        }
    }

    fn convert_mouse(&mut self, mouse: &CrosstermMouseEvent) -> Vec<CarouselEvent> {
        let mut events = Vec::new();

        let inside = self.viewport.contains(mouse.column, mouse.row);
        if inside != self.inside {
            self.inside = inside;
            events.push(if inside {
                CarouselEvent::PointerOver
            } else {
                CarouselEvent::PointerOut
            });
        }

        let x = self.to_px(mouse.column);
        match mouse.kind {
            MouseEventKind::Down(CrosstermMouseButton::Left) if inside => {
                events.push(CarouselEvent::PointerDown { x });
            }
            MouseEventKind::Drag(CrosstermMouseButton::Left) => {
                events.push(CarouselEvent::PointerMove { x });
            }
            MouseEventKind::Up(CrosstermMouseButton::Left) => {
                events.push(CarouselEvent::PointerUp { x });
            }
            _ => {}
        }
        events
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<CrosstermEvent>> {
    if poll(timeout)? {
        Ok(Some(read()?))
    } else {
        Ok(None)
    }
}

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================
