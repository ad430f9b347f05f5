//! Core Types - Options, roles, flags, events
//!
//! Everything the controller, the host and the input adapter agree on.
//! No logic lives here beyond small conversions.

// =============================================================================
// Constants
// =============================================================================

/// Class prefix shared by every generated element.
pub const CLASS_PREFIX: &str = "carousel__";

/// Duration of the slide transition in milliseconds.
pub const TRANSITION_MS: u32 = 200;

/// Delay before the transition is re-enabled after a jump.
pub const TRANSITION_RESTORE_MS: u64 = 50;

/// Lower bound for the autoplay delay.
pub const MIN_DELAY_MS: u64 = 50;

/// Default autoplay delay.
pub const DEFAULT_DELAY_MS: u64 = 2000;

/// Scale applied to `log2(|dx|)` while dragging.
pub const DRAG_DAMPING: f32 = 25.0;

// =============================================================================
// Options
// =============================================================================

/// Indicator rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Indicator {
    /// No indicators are built.
    None,
    /// Plain dots.
    #[default]
    Dot,
    /// Dots labelled 1..=N.
    Number,
}

/// Carousel configuration.
///
/// Immutable after construction except for `width`/`height`, which the
/// controller fills in when they are zero and rewrites on resize.
///
/// ```ignore
/// let opts = CarouselOptions::default()
///     .with_loop(true)
///     .with_autoplay(true)
///     .with_delay(1000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct CarouselOptions {
    /// Slide width in pixels. 0 = measure the first slide.
    pub width: f32,
    /// Slide height in pixels. 0 = measure the first slide.
    pub height: f32,
    pub autoplay: bool,
    /// Autoplay delay in milliseconds (floored at [`MIN_DELAY_MS`]).
    pub delay: u64,
    #[cfg_attr(feature = "serde", serde(rename = "loop"))]
    pub looping: bool,
    pub draggable: bool,
    pub indicator: Indicator,
    pub nav_button: bool,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            autoplay: false,
            delay: DEFAULT_DELAY_MS,
            looping: false,
            draggable: false,
            indicator: Indicator::Dot,
            nav_button: true,
        }
    }
}

impl CarouselOptions {
    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn with_delay(mut self, delay: u64) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn with_indicator(mut self, indicator: Indicator) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn with_nav_button(mut self, nav_button: bool) -> Self {
        self.nav_button = nav_button;
        self
    }

    /// Autoplay interval actually used by the scheduler.
    pub fn effective_delay(&self) -> u64 {
        self.delay.max(MIN_DELAY_MS)
    }
}

/// Direction for button and drag navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchAction {
    Prev,
    Next,
}

/// Measured or configured slide size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlideSize {
    pub width: f32,
    pub height: f32,
}

impl SlideSize {
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

// =============================================================================
// Roles (class contract)
// =============================================================================

/// Structural role of an element. Maps one-to-one onto the class contract
/// a markup layer uses to style and locate the generated parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Host-provided element with no carousel role yet.
    #[default]
    Plain,
    Wrapper,
    Slide,
    ButtonWrapper,
    PrevButton,
    NextButton,
    IndicatorWrapper,
    Indicator,
}

impl Role {
    /// Class name for this role, `None` for [`Role::Plain`].
    pub fn class_name(self) -> Option<&'static str> {
        match self {
            Role::Plain => None,
            Role::Wrapper => Some("carousel__wrapper"),
            Role::Slide => Some("carousel__slide"),
            Role::ButtonWrapper => Some("carousel__btn-wrapper"),
            Role::PrevButton => Some("carousel__btn-switch-prev"),
            Role::NextButton => Some("carousel__btn-switch-next"),
            Role::IndicatorWrapper => Some("carousel__indicator-wrapper"),
            Role::Indicator => Some("carousel__indicator"),
        }
    }
}

// =============================================================================
// Element Flags (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// State toggles the controller applies to elements.
    ///
    /// Combine with bitwise OR: `ElementFlags::SLIDE | ElementFlags::CLONE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        const NONE = 0;
        /// Loop padding copy of a real slide.
        const CLONE = 1 << 0;
        /// Highlighted indicator.
        const ACTIVE = 1 << 1;
        /// Disabled button.
        const DISABLED = 1 << 2;
        /// Dot indicator modifier.
        const DOT = 1 << 3;
        /// Number indicator modifier.
        const NUMBER = 1 << 4;
    }
}

impl ElementFlags {
    /// Class names contributed by these flags, in bit order.
    pub fn class_names(self) -> Vec<String> {
        let mut names = Vec::new();
        if self.contains(Self::CLONE) {
            names.push(format!("{CLASS_PREFIX}clone"));
        }
        if self.contains(Self::ACTIVE) {
            names.push(format!("{CLASS_PREFIX}indicator-active"));
        }
        if self.contains(Self::DISABLED) {
            names.push("disabled".to_string());
        }
        if self.contains(Self::DOT) {
            names.push(format!("{CLASS_PREFIX}indicator-dot"));
        }
        if self.contains(Self::NUMBER) {
            names.push(format!("{CLASS_PREFIX}indicator-number"));
        }
        names
    }
}

// =============================================================================
// Events
// =============================================================================

/// Discrete input delivered to [`crate::SlideController::handle`].
///
/// Pointer coordinates are horizontal pixels in any consistent frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarouselEvent {
    /// Pointer pressed on the slide viewport.
    PointerDown { x: f32 },
    /// Pointer moved anywhere in the document.
    PointerMove { x: f32 },
    /// Pointer released anywhere in the document.
    PointerUp { x: f32 },
    /// Pointer entered the slide viewport.
    PointerOver,
    /// Pointer left the slide viewport.
    PointerOut,
    /// Click on an element (button, indicator, anything else is ignored).
    Click(crate::engine::ElementId),
    /// Direct prev/next request (keyboard).
    Navigate(SwitchAction),
    /// Container width changed.
    Resize { width: f32 },
}
