//! # spark-carousel
//!
//! Headless carousel core for Rust.
//!
//! Slide index state machine, strip geometry, autoplay, loop wrap-around,
//! drag and responsive resizing, all driven through a [`Host`] trait so the
//! same controller runs against a browser bridge, a terminal, or the
//! bundled in-memory host. The current index is a
//! [spark-signals](https://github.com/RLabs-Inc/spark-signals) signal.
//!
//! ## Architecture
//!
//! ```text
//! input events ─► SlideController::handle ─┐
//! elapsed time ─► SlideController::advance ┼─► set_index ─► transform + indicators + buttons
//! host events  ─► SlideController::pump ───┘
//! ```
//!
//! Single-threaded and non-blocking: deferrals (autoplay interval, the two
//! steps of a loop jump) live on a virtual clock the embedder advances.
//!
//! ## Modules
//!
//! - [`types`] - Options, roles, flags, events, constants
//! - [`engine`] - Host trait, in-memory host, timer queue
//! - [`layout`] - Strip geometry and Taffy slide measurement
//! - [`state`] - The slide controller
//! - [`input`] - crossterm event adapter

pub mod engine;
pub mod error;
pub mod input;
pub mod layout;
pub mod state;
pub mod types;

pub use types::*;

pub use engine::{ElementId, Host, HostEvent, MemoryHost, Target, TimerId, TimerQueue};

pub use error::{ConfigurationError, Result};

pub use layout::{Extent, SlideStyle, measure_slide};

pub use state::SlideController;

pub use input::{TerminalInput, Viewport};
