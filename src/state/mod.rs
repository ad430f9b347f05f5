//! State Module - The slide controller
//!
//! - **Controller** - index state, geometry sync, loop jumps, autoplay,
//!   resize, rebuild on structural change
//! - **Interaction** - buttons, indicators, hover, drag, event dispatch

mod controller;
mod interaction;

pub use controller::SlideController;
