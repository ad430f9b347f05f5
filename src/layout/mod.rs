//! Layout Module - Strip geometry and slide measurement
//!
//! - **geometry** - pure functions from (index, slide size, loop) to pixels
//! - **measure** - Taffy-backed measurement of a slide inside its container
//!
//! # Example
//!
//! ```ignore
//! use spark_carousel::layout::{transform_x, measure_slide, SlideStyle};
//!
//! let x = transform_x(2, true, 320.0); // 960.0
//! ```

mod geometry;
mod measure;

pub use geometry::*;
pub use measure::{Extent, SlideStyle, measure_slide};
