//! Slide Measurement - Taffy-backed geometry provider
//!
//! Resolves a slide's declared extents against its container with Taffy,
//! the same way the browser would measure the first slide's bounding box.
//! Used by the in-memory host when the options leave width or height at 0.

use log::warn;
use taffy::{
    AvailableSpace, Dimension as TaffyDimension, Display, FlexDirection, Size, Style, TaffyTree,
};

use crate::types::SlideSize;

// =============================================================================
// TYPES
// =============================================================================

/// One declared slide extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Extent {
    /// Sized by content (an empty slide measures 0).
    #[default]
    Auto,
    /// Absolute pixels.
    Px(f32),
    /// Percent of the container (0-100).
    Percent(f32),
}

/// Declared size of a slide before layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlideStyle {
    pub width: Extent,
    pub height: Extent,
}

impl SlideStyle {
    pub fn px(width: f32, height: f32) -> Self {
        Self {
            width: Extent::Px(width),
            height: Extent::Px(height),
        }
    }
}

fn to_taffy_dimension(extent: Extent) -> TaffyDimension {
    match extent {
        Extent::Auto => TaffyDimension::Auto,
        Extent::Px(px) => TaffyDimension::Length(px),
        Extent::Percent(p) => TaffyDimension::Percent(p / 100.0),
    }
}

// =============================================================================
// MEASURE
// =============================================================================

/// Measure a slide laid out as the first item of a row inside `container`.
///
/// A zero container height is treated as indefinite. Layout failures are
/// logged and measure as [`SlideSize::ZERO`].
pub fn measure_slide(style: SlideStyle, container: SlideSize) -> SlideSize {
    match compute(style, container) {
        Ok(size) => size,
        Err(err) => {
            warn!("slide measurement failed: {err}");
            SlideSize::ZERO
        }
    }
}

fn compute(style: SlideStyle, container: SlideSize) -> taffy::TaffyResult<SlideSize> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let slide = tree.new_leaf(Style {
        size: Size {
            width: to_taffy_dimension(style.width),
            height: to_taffy_dimension(style.height),
        },
        flex_shrink: 0.0,
        ..Default::default()
    })?;

    let container_height = if container.height > 0.0 {
        TaffyDimension::Length(container.height)
    } else {
        TaffyDimension::Auto
    };

    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Row,
            size: Size {
                width: TaffyDimension::Length(container.width),
                height: container_height,
            },
            ..Default::default()
        },
        &[slide],
    )?;

    let available = Size {
        width: AvailableSpace::Definite(container.width),
        height: if container.height > 0.0 {
            AvailableSpace::Definite(container.height)
        } else {
            AvailableSpace::MaxContent
        },
    };
    tree.compute_layout(root, available)?;

    let layout = tree.layout(slide)?;
    Ok(SlideSize::new(layout.size.width, layout.size.height))
}
