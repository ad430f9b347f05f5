//! Geometry - Pure strip math
//!
//! Everything here is a function of the index, the slide size and the loop
//! flag. The controller calls these on every index change; none of them
//! touch the host.

use crate::types::{DRAG_DAMPING, SlideSize, SwitchAction};

// =============================================================================
// STRIP POSITION
// =============================================================================

/// Padding slots in front of the first real slide (one clone in loop mode).
pub fn loop_offset(looping: bool) -> i32 {
    i32::from(looping)
}

/// Leftward translation of the strip that puts `index` in view.
///
/// `transform_x = (index + loop_offset) * slide_width`
pub fn transform_x(index: i32, looping: bool, slide_width: f32) -> f32 {
    (index + loop_offset(looping)) as f32 * slide_width
}

/// Number of slots in the strip, including loop clones.
pub fn effective_len(slide_count: usize, looping: bool) -> usize {
    if looping && slide_count > 0 {
        slide_count + 2
    } else {
        slide_count
    }
}

/// Width of the whole strip.
pub fn strip_width(slide_count: usize, looping: bool, slide_width: f32) -> f32 {
    effective_len(slide_count, looping) as f32 * slide_width
}

// =============================================================================
// INDEX BOUNDS
// =============================================================================

/// Lowest index navigation may reach: -1 (virtual) in loop mode, else 0.
pub fn min_index(looping: bool) -> i32 {
    if looping { -1 } else { 0 }
}

/// Highest index navigation may reach: N (virtual) in loop mode, else N-1.
pub fn max_index(slide_count: usize, looping: bool) -> i32 {
    let n = slide_count as i32;
    if looping { n } else { n - 1 }
}

/// Index reached by one step in `action` from `current`.
pub fn step(current: i32, action: SwitchAction, slide_count: usize, looping: bool) -> i32 {
    match action {
        SwitchAction::Prev => (current - 1).max(min_index(looping)),
        SwitchAction::Next => (current + 1).min(max_index(slide_count, looping)),
    }
}

/// Real boundary a virtual index settles on, if it is virtual.
///
/// `N` settles on 0 and `-1` settles on `N-1`.
pub fn settle_target(index: i32, slide_count: usize, looping: bool) -> Option<i32> {
    if !looping || slide_count == 0 {
        return None;
    }
    let n = slide_count as i32;
    if index == n {
        Some(0)
    } else if index == -1 {
        Some(n - 1)
    } else {
        None
    }
}

// =============================================================================
// DRAG
// =============================================================================

/// Damped visual offset for a raw drag displacement.
///
/// `log2(|dx|) * ±25`. Displacements under one pixel do not move the strip.
pub fn damped_offset(dx: f32) -> f32 {
    let magnitude = dx.abs();
    if magnitude < 1.0 {
        return 0.0;
    }
    magnitude.log2() * DRAG_DAMPING * dx.signum()
}

/// Navigation committed by releasing a drag after `distance` pixels.
///
/// Strictly more than half a slide is required.
pub fn drag_commit(distance: f32, slide_width: f32) -> Option<SwitchAction> {
    if distance.abs() > slide_width / 2.0 {
        Some(if distance > 0.0 {
            SwitchAction::Prev
        } else {
            SwitchAction::Next
        })
    } else {
        None
    }
}

// =============================================================================
// RESIZE
// =============================================================================

/// New slide size for a container width, keeping the old aspect ratio.
///
/// If the old size has no usable ratio the old height is kept.
pub fn rescale(old: SlideSize, new_width: f32) -> SlideSize {
    if old.width <= 0.0 || old.height <= 0.0 {
        return SlideSize::new(new_width, old.height);
    }
    let ratio = old.width / old.height;
    SlideSize::new(new_width, new_width / ratio)
}
