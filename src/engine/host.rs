//! Host Interface - What the carousel needs from its surroundings
//!
//! The carousel never owns a document. It talks to a [`Host`] that plays
//! every collaborator role at once:
//!
//! - **Element provider** - resolve the container, walk children
//! - **Geometry provider** - measure a slide
//! - **Markup collaborator** - create parts, toggle roles/flags, apply styles
//! - **Size-change notifier** - report container width changes
//! - **Structural-change notifier** - report child-list mutations
//!
//! Notifications are queued by the host and drained by the controller via
//! [`Host::poll_events`], so nothing re-enters the controller mid-update.

use std::fmt;

use crate::types::{ElementFlags, Role, SlideSize};

// =============================================================================
// TYPES
// =============================================================================

/// Opaque element handle issued by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// How the caller names the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Selector(String),
    Element(ElementId),
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

impl From<String> for Target {
    fn from(selector: String) -> Self {
        Target::Selector(selector)
    }
}

impl From<ElementId> for Target {
    fn from(element: ElementId) -> Self {
        Target::Element(element)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Selector(selector) => f.write_str(selector),
            Target::Element(ElementId(id)) => write!(f, "element #{id}"),
        }
    }
}

/// Notification queued by a host for the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Observed container changed width.
    Resized { width: f32 },
    /// Observed element gained or lost direct children.
    ChildrenChanged { added: usize, removed: usize },
}

// =============================================================================
// HOST TRAIT
// =============================================================================

/// Everything outside the slide state machine.
///
/// Operations on unknown elements are expected to be silent no-ops.
pub trait Host {
    // -------------------------------------------------------------------------
    // Element provider
    // -------------------------------------------------------------------------

    fn resolve(&self, target: &Target) -> Option<ElementId>;

    fn children(&self, element: ElementId) -> Vec<ElementId>;

    fn first_child(&self, element: ElementId) -> Option<ElementId> {
        self.children(element).first().copied()
    }

    // -------------------------------------------------------------------------
    // Geometry provider
    // -------------------------------------------------------------------------

    /// Rendered size of an element.
    fn measure(&self, element: ElementId) -> SlideSize;

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Create a detached element for a generated part.
    fn create_element(&mut self, role: Role) -> ElementId;

    /// Deep-copy an element. The copy is detached.
    fn clone_element(&mut self, element: ElementId) -> ElementId;

    /// Insert `child` at `position` among `parent`'s children (clamped).
    fn insert_child(&mut self, parent: ElementId, child: ElementId, position: usize);

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        let position = self.children(parent).len();
        self.insert_child(parent, child, position);
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId);

    /// Detach `child` and drop it with its subtree. Its ids may be reissued.
    fn discard_child(&mut self, parent: ElementId, child: ElementId) {
        self.remove_child(parent, child);
    }

    // -------------------------------------------------------------------------
    // Markup / style
    // -------------------------------------------------------------------------

    fn set_role(&mut self, element: ElementId, role: Role);

    fn role(&self, element: ElementId) -> Role;

    fn add_flags(&mut self, element: ElementId, flags: ElementFlags);

    fn remove_flags(&mut self, element: ElementId, flags: ElementFlags);

    fn flags(&self, element: ElementId) -> ElementFlags;

    fn set_label(&mut self, element: ElementId, label: &str);

    fn set_size(&mut self, element: ElementId, size: SlideSize);

    /// Horizontal translation applied to the element (negative = leftward).
    fn set_translate_x(&mut self, element: ElementId, x: f32);

    /// Linear transform transition, or `None` for instant positioning.
    fn set_transition(&mut self, element: ElementId, duration_ms: Option<u32>);

    /// Commit pending style changes so the next change is treated as new.
    ///
    /// Called between disabling a transition and moving, and between moving
    /// and re-enabling, so the host never merges the two.
    fn flush(&mut self);

    // -------------------------------------------------------------------------
    // Notifiers
    // -------------------------------------------------------------------------

    fn observe_size(&mut self, element: ElementId);

    fn observe_children(&mut self, element: ElementId);

    fn unobserve_children(&mut self, element: ElementId);

    fn poll_events(&mut self) -> Vec<HostEvent>;
}
