//! Memory Host - In-memory element tree implementing [`Host`]
//!
//! An arena of nodes with DOM-like semantics: single parent, ordered
//! children, deep clone, child-list observation and size observation.
//! Discarded subtrees return their slots to a free list, so rebuilds do not
//! grow the arena.
//! Measurement goes through Taffy (see [`crate::layout::measure_slide`]).
//!
//! Serves as the reference host for the terminal demo and as the test
//! double for the controller.
//!
//! # Example
//!
//! ```ignore
//! let mut host = MemoryHost::new();
//! let container = host.add_root("#gallery", SlideSize::new(600.0, 300.0));
//! let wrapper = host.create_element(Role::Plain);
//! host.append_child(container, wrapper);
//! for _ in 0..3 {
//!     let slide = host.create_element(Role::Plain);
//!     host.set_style(slide, SlideStyle::px(600.0, 300.0));
//!     host.append_child(wrapper, slide);
//! }
//! ```

use std::collections::HashSet;

use super::host::{ElementId, Host, HostEvent, Target};
use crate::layout::{Extent, SlideStyle, measure_slide};
use crate::types::{ElementFlags, Role, SlideSize};

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Node {
    role: Role,
    flags: ElementFlags,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    selector: Option<String>,
    /// Declared extents, used when no inline size is set.
    style: SlideStyle,
    /// Inline size written by the controller.
    size: Option<SlideSize>,
    translate_x: f32,
    transition: Option<u32>,
    label: String,
}

// =============================================================================
// MEMORY HOST
// =============================================================================

/// Arena-backed [`Host`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: Vec<Option<Node>>,
    free: Vec<usize>,
    size_observers: Vec<ElementId>,
    child_observers: HashSet<ElementId>,
    events: Vec<HostEvent>,
    translate_writes: usize,
    flushes: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build `container > wrapper > slide*count`, every slide sized `slide`.
    ///
    /// Returns the host plus the container and wrapper ids.
    pub fn with_slides(selector: &str, count: usize, slide: SlideSize) -> (Self, ElementId, ElementId) {
        let mut host = Self::new();
        let container = host.add_root(selector, slide);
        let wrapper = host.create_element(Role::Plain);
        host.append_child(container, wrapper);
        for _ in 0..count {
            host.add_slide(wrapper, SlideStyle::px(slide.width, slide.height));
        }
        (host, container, wrapper)
    }

    /// Add a detached top-level element reachable through `selector`.
    pub fn add_root(&mut self, selector: &str, size: SlideSize) -> ElementId {
        self.push(Node {
            selector: Some(selector.to_string()),
            style: SlideStyle::px(size.width, size.height),
            ..Default::default()
        })
    }

    /// Append a plain slide element with the given declared style.
    pub fn add_slide(&mut self, wrapper: ElementId, style: SlideStyle) -> ElementId {
        let slide = self.create_element(Role::Plain);
        self.set_style(slide, style);
        self.append_child(wrapper, slide);
        slide
    }

    pub fn set_style(&mut self, element: ElementId, style: SlideStyle) {
        if let Some(node) = self.node_mut(element) {
            node.style = style;
        }
    }

    /// Change the rendered size of a container, notifying size observers.
    pub fn resize(&mut self, element: ElementId, size: SlideSize) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.style = SlideStyle::px(size.width, size.height);
        node.size = None;

        let observers = self.size_observers.iter().filter(|&&e| e == element).count();
        for _ in 0..observers {
            self.events.push(HostEvent::Resized { width: size.width });
        }
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.node(element).and_then(|n| n.parent)
    }

    pub fn translate_x(&self, element: ElementId) -> f32 {
        self.node(element).map(|n| n.translate_x).unwrap_or(0.0)
    }

    pub fn transition(&self, element: ElementId) -> Option<u32> {
        self.node(element).and_then(|n| n.transition)
    }

    pub fn label(&self, element: ElementId) -> &str {
        self.node(element).map(|n| n.label.as_str()).unwrap_or("")
    }

    /// Inline size written by the controller, if any.
    pub fn inline_size(&self, element: ElementId) -> Option<SlideSize> {
        self.node(element).and_then(|n| n.size)
    }

    /// Role class followed by flag classes.
    pub fn class_list(&self, element: ElementId) -> Vec<String> {
        let Some(node) = self.node(element) else {
            return Vec::new();
        };
        let mut classes: Vec<String> = node.role.class_name().map(str::to_string).into_iter().collect();
        classes.extend(node.flags.class_names());
        classes
    }

    /// Attached descendants of `root` with `role`, in document order.
    pub fn find(&self, root: ElementId, role: Role) -> Vec<ElementId> {
        let mut found = Vec::new();
        self.collect(root, role, &mut found);
        found
    }

    fn collect(&self, element: ElementId, role: Role, found: &mut Vec<ElementId>) {
        for &child in self.node(element).map(|n| n.children.as_slice()).unwrap_or(&[]) {
            if self.role(child) == role {
                found.push(child);
            }
            self.collect(child, role, found);
        }
    }

    /// Nodes currently allocated, attached or not.
    pub fn live_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub fn size_observer_count(&self) -> usize {
        self.size_observers.len()
    }

    pub fn is_observing_children(&self, element: ElementId) -> bool {
        self.child_observers.contains(&element)
    }

    /// Number of translate writes since creation.
    pub fn translate_writes(&self) -> usize {
        self.translate_writes
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    /// Events queued and not yet polled.
    pub fn pending_events(&self) -> &[HostEvent] {
        &self.events
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn push(&mut self, node: Node) -> ElementId {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                ElementId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                ElementId(self.nodes.len() - 1)
            }
        }
    }

    fn release(&mut self, element: ElementId) {
        let Some(node) = self.nodes.get_mut(element.0).and_then(Option::take) else {
            return;
        };
        self.child_observers.remove(&element);
        self.size_observers.retain(|&e| e != element);
        self.free.push(element.0);
        for child in node.children {
            self.release(child);
        }
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.0).and_then(Option::as_mut)
    }

    fn record_children(&mut self, parent: ElementId, added: usize, removed: usize) {
        if self.child_observers.contains(&parent) {
            self.events.push(HostEvent::ChildrenChanged { added, removed });
        }
    }

    /// Size slides resolve percentages against: the nearest sized ancestor
    /// that is not the strip itself.
    fn viewport_of(&self, element: ElementId) -> SlideSize {
        let mut current = self.parent(element);
        while let Some(ancestor) = current {
            if let Some(node) = self.node(ancestor) {
                if node.role != Role::Wrapper {
                    if let Some(size) = node.size {
                        return size;
                    }
                    if let SlideStyle {
                        width: Extent::Px(width),
                        height: Extent::Px(height),
                    } = node.style
                    {
                        return SlideSize::new(width, height);
                    }
                }
            }
            current = self.parent(ancestor);
        }
        SlideSize::ZERO
    }

    fn deep_clone(&mut self, element: ElementId) -> ElementId {
        let Some(source) = self.node(element).cloned() else {
            return element;
        };
        let copy = self.push(Node {
            parent: None,
            children: Vec::new(),
            selector: None,
            ..source.clone()
        });
        for child in source.children {
            let child_copy = self.deep_clone(child);
            if let Some(node) = self.node_mut(child_copy) {
                node.parent = Some(copy);
            }
            if let Some(node) = self.node_mut(copy) {
                node.children.push(child_copy);
            }
        }
        copy
    }
}

// =============================================================================
// HOST IMPLEMENTATION
// =============================================================================

impl Host for MemoryHost {
    fn resolve(&self, target: &Target) -> Option<ElementId> {
        match target {
            Target::Element(element) => self.node(*element).map(|_| *element),
            Target::Selector(selector) => self
                .nodes
                .iter()
                .position(|n| {
                    n.as_ref()
                        .is_some_and(|n| n.selector.as_deref() == Some(selector.as_str()))
                })
                .map(ElementId),
        }
    }

    fn children(&self, element: ElementId) -> Vec<ElementId> {
        self.node(element).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn measure(&self, element: ElementId) -> SlideSize {
        let Some(node) = self.node(element) else {
            return SlideSize::ZERO;
        };
        if let Some(size) = node.size {
            return size;
        }
        measure_slide(node.style, self.viewport_of(element))
    }

    fn create_element(&mut self, role: Role) -> ElementId {
        self.push(Node {
            role,
            ..Default::default()
        })
    }

    fn clone_element(&mut self, element: ElementId) -> ElementId {
        self.deep_clone(element)
    }

    fn insert_child(&mut self, parent: ElementId, child: ElementId, position: usize) {
        if self.node(parent).is_none() || self.node(child).is_none() || parent == child {
            return;
        }
        if let Some(old_parent) = self.parent(child) {
            self.remove_child(old_parent, child);
        }
        if let Some(node) = self.node_mut(parent) {
            let position = position.min(node.children.len());
            node.children.insert(position, child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        self.record_children(parent, 1, 0);
    }

    fn remove_child(&mut self, parent: ElementId, child: ElementId) {
        let Some(node) = self.node_mut(parent) else {
            return;
        };
        let before = node.children.len();
        node.children.retain(|&c| c != child);
        if node.children.len() == before {
            return;
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        self.record_children(parent, 0, 1);
    }

    fn discard_child(&mut self, parent: ElementId, child: ElementId) {
        if self.parent(child) != Some(parent) {
            return;
        }
        self.remove_child(parent, child);
        self.release(child);
    }

    fn set_role(&mut self, element: ElementId, role: Role) {
        if let Some(node) = self.node_mut(element) {
            node.role = role;
        }
    }

    fn role(&self, element: ElementId) -> Role {
        self.node(element).map(|n| n.role).unwrap_or_default()
    }

    fn add_flags(&mut self, element: ElementId, flags: ElementFlags) {
        if let Some(node) = self.node_mut(element) {
            node.flags.insert(flags);
        }
    }

    fn remove_flags(&mut self, element: ElementId, flags: ElementFlags) {
        if let Some(node) = self.node_mut(element) {
            node.flags.remove(flags);
        }
    }

    fn flags(&self, element: ElementId) -> ElementFlags {
        self.node(element).map(|n| n.flags).unwrap_or_default()
    }

    fn set_label(&mut self, element: ElementId, label: &str) {
        if let Some(node) = self.node_mut(element) {
            node.label = label.to_string();
        }
    }

    fn set_size(&mut self, element: ElementId, size: SlideSize) {
        if let Some(node) = self.node_mut(element) {
            node.size = Some(size);
        }
    }

    fn set_translate_x(&mut self, element: ElementId, x: f32) {
        if let Some(node) = self.node_mut(element) {
            node.translate_x = x;
            self.translate_writes += 1;
        }
    }

    fn set_transition(&mut self, element: ElementId, duration_ms: Option<u32>) {
        if let Some(node) = self.node_mut(element) {
            node.transition = duration_ms;
        }
    }

    fn flush(&mut self) {
        self.flushes += 1;
    }

    fn observe_size(&mut self, element: ElementId) {
        self.size_observers.push(element);
    }

    fn observe_children(&mut self, element: ElementId) {
        self.child_observers.insert(element);
    }

    fn unobserve_children(&mut self, element: ElementId) {
        self.child_observers.remove(&element);
    }

    fn poll_events(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (MemoryHost, ElementId, ElementId) {
        MemoryHost::with_slides("#app", 3, SlideSize::new(200.0, 100.0))
    }

    #[test]
    fn test_resolve_selector_and_element() {
        let (host, container, _) = setup();

        assert_eq!(host.resolve(&Target::from("#app")), Some(container));
        assert_eq!(host.resolve(&Target::from("#missing")), None);
        assert_eq!(host.resolve(&Target::from(container)), Some(container));
        assert_eq!(host.resolve(&Target::Element(ElementId(999))), None);
    }

    #[test]
    fn test_tree_structure() {
        let (host, container, wrapper) = setup();

        assert_eq!(host.first_child(container), Some(wrapper));
        assert_eq!(host.children(wrapper).len(), 3);
        assert_eq!(host.parent(wrapper), Some(container));
    }

    #[test]
    fn test_measure_uses_taffy_against_container() {
        let (mut host, _, wrapper) = setup();
        let slide = host.add_slide(
            wrapper,
            SlideStyle {
                width: Extent::Percent(50.0),
                height: Extent::Px(40.0),
            },
        );

        assert_eq!(host.measure(slide), SlideSize::new(100.0, 40.0));
    }

    #[test]
    fn test_measure_prefers_inline_size() {
        let (mut host, _, wrapper) = setup();
        let slide = host.children(wrapper)[0];
        host.set_size(slide, SlideSize::new(10.0, 5.0));

        assert_eq!(host.measure(slide), SlideSize::new(10.0, 5.0));
    }

    #[test]
    fn test_deep_clone_is_detached() {
        let (mut host, _, wrapper) = setup();
        let slide = host.children(wrapper)[0];
        let inner = host.create_element(Role::Plain);
        host.set_label(inner, "caption");
        host.append_child(slide, inner);

        let copy = host.clone_element(slide);

        assert_ne!(copy, slide);
        assert_eq!(host.parent(copy), None);
        let copied_inner = host.children(copy)[0];
        assert_ne!(copied_inner, inner);
        assert_eq!(host.label(copied_inner), "caption");
        assert_eq!(host.parent(copied_inner), Some(copy));
    }

    #[test]
    fn test_child_mutations_recorded_only_when_observed() {
        let (mut host, _, wrapper) = setup();

        host.add_slide(wrapper, SlideStyle::px(200.0, 100.0));
        assert!(host.poll_events().is_empty());

        host.observe_children(wrapper);
        let slide = host.add_slide(wrapper, SlideStyle::px(200.0, 100.0));
        host.remove_child(wrapper, slide);
        assert_eq!(
            host.poll_events(),
            vec![
                HostEvent::ChildrenChanged { added: 1, removed: 0 },
                HostEvent::ChildrenChanged { added: 0, removed: 1 },
            ]
        );

        host.unobserve_children(wrapper);
        host.add_slide(wrapper, SlideStyle::px(200.0, 100.0));
        assert!(host.poll_events().is_empty());
    }

    #[test]
    fn test_insert_moves_between_parents() {
        let (mut host, container, wrapper) = setup();
        let slide = host.children(wrapper)[2];

        host.insert_child(container, slide, 0);

        assert_eq!(host.children(wrapper).len(), 2);
        assert_eq!(host.first_child(container), Some(slide));
        assert_eq!(host.parent(slide), Some(container));
    }

    #[test]
    fn test_discarded_ids_are_reused() {
        let (mut host, _, wrapper) = setup();
        let slide = host.children(wrapper)[0];
        let inner = host.create_element(Role::Plain);
        host.append_child(slide, inner);
        let live = host.live_count();

        host.discard_child(wrapper, slide);

        assert_eq!(host.live_count(), live - 2);
        assert_eq!(host.children(wrapper).len(), 2);
        assert_eq!(host.role(slide), Role::Plain);
        assert_eq!(host.parent(inner), None);

        let a = host.create_element(Role::Indicator);
        let b = host.create_element(Role::Indicator);
        assert_eq!(host.live_count(), live);
        assert!([slide, inner].contains(&a) && [slide, inner].contains(&b));
        assert!(host.children(a).is_empty());
    }

    #[test]
    fn test_discard_requires_parent() {
        let (mut host, container, wrapper) = setup();
        let slide = host.children(wrapper)[0];
        let live = host.live_count();

        host.discard_child(container, slide);

        assert_eq!(host.live_count(), live);
        assert_eq!(host.parent(slide), Some(wrapper));
    }

    #[test]
    fn test_resize_notifies_size_observers() {
        let (mut host, container, _) = setup();

        host.resize(container, SlideSize::new(300.0, 150.0));
        assert!(host.poll_events().is_empty());

        host.observe_size(container);
        host.resize(container, SlideSize::new(400.0, 200.0));
        assert_eq!(host.poll_events(), vec![HostEvent::Resized { width: 400.0 }]);
    }

    #[test]
    fn test_class_list() {
        let mut host = MemoryHost::new();
        let indicator = host.create_element(Role::Indicator);
        host.add_flags(indicator, ElementFlags::DOT | ElementFlags::ACTIVE);

        assert_eq!(
            host.class_list(indicator),
            vec![
                "carousel__indicator",
                "carousel__indicator-active",
                "carousel__indicator-dot",
            ]
        );
    }
}
