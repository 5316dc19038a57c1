//! The layout tree.
//!
//! Nodes live in an arena owned by [`Tree`] and address each other through
//! stable [`NodeId`]s: parents hold child ids, children hold a non-owning
//! parent id, and nobody carries a raw back-pointer. All derived geometry
//! (area, padding, position) is memoized per node behind [`Cached`] and
//! recomputed lazily through the accessors here.
//!
//! Layout flows in two directions. Resolution is bottom-up on demand:
//! asking for an area pulls measurements out of the leaves. Change
//! propagation is top-down and eager: when a child outgrows its parent the
//! invalidation bubbles to the highest ancestor that has to grow, then
//! dimensions are re-applied downward from exactly that point.

use crate::cache::Cached;
use crate::font::FontMetrics;
use crate::geometry::{Extent, HAlign, Insets, MAX, pad};
use crate::host::{Error, FrameStyle, Host, WidgetClass};
use crate::top::Ready;

use std::sync::Arc;

/// Stable index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// The closed set of node variants.
///
/// Widget kinds (`Label`, `ProgressBar`, `Top`) own a native handle and at
/// most one child; group kinds own only ordered children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Label,
    ProgressBar,
    VerticalGroup { halign: HAlign },
    Top,
}

impl NodeKind {
    /// Whether this kind is backed by a native window of its own.
    pub(crate) fn is_widget(self) -> bool {
        !matches!(self, NodeKind::VerticalGroup { .. })
    }
}

pub(crate) struct Node<H: Host> {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    /// Insertion order is layout order.
    pub(crate) children: Vec<NodeId>,
    pub(crate) area: Cached<Extent>,
    pub(crate) padding: Cached<Insets>,
    pub(crate) pos: Cached<Extent>,
    /// Label text, or the root title. Empty elsewhere.
    pub(crate) text: String,
    pub(crate) style: FrameStyle,
    pub(crate) handle: Option<H::Handle>,
}

impl<H: Host> Node<H> {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            parent,
            children: Vec::new(),
            area: Cached::new(),
            padding: Cached::new(),
            pos: Cached::new(),
            text: String::new(),
            style: FrameStyle::BARE,
            handle: None,
        }
    }
}

/// A layout tree bound to one host and (at most) one top-level window.
pub struct Tree<H: Host> {
    pub(crate) host: H,
    pub(crate) nodes: Vec<Node<H>>,
    pub(crate) root: Option<NodeId>,
    /// The root's font; descendants reference it, never own it.
    pub(crate) font: Option<H::Font>,
    pub(crate) metrics: FontMetrics,
    pub(crate) ready: Arc<Ready<H::Handle>>,
}

impl<H: Host> Tree<H> {
    /// A tree with no nodes yet, bound to `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            nodes: Vec::new(),
            root: None,
            font: None,
            metrics: FontMetrics::default(),
            ready: Arc::new(Ready::new()),
        }
    }

    // ---------------------------------------------------------------------
    // Construction
    // ---------------------------------------------------------------------

    /// Create the top-level window node and derive the tree font from the
    /// host. There can be only one.
    pub fn top(&mut self) -> NodeId {
        assert!(self.root.is_none(), "tree already has a top-level window");
        match self.host.message_font() {
            Some((font, metrics)) => {
                self.font = Some(font);
                self.metrics = metrics;
            }
            None => {
                // Zero metrics; labels measure against the host default.
                tracing::warn!("message font query failed; using host default font");
            }
        }
        let id = self.push(NodeKind::Top, None);
        self.root = Some(id);
        id
    }

    /// Create a label under `parent`.
    pub fn label(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        let id = self.push(NodeKind::Label, Some(parent));
        self.nodes[id.0].text = text.into();
        id
    }

    /// Create a progress bar under `parent`. MAX width, twice the line
    /// height tall, smooth fill.
    pub fn progress_bar(&mut self, parent: NodeId) -> NodeId {
        let id = self.push(NodeKind::ProgressBar, Some(parent));
        self.nodes[id.0].style |= FrameStyle::SMOOTH_FILL;
        id
    }

    /// Create a vertical stacking group under `parent`.
    pub fn vertical_group(&mut self, parent: NodeId, halign: HAlign) -> NodeId {
        self.push(NodeKind::VerticalGroup { halign }, Some(parent))
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, parent));
        if let Some(parent) = parent {
            self.attach(parent, id);
        }
        id
    }

    /// Register `child` with `parent`. Widget parents have exactly one
    /// child slot; attaching a second child is a caller defect.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let node = &mut self.nodes[parent.0];
        if node.kind.is_widget() {
            assert!(
                node.children.is_empty(),
                "widget node already has a child; only groups take several"
            );
        }
        node.children.push(child);
    }

    // ---------------------------------------------------------------------
    // Memoized resolvers
    // ---------------------------------------------------------------------

    /// The node's resolved area. May contain the MAX sentinel on an axis;
    /// see [`effective_area`](Self::effective_area) for the resolved form.
    pub fn area(&mut self, id: NodeId) -> Extent {
        if self.nodes[id.0].area.is_stale() {
            let fresh = self.compute_area(id);
            self.nodes[id.0].area.fill(fresh);
        }
        self.nodes[id.0].area.value()
    }

    fn compute_area(&mut self, id: NodeId) -> Extent {
        match self.nodes[id.0].kind {
            NodeKind::Label => {
                let text = self.nodes[id.0].text.clone();
                self.host.measure_text(self.font.as_ref(), &text)
            }
            NodeKind::ProgressBar => Extent::new(MAX, self.metrics.height * 2),
            NodeKind::VerticalGroup { .. } => self.group_area(id),
            NodeKind::Top => self.top_area(id),
        }
    }

    /// The node's padding. Uniform font padding everywhere except the root,
    /// which has none (its frame decoration is a separate concern).
    pub fn padding(&mut self, id: NodeId) -> Insets {
        if self.nodes[id.0].padding.is_stale() {
            let fresh = match self.nodes[id.0].kind {
                NodeKind::Top => Insets::ZERO,
                _ => self.metrics.padding(),
            };
            self.nodes[id.0].padding.fill(fresh);
        }
        self.nodes[id.0].padding.value()
    }

    /// The node's absolute position: the root centers itself on screen,
    /// everything else is placed by its parent.
    pub fn position(&mut self, id: NodeId) -> Extent {
        if self.nodes[id.0].pos.is_stale() {
            let fresh = match self.nodes[id.0].parent {
                Some(parent) => self.place_child(parent, id),
                None => self.top_position(id),
            };
            self.nodes[id.0].pos.fill(fresh);
        }
        self.nodes[id.0].pos.value()
    }

    fn place_child(&mut self, parent: NodeId, child: NodeId) -> Extent {
        match self.nodes[parent.0].kind {
            NodeKind::VerticalGroup { halign } => self.place_in_group(parent, child, halign),
            // A widget's single child starts at its parent's client origin.
            _ => Extent::ZERO,
        }
    }

    /// The area with every MAX axis resolved against the nearest ancestor
    /// that fixes it: parent's effective extent minus this node's own
    /// padding on that axis.
    ///
    /// # Panics
    ///
    /// If a MAX axis survives to a node with no parent — the caller built a
    /// tree with no explicitly sized ancestor on that axis.
    pub fn effective_area(&mut self, id: NodeId) -> Extent {
        let mut area = self.area(id);
        if area.x == MAX {
            let parent = self.sized_ancestor(id);
            let insets = self.padding(id);
            area.x = self.effective_area(parent).x.saturating_sub(insets.horizontal());
        }
        if area.y == MAX {
            let parent = self.sized_ancestor(id);
            let insets = self.padding(id);
            area.y = self.effective_area(parent).y.saturating_sub(insets.vertical());
        }
        area
    }

    fn sized_ancestor(&self, id: NodeId) -> NodeId {
        self.nodes[id.0]
            .parent
            .expect("MAX-sized node with no explicitly sized ancestor")
    }

    /// Area plus this node's own insets. MAX axes stay MAX.
    pub fn padded_area(&mut self, id: NodeId) -> Extent {
        let area = self.area(id);
        let insets = self.padding(id);
        pad(area, insets)
    }

    /// Effective area plus this node's own insets.
    pub fn padded_effective_area(&mut self, id: NodeId) -> Extent {
        let area = self.effective_area(id);
        let insets = self.padding(id);
        pad(area, insets)
    }

    /// Position offset by this node's own left/top padding.
    pub fn padded_position(&mut self, id: NodeId) -> Extent {
        let pos = self.position(id);
        let insets = self.padding(id);
        Extent::new(
            pos.x.saturating_add(insets.left),
            pos.y.saturating_add(insets.top),
        )
    }

    /// The tree font's metrics (owned by the root; zero when the host font
    /// query failed).
    pub fn font_metrics(&self) -> FontMetrics {
        self.metrics
    }

    // ---------------------------------------------------------------------
    // External overrides
    // ---------------------------------------------------------------------

    /// Fix a node's resolved width from outside, subtracting its own
    /// horizontal padding. The height is left as resolved.
    pub fn override_width(&mut self, id: NodeId, width: u32) {
        let insets = self.padding(id);
        let mut area = self.area(id);
        area.x = width.saturating_sub(insets.horizontal());
        self.nodes[id.0].area.fill(area);
    }

    /// Fix a node's resolved height from outside, subtracting its own
    /// vertical padding. The width is left as resolved.
    pub fn override_height(&mut self, id: NodeId, height: u32) {
        let insets = self.padding(id);
        let mut area = self.area(id);
        area.y = height.saturating_sub(insets.vertical());
        self.nodes[id.0].area.fill(area);
    }

    // ---------------------------------------------------------------------
    // Content updates
    // ---------------------------------------------------------------------

    /// Replace a label's text and re-layout whatever the change affects.
    ///
    /// The native text update deliberately happens after the resize pass:
    /// repainting new text inside the old extents flickers.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        debug_assert!(matches!(self.nodes[id.0].kind, NodeKind::Label));
        let text = text.into();
        self.nodes[id.0].text = text.clone();
        self.nodes[id.0].area.invalidate();
        if let Some(parent) = self.nodes[id.0].parent {
            self.notify_child_area_changed(parent, id);
        }
        if let Some(handle) = self.nodes[id.0].handle {
            self.host.set_text(handle, &text);
        }
    }

    // ---------------------------------------------------------------------
    // Invalidation protocol
    // ---------------------------------------------------------------------

    /// The upward half of change propagation.
    ///
    /// If `child`'s padded area now exceeds `parent`'s resolved area on
    /// either axis, the parent has to grow: its caches are invalidated, any
    /// MAX-sized siblings on the grown axis are marked for remeasure (the
    /// span they resolve against changed), and the notification climbs to
    /// the grandparent. The climb reverses direction at the first node that
    /// does not need to grow: from there, dimensions are eagerly re-applied
    /// downward over just the subtrees that moved.
    pub(crate) fn notify_child_area_changed(&mut self, parent: NodeId, child: NodeId) {
        let child_area = self.padded_area(child);
        let own = self.area(parent);
        // A MAX axis never forces growth: the parent decides it.
        let grew_x = child_area.x != MAX && own.x != MAX && child_area.x > own.x;
        let grew_y = child_area.y != MAX && own.y != MAX && child_area.y > own.y;

        if grew_x || grew_y {
            self.nodes[parent.0].area.invalidate();
            self.nodes[parent.0].pos.invalidate();
            self.invalidate_max_siblings(parent, child, grew_x, grew_y);
            match self.nodes[parent.0].parent {
                Some(grandparent) => self.notify_child_area_changed(grandparent, parent),
                None => {
                    // The root itself grew; everything below re-applies.
                    tracing::debug!("area change reached the root; full re-apply");
                    self.invalidate_positions(parent);
                    self.propagate_dimensions(parent);
                }
            }
        } else {
            self.reapply_from(parent, child);
        }
    }

    /// Re-apply dimensions below `parent`, which absorbed the change.
    ///
    /// The changed child's subtree always re-applies. In a group the
    /// trailing siblings do too: they stack below the changed child, so its
    /// new height shifts their positions.
    fn reapply_from(&mut self, parent: NodeId, child: NodeId) {
        let affected: Vec<NodeId> = match self.nodes[parent.0].kind {
            NodeKind::VerticalGroup { .. } => {
                let children = &self.nodes[parent.0].children;
                let idx = children
                    .iter()
                    .position(|&c| c == child)
                    .expect("change notification from a node that is not a child");
                children[idx..].to_vec()
            }
            _ => vec![child],
        };
        for &node in &affected {
            self.invalidate_positions(node);
        }
        for &node in &affected {
            self.propagate_dimensions(node);
        }
    }

    /// In a group that grew, siblings sized MAX on a grown axis resolve
    /// against a span that just changed; mark them for remeasure. Fixed
    /// siblings are untouched.
    fn invalidate_max_siblings(
        &mut self,
        parent: NodeId,
        changed: NodeId,
        grew_x: bool,
        grew_y: bool,
    ) {
        if !matches!(self.nodes[parent.0].kind, NodeKind::VerticalGroup { .. }) {
            return;
        }
        let siblings: Vec<NodeId> = self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|&c| c != changed)
            .collect();
        for sibling in siblings {
            let area = self.area(sibling);
            if (grew_x && area.x == MAX) || (grew_y && area.y == MAX) {
                self.nodes[sibling.0].area.invalidate();
            }
        }
    }

    /// Mark every position in `id`'s subtree stale. Positions are absolute,
    /// so a moving ancestor moves all of its descendants.
    fn invalidate_positions(&mut self, id: NodeId) {
        self.nodes[id.0].pos.invalidate();
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.invalidate_positions(child);
        }
    }

    // ---------------------------------------------------------------------
    // Recursive passes
    // ---------------------------------------------------------------------

    /// Push the tree font into every native handle, depth-first.
    pub(crate) fn propagate_font(&mut self, id: NodeId) {
        if self.nodes[id.0].kind.is_widget()
            && let Some(handle) = self.nodes[id.0].handle
            && let Some(font) = self.font.as_ref()
        {
            self.host.apply_font(handle, font);
        }
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.propagate_font(child);
        }
    }

    /// Push resolved position and size into every native handle in `id`'s
    /// subtree, depth-first.
    pub(crate) fn propagate_dimensions(&mut self, id: NodeId) {
        if self.nodes[id.0].kind.is_widget() {
            let pos = self.padded_position(id);
            let size = match self.nodes[id.0].kind {
                NodeKind::Top => self.decorated_area(id),
                _ => self.effective_area(id),
            };
            if let Some(handle) = self.nodes[id.0].handle {
                self.host.move_resize(handle, pos, size);
            }
        }
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.propagate_dimensions(child);
        }
    }

    /// Create native handles for `id`'s subtree, depth-first, parenting
    /// each widget's windows to the nearest widget ancestor's handle.
    pub(crate) fn instantiate(
        &mut self,
        id: NodeId,
        parent_handle: Option<H::Handle>,
    ) -> Result<(), Error> {
        let own_handle = if self.nodes[id.0].kind.is_widget() {
            let pos = self.padded_position(id);
            let size = match self.nodes[id.0].kind {
                NodeKind::Top => self.decorated_area(id),
                _ => self.effective_area(id),
            };
            let class = match self.nodes[id.0].kind {
                NodeKind::Label => WidgetClass::Label,
                NodeKind::ProgressBar => WidgetClass::ProgressBar,
                NodeKind::Top => WidgetClass::Dialog,
                NodeKind::VerticalGroup { .. } => unreachable!(),
            };
            let style = self.nodes[id.0].style;
            let text = self.nodes[id.0].text.clone();
            let handle = self
                .host
                .create_window(class, style, &text, pos, size, parent_handle)?;
            self.nodes[id.0].handle = Some(handle);
            Some(handle)
        } else {
            parent_handle
        };
        let children = self.nodes[id.0].children.clone();
        for child in children {
            self.instantiate(child, own_handle)?;
        }
        Ok(())
    }
}

// =========================================================================
// Tests
// =========================================================================
