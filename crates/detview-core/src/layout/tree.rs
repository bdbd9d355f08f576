//! Arena of relative rectangles.

use super::{EPSILON, LayoutError, LayoutResult, RectId, Space};
use kurbo::{Point, Rect, Size};
use std::collections::HashMap;

/// A single node: its box as a fraction of the parent's box plus tree links.
#[derive(Debug, Clone)]
struct RectNode {
    parent: Option<RectId>,
    children: Vec<RectId>,
    local: Rect,
}

/// Owns every layout rectangle of a viewer.
///
/// Only the Local box of each node is stored. Resolution and Absolute boxes are
/// derived on demand from the parent chain, the design resolution and the
/// current window size, so moving a node (or resizing the window) moves every
/// descendant without any invalidation pass.
#[derive(Debug, Clone)]
pub struct RectTree {
    nodes: HashMap<RectId, RectNode>,
    root: RectId,
    next_id: u64,
    /// Size of the design canvas in design units.
    resolution: Size,
    /// Current window size in pixels.
    window: Size,
}

impl RectTree {
    /// Create a tree whose root (the mother rect) spans the whole window.
    pub fn new(resolution: Size, window: Size) -> Self {
        let root = RectId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            RectNode {
                parent: None,
                children: Vec::new(),
                local: Rect::new(0.0, 0.0, 1.0, 1.0),
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
            resolution,
            window,
        }
    }

    /// The mother rect.
    pub fn root(&self) -> RectId {
        self.root
    }

    /// Size of the design canvas.
    pub fn resolution(&self) -> Size {
        self.resolution
    }

    /// Current window size in pixels.
    pub fn window_size(&self) -> Size {
        self.window
    }

    /// Update the window size used by Resolution to Absolute conversion.
    pub fn on_window_resize(&mut self, width: f64, height: f64) {
        log::debug!("Window resized to {}x{}", width, height);
        self.window = Size::new(width.max(0.0), height.max(0.0));
    }

    /// Check if a node is alive.
    pub fn contains(&self, id: RectId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of live nodes, including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Parent of a node (`None` for the root).
    pub fn parent(&self, id: RectId) -> LayoutResult<Option<RectId>> {
        Ok(self.node(id)?.parent)
    }

    /// Children of a node in creation order.
    pub fn children(&self, id: RectId) -> LayoutResult<&[RectId]> {
        Ok(&self.node(id)?.children)
    }

    /// Allocate a new child of `parent` whose box is `rect` expressed in `space`.
    pub fn derive_child(&mut self, parent: RectId, rect: Rect, space: Space) -> LayoutResult<RectId> {
        let local = self.to_local(Some(parent), rect, space)?;
        let id = RectId(self.next_id);
        self.next_id += 1;
        self.node_mut(parent)?.children.push(id);
        self.nodes.insert(
            id,
            RectNode {
                parent: Some(parent),
                children: Vec::new(),
                local,
            },
        );
        Ok(id)
    }

    /// Overwrite the box of a node. Descendants keep their Local boxes and so
    /// follow the node.
    pub fn set_box(&mut self, id: RectId, rect: Rect, space: Space) -> LayoutResult<()> {
        let parent = self.node(id)?.parent;
        let local = self.to_local(parent, rect, space)?;
        self.node_mut(id)?.local = local;
        Ok(())
    }

    /// The box of a node expressed in `space`.
    pub fn get_box(&self, id: RectId, space: Space) -> LayoutResult<Rect> {
        let node = self.node(id)?;
        self.from_local(node.parent, node.local, space)
    }

    /// Convert a box between spaces, treating it as a box of a child of `parent`.
    pub fn convert_rect(&self, parent: RectId, rect: Rect, from: Space, to: Space) -> LayoutResult<Rect> {
        if from == to {
            self.node(parent)?;
            return Ok(rect);
        }
        let local = self.to_local(Some(parent), rect, from)?;
        self.from_local(Some(parent), local, to)
    }

    /// Convert a point between spaces, treating it as a point inside `parent`.
    pub fn convert_point(&self, parent: RectId, point: Point, from: Space, to: Space) -> LayoutResult<Point> {
        let rect = Rect::from_origin_size(point, Size::ZERO);
        Ok(self.convert_rect(parent, rect, from, to)?.origin())
    }

    /// Convert between the two canvas-wide spaces without reference to a node.
    ///
    /// Local boxes are passed through unchanged since they need a parent.
    pub fn to_global(&self, rect: Rect, from: Space, to: Space) -> Rect {
        let resolution = match from {
            Space::Absolute => self.unscale(rect),
            Space::Resolution | Space::Local => rect,
        };
        match to {
            Space::Absolute => self.scale(resolution),
            Space::Resolution | Space::Local => resolution,
        }
    }

    /// Check if a point lies inside the node's box (edges included).
    pub fn contains_point(&self, id: RectId, point: Point, space: Space) -> LayoutResult<bool> {
        let bounds = self.get_box(id, space)?;
        Ok(point.x >= bounds.x0 - EPSILON
            && point.x <= bounds.x1 + EPSILON
            && point.y >= bounds.y0 - EPSILON
            && point.y <= bounds.y1 + EPSILON)
    }

    /// Check if `rect` lies fully inside the node's box (edges included).
    pub fn contains_rect(&self, id: RectId, rect: Rect, space: Space) -> LayoutResult<bool> {
        let bounds = self.get_box(id, space)?;
        Ok(rect.x0 >= bounds.x0 - EPSILON
            && rect.x1 <= bounds.x1 + EPSILON
            && rect.y0 >= bounds.y0 - EPSILON
            && rect.y1 <= bounds.y1 + EPSILON)
    }

    /// Check if `rect` shares a positive area with the node's box.
    ///
    /// Boxes that only touch along an edge do not overlap.
    pub fn overlaps(&self, id: RectId, rect: Rect, space: Space) -> LayoutResult<bool> {
        let bounds = self.get_box(id, space)?;
        let overlap_x = bounds.x1.min(rect.x1) - bounds.x0.max(rect.x0);
        let overlap_y = bounds.y1.min(rect.y1) - bounds.y0.max(rect.y0);
        Ok(overlap_x > EPSILON && overlap_y > EPSILON)
    }

    /// Remove a node and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, id: RectId) -> LayoutResult<()> {
        if id == self.root {
            log::warn!("Refusing to remove the mother rect");
            return Ok(());
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            if let Some(node) = self.nodes.get_mut(&parent) {
                node.children.retain(|&child| child != id);
            }
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    fn node(&self, id: RectId) -> LayoutResult<&RectNode> {
        self.nodes.get(&id).ok_or(LayoutError::UnknownRect(id))
    }

    fn node_mut(&mut self, id: RectId) -> LayoutResult<&mut RectNode> {
        self.nodes.get_mut(&id).ok_or(LayoutError::UnknownRect(id))
    }

    /// Resolution box of the frame of reference for a child of `parent`.
    fn reference_box(&self, parent: Option<RectId>) -> LayoutResult<Rect> {
        match parent {
            Some(parent) => {
                let node = self.node(parent)?;
                let outer = self.reference_box(node.parent)?;
                Ok(compose(outer, node.local))
            }
            None => Ok(Rect::from_origin_size(Point::ZERO, self.resolution)),
        }
    }

    fn to_local(&self, parent: Option<RectId>, rect: Rect, space: Space) -> LayoutResult<Rect> {
        let rect = clamp_size(rect);
        match space {
            Space::Local => {
                if let Some(parent) = parent {
                    self.node(parent)?;
                }
                Ok(rect)
            }
            Space::Resolution => Ok(decompose(self.reference_box(parent)?, rect)),
            Space::Absolute => Ok(decompose(self.reference_box(parent)?, self.unscale(rect))),
        }
    }

    fn from_local(&self, parent: Option<RectId>, local: Rect, space: Space) -> LayoutResult<Rect> {
        match space {
            Space::Local => Ok(local),
            Space::Resolution => Ok(compose(self.reference_box(parent)?, local)),
            Space::Absolute => Ok(self.scale(compose(self.reference_box(parent)?, local))),
        }
    }

    /// Resolution to Absolute.
    fn scale(&self, rect: Rect) -> Rect {
        let (sx, sy) = (
            ratio(self.window.width, self.resolution.width),
            ratio(self.window.height, self.resolution.height),
        );
        Rect::new(rect.x0 * sx, rect.y0 * sy, rect.x1 * sx, rect.y1 * sy)
    }

    /// Absolute to Resolution.
    fn unscale(&self, rect: Rect) -> Rect {
        let (sx, sy) = (
            ratio(self.resolution.width, self.window.width),
            ratio(self.resolution.height, self.window.height),
        );
        Rect::new(rect.x0 * sx, rect.y0 * sy, rect.x1 * sx, rect.y1 * sy)
    }
}

/// Place a fractional box inside `outer`.
fn compose(outer: Rect, local: Rect) -> Rect {
    let x0 = outer.x0 + local.x0 * outer.width();
    let y0 = outer.y0 + local.y0 * outer.height();
    Rect::new(
        x0,
        y0,
        x0 + local.width() * outer.width(),
        y0 + local.height() * outer.height(),
    )
}

/// Express `inner` as a fraction of `outer`. Degenerate axes map to zero.
fn decompose(outer: Rect, inner: Rect) -> Rect {
    let x0 = ratio(inner.x0 - outer.x0, outer.width());
    let y0 = ratio(inner.y0 - outer.y0, outer.height());
    Rect::new(
        x0,
        y0,
        x0 + ratio(inner.width(), outer.width()),
        y0 + ratio(inner.height(), outer.height()),
    )
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() <= EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}

fn clamp_size(rect: Rect) -> Rect {
    Rect::new(
        rect.x0,
        rect.y0,
        rect.x0 + rect.width().max(0.0),
        rect.y0 + rect.height().max(0.0),
    )
}
