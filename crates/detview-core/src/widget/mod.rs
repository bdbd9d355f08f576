//! Widget contract and per-frame widget dispatch.
//!
//! A widget is anything that can draw itself into a rect and react to input.
//! Widgets never see each other; they report through the [`GuiEventKind`] they
//! return, and the owning frame decides what that means.

mod dispatcher;
mod press;

pub use dispatcher::WidgetDispatcher;
pub use press::{PressAction, PressTracker};

use crate::context::UiContext;
use crate::event::{GuiEventKind, InputEvent};
use crate::layout::{RectId, RectTree, Space};
use crate::render::{Palette, Surface};
use kurbo::{Point, Rect};
use std::any::Any;
use std::fmt;

/// Widget id, unique within its dispatcher and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub(crate) u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget#{}", self.0)
    }
}

/// Widget id unique across the whole viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalWidgetId(pub(crate) u64);

/// Visual state of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuiState {
    #[default]
    Base,
    Highlight,
    Active,
}

/// A widget's view of the layout: its own rect plus the shared context.
#[derive(Clone, Copy)]
pub struct Area<'a> {
    ctx: &'a UiContext,
    rect: RectId,
}

impl<'a> Area<'a> {
    pub fn new(ctx: &'a UiContext, rect: RectId) -> Self {
        Self { ctx, rect }
    }

    pub fn rect_id(&self) -> RectId {
        self.rect
    }

    pub fn tree(&self) -> &'a RectTree {
        self.ctx.tree()
    }

    pub fn palette(&self) -> &'a Palette {
        self.ctx.palette()
    }

    /// The widget's box in pixels (empty if the rect is gone).
    pub fn absolute(&self) -> Rect {
        self.tree()
            .get_box(self.rect, Space::Absolute)
            .unwrap_or(Rect::ZERO)
    }

    /// Check if an absolute point lies inside the widget.
    pub fn contains(&self, point: Point) -> bool {
        self.tree()
            .contains_point(self.rect, point, Space::Absolute)
            .unwrap_or(false)
    }

    /// Express an absolute point as a fraction of the widget's box.
    pub fn local_point(&self, point: Point) -> Point {
        let bounds = self.absolute();
        let fraction = |value: f64, origin: f64, extent: f64| {
            if extent > 0.0 { (value - origin) / extent } else { 0.0 }
        };
        Point::new(
            fraction(point.x, bounds.x0, bounds.width()),
            fraction(point.y, bounds.y0, bounds.height()),
        )
    }

    /// Absolute box of a sub-region given as a fraction of the widget's box.
    pub fn sub_rect(&self, local: Rect) -> Rect {
        let bounds = self.absolute();
        Rect::new(
            bounds.x0 + local.x0 * bounds.width(),
            bounds.y0 + local.y0 * bounds.height(),
            bounds.x0 + local.x1 * bounds.width(),
            bounds.y0 + local.y1 * bounds.height(),
        )
    }
}

/// Capability contract every widget implements.
pub trait Widget: Any {
    /// React to an input event. Pointer positions are absolute pixels.
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind;

    /// Draw the widget.
    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
