//! Pointer tracking over a plot area.

use detview_core::render::Surface;
use detview_core::widget::{Area, Widget};
use detview_core::{GuiEventKind, InputEvent};
use kurbo::{Point, Rect};
use std::any::Any;

/// Crosshair line width in pixels.
const CROSSHAIR_WIDTH: f64 = 1.0;

/// Reports where the pointer is, as a fraction of the area.
///
/// The position is updated on every move or press over the area and cleared
/// when the pointer leaves. Each change is reported as `Changed`.
#[derive(Debug, Clone, Default)]
pub struct MapArea {
    position: Option<Point>,
}

impl MapArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer position in the area's Local space, if it is over the area.
    pub fn position(&self) -> Option<Point> {
        self.position
    }

    fn update(&mut self, position: Option<Point>) -> GuiEventKind {
        if self.position == position {
            return GuiEventKind::None;
        }
        self.position = position;
        GuiEventKind::Changed
    }
}

impl Widget for MapArea {
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind {
        match event {
            InputEvent::PointerMoved { position } | InputEvent::PointerPressed { position, .. } => {
                let local = area.contains(*position).then(|| area.local_point(*position));
                self.update(local)
            }
            InputEvent::LostFocus => self.update(None),
            _ => GuiEventKind::None,
        }
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let Some(local) = self.position else {
            return;
        };
        let bounds = area.absolute();
        let x = bounds.x0 + local.x * bounds.width();
        let y = bounds.y0 + local.y * bounds.height();
        let color = area.palette().aspect;
        surface.fill_rect(Rect::new(x, bounds.y0, x + CROSSHAIR_WIDTH, bounds.y1), color);
        surface.fill_rect(Rect::new(bounds.x0, y, bounds.x1, y + CROSSHAIR_WIDTH), color);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
