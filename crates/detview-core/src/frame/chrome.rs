//! Widgets drawn around every frame.

use crate::event::{GuiEventKind, InputEvent};
use crate::render::Surface;
use crate::widget::{Area, PressAction, PressTracker, Widget};
use kurbo::Rect;
use std::any::Any;

/// Title bar. Dragging it moves the frame.
#[derive(Debug, Clone)]
pub struct DragBar {
    title: String,
    press: PressTracker,
}

impl DragBar {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            press: PressTracker::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Widget for DragBar {
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind {
        match self.press.update(event, area) {
            PressAction::Pressed => GuiEventKind::StartMove,
            PressAction::Released { .. } => GuiEventKind::StopMove,
            PressAction::None => GuiEventKind::None,
        }
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let bounds = area.absolute();
        let palette = area.palette();
        surface.fill_rect(bounds, palette.background(self.press.state()));
        surface.draw_text(bounds, &self.title, palette.text);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Closes the frame when clicked.
#[derive(Debug, Clone, Default)]
pub struct CloseButton {
    press: PressTracker,
}

impl CloseButton {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Widget for CloseButton {
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind {
        match self.press.update(event, area) {
            PressAction::Released { inside: true } => GuiEventKind::Close,
            _ => GuiEventKind::None,
        }
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let bounds = area.absolute();
        let palette = area.palette();
        surface.fill_rect(bounds, palette.background(self.press.state()));
        surface.draw_text(bounds, "x", palette.text);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Bottom-right corner handle. Dragging it resizes the frame.
#[derive(Debug, Clone, Default)]
pub struct ResizeGrip {
    press: PressTracker,
}

impl ResizeGrip {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Widget for ResizeGrip {
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind {
        match self.press.update(event, area) {
            PressAction::Pressed => GuiEventKind::StartResize,
            PressAction::Released { .. } => GuiEventKind::StopResize,
            PressAction::None => GuiEventKind::None,
        }
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let bounds = area.absolute();
        let palette = area.palette();
        // Lower-right triangle approximated by two stacked blocks
        surface.fill_rect(
            Rect::new(bounds.center().x, bounds.y0, bounds.x1, bounds.y1),
            palette.background(self.press.state()),
        );
        surface.fill_rect(
            Rect::new(bounds.x0, bounds.center().y, bounds.center().x, bounds.y1),
            palette.background(self.press.state()),
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
