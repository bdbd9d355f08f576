//! Check box with a text label.

use detview_core::render::Surface;
use detview_core::widget::{Area, GuiState, PressAction, PressTracker, Widget};
use detview_core::{GuiEventKind, InputEvent};
use kurbo::Rect;
use std::any::Any;

/// Fraction of the box inset for the tick mark.
const TICK_INSET: f64 = 0.25;

/// A square box followed by a label. Clicking anywhere on it toggles.
#[derive(Debug, Clone, Default)]
pub struct CheckBox {
    label: String,
    press: PressTracker,
    checked: bool,
}

impl CheckBox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn state(&self) -> GuiState {
        self.press.state()
    }
}

impl Widget for CheckBox {
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind {
        match self.press.update(event, area) {
            PressAction::Released { inside: true } => {
                self.checked = !self.checked;
                GuiEventKind::Changed
            }
            _ => GuiEventKind::None,
        }
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let bounds = area.absolute();
        let palette = area.palette();
        // Square box as tall as the widget
        let side = bounds.height().min(bounds.width());
        let square = Rect::from_origin_size(bounds.origin(), (side, side));
        surface.fill_rect(square, palette.background(self.press.state()));
        surface.stroke_rect(square, palette.aspect, 1.0);
        if self.checked {
            surface.fill_rect(square.inset(-side * TICK_INSET), palette.active);
        }
        let text = Rect::new(bounds.x0 + side, bounds.y0, bounds.x1, bounds.y1);
        surface.draw_text(text, &self.label, palette.text);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
