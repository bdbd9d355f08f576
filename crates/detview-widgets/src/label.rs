//! Static text.

use detview_core::render::Surface;
use detview_core::widget::{Area, Widget};
use detview_core::{GuiEventKind, InputEvent};
use peniko::Color;
use std::any::Any;

/// Text that ignores input.
#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
    /// Overrides the palette text colour.
    color: Option<Color>,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for Label {
    fn handle_event(&mut self, _event: &InputEvent, _area: &Area<'_>) -> GuiEventKind {
        GuiEventKind::None
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        if self.text.is_empty() {
            return;
        }
        let color = self.color.unwrap_or(area.palette().text);
        surface.draw_text(area.absolute(), &self.text, color);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, press};
    use detview_core::render::{DrawCommand, DrawList};

    #[test]
    fn test_label_is_inert() {
        let harness = Harness::new();
        let area = harness.area();
        let mut label = Label::new("GTID");
        assert_eq!(label.handle_event(&press(15.0, 15.0), &area), GuiEventKind::None);

        label.set_text("GTID 12");
        let mut list = DrawList::new();
        label.render(&mut list, &area);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["GTID 12"]);
    }

    #[test]
    fn test_color_override_and_empty() {
        let harness = Harness::new();
        let area = harness.area();
        let red = Color::from_rgba8(255, 0, 0, 255);
        let mut list = DrawList::new();

        Label::new("").render(&mut list, &area);
        assert!(list.is_empty());

        Label::new("warn").color(red).render(&mut list, &area);
        assert!(matches!(
            list.commands()[0],
            DrawCommand::Text { color, .. } if color.components == red.components
        ));
    }
}
