//! Render surface abstraction and GUI palette.
//!
//! Frames and widgets describe what to draw through [`Surface`]; pixel output
//! is left to the backend implementing it. [`DrawList`] records the calls.

use crate::widget::GuiState;
use kurbo::Rect;
use peniko::Color;

/// Name of the built-in default palette.
pub const DEFAULT_PALETTE: &str = "Default";

/// Receives draw submissions. All boxes are in absolute pixels.
pub trait Surface {
    /// Restrict subsequent 3D drawing to a viewport.
    fn set_viewport(&mut self, rect: Rect);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64);

    fn draw_text(&mut self, rect: Rect, text: &str, color: Color);
}

/// A recorded draw call.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Viewport(Rect),
    Fill { rect: Rect, color: Color },
    Stroke { rect: Rect, color: Color, width: f64 },
    Text { rect: Rect, text: String, color: Color },
}

/// Surface that records draw calls in submission order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// All text strings drawn, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DrawList {
    fn set_viewport(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Viewport(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: f64) {
        self.commands.push(DrawCommand::Stroke { rect, color, width });
    }

    fn draw_text(&mut self, rect: Rect, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            rect,
            text: text.to_string(),
            color,
        });
    }
}

/// Colours used by frames and widgets.
#[derive(Debug, Clone)]
pub struct Palette {
    pub name: String,
    /// Widget background in the base state.
    pub base: Color,
    /// Widget background under the pointer.
    pub highlight: Color,
    /// Widget background while pressed or switched on.
    pub active: Color,
    pub text: Color,
    /// Axis lines, frame borders and other structural decoration.
    pub aspect: Color,
    /// Plotted data.
    pub data: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            name: DEFAULT_PALETTE.to_string(),
            base: Color::from_rgba8(230, 230, 230, 255),
            highlight: Color::from_rgba8(200, 215, 240, 255),
            active: Color::from_rgba8(59, 130, 246, 255),
            text: Color::from_rgba8(60, 60, 60, 255),
            aspect: Color::from_rgba8(120, 120, 120, 255),
            data: Color::from_rgba8(16, 120, 200, 255),
        }
    }
}

impl Palette {
    /// Dark variant.
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            base: Color::from_rgba8(45, 45, 50, 255),
            highlight: Color::from_rgba8(70, 75, 90, 255),
            active: Color::from_rgba8(96, 165, 250, 255),
            text: Color::from_rgba8(230, 230, 230, 255),
            aspect: Color::from_rgba8(160, 160, 170, 255),
            data: Color::from_rgba8(250, 180, 40, 255),
        }
    }

    /// Look up a built-in palette.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            DEFAULT_PALETTE => Some(Self::default()),
            "Dark" => Some(Self::dark()),
            _ => None,
        }
    }

    /// Background colour for a widget state.
    pub fn background(&self, state: GuiState) -> Color {
        match state {
            GuiState::Base => self.base,
            GuiState::Highlight => self.highlight,
            GuiState::Active => self.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        let palette = Palette::default();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), palette.base);
        list.draw_text(Rect::new(0.0, 0.0, 10.0, 10.0), "hello", palette.text);
        list.set_viewport(Rect::new(0.0, 0.0, 5.0, 5.0));

        assert_eq!(list.len(), 3);
        assert!(matches!(list.commands()[0], DrawCommand::Fill { .. }));
        assert!(matches!(list.commands()[2], DrawCommand::Viewport(_)));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hello"]);

        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_palette_lookup() {
        assert_eq!(Palette::by_name("Default").unwrap().name, DEFAULT_PALETTE);
        assert_eq!(Palette::by_name("Dark").unwrap().name, "Dark");
        assert!(Palette::by_name("Sepia").is_none());
    }
}
