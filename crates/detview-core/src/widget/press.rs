use super::{Area, GuiState};
use crate::event::{InputEvent, MouseButton};

/// What a [`PressTracker`] saw in one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressAction {
    None,
    /// Left button went down inside the widget.
    Pressed,
    /// Left button came up after a press on the widget.
    Released { inside: bool },
}

/// Left-button press and hover state shared by clickable widgets.
#[derive(Debug, Clone, Copy, Default)]
pub struct PressTracker {
    pressed: bool,
    hover: bool,
}

impl PressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, event: &InputEvent, area: &Area<'_>) -> PressAction {
        match event {
            InputEvent::PointerPressed {
                position,
                button: MouseButton::Left,
            } if area.contains(*position) => {
                self.pressed = true;
                self.hover = true;
                PressAction::Pressed
            }
            InputEvent::PointerReleased {
                position,
                button: MouseButton::Left,
            } if self.pressed => {
                self.pressed = false;
                let inside = area.contains(*position);
                self.hover = inside;
                PressAction::Released { inside }
            }
            InputEvent::PointerMoved { position } => {
                self.hover = area.contains(*position);
                PressAction::None
            }
            InputEvent::LostFocus => {
                self.pressed = false;
                self.hover = false;
                PressAction::None
            }
            _ => PressAction::None,
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn state(&self) -> GuiState {
        if self.pressed {
            GuiState::Active
        } else if self.hover {
            GuiState::Highlight
        } else {
            GuiState::Base
        }
    }
}
