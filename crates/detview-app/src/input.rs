//! Translation of winit window events into viewer input.

use detview_core::{InputEvent, MouseButton};
use kurbo::Point;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton as WinitButton, WindowEvent};
use winit::keyboard::Key;

/// Maps window events to [`InputEvent`]s.
///
/// Mouse button events carry no position, so the last cursor position is
/// remembered and attached to them.
#[derive(Debug, Clone, Default)]
pub struct InputTranslator {
    cursor: Point,
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position in pixels.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Translate one window event. Most produce at most one input event; a
    /// key press that types text produces the key and the characters.
    pub fn translate(&mut self, event: &WindowEvent) -> Vec<InputEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => vec![self.cursor_moved(*position)],
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse_input(*state, *button).into_iter().collect()
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let mut events: Vec<_> = key_input(&event.logical_key, event.state).into_iter().collect();
                if event.state == ElementState::Pressed {
                    if let Some(text) = &event.text {
                        events.extend(text.chars().filter(|c| !c.is_control()).map(InputEvent::Text));
                    }
                }
                events
            }
            WindowEvent::Focused(false) => vec![InputEvent::LostFocus],
            WindowEvent::Resized(size) => vec![InputEvent::Resized {
                width: size.width,
                height: size.height,
            }],
            _ => Vec::new(),
        }
    }

    pub fn cursor_moved(&mut self, position: PhysicalPosition<f64>) -> InputEvent {
        self.cursor = Point::new(position.x, position.y);
        InputEvent::PointerMoved { position: self.cursor }
    }

    /// Button event at the last cursor position. Buttons the viewer does not
    /// know are dropped.
    pub fn mouse_input(&self, state: ElementState, button: WinitButton) -> Option<InputEvent> {
        let button = map_button(button)?;
        let position = self.cursor;
        Some(match state {
            ElementState::Pressed => InputEvent::PointerPressed { position, button },
            ElementState::Released => InputEvent::PointerReleased { position, button },
        })
    }
}

pub fn map_button(button: WinitButton) -> Option<MouseButton> {
    match button {
        WinitButton::Left => Some(MouseButton::Left),
        WinitButton::Right => Some(MouseButton::Right),
        WinitButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Name of a key: the named key's identifier (`Escape`, `Enter`, ...) or the
/// typed character string.
pub fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Named(named) => Some(format!("{named:?}")),
        Key::Character(text) => Some(text.to_string()),
        _ => None,
    }
}

pub fn key_input(key: &Key, state: ElementState) -> Option<InputEvent> {
    let name = key_name(key)?;
    Some(match state {
        ElementState::Pressed => InputEvent::KeyPressed(name),
        ElementState::Released => InputEvent::KeyReleased(name),
    })
}
