//! Button components: plain push buttons and persistent toggles.

use detview_core::render::Surface;
use detview_core::widget::{Area, GuiState, PressAction, PressTracker, Widget};
use detview_core::{GuiEventKind, InputEvent};
use std::any::Any;

/// A labelled push button. Reports `Changed` when released over itself.
#[derive(Debug, Clone, Default)]
pub struct Button {
    label: String,
    press: PressTracker,
    clicks: u32,
}

impl Button {
    /// Create a new button.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of completed clicks.
    pub fn clicks(&self) -> u32 {
        self.clicks
    }

    pub fn state(&self) -> GuiState {
        self.press.state()
    }
}

impl Widget for Button {
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind {
        match self.press.update(event, area) {
            PressAction::Released { inside: true } => {
                self.clicks += 1;
                GuiEventKind::Changed
            }
            _ => GuiEventKind::None,
        }
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        draw_labelled(surface, area, self.press.state(), &self.label);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A labelled button that stays on or off between clicks.
#[derive(Debug, Clone, Default)]
pub struct PersistButton {
    label: String,
    press: PressTracker,
    on: bool,
}

impl PersistButton {
    /// Create a new toggle, initially off.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Set the initial state.
    pub fn on(mut self, on: bool) -> Self {
        self.on = on;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Change the state without reporting an event.
    pub fn set_state(&mut self, on: bool) {
        self.on = on;
    }
}

impl Widget for PersistButton {
    fn handle_event(&mut self, event: &InputEvent, area: &Area<'_>) -> GuiEventKind {
        match self.press.update(event, area) {
            PressAction::Released { inside: true } => {
                self.on = !self.on;
                log::debug!("{} switched {}", self.label, if self.on { "on" } else { "off" });
                GuiEventKind::Changed
            }
            _ => GuiEventKind::None,
        }
    }

    fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
        let state = if self.on || self.press.is_pressed() {
            GuiState::Active
        } else {
            self.press.state()
        };
        draw_labelled(surface, area, state, &self.label);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn draw_labelled(surface: &mut dyn Surface, area: &Area<'_>, state: GuiState, label: &str) {
    let bounds = area.absolute();
    let palette = area.palette();
    surface.fill_rect(bounds, palette.background(state));
    surface.draw_text(bounds, label, palette.text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, press, release};
    use detview_core::DrawCommand;
    use detview_core::render::DrawList;

    #[test]
    fn test_button_click() {
        let harness = Harness::new();
        let area = harness.area();
        let mut button = Button::new("Go");

        assert_eq!(button.handle_event(&press(15.0, 15.0), &area), GuiEventKind::None);
        assert_eq!(button.state(), GuiState::Active);
        assert_eq!(button.handle_event(&release(16.0, 16.0), &area), GuiEventKind::Changed);
        assert_eq!(button.clicks(), 1);

        // Released elsewhere: no click
        button.handle_event(&press(15.0, 15.0), &area);
        assert_eq!(button.handle_event(&release(90.0, 90.0), &area), GuiEventKind::None);
        assert_eq!(button.clicks(), 1);
    }

    #[test]
    fn test_persist_toggles() {
        let harness = Harness::new();
        let area = harness.area();
        let mut toggle = PersistButton::new("Log Y").on(true);
        assert!(toggle.is_on());

        toggle.handle_event(&press(15.0, 15.0), &area);
        assert_eq!(toggle.handle_event(&release(15.0, 15.0), &area), GuiEventKind::Changed);
        assert!(!toggle.is_on());

        toggle.set_state(true);
        assert!(toggle.is_on());
    }

    #[test]
    fn test_persist_renders_active_when_on() {
        let harness = Harness::new();
        let area = harness.area();
        let toggle = PersistButton::new("Overflow").on(true);
        let mut list = DrawList::new();
        toggle.render(&mut list, &area);

        let active = area.palette().active;
        assert!(matches!(list.commands()[0], DrawCommand::Fill { color, .. } if color.components == active.components));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Overflow"]);
    }
}
