//! Input events and the result events bubbled back up the GUI hierarchy.

use crate::frame::FrameId;
use crate::widget::WidgetId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Key name that closes the viewer.
pub const ESCAPE_KEY: &str = "Escape";

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// A raw input event from the window system.
///
/// Positions are in absolute (device pixel) coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    KeyPressed(String),
    KeyReleased(String),
    Text(char),
    PointerPressed { position: Point, button: MouseButton },
    PointerReleased { position: Point, button: MouseButton },
    PointerMoved { position: Point },
    /// Input focus was lost (window level, or synthesized for a single object).
    LostFocus,
    Resized { width: u32, height: u32 },
}

impl InputEvent {
    /// Pointer position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerPressed { position, .. }
            | InputEvent::PointerReleased { position, .. }
            | InputEvent::PointerMoved { position } => Some(*position),
            _ => None,
        }
    }

    /// Check if this is a pointer event.
    pub fn is_pointer(&self) -> bool {
        self.position().is_some()
    }
}

/// What a widget asks of its owner after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GuiEventKind {
    /// Nothing to report.
    #[default]
    None,
    /// The widget's state changed; the owning frame should re-read it.
    Changed,
    /// Close the owning frame.
    Close,
    StartMove,
    StopMove,
    StartResize,
    StopResize,
}

impl GuiEventKind {
    /// Check if this is a request that the frame manager acts on.
    pub fn is_structural(self) -> bool {
        !matches!(self, GuiEventKind::None | GuiEventKind::Changed)
    }
}

/// Event bubbled out of a [`WidgetDispatcher`](crate::widget::WidgetDispatcher).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuiEvent {
    /// Widget that produced the event (`None` for the neutral event).
    pub widget: Option<WidgetId>,
    pub kind: GuiEventKind,
}

impl GuiEvent {
    /// The neutral event.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(widget: WidgetId, kind: GuiEventKind) -> Self {
        Self {
            widget: Some(widget),
            kind,
        }
    }

    /// Check if the event carries anything for the owner.
    pub fn is_none(&self) -> bool {
        self.kind == GuiEventKind::None
    }
}

/// Structural request a frame hands to the frame manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FrameEventKind {
    #[default]
    None,
    Closed,
    StartMove,
    StopMove,
    StartResize,
    StopResize,
}

impl FrameEventKind {
    pub fn is_structural(self) -> bool {
        self != FrameEventKind::None
    }
}

impl From<GuiEventKind> for FrameEventKind {
    fn from(kind: GuiEventKind) -> Self {
        match kind {
            GuiEventKind::None | GuiEventKind::Changed => FrameEventKind::None,
            GuiEventKind::Close => FrameEventKind::Closed,
            GuiEventKind::StartMove => FrameEventKind::StartMove,
            GuiEventKind::StopMove => FrameEventKind::StopMove,
            GuiEventKind::StartResize => FrameEventKind::StartResize,
            GuiEventKind::StopResize => FrameEventKind::StopResize,
        }
    }
}

/// Event bubbled out of a frame, tagged with where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameEvent {
    /// Frame that produced the event.
    pub frame: Option<FrameId>,
    /// Pointer position of the input event that caused it.
    pub position: Option<Point>,
    pub kind: FrameEventKind,
}
