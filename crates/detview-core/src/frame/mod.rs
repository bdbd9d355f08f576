//! Frames: self-contained panels laid out by the [`FrameManager`].
//!
//! A frame owns a content rect and a [`WidgetDispatcher`] for its widgets. The
//! [`FrameContainer`] wraps it with chrome (drag bar, close button, resize grip)
//! and the manager moves, resizes and deletes containers in response to the
//! structural requests they bubble up.

mod chrome;
mod container;
mod manager;
mod registry;

pub use chrome::{CloseButton, DragBar, ResizeGrip};
pub use container::{BAR_HEIGHT, CHROME_BUTTON_WIDTH, FrameContainer};
pub use manager::{
    DEFAULT_FRAME_WIDTH, FrameManager, GRID_START, GRID_STEP, MIN_FRAME_WIDTH, ManagerState,
    Placement,
};
pub use registry::{FrameConstructor, FrameRegistry};

use crate::config::{ConfigError, ConfigTable};
use crate::context::UiContext;
use crate::data::EventRecord;
use crate::event::{GuiEvent, InputEvent};
use crate::layout::{LayoutError, RectId, Space};
use crate::render::Surface;
use crate::widget::WidgetDispatcher;
use kurbo::Rect;
use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

/// Frame id, stable for the frame's lifetime and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub(crate) u64);

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

/// Frame errors.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Unknown frame type: {0}")]
    UnknownType(String),
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("No room for a new {0} frame")]
    NoPlacement(String),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Result type for frame operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// State every frame carries: its content rect, its widgets and the queue of
/// widget events waiting for [`Frame::event_loop`].
pub struct FrameBase {
    rect: RectId,
    gui: WidgetDispatcher,
    events: VecDeque<GuiEvent>,
}

impl FrameBase {
    /// State for a frame whose content lives in `rect`, with no widgets yet.
    pub fn new(rect: RectId) -> Self {
        Self {
            rect,
            gui: WidgetDispatcher::new(rect),
            events: VecDeque::new(),
        }
    }

    pub fn rect(&self) -> RectId {
        self.rect
    }

    pub fn gui(&self) -> &WidgetDispatcher {
        &self.gui
    }

    pub fn gui_mut(&mut self) -> &mut WidgetDispatcher {
        &mut self.gui
    }

    /// Content box in pixels.
    pub fn absolute(&self, ctx: &UiContext) -> Rect {
        ctx.tree()
            .get_box(self.rect, Space::Absolute)
            .unwrap_or(Rect::ZERO)
    }

    /// Dispatch to the widgets, queueing anything they report.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &UiContext) -> GuiEvent {
        let result = self.gui.dispatch(event, ctx);
        if !result.is_none() {
            self.events.push_back(result);
        }
        result
    }

    /// Next queued widget event.
    pub fn pop_event(&mut self) -> Option<GuiEvent> {
        self.events.pop_front()
    }

    pub fn pending_events(&self) -> usize {
        self.events.len()
    }
}

/// Capability contract of every frame type.
///
/// Initialisation is two-phase: [`pre_initialise`](Frame::pre_initialise) runs
/// as each frame is created, [`post_initialise`](Frame::post_initialise) once
/// every frame of a layout exists. References to sibling frames are only valid
/// from the second phase on.
pub trait Frame: Any {
    /// Registry tag of this frame type, also written to the configuration.
    fn type_name(&self) -> &'static str;

    fn base(&self) -> &FrameBase;

    fn base_mut(&mut self) -> &mut FrameBase;

    /// Height over width of the whole frame.
    fn aspect_ratio(&self) -> f64 {
        1.0
    }

    /// Create widgets and read persisted state.
    fn pre_initialise(&mut self, ctx: &mut UiContext, config: Option<&ConfigTable>) -> FrameResult<()>;

    fn post_initialise(&mut self, _ctx: &mut UiContext, _config: Option<&ConfigTable>) -> FrameResult<()> {
        Ok(())
    }

    /// Route an input event to the frame's widgets.
    fn handle_event(&mut self, event: &InputEvent, ctx: &UiContext) -> GuiEvent {
        self.base_mut().handle_event(event, ctx)
    }

    /// Drain queued widget events and update derived state.
    fn event_loop(&mut self, ctx: &mut UiContext);

    /// A new detector event is available.
    fn process_event(&mut self, _record: &EventRecord) {}

    fn render2d(&self, _surface: &mut dyn Surface, _ctx: &UiContext) {}

    fn render3d(&self, _surface: &mut dyn Surface, _ctx: &UiContext) {}

    fn render_gui(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        self.base().gui().render(surface, ctx);
    }

    fn save_configuration(&self, config: &mut ConfigTable);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
