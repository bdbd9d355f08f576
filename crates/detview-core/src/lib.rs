//! detview core library
//!
//! Layout tree, input routing and frame management for the detview event
//! display. Nothing here touches a window system; input arrives as
//! [`InputEvent`]s and drawing goes through a [`Surface`].

pub mod config;
pub mod context;
pub mod data;
pub mod event;
pub mod frame;
pub mod layout;
pub mod render;
pub mod viewer;
pub mod widget;

pub use config::{ConfigError, ConfigResult, ConfigTable, ConfigValue};
pub use context::UiContext;
pub use data::{EventRecord, ScalingRange};
pub use event::{FrameEvent, FrameEventKind, GuiEvent, GuiEventKind, InputEvent, MouseButton};
pub use frame::{
    Frame, FrameBase, FrameContainer, FrameError, FrameId, FrameManager, FrameRegistry, FrameResult,
    ManagerState, Placement,
};
pub use layout::{LayoutError, LayoutResult, RectId, RectTree, Space};
pub use render::{DrawCommand, DrawList, Palette, Surface};
pub use viewer::{Flow, Viewer, ViewerSettings};
pub use widget::{Area, GlobalWidgetId, GuiState, PressAction, PressTracker, Widget, WidgetDispatcher, WidgetId};
