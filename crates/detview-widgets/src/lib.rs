//! Reusable widgets for detview frames.
//!
//! Every widget implements [`detview_core::Widget`] and is placed through a
//! frame's [`WidgetDispatcher`](detview_core::WidgetDispatcher):
//!
//! - **Buttons**: push buttons and persistent on/off toggles
//! - **CheckBox**: toggle with a box and a label
//! - **Label**: static text
//! - **MapArea**: pointer tracking over a plot

pub mod buttons;
pub mod checkbox;
pub mod label;
pub mod map_area;

pub use buttons::{Button, PersistButton};
pub use checkbox::CheckBox;
pub use label::Label;
pub use map_area::MapArea;
