//! detview application shell
//!
//! Opens a window, turns its events into viewer input and keeps the
//! configuration file in sync with the frame layout.

mod app;
pub mod input;

pub use app::{App, AppConfig, AppError, DemoFeed};
pub use input::InputTranslator;
