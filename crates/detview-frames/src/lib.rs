//! Concrete detview frames.
//!
//! - [`Histogram`]: hit values of the current event, with log and overflow toggles
//! - [`EventInfo`]: GTID, trigger word and hit counts
//! - [`Scene3d`]: module based 3D view
//!
//! Call [`register_frames`] to make them available to a frame manager.

pub mod event_info;
pub mod histogram;
pub mod scene3d;

pub use event_info::EventInfo;
pub use histogram::Histogram;
pub use scene3d::{Module3d, Scene3d};

use detview_core::FrameRegistry;

/// Register every frame type in this crate.
pub fn register_frames(registry: &mut FrameRegistry) {
    registry.register(Histogram::NAME, Histogram::create);
    registry.register(EventInfo::NAME, EventInfo::create);
    registry.register(Scene3d::NAME, Scene3d::create);
}
