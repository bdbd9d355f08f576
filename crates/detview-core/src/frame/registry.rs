//! Frame factory keyed by type name.

use super::{Frame, FrameBase, FrameError, FrameResult};
use std::collections::BTreeMap;

/// Builds a frame around its base.
pub type FrameConstructor = fn(FrameBase) -> Box<dyn Frame>;

/// Known frame types.
#[derive(Clone, Default)]
pub struct FrameRegistry {
    constructors: BTreeMap<String, FrameConstructor>,
}

impl FrameRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame type. A second registration under the same name wins.
    pub fn register(&mut self, name: &str, constructor: FrameConstructor) {
        if self
            .constructors
            .insert(name.to_string(), constructor)
            .is_some()
        {
            log::warn!("Frame type {} registered twice", name);
        }
    }

    /// Whether a frame type of this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Constructor for a type name, or [`FrameError::UnknownType`].
    pub fn constructor(&self, name: &str) -> FrameResult<FrameConstructor> {
        self.constructors
            .get(name)
            .copied()
            .ok_or_else(|| FrameError::UnknownType(name.to_string()))
    }

    /// Build a frame of the named type.
    pub fn create(&self, name: &str, base: FrameBase) -> FrameResult<Box<dyn Frame>> {
        Ok(self.constructor(name)?(base))
    }

    /// Registered type names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}
