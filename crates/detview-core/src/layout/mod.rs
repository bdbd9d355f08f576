//! Hierarchical layout rectangles.
//!
//! Every visual element (frame, widget, text block) is positioned by a node in a
//! [`RectTree`]. A node stores its box as a fraction of its parent's box and can
//! be queried in any [`Space`]:
//!
//! - [`Space::Local`]: fraction of the immediate parent's box.
//! - [`Space::Resolution`]: design units on the fixed design canvas, independent
//!   of the actual window shape.
//! - [`Space::Absolute`]: device pixels of the current window.

mod tree;

pub use tree::RectTree;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Tolerance used by the geometric predicates.
pub const EPSILON: f64 = 1e-9;

/// Unit space a box or point is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Space {
    /// Fraction of the parent's box.
    Local,
    /// Design units on the design canvas.
    Resolution,
    /// Device pixels.
    Absolute,
}

impl Space {
    /// All spaces, in conversion-chain order.
    pub const ALL: [Space; 3] = [Space::Local, Space::Resolution, Space::Absolute];
}

/// Opaque handle to a node in a [`RectTree`].
///
/// Ids are never reused, so a handle to a removed node stays invalid instead of
/// silently pointing at a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RectId(u64);

impl fmt::Display for RectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rect#{}", self.0)
    }
}

/// Layout errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Unknown rect: {0}")]
    UnknownRect(RectId),
}

/// Result type for layout operations.
pub type LayoutResult<T> = Result<T, LayoutError>;
