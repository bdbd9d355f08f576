//! Shared state handed to frames and widgets.

use crate::layout::RectTree;
use crate::render::Palette;
use crate::widget::GlobalWidgetId;
use kurbo::Size;

/// Everything a frame or widget needs besides itself: the rect tree, the
/// widget id counter and the active palette.
///
/// One context exists per viewer; it is passed explicitly rather than living in
/// process globals.
#[derive(Debug, Clone)]
pub struct UiContext {
    tree: RectTree,
    palette: Palette,
    next_global_id: u64,
}

impl UiContext {
    /// Create a context for the given design resolution and window size.
    pub fn new(resolution: Size, window: Size) -> Self {
        Self {
            tree: RectTree::new(resolution, window),
            palette: Palette::default(),
            next_global_id: 0,
        }
    }

    pub fn tree(&self) -> &RectTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut RectTree {
        &mut self.tree
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Allocate the next process-unique widget id.
    pub fn next_global_id(&mut self) -> GlobalWidgetId {
        let id = GlobalWidgetId(self.next_global_id);
        self.next_global_id += 1;
        id
    }
}
