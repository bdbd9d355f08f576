//! Top-level viewer: window-level input, layout loading and saving.

use crate::config::{CONFIG_VERSION, ConfigTable, VERSION_KEY};
use crate::context::UiContext;
use crate::data::EventRecord;
use crate::event::{ESCAPE_KEY, InputEvent};
use crate::frame::{FrameId, FrameManager, FrameRegistry, FrameResult};
use crate::layout::LayoutResult;
use crate::render::{DEFAULT_PALETTE, Palette, Surface};
use kurbo::{Rect, Size};

/// Configuration attribute naming the GUI palette.
pub const PALETTE_KEY: &str = "palette";

/// Configuration table holding the frame layout.
pub const FRAMES_TABLE: &str = "Frames";

/// Startup geometry of a viewer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerSettings {
    /// Design canvas size.
    pub resolution: Size,
    /// Window size in pixels.
    pub window: Size,
    /// The frame area, Local to the whole window.
    pub area: Rect,
}

impl ViewerSettings {
    /// Settings whose design canvas matches the initial window.
    pub fn for_window(width: f64, height: f64) -> Self {
        let size = Size::new(width, height);
        Self {
            resolution: size,
            window: size,
            area: Rect::new(0.0, 0.0, 1.0, 1.0),
        }
    }
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::for_window(1280.0, 800.0)
    }
}

/// Whether the outer loop should keep running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Owns the UI context and the frame manager.
pub struct Viewer {
    ctx: UiContext,
    frames: FrameManager,
}

impl Viewer {
    pub fn new(settings: ViewerSettings, registry: FrameRegistry) -> LayoutResult<Self> {
        let mut ctx = UiContext::new(settings.resolution, settings.window);
        let frames = FrameManager::new(&mut ctx, settings.area, registry)?;
        Ok(Self { ctx, frames })
    }

    pub fn ctx(&self) -> &UiContext {
        &self.ctx
    }

    pub fn frames(&self) -> &FrameManager {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut FrameManager {
        &mut self.frames
    }

    /// Apply a stored configuration. Both initialisation phases run here, so
    /// every frame exists before any of them completes phase two.
    ///
    /// Returns the number of frames loaded.
    pub fn load(&mut self, config: Option<&ConfigTable>) -> usize {
        let Some(config) = config else {
            return 0;
        };
        match config.get_s(PALETTE_KEY) {
            Ok(name) => match Palette::by_name(name) {
                Some(palette) => self.ctx.set_palette(palette),
                None => log::warn!("Unknown palette {}, keeping {}", name, DEFAULT_PALETTE),
            },
            Err(e) => log::debug!("{}", e),
        }
        let layout = config.table(FRAMES_TABLE).ok();
        let created = self.frames.pre_initialise(&mut self.ctx, layout);
        let loaded = self.frames.post_initialise(&mut self.ctx, layout);
        log::info!("Loaded {} of {} frames", loaded, created);
        loaded
    }

    /// Add a frame of the named type wherever it fits.
    pub fn new_frame(&mut self, type_name: &str) -> FrameResult<FrameId> {
        self.frames.new_frame(&mut self.ctx, type_name)
    }

    /// Close a frame. Returns `false` if no frame has this id.
    pub fn delete_frame(&mut self, id: FrameId) -> bool {
        self.frames.delete_frame(&mut self.ctx, id)
    }

    /// Handle one window event.
    pub fn handle_input(&mut self, event: InputEvent) -> Flow {
        match event {
            InputEvent::Resized { width, height } => {
                self.ctx
                    .tree_mut()
                    .on_window_resize(f64::from(width), f64::from(height));
            }
            InputEvent::KeyPressed(ref key) if key == ESCAPE_KEY => return Flow::Exit,
            event => self.frames.handle_event(&event, &mut self.ctx),
        }
        Flow::Continue
    }

    pub fn event_loop(&mut self) {
        self.frames.event_loop(&mut self.ctx);
    }

    pub fn process_event(&mut self, record: &EventRecord) {
        self.frames.process_event(record);
    }

    pub fn render(&self, surface: &mut dyn Surface) {
        self.frames.render(surface, &self.ctx);
    }

    /// Snapshot the viewer state for the configuration file.
    pub fn save_configuration(&self) -> ConfigTable {
        let mut config = ConfigTable::new();
        config.set_i(VERSION_KEY, CONFIG_VERSION);
        config.set_s(PALETTE_KEY, self.ctx.palette().name.clone());
        self.frames
            .save_configuration(&self.ctx, config.new_table(FRAMES_TABLE));
        config
    }
}
