//! Native window shell around the viewer.

use crate::input::InputTranslator;
use detview_core::render::DrawList;
use detview_core::{EventRecord, Flow, FrameRegistry, LayoutError, Viewer, ViewerSettings, config};
use detview_frames::{EventInfo, Histogram, Scene3d, register_frames};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

/// Frames opened when there is no stored layout.
const DEFAULT_LAYOUT: [&str; 3] = [Histogram::NAME, EventInfo::NAME, Scene3d::NAME];

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Where the viewer configuration is read and written. `None` disables
    /// persistence.
    pub config_path: Option<PathBuf>,
    /// Redraws between two demo events.
    pub feed_interval: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "detview".to_string(),
            width: 1280,
            height: 800,
            config_path: config::default_path(),
            feed_interval: 60,
        }
    }
}

/// Produces a stream of synthetic detector events for the display.
#[derive(Debug, Clone)]
pub struct DemoFeed {
    interval: u32,
    ticks: u32,
    gtid: u32,
}

impl DemoFeed {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            ticks: 0,
            gtid: 0,
        }
    }

    /// Advance one redraw; returns a new event every `interval` redraws.
    pub fn tick(&mut self) -> Option<EventRecord> {
        self.ticks += 1;
        if self.ticks < self.interval {
            return None;
        }
        self.ticks = 0;
        self.gtid = self.gtid.wrapping_add(1);
        Some(Self::event(self.gtid))
    }

    /// A deterministic event: the hit count and values vary with the GTID.
    pub fn event(gtid: u32) -> EventRecord {
        let count = 50 + (gtid % 7) * 25;
        let hits = (0..count)
            .map(|hit| f64::from((hit * 37 + gtid * 11) % 110) - 5.0)
            .collect();
        let mut record = EventRecord::new(gtid, 1 << (gtid % 12)).with_hits(hits);
        record.uncalibrated_hits = (gtid % 5) as usize;
        record
    }
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    viewer: Viewer,
    window: Option<Arc<Window>>,
    input: InputTranslator,
    draw_list: DrawList,
    feed: DemoFeed,
}

impl App {
    /// Build the viewer and restore the stored layout, or open the default
    /// frames if there is none.
    pub fn new(app_config: AppConfig) -> Result<Self, AppError> {
        let mut registry = FrameRegistry::new();
        register_frames(&mut registry);
        let settings = ViewerSettings::for_window(f64::from(app_config.width), f64::from(app_config.height));
        let mut viewer = Viewer::new(settings, registry)?;

        let stored = app_config.config_path.as_deref().and_then(config::load_or_discard);
        let loaded = viewer.load(stored.as_ref());
        log::debug!("Restored {} frames", loaded);
        if stored.is_none() {
            for type_name in DEFAULT_LAYOUT {
                if let Err(e) = viewer.new_frame(type_name) {
                    log::warn!("Could not open {} frame: {}", type_name, e);
                }
            }
        }

        let feed = DemoFeed::new(app_config.feed_interval);
        Ok(Self {
            config: app_config,
            viewer,
            window: None,
            input: InputTranslator::new(),
            draw_list: DrawList::new(),
            feed,
        })
    }

    /// Run the application until the window closes.
    pub fn run() -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new(AppConfig::default())?;
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    /// Draw calls of the last redraw.
    pub fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    /// One redraw: feed data, let the frames react, then draw.
    pub fn update(&mut self) {
        if let Some(record) = self.feed.tick() {
            self.viewer.process_event(&record);
        }
        self.viewer.event_loop();
        if self.viewer.frames_mut().take_changed() {
            log::debug!("Layout changed, {} frames", self.viewer.frames().len());
        }
        self.draw_list.clear();
        self.viewer.render(&mut self.draw_list);
    }

    /// Write the configuration file, if persistence is enabled.
    pub fn save(&self) {
        let Some(path) = &self.config.config_path else {
            return;
        };
        match config::save(path, &self.viewer.save_configuration()) {
            Ok(()) => log::info!("Saved configuration to {}", path.display()),
            Err(e) => log::error!("Failed to save configuration to {}: {}", path.display(), e),
        }
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        self.save();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Creating window...");
        let attributes = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        match event_loop.create_window(attributes) {
            Ok(window) => {
                let window = Arc::new(window);
                let size = window.inner_size();
                self.viewer.handle_input(detview_core::InputEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.shutdown(event_loop),
            WindowEvent::RedrawRequested => {
                self.update();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::Resized(size) if size.width == 0 || size.height == 0 => {}
            event => {
                for input in self.input.translate(&event) {
                    if self.viewer.handle_input(input) == Flow::Exit {
                        self.shutdown(event_loop);
                        return;
                    }
                }
            }
        }
    }
}
