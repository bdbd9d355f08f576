//! Three dimensional detector view assembled from modules.

use detview_core::data::EventRecord;
use detview_core::render::Surface;
use detview_core::widget::{Area, WidgetId};
use detview_core::{ConfigTable, Frame, FrameBase, FrameError, FrameResult, Space, UiContext};
use detview_widgets::CheckBox;
use kurbo::Rect;
use std::any::Any;
use std::fmt;

const MODULES_KEY: &str = "modules";
const DISPLAY_AXES_KEY: &str = "DisplayAxes";

/// Module list used when nothing is configured.
pub const DEFAULT_MODULES: &str = "camera hits geometry";

/// Axis length as a fraction of the viewport's shorter side.
const AXIS_LENGTH: f64 = 0.4;

/// One part of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module3d {
    Camera,
    Hits,
    Tracks,
    Geometry,
    Fitter,
}

impl Module3d {
    /// Look up a module by its configuration name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "camera" => Some(Module3d::Camera),
            "hits" => Some(Module3d::Hits),
            "tracks" => Some(Module3d::Tracks),
            "geometry" => Some(Module3d::Geometry),
            "fitter" => Some(Module3d::Fitter),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Module3d::Camera => "camera",
            Module3d::Hits => "hits",
            Module3d::Tracks => "tracks",
            Module3d::Geometry => "geometry",
            Module3d::Fitter => "fitter",
        }
    }
}

impl fmt::Display for Module3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a space separated module list. Unknown names are skipped with a
/// warning, repeats are ignored.
pub fn parse_modules(list: &str) -> Vec<Module3d> {
    let mut modules = Vec::new();
    for name in list.split_whitespace() {
        match Module3d::from_name(name) {
            Some(module) if !modules.contains(&module) => modules.push(module),
            Some(_) => {}
            None => log::warn!("Unknown 3d module '{}'", name),
        }
    }
    modules
}

pub struct Scene3d {
    base: FrameBase,
    modules: Vec<Module3d>,
    display_axes: bool,
    axes_box: Option<WidgetId>,
    hits: usize,
    initialised: bool,
}

impl Scene3d {
    pub const NAME: &'static str = "Scene3d";

    pub fn create(base: FrameBase) -> Box<dyn Frame> {
        Box::new(Self {
            base,
            modules: parse_modules(DEFAULT_MODULES),
            display_axes: true,
            axes_box: None,
            hits: 0,
            initialised: false,
        })
    }

    pub fn modules(&self) -> &[Module3d] {
        &self.modules
    }

    pub fn has_module(&self, module: Module3d) -> bool {
        self.modules.contains(&module)
    }

    pub fn display_axes(&self) -> bool {
        self.display_axes
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Square viewport centred in the content box.
    fn viewport(bounds: Rect) -> Rect {
        let side = bounds.width().min(bounds.height());
        Rect::from_center_size(bounds.center(), (side, side))
    }
}

impl Frame for Scene3d {
    fn type_name(&self) -> &'static str {
        Self::NAME
    }

    fn base(&self) -> &FrameBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut FrameBase {
        &mut self.base
    }

    fn pre_initialise(&mut self, _ctx: &mut UiContext, config: Option<&ConfigTable>) -> FrameResult<()> {
        if let Some(config) = config {
            if let Ok(list) = config.get_s(MODULES_KEY) {
                self.modules = parse_modules(list);
            }
            if let Ok(display) = config.get_bool(DISPLAY_AXES_KEY) {
                self.display_axes = display;
            }
        }
        Ok(())
    }

    /// The scene cannot be drawn without a camera, so that is checked once
    /// the whole layout exists.
    fn post_initialise(&mut self, ctx: &mut UiContext, _config: Option<&ConfigTable>) -> FrameResult<()> {
        if self.initialised {
            return Ok(());
        }
        if !self.has_module(Module3d::Camera) {
            return Err(FrameError::Precondition(
                "3d scene requires a camera module".to_string(),
            ));
        }
        self.axes_box = Some(self.base.gui_mut().new_widget(
            ctx,
            Rect::new(0.0, 0.95, 0.3, 1.0),
            Space::Local,
            CheckBox::new("Display axes").checked(self.display_axes),
        )?);
        self.initialised = true;
        log::debug!(
            "3d scene ready with modules: {}",
            self.modules.iter().copied().map(Module3d::name).collect::<Vec<_>>().join(" ")
        );
        Ok(())
    }

    fn event_loop(&mut self, _ctx: &mut UiContext) {
        while self.base.pop_event().is_some() {}
        if let Some(id) = self.axes_box {
            if let Some(check) = self.base.gui().widget::<CheckBox>(id) {
                self.display_axes = check.is_checked();
            }
        }
    }

    fn process_event(&mut self, record: &EventRecord) {
        self.hits = record.hit_count();
    }

    fn render3d(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        if !self.initialised {
            return;
        }
        let area = Area::new(ctx, self.base.rect());
        let palette = area.palette();
        let viewport = Self::viewport(area.absolute());
        surface.set_viewport(viewport);
        if self.has_module(Module3d::Geometry) {
            surface.stroke_rect(viewport, palette.aspect, 1.0);
        }
        if self.display_axes {
            let centre = viewport.center();
            let length = viewport.width() * AXIS_LENGTH;
            surface.fill_rect(Rect::new(centre.x, centre.y, centre.x + length, centre.y + 1.0), palette.aspect);
            surface.fill_rect(Rect::new(centre.x, centre.y - length, centre.x + 1.0, centre.y), palette.aspect);
        }
        if self.has_module(Module3d::Hits) && self.hits > 0 {
            surface.draw_text(viewport, &format!("{} hits", self.hits), palette.data);
        }
    }

    fn save_configuration(&self, config: &mut ConfigTable) {
        let names: Vec<_> = self.modules.iter().copied().map(Module3d::name).collect();
        config.set_s(MODULES_KEY, names.join(" "));
        config.set_bool(DISPLAY_AXES_KEY, self.display_axes);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
