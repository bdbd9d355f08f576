//! A frame plus its chrome.

use super::{CloseButton, DragBar, Frame, FrameBase, FrameConstructor, FrameId, FrameResult, ResizeGrip};
use crate::config::{ConfigResult, ConfigTable};
use crate::context::UiContext;
use crate::event::{FrameEvent, InputEvent};
use crate::layout::{LayoutResult, RectId, Space};
use crate::render::Surface;
use crate::widget::WidgetDispatcher;
use kurbo::{Point, Rect};

/// Height of the title bar as a fraction of the frame.
pub const BAR_HEIGHT: f64 = 0.08;

/// Width of the close button and resize grip as a fraction of the frame.
pub const CHROME_BUTTON_WIDTH: f64 = 0.08;

/// Frame border width in pixels.
const BORDER_WIDTH: f64 = 1.0;

/// Owns one frame: the outer rect, the chrome widgets and the frame itself,
/// whose content rect sits below the title bar.
pub struct FrameContainer {
    id: FrameId,
    rect: RectId,
    chrome: WidgetDispatcher,
    frame: Box<dyn Frame>,
}

impl FrameContainer {
    /// Build a container under `parent` with its box given in Resolution space.
    pub fn new(
        ctx: &mut UiContext,
        id: FrameId,
        parent: RectId,
        rect: Rect,
        constructor: FrameConstructor,
    ) -> LayoutResult<Self> {
        let outer = ctx.tree_mut().derive_child(parent, rect, Space::Resolution)?;
        let content = ctx
            .tree_mut()
            .derive_child(outer, Rect::new(0.0, BAR_HEIGHT, 1.0, 1.0), Space::Local)?;
        let frame = constructor(FrameBase::new(content));

        let mut chrome = WidgetDispatcher::new(outer);
        let edge = 1.0 - CHROME_BUTTON_WIDTH;
        chrome.new_widget(
            ctx,
            Rect::new(0.0, 0.0, edge, BAR_HEIGHT),
            Space::Local,
            DragBar::new(frame.type_name()),
        )?;
        chrome.new_widget(ctx, Rect::new(edge, 0.0, 1.0, BAR_HEIGHT), Space::Local, CloseButton::new())?;
        chrome.new_widget(ctx, Rect::new(edge, edge, 1.0, 1.0), Space::Local, ResizeGrip::new())?;

        Ok(Self {
            id,
            rect: outer,
            chrome,
            frame,
        })
    }

    /// Read a persisted Resolution box.
    pub fn load_rect(config: &ConfigTable) -> ConfigResult<Rect> {
        let (x, y) = (config.get_d("x")?, config.get_d("y")?);
        let (width, height) = (config.get_d("width")?, config.get_d("height")?);
        Ok(Rect::new(x, y, x + width, y + height))
    }

    /// Stable id assigned by the manager.
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Outer rect, chrome included.
    pub fn rect(&self) -> RectId {
        self.rect
    }

    pub fn type_name(&self) -> &'static str {
        self.frame.type_name()
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.frame.aspect_ratio()
    }

    /// Title bar, close button and resize grip.
    pub fn chrome(&self) -> &WidgetDispatcher {
        &self.chrome
    }

    pub fn frame(&self) -> &dyn Frame {
        self.frame.as_ref()
    }

    pub fn frame_mut(&mut self) -> &mut dyn Frame {
        self.frame.as_mut()
    }

    /// Typed access to the contained frame.
    pub fn frame_as<T: Frame>(&self) -> Option<&T> {
        self.frame.as_any().downcast_ref::<T>()
    }

    pub fn frame_as_mut<T: Frame>(&mut self) -> Option<&mut T> {
        self.frame.as_any_mut().downcast_mut::<T>()
    }

    /// Outer box in `space`. An unknown rect yields an empty box.
    pub fn get_box(&self, ctx: &UiContext, space: Space) -> Rect {
        ctx.tree().get_box(self.rect, space).unwrap_or(Rect::ZERO)
    }

    /// Move the outer box; content and widgets follow.
    pub fn set_box(&self, ctx: &mut UiContext, rect: Rect, space: Space) -> LayoutResult<()> {
        ctx.tree_mut().set_box(self.rect, rect, space)
    }

    pub fn contains_point(&self, ctx: &UiContext, point: Point) -> bool {
        ctx.tree()
            .contains_point(self.rect, point, Space::Absolute)
            .unwrap_or(false)
    }

    /// Check if a Resolution box overlaps this frame.
    pub fn overlaps(&self, ctx: &UiContext, rect: Rect) -> bool {
        ctx.tree()
            .overlaps(self.rect, rect, Space::Resolution)
            .unwrap_or(false)
    }

    /// Run the frame's first phase with its stored table, if any.
    pub fn pre_initialise(&mut self, ctx: &mut UiContext, config: Option<&ConfigTable>) -> FrameResult<()> {
        self.frame.pre_initialise(ctx, config)
    }

    /// Run the frame's second phase, once every frame exists.
    pub fn post_initialise(&mut self, ctx: &mut UiContext, config: Option<&ConfigTable>) -> FrameResult<()> {
        self.frame.post_initialise(ctx, config)
    }

    /// Offer an event to the chrome and the frame.
    ///
    /// A structural request from the chrome takes precedence over whatever the
    /// frame's widgets report.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &UiContext) -> FrameEvent {
        let chrome = self.chrome.dispatch(event, ctx);
        let inner = self.frame.handle_event(event, ctx);
        let kind = if chrome.kind.is_structural() {
            chrome.kind
        } else {
            inner.kind
        };
        FrameEvent {
            frame: Some(self.id),
            position: event.position(),
            kind: kind.into(),
        }
    }

    pub fn render2d(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        self.frame.render2d(surface, ctx);
    }

    /// Render the 3D content, restricted to the content rect.
    pub fn render3d(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        surface.set_viewport(self.frame.base().absolute(ctx));
        self.frame.render3d(surface, ctx);
    }

    pub fn render_gui(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        self.frame.render_gui(surface, ctx);
        self.chrome.render(surface, ctx);
        surface.stroke_rect(
            self.get_box(ctx, Space::Absolute),
            ctx.palette().aspect,
            BORDER_WIDTH,
        );
    }

    /// Write the frame's type and Resolution box, then the frame's own state.
    pub fn save_configuration(&self, ctx: &UiContext, config: &mut ConfigTable) {
        let bounds = self.get_box(ctx, Space::Resolution);
        config.set_s("type", self.frame.type_name());
        config.set_d("x", bounds.x0);
        config.set_d("y", bounds.y0);
        config.set_d("width", bounds.width());
        config.set_d("height", bounds.height());
        self.frame.save_configuration(config);
    }

    /// Remove the container's rect subtree.
    pub fn destroy(self, ctx: &mut UiContext) {
        if let Err(e) = ctx.tree_mut().remove(self.rect) {
            log::warn!("Frame {} had no rect: {}", self.id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{FrameEventKind, GuiEventKind, MouseButton};
    use crate::frame::tests::{Blank, Trigger};
    use crate::render::DrawList;
    use kurbo::Size;

    fn setup() -> (UiContext, FrameContainer) {
        let mut ctx = UiContext::new(Size::new(1000.0, 1000.0), Size::new(1000.0, 1000.0));
        let root = ctx.tree().root();
        let container = FrameContainer::new(
            &mut ctx,
            FrameId(7),
            root,
            Rect::new(100.0, 100.0, 300.0, 300.0),
            Blank::create,
        )
        .unwrap();
        (ctx, container)
    }

    fn press(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerPressed {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    fn release(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerReleased {
            position: Point::new(x, y),
            button: MouseButton::Left,
        }
    }

    #[test]
    fn test_content_below_bar() {
        let (ctx, container) = setup();
        let content = container.frame().base().absolute(&ctx);
        assert!((content.y0 - 116.0).abs() < 1e-9);
        assert!((content.y1 - 300.0).abs() < 1e-9);
        assert_eq!(container.chrome().len(), 3);
        assert_eq!(container.type_name(), "Blank");
    }

    #[test]
    fn test_chrome_requests() {
        let (ctx, mut container) = setup();

        let event = container.handle_event(&press(150.0, 105.0), &ctx);
        assert_eq!(event.kind, FrameEventKind::StartMove);
        assert_eq!(event.frame, Some(FrameId(7)));
        assert_eq!(event.position, Some(Point::new(150.0, 105.0)));
        assert_eq!(container.handle_event(&release(150.0, 105.0), &ctx).kind, FrameEventKind::StopMove);

        assert_eq!(container.handle_event(&press(295.0, 295.0), &ctx).kind, FrameEventKind::StartResize);
        assert_eq!(container.handle_event(&release(295.0, 295.0), &ctx).kind, FrameEventKind::StopResize);

        container.handle_event(&press(295.0, 105.0), &ctx);
        assert_eq!(container.handle_event(&release(295.0, 105.0), &ctx).kind, FrameEventKind::Closed);

        // The frame saw every event too
        assert_eq!(container.frame_as::<Blank>().unwrap().handled, 6);
    }

    #[test]
    fn test_frame_widgets_can_request() {
        let (mut ctx, mut container) = setup();
        let frame = container.frame_mut();
        frame
            .base_mut()
            .gui_mut()
            .new_widget(&mut ctx, Rect::new(0.0, 0.5, 0.5, 1.0), Space::Local, Trigger(GuiEventKind::Close))
            .unwrap();

        let event = container.handle_event(&press(120.0, 250.0), &ctx);
        assert_eq!(event.kind, FrameEventKind::Closed);
    }

    #[test]
    fn test_save_and_load_rect() {
        let (ctx, container) = setup();
        let mut config = ConfigTable::new();
        container.save_configuration(&ctx, &mut config);

        assert_eq!(config.get_s("type").unwrap(), "Blank");
        let loaded = FrameContainer::load_rect(&config).unwrap();
        assert!((loaded.x0 - 100.0).abs() < 1e-9);
        assert!((loaded.width() - 200.0).abs() < 1e-9);
        assert!((config.get_d("aspect").unwrap() - 1.0).abs() < 1e-12);

        let partial = ConfigTable::new();
        assert!(FrameContainer::load_rect(&partial).unwrap_err().is_not_found());
    }

    #[test]
    fn test_render_order_and_destroy() {
        let (mut ctx, container) = setup();
        let mut list = DrawList::new();
        container.render3d(&mut list, &ctx);
        container.render_gui(&mut list, &ctx);
        assert!(matches!(list.commands()[0], crate::render::DrawCommand::Viewport(_)));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["Blank", "x"]);

        let nodes = ctx.tree().node_count();
        let rect = container.rect();
        container.destroy(&mut ctx);
        assert!(!ctx.tree().contains(rect));
        // outer, content and three chrome rects
        assert_eq!(ctx.tree().node_count(), nodes - 5);
    }
}
