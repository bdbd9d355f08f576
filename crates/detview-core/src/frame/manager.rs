//! Frame layout, focus and drag/resize handling.

use super::{FrameContainer, FrameError, FrameId, FrameRegistry, FrameResult};
use crate::config::ConfigTable;
use crate::context::UiContext;
use crate::data::EventRecord;
use crate::event::{FrameEvent, FrameEventKind, InputEvent};
use crate::layout::{LayoutResult, RectId, Space};
use crate::render::Surface;
use kurbo::{Point, Rect, Size, Vec2};

/// Narrowest legal frame, in design units.
pub const MIN_FRAME_WIDTH: f64 = 120.0;

/// Width of an automatically placed frame, in design units.
pub const DEFAULT_FRAME_WIDTH: f64 = 121.0;

/// First auto-placement candidate offset, in design units.
pub const GRID_START: f64 = 0.1;

/// Auto-placement grid step, in design units.
pub const GRID_STEP: f64 = 10.0;

/// Interaction state of the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ManagerState {
    #[default]
    Normal,
    Moving,
    Resizing,
}

/// Outcome of a placement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Accepted,
    /// Not fully inside the manager's area.
    OutOfBounds,
    /// Narrower than [`MIN_FRAME_WIDTH`].
    TooSmall,
    /// Would overlap this frame.
    Overlaps(FrameId),
    UnknownFrame,
}

impl Placement {
    pub fn is_accepted(self) -> bool {
        self == Placement::Accepted
    }
}

/// Owns every frame, routes input to them and keeps their layout legal.
///
/// Frames never overlap and always lie inside the manager's area. Frames are
/// kept in creation order; when several contain a point the last one wins.
pub struct FrameManager {
    rect: RectId,
    registry: FrameRegistry,
    frames: Vec<FrameContainer>,
    next_id: u64,
    focus: Option<FrameId>,
    state: ManagerState,
    /// Pointer position when the current move/resize started, in pixels.
    press_position: Point,
    /// Press position relative to the frame's top-left corner, in pixels.
    press_offset: Vec2,
    /// Frames created from a configuration, awaiting their second phase.
    pending: Vec<(FrameId, String)>,
    changed: bool,
}

impl FrameManager {
    /// Create a manager whose area is `area` (Local to the mother rect).
    pub fn new(ctx: &mut UiContext, area: Rect, registry: FrameRegistry) -> LayoutResult<Self> {
        let root = ctx.tree().root();
        let rect = ctx.tree_mut().derive_child(root, area, Space::Local)?;
        Ok(Self {
            rect,
            registry,
            frames: Vec::new(),
            next_id: 0,
            focus: None,
            state: ManagerState::Normal,
            press_position: Point::ZERO,
            press_offset: Vec2::ZERO,
            pending: Vec::new(),
            changed: false,
        })
    }

    /// Rect of the area frames are placed in.
    pub fn rect(&self) -> RectId {
        self.rect
    }

    /// Frame types this manager can create.
    pub fn registry(&self) -> &FrameRegistry {
        &self.registry
    }

    /// Current interaction state.
    pub fn state(&self) -> ManagerState {
        self.state
    }

    /// Frame receiving non-broadcast input.
    pub fn focus(&self) -> Option<FrameId> {
        self.focus
    }

    pub fn press_position(&self) -> Point {
        self.press_position
    }

    pub fn press_offset(&self) -> Vec2 {
        self.press_offset
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frame ids in creation order.
    pub fn ids(&self) -> impl Iterator<Item = FrameId> + '_ {
        self.frames.iter().map(FrameContainer::id)
    }

    pub fn frames(&self) -> &[FrameContainer] {
        &self.frames
    }

    pub fn frame(&self, id: FrameId) -> Option<&FrameContainer> {
        self.frames.iter().find(|container| container.id() == id)
    }

    pub fn frame_mut(&mut self, id: FrameId) -> Option<&mut FrameContainer> {
        self.frames.iter_mut().find(|container| container.id() == id)
    }

    /// Check and clear the layout-changed flag.
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Move the manager's area (Local to the mother rect).
    pub fn set_area(&mut self, ctx: &mut UiContext, area: Rect) -> LayoutResult<()> {
        ctx.tree_mut().set_box(self.rect, area, Space::Local)?;
        self.changed = true;
        Ok(())
    }

    /// Create an auto-placed frame and run both initialisation phases.
    pub fn new_frame(&mut self, ctx: &mut UiContext, type_name: &str) -> FrameResult<FrameId> {
        let id = self.create_frame(ctx, type_name, None, None)?;
        self.post_initialise_frame(ctx, id, None)?;
        Ok(id)
    }

    /// Create a frame at a Resolution box and run both initialisation phases.
    ///
    /// An illegal box falls back to auto-placement.
    pub fn new_frame_at(&mut self, ctx: &mut UiContext, type_name: &str, rect: Rect) -> FrameResult<FrameId> {
        let id = self.create_frame(ctx, type_name, Some(rect), None)?;
        self.post_initialise_frame(ctx, id, None)?;
        Ok(id)
    }

    fn create_frame(
        &mut self,
        ctx: &mut UiContext,
        type_name: &str,
        rect: Option<Rect>,
        config: Option<&ConfigTable>,
    ) -> FrameResult<FrameId> {
        let constructor = self.registry.constructor(type_name)?;
        let id = FrameId(self.next_id);
        self.next_id += 1;

        // Start from a throwaway box; the real one is chosen below once the
        // frame knows its aspect ratio.
        let guess = Rect::new(0.0, 1.0, DEFAULT_FRAME_WIDTH, 1.0 + DEFAULT_FRAME_WIDTH);
        let mut container = FrameContainer::new(ctx, id, self.rect, guess, constructor)?;
        if let Err(e) = container.pre_initialise(ctx, config) {
            container.destroy(ctx);
            return Err(e);
        }

        let requested = rect.filter(|rect| {
            let placement = self.check_placement(ctx, None, *rect);
            if !placement.is_accepted() {
                log::warn!(
                    "Stored box {:?} for {} frame is unusable ({:?}), placing automatically",
                    rect,
                    type_name,
                    placement
                );
            }
            placement.is_accepted()
        });
        let size = Size::new(DEFAULT_FRAME_WIDTH, DEFAULT_FRAME_WIDTH * container.aspect_ratio());
        let Some(placed) = requested.or_else(|| self.auto_place(ctx, size)) else {
            container.destroy(ctx);
            return Err(FrameError::NoPlacement(type_name.to_string()));
        };
        container.set_box(ctx, placed, Space::Resolution)?;

        log::info!("Created {} frame {} at {:?}", type_name, id, placed);
        self.frames.push(container);
        self.changed = true;
        Ok(id)
    }

    fn post_initialise_frame(&mut self, ctx: &mut UiContext, id: FrameId, config: Option<&ConfigTable>) -> FrameResult<()> {
        let Some(container) = self.frame_mut(id) else {
            return Ok(());
        };
        if let Err(e) = container.post_initialise(ctx, config) {
            self.delete_frame(ctx, id);
            return Err(e);
        }
        Ok(())
    }

    /// First legal box of the given size on the placement grid, scanning rows
    /// top to bottom.
    fn auto_place(&self, ctx: &UiContext, size: Size) -> Option<Rect> {
        let area = ctx.tree().get_box(self.rect, Space::Resolution).ok()?;
        grid(area.height())
            .flat_map(|y| grid(area.width()).map(move |x| (x, y)))
            .map(|(x, y)| Rect::from_origin_size((area.x0 + x, area.y0 + y), size))
            .find(|candidate| self.check_placement(ctx, None, *candidate).is_accepted())
    }

    /// Check whether a Resolution box is a legal position for `target`.
    ///
    /// The box must lie inside the manager's area, be at least
    /// [`MIN_FRAME_WIDTH`] wide and not overlap any other frame.
    pub fn check_placement(&self, ctx: &UiContext, target: Option<FrameId>, rect: Rect) -> Placement {
        let inside = ctx
            .tree()
            .contains_rect(self.rect, rect, Space::Resolution)
            .unwrap_or(false);
        if !inside {
            return Placement::OutOfBounds;
        }
        if rect.width() < MIN_FRAME_WIDTH {
            return Placement::TooSmall;
        }
        self.frames
            .iter()
            .filter(|container| Some(container.id()) != target)
            .find(|container| container.overlaps(ctx, rect))
            .map_or(Placement::Accepted, |container| Placement::Overlaps(container.id()))
    }

    /// Move or resize a frame to a Resolution box if the box is legal.
    ///
    /// The frame is left untouched otherwise.
    pub fn try_place_frame(&mut self, ctx: &mut UiContext, id: FrameId, rect: Rect) -> Placement {
        if self.frame(id).is_none() {
            return Placement::UnknownFrame;
        }
        let placement = self.check_placement(ctx, Some(id), rect);
        if placement.is_accepted() {
            let applied = self
                .frame(id)
                .map(|container| container.set_box(ctx, rect, Space::Resolution));
            if let Some(Err(e)) = applied {
                log::warn!("Failed to place {}: {}", id, e);
                return Placement::UnknownFrame;
            }
            self.changed = true;
        }
        placement
    }

    /// Remove a frame. Focus and interaction state are reset.
    pub fn delete_frame(&mut self, ctx: &mut UiContext, id: FrameId) -> bool {
        let Some(index) = self.frames.iter().position(|container| container.id() == id) else {
            return false;
        };
        let container = self.frames.remove(index);
        log::info!("Deleted {} frame {}", container.type_name(), id);
        container.destroy(ctx);
        self.pending.retain(|(pending, _)| *pending != id);
        self.focus = None;
        self.state = ManagerState::Normal;
        self.changed = true;
        true
    }

    /// Last frame in creation order containing an absolute point.
    pub fn find_frame(&self, ctx: &UiContext, point: Point) -> Option<FrameId> {
        self.frames
            .iter()
            .rev()
            .find(|container| container.contains_point(ctx, point))
            .map(FrameContainer::id)
    }

    /// Feed one input event through the state machine.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut UiContext) {
        let old_focus = self.focus;
        let mut returned = FrameEvent::default();
        match self.state {
            ManagerState::Normal => match event {
                InputEvent::LostFocus => self.focus = None,
                InputEvent::PointerReleased { position, .. } => {
                    returned = self.send_event(self.focus, event, ctx);
                    self.focus = self.find_frame(ctx, *position);
                }
                InputEvent::PointerPressed { position, .. } | InputEvent::PointerMoved { position } => {
                    self.focus = self.find_frame(ctx, *position);
                    returned = self.send_event(self.focus, event, ctx);
                }
                _ => returned = self.send_event(self.focus, event, ctx),
            },
            ManagerState::Moving | ManagerState::Resizing => match event {
                // The focus change below delivers the frame's LostFocus
                InputEvent::LostFocus => {
                    self.state = ManagerState::Normal;
                    self.focus = None;
                }
                InputEvent::PointerReleased { .. } => {
                    returned = self.send_event(self.focus, event, ctx);
                    self.state = ManagerState::Normal;
                    self.focus = None;
                }
                InputEvent::PointerMoved { position } => {
                    if let Some(target) = self.focus {
                        self.update_frame_rect(ctx, target, *position);
                    }
                }
                _ => {}
            },
        }
        self.handle_frame_event(ctx, returned);

        if old_focus.is_some() && old_focus != self.focus {
            log::debug!("Frame focus {:?} -> {:?}", old_focus, self.focus);
            let lost = self.send_event(old_focus, &InputEvent::LostFocus, ctx);
            self.handle_frame_event(ctx, lost);
        }
    }

    fn send_event(&mut self, target: Option<FrameId>, event: &InputEvent, ctx: &UiContext) -> FrameEvent {
        let container = target.and_then(|id| self.frames.iter_mut().find(|container| container.id() == id));
        match container {
            Some(container) => container.handle_event(event, ctx),
            None => FrameEvent {
                frame: target,
                position: event.position(),
                kind: FrameEventKind::None,
            },
        }
    }

    /// Act on a structural request bubbled out of a frame.
    pub fn handle_frame_event(&mut self, ctx: &mut UiContext, event: FrameEvent) {
        match event.kind {
            FrameEventKind::None => {}
            FrameEventKind::Closed => {
                if let Some(id) = event.frame {
                    self.delete_frame(ctx, id);
                }
            }
            FrameEventKind::StartMove | FrameEventKind::StartResize => {
                let (Some(id), Some(position)) = (event.frame, event.position) else {
                    return;
                };
                let Some(container) = self.frame(id) else {
                    return;
                };
                let top_left = container.get_box(ctx, Space::Absolute).origin();
                self.state = if event.kind == FrameEventKind::StartMove {
                    ManagerState::Moving
                } else {
                    ManagerState::Resizing
                };
                self.focus = Some(id);
                self.press_position = position;
                self.press_offset = position - top_left;
                log::debug!("{:?} {} from {:?}", self.state, id, position);
            }
            FrameEventKind::StopMove | FrameEventKind::StopResize => {
                self.state = ManagerState::Normal;
                self.focus = None;
            }
        }
    }

    /// Follow the pointer while moving or resizing.
    fn update_frame_rect(&mut self, ctx: &mut UiContext, id: FrameId, position: Point) -> Placement {
        let Some(container) = self.frame(id) else {
            return Placement::UnknownFrame;
        };
        let current = container.get_box(ctx, Space::Absolute);
        let candidate = match self.state {
            ManagerState::Moving => {
                let origin = position - self.press_offset;
                ctx.tree().to_global(
                    Rect::from_origin_size(origin, current.size()),
                    Space::Absolute,
                    Space::Resolution,
                )
            }
            ManagerState::Resizing => {
                let width = position.x - self.press_position.x + self.press_offset.x;
                let resized = ctx.tree().to_global(
                    Rect::new(current.x0, current.y0, current.x0 + width, current.y1),
                    Space::Absolute,
                    Space::Resolution,
                );
                let height = resized.width() * container.aspect_ratio();
                Rect::new(resized.x0, resized.y0, resized.x1, resized.y0 + height)
            }
            ManagerState::Normal => return Placement::UnknownFrame,
        };
        self.try_place_frame(ctx, id, candidate)
    }

    /// Phase one of loading a layout: create the frame of every `Frame{n}`
    /// table. Returns the number of frames created.
    ///
    /// Frames that cannot be created are skipped with a warning.
    pub fn pre_initialise(&mut self, ctx: &mut UiContext, config: Option<&ConfigTable>) -> usize {
        self.focus = None;
        self.state = ManagerState::Normal;
        let Some(config) = config else {
            return 0;
        };
        let mut created = 0;
        for index in 0..config.num_tables() {
            let name = format!("Frame{}", index);
            let table = match config.table(&name) {
                Ok(table) => table,
                Err(e) => {
                    log::warn!("Stopping layout load: {}", e);
                    break;
                }
            };
            let result = table
                .get_s("type")
                .map_err(FrameError::from)
                .and_then(|type_name| {
                    let rect = FrameContainer::load_rect(table).ok();
                    self.create_frame(ctx, type_name, rect, Some(table))
                });
            match result {
                Ok(id) => {
                    self.pending.push((id, name));
                    created += 1;
                }
                Err(e) => log::warn!("Skipping {}: {}", name, e),
            }
        }
        created
    }

    /// Phase two of loading a layout, for the frames phase one created.
    /// Returns the number of frames that completed it.
    pub fn post_initialise(&mut self, ctx: &mut UiContext, config: Option<&ConfigTable>) -> usize {
        let mut completed = 0;
        for (id, name) in std::mem::take(&mut self.pending) {
            let table = config.and_then(|config| config.table(&name).ok());
            match self.post_initialise_frame(ctx, id, table) {
                Ok(()) => completed += 1,
                Err(e) => log::warn!("Dropped frame {} from {}: {}", id, name, e),
            }
        }
        completed
    }

    /// Write one `Frame{n}` table per frame, in creation order.
    pub fn save_configuration(&self, ctx: &UiContext, config: &mut ConfigTable) {
        for (index, container) in self.frames.iter().enumerate() {
            let table = config.new_table(&format!("Frame{}", index));
            container.save_configuration(ctx, table);
        }
    }

    pub fn event_loop(&mut self, ctx: &mut UiContext) {
        for container in &mut self.frames {
            container.frame_mut().event_loop(ctx);
        }
    }

    pub fn process_event(&mut self, record: &EventRecord) {
        for container in &mut self.frames {
            container.frame_mut().process_event(record);
        }
    }

    /// Render every frame: 3D content first, then 2D, then widgets.
    pub fn render(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        for container in &self.frames {
            container.render3d(surface, ctx);
        }
        for container in &self.frames {
            container.render2d(surface, ctx);
        }
        for container in &self.frames {
            container.render_gui(surface, ctx);
        }
    }
}

/// Grid offsets from [`GRID_START`] up to (excluding) `extent`.
fn grid(extent: f64) -> impl Iterator<Item = f64> {
    (0u32..)
        .map(|step| GRID_START + f64::from(step) * GRID_STEP)
        .take_while(move |offset| *offset < extent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::MouseButton;
    use crate::frame::tests::Blank;

    fn registry() -> FrameRegistry {
        let mut registry = FrameRegistry::new();
        registry.register(Blank::NAME, Blank::create);
        registry.register("Failing", Blank::create_failing);
        registry
    }

    /// Design canvas and window of the same size so Resolution equals Absolute.
    fn setup(width: f64, height: f64) -> (UiContext, FrameManager) {
        let mut ctx = UiContext::new(Size::new(width, height), Size::new(width, height));
        let manager = FrameManager::new(&mut ctx, Rect::new(0.0, 0.0, 1.0, 1.0), registry()).unwrap();
        (ctx, manager)
    }

    fn resolution_box(ctx: &UiContext, manager: &FrameManager, id: FrameId) -> Rect {
        manager.frame(id).unwrap().get_box(ctx, Space::Resolution)
    }

    fn assert_rect_eq(actual: Rect, expected: Rect) {
        let close = (actual.x0 - expected.x0).abs() < 1e-6
            && (actual.y0 - expected.y0).abs() < 1e-6
            && (actual.x1 - expected.x1).abs() < 1e-6
            && (actual.y1 - expected.y1).abs() < 1e-6;
        assert!(close, "{:?} != {:?}", actual, expected);
    }

    /// Every pair of frames is disjoint and inside the area.
    fn assert_layout_legal(ctx: &UiContext, manager: &FrameManager) {
        let boxes: Vec<_> = manager
            .frames()
            .iter()
            .map(|container| (container.id(), container.get_box(ctx, Space::Resolution)))
            .collect();
        for (id, bounds) in &boxes {
            assert!(ctx.tree().contains_rect(manager.rect(), *bounds, Space::Resolution).unwrap());
            for (other, other_bounds) in &boxes {
                if id != other {
                    let overlap = bounds.intersect(*other_bounds);
                    assert!(overlap.width() <= 1e-9 || overlap.height() <= 1e-9);
                }
            }
        }
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

    fn moved(x: f64, y: f64) -> InputEvent {
        InputEvent::PointerMoved {
            position: Point::new(x, y),
        }
    }

    fn blank(manager: &FrameManager, id: FrameId) -> &Blank {
        manager.frame(id).unwrap().frame_as::<Blank>().unwrap()
    }

    #[test]
    fn test_first_frame_at_first_grid_point() {
        let (mut ctx, mut manager) = setup(1920.0, 1080.0);

        let id = manager.new_frame(&mut ctx, Blank::NAME).unwrap();

        let bounds = resolution_box(&ctx, &manager, id);
        assert_rect_eq(bounds, Rect::from_origin_size((0.1, 0.1), (121.0, 121.0)));
        assert!(bounds.width() >= MIN_FRAME_WIDTH);
        assert_layout_legal(&ctx, &manager);
        assert!(blank(&manager, id).post_initialised);
        assert!(manager.take_changed());
        assert!(!manager.take_changed());
    }

    #[test]
    fn test_auto_placement_is_row_major() {
        let (mut ctx, mut manager) = setup(1920.0, 1080.0);

        let first = manager.new_frame(&mut ctx, Blank::NAME).unwrap();
        let second = manager.new_frame(&mut ctx, Blank::NAME).unwrap();

        let first_box = resolution_box(&ctx, &manager, first);
        let second_box = resolution_box(&ctx, &manager, second);
        // Same row, first grid column clear of the first frame
        assert!((second_box.y0 - first_box.y0).abs() < 1e-9);
        assert!((second_box.x0 - 130.1).abs() < 1e-9);
        assert_layout_legal(&ctx, &manager);
    }

    #[test]
    fn test_no_room_aborts_creation() {
        let (mut ctx, mut manager) = setup(100.0, 100.0);
        let nodes = ctx.tree().node_count();

        let result = manager.new_frame(&mut ctx, Blank::NAME);

        assert!(matches!(result, Err(FrameError::NoPlacement(_))));
        assert!(manager.is_empty());
        assert_eq!(ctx.tree().node_count(), nodes);
    }

    #[test]
    fn test_unknown_type() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        assert!(matches!(
            manager.new_frame(&mut ctx, "Nope"),
            Err(FrameError::UnknownType(_))
        ));
    }

    #[test]
    fn test_overlapping_resize_rejected() {
        let (mut ctx, mut manager) = setup(1000.0, 800.0);
        let a = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((0.0, 0.0), (400.0, 300.0)))
            .unwrap();
        let b = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((500.0, 400.0), (200.0, 200.0)))
            .unwrap();
        let before = resolution_box(&ctx, &manager, b);

        let placement = manager.try_place_frame(&mut ctx, b, Rect::from_origin_size((200.0, 200.0), (500.0, 300.0)));

        assert_eq!(placement, Placement::Overlaps(a));
        assert_eq!(resolution_box(&ctx, &manager, b), before);
    }

    #[test]
    fn test_placement_rules() {
        let (mut ctx, mut manager) = setup(1000.0, 800.0);
        let a = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((0.0, 0.0), (200.0, 200.0)))
            .unwrap();
        let before = resolution_box(&ctx, &manager, a);

        let narrow = Rect::from_origin_size((0.0, 0.0), (100.0, 100.0));
        assert_eq!(manager.try_place_frame(&mut ctx, a, narrow), Placement::TooSmall);
        assert_eq!(manager.try_place_frame(&mut ctx, a, narrow), Placement::TooSmall);
        assert_eq!(resolution_box(&ctx, &manager, a), before);

        let outside = Rect::from_origin_size((900.0, 0.0), (200.0, 200.0));
        assert_eq!(manager.try_place_frame(&mut ctx, a, outside), Placement::OutOfBounds);

        // Its own box never blocks a frame
        let shifted = Rect::from_origin_size((50.0, 0.0), (200.0, 200.0));
        assert_eq!(manager.try_place_frame(&mut ctx, a, shifted), Placement::Accepted);
        assert_rect_eq(resolution_box(&ctx, &manager, a), shifted);

        // Sharing an edge is fine
        let b = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((250.0, 0.0), (200.0, 200.0)))
            .unwrap();
        assert_rect_eq(resolution_box(&ctx, &manager, b), Rect::from_origin_size((250.0, 0.0), (200.0, 200.0)));

        let missing = FrameId(99);
        assert_eq!(manager.try_place_frame(&mut ctx, missing, shifted), Placement::UnknownFrame);
    }

    #[test]
    fn test_illegal_requested_box_falls_back() {
        let (mut ctx, mut manager) = setup(1000.0, 800.0);
        let id = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((950.0, 0.0), (200.0, 200.0)))
            .unwrap();
        assert_rect_eq(
            resolution_box(&ctx, &manager, id),
            Rect::from_origin_size((0.1, 0.1), (121.0, 121.0)),
        );
    }

    #[test]
    fn test_start_move_records_offset() {
        let (mut ctx, mut manager) = setup(1000.0, 800.0);
        let mut ids = Vec::new();
        for origin in [(300.0, 400.0), (500.0, 400.0), (100.0, 100.0)] {
            let rect = Rect::from_origin_size(origin, (150.0, 150.0));
            ids.push(manager.new_frame_at(&mut ctx, Blank::NAME, rect).unwrap());
        }
        assert_eq!(manager.state(), ManagerState::Normal);

        manager.handle_frame_event(
            &mut ctx,
            FrameEvent {
                frame: Some(ids[2]),
                position: Some(Point::new(150.0, 150.0)),
                kind: FrameEventKind::StartMove,
            },
        );

        assert_eq!(manager.state(), ManagerState::Moving);
        assert_eq!(manager.press_position(), Point::new(150.0, 150.0));
        assert!((manager.press_offset() - Vec2::new(50.0, 50.0)).hypot() < 1e-9);
        assert_eq!(manager.focus(), Some(ids[2]));
    }

    #[test]
    fn test_drag_moves_frame() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let id = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((100.0, 100.0), (200.0, 200.0)))
            .unwrap();

        // Title bar spans y 100..116
        manager.handle_event(&press(150.0, 105.0), &mut ctx);
        assert_eq!(manager.state(), ManagerState::Moving);
        assert!((manager.press_offset() - Vec2::new(50.0, 5.0)).hypot() < 1e-9);

        manager.handle_event(&moved(250.0, 305.0), &mut ctx);
        assert_rect_eq(
            resolution_box(&ctx, &manager, id),
            Rect::from_origin_size((200.0, 300.0), (200.0, 200.0)),
        );

        // Dragging past the edge is refused and the frame stays put
        manager.handle_event(&moved(950.0, 305.0), &mut ctx);
        assert_rect_eq(
            resolution_box(&ctx, &manager, id),
            Rect::from_origin_size((200.0, 300.0), (200.0, 200.0)),
        );

        manager.handle_event(&release(950.0, 305.0), &mut ctx);
        assert_eq!(manager.state(), ManagerState::Normal);
        assert_eq!(manager.focus(), None);
        assert_eq!(blank(&manager, id).lost_focus, 1);
    }

    #[test]
    fn test_resize_keeps_aspect() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let id = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((100.0, 100.0), (200.0, 200.0)))
            .unwrap();
        manager
            .frame_mut(id)
            .unwrap()
            .frame_as_mut::<Blank>()
            .unwrap()
            .aspect = 0.5;

        // Grip spans x and y 284..300
        manager.handle_event(&press(290.0, 290.0), &mut ctx);
        assert_eq!(manager.state(), ManagerState::Resizing);

        // Width follows the pointer: 390 - 100
        manager.handle_event(&moved(390.0, 290.0), &mut ctx);
        assert_rect_eq(
            resolution_box(&ctx, &manager, id),
            Rect::from_origin_size((100.0, 100.0), (290.0, 145.0)),
        );

        // Below the minimum width nothing changes
        manager.handle_event(&moved(200.0, 290.0), &mut ctx);
        assert_rect_eq(
            resolution_box(&ctx, &manager, id),
            Rect::from_origin_size((100.0, 100.0), (290.0, 145.0)),
        );

        manager.handle_event(&release(200.0, 290.0), &mut ctx);
        assert_eq!(manager.state(), ManagerState::Normal);
    }

    #[test]
    fn test_window_lost_focus_ends_move() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let start = Rect::from_origin_size((100.0, 100.0), (200.0, 200.0));
        let id = manager.new_frame_at(&mut ctx, Blank::NAME, start).unwrap();

        manager.handle_event(&press(150.0, 105.0), &mut ctx);
        assert_eq!(manager.state(), ManagerState::Moving);

        manager.handle_event(&InputEvent::LostFocus, &mut ctx);
        assert_eq!(manager.state(), ManagerState::Normal);
        assert_eq!(manager.focus(), None);
        assert_eq!(blank(&manager, id).lost_focus, 1);

        // Later motion no longer drags the frame
        manager.handle_event(&moved(250.0, 305.0), &mut ctx);
        assert_rect_eq(resolution_box(&ctx, &manager, id), start);
    }

    #[test]
    fn test_window_lost_focus_ends_resize() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let start = Rect::from_origin_size((100.0, 100.0), (200.0, 200.0));
        let id = manager.new_frame_at(&mut ctx, Blank::NAME, start).unwrap();

        manager.handle_event(&press(290.0, 290.0), &mut ctx);
        assert_eq!(manager.state(), ManagerState::Resizing);

        manager.handle_event(&InputEvent::LostFocus, &mut ctx);
        assert_eq!(manager.state(), ManagerState::Normal);
        assert_eq!(manager.focus(), None);
        assert_eq!(blank(&manager, id).lost_focus, 1);
        assert_rect_eq(resolution_box(&ctx, &manager, id), start);
    }

    #[test]
    fn test_focus_follows_pointer() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let a = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((0.0, 0.0), (200.0, 200.0)))
            .unwrap();
        let b = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((400.0, 400.0), (200.0, 200.0)))
            .unwrap();

        manager.handle_event(&moved(100.0, 150.0), &mut ctx);
        assert_eq!(manager.focus(), Some(a));
        manager.handle_event(&InputEvent::KeyPressed("k".to_string()), &mut ctx);
        assert_eq!(blank(&manager, a).handled, 2);
        assert_eq!(blank(&manager, b).handled, 0);

        manager.handle_event(&moved(500.0, 500.0), &mut ctx);
        assert_eq!(manager.focus(), Some(b));
        assert_eq!(blank(&manager, a).lost_focus, 1);

        manager.handle_event(&InputEvent::LostFocus, &mut ctx);
        assert_eq!(manager.focus(), None);
        assert_eq!(blank(&manager, b).lost_focus, 1);
        assert_eq!(blank(&manager, a).lost_focus, 1);
    }

    #[test]
    fn test_close_button_deletes_frame() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let a = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((0.0, 0.0), (200.0, 200.0)))
            .unwrap();
        let b = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((400.0, 400.0), (200.0, 200.0)))
            .unwrap();
        manager.take_changed();

        // Close button spans x 584..600, y 400..416
        manager.handle_event(&press(590.0, 405.0), &mut ctx);
        manager.handle_event(&release(590.0, 405.0), &mut ctx);

        assert_eq!(manager.ids().collect::<Vec<_>>(), vec![a]);
        assert!(manager.frame(b).is_none());
        assert_eq!(manager.focus(), None);
        assert!(manager.take_changed());

        // Ids stay stable after the deletion
        let c = manager.new_frame(&mut ctx, Blank::NAME).unwrap();
        assert!(c > b);
        assert_layout_legal(&ctx, &manager);
    }

    #[test]
    fn test_window_resize_scales_absolute() {
        let mut ctx = UiContext::new(Size::new(1000.0, 800.0), Size::new(1000.0, 800.0));
        let mut manager = FrameManager::new(&mut ctx, Rect::new(0.0, 0.0, 1.0, 1.0), registry()).unwrap();
        let id = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((100.0, 50.0), (200.0, 150.0)))
            .unwrap();
        let resolution = resolution_box(&ctx, &manager, id);
        let absolute = manager.frame(id).unwrap().get_box(&ctx, Space::Absolute);

        ctx.tree_mut().on_window_resize(2000.0, 1600.0);

        assert_rect_eq(resolution_box(&ctx, &manager, id), resolution);
        assert_rect_eq(
            manager.frame(id).unwrap().get_box(&ctx, Space::Absolute),
            absolute.scale_from_origin(2.0),
        );
    }

    #[test]
    fn test_save_and_reload_layout() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((10.0, 10.0), (200.0, 200.0)))
            .unwrap();
        manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((300.0, 10.0), (150.0, 150.0)))
            .unwrap();
        let mut config = ConfigTable::new();
        manager.save_configuration(&ctx, &mut config);
        assert_eq!(config.num_tables(), 2);

        let (mut ctx2, mut reloaded) = setup(1000.0, 1000.0);
        assert_eq!(reloaded.pre_initialise(&mut ctx2, Some(&config)), 2);
        assert_eq!(reloaded.post_initialise(&mut ctx2, Some(&config)), 2);

        let ids: Vec<_> = reloaded.ids().collect();
        assert_rect_eq(
            resolution_box(&ctx2, &reloaded, ids[1]),
            Rect::from_origin_size((300.0, 10.0), (150.0, 150.0)),
        );
        assert!(blank(&reloaded, ids[0]).post_initialised);
    }

    #[test]
    fn test_failed_initialisation_drops_only_that_frame() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let mut config = ConfigTable::new();
        config.new_table("Frame0").set_s("type", "Failing");
        config.new_table("Frame1").set_s("type", Blank::NAME);
        config.new_table("Frame2").set_s("type", "Unknown");

        assert_eq!(manager.pre_initialise(&mut ctx, Some(&config)), 2);
        assert_eq!(manager.post_initialise(&mut ctx, Some(&config)), 1);
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.frames()[0].type_name(), Blank::NAME);

        assert!(matches!(
            manager.new_frame(&mut ctx, "Failing"),
            Err(FrameError::Precondition(_))
        ));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_event_loop_and_render() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        manager.new_frame(&mut ctx, Blank::NAME).unwrap();
        manager.new_frame(&mut ctx, Blank::NAME).unwrap();

        let mut list = crate::render::DrawList::new();
        manager.render(&mut list, &ctx);
        let viewports = list
            .commands()
            .iter()
            .take(2)
            .filter(|command| matches!(command, crate::render::DrawCommand::Viewport(_)))
            .count();
        assert_eq!(viewports, 2);

        manager.event_loop(&mut ctx);
        manager.process_event(&EventRecord::new(1, 0));
    }

    #[test]
    fn test_set_area_moves_frames() {
        let (mut ctx, mut manager) = setup(1000.0, 1000.0);
        let id = manager
            .new_frame_at(&mut ctx, Blank::NAME, Rect::from_origin_size((0.0, 0.0), (200.0, 200.0)))
            .unwrap();
        manager.take_changed();

        manager.set_area(&mut ctx, Rect::new(0.0, 0.0, 0.5, 0.5)).unwrap();

        assert!(manager.take_changed());
        assert_rect_eq(
            resolution_box(&ctx, &manager, id),
            Rect::from_origin_size((0.0, 0.0), (100.0, 100.0)),
        );
    }
}
