//! Focus tracking and event routing for the widgets of one frame.

use super::{Area, GlobalWidgetId, Widget, WidgetId};
use crate::context::UiContext;
use crate::event::{GuiEvent, InputEvent};
use crate::layout::{LayoutResult, RectId, Space};
use crate::render::Surface;
use kurbo::{Point, Rect};

/// A managed widget and its bookkeeping.
struct WidgetSlot {
    id: WidgetId,
    global_id: GlobalWidgetId,
    rect: RectId,
    hidden: bool,
    widget: Box<dyn Widget>,
}

/// Owns the widgets of a frame and routes input to them.
///
/// Widgets are kept in insertion order, which is also the draw order, so the
/// last added widget is on top for hit-testing.
pub struct WidgetDispatcher {
    /// Rect every widget rect is derived from.
    owner: RectId,
    slots: Vec<WidgetSlot>,
    focus: Option<WidgetId>,
    next_id: u32,
}

impl WidgetDispatcher {
    /// Empty dispatcher whose widgets live inside `owner`.
    pub fn new(owner: RectId) -> Self {
        Self {
            owner,
            slots: Vec::new(),
            focus: None,
            next_id: 0,
        }
    }

    /// Rect the widget rects are derived from.
    pub fn owner(&self) -> RectId {
        self.owner
    }

    /// Add a widget positioned by `rect` (in `space`) inside the owner rect.
    pub fn new_widget<W: Widget>(
        &mut self,
        ctx: &mut UiContext,
        rect: Rect,
        space: Space,
        widget: W,
    ) -> LayoutResult<WidgetId> {
        let rect = ctx.tree_mut().derive_child(self.owner, rect, space)?;
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.slots.push(WidgetSlot {
            id,
            global_id: ctx.next_global_id(),
            rect,
            hidden: false,
            widget: Box::new(widget),
        });
        Ok(id)
    }

    /// Remove a widget and its rect. Returns false if the id is unknown.
    pub fn remove_widget(&mut self, ctx: &mut UiContext, id: WidgetId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let slot = self.slots.remove(index);
        if let Err(e) = ctx.tree_mut().remove(slot.rect) {
            log::warn!("Widget {} had no rect: {}", id, e);
        }
        if self.focus == Some(id) {
            self.focus = None;
        }
        true
    }

    /// Remove every widget.
    pub fn clear(&mut self, ctx: &mut UiContext) {
        for slot in self.slots.drain(..) {
            if let Err(e) = ctx.tree_mut().remove(slot.rect) {
                log::warn!("Widget {} had no rect: {}", slot.id, e);
            }
        }
        self.focus = None;
    }

    /// Number of managed widgets, hidden ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Widget ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.slots.iter().map(|slot| slot.id)
    }

    /// Widget that currently has input focus.
    pub fn focus(&self) -> Option<WidgetId> {
        self.focus
    }

    /// Process-wide id of a widget.
    pub fn global_id(&self, id: WidgetId) -> Option<GlobalWidgetId> {
        self.slot(id).map(|slot| slot.global_id)
    }

    /// Layout rect of a widget.
    pub fn rect(&self, id: WidgetId) -> Option<RectId> {
        self.slot(id).map(|slot| slot.rect)
    }

    /// Hide or show a widget. Hidden widgets are neither drawn nor hit.
    pub fn set_hidden(&mut self, id: WidgetId, hidden: bool) {
        if let Some(index) = self.index_of(id) {
            self.slots[index].hidden = hidden;
        }
    }

    pub fn is_hidden(&self, id: WidgetId) -> bool {
        self.slot(id).is_some_and(|slot| slot.hidden)
    }

    /// Typed access to a widget.
    pub fn widget<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        self.slot(id)?.widget.as_any().downcast_ref::<T>()
    }

    /// Typed mutable access to a widget.
    pub fn widget_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        let index = self.index_of(id)?;
        self.slots[index].widget.as_any_mut().downcast_mut::<T>()
    }

    /// Route an input event to the widgets and return the bubbled result.
    ///
    /// Pointer press and move events re-target focus before delivery, pointer
    /// release is delivered first and re-targets afterwards, and every other
    /// event goes to the current focus. A lost-focus event is broadcast to all
    /// widgets. When focus moves, the previous holder gets one lost-focus event.
    pub fn dispatch(&mut self, event: &InputEvent, ctx: &UiContext) -> GuiEvent {
        let old_focus = self.focus;
        let result = match event {
            InputEvent::LostFocus => {
                for slot in &mut self.slots {
                    slot.widget.handle_event(event, &Area::new(ctx, slot.rect));
                }
                self.focus = None;
                return GuiEvent::none();
            }
            InputEvent::PointerReleased { position, .. } => {
                let target = self.focus;
                let result = self.send(target, event, ctx);
                self.focus = self.find_widget(*position, ctx);
                result
            }
            InputEvent::PointerPressed { position, .. } | InputEvent::PointerMoved { position } => {
                self.focus = self.find_widget(*position, ctx);
                let target = self.focus;
                self.send(target, event, ctx)
            }
            _ => {
                let target = self.focus;
                self.send(target, event, ctx)
            }
        };
        if old_focus.is_some() && old_focus != self.focus {
            log::trace!("Widget focus {:?} -> {:?}", old_focus, self.focus);
            self.send(old_focus, &InputEvent::LostFocus, ctx);
        }
        result
    }

    /// Draw visible widgets in insertion order.
    pub fn render(&self, surface: &mut dyn Surface, ctx: &UiContext) {
        for slot in self.slots.iter().filter(|slot| !slot.hidden) {
            slot.widget.render(surface, &Area::new(ctx, slot.rect));
        }
    }

    fn send(&mut self, target: Option<WidgetId>, event: &InputEvent, ctx: &UiContext) -> GuiEvent {
        let Some(index) = target.and_then(|id| self.index_of(id)) else {
            return GuiEvent::none();
        };
        let slot = &mut self.slots[index];
        let kind = slot.widget.handle_event(event, &Area::new(ctx, slot.rect));
        GuiEvent::new(slot.id, kind)
    }

    /// Topmost visible widget containing the point.
    fn find_widget(&self, point: Point, ctx: &UiContext) -> Option<WidgetId> {
        self.slots
            .iter()
            .rev()
            .filter(|slot| !slot.hidden)
            .find(|slot| {
                ctx.tree()
                    .contains_point(slot.rect, point, Space::Absolute)
                    .unwrap_or(false)
            })
            .map(|slot| slot.id)
    }

    fn index_of(&self, id: WidgetId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.id == id)
    }

    fn slot(&self, id: WidgetId) -> Option<&WidgetSlot> {
        self.slots.iter().find(|slot| slot.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{GuiEventKind, MouseButton};
    use crate::render::DrawList;
    use kurbo::Size;
    use std::any::Any;

    /// Records everything it receives.
    #[derive(Default)]
    struct Probe {
        received: Vec<InputEvent>,
        reply: GuiEventKind,
        name: &'static str,
    }

    impl Probe {
        fn named(name: &'static str) -> Self {
            Self {
                name,
                ..Default::default()
            }
        }

        fn lost_focus_count(&self) -> usize {
            self.received
                .iter()
                .filter(|event| **event == InputEvent::LostFocus)
                .count()
        }
    }

    impl Widget for Probe {
        fn handle_event(&mut self, event: &InputEvent, _area: &Area<'_>) -> GuiEventKind {
            self.received.push(event.clone());
            self.reply
        }

        fn render(&self, surface: &mut dyn Surface, area: &Area<'_>) {
            surface.draw_text(area.absolute(), self.name, area.palette().text);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Fixture {
        ctx: UiContext,
        owner: RectId,
        gui: WidgetDispatcher,
    }

    impl Fixture {
        fn new() -> Self {
            let mut ctx = UiContext::new(Size::new(1000.0, 1000.0), Size::new(500.0, 500.0));
            let root = ctx.tree().root();
            let owner = ctx
                .tree_mut()
                .derive_child(root, Rect::from_origin_size((100.0, 100.0), (400.0, 400.0)), Space::Resolution)
                .unwrap();
            Self {
                ctx,
                owner,
                gui: WidgetDispatcher::new(owner),
            }
        }

        fn add(&mut self, local: Rect, probe: Probe) -> WidgetId {
            self.gui.new_widget(&mut self.ctx, local, Space::Local, probe).unwrap()
        }

        /// Absolute position of a point given as a fraction of the owner.
        fn at(&self, x: f64, y: f64) -> Point {
            self.ctx
                .tree()
                .convert_point(self.owner, Point::new(x, y), Space::Local, Space::Absolute)
                .unwrap()
        }

        fn press(&mut self, x: f64, y: f64) -> GuiEvent {
            let position = self.at(x, y);
            self.gui.dispatch(
                &InputEvent::PointerPressed {
                    position,
                    button: MouseButton::Left,
                },
                &self.ctx,
            )
        }

        fn release(&mut self, x: f64, y: f64) -> GuiEvent {
            let position = self.at(x, y);
            self.gui.dispatch(
                &InputEvent::PointerReleased {
                    position,
                    button: MouseButton::Left,
                },
                &self.ctx,
            )
        }

        fn probe(&self, id: WidgetId) -> &Probe {
            self.gui.widget::<Probe>(id).unwrap()
        }
    }

    fn quadrants(fixture: &mut Fixture) -> (WidgetId, WidgetId) {
        let w0 = fixture.add(Rect::from_origin_size((0.0, 0.0), (0.5, 0.5)), Probe::named("w0"));
        let w1 = fixture.add(Rect::from_origin_size((0.5, 0.5), (0.5, 0.5)), Probe::named("w1"));
        (w0, w1)
    }

    #[test]
    fn test_new_widget_ids() {
        let mut fixture = Fixture::new();
        let (w0, w1) = quadrants(&mut fixture);
        assert_ne!(w0, w1);
        assert!(fixture.gui.global_id(w1).unwrap() > fixture.gui.global_id(w0).unwrap());
        assert_eq!(fixture.gui.len(), 2);
        assert_eq!(fixture.gui.ids().collect::<Vec<_>>(), vec![w0, w1]);

        let rect = fixture.gui.rect(w1).unwrap();
        let bounds = fixture.ctx.tree().get_box(rect, Space::Resolution).unwrap();
        assert_eq!(bounds, Rect::new(300.0, 300.0, 500.0, 500.0));
    }

    #[test]
    fn test_press_sets_focus_and_keys_follow() {
        let mut fixture = Fixture::new();
        let (w0, w1) = quadrants(&mut fixture);

        fixture.press(0.1, 0.1);
        assert_eq!(fixture.gui.focus(), Some(w0));

        fixture
            .gui
            .dispatch(&InputEvent::KeyPressed("a".to_string()), &fixture.ctx);

        let keys = |probe: &Probe| {
            probe
                .received
                .iter()
                .filter(|event| matches!(event, InputEvent::KeyPressed(_)))
                .count()
        };
        assert_eq!(keys(fixture.probe(w0)), 1);
        assert_eq!(keys(fixture.probe(w1)), 0);
    }

    #[test]
    fn test_topmost_widget_wins() {
        let mut fixture = Fixture::new();
        let back = fixture.add(Rect::new(0.0, 0.0, 1.0, 1.0), Probe::named("back"));
        let front = fixture.add(Rect::new(0.0, 0.0, 0.5, 0.5), Probe::named("front"));

        fixture.press(0.25, 0.25);
        assert_eq!(fixture.gui.focus(), Some(front));

        fixture.gui.set_hidden(front, true);
        fixture.press(0.25, 0.25);
        assert_eq!(fixture.gui.focus(), Some(back));
    }

    #[test]
    fn test_focus_change_sends_one_lost_focus() {
        let mut fixture = Fixture::new();
        let (w0, w1) = quadrants(&mut fixture);

        fixture.press(0.1, 0.1);
        fixture.press(0.9, 0.9);

        assert_eq!(fixture.gui.focus(), Some(w1));
        assert_eq!(fixture.probe(w0).lost_focus_count(), 1);
        assert_eq!(fixture.probe(w1).lost_focus_count(), 0);
    }

    #[test]
    fn test_release_goes_to_old_focus_first() {
        let mut fixture = Fixture::new();
        let (w0, w1) = quadrants(&mut fixture);

        fixture.press(0.1, 0.1);
        fixture.release(0.9, 0.9);

        let w0_events = &fixture.probe(w0).received;
        assert!(matches!(w0_events[1], InputEvent::PointerReleased { .. }));
        assert_eq!(w0_events[2], InputEvent::LostFocus);
        assert!(fixture.probe(w1).received.is_empty());
        assert_eq!(fixture.gui.focus(), Some(w1));
    }

    #[test]
    fn test_lost_focus_broadcast() {
        let mut fixture = Fixture::new();
        let (w0, w1) = quadrants(&mut fixture);
        fixture.press(0.1, 0.1);

        let result = fixture.gui.dispatch(&InputEvent::LostFocus, &fixture.ctx);

        assert!(result.is_none());
        assert_eq!(fixture.gui.focus(), None);
        assert_eq!(fixture.probe(w0).lost_focus_count(), 1);
        assert_eq!(fixture.probe(w1).lost_focus_count(), 1);
    }

    #[test]
    fn test_no_focus_is_neutral() {
        let mut fixture = Fixture::new();
        let (w0, _) = quadrants(&mut fixture);

        let result = fixture
            .gui
            .dispatch(&InputEvent::KeyPressed("a".to_string()), &fixture.ctx);
        assert_eq!(result, GuiEvent::none());

        // Press outside every widget
        let result = fixture.press(0.75, 0.25);
        assert_eq!(result, GuiEvent::none());
        assert_eq!(fixture.gui.focus(), None);
        assert!(fixture.probe(w0).received.is_empty());
    }

    #[test]
    fn test_structural_request_bubbles() {
        let mut fixture = Fixture::new();
        let closer = fixture.add(
            Rect::new(0.0, 0.0, 1.0, 1.0),
            Probe {
                reply: GuiEventKind::Close,
                ..Probe::named("closer")
            },
        );

        let result = fixture.release(0.5, 0.5);
        // Nothing had focus when the release arrived
        assert!(result.is_none());

        let result = fixture.press(0.5, 0.5);
        assert_eq!(result, GuiEvent::new(closer, GuiEventKind::Close));
    }

    #[test]
    fn test_remove_focused_widget() {
        let mut fixture = Fixture::new();
        let (w0, _) = quadrants(&mut fixture);
        fixture.press(0.1, 0.1);
        let rect = fixture.gui.rect(w0).unwrap();

        assert!(fixture.gui.remove_widget(&mut fixture.ctx, w0));
        assert!(!fixture.gui.remove_widget(&mut fixture.ctx, w0));
        assert_eq!(fixture.gui.focus(), None);
        assert!(!fixture.ctx.tree().contains(rect));

        let result = fixture
            .gui
            .dispatch(&InputEvent::KeyPressed("a".to_string()), &fixture.ctx);
        assert!(result.is_none());
    }

    #[test]
    fn test_render_skips_hidden_in_order() {
        let mut fixture = Fixture::new();
        let (w0, _) = quadrants(&mut fixture);
        fixture.add(Rect::new(0.0, 0.0, 0.1, 0.1), Probe::named("w2"));
        fixture.gui.set_hidden(w0, true);

        let mut list = DrawList::new();
        fixture.gui.render(&mut list, &fixture.ctx);

        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["w1", "w2"]);
        assert!(fixture.gui.is_hidden(w0));
    }

    #[test]
    fn test_clear_removes_rects() {
        let mut fixture = Fixture::new();
        quadrants(&mut fixture);
        let before = fixture.ctx.tree().node_count();

        fixture.gui.clear(&mut fixture.ctx);

        assert!(fixture.gui.is_empty());
        assert_eq!(fixture.ctx.tree().node_count(), before - 2);
    }
}
