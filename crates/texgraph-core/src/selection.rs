//! Rubber-band marquee and persistent group selection.
//!
//! With no members the selection is a marquee: a drag sweeps out a rectangle
//! and the release promotes every overlapping item into the group. With
//! members, a drag translates all of them rigidly and records one Action.

use crate::history::Action;
use crate::input::PointerEvent;
use crate::item::{DrawContext, GestureContext, ItemRect, ItemRef, SpatialItem};
use crate::scene::SceneItems;
use crate::surface::{Surface, dashed_stroke, rect_path};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;

const MARQUEE_DASH: [f64; 2] = [5.0, 3.0];
const MARQUEE_STROKE_WIDTH: f64 = 3.0;
const OUTLINE_STROKE_WIDTH: f64 = 5.0;

/// Marquee or group selection over scene items.
#[derive(Debug, Clone)]
pub struct Selection {
    origin: Point,
    /// Signed; may point up or left of the origin.
    extent: Vec2,
    items: Vec<ItemRef>,
    hit: bool,
    start_positions: Vec<Point>,
    pub color: Color,
}

impl Default for Selection {
    fn default() -> Self {
        Self::new()
    }
}

impl Selection {
    pub fn new() -> Self {
        Self {
            origin: Point::ZERO,
            extent: Vec2::ZERO,
            items: Vec::new(),
            hit: false,
            start_positions: Vec::new(),
            color: Color::from_rgb8(230, 230, 230),
        }
    }

    /// Group members in collection order.
    pub fn items(&self) -> &[ItemRef] {
        &self.items
    }

    pub fn is_group_mode(&self) -> bool {
        !self.items.is_empty()
    }

    pub fn is_marquee_mode(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a gesture is in progress.
    pub fn is_engaged(&self) -> bool {
        self.hit
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn extent(&self) -> Vec2 {
        self.extent
    }

    /// The marquee with non-negative width and height.
    pub fn marquee_rect(&self) -> Rect {
        Rect::from_points(self.origin, self.origin + self.extent)
    }

    /// Drop all members and return to marquee mode.
    pub fn clear(&mut self) {
        self.items.clear();
        self.start_positions.clear();
        self.hit = false;
        self.extent = Vec2::ZERO;
    }

    /// Replace the group members.
    pub fn set_items(&mut self, items: Vec<ItemRef>) {
        self.items = items;
        self.start_positions.clear();
    }

    pub fn contains(&self, item: ItemRef) -> bool {
        self.items.contains(&item)
    }

    /// Items whose bounds overlap the marquee, in collection order.
    pub fn hit_items(&self, scene: &SceneItems) -> Vec<ItemRef> {
        let marquee = self.marquee_rect();
        scene
            .iter()
            .filter(|(_, spatial)| crate::item::rects_overlap(spatial.bounds(), marquee))
            .map(|(item, _)| item)
            .collect()
    }

    /// Whether `point` lies inside any member's full bounds, edges included.
    pub fn contains_point(&self, scene: &SceneItems, point: Point) -> bool {
        self.items
            .iter()
            .filter_map(|item| scene.item(*item))
            .any(|spatial| ItemRect::from(spatial.bounds()).contains(point))
    }

    fn member_positions(&self, scene: &SceneItems) -> Vec<Point> {
        self.items
            .iter()
            .filter_map(|item| scene.item(*item))
            .map(|spatial| spatial.position())
            .collect()
    }

    fn outline(&self, surface: &mut dyn Surface, bounds: Rect) {
        let stroke = dashed_stroke(OUTLINE_STROKE_WIDTH, &MARQUEE_DASH);
        surface.stroke(&rect_path(bounds), &stroke, self.color);
    }
}

impl SpatialItem for Selection {
    fn bounds(&self) -> Rect {
        self.marquee_rect()
    }

    fn move_by(&mut self, delta: Vec2) {
        self.origin += delta;
    }

    fn set_position(&mut self, position: Point) {
        self.origin = position;
    }

    fn pointer_down(&mut self, event: &PointerEvent, ctx: &mut GestureContext<'_>) {
        self.hit = true;
        if self.is_marquee_mode() {
            self.origin = event.position;
            self.extent = Vec2::ZERO;
            return;
        }
        self.start_positions = match ctx.scene.as_deref() {
            Some(scene) => self.member_positions(scene),
            None => {
                log::warn!("group press without scene access");
                Vec::new()
            }
        };
    }

    fn pointer_move(&mut self, event: &PointerEvent, ctx: &mut GestureContext<'_>) {
        if !self.hit {
            return;
        }
        if self.is_marquee_mode() {
            self.extent += event.delta;
            return;
        }
        let Some(scene) = ctx.scene.as_deref_mut() else {
            log::warn!("group drag without scene access");
            return;
        };
        for item in &self.items {
            if let Some(spatial) = scene.item_mut(*item) {
                spatial.move_by(event.delta);
            }
        }
    }

    fn pointer_up(&mut self, _event: &PointerEvent, ctx: &mut GestureContext<'_>) {
        if !std::mem::replace(&mut self.hit, false) {
            return;
        }
        let Some(scene) = ctx.scene.as_deref() else {
            log::warn!("selection release without scene access");
            return;
        };

        if self.is_marquee_mode() {
            self.items = self.hit_items(scene);
            log::debug!("marquee selected {} item(s)", self.items.len());
            self.extent = Vec2::ZERO;
            return;
        }

        let before = std::mem::take(&mut self.start_positions);
        let after = self.member_positions(scene);
        if before.len() != self.items.len() || before == after {
            return;
        }
        match Action::new(self.items.clone(), before, after) {
            Ok(action) => ctx.history.push(action),
            Err(err) => log::warn!("dropping group move: {err}"),
        }
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        if self.is_marquee_mode() {
            if !self.hit {
                return;
            }
            let stroke = dashed_stroke(MARQUEE_STROKE_WIDTH, &MARQUEE_DASH);
            surface.stroke(&rect_path(self.marquee_rect()), &stroke, Color::from_rgb8(250, 250, 250));
            for item in self.hit_items(ctx.scene) {
                if let Some(spatial) = ctx.scene.item(item) {
                    self.outline(surface, spatial.bounds());
                }
            }
            return;
        }
        for item in &self.items {
            if let Some(spatial) = ctx.scene.item(*item) {
                self.outline(surface, spatial.bounds());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Comment;
    use crate::frame::Frame;
    use crate::history::ActionLog;
    use crate::node::Node;
    use crate::viewport::Viewport;
    use kurbo::Affine;

    fn node_at(x: f64, y: f64) -> Node {
        let mut node = Node::new("Blend");
        node.set_position(Point::new(x, y));
        node
    }

    fn sweep(selection: &mut Selection, scene: &mut SceneItems, history: &mut ActionLog, from: Point, to: Point) {
        let mut ctx = GestureContext::new(history).with_scene(scene);
        selection.pointer_down(&PointerEvent::down(from), &mut ctx);
        selection.pointer_move(&PointerEvent::moved(to, to - from), &mut ctx);
        selection.pointer_up(&PointerEvent::up(to), &mut ctx);
    }

    #[derive(Default)]
    struct StrokeCounter {
        strokes: usize,
        transform: Affine,
    }

    impl Surface for StrokeCounter {
        fn fill(&mut self, _path: &kurbo::BezPath, _color: Color) {}
        fn stroke(&mut self, _path: &kurbo::BezPath, _style: &kurbo::Stroke, _color: Color) {
            self.strokes += 1;
        }
        fn draw_image(&mut self, _image: crate::surface::ThumbnailId, _dest: Rect) {}
        fn measure_text(&mut self, text: &str, font: &crate::surface::FontSpec) -> f64 {
            text.len() as f64 * font.size * 0.5
        }
        fn fill_text(&mut self, _text: &str, _origin: Point, _font: &crate::surface::FontSpec, _color: Color) {}
        fn transform(&self) -> Affine {
            self.transform
        }
        fn set_transform(&mut self, transform: Affine) {
            self.transform = transform;
        }
        fn save(&mut self) {}
        fn restore(&mut self) {}
    }

    #[test]
    fn test_marquee_drag_scenario() {
        let mut scene = SceneItems::new();
        let node = scene.add_node(node_at(30.0, 30.0));
        let mut history = ActionLog::new();
        let mut selection = Selection::new();

        let mut ctx = GestureContext::new(&mut history).with_scene(&mut scene);
        selection.pointer_down(&PointerEvent::down(Point::new(10.0, 10.0)), &mut ctx);
        selection.pointer_move(
            &PointerEvent::moved(Point::new(50.0, 40.0), Vec2::new(40.0, 30.0)),
            &mut ctx,
        );
        assert_eq!(selection.marquee_rect(), Rect::new(10.0, 10.0, 50.0, 40.0));

        selection.pointer_up(&PointerEvent::up(Point::new(50.0, 40.0)), &mut ctx);
        assert!(selection.is_group_mode());
        assert_eq!(selection.items(), &[node]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_negative_extent_is_normalized() {
        let mut selection = Selection::new();
        let mut scene = SceneItems::new();
        let node = scene.add_node(node_at(0.0, 0.0));
        let mut history = ActionLog::new();
        let mut ctx = GestureContext::new(&mut history).with_scene(&mut scene);

        selection.pointer_down(&PointerEvent::down(Point::new(150.0, 150.0)), &mut ctx);
        selection.pointer_move(
            &PointerEvent::moved(Point::new(50.0, 50.0), Vec2::new(-100.0, -100.0)),
            &mut ctx,
        );
        assert_eq!(selection.extent(), Vec2::new(-100.0, -100.0));
        assert_eq!(selection.marquee_rect(), Rect::new(50.0, 50.0, 150.0, 150.0));

        selection.pointer_up(&PointerEvent::up(Point::new(50.0, 50.0)), &mut ctx);
        assert_eq!(selection.items(), &[node]);
    }

    #[test]
    fn test_hit_items_in_collection_order() {
        let mut scene = SceneItems::new();
        let frame = scene.add_frame(Frame::new(ItemRect::new(0.0, 0.0, 400.0, 400.0)));
        let comment = scene.add_comment(Comment::new("note", Point::new(120.0, 120.0)));
        let inside = scene.add_node(node_at(150.0, 150.0));
        let partial = scene.add_node(node_at(250.0, 250.0));
        scene.add_node(node_at(600.0, 600.0));

        let mut selection = Selection::new();
        selection.origin = Point::new(100.0, 100.0);
        selection.extent = Vec2::new(200.0, 200.0);
        assert_eq!(selection.hit_items(&scene), vec![inside, partial, comment, frame]);
    }

    #[test]
    fn test_marquee_touching_edge_excludes() {
        let mut scene = SceneItems::new();
        scene.add_node(node_at(100.0, 0.0));
        let mut selection = Selection::new();
        selection.extent = Vec2::new(100.0, 100.0);
        assert!(selection.hit_items(&scene).is_empty());
    }

    #[test]
    fn test_zero_area_marquee_stays_marquee() {
        let mut scene = SceneItems::new();
        scene.add_node(node_at(0.0, 0.0));
        let mut history = ActionLog::new();
        let mut selection = Selection::new();
        let mut ctx = GestureContext::new(&mut history).with_scene(&mut scene);
        selection.pointer_down(&PointerEvent::down(Point::new(50.0, 50.0)), &mut ctx);
        selection.pointer_up(&PointerEvent::up(Point::new(50.0, 50.0)), &mut ctx);
        assert!(selection.is_marquee_mode());
        assert!(!selection.is_engaged());
    }

    #[test]
    fn test_group_translation_is_rigid() {
        let mut scene = SceneItems::new();
        let a = scene.add_node(node_at(0.0, 0.0));
        let b = scene.add_node(node_at(130.5, -40.25));
        let mut history = ActionLog::new();
        let mut selection = Selection::new();
        selection.set_items(vec![a, b]);

        let before: Vec<Point> = [a, b].iter().map(|i| scene.item(*i).unwrap().position()).collect();
        let delta = Vec2::new(17.0, -3.5);
        sweep(&mut selection, &mut scene, &mut history, Point::new(10.0, 10.0), Point::new(10.0, 10.0) + delta);

        for (item, start) in [a, b].iter().zip(&before) {
            assert_eq!(scene.item(*item).unwrap().position(), *start + delta);
        }
        let action = history.last().unwrap();
        assert_eq!(action.items(), &[a, b]);
        assert_eq!(action.before(), before.as_slice());
        assert!(selection.is_group_mode());
    }

    #[test]
    fn test_group_press_without_move_records_nothing() {
        let mut scene = SceneItems::new();
        let a = scene.add_node(node_at(0.0, 0.0));
        let mut history = ActionLog::new();
        let mut selection = Selection::new();
        selection.set_items(vec![a]);
        sweep(&mut selection, &mut scene, &mut history, Point::new(5.0, 5.0), Point::new(5.0, 5.0));
        assert!(history.is_empty());
        assert_eq!(scene.item(a).unwrap().position(), Point::ZERO);
    }

    #[test]
    fn test_group_move_carries_ports() {
        let mut scene = SceneItems::new();
        let mut node = node_at(0.0, 0.0);
        node.add_port("out", "out", crate::port::PortDirection::Out);
        let a = scene.add_node(node);
        let mut history = ActionLog::new();
        let mut selection = Selection::new();
        selection.set_items(vec![a]);
        sweep(&mut selection, &mut scene, &mut history, Point::new(5.0, 5.0), Point::new(25.0, 15.0));

        let ItemRef::Node(id) = a else { unreachable!() };
        assert_eq!(scene.node(id).unwrap().ports()[0].center(), Point::new(120.0, 60.0));
    }

    #[test]
    fn test_contains_point_and_clear() {
        let mut scene = SceneItems::new();
        let a = scene.add_node(node_at(0.0, 0.0));
        let mut selection = Selection::new();
        selection.set_items(vec![a]);
        assert!(selection.contains_point(&scene, Point::new(100.0, 100.0)));
        assert!(!selection.contains_point(&scene, Point::new(101.0, 50.0)));
        selection.clear();
        assert!(selection.is_marquee_mode());
        assert!(!selection.contains(a));
    }

    #[test]
    fn test_contains_point_covers_frame_body() {
        let mut scene = SceneItems::new();
        let frame = scene.add_frame(Frame::new(ItemRect::new(0.0, 0.0, 300.0, 300.0)));
        let mut selection = Selection::new();
        selection.set_items(vec![frame]);
        assert!(selection.contains_point(&scene, Point::new(150.0, 150.0)));
        assert!(selection.contains_point(&scene, Point::new(300.0, 300.0)));
        assert!(!selection.contains_point(&scene, Point::new(301.0, 150.0)));
    }

    #[test]
    fn test_draw_idle_is_empty() {
        let scene = SceneItems::new();
        let viewport = Viewport::default();
        let mut surface = StrokeCounter::default();
        Selection::new().draw(&mut surface, &DrawContext::new(&viewport, &scene));
        assert_eq!(surface.strokes, 0);
    }

    #[test]
    fn test_draw_group_outlines_members() {
        let mut scene = SceneItems::new();
        let a = scene.add_node(node_at(0.0, 0.0));
        let b = scene.add_node(node_at(200.0, 0.0));
        let viewport = Viewport::default();
        let mut selection = Selection::new();
        selection.set_items(vec![a, b]);
        let mut surface = StrokeCounter::default();
        selection.draw(&mut surface, &DrawContext::new(&viewport, &scene));
        assert_eq!(surface.strokes, 2);
    }
}
