//! Graph nodes: titled rectangles with a thumbnail and ordered ports.

use crate::history::Action;
use crate::input::PointerEvent;
use crate::item::{DrawContext, GestureContext, ItemId, ItemRect, ItemRef, SpatialItem};
use crate::port::{Port, PortDirection};
use crate::surface::{FontSpec, Surface, ThumbnailId, hsla, rect_path, rounded_rect_path};
use kurbo::{Point, Rect, Stroke, Vec2};
use peniko::Color;
use uuid::Uuid;

/// Default node width and height.
pub const DEFAULT_NODE_SIZE: f64 = 100.0;
/// Height of the title bar drawn over the top of the node.
pub const TITLE_BAR_HEIGHT: f64 = 20.0;
/// Top and bottom padding for sparse port columns.
pub const PORT_EDGE_PADDING: f64 = 10.0;
/// Port count at which a column drops its edge padding.
pub const DENSE_PORT_COUNT: usize = 5;

/// Drag state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum NodeDrag {
    #[default]
    Idle,
    Dragging {
        start: Point,
    },
}

/// A graph node.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: ItemId,
    pub title: String,
    rect: ItemRect,
    /// Ports in insertion order.
    ports: Vec<Port>,
    /// Preview produced by the image backend.
    pub thumbnail: Option<ThumbnailId>,
    /// Last processing latency in milliseconds; `None` while unknown.
    pub processing_time: Option<f64>,
    /// Texture channel this node feeds (albedo, normal, height, ...).
    texture_channel: Option<String>,
    drag: NodeDrag,
}

impl Node {
    /// Create a node with the default size at the origin.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Create a node with a specific ID.
    pub fn with_id(id: ItemId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            rect: ItemRect::new(0.0, 0.0, DEFAULT_NODE_SIZE, DEFAULT_NODE_SIZE),
            ports: Vec::new(),
            thumbnail: None,
            processing_time: None,
            texture_channel: None,
            drag: NodeDrag::Idle,
        }
    }

    /// Handle to this node in the scene collections.
    pub fn item_ref(&self) -> ItemRef {
        ItemRef::Node(self.id)
    }

    pub fn rect(&self) -> &ItemRect {
        &self.rect
    }

    /// Resize and re-layout ports.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.rect.set_size(width, height);
        self.sort_ports();
    }

    /// Move so the center lands on `center` and re-layout ports.
    pub fn set_center(&mut self, center: Point) {
        self.rect.set_center(center);
        self.sort_ports();
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, NodeDrag::Dragging { .. })
    }

    pub fn set_thumbnail(&mut self, thumbnail: ThumbnailId) {
        self.thumbnail = Some(thumbnail);
    }

    /// Record a processing latency. Negative values mean "unknown".
    pub fn set_processing_time(&mut self, millis: f64) {
        self.processing_time = (millis >= 0.0).then_some(millis);
    }

    /// Hue used for the processing-time label: fast is green, slow is red.
    pub fn processing_speed(&self) -> f64 {
        let time = self.processing_time.unwrap_or(0.0);
        (160.0 - 5.0 * time).max(-5.0)
    }

    pub fn texture_channel(&self) -> Option<&str> {
        self.texture_channel.as_deref()
    }

    pub fn set_texture_channel(&mut self, channel: impl Into<String>) {
        self.texture_channel = Some(channel.into());
    }

    pub fn clear_texture_channel(&mut self) {
        self.texture_channel = None;
    }

    /// All ports in insertion order.
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Add a port and re-layout.
    pub fn add_port(&mut self, title: impl Into<String>, id: impl Into<String>, direction: PortDirection) -> &Port {
        self.ports.push(Port::new(id, title, direction, self.id));
        self.sort_ports();
        let index = self.ports.len() - 1;
        &self.ports[index]
    }

    /// Remove a port by id and re-layout.
    pub fn remove_port(&mut self, id: &str) -> Option<Port> {
        let index = self.ports.iter().position(|port| port.id == id)?;
        let port = self.ports.remove(index);
        self.sort_ports();
        Some(port)
    }

    pub fn in_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|port| port.direction == PortDirection::In)
    }

    pub fn out_ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|port| port.direction == PortDirection::Out)
    }

    /// Find a port by direction and exact title.
    pub fn find_port(&self, direction: PortDirection, title: &str) -> Option<&Port> {
        self.ports
            .iter()
            .find(|port| port.direction == direction && port.title == title)
    }

    pub fn in_port_by_name(&self, title: &str) -> Option<&Port> {
        self.find_port(PortDirection::In, title)
    }

    /// Out port by title. A missing or blank name means the default out port.
    pub fn out_port_by_name(&self, title: Option<&str>) -> Option<&Port> {
        match title {
            Some(title) if !title.is_empty() => self.find_port(PortDirection::Out, title),
            _ => self.default_out_port(),
        }
    }

    /// First out port in insertion order.
    pub fn default_out_port(&self) -> Option<&Port> {
        let port = self.out_ports().next();
        if port.is_none() {
            log::warn!("node '{}' ({}) has no output ports", self.title, self.id);
        }
        port
    }

    /// Lay ports out evenly along the left (In) and right (Out) edges.
    ///
    /// Each column of `n` ports gets `PORT_EDGE_PADDING` at both ends when
    /// `n < DENSE_PORT_COUNT`, then `n` equal slots with the port centered in
    /// its slot, in insertion order.
    pub fn sort_ports(&mut self) {
        let rect = self.rect;
        for direction in [PortDirection::In, PortDirection::Out] {
            let count = self.ports.iter().filter(|port| port.direction == direction).count();
            if count == 0 {
                continue;
            }
            let pad = if count < DENSE_PORT_COUNT { PORT_EDGE_PADDING } else { 0.0 };
            let incr = (rect.height() - pad * 2.0) / count as f64;
            let mid = incr / 2.0;
            for (i, port) in self
                .ports
                .iter_mut()
                .filter(|port| port.direction == direction)
                .enumerate()
            {
                port.set_center_on_owner_edge(&rect, pad + i as f64 * incr + mid);
            }
        }
    }

    fn outline_color(&self, ctx: &DrawContext<'_>) -> Color {
        if ctx.state.selected {
            hsla(0.0, 0.0, 100.0, 1.0)
        } else if ctx.state.hovered {
            hsla(0.0, 0.0, 24.0, 1.0)
        } else {
            hsla(0.0, 0.0, 20.0, 1.0)
        }
    }

    fn draw_centered_text(&self, surface: &mut dyn Surface, text: &str, baseline: f64, font: &FontSpec, color: Color) {
        let width = surface.measure_text(text, font);
        let origin = Point::new(self.rect.center().x - width / 2.0, baseline);
        surface.fill_text(text, origin, font, color);
    }
}

impl SpatialItem for Node {
    fn bounds(&self) -> Rect {
        self.rect.as_rect()
    }

    /// Translate the node and every port by the same delta. Layout is not
    /// recomputed, so ports keep their exact relative placement mid-drag.
    fn move_by(&mut self, delta: Vec2) {
        self.rect.translate(delta);
        for port in &mut self.ports {
            port.move_by(delta);
        }
    }

    fn set_position(&mut self, position: Point) {
        self.rect.set_position(position);
        self.sort_ports();
    }

    fn pointer_down(&mut self, _event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        self.drag = NodeDrag::Dragging {
            start: self.rect.position(),
        };
    }

    fn pointer_move(&mut self, event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        if self.is_dragging() {
            self.move_by(event.delta);
        }
    }

    fn pointer_up(&mut self, _event: &PointerEvent, ctx: &mut GestureContext<'_>) {
        let NodeDrag::Dragging { start } = std::mem::take(&mut self.drag) else {
            return;
        };
        let end = self.rect.position();
        if end == start {
            return;
        }
        match Action::new(vec![self.item_ref()], vec![start], vec![end]) {
            Ok(action) => ctx.history.push(action),
            Err(err) => log::warn!("dropping move of node {}: {err}", self.id),
        }
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        let bounds = self.rect.as_rect();
        let white = hsla(0.0, 0.0, 100.0, 1.0);

        if ctx.state.selected {
            surface.stroke(&rounded_rect_path(bounds, 2.0), &Stroke::new(8.0), white);
        }

        // Background shows through until the thumbnail arrives.
        surface.fill(&rounded_rect_path(bounds, 4.0), hsla(0.0, 0.0, 14.0, 1.0));
        if let Some(thumbnail) = self.thumbnail {
            surface.draw_image(thumbnail, bounds);
        }

        if !ctx.state.hovered {
            let title_bar = Rect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y0 + TITLE_BAR_HEIGHT);
            surface.fill(&rect_path(title_bar), hsla(0.0, 0.0, 26.0, 1.0));
            let font = FontSpec::new(9.0).with_weight(700);
            self.draw_centered_text(surface, &self.title, bounds.y0 + 14.0, &font, hsla(0.0, 0.0, 95.0, 1.0));
        }

        surface.stroke(&rounded_rect_path(bounds, 4.0), &Stroke::new(4.0), self.outline_color(ctx));

        for port in &self.ports {
            port.draw(surface, ctx);
        }

        let (label, color) = match self.processing_time {
            Some(time) => (format!("{time}ms"), hsla(self.processing_speed(), 100.0, 70.0, 0.9)),
            None => ("calculating . . .".to_string(), hsla(50.0, 100.0, 65.0, 0.9)),
        };
        let font = FontSpec::new(10.0).with_weight(500);
        self.draw_centered_text(surface, &label, bounds.y1 + 14.0, &font, color);

        if let Some(channel) = &self.texture_channel {
            let font = FontSpec::new(12.0);
            let label = channel.to_uppercase();
            self.draw_centered_text(surface, &label, bounds.y0 - 12.0, &font, hsla(166.0, 100.0, 60.0, 0.9));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::ActionLog;

    fn node_with_inputs(count: usize) -> Node {
        let mut node = Node::new("Blend");
        for i in 0..count {
            node.add_port(format!("in{i}"), format!("in{i}"), PortDirection::In);
        }
        node
    }

    fn drag(node: &mut Node, history: &mut ActionLog, deltas: &[Vec2]) {
        let mut ctx = GestureContext::new(history);
        node.pointer_down(&PointerEvent::down(node.position()), &mut ctx);
        for &delta in deltas {
            node.pointer_move(&PointerEvent::moved(node.position() + delta, delta), &mut ctx);
        }
        node.pointer_up(&PointerEvent::up(node.position()), &mut ctx);
    }

    #[test]
    fn test_three_inputs_layout() {
        let node = node_with_inputs(3);
        let ys: Vec<f64> = node.in_ports().map(|port| port.center().y).collect();
        let incr = 80.0 / 3.0;
        assert!((ys[0] - (10.0 + incr / 2.0)).abs() < 1e-9);
        assert!((ys[1] - 50.0).abs() < 1e-9);
        assert!((ys[2] - 76.666_666_666_7).abs() < 1e-6);
        assert!(node.in_ports().all(|port| port.center().x == 0.0));
    }

    #[test]
    fn test_sparse_layout_equal_spacing_within_padding() {
        for count in 1..DENSE_PORT_COUNT {
            let node = node_with_inputs(count);
            let ys: Vec<f64> = node.in_ports().map(|port| port.center().y).collect();
            assert!(ys.iter().all(|&y| (PORT_EDGE_PADDING..=100.0 - PORT_EDGE_PADDING).contains(&y)));
            for pair in ys.windows(2) {
                assert!(((pair[1] - pair[0]) - 80.0 / count as f64).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_dense_layout_drops_padding() {
        let node = node_with_inputs(5);
        let ys: Vec<f64> = node.in_ports().map(|port| port.center().y).collect();
        assert!((ys[0] - 10.0).abs() < 1e-9);
        assert!((ys[4] - 90.0).abs() < 1e-9);
        for pair in ys.windows(2) {
            assert!(((pair[1] - pair[0]) - 20.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_directions_laid_out_independently() {
        let mut node = Node::new("Split");
        node.add_port("src", "src", PortDirection::In);
        node.add_port("r", "r", PortDirection::Out);
        node.add_port("g", "g", PortDirection::Out);
        let input = node.in_port_by_name("src").unwrap();
        assert_eq!(input.center(), Point::new(0.0, 50.0));
        let outs: Vec<Point> = node.out_ports().map(Port::center).collect();
        assert_eq!(outs[0], Point::new(100.0, 30.0));
        assert_eq!(outs[1], Point::new(100.0, 70.0));
    }

    #[test]
    fn test_resize_relayouts_ports() {
        let mut node = node_with_inputs(2);
        node.set_size(150.0, 200.0);
        let ys: Vec<f64> = node.in_ports().map(|port| port.center().y).collect();
        assert!((ys[0] - 55.0).abs() < 1e-9);
        assert!((ys[1] - 145.0).abs() < 1e-9);
    }

    #[test]
    fn test_remove_port_relayouts() {
        let mut node = node_with_inputs(3);
        let removed = node.remove_port("in1").unwrap();
        assert_eq!(removed.title, "in1");
        let ys: Vec<f64> = node.in_ports().map(|port| port.center().y).collect();
        assert_eq!(ys.len(), 2);
        assert!((ys[0] - 30.0).abs() < 1e-9);
        assert!(node.remove_port("missing").is_none());
    }

    #[test]
    fn test_port_lookup() {
        let mut node = Node::new("Mix");
        node.add_port("a", "1", PortDirection::In);
        node.add_port("out", "2", PortDirection::Out);
        node.add_port("mask", "3", PortDirection::Out);

        assert_eq!(node.find_port(PortDirection::In, "a").unwrap().id, "1");
        assert!(node.find_port(PortDirection::Out, "a").is_none());
        assert!(node.in_port_by_name("nope").is_none());
        assert_eq!(node.out_port_by_name(Some("mask")).unwrap().id, "3");
        assert_eq!(node.out_port_by_name(None).unwrap().id, "2");
        assert_eq!(node.out_port_by_name(Some("")).unwrap().id, "2");
    }

    #[test]
    fn test_default_out_port_missing() {
        let _ = env_logger::builder().is_test(true).try_init();
        let node = node_with_inputs(2);
        assert!(node.default_out_port().is_none());
        assert!(node.out_port_by_name(None).is_none());
    }

    #[test]
    fn test_move_carries_ports() {
        let mut node = node_with_inputs(3);
        let before: Vec<Point> = node.ports().iter().map(Port::center).collect();
        node.move_by(Vec2::new(12.5, -4.0));
        assert_eq!(node.position(), Point::new(12.5, -4.0));
        for (port, old) in node.ports().iter().zip(before) {
            assert_eq!(port.center(), old + Vec2::new(12.5, -4.0));
        }
    }

    #[test]
    fn test_drag_records_action() {
        let mut node = Node::new("Noise");
        node.set_position(Point::new(5.0, 5.0));
        let mut history = ActionLog::new();
        drag(&mut node, &mut history, &[Vec2::new(10.0, 0.0), Vec2::new(10.0, 0.0)]);

        assert_eq!(node.position(), Point::new(25.0, 5.0));
        assert_eq!(history.len(), 1);
        let action = history.last().unwrap();
        assert_eq!(action.items(), &[node.item_ref()]);
        assert_eq!(action.before(), &[Point::new(5.0, 5.0)]);
        assert_eq!(action.after(), &[Point::new(25.0, 5.0)]);
        assert!(!node.is_dragging());
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut node = Node::new("Noise");
        node.set_position(Point::new(5.0, 5.0));
        let mut history = ActionLog::new();
        drag(&mut node, &mut history, &[]);
        assert!(history.is_empty());
        assert_eq!(node.position(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_drag_back_to_start_records_nothing() {
        let mut node = Node::new("Noise");
        let mut history = ActionLog::new();
        drag(&mut node, &mut history, &[Vec2::new(8.0, 3.0), Vec2::new(-8.0, -3.0)]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut node = Node::new("Noise");
        let mut history = ActionLog::new();
        let mut ctx = GestureContext::new(&mut history);
        node.pointer_move(&PointerEvent::moved(Point::new(5.0, 5.0), Vec2::new(5.0, 5.0)), &mut ctx);
        assert_eq!(node.position(), Point::ZERO);
    }

    #[test]
    fn test_processing_speed() {
        let mut node = Node::new("Blur");
        node.set_processing_time(10.0);
        assert!((node.processing_speed() - 110.0).abs() < f64::EPSILON);
        node.set_processing_time(100.0);
        assert!((node.processing_speed() + 5.0).abs() < f64::EPSILON);
        node.set_processing_time(-1.0);
        assert!(node.processing_time.is_none());
    }

    #[test]
    fn test_texture_channel() {
        let mut node = Node::new("Output");
        node.set_texture_channel("albedo");
        assert_eq!(node.texture_channel(), Some("albedo"));
        node.clear_texture_channel();
        assert!(node.texture_channel().is_none());
    }
}
