//! Node ports (sockets).

use crate::item::{DrawContext, ItemId, ItemRect, SpatialItem};
use crate::surface::{PATH_TOLERANCE, Surface};
use kurbo::{Circle, Point, Rect, Shape as KurboShape, Stroke, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Radius of a port's drawn circle.
pub const PORT_RADIUS: f64 = 6.0;

/// Which edge of the node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Left edge.
    In,
    /// Right edge.
    Out,
}

/// A directional connection anchor owned by a node.
#[derive(Debug, Clone)]
pub struct Port {
    /// Identifier, unique within the owning node.
    pub id: String,
    pub title: String,
    pub direction: PortDirection,
    node: ItemId,
    center: Point,
}

impl Port {
    pub(crate) fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        direction: PortDirection,
        node: ItemId,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            direction,
            node,
            center: Point::ZERO,
        }
    }

    /// Id of the owning node.
    pub fn node(&self) -> ItemId {
        self.node
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Place the center on the owner's left (In) or right (Out) edge,
    /// `offset_y` below the owner's top.
    pub fn set_center_on_owner_edge(&mut self, owner: &ItemRect, offset_y: f64) {
        let x = match self.direction {
            PortDirection::In => owner.left(),
            PortDirection::Out => owner.right(),
        };
        self.center = Point::new(x, owner.top() + offset_y);
    }

    fn color(&self) -> Color {
        match self.direction {
            PortDirection::In => Color::from_rgba8(96, 165, 250, 255),
            PortDirection::Out => Color::from_rgba8(250, 204, 21, 255),
        }
    }
}

impl SpatialItem for Port {
    fn bounds(&self) -> Rect {
        Rect::from_center_size(self.center, (PORT_RADIUS * 2.0, PORT_RADIUS * 2.0))
    }

    fn move_by(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn set_position(&mut self, position: Point) {
        self.center = position + Vec2::new(PORT_RADIUS, PORT_RADIUS);
    }

    fn draw(&self, surface: &mut dyn Surface, _ctx: &DrawContext<'_>) {
        let path = Circle::new(self.center, PORT_RADIUS).to_path(PATH_TOLERANCE);
        surface.fill(&path, self.color());
        surface.stroke(&path, &Stroke::new(2.0), Color::from_rgba8(38, 38, 38, 255));
    }
}
