//! The spatial item contract shared by every interactive scene element.

use crate::history::ActionLog;
use crate::input::PointerEvent;
use crate::scene::SceneItems;
use crate::surface::Surface;
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for scene items.
pub type ItemId = Uuid;

/// Non-owning handle to an item in one of the scene collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemRef {
    Node(ItemId),
    Comment(ItemId),
    Frame(ItemId),
    Navigation(ItemId),
}

impl ItemRef {
    /// The referenced item's id, whatever its collection.
    pub fn id(&self) -> ItemId {
        match self {
            ItemRef::Node(id)
            | ItemRef::Comment(id)
            | ItemRef::Frame(id)
            | ItemRef::Navigation(id) => *id,
        }
    }
}

/// Scene-space rectangle: top-left corner plus non-negative extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemRect {
    pub x: f64,
    pub y: f64,
    width: f64,
    height: f64,
}

impl ItemRect {
    /// Create a rectangle. Negative sizes are clamped to zero.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Set the extent. Negative sizes are clamped to zero.
    pub fn set_size(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Move so that the center lands on `center`.
    pub fn set_center(&mut self, center: Point) {
        self.x = center.x - self.width / 2.0;
        self.y = center.y - self.height / 2.0;
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Get the rectangle as a kurbo Rect.
    pub fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    /// Inclusive point containment.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

impl From<Rect> for ItemRect {
    fn from(rect: Rect) -> Self {
        let rect = rect.abs();
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

/// Positive-area overlap of two axis-aligned rectangles.
///
/// Rectangles that only share an edge do not overlap. Inputs are normalized
/// first, so either may have been built from a reversed corner pair.
pub fn rects_overlap(a: Rect, b: Rect) -> bool {
    a.abs().intersect(b.abs()).area() > 0.0
}

/// Per-draw presentation flags supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderState {
    pub hovered: bool,
    pub selected: bool,
}

impl RenderState {
    pub fn hovered() -> Self {
        Self {
            hovered: true,
            selected: false,
        }
    }

    pub fn selected() -> Self {
        Self {
            hovered: false,
            selected: true,
        }
    }
}

/// Everything an item may read while drawing.
#[derive(Clone, Copy)]
pub struct DrawContext<'a> {
    /// View transform, for overlays anchored in screen space.
    pub viewport: &'a Viewport,
    /// Scene collections, for items that draw other items (selection).
    pub scene: &'a SceneItems,
    /// Presentation flags for the item being drawn.
    pub state: RenderState,
}

impl<'a> DrawContext<'a> {
    pub fn new(viewport: &'a Viewport, scene: &'a SceneItems) -> Self {
        Self {
            viewport,
            scene,
            state: RenderState::default(),
        }
    }

    /// Same context with different presentation flags.
    pub fn with_state(self, state: RenderState) -> Self {
        Self { state, ..self }
    }
}

/// Mutable collaborators available to a pointer handler.
pub struct GestureContext<'a> {
    /// History that receives the Action when a gesture completes.
    pub history: &'a mut ActionLog,
    /// Scene collections. `None` while the handling item is itself borrowed
    /// out of those collections.
    pub scene: Option<&'a mut SceneItems>,
}

impl<'a> GestureContext<'a> {
    pub fn new(history: &'a mut ActionLog) -> Self {
        Self {
            history,
            scene: None,
        }
    }

    pub fn with_scene(mut self, scene: &'a mut SceneItems) -> Self {
        self.scene = Some(scene);
        self
    }
}

/// Common trait for everything placed in the scene.
pub trait SpatialItem {
    /// Bounding box in scene coordinates.
    fn bounds(&self) -> Rect;

    /// Translate by `delta`. Composite items move what they own as well.
    fn move_by(&mut self, delta: Vec2);

    /// Place the top-left corner exactly at `position`.
    fn set_position(&mut self, position: Point);

    /// Top-left corner of the bounds.
    fn position(&self) -> Point {
        self.bounds().origin()
    }

    /// Bounding-box overlap with another item.
    fn intersects(&self, other: &dyn SpatialItem) -> bool {
        rects_overlap(self.bounds(), other.bounds())
    }

    /// Point containment used by item-specific queries.
    fn is_point_inside(&self, point: Point) -> bool {
        let bounds = self.bounds();
        point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
    }

    /// Whether a press at `point` should be routed to this item.
    fn hit_test(&self, point: Point) -> bool {
        self.is_point_inside(point)
    }

    fn pointer_down(&mut self, _event: &PointerEvent, _ctx: &mut GestureContext<'_>) {}

    fn pointer_move(&mut self, _event: &PointerEvent, _ctx: &mut GestureContext<'_>) {}

    fn pointer_up(&mut self, _event: &PointerEvent, _ctx: &mut GestureContext<'_>) {}

    /// Render the item. Must not change the model.
    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>);
}
