//! Frames: labelled, resizable grouping rectangles drawn behind nodes.

use crate::input::PointerEvent;
use crate::item::{DrawContext, GestureContext, ItemId, ItemRect, ItemRef, SpatialItem};
use crate::surface::{FontSpec, Surface, rounded_rect_path};
use kurbo::{Point, Rect, Stroke, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Height of the draggable title band.
pub const FRAME_HANDLE_SIZE: f64 = 20.0;
/// Thickness of the resize border straddling each edge.
pub const FRAME_RESIZE_HANDLE_SIZE: f64 = 10.0;
/// Frames never shrink below this width or height.
pub const FRAME_MIN_SIZE: f64 = 40.0;
/// Title font size in screen pixels.
pub const FRAME_TITLE_SIZE: f64 = 30.0;

/// Horizontal edge being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum XResize {
    #[default]
    None,
    Left,
    Right,
}

/// Vertical edge being resized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum YResize {
    #[default]
    None,
    Top,
    Bottom,
}

/// A grouping rectangle with a title band.
#[derive(Debug, Clone)]
pub struct Frame {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub show_title: bool,
    pub color: Color,
    rect: ItemRect,
    /// Height of the title band that accepts drags.
    pub handle_size: f64,
    /// Thickness of the resize borders.
    pub resize_handle_size: f64,
    hit: bool,
    x_resize: XResize,
    y_resize: YResize,
}

impl Frame {
    /// Create a frame at the given rectangle.
    pub fn new(rect: ItemRect) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "Frame".to_string(),
            description: String::new(),
            show_title: true,
            color: Color::from_rgba8(26, 0, 51, 255),
            rect,
            handle_size: FRAME_HANDLE_SIZE,
            resize_handle_size: FRAME_RESIZE_HANDLE_SIZE,
            hit: false,
            x_resize: XResize::None,
            y_resize: YResize::None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::Frame(self.id)
    }

    pub fn rect(&self) -> &ItemRect {
        &self.rect
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.rect.set_size(width, height);
    }

    /// Whether a pointer is engaged with this frame.
    pub fn is_hit(&self) -> bool {
        self.hit
    }

    /// Resize intent latched by the current gesture.
    pub fn resize_intent(&self) -> (XResize, YResize) {
        (self.x_resize, self.y_resize)
    }

    pub fn is_resizing(&self) -> bool {
        self.x_resize != XResize::None || self.y_resize != YResize::None
    }

    /// Title band in scene coordinates.
    pub fn handle_rect(&self) -> Rect {
        let bounds = self.rect.as_rect();
        Rect::new(bounds.x0, bounds.y0, bounds.x1, bounds.y0 + self.handle_size.min(self.rect.height()))
    }

    /// Which edges a press at `point` would resize.
    pub fn resize_intent_at(&self, point: Point) -> (XResize, YResize) {
        let half = self.resize_handle_size / 2.0;
        let outer = self.rect.as_rect().inflate(half, half);
        let inside = point.x >= outer.x0 && point.x <= outer.x1 && point.y >= outer.y0 && point.y <= outer.y1;
        if !inside {
            return (XResize::None, YResize::None);
        }

        let x = if (point.x - self.rect.left()).abs() <= half {
            XResize::Left
        } else if (point.x - self.rect.right()).abs() <= half {
            XResize::Right
        } else {
            XResize::None
        };
        let y = if (point.y - self.rect.top()).abs() <= half {
            YResize::Top
        } else if (point.y - self.rect.bottom()).abs() <= half {
            YResize::Bottom
        } else {
            YResize::None
        };
        (x, y)
    }

    /// Resize the latched edges by `delta`, keeping the opposite edges fixed.
    fn apply_resize(&mut self, delta: Vec2) {
        let mut bounds = self.rect.as_rect();
        // A frame already below the minimum may grow but never shrinks further.
        let min_width = FRAME_MIN_SIZE.min(bounds.width());
        let min_height = FRAME_MIN_SIZE.min(bounds.height());
        match self.x_resize {
            XResize::Left => bounds.x0 = (bounds.x0 + delta.x).min(bounds.x1 - min_width),
            XResize::Right => bounds.x1 = (bounds.x1 + delta.x).max(bounds.x0 + min_width),
            XResize::None => {}
        }
        match self.y_resize {
            YResize::Top => bounds.y0 = (bounds.y0 + delta.y).min(bounds.y1 - min_height),
            YResize::Bottom => bounds.y1 = (bounds.y1 + delta.y).max(bounds.y0 + min_height),
            YResize::None => {}
        }
        self.rect = ItemRect::from(bounds);
    }

    fn tinted(&self, alpha: f32) -> Color {
        self.color.with_alpha(alpha)
    }
}

impl SpatialItem for Frame {
    fn bounds(&self) -> Rect {
        self.rect.as_rect()
    }

    fn move_by(&mut self, delta: Vec2) {
        self.rect.translate(delta);
    }

    fn set_position(&mut self, position: Point) {
        self.rect.set_position(position);
    }

    /// Only the title band counts as "inside"; the body lets presses through
    /// to whatever lies underneath.
    fn is_point_inside(&self, point: Point) -> bool {
        let band = self.handle_rect();
        point.x >= band.x0 && point.x <= band.x1 && point.y >= band.y0 && point.y <= band.y1
    }

    fn hit_test(&self, point: Point) -> bool {
        let (x, y) = self.resize_intent_at(point);
        x != XResize::None || y != YResize::None || self.is_point_inside(point)
    }

    fn pointer_down(&mut self, event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        self.hit = true;
        (self.x_resize, self.y_resize) = self.resize_intent_at(event.position);
    }

    fn pointer_move(&mut self, event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        if !self.hit {
            return;
        }
        if self.is_resizing() {
            self.apply_resize(event.delta);
        } else {
            self.move_by(event.delta);
        }
    }

    fn pointer_up(&mut self, _event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        self.hit = false;
        self.x_resize = XResize::None;
        self.y_resize = YResize::None;
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        let bounds = self.rect.as_rect();
        let thin = Stroke::new(1.0);

        surface.stroke(&rounded_rect_path(bounds, 1.0), &thin, self.tinted(1.0));

        let handle = rounded_rect_path(self.handle_rect(), 1.0);
        surface.fill(&handle, self.tinted(0.5));
        surface.stroke(&handle, &thin, self.tinted(0.8));

        let body = Rect::new(bounds.x0, self.handle_rect().y1, bounds.x1, bounds.y1);
        surface.fill(&rounded_rect_path(body, 1.0), self.tinted(0.2));

        if self.show_title && !self.title.is_empty() {
            // Screen-space text so the title stays readable at any zoom.
            let zoom = ctx.viewport.zoom;
            let origin = Point::new(bounds.x0 * zoom, (bounds.y0 - 5.0) * zoom);
            surface.save();
            surface.set_transform(ctx.viewport.overlay_transform());
            surface.fill_text(
                &self.title,
                origin,
                &FontSpec::new(FRAME_TITLE_SIZE),
                Color::from_rgba8(240, 240, 240, 255),
            );
            surface.restore();
        }
    }
}
