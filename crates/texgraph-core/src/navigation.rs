//! Navigation bookmarks: labelled pins that remember a view.

use crate::input::PointerEvent;
use crate::item::{DrawContext, GestureContext, ItemId, ItemRect, ItemRef, SpatialItem};
use crate::surface::{FontSpec, Surface, rounded_rect_path};
use crate::viewport::Viewport;
use kurbo::{Point, Rect, Size, Vec2};
use peniko::Color;
use uuid::Uuid;

/// Size of the pin drawn on the canvas.
pub const NAVIGATION_PIN_SIZE: f64 = 24.0;

/// A bookmark the user can jump back to.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub id: ItemId,
    pub label: String,
    rect: ItemRect,
    /// Zoom to restore when jumping to this bookmark.
    pub zoom: f64,
    hit: bool,
}

impl Navigation {
    pub fn new(label: impl Into<String>, position: Point) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.into(),
            rect: ItemRect::new(position.x, position.y, NAVIGATION_PIN_SIZE, NAVIGATION_PIN_SIZE),
            zoom: 1.0,
            hit: false,
        }
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::Navigation(self.id)
    }

    pub fn rect(&self) -> &ItemRect {
        &self.rect
    }

    /// View that centers this bookmark in a viewport of the given pixel size.
    pub fn target_view(&self, base: &Viewport, viewport: Size) -> Viewport {
        let mut view = base.clone();
        view.zoom = self.zoom.clamp(view.min_zoom, view.max_zoom);
        view.center_on(self.rect.center(), viewport);
        view
    }
}

impl SpatialItem for Navigation {
    fn bounds(&self) -> Rect {
        self.rect.as_rect()
    }

    fn move_by(&mut self, delta: Vec2) {
        self.rect.translate(delta);
    }

    fn set_position(&mut self, position: Point) {
        self.rect.set_position(position);
    }

    fn pointer_down(&mut self, _event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        self.hit = true;
    }

    fn pointer_move(&mut self, event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        if self.hit {
            self.move_by(event.delta);
        }
    }

    fn pointer_up(&mut self, _event: &PointerEvent, _ctx: &mut GestureContext<'_>) {
        self.hit = false;
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        let color = if ctx.state.hovered {
            Color::from_rgba8(125, 211, 252, 255)
        } else {
            Color::from_rgba8(56, 189, 248, 255)
        };
        surface.fill(&rounded_rect_path(self.rect.as_rect(), NAVIGATION_PIN_SIZE / 2.0), color);
        let origin = Point::new(self.rect.right() + 6.0, self.rect.center().y + 4.0);
        surface.fill_text(&self.label, origin, &FontSpec::new(12.0), Color::from_rgba8(240, 240, 240, 255));
    }
}
