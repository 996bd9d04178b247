//! Free-text comments placed on the canvas.

use crate::input::PointerEvent;
use crate::item::{DrawContext, GestureContext, ItemId, ItemRect, ItemRef, SpatialItem};
use crate::surface::{FontSpec, Surface};
use kurbo::{Point, Rect, Vec2};
use peniko::Color;
use uuid::Uuid;

/// Font size of comment text.
pub const COMMENT_FONT_SIZE: f64 = 14.0;
/// Vertical distance between consecutive text lines.
pub const COMMENT_LINE_HEIGHT: f64 = 18.0;

/// A multi-line text note.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: ItemId,
    pub text: String,
    pub color: Color,
    rect: ItemRect,
    hit: bool,
}

impl Comment {
    /// Create a comment whose box is sized from the text's line count.
    pub fn new(text: impl Into<String>, position: Point) -> Self {
        let text = text.into();
        let lines = text.lines().count().max(1) as f64;
        let longest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0) as f64;
        Self {
            id: Uuid::new_v4(),
            // Rough extent until a surface measures the text.
            rect: ItemRect::new(
                position.x,
                position.y,
                (longest * COMMENT_FONT_SIZE * 0.6).max(COMMENT_FONT_SIZE),
                lines * COMMENT_LINE_HEIGHT,
            ),
            text,
            color: Color::from_rgba8(240, 240, 240, 255),
            hit: false,
        }
    }

    pub fn item_ref(&self) -> ItemRef {
        ItemRef::Comment(self.id)
    }

    pub fn rect(&self) -> &ItemRect {
        &self.rect
    }

    pub fn is_hit(&self) -> bool {
        self.hit
    }
}

impl SpatialItem for Comment {
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

    fn draw(&self, surface: &mut dyn Surface, _ctx: &DrawContext<'_>) {
        let font = FontSpec::new(COMMENT_FONT_SIZE);
        for (i, line) in self.text.lines().enumerate() {
            let baseline = self.rect.top() + COMMENT_FONT_SIZE + i as f64 * COMMENT_LINE_HEIGHT;
            surface.fill_text(line, Point::new(self.rect.left(), baseline), &font, self.color);
        }
    }
}
