//! Headless surface that records draw calls.

use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use peniko::Color;
use texgraph_core::surface::{FontSpec, Surface, ThumbnailId};

/// Width of one character as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// One recorded draw call with the transform active when it was issued.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    Fill {
        path: BezPath,
        color: Color,
        transform: Affine,
    },
    Stroke {
        path: BezPath,
        width: f64,
        dashes: Vec<f64>,
        color: Color,
        transform: Affine,
    },
    Image {
        image: ThumbnailId,
        dest: Rect,
        transform: Affine,
    },
    Text {
        text: String,
        origin: Point,
        size: f64,
        color: Color,
        transform: Affine,
    },
}

impl DrawCommand {
    pub fn transform(&self) -> Affine {
        match self {
            DrawCommand::Fill { transform, .. }
            | DrawCommand::Stroke { transform, .. }
            | DrawCommand::Image { transform, .. }
            | DrawCommand::Text { transform, .. } => *transform,
        }
    }
}

/// [`Surface`] that keeps every call in a list.
///
/// Text is measured with a fixed advance per character.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    transform: Affine,
    stack: Vec<Affine>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded calls in issue order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded calls, leaving the list empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Text of every `fill_text` call.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Forget recorded calls and reset the transform.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.stack.clear();
        self.transform = Affine::IDENTITY;
    }
}

impl Surface for RecordingSurface {
    fn fill(&mut self, path: &BezPath, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
            transform: self.transform,
        });
    }

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            width: style.width,
            dashes: style.dash_pattern.to_vec(),
            color,
            transform: self.transform,
        });
    }

    fn draw_image(&mut self, image: ThumbnailId, dest: Rect) {
        self.commands.push(DrawCommand::Image {
            image,
            dest,
            transform: self.transform,
        });
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64 {
        text.chars().count() as f64 * font.size * CHAR_WIDTH_FACTOR
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin,
            size: font.size,
            color,
            transform: self.transform,
        });
    }

    fn transform(&self) -> Affine {
        self.transform
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        match self.stack.pop() {
            Some(transform) => self.transform = transform,
            None => log::warn!("restore without matching save"),
        }
    }
}
