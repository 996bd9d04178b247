//! Scene rendering over an abstract drawing surface.

use kurbo::{Affine, Rect, Size};
use peniko::Color;
use texgraph_core::item::{DrawContext, ItemRef, RenderState, SpatialItem};
use texgraph_core::scene::Scene;
use texgraph_core::surface::{Surface, rect_path};
use texgraph_core::viewport::Viewport;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Invalid thumbnail: {width}x{height} needs {expected} bytes, got {actual}")]
    InvalidThumbnail {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("Thumbnail decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
#[derive(Debug, Clone)]
pub struct RenderContext {
    /// View transform applied to scene items.
    pub viewport: Viewport,
    /// Output size in surface units.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Item under the pointer, if any.
    pub hovered: Option<ItemRef>,
}

impl RenderContext {
    /// Create a new render context with the default view.
    pub fn new(viewport_size: Size) -> Self {
        Self {
            viewport: Viewport::default(),
            viewport_size,
            background_color: Color::from_rgba8(38, 38, 38, 255),
            hovered: None,
        }
    }

    /// Set the view transform.
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the hovered item.
    pub fn with_hovered(mut self, hovered: Option<ItemRef>) -> Self {
        self.hovered = hovered;
        self
    }
}

/// Draws a [`Scene`] back to front onto any [`Surface`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SceneRenderer;

impl SceneRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render one frame.
    ///
    /// Clears with the background, then draws frames, comments, nodes and
    /// navigation pins in scene space, with the selection on top.
    pub fn render(&self, scene: &Scene, surface: &mut dyn Surface, ctx: &RenderContext) {
        surface.save();

        surface.set_transform(Affine::IDENTITY);
        let background = Rect::from_origin_size((0.0, 0.0), ctx.viewport_size);
        surface.fill(&rect_path(background), ctx.background_color);

        surface.set_transform(ctx.viewport.transform());
        let base = DrawContext::new(&ctx.viewport, &scene.items);
        for (item, spatial) in scene.items.draw_order() {
            let state = RenderState {
                hovered: ctx.hovered == Some(item),
                selected: scene.selection.contains(item),
            };
            spatial.draw(surface, &base.with_state(state));
        }

        let selection: &dyn SpatialItem = &scene.selection;
        selection.draw(surface, &base);

        surface.restore();
    }
}
