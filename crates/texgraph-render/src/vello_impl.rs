//! Vello-backed drawing surface.

use crate::thumbnails::ThumbnailStore;
use kurbo::{Affine, BezPath, Point, Rect, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, Layout, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use texgraph_core::surface::{FontSpec, Surface, ThumbnailId, rect_path};
use vello::Scene;

/// [`Surface`] that encodes draw calls into a [`vello::Scene`].
///
/// Text is laid out with Parley against the system font collection.
pub struct VelloSurface {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached to avoid rescanning fonts).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Pixel data for node thumbnails.
    thumbnails: ThumbnailStore,
    transform: Affine,
    stack: Vec<Affine>,
}

impl Default for VelloSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloSurface {
    pub fn new() -> Self {
        Self::with_thumbnails(ThumbnailStore::new())
    }

    pub fn with_thumbnails(thumbnails: ThumbnailStore) -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            thumbnails,
            transform: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// The encoded scene, ready to hand to a `vello::Renderer`.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn thumbnails(&self) -> &ThumbnailStore {
        &self.thumbnails
    }

    pub fn thumbnails_mut(&mut self) -> &mut ThumbnailStore {
        &mut self.thumbnails
    }

    /// Clear the scene and the transform stack for the next frame.
    pub fn reset(&mut self) {
        self.scene.reset();
        self.transform = Affine::IDENTITY;
        self.stack.clear();
    }

    fn layout(&mut self, text: &str, font: &FontSpec, brush: Brush) -> Layout<Brush> {
        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(font.size as f32));
        builder.push_default(StyleProperty::Brush(brush));
        builder.push_default(StyleProperty::FontWeight(parley::FontWeight::new(font.weight as f32)));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(
            parley::FontFamily::Named(font.family.as_str().into()),
        )));
        let mut layout = builder.build(text);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());
        layout
    }
}

impl Surface for VelloSurface {
    fn fill(&mut self, path: &BezPath, color: Color) {
        self.scene.fill(Fill::NonZero, self.transform, color, None, path);
    }

    fn stroke(&mut self, path: &BezPath, style: &Stroke, color: Color) {
        self.scene.stroke(style, self.transform, color, None, path);
    }

    fn draw_image(&mut self, image: ThumbnailId, dest: Rect) {
        let Some(data) = self.thumbnails.get(image).cloned() else {
            log::trace!("thumbnail {image:?} not loaded, drawing placeholder");
            self.fill(&rect_path(dest), Color::from_rgba8(80, 80, 80, 255));
            return;
        };
        let scale_x = dest.width() / data.width as f64;
        let scale_y = dest.height() / data.height as f64;
        let image_transform = self.transform
            * Affine::translate((dest.x0, dest.y0))
            * Affine::scale_non_uniform(scale_x, scale_y);
        self.scene.draw_image(&data.into(), image_transform);
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        self.layout(text, font, Brush::Solid(Color::WHITE)).width() as f64
    }

    fn fill_text(&mut self, text: &str, origin: Point, font: &FontSpec, color: Color) {
        if text.is_empty() {
            return;
        }
        let brush = Brush::Solid(color);
        let layout = self.layout(text, font, brush.clone());

        // Parley puts y = 0 at the top of the layout; shift so the first
        // baseline lands on `origin`.
        let first_baseline = layout
            .lines()
            .next()
            .and_then(|line| {
                line.items().find_map(|item| match item {
                    PositionedLayoutItem::GlyphRun(run) => Some(run.baseline()),
                    _ => None,
                })
            })
            .unwrap_or(0.0) as f64;
        let text_transform = self.transform * Affine::translate((origin.x, origin.y - first_baseline));

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph { id: glyph.id, x: gx, y: gy }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(run.font())
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(run.font_size())
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RenderContext, SceneRenderer};
    use kurbo::Size;
    use texgraph_core::node::Node;
    use texgraph_core::scene::Scene as EditorScene;

    #[test]
    fn test_surface_creation() {
        let surface = VelloSurface::new();
        assert!(surface.scene().encoding().is_empty());
    }

    #[test]
    fn test_render_scene_with_node() {
        let mut scene = EditorScene::new();
        scene.items.add_node(Node::new("Noise"));
        let mut surface = VelloSurface::new();
        let ctx = RenderContext::new(Size::new(800.0, 600.0));

        SceneRenderer::new().render(&scene, &mut surface, &ctx);
        assert!(!surface.scene().encoding().is_empty());
        assert_eq!(surface.transform(), Affine::IDENTITY);

        surface.reset();
        assert!(surface.scene().encoding().is_empty());
    }

    #[test]
    fn test_draw_missing_thumbnail_placeholder() {
        let mut surface = VelloSurface::new();
        surface.draw_image(ThumbnailId(7), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!surface.scene().encoding().is_empty());
    }

    #[test]
    fn test_draw_stored_thumbnail() {
        let mut surface = VelloSurface::new();
        let id = surface.thumbnails_mut().insert_rgba(1, 1, vec![255; 4]).unwrap();
        surface.draw_image(id, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!surface.scene().encoding().is_empty());
    }
}
