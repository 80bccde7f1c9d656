use egui::{Color32, ColorImage, Context, Painter, Rect, Stroke, TextureHandle, TextureOptions};

use crate::surface::RasterSurface;
use crate::whiteboard::EraserCursor;

/// Shows a [`RasterSurface`] through an egui texture.
///
/// The texture is only re-uploaded when the surface version changes.
#[derive(Default)]
pub struct CanvasRenderer {
    texture: Option<TextureHandle>,
    uploaded_version: Option<u64>,
}

impl std::fmt::Debug for CanvasRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasRenderer")
            .field("has_texture", &self.texture.is_some())
            .field("uploaded_version", &self.uploaded_version)
            .finish()
    }
}

impl CanvasRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uploaded_version(&self) -> Option<u64> {
        self.uploaded_version
    }

    /// Make the texture match `surface`. Returns whether an upload happened.
    pub fn sync(&mut self, ctx: &Context, surface: &RasterSurface) -> bool {
        if self.texture.is_some() && self.uploaded_version == Some(surface.version()) {
            return false;
        }

        let image = to_color_image(surface);
        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::NEAREST),
            None => self.texture = Some(ctx.load_texture("whiteboard-surface", image, TextureOptions::NEAREST)),
        }
        self.uploaded_version = Some(surface.version());
        true
    }

    /// Paint the sheet into `rect`: white paper, the surface on top, then
    /// the eraser outline if there is one
    pub fn paint(&self, painter: &Painter, rect: Rect, cursor: Option<EraserCursor>) {
        painter.rect_filled(rect, 0.0, Color32::WHITE);

        if let Some(texture) = &self.texture {
            let size = texture.size_vec2();
            let image_rect = Rect::from_min_size(rect.min, size);
            let uv = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            painter
                .with_clip_rect(rect)
                .image(texture.id(), image_rect, uv, Color32::WHITE);
        }

        if let Some(cursor) = cursor {
            let center = rect.min + cursor.center.to_vec2();
            painter.circle_stroke(center, cursor.diameter / 2.0, Stroke::new(1.0, Color32::from_gray(100)));
        }
    }
}

/// Copy the surface pixels into an egui image
pub fn to_color_image(surface: &RasterSurface) -> ColorImage {
    let size = [surface.width() as usize, surface.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, surface.pixels().as_raw())
}
