use egui::{Color32, Pos2};
use image::{Rgba, RgbaImage};

/// How newly drawn pixels combine with what is already on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompositeMode {
    /// Normal painting: source drawn over destination
    #[default]
    SourceOver,
    /// Erasing: destination alpha is reduced by source coverage
    DestinationOut,
    /// Source drawn beneath destination; opaque pixels are left alone
    DestinationOver,
}

/// Axis-aligned pixel rectangle, `x1`/`y1` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn union(self, other: PixelRect) -> PixelRect {
        PixelRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    pub fn intersect(self, other: PixelRect) -> PixelRect {
        PixelRect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }
}

/// A pixel-addressable drawing canvas with a persistent RGBA backing store.
///
/// Pixel `(x, y)` covers the unit square whose centre is `(x + 0.5, y + 0.5)`
/// in surface-local coordinates. The surface starts fully transparent.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    mode: CompositeMode,
    version: u64,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            mode: CompositeMode::SourceOver,
            version: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect {
            x0: 0,
            y0: 0,
            x1: self.width(),
            y1: self.height(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Returns `None` outside the surface
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn mode(&self) -> CompositeMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CompositeMode) {
        self.mode = mode;
    }

    /// Bumped on every pixel mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 0]);
        }
        self.touch();
    }

    /// Replace the backing store. Destroys all pixel content.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
        self.touch();
    }

    /// Draw an image over the surface at the origin with normal compositing
    pub fn composite(&mut self, image: &RgbaImage) {
        image::imageops::overlay(&mut self.pixels, image, 0, 0);
        self.touch();
    }

    /// Fill whole pixels `[x0, x1) x [y0, y1)` using the current mode
    pub fn fill_pixels(&mut self, rect: PixelRect, color: Color32) {
        let rect = rect.intersect(self.bounds());
        if rect.is_empty() {
            return;
        }
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                self.blend(x, y, color, 1.0);
            }
        }
        self.touch();
    }

    /// Rasterize a round-capped segment of the given width using the current
    /// mode. A zero-length segment produces a round dot.
    ///
    /// Returns the pixel rectangle that may have changed, or `None` when the
    /// segment lies entirely outside the surface.
    pub fn stroke_segment(&mut self, from: Pos2, to: Pos2, width: f32, color: Color32) -> Option<PixelRect> {
        let radius = (width / 2.0).max(0.5);
        let reach = radius + 1.0;
        let dirty = self.clip_span(
            from.x.min(to.x) - reach,
            from.y.min(to.y) - reach,
            from.x.max(to.x) + reach,
            from.y.max(to.y) + reach,
        )?;

        for y in dirty.y0..dirty.y1 {
            for x in dirty.x0..dirty.x1 {
                let centre = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - distance_to_segment(centre, from, to)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
        self.touch();
        Some(dirty)
    }

    fn clip_span(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<PixelRect> {
        let to_px = |v: f32, limit: u32| v.clamp(0.0, limit as f32) as u32;
        let rect = PixelRect {
            x0: to_px(min_x.floor(), self.width()),
            y0: to_px(min_y.floor(), self.height()),
            x1: to_px(max_x.ceil(), self.width()),
            y1: to_px(max_y.ceil(), self.height()),
        };
        (!rect.is_empty()).then_some(rect)
    }

    fn blend(&mut self, x: u32, y: u32, color: Color32, coverage: f32) {
        let [sr, sg, sb, sa] = color.to_srgba_unmultiplied();
        let src_a = sa as f32 / 255.0 * coverage;
        let dst = self.pixels.get_pixel_mut(x, y);
        let dst_a = dst.0[3] as f32 / 255.0;

        match self.mode {
            CompositeMode::SourceOver => {
                let out_a = src_a + dst_a * (1.0 - src_a);
                if out_a <= 0.0 {
                    return;
                }
                let mix = |s: u8, d: u8| {
                    let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                dst.0 = [
                    mix(sr, dst.0[0]),
                    mix(sg, dst.0[1]),
                    mix(sb, dst.0[2]),
                    (out_a * 255.0).round() as u8,
                ];
            }
            CompositeMode::DestinationOver => {
                let out_a = dst_a + src_a * (1.0 - dst_a);
                if out_a <= 0.0 {
                    return;
                }
                let mix = |s: u8, d: u8| {
                    let v = (d as f32 * dst_a + s as f32 * src_a * (1.0 - dst_a)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                dst.0 = [
                    mix(sr, dst.0[0]),
                    mix(sg, dst.0[1]),
                    mix(sb, dst.0[2]),
                    (out_a * 255.0).round() as u8,
                ];
            }
            CompositeMode::DestinationOut => {
                let out_a = ((dst_a * (1.0 - src_a)) * 255.0).round() as u8;
                dst.0 = if out_a == 0 {
                    [0, 0, 0, 0]
                } else {
                    [dst.0[0], dst.0[1], dst.0[2], out_a]
                };
            }
        }
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

/// Distance from a point to the closest point of the segment `start..end`
pub(crate) fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let line = end - start;
    let len_sq = line.length_sq();
    if len_sq == 0.0 {
        return (point - start).length();
    }
    let t = ((point - start).dot(line) / len_sq).clamp(0.0, 1.0);
    (point - (start + line * t)).length()
}
