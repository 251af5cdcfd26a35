use egui::{Color32, ColorImage};
use tiny_skia::{LineCap, LineJoin, Paint, Pixmap, Transform};

use crate::error::{ExportError, SurfaceError};
use crate::stroke::{QuadPath, StrokeStyle};

/// An offscreen pixel buffer that committed drawing operations accumulate in.
///
/// The buffer persists across frames; the only way to clear it is to
/// allocate a new one.
pub trait RasterSurface: Sized {
    /// Allocate a new surface. Both dimensions must be non-zero.
    fn allocate(width: u32, height: u32) -> Result<Self, SurfaceError>;

    /// Width and height in pixels
    fn size(&self) -> [u32; 2];

    /// Overwrite every pixel with `color`
    fn fill(&mut self, color: Color32);

    /// Stroke `path` with round caps and joins
    fn stroke_path(&mut self, path: &QuadPath, style: &StrokeStyle);

    /// Monotonic counter bumped by every mutation, used to skip redundant uploads
    fn version(&self) -> u64;
}

pub(crate) fn to_skia_color(color: Color32) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

pub(crate) fn solid_paint(color: Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(to_skia_color(color));
    paint.anti_alias = true;
    paint
}

pub(crate) fn skia_stroke(style: &StrokeStyle) -> tiny_skia::Stroke {
    tiny_skia::Stroke {
        width: style.width(),
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..tiny_skia::Stroke::default()
    }
}

/// [`RasterSurface`] backed by a premultiplied RGBA tiny-skia pixmap
#[derive(Clone)]
pub struct PixmapSurface {
    pixmap: Pixmap,
    version: u64,
}

// Pixmap's Debug prints every pixel
impl std::fmt::Debug for PixmapSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixmapSurface")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("version", &self.version)
            .finish()
    }
}

impl PixmapSurface {
    /// Read back a single pixel (premultiplied), or `None` when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        // Pixmap::pixel only checks the flat index, so x past the width wraps to the next row
        if x >= self.pixmap.width() || y >= self.pixmap.height() {
            return None;
        }
        self.pixmap
            .pixel(x, y)
            .map(|p| Color32::from_rgba_premultiplied(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Convert to an egui image for uploading as a texture
    pub fn to_color_image(&self) -> ColorImage {
        ColorImage::from_rgba_premultiplied(
            [self.pixmap.width() as usize, self.pixmap.height() as usize],
            self.pixmap.data(),
        )
    }

    /// Convert to a straight-alpha RGBA image for encoding
    pub fn to_rgba_image(&self) -> Result<image::RgbaImage, ExportError> {
        let (width, height) = (self.pixmap.width(), self.pixmap.height());
        let raw: Vec<u8> = self
            .pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        image::RgbaImage::from_raw(width, height, raw)
            .ok_or(ExportError::BufferMismatch { width, height })
    }

    /// Direct access for renderers that need masks or transforms
    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        self.version += 1;
        &mut self.pixmap
    }
}

impl RasterSurface for PixmapSurface {
    fn allocate(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptyDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(SurfaceError::AllocationFailed { width, height })?;
        Ok(Self { pixmap, version: 0 })
    }

    fn size(&self) -> [u32; 2] {
        [self.pixmap.width(), self.pixmap.height()]
    }

    fn fill(&mut self, color: Color32) {
        self.pixmap.fill(to_skia_color(color));
        self.version += 1;
    }

    fn stroke_path(&mut self, path: &QuadPath, style: &StrokeStyle) {
        let Some(path) = path.to_skia() else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &solid_paint(style.color()),
            &skia_stroke(style),
            Transform::identity(),
            None,
        );
        self.version += 1;
    }

    fn version(&self) -> u64 {
        self.version
    }
}
