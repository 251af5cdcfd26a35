use std::path::Path;

use egui::{Color32, Rect, Ui};
use tiny_skia::{FillRule, PathBuilder, Transform};

use crate::config::RoundRectConfig;
use crate::error::{ExportError, SurfaceError};
use crate::surface::{PixmapSurface, RasterSurface, solid_paint};
use crate::texture_cache::TextureCache;

/// Control point distance for approximating a quarter ellipse with one cubic
const KAPPA: f32 = 0.552_284_8;

const TEXTURE_KEY: &str = "round_rect";

/// Scale `radii` down uniformly so adjacent corners never overlap along any side
fn clamp_radii(rect: Rect, radii: [f32; 8]) -> [f32; 8] {
    let radii = radii.map(|r| r.max(0.0));
    let [tl_x, tl_y, tr_x, tr_y, br_x, br_y, bl_x, bl_y] = radii;

    let sides = [
        (rect.width(), tl_x + tr_x),
        (rect.height(), tr_y + br_y),
        (rect.width(), br_x + bl_x),
        (rect.height(), bl_y + tl_y),
    ];
    let scale = sides
        .iter()
        .filter(|(_, sum)| *sum > 0.0)
        .map(|(len, sum)| len / sum)
        .fold(1.0_f32, f32::min);

    radii.map(|r| r * scale)
}

/// Append a closed rounded rectangle to `pb`, clockwise from the top edge.
///
/// `radii` holds x/y radius pairs for the top-left, top-right, bottom-right
/// and bottom-left corners.
pub(crate) fn push_rounded_rect(pb: &mut PathBuilder, rect: Rect, radii: [f32; 8]) {
    let [tl_x, tl_y, tr_x, tr_y, br_x, br_y, bl_x, bl_y] = clamp_radii(rect, radii);
    let (l, t, r, b) = (rect.min.x, rect.min.y, rect.max.x, rect.max.y);
    let k = KAPPA;

    pb.move_to(l + tl_x, t);
    pb.line_to(r - tr_x, t);
    pb.cubic_to(r - tr_x + tr_x * k, t, r, t + tr_y - tr_y * k, r, t + tr_y);
    pb.line_to(r, b - br_y);
    pb.cubic_to(r, b - br_y + br_y * k, r - br_x + br_x * k, b, r - br_x, b);
    pb.line_to(l + bl_x, b);
    pb.cubic_to(l + bl_x - bl_x * k, b, l, b - bl_y + bl_y * k, l, b - bl_y);
    pb.line_to(l, t + tl_y);
    pb.cubic_to(l, t + tl_y - tl_y * k, l + tl_x - tl_x * k, t, l + tl_x, t);
    pb.close();
}

/// Rounded-rectangle path; see [`push_rounded_rect`] for the radii layout
pub fn rounded_rect_path(rect: Rect, radii: [f32; 8]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    push_rounded_rect(&mut pb, rect, radii);
    pb.finish()
}

/// Render a `width` x `height` bitmap holding one filled rounded rectangle on transparency
pub fn render_round_rect(
    width: u32,
    height: u32,
    radii: [f32; 8],
    color: Color32,
) -> Result<PixmapSurface, SurfaceError> {
    let mut surface = PixmapSurface::allocate(width, height)?;
    let rect = Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(width as f32, height as f32));

    if let Some(path) = rounded_rect_path(rect, radii) {
        surface.pixmap_mut().fill_path(
            &path,
            &solid_paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
    Ok(surface)
}

/// Encode `surface` as a PNG file
pub fn export_png(surface: &PixmapSurface, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let path = path.as_ref();
    surface.to_rgba_image()?.save(path)?;
    log::info!("Exported {}x{} bitmap to {}", surface.size()[0], surface.size()[1], path.display());
    Ok(())
}

/// Shows the generated bitmap and lets the user save it
#[derive(Debug)]
pub struct RoundRectView {
    config: RoundRectConfig,
    bitmap: Result<PixmapSurface, SurfaceError>,
    status: Option<String>,
}

impl RoundRectView {
    pub fn new(config: RoundRectConfig) -> Self {
        let bitmap = render_round_rect(config.width, config.height, config.corners, config.color);
        if let Err(err) = &bitmap {
            log::error!("Failed to render rounded rectangle: {err}");
        }
        Self {
            config,
            bitmap,
            status: None,
        }
    }

    pub fn bitmap(&self) -> Result<&PixmapSurface, &SurfaceError> {
        self.bitmap.as_ref()
    }

    pub fn ui(&mut self, ui: &mut Ui, textures: &mut TextureCache) {
        let bitmap = match &self.bitmap {
            Ok(bitmap) => bitmap,
            Err(err) => {
                ui.colored_label(Color32::RED, err.to_string());
                return;
            }
        };

        ui.horizontal(|ui| {
            if ui.button("Export PNG").clicked() {
                self.status = Some(match export_png(bitmap, &self.config.export_path) {
                    Ok(()) => format!("Saved to {}", self.config.export_path.display()),
                    Err(err) => {
                        log::error!("Export failed: {err}");
                        format!("Export failed: {err}")
                    }
                });
            }
            if let Some(status) = &self.status {
                ui.label(status);
            }
        });

        match textures.get_or_update(ui.ctx(), TEXTURE_KEY, bitmap.version(), || {
            bitmap.to_color_image()
        }) {
            Ok(id) => {
                let [width, height] = bitmap.size();
                ui.image((id, egui::vec2(width as f32, height as f32)));
            }
            Err(err) => log::error!("Failed to upload rounded rectangle: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn test_radii_are_clamped_to_the_short_side() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(400.0, 100.0));
        let clamped = clamp_radii(rect, [80.0; 8]);
        assert!(clamped.iter().all(|r| (r - 50.0).abs() < 1e-4));

        let untouched = clamp_radii(rect, [10.0; 8]);
        assert_eq!(untouched, [10.0; 8]);
    }

    #[test]
    fn test_negative_radii_become_square_corners() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(10.0, 10.0));
        assert_eq!(clamp_radii(rect, [-5.0; 8]), [0.0; 8]);
    }

    #[test]
    fn test_path_bounds_match_rect() {
        let rect = Rect::from_min_max(pos2(10.0, 20.0), pos2(110.0, 70.0));
        let path = rounded_rect_path(rect, [15.0; 8]).unwrap();
        let bounds = path.bounds();

        assert!((bounds.left() - 10.0).abs() < 1e-3);
        assert!((bounds.top() - 20.0).abs() < 1e-3);
        assert!((bounds.right() - 110.0).abs() < 1e-3);
        assert!((bounds.bottom() - 70.0).abs() < 1e-3);
    }

    #[test]
    fn test_corners_are_cut() {
        let surface = render_round_rect(400, 200, [80.0; 8], Color32::GREEN).unwrap();

        assert_eq!(surface.pixel(1, 1), Some(Color32::TRANSPARENT));
        assert_eq!(surface.pixel(398, 198), Some(Color32::TRANSPARENT));
        assert_eq!(surface.pixel(200, 100), Some(Color32::GREEN));
        // Straight edges reach the border
        assert!(surface.pixel(200, 0).unwrap().a() > 200);
        assert!(surface.pixel(0, 100).unwrap().a() > 200);
    }
}
