use egui::{Align2, Color32, FontId, Rect, Sense, Ui, Vec2, pos2};

use crate::config::CanvasConfig;
use crate::error::SurfaceError;
use crate::input::PointerTracker;
use crate::smoother::StrokeSmoother;
use crate::stroke::StrokeStyle;
use crate::surface::{PixmapSurface, RasterSurface};
use crate::texture_cache::TextureCache;

const TEXTURE_KEY: &str = "canvas";

/// Freehand drawing view: maps egui size changes, pointer events and painting
/// onto a [`StrokeSmoother`].
#[derive(Debug)]
pub struct CanvasView {
    smoother: StrokeSmoother<PixmapSurface>,
    tracker: PointerTracker,
    surface_size: Option<[u32; 2]>,
    frame_inset: f32,
    last_error: Option<SurfaceError>,
}

impl CanvasView {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            smoother: StrokeSmoother::new(
                config.touch_tolerance,
                StrokeStyle::new(config.draw_color, config.stroke_width),
                config.background_color,
            ),
            tracker: PointerTracker::new(Rect::NOTHING),
            surface_size: None,
            frame_inset: config.frame_inset,
            last_error: None,
        }
    }

    pub fn smoother(&self) -> &StrokeSmoother<PixmapSurface> {
        &self.smoother
    }

    /// Surface dimensions for a view of `size` points
    fn surface_dimensions(size: Vec2) -> [u32; 2] {
        [size.x.max(0.0).round() as u32, size.y.max(0.0).round() as u32]
    }

    /// Reallocate the surface if the view size changed.
    ///
    /// Returns `Ok(true)` when the surface was replaced or dropped. A zero-sized
    /// view (e.g. a minimized window) has no surface until it grows again.
    pub fn sync_size(&mut self, size: Vec2) -> Result<bool, SurfaceError> {
        let dimensions = Self::surface_dimensions(size);
        if self.surface_size == Some(dimensions) {
            return Ok(false);
        }
        self.surface_size = Some(dimensions);

        let [width, height] = dimensions;
        if width == 0 || height == 0 {
            log::debug!("Canvas collapsed to {width}x{height}, waiting for a usable size");
            return Ok(self.smoother.discard_surface());
        }

        self.smoother.on_surface_resize(width, height)?;
        Ok(true)
    }

    /// Outline drawn over the canvas, inset from each edge
    pub fn frame_rect(&self, canvas_rect: Rect) -> Rect {
        canvas_rect.shrink(self.frame_inset)
    }

    pub fn ui(&mut self, ui: &mut Ui, textures: &mut TextureCache) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::drag());
        let rect = response.rect;
        self.tracker.set_canvas_rect(rect);

        match self.sync_size(rect.size()) {
            Ok(true) => {
                textures.invalidate(TEXTURE_KEY);
                self.last_error = None;
            }
            Ok(false) => {}
            Err(err) => {
                log::error!("Canvas surface lost: {err}");
                textures.invalidate(TEXTURE_KEY);
                self.last_error = Some(err);
            }
        }

        let mut dirty = false;
        for sample in self.tracker.process_input(ui.ctx()) {
            dirty |= self.smoother.handle(sample).needs_redraw();
        }
        if dirty {
            ui.ctx().request_repaint();
        }

        if let Some(surface) = self.smoother.surface() {
            let texture =
                textures.get_or_update(ui.ctx(), TEXTURE_KEY, surface.version(), || {
                    surface.to_color_image()
                });
            match texture {
                Ok(id) => {
                    let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                    painter.image(id, rect, uv, Color32::WHITE);
                }
                Err(err) => log::error!("Failed to upload canvas: {err}"),
            }
        } else if let Some(err) = &self.last_error {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                err.to_string(),
                FontId::proportional(16.0),
                Color32::RED,
            );
        }

        painter.rect_stroke(self.frame_rect(rect), 0.0, self.smoother.style().to_egui());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::vec2;

    #[test]
    fn test_sync_size_only_reallocates_on_change() {
        let mut view = CanvasView::new(&CanvasConfig::default());

        assert!(view.sync_size(vec2(200.0, 100.0)).unwrap());
        assert!(!view.sync_size(vec2(200.2, 99.8)).unwrap());
        assert!(view.sync_size(vec2(300.0, 100.0)).unwrap());

        let surface = view.smoother().surface().unwrap();
        assert_eq!(surface.size(), [300, 100]);
    }

    #[test]
    fn test_zero_size_keeps_waiting() {
        let mut view = CanvasView::new(&CanvasConfig::default());

        assert!(!view.sync_size(vec2(0.0, 100.0)).unwrap());
        assert!(view.smoother().surface().is_none());
    }

    #[test]
    fn test_collapse_drops_the_surface() {
        let mut view = CanvasView::new(&CanvasConfig::default());
        view.sync_size(vec2(200.0, 100.0)).unwrap();

        assert!(view.sync_size(vec2(200.0, 0.0)).unwrap());
        assert!(view.smoother().surface().is_none());

        // Growing again starts over from a blank surface
        assert!(view.sync_size(vec2(200.0, 100.0)).unwrap());
        assert_eq!(view.smoother().surface().unwrap().size(), [200, 100]);
    }

    #[test]
    fn test_new_surface_is_background() {
        let config = CanvasConfig::default();
        let mut view = CanvasView::new(&config);
        view.sync_size(vec2(50.0, 50.0)).unwrap();

        let surface = view.smoother().surface().unwrap();
        assert_eq!(surface.pixel(25, 25), Some(config.background_color));
    }

    #[test]
    fn test_drag_draws_into_the_surface() {
        let config = CanvasConfig::default();
        let mut view = CanvasView::new(&config);
        let mut textures = TextureCache::default();
        let ctx = egui::Context::default();

        let button = |x: f32, pressed: bool| egui::Event::PointerButton {
            pos: pos2(x, 100.0),
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        };
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(pos2(0.0, 0.0), vec2(400.0, 300.0))),
            events: vec![
                egui::Event::PointerMoved(pos2(100.0, 100.0)),
                button(100.0, true),
                egui::Event::PointerMoved(pos2(150.0, 100.0)),
                egui::Event::PointerMoved(pos2(200.0, 100.0)),
                button(200.0, false),
            ],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::none())
                .show(ctx, |ui| view.ui(ui, &mut textures));
        });

        assert!(!view.smoother().is_stroking());
        let surface = view.smoother().surface().unwrap();
        assert_eq!(surface.pixel(140, 100), Some(config.draw_color));
        assert_eq!(surface.pixel(140, 130), Some(config.background_color));
        assert!(textures.contains(TEXTURE_KEY));
    }

    #[test]
    fn test_frame_is_inset() {
        let view = CanvasView::new(&CanvasConfig::default());
        let frame = view.frame_rect(Rect::from_min_size(pos2(0.0, 0.0), vec2(200.0, 100.0)));
        assert_eq!(frame, Rect::from_min_max(pos2(40.0, 40.0), pos2(160.0, 60.0)));
    }
}
