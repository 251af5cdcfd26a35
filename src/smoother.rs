//! Turns a stream of pointer samples into a smoothed, persistent stroke.
//!
//! Every accepted sample appends one quadratic segment whose control point is
//! the previous raw sample and whose end point is the midpoint between the
//! previous and the new sample. The end point therefore trails the pointer by
//! half a sample, which is what rounds off the corners of the polyline.

use egui::{Color32, Pos2};

use crate::error::SurfaceError;
use crate::input::{PointerPhase, PointerSample};
use crate::stroke::{QuadPath, StrokeStyle, midpoint};
use crate::surface::RasterSurface;

/// Where the smoother is in the down / move / up cycle
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    Stroking {
        /// Last accepted raw sample
        current: Pos2,
        /// Path under construction, anchored at the pointer-down position
        path: QuadPath,
    },
}

/// What a move sample did to the stroke
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    /// No stroke is active
    Ignored,
    /// Within the touch tolerance on both axes
    Dropped,
    /// A segment ending at `anchor` was appended and rasterized
    Committed { anchor: Pos2 },
}

impl MoveOutcome {
    /// Whether the view has to be repainted
    pub fn needs_redraw(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// Incremental stroke smoother that owns its raster surface
#[derive(Debug)]
pub struct StrokeSmoother<S: RasterSurface> {
    touch_tolerance: f32,
    style: StrokeStyle,
    background: Color32,
    surface: Option<S>,
    state: StrokeState,
}

impl<S: RasterSurface> StrokeSmoother<S> {
    /// Create a smoother with no surface; call [`Self::on_surface_resize`] before drawing
    pub fn new(touch_tolerance: f32, style: StrokeStyle, background: Color32) -> Self {
        Self {
            touch_tolerance,
            style,
            background,
            surface: None,
            state: StrokeState::Idle,
        }
    }

    pub fn touch_tolerance(&self) -> f32 {
        self.touch_tolerance
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn state(&self) -> &StrokeState {
        &self.state
    }

    pub fn is_stroking(&self) -> bool {
        matches!(self.state, StrokeState::Stroking { .. })
    }

    /// Last accepted raw sample of the active stroke
    pub fn current_point(&self) -> Option<Pos2> {
        match &self.state {
            StrokeState::Stroking { current, .. } => Some(*current),
            StrokeState::Idle => None,
        }
    }

    /// Path of the active stroke
    pub fn pending_path(&self) -> Option<&QuadPath> {
        match &self.state {
            StrokeState::Stroking { path, .. } => Some(path),
            StrokeState::Idle => None,
        }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Begin a new stroke at `point`, discarding any stroke in progress
    pub fn on_stroke_start(&mut self, point: Pos2) {
        if self.is_stroking() {
            log::debug!("Stroke restarted at {point:?} without an end");
        }
        self.state = StrokeState::Stroking {
            current: point,
            path: QuadPath::new(point),
        };
    }

    /// Feed one move sample.
    ///
    /// The sample is dropped unless it is at least `touch_tolerance` away from
    /// the last accepted sample on one of the axes.
    pub fn on_stroke_move(&mut self, point: Pos2) -> MoveOutcome {
        let StrokeState::Stroking { current, path } = &mut self.state else {
            return MoveOutcome::Ignored;
        };

        let dx = (point.x - current.x).abs();
        let dy = (point.y - current.y).abs();
        if dx < self.touch_tolerance && dy < self.touch_tolerance {
            return MoveOutcome::Dropped;
        }

        let anchor = midpoint(*current, point);
        path.quad_to(*current, anchor);
        *current = point;

        if let Some(surface) = &mut self.surface {
            surface.stroke_path(path, &self.style);
        }
        log::debug!("Committed segment {} ending at {anchor:?}", path.len());

        MoveOutcome::Committed { anchor }
    }

    /// Finish the active stroke. Whatever was committed stays on the surface.
    pub fn on_stroke_end(&mut self, _point: Pos2) {
        self.state = StrokeState::Idle;
    }

    /// Replace the surface with a new one of the given size, filled with the background.
    ///
    /// The old surface is released before the new one is allocated, so on
    /// failure the smoother is left without a surface.
    pub fn on_surface_resize(&mut self, width: u32, height: u32) -> Result<(), SurfaceError> {
        self.surface = None;

        let mut surface = S::allocate(width, height)?;
        surface.fill(self.background);
        self.surface = Some(surface);

        log::info!("Canvas surface reallocated at {width}x{height}");
        Ok(())
    }

    /// Release the surface without replacing it, e.g. while the view has no area.
    ///
    /// Returns whether there was a surface to release.
    pub fn discard_surface(&mut self) -> bool {
        self.surface.take().is_some()
    }

    /// Dispatch a pointer sample to the matching operation
    pub fn handle(&mut self, sample: PointerSample) -> MoveOutcome {
        match sample.phase {
            PointerPhase::Down => {
                self.on_stroke_start(sample.pos);
                MoveOutcome::Ignored
            }
            PointerPhase::Move => self.on_stroke_move(sample.pos),
            PointerPhase::Up => {
                self.on_stroke_end(sample.pos);
                MoveOutcome::Ignored
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixmapSurface;
    use egui::pos2;

    fn smoother(tolerance: f32) -> StrokeSmoother<PixmapSurface> {
        StrokeSmoother::new(
            tolerance,
            StrokeStyle::new(Color32::BLACK, 4.0),
            Color32::WHITE,
        )
    }

    #[test]
    fn test_starts_idle() {
        let smoother = smoother(4.0);
        assert_eq!(smoother.state(), &StrokeState::Idle);
        assert!(smoother.pending_path().is_none());
        assert!(smoother.surface().is_none());
    }

    #[test]
    fn test_commit_uses_midpoint_and_advances_to_raw_sample() {
        let mut smoother = smoother(4.0);
        smoother.on_stroke_start(pos2(0.0, 0.0));

        let outcome = smoother.on_stroke_move(pos2(10.0, 0.0));

        assert_eq!(outcome, MoveOutcome::Committed { anchor: pos2(5.0, 0.0) });
        assert_eq!(smoother.current_point(), Some(pos2(10.0, 0.0)));

        let path = smoother.pending_path().unwrap();
        assert_eq!(path.segments()[0].control, pos2(0.0, 0.0));
        assert_eq!(path.last_point(), pos2(5.0, 0.0));
    }

    #[test]
    fn test_one_axis_over_tolerance_is_enough() {
        let mut smoother = smoother(4.0);
        smoother.on_stroke_start(pos2(0.0, 0.0));

        assert_eq!(smoother.on_stroke_move(pos2(1.0, 4.0)), MoveOutcome::Committed {
            anchor: pos2(0.5, 2.0)
        });
    }

    #[test]
    fn test_move_while_idle_is_ignored() {
        let mut smoother = smoother(4.0);
        assert_eq!(smoother.on_stroke_move(pos2(50.0, 50.0)), MoveOutcome::Ignored);
        assert!(!MoveOutcome::Ignored.needs_redraw());
        assert_eq!(smoother.state(), &StrokeState::Idle);
    }

    #[test]
    fn test_handle_dispatches_by_phase() {
        let mut smoother = smoother(4.0);
        smoother.handle(PointerSample::down(pos2(0.0, 0.0)));
        assert!(smoother.is_stroking());

        assert!(smoother.handle(PointerSample::moved(pos2(0.0, 20.0))).needs_redraw());

        smoother.handle(PointerSample::up(pos2(0.0, 20.0)));
        assert!(!smoother.is_stroking());
    }

    #[test]
    fn test_failed_resize_leaves_no_surface() {
        let mut smoother = smoother(4.0);
        smoother.on_surface_resize(10, 10).unwrap();
        assert!(smoother.surface().is_some());

        let err = smoother.on_surface_resize(0, 10).unwrap_err();
        assert_eq!(err, SurfaceError::EmptyDimensions { width: 0, height: 10 });
        assert!(smoother.surface().is_none());
    }

    #[test]
    fn test_discard_surface_keeps_the_stroke() {
        let mut smoother = smoother(4.0);
        smoother.on_surface_resize(10, 10).unwrap();
        smoother.on_stroke_start(pos2(0.0, 0.0));

        assert!(smoother.discard_surface());
        assert!(!smoother.discard_surface());
        assert!(smoother.surface().is_none());
        assert!(smoother.is_stroking());
    }
}
