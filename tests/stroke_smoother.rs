use custom_views::error::SurfaceError;
use custom_views::{MoveOutcome, PointerSample, QuadPath, RasterSurface, StrokeSmoother, StrokeStyle};
use egui::{Color32, Pos2, pos2};

/// Surface that records what was drawn instead of rasterizing it
#[derive(Debug, Default)]
struct RecordingSurface {
    size: [u32; 2],
    fills: Vec<Color32>,
    strokes: Vec<QuadPath>,
    version: u64,
}

impl RasterSurface for RecordingSurface {
    fn allocate(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::EmptyDimensions { width, height });
        }
        Ok(Self {
            size: [width, height],
            ..Default::default()
        })
    }

    fn size(&self) -> [u32; 2] {
        self.size
    }

    fn fill(&mut self, color: Color32) {
        self.fills.push(color);
        self.version += 1;
    }

    fn stroke_path(&mut self, path: &QuadPath, _style: &StrokeStyle) {
        self.strokes.push(path.clone());
        self.version += 1;
    }

    fn version(&self) -> u64 {
        self.version
    }
}

const BACKGROUND: Color32 = Color32::from_rgb(0xFF, 0xF3, 0xE0);

fn smoother(tolerance: f32) -> StrokeSmoother<RecordingSurface> {
    let mut smoother = StrokeSmoother::new(
        tolerance,
        StrokeStyle::new(Color32::from_rgb(0xFF, 0xEB, 0x3B), 12.0),
        BACKGROUND,
    );
    smoother.on_surface_resize(400, 300).unwrap();
    smoother
}

fn assert_close(actual: Pos2, expected: Pos2) {
    assert!(
        (actual - expected).length() < 1e-5,
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_jitter_below_tolerance_changes_nothing() {
    let mut smoother = smoother(8.0);
    smoother.on_stroke_start(pos2(50.0, 50.0));

    for point in [pos2(57.9, 50.0), pos2(42.1, 57.9), pos2(50.0, 42.1), pos2(50.0, 50.0)] {
        assert_eq!(smoother.on_stroke_move(point), MoveOutcome::Dropped);
    }

    assert_eq!(smoother.current_point(), Some(pos2(50.0, 50.0)));
    assert!(smoother.pending_path().unwrap().is_empty());
    assert!(smoother.surface().unwrap().strokes.is_empty());
}

#[test]
fn test_one_axis_at_tolerance_is_accepted() {
    let mut smoother = smoother(8.0);
    smoother.on_stroke_start(pos2(50.0, 50.0));

    let outcome = smoother.on_stroke_move(pos2(50.0, 58.0));

    assert_eq!(outcome, MoveOutcome::Committed { anchor: pos2(50.0, 54.0) });
}

#[test]
fn test_each_commit_ends_at_the_midpoint_and_tracks_the_raw_sample() {
    let mut smoother = smoother(4.0);
    smoother.on_stroke_start(pos2(10.0, 10.0));

    let samples = [pos2(30.0, 10.0), pos2(30.0, 40.0), pos2(61.0, 47.0)];
    let mut previous = pos2(10.0, 10.0);
    for sample in samples {
        let outcome = smoother.on_stroke_move(sample);
        let MoveOutcome::Committed { anchor } = outcome else {
            panic!("expected a commit, got {outcome:?}");
        };
        assert_close(anchor, pos2((previous.x + sample.x) / 2.0, (previous.y + sample.y) / 2.0));
        assert_eq!(smoother.current_point(), Some(sample));
        previous = sample;
    }

    let path = smoother.pending_path().unwrap();
    assert_eq!(path.len(), 3);
    assert_eq!(path.segments()[1].control, pos2(30.0, 10.0));
    assert_close(path.segments()[1].end, pos2(30.0, 25.0));
}

#[test]
fn test_each_commit_redraws_the_whole_pending_path() {
    let mut smoother = smoother(4.0);
    smoother.on_stroke_start(pos2(0.0, 0.0));
    smoother.on_stroke_move(pos2(10.0, 0.0));
    smoother.on_stroke_move(pos2(20.0, 0.0));

    let strokes = &smoother.surface().unwrap().strokes;
    assert_eq!(strokes.len(), 2);
    assert_eq!(strokes[0].len(), 1);
    assert_eq!(strokes[1].len(), 2);
    assert_eq!(strokes[1].start(), pos2(0.0, 0.0));
}

#[test]
fn test_start_always_begins_a_fresh_path() {
    let mut smoother = smoother(4.0);
    smoother.on_stroke_start(pos2(0.0, 0.0));
    smoother.on_stroke_move(pos2(20.0, 20.0));

    // No end in between
    smoother.on_stroke_start(pos2(100.0, 100.0));

    let path = smoother.pending_path().unwrap();
    assert!(path.is_empty());
    assert_eq!(path.start(), pos2(100.0, 100.0));
    assert_eq!(smoother.current_point(), Some(pos2(100.0, 100.0)));
}

#[test]
fn test_moves_without_a_stroke_are_ignored() {
    let mut smoother = smoother(4.0);

    assert_eq!(smoother.on_stroke_move(pos2(100.0, 100.0)), MoveOutcome::Ignored);

    smoother.on_stroke_start(pos2(0.0, 0.0));
    smoother.on_stroke_end(pos2(0.0, 0.0));
    assert_eq!(smoother.on_stroke_move(pos2(100.0, 100.0)), MoveOutcome::Ignored);
    assert!(smoother.surface().unwrap().strokes.is_empty());
}

#[test]
fn test_resize_gives_a_fresh_background_surface() {
    let mut smoother = smoother(4.0);
    smoother.on_stroke_start(pos2(0.0, 0.0));
    smoother.on_stroke_move(pos2(50.0, 50.0));
    smoother.on_stroke_end(pos2(50.0, 50.0));

    smoother.on_surface_resize(640, 480).unwrap();

    let surface = smoother.surface().unwrap();
    assert_eq!(surface.size(), [640, 480]);
    assert_eq!(surface.fills, vec![BACKGROUND]);
    assert!(surface.strokes.is_empty());
}

#[test]
fn test_failed_resize_leaves_no_surface() {
    let mut smoother = smoother(4.0);

    let result = smoother.on_surface_resize(0, 480);

    assert_eq!(result, Err(SurfaceError::EmptyDimensions { width: 0, height: 480 }));
    assert!(smoother.surface().is_none());

    // Strokes keep working, they just have nowhere to go
    smoother.on_stroke_start(pos2(0.0, 0.0));
    assert!(smoother.on_stroke_move(pos2(20.0, 0.0)).needs_redraw());
}

#[test]
fn test_pointer_sequence_end_to_end() {
    let mut smoother = smoother(4.0);

    let outcomes: Vec<_> = [
        PointerSample::down(pos2(0.0, 0.0)),
        PointerSample::moved(pos2(3.0, 0.0)),
        PointerSample::moved(pos2(10.0, 0.0)),
        PointerSample::up(pos2(10.0, 0.0)),
    ]
    .into_iter()
    .map(|sample| smoother.handle(sample))
    .collect();

    assert_eq!(outcomes, vec![
        MoveOutcome::Ignored,
        MoveOutcome::Dropped,
        MoveOutcome::Committed { anchor: pos2(5.0, 0.0) },
        MoveOutcome::Ignored,
    ]);
    assert!(!smoother.is_stroking());

    let surface = smoother.surface().unwrap();
    assert_eq!(surface.strokes.len(), 1);
    let segment = surface.strokes[0].segments()[0];
    assert_eq!(segment.control, pos2(0.0, 0.0));
    assert_eq!(segment.end, pos2(5.0, 0.0));
}
