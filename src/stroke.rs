use egui::{Color32, Pos2};

/// Immutable style for stroking paths into a raster surface.
///
/// Caps and joins are always round and strokes are always anti-aliased;
/// only the colour and width vary between presets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    color: Color32,
    width: f32,
}

impl StrokeStyle {
    pub const fn new(color: Color32, width: f32) -> Self {
        Self { color, width }
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Convert to an egui stroke for painting outlines directly on screen
    pub fn to_egui(&self) -> egui::Stroke {
        egui::Stroke::new(self.width, self.color)
    }
}

/// One quadratic Bézier piece of a [`QuadPath`].
///
/// The segment starts where the previous one ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadSegment {
    pub control: Pos2,
    pub end: Pos2,
}

/// An open path made of consecutive quadratic segments
#[derive(Debug, Clone, PartialEq)]
pub struct QuadPath {
    start: Pos2,
    segments: Vec<QuadSegment>,
}

impl QuadPath {
    /// Create an empty path anchored at `start`
    pub fn new(start: Pos2) -> Self {
        Self {
            start,
            segments: Vec::new(),
        }
    }

    pub fn start(&self) -> Pos2 {
        self.start
    }

    pub fn segments(&self) -> &[QuadSegment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The point the next segment will start from
    pub fn last_point(&self) -> Pos2 {
        self.segments.last().map_or(self.start, |segment| segment.end)
    }

    /// Append a quadratic segment from the current end point
    pub fn quad_to(&mut self, control: Pos2, end: Pos2) {
        self.segments.push(QuadSegment { control, end });
    }

    /// Build the equivalent tiny-skia path, or `None` if there is nothing to stroke
    pub(crate) fn to_skia(&self) -> Option<tiny_skia::Path> {
        if self.segments.is_empty() {
            return None;
        }

        let mut builder = tiny_skia::PathBuilder::new();
        builder.move_to(self.start.x, self.start.y);
        for segment in &self.segments {
            builder.quad_to(segment.control.x, segment.control.y, segment.end.x, segment.end.y);
        }
        builder.finish()
    }
}

/// Midpoint of two points
pub fn midpoint(a: Pos2, b: Pos2) -> Pos2 {
    Pos2::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}
