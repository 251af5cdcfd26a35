//! Showcase of clip regions: seven copies of the same small picture, each
//! clipped differently, plus two transformed text labels.
//!
//! The scene is plain data built from [`ClipLayout`]; shapes are rasterized
//! with tiny-skia masks and the labels are left to the egui painter.

use std::sync::Arc;

use egui::emath::Rot2;
use egui::epaint::TextShape;
use egui::{Align, Color32, FontId, Pos2, Rect, Ui, Vec2, pos2, vec2};
use tiny_skia::{FillRule, Mask, PathBuilder, Transform};

use crate::config::ClippingConfig;
use crate::error::SurfaceError;
use crate::round_rect::push_rounded_rect;
use crate::stroke::StrokeStyle;
use crate::surface::{PixmapSurface, RasterSurface, skia_stroke, solid_paint};
use crate::texture_cache::TextureCache;

const TEXTURE_KEY: &str = "clipping";

/// Background behind all cells
pub const BACKGROUND: Color32 = Color32::from_gray(0x88);

/// A region in cell-local coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum ClipShape {
    Rect(Rect),
    Circle { center: Pos2, radius: f32 },
    RoundRect { rect: Rect, radius: f32 },
    Union(Vec<ClipShape>),
}

impl ClipShape {
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Rect(rect) | Self::RoundRect { rect, .. } => *rect,
            Self::Circle { center, radius } => Rect::from_center_size(*center, Vec2::splat(radius * 2.0)),
            Self::Union(shapes) => shapes
                .iter()
                .map(Self::bounds)
                .fold(Rect::NOTHING, |acc, rect| acc.union(rect)),
        }
    }

    fn push_to(&self, pb: &mut PathBuilder) {
        match self {
            Self::Rect(rect) => {
                if let Some(rect) = skia_rect(*rect) {
                    pb.push_rect(rect);
                }
            }
            Self::Circle { center, radius } => pb.push_circle(center.x, center.y, *radius),
            Self::RoundRect { rect, radius } => push_rounded_rect(pb, *rect, [*radius; 8]),
            Self::Union(shapes) => {
                for shape in shapes {
                    shape.push_to(pb);
                }
            }
        }
    }

    fn to_skia(&self) -> Option<tiny_skia::Path> {
        let mut pb = PathBuilder::new();
        self.push_to(&mut pb);
        pb.finish()
    }
}

fn skia_rect(rect: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_ltrb(rect.min.x, rect.min.y, rect.max.x, rect.max.y)
}

/// How a shape narrows the current clip
#[derive(Debug, Clone, PartialEq)]
pub enum ClipOp {
    /// Keep only what is inside the shape
    Intersect(ClipShape),
    /// Keep only what is outside the shape
    Difference(ClipShape),
}

/// One clipped copy of the demo picture
#[derive(Debug, Clone, PartialEq)]
pub struct ClipCell {
    pub name: &'static str,
    /// Top-left corner of the cell in scene coordinates
    pub origin: Vec2,
    /// Clip operations, applied in order on top of the cell's content rect
    pub ops: Vec<ClipOp>,
}

impl ClipCell {
    /// Conservative bounds of the visible area, in cell-local coordinates
    pub fn clip_bounds(&self, layout: &ClipLayout) -> Rect {
        self.ops.iter().fold(layout.content_rect(), |acc, op| match op {
            ClipOp::Intersect(shape) => acc.intersect(shape.bounds()),
            ClipOp::Difference(_) => acc,
        })
    }
}

/// A text label drawn by the egui painter
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: &'static str,
    /// Baseline anchor in scene coordinates
    pub anchor: Pos2,
    /// `Align::Max` puts the end of the text on the anchor, `Align::Min` the start
    pub align: Align,
    pub color: Color32,
    /// Horizontal and vertical skew factors
    pub skew: Vec2,
    /// Scene-space rectangle the text is clipped to
    pub clip: Option<Rect>,
}

/// Positions of the cells, derived from the configured dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct ClipLayout {
    pub config: ClippingConfig,
    pub columns: [f32; 2],
    pub rows: [f32; 4],
    pub text_row: f32,
}

impl ClipLayout {
    pub fn new(config: ClippingConfig) -> Self {
        let inset = config.rect_inset;
        let column_one = inset;
        let column_two = column_one + inset + config.clip_rect_right;

        let row_one = inset;
        let row_two = row_one + inset + config.clip_rect_bottom;
        let row_three = row_two + inset + config.clip_rect_bottom;
        let row_four = row_three + inset + config.clip_rect_bottom;
        let text_row = row_four + 1.5 * config.clip_rect_bottom;

        Self {
            config,
            columns: [column_one, column_two],
            rows: [row_one, row_two, row_three, row_four],
            text_row,
        }
    }

    /// The rectangle every cell draws into, in cell-local coordinates
    pub fn content_rect(&self) -> Rect {
        let c = &self.config;
        Rect::from_min_max(
            pos2(c.clip_rect_left, c.clip_rect_top),
            pos2(c.clip_rect_right, c.clip_rect_bottom),
        )
    }

    /// Size of the whole scene
    pub fn scene_size(&self) -> Vec2 {
        vec2(
            self.columns[1] + self.config.clip_rect_right + self.config.rect_inset,
            self.text_row + 2.0 * self.config.text_size,
        )
    }

    fn inset_rect(&self, factor: f32) -> Rect {
        let c = &self.config;
        let d = factor * c.rect_inset;
        Rect::from_min_max(pos2(d, d), pos2(c.clip_rect_right - d, c.clip_rect_bottom - d))
    }
}

/// The full showcase: cells plus labels
#[derive(Debug, Clone, PartialEq)]
pub struct ClipScene {
    pub layout: ClipLayout,
    pub cells: Vec<ClipCell>,
    pub labels: Vec<TextLabel>,
}

impl ClipScene {
    pub fn build(layout: ClipLayout) -> Self {
        let c = layout.config.clone();
        let [col_one, col_two] = layout.columns;
        let [row_one, row_two, row_three, row_four] = layout.rows;
        let r = c.circle_radius;

        let cells = vec![
            ClipCell {
                name: "unclipped",
                origin: vec2(col_one, row_one),
                ops: vec![],
            },
            ClipCell {
                name: "difference",
                origin: vec2(col_two, row_one),
                ops: vec![
                    ClipOp::Intersect(ClipShape::Rect(layout.inset_rect(2.0))),
                    ClipOp::Difference(ClipShape::Rect(layout.inset_rect(4.0))),
                ],
            },
            ClipCell {
                name: "circular",
                origin: vec2(col_one, row_two),
                ops: vec![ClipOp::Difference(ClipShape::Circle {
                    center: pos2(r, c.clip_rect_bottom - r),
                    radius: r,
                })],
            },
            ClipCell {
                name: "intersection",
                origin: vec2(col_two, row_two),
                ops: vec![
                    ClipOp::Intersect(ClipShape::Rect(Rect::from_min_max(
                        pos2(c.clip_rect_left, c.clip_rect_top),
                        pos2(
                            c.clip_rect_right - c.small_rect_offset,
                            c.clip_rect_bottom - c.small_rect_offset,
                        ),
                    ))),
                    ClipOp::Intersect(ClipShape::Rect(Rect::from_min_max(
                        pos2(
                            c.clip_rect_left + c.small_rect_offset,
                            c.clip_rect_top + c.small_rect_offset,
                        ),
                        pos2(c.clip_rect_right, c.clip_rect_bottom),
                    ))),
                ],
            },
            ClipCell {
                name: "combined",
                origin: vec2(col_one, row_three),
                ops: vec![ClipOp::Intersect(ClipShape::Union(vec![
                    ClipShape::Circle {
                        center: pos2(
                            c.clip_rect_left + c.rect_inset + r,
                            c.clip_rect_top + r + c.rect_inset,
                        ),
                        radius: r,
                    },
                    ClipShape::Rect(Rect::from_min_max(
                        pos2(c.clip_rect_right / 2.0 - r, c.clip_rect_top + r + c.rect_inset),
                        pos2(c.clip_rect_right / 2.0 + r, c.clip_rect_bottom - c.rect_inset),
                    )),
                ]))],
            },
            ClipCell {
                name: "rounded",
                origin: vec2(col_two, row_three),
                ops: vec![ClipOp::Intersect(ClipShape::RoundRect {
                    rect: layout.inset_rect(1.0),
                    radius: c.clip_rect_right / 4.0,
                })],
            },
            ClipCell {
                name: "outside",
                origin: vec2(col_one, row_four),
                ops: vec![ClipOp::Intersect(ClipShape::Rect(layout.inset_rect(2.0)))],
            },
        ];

        let mut labels: Vec<TextLabel> = cells
            .iter()
            .map(|cell| {
                let bounds = cell.clip_bounds(&layout).translate(cell.origin);
                TextLabel {
                    text: "Clipping",
                    anchor: pos2(c.clip_rect_right, c.text_offset) + cell.origin,
                    align: Align::Max,
                    color: Color32::BLUE,
                    skew: Vec2::ZERO,
                    clip: Some(bounds),
                }
            })
            .collect();

        let text_origin = pos2(col_two + c.clip_rect_left, layout.text_row + c.clip_rect_top);
        labels.push(TextLabel {
            text: "Skewed",
            anchor: text_origin,
            align: Align::Max,
            color: Color32::YELLOW,
            skew: vec2(0.2, 0.3),
            clip: None,
        });
        labels.push(TextLabel {
            text: "Translated",
            anchor: text_origin,
            align: Align::Min,
            color: Color32::GREEN,
            skew: Vec2::ZERO,
            clip: None,
        });

        Self { layout, cells, labels }
    }

    /// Pixel size of the rasterized scene
    pub fn pixel_size(&self) -> [u32; 2] {
        let size = self.layout.scene_size();
        [size.x.ceil() as u32, size.y.ceil() as u32]
    }

    /// Rasterize every cell's shapes into a new surface
    pub fn render(&self) -> Result<PixmapSurface, SurfaceError> {
        let [width, height] = self.pixel_size();
        let mut surface = PixmapSurface::allocate(width, height)?;
        surface.fill(BACKGROUND);

        for cell in &self.cells {
            self.render_cell(&mut surface, cell)?;
        }
        Ok(surface)
    }

    fn render_cell(&self, surface: &mut PixmapSurface, cell: &ClipCell) -> Result<(), SurfaceError> {
        let c = &self.layout.config;
        let [width, height] = surface.size();
        let transform = Transform::from_translate(cell.origin.x, cell.origin.y);

        let mut ops = vec![ClipOp::Intersect(ClipShape::Rect(self.layout.content_rect()))];
        ops.extend(cell.ops.iter().cloned());
        let mask = clip_mask(&ops, width, height, transform)?;

        let pixmap = surface.pixmap_mut();

        if let Some(full) = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32) {
            pixmap.fill_rect(full, &solid_paint(Color32::WHITE), Transform::identity(), Some(&mask));
        }

        let mut pb = PathBuilder::new();
        pb.move_to(c.clip_rect_left, c.clip_rect_top);
        pb.line_to(c.clip_rect_right, c.clip_rect_bottom);
        if let Some(diagonal) = pb.finish() {
            let style = StrokeStyle::new(Color32::RED, c.stroke_width);
            pixmap.stroke_path(
                &diagonal,
                &solid_paint(style.color()),
                &skia_stroke(&style),
                transform,
                Some(&mask),
            );
        }

        let r = c.circle_radius;
        if let Some(circle) = PathBuilder::from_circle(r, c.clip_rect_bottom - r, r) {
            pixmap.fill_path(
                &circle,
                &solid_paint(Color32::GREEN),
                FillRule::Winding,
                transform,
                Some(&mask),
            );
        }
        Ok(())
    }
}

fn new_mask(width: u32, height: u32) -> Result<Mask, SurfaceError> {
    Mask::new(width, height).ok_or(SurfaceError::AllocationFailed { width, height })
}

/// Coverage mask for a sequence of clip operations, starting from "everything visible"
pub fn clip_mask(
    ops: &[ClipOp],
    width: u32,
    height: u32,
    transform: Transform,
) -> Result<Mask, SurfaceError> {
    let mut mask = new_mask(width, height)?;
    mask.data_mut().fill(u8::MAX);

    for op in ops {
        let (shape, invert) = match op {
            ClipOp::Intersect(shape) => (shape, false),
            ClipOp::Difference(shape) => (shape, true),
        };

        let mut coverage = new_mask(width, height)?;
        if let Some(path) = shape.to_skia() {
            coverage.fill_path(&path, FillRule::Winding, true, transform);
        }
        if invert {
            coverage.data_mut().iter_mut().for_each(|a| *a = u8::MAX - *a);
        }

        for (dst, src) in mask.data_mut().iter_mut().zip(coverage.data()) {
            *dst = ((u16::from(*dst) * u16::from(*src) + 127) / 255) as u8;
        }
    }

    Ok(mask)
}

/// Displays the rasterized scene with its labels
#[derive(Debug)]
pub struct ClippingView {
    scene: ClipScene,
    bitmap: Result<PixmapSurface, SurfaceError>,
}

impl ClippingView {
    pub fn new(config: ClippingConfig) -> Self {
        let scene = ClipScene::build(ClipLayout::new(config));
        let bitmap = scene.render();
        if let Err(err) = &bitmap {
            log::error!("Failed to render clipping scene: {err}");
        }
        Self { scene, bitmap }
    }

    pub fn scene(&self) -> &ClipScene {
        &self.scene
    }

    pub fn ui(&mut self, ui: &mut Ui, textures: &mut TextureCache) {
        let bitmap = match &self.bitmap {
            Ok(bitmap) => bitmap,
            Err(err) => {
                ui.colored_label(Color32::RED, err.to_string());
                return;
            }
        };

        let size = self.scene.layout.scene_size();
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);

        match textures.get_or_update(ui.ctx(), TEXTURE_KEY, bitmap.version(), || {
            bitmap.to_color_image()
        }) {
            Ok(id) => {
                let [width, height] = bitmap.size();
                let image_rect = Rect::from_min_size(rect.min, vec2(width as f32, height as f32));
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                painter.image(id, image_rect, uv, Color32::WHITE);
            }
            Err(err) => log::error!("Failed to upload clipping scene: {err}"),
        }

        let font = FontId::proportional(self.scene.layout.config.text_size);
        for label in &self.scene.labels {
            paint_label(&painter, label, rect.min.to_vec2(), font.clone());
        }
    }
}

/// Paint `label` with its baseline slanted by the vertical skew factor.
///
/// egui cannot shear glyphs, so only the baseline direction of a skew is kept.
fn paint_label(painter: &egui::Painter, label: &TextLabel, offset: Vec2, font: FontId) {
    let painter = match label.clip {
        Some(clip) => painter.with_clip_rect(clip.translate(offset).intersect(painter.clip_rect())),
        None => painter.clone(),
    };

    let galley: Arc<egui::Galley> = painter.layout_no_wrap(label.text.to_owned(), font, label.color);
    let size = galley.size();
    let angle = label.skew.y.atan();
    let corner = match label.align {
        Align::Max => vec2(size.x, size.y),
        Align::Min | Align::Center => vec2(0.0, size.y),
    };
    let pos = label.anchor + offset - Rot2::from_angle(angle) * corner;

    painter.add(TextShape::new(pos, galley, label.color).with_angle(angle));
}
