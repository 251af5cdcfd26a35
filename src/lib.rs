#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas_view;
pub mod clipping;
pub mod config;
pub mod dial;
pub mod error;
pub mod input;
pub mod panels;
pub mod round_rect;
pub mod smoother;
pub mod stroke;
pub mod surface;
pub mod texture_cache;

pub use app::{Demo, DemoApp};
pub use canvas_view::CanvasView;
pub use clipping::{ClipScene, ClippingView};
pub use config::DemoConfig;
pub use dial::{DialView, FanSpeed};
pub use error::{ConfigError, ExportError, SurfaceError};
pub use input::{PointerPhase, PointerSample, PointerTracker};
pub use round_rect::{RoundRectView, export_png, render_round_rect};
pub use smoother::{MoveOutcome, StrokeSmoother, StrokeState};
pub use stroke::{QuadPath, QuadSegment, StrokeStyle};
pub use surface::{PixmapSurface, RasterSurface};
pub use texture_cache::TextureCache;
