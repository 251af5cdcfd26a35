use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while allocating an offscreen raster surface
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// One of the requested dimensions was zero
    #[error("Cannot allocate a {width}x{height} surface: dimensions must be non-zero")]
    EmptyDimensions { width: u32, height: u32 },
    /// The rasterizer refused the allocation (out of memory or size overflow)
    #[error("Failed to allocate a {width}x{height} surface")]
    AllocationFailed { width: u32, height: u32 },
}

/// Errors that can occur while loading the demo configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors that can occur while exporting a rendered bitmap
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Pixel buffer does not match a {width}x{height} image")]
    BufferMismatch { width: u32, height: u32 },
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;
