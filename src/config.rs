use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

/// Environment variable the binary reads the config file path from
pub const CONFIG_ENV_VAR: &str = "CUSTOM_VIEWS_CONFIG";

/// Settings for the freehand canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Distance a pointer must travel on either axis before a new segment is committed
    pub touch_tolerance: f32,
    pub stroke_width: f32,
    pub draw_color: Color32,
    pub background_color: Color32,
    /// Inset of the frame outline drawn over the canvas
    pub frame_inset: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            touch_tolerance: 8.0,
            stroke_width: 12.0,
            draw_color: Color32::from_rgb(0xFF, 0xEB, 0x3B),
            background_color: Color32::from_rgb(0xFF, 0xF3, 0xE0),
            frame_inset: 40.0,
        }
    }
}

/// Settings for the fan-speed dial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialConfig {
    pub text_size: f32,
    /// Added to the dial radius to place the labels
    pub label_offset: f32,
    /// Added to the dial radius to place the indicator (negative moves it inward)
    pub indicator_offset: f32,
}

impl Default for DialConfig {
    fn default() -> Self {
        Self {
            text_size: 55.0,
            label_offset: 30.0,
            indicator_offset: -35.0,
        }
    }
}

/// Dimensions of the clipping showcase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClippingConfig {
    pub clip_rect_left: f32,
    pub clip_rect_top: f32,
    pub clip_rect_right: f32,
    pub clip_rect_bottom: f32,
    pub rect_inset: f32,
    pub small_rect_offset: f32,
    pub circle_radius: f32,
    pub text_offset: f32,
    pub text_size: f32,
    pub stroke_width: f32,
}

impl Default for ClippingConfig {
    fn default() -> Self {
        Self {
            clip_rect_left: 0.0,
            clip_rect_top: 0.0,
            clip_rect_right: 90.0,
            clip_rect_bottom: 90.0,
            rect_inset: 8.0,
            small_rect_offset: 40.0,
            circle_radius: 30.0,
            text_offset: 20.0,
            text_size: 18.0,
            stroke_width: 4.0,
        }
    }
}

/// Settings for the rounded-rectangle bitmap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundRectConfig {
    pub width: u32,
    pub height: u32,
    /// x/y radius pairs, clockwise from the top-left corner
    pub corners: [f32; 8],
    pub color: Color32,
    pub export_path: PathBuf,
}

impl Default for RoundRectConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            corners: [80.0; 8],
            color: Color32::GREEN,
            export_path: PathBuf::from("round_rect.png"),
        }
    }
}

/// All tunables of the demo views.
///
/// Every section uses `#[serde(default)]`, so a config file only needs the
/// values it wants to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub canvas: CanvasConfig,
    pub dial: DialConfig,
    pub clipping: ClippingConfig,
    pub round_rect: RoundRectConfig,
}

impl DemoConfig {
    /// Parse a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config from a JSON file, falling back to defaults on any error
    pub fn load_or_default(path: Option<impl AsRef<Path>>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.as_ref().display());
                config
            }
            Err(err) => {
                log::warn!("{err}; using default config");
                Self::default()
            }
        }
    }

    /// Load the config named by the `CUSTOM_VIEWS_CONFIG` environment variable
    pub fn from_env() -> Self {
        Self::load_or_default(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
    }
}
