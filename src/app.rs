use serde::{Deserialize, Serialize};

use crate::canvas_view::CanvasView;
use crate::clipping::ClippingView;
use crate::config::DemoConfig;
use crate::dial::{DialView, FanSpeed};
use crate::panels;
use crate::round_rect::RoundRectView;
use crate::texture_cache::TextureCache;

/// The demos the side panel offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Demo {
    #[default]
    Dial,
    Canvas,
    Clipping,
    RoundRect,
}

impl Demo {
    pub const ALL: [Demo; 4] = [Self::Dial, Self::Canvas, Self::Clipping, Self::RoundRect];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dial => "Dial",
            Self::Canvas => "Canvas",
            Self::Clipping => "Clipping",
            Self::RoundRect => "Round rect",
        }
    }
}

/// Live view state; rebuilt from the config on startup, never persisted
#[derive(Debug)]
struct Views {
    dial: DialView,
    canvas: CanvasView,
    clipping: ClippingView,
    round_rect: RoundRectView,
}

impl Views {
    fn new(config: &DemoConfig) -> Self {
        Self {
            dial: DialView::new(config.dial.clone()),
            canvas: CanvasView::new(&config.canvas),
            clipping: ClippingView::new(config.clipping.clone()),
            round_rect: RoundRectView::new(config.round_rect.clone()),
        }
    }
}

/// We derive Deserialize/Serialize so we can persist app state on shutdown.
#[derive(Deserialize, Serialize, Debug)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
pub struct DemoApp {
    selected: Demo,
    fan_speed: FanSpeed,
    // Surfaces and textures are rebuilt on every start
    #[serde(skip)]
    views: Option<Views>,
    #[serde(skip)]
    textures: TextureCache,
}

impl Default for DemoApp {
    fn default() -> Self {
        Self {
            selected: Demo::default(),
            fan_speed: FanSpeed::default(),
            views: None,
            textures: TextureCache::default(),
        }
    }
}

impl DemoApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: DemoConfig) -> Self {
        // Load previous app state (if any).
        let restored: Self = cc
            .storage
            .and_then(|storage| eframe::get_value(storage, eframe::APP_KEY))
            .unwrap_or_default();

        log::info!("Starting on the {} demo", restored.selected.name());
        restored.with_views(&config)
    }

    /// Build an app without persisted state
    pub fn with_config(config: &DemoConfig) -> Self {
        Self::default().with_views(config)
    }

    fn with_views(mut self, config: &DemoConfig) -> Self {
        self.views = Some(Views::new(config));
        self
    }

    pub fn selected(&self) -> Demo {
        self.selected
    }

    pub fn select(&mut self, demo: Demo) {
        if demo != self.selected {
            log::info!("Switching to the {} demo", demo.name());
            self.selected = demo;
        }
    }

    pub fn fan_speed(&self) -> FanSpeed {
        self.fan_speed
    }

    pub fn canvas(&self) -> Option<&CanvasView> {
        self.views.as_ref().map(|views| &views.canvas)
    }

    /// Show the selected demo in `ui`
    pub fn show_selected(&mut self, ui: &mut egui::Ui) {
        let Some(views) = &mut self.views else {
            ui.label("Views are not initialized");
            return;
        };

        match self.selected {
            Demo::Dial => views.dial.ui(ui, &mut self.fan_speed),
            Demo::Canvas => views.canvas.ui(ui, &mut self.textures),
            Demo::Clipping => views.clipping.ui(ui, &mut self.textures),
            Demo::RoundRect => views.round_rect.ui(ui, &mut self.textures),
        }
    }
}

impl eframe::App for DemoApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.textures.begin_frame();
        panels::demo_panel(self, ctx);
        panels::central_panel(self, ctx);
    }
}
