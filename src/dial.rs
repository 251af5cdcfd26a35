use std::f32::consts::PI;

use egui::{Align2, Color32, FontId, Pos2, Sense, Ui, Vec2, vec2};
use serde::{Deserialize, Serialize};

use crate::config::DialConfig;

/// Angle of position 0, just past nine o'clock
pub const START_ANGLE: f32 = PI * (9.0 / 8.0);

/// Selectable positions of the dial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FanSpeed {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

impl FanSpeed {
    pub const ALL: [FanSpeed; 4] = [Self::Off, Self::Low, Self::Medium, Self::High];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Low => "1",
            Self::Medium => "2",
            Self::High => "3",
        }
    }

    pub fn ordinal(&self) -> usize {
        match self {
            Self::Off => 0,
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    /// The next speed, wrapping from `High` back to `Off`
    pub fn next(&self) -> Self {
        Self::ALL[(self.ordinal() + 1) % Self::ALL.len()]
    }
}

/// Offset from the dial centre of position `index` out of `count` evenly spaced positions
pub fn position_offset(index: usize, count: usize, radius: f32) -> Vec2 {
    let angle = START_ANGLE + index as f32 * (2.0 * PI / count as f32);
    vec2(radius * angle.cos(), radius * angle.sin())
}

/// Geometry of the dial for a given view size. Recomputed on size change only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialLayout {
    pub center: Pos2,
    pub radius: f32,
}

impl DialLayout {
    pub fn new(size: Vec2) -> Self {
        Self {
            center: (size / 2.0).to_pos2(),
            radius: size.x.min(size.y) / 2.0 * 0.8,
        }
    }

    /// Centre of the position marker for `speed`
    pub fn indicator_center(&self, speed: FanSpeed, config: &DialConfig) -> Pos2 {
        let radius = self.radius + config.indicator_offset;
        self.center + position_offset(speed.ordinal(), FanSpeed::ALL.len(), radius)
    }

    pub fn indicator_radius(&self) -> f32 {
        self.radius / 12.0
    }

    /// Where the label for `speed` is drawn
    pub fn label_position(&self, speed: FanSpeed, config: &DialConfig) -> Pos2 {
        let radius = self.radius + config.label_offset;
        self.center + position_offset(speed.ordinal(), FanSpeed::ALL.len(), radius)
    }
}

/// Rotary selector; a click advances to the next speed
#[derive(Debug)]
pub struct DialView {
    config: DialConfig,
    layout: Option<(Vec2, DialLayout)>,
}

impl DialView {
    pub fn new(config: DialConfig) -> Self {
        Self { config, layout: None }
    }

    fn layout_for(&mut self, size: Vec2) -> DialLayout {
        match self.layout {
            Some((cached_size, layout)) if cached_size == size => layout,
            _ => {
                let layout = DialLayout::new(size);
                self.layout = Some((size, layout));
                layout
            }
        }
    }

    pub fn ui(&mut self, ui: &mut Ui, speed: &mut FanSpeed) {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click());
        let rect = response.rect;
        let layout = self.layout_for(rect.size());
        let origin = rect.min.to_vec2();

        if response.clicked() {
            *speed = speed.next();
            log::info!("Fan speed set to {}", speed.label());
        }

        let dial_color = if *speed == FanSpeed::Off {
            Color32::GRAY
        } else {
            Color32::GREEN
        };
        painter.circle_filled(layout.center + origin, layout.radius, dial_color);

        painter.circle_filled(
            layout.indicator_center(*speed, &self.config) + origin,
            layout.indicator_radius(),
            Color32::BLACK,
        );

        let font = FontId::proportional(self.config.text_size);
        for position in FanSpeed::ALL {
            painter.text(
                layout.label_position(position, &self.config) + origin,
                Align2::CENTER_CENTER,
                position.label(),
                font.clone(),
                Color32::BLACK,
            );
        }
    }
}
