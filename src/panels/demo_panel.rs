use crate::app::{Demo, DemoApp};
use crate::surface::RasterSurface;

pub fn demo_panel(app: &mut DemoApp, ctx: &egui::Context) {
    egui::SidePanel::left("demo_panel")
        .resizable(true)
        .default_width(160.0)
        .show(ctx, |ui| {
            ui.heading("Demos");

            for demo in Demo::ALL {
                let is_selected = app.selected() == demo;
                if ui.selectable_label(is_selected, demo.name()).clicked() {
                    app.select(demo);
                }
            }
            ui.separator();

            ui.label(format!("Fan speed: {}", app.fan_speed().label()));

            if let Some(canvas) = app.canvas() {
                let smoother = canvas.smoother();
                let state = if smoother.is_stroking() { "stroking" } else { "idle" };
                ui.label(format!("Canvas: {state}"));
                if let Some(surface) = smoother.surface() {
                    let [width, height] = surface.size();
                    ui.label(format!("Surface: {width}x{height}"));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DemoConfig;
    use crate::panels::central_panel;

    #[test]
    fn test_panel_reports_canvas_surface() {
        let ctx = egui::Context::default();
        let mut app = DemoApp::with_config(&DemoConfig::default());
        app.select(Demo::Canvas);

        let input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(480.0, 320.0),
            )),
            ..Default::default()
        };
        // The first frame allocates the canvas surface, the second one reports it
        for _ in 0..2 {
            let _ = ctx.run(input.clone(), |ctx| {
                demo_panel(&mut app, ctx);
                central_panel(&mut app, ctx);
            });
        }

        let surface = app.canvas().unwrap().smoother().surface().unwrap();
        let [width, height] = surface.size();
        assert!(width > 0 && width < 480);
        assert!(height > 0 && height <= 320);
    }
}
