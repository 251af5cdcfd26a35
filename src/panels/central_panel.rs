use crate::app::DemoApp;

pub fn central_panel(app: &mut DemoApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        app.show_selected(ui);
    });
}
