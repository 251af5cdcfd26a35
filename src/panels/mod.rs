mod central_panel;
mod demo_panel;

pub use central_panel::central_panel;
pub use demo_panel::demo_panel;
