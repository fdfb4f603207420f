//! Main application entry point (native).

mod app;
mod decode;
mod render;
mod ui;

pub use app::MapmarkApp;

fn main() -> eframe::Result {
    env_logger::init();
    log::info!("Starting Mapmark");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Mapmark"),
        ..Default::default()
    };
    eframe::run_native(
        "mapmark",
        options,
        Box::new(|cc| Ok(Box::new(MapmarkApp::new(cc)))),
    )
}
