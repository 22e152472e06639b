//! TechStack Scout: native entry point.
//!
//! This crate is the composition root: it opens the configured store,
//! builds the chat backend adapter and hands both to the egui app.

mod app;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("TechStack Scout starting...");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("TechStack Scout")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TechStack Scout",
        options,
        Box::new(|cc| Ok(Box::new(app::ScoutApp::new(cc)?))),
    )
}
