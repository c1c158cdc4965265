use cluster_compare::app::ClusterCompareApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([700.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Cluster Compare – RBM 2.0 vs 1.0",
        options,
        Box::new(|_cc| Ok(Box::new(ClusterCompareApp::default()))),
    )
}
