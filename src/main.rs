use exoviz::app::App;
use exoviz::loader::DataSource;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // one optional argument: a directory or URL base holding the two
    // dataset resources, defaulting to the preprocess output directory
    let base = std::env::args().nth(1).unwrap_or_else(|| "public/data".to_string());
    let source = DataSource::from_base(&base);
    log::info!("loading datasets from {base}");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_title("A Galaxy of Filters"),
        ..Default::default()
    };

    eframe::run_native(
        "A Galaxy of Filters",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, source)))),
    )
}
