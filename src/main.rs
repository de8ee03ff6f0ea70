use donut_kiosk::config::Settings;
use donut_kiosk::{AppError, DashboardApp};

fn init_logging(settings: &Settings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.logging.max_level())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let settings = Settings::load()?;
    init_logging(&settings);
    DashboardApp::start_gui(&settings)
}
