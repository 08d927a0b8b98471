//! Main application entry point.

use pipeboard_app::{App, AppConfig};

fn main() {
    env_logger::init();
    log::info!("Starting Pipeboard");

    let config = match AppConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = pollster::block_on(App::run(config)) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
