//! Main application entry point.

fn main() {
    env_logger::init();
    log::info!("Starting detview");

    if let Err(e) = detview_app::App::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
