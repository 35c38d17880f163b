use actix::prelude::*;
use actix_web::server;
use dotenv::dotenv;
use env_logger;
use log::info;
use qr_studio::app;
use qr_studio::config::Config;
use qr_studio::storage::ArtifactWriter;
use qr_studio::studio::Studio;
use std::sync::Arc;

fn main() {
    dotenv().ok();

    env_logger::init();

    let config = Config::from_env().expect("Invalid configuration");
    let docs = Arc::new(config.load_docs().expect("Cannot start without documentation"));
    let sys = actix::System::new("qr-studio");

    let writer = config.save_dir.clone().map(|dir| {
        info!("Saving generated codes to {}", dir.display());
        SyncArbiter::start(1, move || ArtifactWriter::new(dir.clone()))
    });
    let studio: Addr<Studio> = Studio::new(config.limits(), writer).start();

    let host = config.host.clone();
    server::new(move || app::create_app(studio.clone(), docs.clone()))
        .bind(&host)
        .expect(&format!("Can not bind to '{}'", &host))
        .start();

    info!("Starting on {}", host);
    sys.run();
}
