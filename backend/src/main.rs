use actix_web::{middleware, web, App, HttpServer};
use env_logger::Env;
use formgen::config::AppConfig;
use formgen::db::Store;
use formgen::services;
use formgen::state::AppState;
use log::{error, info, warn};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    let store = Store::open(&config.database_path).map_err(|e| {
        error!("Cannot open database {}: {}", config.database_path.display(), e);
        io::Error::other(e)
    })?;
    let state = AppState::new(store, &config).map_err(|e| {
        error!("Cannot build the OpenAI client: {}", e);
        io::Error::other(e)
    })?;

    if !state.assistant.is_available() {
        warn!("OPENAI_API_KEY or OPENAI_ASSISTANT_ID not set; the assistant will answer with a fallback message");
    }

    // Stop in-flight assistant polls as soon as shutdown starts instead of
    // waiting for their timeout.
    {
        let shutdown = state.shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        });
    }

    info!("Server running at {}", config.bind_url());
    info!("Database: {}", config.database_path.display());

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(services::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
