use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use task_calendar::{
    auth::{MemorySessionStore, SessionStore},
    config::Config,
    routes::{self, health},
    store::{MemoryRepository, PgRepository, Repository},
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let repository: Arc<dyn Repository> = match &config.database_url {
        Some(url) => {
            let repository = PgRepository::connect(url, config.database_max_connections)
                .await
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            log::info!("Connected to PostgreSQL, migrations applied");
            Arc::new(repository)
        }
        None => {
            log::warn!("DATABASE_URL is not set; users and tasks are kept in memory only");
            Arc::new(MemoryRepository::new())
        }
    };
    let sessions: Arc<dyn SessionStore> =
        Arc::new(MemorySessionStore::from_config(&config));

    let repository = web::Data::from(repository);
    let sessions = web::Data::from(sessions);
    let app_config = web::Data::new(config.clone());

    log::info!("Starting task calendar server at {}", config.server_url());
    HttpServer::new(move || {
        App::new()
            .app_data(repository.clone())
            .app_data(sessions.clone())
            .app_data(app_config.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .configure(routes::config)
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
