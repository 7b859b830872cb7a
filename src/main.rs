mod bootstrap;
mod config;
mod error;
mod hash;
mod models;
mod resource;
mod schema;
mod store;

use actix_web::{middleware, web, App, HttpServer};
use log::{error, info};

use config::Config;
use store::Store;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(
        env_logger::Env::new().default_filter_or("portal_auth=info,actix_web=info"),
    );

    let config = Config::from_env();

    let store = match Store::open(&config.database_path) {
        Ok(store) => store,
        Err(e) => {
            error!("failed to open credential store: {}", e);
            std::process::exit(1);
        }
    };
    let store = web::Data::new(store);

    info!("starting HTTP server on {}", config.bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .wrap(middleware::Logger::default())
            .configure(resource::configure)
    })
    .bind(config.bind_addr.as_str())?
    .run()
    .await
}
