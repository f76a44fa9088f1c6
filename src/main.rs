use std::sync::Arc;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::PgPool;

use taskboard::auth::AuthMiddleware;
use taskboard::config::Config;
use taskboard::routes::{self, health};
use taskboard::store::{PgStore, TaskStore, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    // One store handle, shared by every request; handlers receive it as
    // trait objects so they never see the engine.
    let store = Arc::new(PgStore::new(pool));
    let task_store: web::Data<dyn TaskStore> =
        web::Data::from(store.clone() as Arc<dyn TaskStore>);
    let user_store: web::Data<dyn UserStore> = web::Data::from(store as Arc<dyn UserStore>);

    log::info!("Starting taskboard server at {}", config.server_url());

    HttpServer::new(move || {
        App::new()
            .app_data(task_store.clone())
            .app_data(user_store.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
