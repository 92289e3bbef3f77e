// src/main.rs

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::error;

use tasklist_be::app_state::AppState;
use tasklist_be::config::Config;
use tasklist_be::{store, task};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env();

    // The schema must be in place before the first request; an unreachable
    // database is retried inside init() and fatal once the budget runs out.
    let task_store = match store::init(&config).await {
        Ok(s) => s,
        Err(e) => {
            error!("Could not initialize the task store: {}", e);
            std::process::exit(1);
        }
    };

    let frontend_origin = config.frontend_origin.clone();
    let bind_addr = config.bind_addr.clone();

    println!("Server running at http://{}", bind_addr);
    println!("Allowed CORS Origin: {}", frontend_origin);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(AppState {
                store: task_store.clone(),
                config: config.clone(),
            }))
            .configure(task::api_routes)
    })
    .bind(&bind_addr)?
    .run()
    .await
}
