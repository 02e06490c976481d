//! Servitec backend.
//!
//! REST API for the storefront catalog, repair-ticket intake/tracking and
//! account auth. Thin actix-web handlers over sqlx repositories; schema
//! migrations run at startup.

mod config;
mod errors;
mod handlers;
mod middleware;
mod models;
mod repository;
mod security;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use config::Config;
use handlers::{auth_handlers, health, product_handlers, repair_handlers};
use middleware::{AuthContext, RequestLogger};
use repository::{ProductRepository, TicketRepository, UserRepository};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();

    info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .map_err(std::io::Error::other)?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(std::io::Error::other)?;

    let products = web::Data::new(ProductRepository::new(pool.clone()));
    let tickets = web::Data::new(TicketRepository::new(pool.clone()));
    let users = web::Data::new(UserRepository::new(pool));
    let app_config = web::Data::new(config.clone());

    let address = ("0.0.0.0", config.port);
    info!("Server running on {}:{}", address.0, address.1);

    HttpServer::new(move || {
        App::new()
            .wrap(RequestLogger)
            .wrap(AuthContext::new(config.jwt_secret.clone()))
            .wrap(cors())
            .app_data(products.clone())
            .app_data(tickets.clone())
            .app_data(users.clone())
            .app_data(app_config.clone())
            .configure(auth_handlers::configure)
            .configure(product_handlers::configure)
            .configure(repair_handlers::configure)
            .configure(health::configure)
    })
    .bind(address)?
    .run()
    .await
}

/// The storefront is served from a different origin, so the API answers
/// cross-origin requests from anywhere.
fn cors() -> Cors {
    Cors::permissive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::header, test, HttpResponse};

    #[actix_web::test]
    async fn cross_origin_requests_are_allowed() {
        let app = test::init_service(
            App::new()
                .wrap(cors())
                .route("/api/health", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "https://shop.example.com"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert!(res
            .headers()
            .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }
}
