//! Product catalog handlers.
//!
//! Payloads are trusted beyond numeric coercion; validation lives in the
//! admin client.

use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::errors::{AppError, AppResult, RepositoryError};
use crate::models::ProductPayload;
use crate::repository::ProductRepository;

/// Configure product routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/products")
            .service(list_products)
            .service(create_product)
            .service(update_product)
            .service(delete_product),
    );
}

/// List all products, newest first.
#[get("")]
async fn list_products(repo: web::Data<ProductRepository>) -> AppResult<HttpResponse> {
    let products = repo.list().await?;

    Ok(HttpResponse::Ok().json(products))
}

/// Create a product. A missing or blank image URL gets the placeholder.
#[post("")]
async fn create_product(
    repo: web::Data<ProductRepository>,
    body: web::Json<ProductPayload>,
) -> AppResult<HttpResponse> {
    let product = repo.create(&body).await?;

    Ok(HttpResponse::Created().json(product))
}

/// Full-field update.
#[put("/{id}")]
async fn update_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<i32>,
    body: web::Json<ProductPayload>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let product = repo.update(id, &body).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::ProductNotFound(id),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(product))
}

/// Delete a product.
#[delete("/{id}")]
async fn delete_product(
    repo: web::Data<ProductRepository>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    repo.delete(id).await.map_err(|e| match e {
        RepositoryError::NotFound => AppError::ProductNotFound(id),
        other => other.into(),
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Product deleted" })))
}
