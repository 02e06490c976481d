//! HTTP handlers, one module per resource.

pub mod auth_handlers;
pub mod health;
pub mod product_handlers;
pub mod repair_handlers;
