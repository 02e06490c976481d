//! Data access layer with SQLx.

pub mod product_repository;
pub mod ticket_repository;
pub mod user_repository;

pub use product_repository::ProductRepository;
pub use ticket_repository::TicketRepository;
pub use user_repository::UserRepository;
