//! SeaORM-backed persistence.

mod base;
mod connect;
pub mod entity;
mod repos;

pub use base::SeaOrmRepository;
pub use connect::{DatabaseConfig, connect};
pub use repos::{SeaOrmCommentRepository, SeaOrmPostRepository, SeaOrmUserRepository};
