//! Capa de base de datos

pub mod connection;
pub mod seed;

pub use connection::{create_pool, run_migrations};
