//! Repositorios de acceso a datos
//!
//! Cada repositorio interpreta el RowScope resuelto por el servicio de
//! visibilidad y lo traduce a SQL.

pub mod comment_repository;
pub mod company_repository;
pub mod document_repository;
pub mod event_repository;
pub mod insurance_repository;
pub mod refuel_repository;
pub mod reservation_repository;
pub mod user_repository;
pub mod vehicle_repository;
