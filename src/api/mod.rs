//! API endpoints
//!
//! Este módulo contiene los endpoints de la API y el ensamblado del
//! router con el middleware de autenticación.

pub mod comments;
pub mod companies;
pub mod documents;
pub mod events;
pub mod insurances;
pub mod refuels;
pub mod reservations;
pub mod users;
pub mod vehicles;

use axum::{middleware, routing::post, Router};

use crate::middleware::auth::auth_middleware;
use crate::state::AppState;

/// Crear el router principal de la API. Todas las rutas de entidades
/// pasan por el middleware de autenticación; el login queda fuera.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .merge(comments::create_comments_router())
        .merge(companies::create_companies_router())
        .merge(documents::create_documents_router())
        .merge(events::create_events_router())
        .merge(insurances::create_insurances_router())
        .merge(refuels::create_refuels_router())
        .merge(reservations::create_reservations_router())
        .merge(users::create_users_router())
        .merge(vehicles::create_vehicles_router())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/users/login", post(users::login))
        .merge(protected)
}
