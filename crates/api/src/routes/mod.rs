//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod branches;
pub mod fees;
pub mod float_accounts;
pub mod gl;
pub mod health;
pub mod services;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(branches::routes())
        .merge(float_accounts::routes())
        .merge(services::routes())
        .merge(transactions::routes())
        .merge(fees::routes())
        .merge(gl::routes())
}
