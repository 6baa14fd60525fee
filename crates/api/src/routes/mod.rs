//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth::auth_middleware};

pub mod admins;
pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod health;
pub mod kiosk;
pub mod points;
pub mod visits;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Back office: any signed-in admin; role checks happen per action
    let protected_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(dashboard::routes())
        .merge(customers::routes())
        .merge(points::routes())
        .merge(visits::routes())
        .merge(admins::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(kiosk::routes())
        .merge(protected_routes)
}
