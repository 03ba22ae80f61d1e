//! Route definitions.

use crate::auth;
use crate::handlers;
use crate::state::AppState;
use axum::{Router, middleware, routing::get};
use stockroom_core::RoleGuard;
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // The role guard applies to the form display and the form submission
    // alike, since either can be requested directly.
    let stock_management = Router::new()
        .route(
            "/add-product",
            get(handlers::add_product_form).post(handlers::add_product_submit),
        )
        .route(
            "/draw-stock",
            get(handlers::draw_stock_form).post(handlers::draw_stock_submit),
        )
        .route_layer(middleware::from_fn_with_state(
            RoleGuard::STOCK_MANAGERS,
            auth::require_role,
        ));

    let authenticated = Router::new()
        .route("/", get(handlers::dashboard))
        .route("/summary", get(handlers::summary))
        .merge(stock_management)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    Router::new()
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route("/healthz", get(handlers::healthz))
        .merge(authenticated)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
