use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{auth, booking, catalog, fleet};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::middleware::rate_limit::create_public_governor;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Create IP-based governor for public routes
    let public_governor = create_public_governor();

    // Public routes (with per-IP rate limiting)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public catalog and seat selection routes (the booking page's surface)
    let public_routes = Router::new()
        .route("/buses", get(catalog::list_routes))
        .route("/routes/{id}/seat-sessions", post(booking::open_seat_session))
        .route("/seat-sessions/{id}", get(booking::get_seat_session))
        .route(
            "/seat-sessions/{id}/seats/{seat_id}/toggle",
            post(booking::toggle_seat),
        )
        .route("/seat-sessions/{id}/confirm", post(booking::confirm_session))
        .layer(public_governor.clone());

    // Booking routes: creation and lookup are open to guests, the
    // listing requires a bearer token and is scoped to its owner
    let booking_routes = Router::new()
        .route("/", post(booking::create_booking))
        .route("/", get(booking::my_bookings))
        .route("/{id}", get(booking::get_booking))
        .layer(public_governor.clone());

    // Fleet dashboard routes (read-only, public)
    let fleet_routes = Router::new()
        .route("/buses", get(fleet::list_buses))
        .route("/buses/{id}", get(fleet::get_bus))
        .route("/routes", get(fleet::list_fleet_routes))
        .route("/activity", get(fleet::activity))
        .route("/stats", get(fleet::stats))
        .layer(public_governor);

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        .route("/fleet/buses/{id}", delete(fleet::remove_bus))
        .route("/catalog/refresh", post(catalog::refresh_catalog))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes)
        .nest("/api/bookings", booking_routes)
        .nest("/api/fleet", fleet_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
