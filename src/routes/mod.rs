use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::handlers::{auth, bookings, guides, tours};
use crate::middleware::auth::{auth_middleware, require_admin, require_guide};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::role_rate_limit::{create_role_governor, RateLimitedRole};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Create role-specific governor layers
    let guide_governor = create_role_governor(RateLimitedRole::Guide);
    let user_governor = create_role_governor(RateLimitedRole::User);
    // Create IP-based governor for public routes
    let public_governor = create_public_governor();

    // Public routes (with IP-based rate limiting)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    // Public catalog routes (tour packages)
    let tour_public_routes = Router::new()
        .route("/tours", get(tours::list_tours))
        .route("/tours/{id}", get(tours::get_tour))
        .layer(public_governor.clone());

    // Admin routes (catalog management + guide approval)
    let admin_routes = Router::new()
        .route("/tours", post(tours::create_tour))
        .route("/tours/{id}", put(tours::update_tour))
        .route("/tours/{id}", delete(tours::delete_tour))
        .route("/guides/{id}/approve", patch(guides::approve_guide))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Guide routes: public listing plus guide-only self-service
    let guide_public_routes = Router::new()
        .route("/", get(guides::list_guides))
        .layer(public_governor);

    let guide_self_routes = Router::new()
        .route("/profile", get(guides::get_my_profile))
        .route("/profile", put(guides::upsert_my_profile))
        .route("/availability", put(guides::update_availability))
        .layer(guide_governor)
        .layer(middleware::from_fn(require_guide))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let guide_routes = guide_public_routes.merge(guide_self_routes);

    // Booking routes (requires auth; the admin-only operations check the
    // caller's role in the handler so the whole resource stays on one path)
    let booking_routes = Router::new()
        .route("/", get(bookings::list_all_bookings))
        .route("/create", post(bookings::create_booking))
        .route("/create-order", post(bookings::create_order))
        .route("/verify", post(bookings::verify_payment_and_create_booking))
        .route("/my-bookings", get(bookings::my_bookings))
        .route("/guide-bookings", get(bookings::guide_bookings))
        .route("/{id}", get(bookings::get_booking))
        .route("/{id}", delete(bookings::delete_booking))
        .route("/{id}/status", patch(bookings::update_booking_status))
        .route("/{id}/cancel", post(bookings::cancel_booking))
        .route("/{id}/assign-substitute", patch(bookings::assign_substitute))
        .layer(user_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", tour_public_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/guides", guide_routes)
        .nest("/api/bookings", booking_routes)
        .with_state(state)
}
