use crate::config::rate_limit::{RateLimitConfig, RateLimitRule};
use crate::handlers;
use crate::middleware::auth::auth_middleware;
use axum::{middleware, routing, Router};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

pub fn create_routes() -> Router {
    Router::new().nest("/api", api_routes())
}

fn api_routes() -> Router {
    let rate_limit_config = RateLimitConfig::from_env();

    let auth = auth_routes(&rate_limit_config);
    let public = public_routes(&rate_limit_config);
    let protected =
        protected_routes(&rate_limit_config).layer(middleware::from_fn(auth_middleware));

    auth.merge(public).merge(protected)
}

/// Unauthenticated auth routes: register, login, email verification.
fn auth_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        .route("/auth/register", routing::post(handlers::auth::register))
        .route("/auth/login", routing::post(handlers::auth::login))
        .route(
            "/auth/verify-email",
            routing::post(handlers::auth::verify_email),
        )
        .route(
            "/auth/resend-verification",
            routing::post(handlers::auth::resend_verification),
        );

    with_optional_rate_limit(router, config.enabled, config.auth)
}

/// Other unauthenticated routes.
fn public_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new().route(
        "/contact",
        routing::post(handlers::contact::send_contact_message),
    );

    with_optional_rate_limit(router, config.enabled, config.public)
}

/// Everything behind the session middleware.
fn protected_routes(config: &RateLimitConfig) -> Router {
    let router = Router::new()
        // Auth
        .route("/auth/me", routing::get(handlers::auth::get_current_user))
        .route(
            "/auth/profile",
            routing::put(handlers::auth::update_profile),
        )
        // Admin: list all users
        .route("/auth", routing::get(handlers::auth::list_users))
        // Habits
        .route(
            "/habits",
            routing::post(handlers::habit::create_habit).get(handlers::habit::list_habits),
        )
        .route(
            "/habits/{id}",
            routing::get(handlers::habit::get_habit)
                .put(handlers::habit::update_habit)
                .delete(handlers::habit::delete_habit),
        )
        // Tracking. GET takes a habit id, PUT/DELETE a tracking entry id.
        .route(
            "/tracking",
            routing::post(handlers::tracking::track_habit),
        )
        .route(
            "/tracking/{id}",
            routing::get(handlers::tracking::list_tracking)
                .put(handlers::tracking::update_tracking)
                .delete(handlers::tracking::delete_tracking),
        )
        // Chat
        .route("/chat", routing::post(handlers::chat::chat));

    with_optional_rate_limit(router, config.enabled, config.protected)
}

fn with_optional_rate_limit(router: Router, enabled: bool, rule: RateLimitRule) -> Router {
    if !enabled {
        return router;
    }

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(rule.per_second)
        .burst_size(rule.burst_size)
        .finish()
        .expect("Invalid rate limit configuration");

    router.layer(GovernorLayer::new(governor_conf))
}
