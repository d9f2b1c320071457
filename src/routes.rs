// src/routes.rs

use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, StatusCode, header},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    compression::CompressionLayer, services::ServeDir, set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::{
    handlers::{admin, quiz},
    state::AppState,
    utils::auth::admin_middleware,
};

/// Request body cap for every route except the question upload.
pub const BODY_LIMIT: usize = 2 * 1024;
/// Request body cap for `POST /admin/questions`.
pub const UPLOAD_BODY_LIMIT: usize = 4 * 1024 * 1024;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const STATIC_DIR: &str = "web/public";

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; style-src 'self'; script-src 'self'; \
     base-uri 'self'; worker-src 'none'; form-action 'self'; connect-src 'self'; object-src 'none'; \
     media-src 'none'; frame-ancestors 'none'";

/// Assembles the main application router.
///
/// * Public quiz routes at `/`, admin routes under `/admin` behind Basic auth.
/// * Static assets as the fallback.
/// * Applies global middleware (Trace, timeout, compression, rate limit, security headers).
/// * HSTS is only sent in production.
pub fn create_router(state: AppState) -> Router {
    let production = !state.config.is_development();

    let governor_conf = GovernorConfigBuilder::default()
        .per_millisecond(100)
        .burst_size(20)
        .finish()
        .expect("rate limit quota is non-zero");

    let governor_conf = Arc::new(governor_conf);

    let quiz_routes = Router::new().route("/", get(quiz::get_quiz).post(quiz::submit_quiz));

    let admin_routes = Router::new()
        .route("/management", get(admin::management_page))
        .route("/answers", get(admin::export_answers))
        .route(
            "/questions",
            post(admin::upload_questions)
                .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
                .get(admin::download_questions),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            admin_middleware,
        ));

    let security_headers = ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ));

    let mut router = Router::new()
        .merge(quiz_routes)
        .nest("/admin", admin_routes)
        .fallback_service(ServeDir::new(STATIC_DIR))
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    // Only production terminates TLS
    if production {
        router = router.layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains; preload"),
        ));
    }

    router
        // Global Middleware (applied from outside in)
        .layer(security_headers)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(GovernorLayer::new(governor_conf))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
