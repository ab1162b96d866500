use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{docs::ApiDoc, handlers, middleware, state::AppState};

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/attendance/punch-in",
            post(handlers::attendance::punch_in),
        )
        .route(
            "/api/attendance/punch-out",
            post(handlers::attendance::punch_out),
        )
        .route("/api/attendance/days", get(handlers::attendance::day_records))
        .route(
            "/api/attendance/days/batch",
            get(handlers::attendance::day_records_batch),
        )
        .route(
            "/api/attendance/stats",
            get(handlers::attendance::monthly_stats),
        )
        .route("/api/employees", get(handlers::employees::list_employees))
        .route("/api/policy", get(handlers::policy::effective_policy));

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn(middleware::request_id))
                .layer(TraceLayer::new_for_http())
                .layer(axum_middleware::from_fn(middleware::log_error_responses))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state(state)
}
