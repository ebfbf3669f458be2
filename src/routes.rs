// routes.rs - HTTP surface
//
// Public:   /, /health, /auth/login
// Gated:    /api/* (identity → access gate → handler)

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, Uri},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::error::ApiError;
use crate::gate::{gate_middleware, AccessGate, GatePolicy};
use crate::handlers::{admin, method_not_allowed, protected, public};
use crate::middleware::{identity_middleware, require_https_middleware};
use crate::state::AppState;
use crate::types::Role;

pub fn app(state: AppState) -> Router {
    let max_body = state.config.api.max_request_size_bytes;

    let mut secured = Router::new()
        .route("/auth/login", post(public::login_post).fallback(method_not_allowed))
        .merge(api_routes(max_body))
        .route_layer(from_fn_with_state(state.clone(), identity_middleware));

    if state.config.security.require_https {
        secured = secured.route_layer(from_fn(require_https_middleware));
    }

    let mut router = Router::new()
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .merge(secured)
        .fallback(not_found)
        .layer(cors_layer(&state.config.security.cors_origins));

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn api_routes(max_body: usize) -> Router<AppState> {
    let admin_create = || GatePolicy::secure_ajax([Method::POST], [Role::Admin]).with_json();

    Router::new()
        .route(
            "/api/whoami",
            gated(
                get(protected::whoami_get),
                GatePolicy::login_required().with_methods([Method::GET]),
                max_body,
            ),
        )
        .route(
            "/api/uploads/validate",
            gated(
                post(protected::validate_post),
                GatePolicy::validate_json(),
                max_body,
            ),
        )
        .route(
            "/api/admin/courses",
            admin_collection(
                get(admin::courses_get),
                post(admin::courses_post),
                max_body,
            ),
        )
        .route(
            "/api/admin/students",
            admin_collection(
                get(admin::students_get),
                post(admin::students_post),
                max_body,
            ),
        )
        .route(
            "/api/admin/sessions",
            gated(post(admin::sessions_post), admin_create(), max_body),
        )
        .route(
            "/api/admin/staff",
            gated(post(admin::staff_post), admin_create(), max_body),
        )
        .route(
            "/api/admin/subjects",
            gated(post(admin::subjects_post), admin_create(), max_body),
        )
}

/// Wraps every method of `route`, including the 405 fallback, in the gate.
fn gated(
    route: MethodRouter<AppState>,
    policy: GatePolicy,
    max_body: usize,
) -> MethodRouter<AppState> {
    with_gate(route.fallback(method_not_allowed), policy, max_body)
}

/// Admin list (GET) and create (POST) on one path. Each method gets its own
/// gate so only the POST body is held to the JSON check.
fn admin_collection(
    list: MethodRouter<AppState>,
    create: MethodRouter<AppState>,
    max_body: usize,
) -> MethodRouter<AppState> {
    let read = GatePolicy::secure_ajax([Method::GET], [Role::Admin]);
    let write = GatePolicy::secure_ajax([Method::POST], [Role::Admin]).with_json();

    with_gate(list, read, max_body)
        .merge(with_gate(create, write, max_body))
        .fallback(method_not_allowed)
}

fn with_gate(
    route: MethodRouter<AppState>,
    policy: GatePolicy,
    max_body: usize,
) -> MethodRouter<AppState> {
    let gate = Arc::new(AccessGate::new(policy, max_body));
    route.layer(from_fn_with_state(gate, gate_middleware))
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
