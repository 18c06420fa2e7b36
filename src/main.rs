use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware as axum_middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use console_gateway::backend::BackendClient;
use console_gateway::config::AppConfig;
use console_gateway::handlers;
use console_gateway::middleware::{enforce_gate, session_middleware};
use console_gateway::proxy;
use console_gateway::session::RequiredRoles;
use console_gateway::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up CONSOLE_BACKEND_LOCAL_URL etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env();
    tracing::info!(
        "Starting console gateway in {:?} mode ({:?} deployment)",
        config.environment,
        config.deployment
    );

    let state = AppState::new(config)
        .unwrap_or_else(|e| panic!("invalid gateway configuration: {}", e));

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("CONSOLE_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(4000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Console gateway listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Gated console surfaces
        .merge(tenant_routes(state.clone()))
        .merge(notification_routes(state.clone()))
        .merge(proxy_routes(state.clone()))
        // Session extraction runs before any gate
        .layer(axum_middleware::from_fn(session_middleware))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn tenant_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/tenants/view", delete(handlers::tenant_close))
        .route("/api/tenants/view/refresh", post(handlers::tenant_refresh))
        .route("/api/tenants/:id", get(handlers::tenant_show))
        .layer(axum_middleware::from_fn_with_state(
            (state, RequiredRoles::any_authenticated()),
            enforce_gate,
        ))
}

fn notification_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/notifications", get(handlers::notifications))
        .layer(axum_middleware::from_fn_with_state(
            (state, RequiredRoles::any_authenticated()),
            enforce_gate,
        ))
}

fn proxy_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Privileged forward; non-POST methods get an explicit 405
        .route(
            "/api/proxy/reindex",
            post(proxy::reindex).fallback(proxy::method_not_allowed),
        )
        .layer(axum_middleware::from_fn_with_state(
            (state, RequiredRoles::of(&["admin"])),
            enforce_gate,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Console Gateway",
            "version": version,
            "description": "Admin console gateway for a multi-tenant AI assistant platform",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "tenants": "/api/tenants/:id (gated - any authenticated user)",
                "tenant_view": "/api/tenants/view[/refresh] (gated - any authenticated user)",
                "notifications": "/api/notifications (gated - any authenticated user)",
                "proxy": "/api/proxy/reindex (gated - admin only)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    let probe = match BackendClient::new(state.config.backend_base_url()) {
        Ok(backend) => backend.ping().await,
        Err(e) => Err(e),
    };

    match probe {
        Ok(()) => (
            StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "backend": "ok"
                }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "backend unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "backend_error": e.to_string()
                }
            })),
        ),
    }
}
