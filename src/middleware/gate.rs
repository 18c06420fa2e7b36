use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::session::{evaluate, GateDecision, RequiredRoles, Session};
use crate::state::AppState;

/// Middleware enforcing the session gate for one route group.
///
/// Attached with `from_fn_with_state((state, roles), enforce_gate)` so each
/// group carries its own role requirements. The redirect and the empty render
/// happen in the same pass; protected bytes are never written first.
pub async fn enforce_gate(
    State((state, required)): State<(AppState, RequiredRoles)>,
    request: Request,
    next: Next,
) -> Response {
    // Session middleware runs first; a missing extension reads as a resolved
    // anonymous session.
    let session = request.extensions().get::<Session>().cloned().unwrap_or_default();

    match evaluate(&session, &required) {
        GateDecision::Pending => {
            // Neutral placeholder while the edge finishes resolving the session
            StatusCode::NO_CONTENT.into_response()
        }
        GateDecision::RedirectToLogin => {
            tracing::debug!("Gate: unauthenticated request to {}", request.uri().path());
            Redirect::to(&state.config.gate.login_path).into_response()
        }
        GateDecision::RedirectToDefault => {
            tracing::warn!(
                "Gate: role not permitted for {} (required: {:?})",
                request.uri().path(),
                required.0
            );
            Redirect::to(&state.config.gate.default_path).into_response()
        }
        GateDecision::Render => next.run(request).await,
    }
}
