use super::{RequiredRoles, Session};

/// Outcome of gating one view against the current session.
///
/// `Pending` renders a neutral placeholder: never the protected content and
/// never a redirect, so nothing protected flashes before the session resolves.
/// Redirect decisions render nothing visible in the same pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Pending,
    Render,
    RedirectToLogin,
    RedirectToDefault,
}

/// Decide whether a protected view may render.
///
/// Pure and total; absence of a user is a normal state, not an error. Callers
/// re-invoke this whenever the session or the role requirements change — here
/// that is once per request, each of which carries fresh session headers.
pub fn evaluate(session: &Session, required: &RequiredRoles) -> GateDecision {
    if session.is_loading {
        return GateDecision::Pending;
    }

    let user = match &session.user {
        Some(user) => user,
        None => return GateDecision::RedirectToLogin,
    };

    if !required.is_empty() && !required.allows(&user.role) {
        return GateDecision::RedirectToDefault;
    }

    GateDecision::Render
}
