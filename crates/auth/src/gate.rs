//! Per-route access gate.
//!
//! The gate is a pure decision over the current [`SessionState`] and the
//! route's declared [`AccessPolicy`]:
//!
//! 1. still loading → [`GateOutcome::ShowPending`]
//! 2. auth required, nobody signed in → redirect to sign-in (with return-to)
//! 3. role required, profile absent or of another role → redirect to the
//!    default area
//! 4. otherwise → [`GateOutcome::Render`]
//!
//! Loading is checked first, unconditionally, so a role check never runs
//! against a profile that is still on its way.
//!
//! - No IO
//! - No state
//! - No panics

use serde::{Deserialize, Serialize};

use crate::{Role, SessionState};

/// Access requirements declared by a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub require_auth: bool,
    pub required_role: Option<Role>,
}

impl AccessPolicy {
    /// Anyone may view the route.
    pub const fn public() -> Self {
        Self {
            require_auth: false,
            required_role: None,
        }
    }

    /// Any signed-in user may view the route.
    pub const fn authenticated() -> Self {
        Self {
            require_auth: true,
            required_role: None,
        }
    }

    /// Only signed-in users whose profile holds `role` may view the route.
    pub const fn role(role: Role) -> Self {
        Self {
            require_auth: true,
            required_role: Some(role),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::authenticated()
    }
}

/// Where the gate sends users it turns away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteConfig {
    pub sign_in_path: String,
    pub default_area: String,
}

impl RouteConfig {
    pub const DEFAULT_SIGN_IN_PATH: &'static str = "/login";
    pub const DEFAULT_AREA: &'static str = "/dashboard";

    /// Whether `location` points at the sign-in page, ignoring query,
    /// fragment and a trailing slash.
    pub fn is_sign_in(&self, location: &str) -> bool {
        let target = path_of(location).trim_end_matches('/');
        !target.is_empty() && target == self.sign_in_path.trim_end_matches('/')
    }
}

/// Path part of a location, without query or fragment.
pub fn path_of(location: &str) -> &str {
    location.split(['?', '#']).next().unwrap_or_default()
}

/// `location` trimmed, if it stays on this origin.
///
/// Accepts only absolute paths. Anything a browser would read as a scheme or
/// a protocol-relative URL (`//host`, `/\host`) is refused, as are control
/// characters, which browsers strip before parsing.
pub fn local_path(location: &str) -> Option<&str> {
    let location = location.trim();
    if location.chars().any(char::is_control) {
        return None;
    }

    let mut chars = location.chars();
    match (chars.next(), chars.next()) {
        (Some('/'), Some('/' | '\\')) => None,
        (Some('/'), _) => Some(location),
        _ => None,
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            sign_in_path: Self::DEFAULT_SIGN_IN_PATH.to_string(),
            default_area: Self::DEFAULT_AREA.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    NotSignedIn,
    InsufficientRole,
}

/// A navigation the view layer must perform instead of rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redirect {
    pub to: String,
    pub reason: RedirectReason,
    /// Location to resume after sign-in. Only set for sign-in redirects.
    pub return_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum GateOutcome {
    ShowPending,
    Redirect(Redirect),
    Render,
}

impl GateOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, GateOutcome::Render)
    }

    pub fn redirect(&self) -> Option<&Redirect> {
        match self {
            GateOutcome::Redirect(r) => Some(r),
            _ => None,
        }
    }
}

/// Decide what a guarded route shows for `state`.
///
/// `requested` is the location the user asked for; it is threaded through
/// unchanged as the return-to of a sign-in redirect.
pub fn decide(
    state: &SessionState,
    policy: &AccessPolicy,
    requested: &str,
    routes: &RouteConfig,
) -> GateOutcome {
    if state.is_loading() {
        return GateOutcome::ShowPending;
    }

    if policy.require_auth && !state.is_authenticated() {
        return GateOutcome::Redirect(Redirect {
            to: routes.sign_in_path.clone(),
            reason: RedirectReason::NotSignedIn,
            return_to: Some(requested.to_string()),
        });
    }

    if let Some(required) = policy.required_role {
        if !state.has_role(required) {
            return GateOutcome::Redirect(Redirect {
                to: routes.default_area.clone(),
                reason: RedirectReason::InsufficientRole,
                return_to: None,
            });
        }
    }

    GateOutcome::Render
}

/// Route guard bound to the application's redirect targets.
#[derive(Debug, Clone, Default)]
pub struct AccessGate {
    routes: RouteConfig,
}

impl AccessGate {
    pub fn new(routes: RouteConfig) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &RouteConfig {
        &self.routes
    }

    pub fn evaluate(&self, state: &SessionState, policy: &AccessPolicy, requested: &str) -> GateOutcome {
        let outcome = decide(state, policy, requested, &self.routes);
        if let GateOutcome::Redirect(redirect) = &outcome {
            tracing::debug!(
                requested,
                to = %redirect.to,
                reason = ?redirect.reason,
                "access gate redirect"
            );
        }
        outcome
    }

    /// Explain why [`AccessGate::evaluate`] decides the way it does.
    pub fn explain(&self, state: &SessionState, policy: &AccessPolicy, requested: &str) -> GateExplanation {
        let outcome = decide(state, policy, requested, &self.routes);

        let message = match &outcome {
            GateOutcome::ShowPending => "session is still resolving; nothing is decided yet".to_string(),
            GateOutcome::Render => match (policy.require_auth, policy.required_role) {
                (_, Some(role)) => format!("principal holds the required role '{role}'"),
                (true, None) => "principal is signed in".to_string(),
                (false, None) => "route is public".to_string(),
            },
            GateOutcome::Redirect(redirect) => match redirect.reason {
                RedirectReason::NotSignedIn => format!(
                    "route '{}' requires sign-in; nobody is signed in",
                    requested
                ),
                RedirectReason::InsufficientRole => match (policy.required_role, state.role()) {
                    (Some(required), Some(held)) => {
                        format!("route requires role '{required}' but principal holds '{held}'")
                    }
                    (Some(required), None) => {
                        format!("route requires role '{required}' but no profile is available")
                    }
                    (None, _) => "route requires a role".to_string(),
                },
            },
        };

        GateExplanation {
            requested: requested.to_string(),
            policy: *policy,
            held_role: state.role(),
            outcome,
            message,
        }
    }
}

/// Auditable account of a gate decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateExplanation {
    pub requested: String,
    pub policy: AccessPolicy,
    pub held_role: Option<Role>,
    pub outcome: GateOutcome,
    pub message: String,
}
