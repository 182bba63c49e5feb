//! Navigation bar and post-auth navigation targets.

use campus_auth::{Resolution, RouteConfig, SessionState, local_path};
use serde::Serialize;

use crate::routes::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavItem {
    Dashboard,
    CreateCourse,
    Login,
    Register,
}

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::CreateCourse => "Create Course",
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }

    pub fn page(&self) -> Page {
        match self {
            Self::Dashboard => Page::Dashboard,
            Self::CreateCourse => Page::CreateCourse,
            Self::Login => Page::Login,
            Self::Register => Page::Register,
        }
    }
}

/// Links shown in the navigation bar for the current session.
///
/// Nothing is offered while the session is still resolving, so the bar never
/// flashes the signed-out links for a returning user.
pub fn nav_items(state: &SessionState) -> Vec<NavItem> {
    match state.resolution() {
        Resolution::Pending => Vec::new(),
        Resolution::SignedOut => vec![NavItem::Login, NavItem::Register],
        Resolution::Resolved(profile) if profile.is_teacher() => {
            vec![NavItem::Dashboard, NavItem::CreateCourse]
        }
        Resolution::Resolved(_) | Resolution::ProfileMissing => vec![NavItem::Dashboard],
    }
}

/// Letter shown in the avatar bubble.
pub fn avatar_initial(state: &SessionState) -> char {
    state
        .profile()
        .and_then(|p| p.display_name.trim().chars().next())
        .and_then(|c| c.to_uppercase().next())
        .unwrap_or('U')
}

/// Where to go after a successful sign-in.
///
/// Only local absolute paths are honoured, and never the sign-in page itself;
/// anything else lands on the default area.
pub fn resume_location(return_to: Option<&str>, routes: &RouteConfig) -> String {
    match return_to.and_then(local_path) {
        Some(path) if !routes.is_sign_in(path) => path.to_string(),
        _ => routes.default_area.clone(),
    }
}

/// Where to go after signing out.
pub fn after_logout() -> &'static str {
    "/"
}
