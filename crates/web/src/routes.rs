//! Application route table.
//!
//! Every page carries the access policy the gate evaluates before it renders.

use std::fmt;

use campus_auth::{AccessGate, AccessPolicy, GateOutcome, Role, SessionState, path_of};
use campus_core::CourseId;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "id", rename_all = "snake_case")]
pub enum Page {
    Home,
    Login,
    Register,
    Dashboard,
    CreateCourse,
    Course(CourseId),
}

impl Page {
    /// Match a location (path, optionally with query or fragment) to a page.
    pub fn parse(location: &str) -> Option<Self> {
        let path = path_of(location).trim_end_matches('/');

        match path {
            "" => Some(Self::Home),
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/dashboard" => Some(Self::Dashboard),
            "/create-course" => Some(Self::CreateCourse),
            _ => path
                .strip_prefix("/course/")
                .and_then(|id| id.parse().ok())
                .map(Self::Course),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::CreateCourse => "/create-course".to_string(),
            Self::Course(id) => format!("/course/{id}"),
        }
    }

    pub fn policy(&self) -> AccessPolicy {
        match self {
            Self::Home | Self::Login | Self::Register => AccessPolicy::public(),
            Self::Dashboard | Self::Course(_) => AccessPolicy::authenticated(),
            Self::CreateCourse => AccessPolicy::role(Role::Teacher),
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "snake_case")]
pub enum RouteOutcome {
    NotFound,
    Matched { page: Page, outcome: GateOutcome },
}

/// Resolves locations to pages and runs the gate over them.
#[derive(Debug, Clone, Default)]
pub struct Router {
    gate: AccessGate,
}

impl Router {
    pub fn new(gate: AccessGate) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn route(&self, state: &SessionState, location: &str) -> RouteOutcome {
        match Page::parse(location) {
            Some(page) => RouteOutcome::Matched {
                page,
                outcome: self.gate.evaluate(state, &page.policy(), location),
            },
            None => {
                tracing::debug!(location, "no route matched");
                RouteOutcome::NotFound
            }
        }
    }
}
