//! Walks a teacher through the app against the in-memory backends.

use std::sync::Arc;

use anyhow::Context;
use campus_auth::{Credential, GateOutcome, Registration, Role};
use campus_core::NewCourse;
use campus_infra::{InMemoryIdentityProvider, InMemoryProfileStore};
use campus_session::{SessionConfig, SessionController};
use campus_web::{DashboardSummary, RouteOutcome, Router, nav_items, resume_location};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    campus_observability::init();

    let config = SessionConfig::from_env();
    let provider = Arc::new(InMemoryIdentityProvider::new());
    let store = Arc::new(InMemoryProfileStore::new());
    let session = SessionController::new(provider, store.clone(), config);
    let router = Router::new(session.gate());

    if !session.initialize() {
        anyhow::bail!("session controller could not start");
    }
    let (mut state, mut states) = session.watch();
    while state.is_loading() {
        state = states.recv().await.context("session closed before settling")?;
    }

    let requested = "/dashboard";
    let return_to = match router.route(&state, requested) {
        RouteOutcome::Matched {
            outcome: GateOutcome::Redirect(redirect),
            ..
        } => {
            tracing::info!(to = %redirect.to, "sign-in required");
            redirect.return_to
        }
        other => anyhow::bail!("expected a sign-in redirect, got {other:?}"),
    };

    let credential = Credential::new("jane@univ.edu", "pw");
    session
        .register(&credential, &Registration::new("Jane", Role::Teacher))
        .await
        .context("registration failed")?;
    while state.is_loading() || !state.is_authenticated() {
        state = states.recv().await.context("session closed while signing in")?;
    }

    let landing = resume_location(return_to.as_deref(), router.gate().routes());
    tracing::info!(%landing, nav = ?nav_items(&state), "signed in");

    if let RouteOutcome::Matched { outcome, .. } = router.route(&state, "/create-course") {
        anyhow::ensure!(outcome.is_render(), "teacher was refused /create-course");
    }
    let id = campus_web::create_course(
        &state,
        store.as_ref(),
        NewCourse::new("Data Structures", "CS-301", "Trees, heaps and graphs"),
    )
    .await?;
    tracing::info!(course = %id, "course created");

    let courses = campus_web::list_courses(store.as_ref()).await?;
    let summary = DashboardSummary::build(&state, &courses);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    session.logout().await?;
    tracing::info!(to = campus_web::after_logout(), "signed out");

    session.teardown().await;
    Ok(())
}
