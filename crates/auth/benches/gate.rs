use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use campus_auth::{AccessGate, AccessPolicy, Identity, Profile, Role, SessionState};
use campus_core::UserId;

fn teacher_state() -> SessionState {
    let identity = Identity::new(UserId::new(), "jane@univ.edu");
    let profile = Profile {
        id: identity.key(),
        display_name: "Jane".to_string(),
        email: "jane@univ.edu".to_string(),
        role: Role::Teacher,
        enrolled_courses: vec![],
    };
    SessionState::resolved(identity, Some(profile))
}

fn bench_gate(c: &mut Criterion) {
    let gate = AccessGate::default();
    let cases = [
        ("pending", SessionState::pending()),
        ("signed_out", SessionState::signed_out()),
        ("teacher", teacher_state()),
    ];

    let mut group = c.benchmark_group("access_gate");
    for (name, state) in &cases {
        group.bench_with_input(BenchmarkId::new("evaluate", name), state, |b, state| {
            b.iter(|| {
                gate.evaluate(
                    black_box(state),
                    black_box(&AccessPolicy::role(Role::Teacher)),
                    black_box("/create-course"),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_gate);
criterion_main!(benches);
