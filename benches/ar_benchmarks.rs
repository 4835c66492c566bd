use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};

use redlilium_ar::anchor::PlaneAlignment;
use redlilium_ar::frame::ViewIntrinsics;
use redlilium_ar::session::SessionTrackingState;
use redlilium_ar::{
    AnchorEvent, AnchorId, AnchorKind, AnchorSink, ArConfig, ArInterface, CameraFrame, Pose,
    ScriptedSession,
};

fn plane() -> AnchorKind {
    AnchorKind::Plane {
        alignment: PlaneAlignment::Horizontal,
        center: Vec3::ZERO,
        extent: Vec2::splat(2.0),
    }
}

// ---------------------------------------------------------------------------
// Anchor ingestion
// ---------------------------------------------------------------------------

fn bench_registry_churn(c: &mut Criterion) {
    c.bench_function("anchor_churn_32_slots", |b| {
        let sink = AnchorSink::new(32);
        let mut n = 0u128;
        b.iter(|| {
            n += 1;
            sink.ingest(AnchorEvent::Added {
                id: AnchorId::from_u128(n),
                pose: Pose::IDENTITY,
                kind: plane(),
            });
            sink.ingest(AnchorEvent::Updated {
                id: AnchorId::from_u128(n.saturating_sub(8)),
                pose: Pose::from_translation(Vec3::X),
                kind: plane(),
            });
            black_box(sink.ingest(AnchorEvent::Removed {
                id: AnchorId::from_u128(n.saturating_sub(24)),
            }));
        });
    });
}

fn bench_registry_full_updates(c: &mut Criterion) {
    c.bench_function("anchor_update_full_registry_64", |b| {
        let sink = AnchorSink::new(64);
        for n in 0..64 {
            sink.ingest(AnchorEvent::Added {
                id: AnchorId::from_u128(n),
                pose: Pose::IDENTITY,
                kind: plane(),
            });
        }
        b.iter(|| {
            for n in 0..64 {
                sink.ingest(AnchorEvent::Updated {
                    id: AnchorId::from_u128(n),
                    pose: Pose::from_translation(Vec3::Y),
                    kind: plane(),
                });
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Raycast
// ---------------------------------------------------------------------------

fn bench_raycast(c: &mut Criterion) {
    let script = ScriptedSession::new();
    let mut interface = ArInterface::new(script.clone(), ArConfig::default());
    interface.initialize().unwrap();
    let eye = Vec3::new(0.0, 5.0, 0.0);
    script.push_frame(CameraFrame {
        camera_pose: Pose::looking_at(eye, eye + Vec3::NEG_Y, Vec3::NEG_Z),
        tracking_state: SessionTrackingState::Normal,
        intrinsics: [
            Some(ViewIntrinsics::from_fov(1.0, Vec2::new(1280.0, 720.0))),
            None,
        ],
        ..Default::default()
    });
    interface.process();
    for n in 0..32u128 {
        script.emit(AnchorEvent::Added {
            id: AnchorId::from_u128(n),
            pose: Pose::from_translation(Vec3::new(0.0, n as f32 * 0.1, 0.0)),
            kind: plane(),
        });
    }

    c.bench_function("raycast_32_anchors", |b| {
        b.iter(|| black_box(interface.raycast(black_box(Vec2::splat(0.5)))));
    });
}

criterion_group!(
    benches,
    bench_registry_churn,
    bench_registry_full_updates,
    bench_raycast,
);
criterion_main!(benches);
