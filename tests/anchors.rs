//! Integration tests for anchor ingestion.
//!
//! Events are delivered through a running [`ScriptedSession`] exactly as a
//! platform session would deliver them, and observed through the interface.

mod common;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use glam::{Vec2, Vec3};
use rstest::rstest;

use common::{floor_plane, frame, id, looking_down, pose_at, running_interface};
use redlilium_ar::anchor::IngestOutcome;
use redlilium_ar::{AnchorEvent, AnchorKind, AnchorSink, ArConfig};

// ============================================================================
// Registry Invariants
// ============================================================================

#[test]
fn test_capacity_scenario() {
    let (interface, script) = running_interface(ArConfig::default().with_max_anchors(2));
    let add = |n| {
        script.emit(AnchorEvent::Added {
            id: id(n),
            pose: pose_at(n as f32, 0.0, 0.0),
            kind: AnchorKind::Generic,
        })
    };

    assert_eq!(add(1), Some(IngestOutcome::Created));
    assert_eq!(add(2), Some(IngestOutcome::Created));
    assert_eq!(add(3), Some(IngestOutcome::Dropped));
    assert_eq!(interface.anchors().len(), 2);
    assert!(interface.anchor(&id(3)).is_none());
    // Existing entries survive the overflow untouched.
    assert_eq!(
        interface.anchor(&id(2)).unwrap().pose().translation,
        Vec3::new(2.0, 0.0, 0.0)
    );

    script.emit(AnchorEvent::Removed { id: id(1) });
    assert_eq!(add(3), Some(IngestOutcome::Created));

    let ids: Vec<_> = interface
        .anchor_snapshot()
        .iter()
        .map(|slot| slot.id)
        .collect();
    assert_eq!(ids, vec![id(2), id(3)]);
    assert_eq!(interface.anchors().stats().dropped, 1);
}

#[rstest]
#[case::never_added(&[], 7)]
#[case::removed_twice(&[7], 7)]
#[case::other_identity(&[1, 2], 9)]
fn test_removal_is_idempotent(#[case] added: &[u128], #[case] removed: u128) {
    let sink = AnchorSink::new(8);
    for &n in added {
        sink.ingest(AnchorEvent::Added {
            id: id(n),
            pose: pose_at(0.0, 0.0, 0.0),
            kind: AnchorKind::Generic,
        });
    }
    sink.ingest(AnchorEvent::Removed { id: id(removed) });
    let before: Vec<_> = sink.snapshot().iter().map(|slot| slot.id).collect();

    assert_eq!(
        sink.ingest(AnchorEvent::Removed { id: id(removed) }),
        IngestOutcome::Stale
    );
    let after: Vec<_> = sink.snapshot().iter().map(|slot| slot.id).collect();
    assert_eq!(before, after);
}

#[test]
fn test_identity_uniqueness_and_compaction_under_mixed_events() {
    let sink = AnchorSink::new(6);
    // Deterministic pseudo-random event stream over 10 identities.
    let mut state = 0x2545_f491_u32;
    for _ in 0..2000 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let n = (state % 10) as u128;
        let event = match (state >> 8) % 3 {
            0 => AnchorEvent::Added {
                id: id(n),
                pose: pose_at(n as f32, 0.0, 0.0),
                kind: AnchorKind::Generic,
            },
            1 => AnchorEvent::Updated {
                id: id(n),
                pose: pose_at(n as f32, 1.0, 0.0),
                kind: AnchorKind::Generic,
            },
            _ => AnchorEvent::Removed { id: id(n) },
        };
        sink.ingest(event);

        sink.with_registry(|registry| {
            assert!(registry.len() <= registry.max_anchors());
            assert_eq!(registry.iter().count(), registry.len());
            let mut ids: Vec<_> = registry.iter().map(|slot| slot.id).collect();
            ids.sort_by_key(|id| id.to_u128());
            ids.dedup();
            assert_eq!(ids.len(), registry.len());
        });
    }
}

#[test]
fn test_plane_extent_grows_on_update() {
    let (interface, script) = running_interface(ArConfig::default());
    script.emit(AnchorEvent::Added {
        id: id(1),
        pose: pose_at(0.0, 0.0, 0.0),
        kind: floor_plane(0.5),
    });
    let tracker = interface.anchor(&id(1)).unwrap();

    script.emit(AnchorEvent::Updated {
        id: id(1),
        pose: pose_at(0.0, 0.0, 0.0),
        kind: floor_plane(2.0),
    });
    assert_eq!(tracker.kind().bounds(), Some((Vec3::ZERO, Vec2::splat(1.0))));
    assert_eq!(tracker.state().revision, 1);
}

// ============================================================================
// Raycast Scenarios
// ============================================================================

#[test]
fn test_raycast_sees_updated_pose() {
    let (mut interface, script) = running_interface(ArConfig::default());
    script.push_frame(frame(0.0, looking_down(Vec3::new(0.0, 3.0, 0.0))));
    interface.process();

    script.emit(AnchorEvent::Added {
        id: id(1),
        pose: pose_at(5.0, 0.0, 0.0),
        kind: floor_plane(1.0),
    });
    assert!(interface.raycast(Vec2::splat(0.5)).is_empty());

    script.emit(AnchorEvent::Updated {
        id: id(1),
        pose: pose_at(0.0, 1.0, 0.0),
        kind: floor_plane(1.0),
    });
    let hits = interface.raycast(Vec2::splat(0.5));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, id(1));
    assert!(hits[0]
        .pose
        .translation
        .abs_diff_eq(Vec3::new(0.0, 1.0, 0.0), 1e-4));
    assert!((hits[0].distance - 2.0).abs() < 1e-4);
}

#[test]
fn test_raycast_orders_nearest_first() {
    let (mut interface, script) = running_interface(ArConfig::default());
    script.push_frame(frame(0.0, looking_down(Vec3::new(0.0, 3.0, 0.0))));
    interface.process();

    for (n, height) in [(1, 0.0), (2, 2.0), (3, 1.0)] {
        script.emit(AnchorEvent::Added {
            id: id(n),
            pose: pose_at(0.0, height, 0.0),
            kind: floor_plane(1.0),
        });
    }
    let ids: Vec<_> = interface
        .raycast(Vec2::splat(0.5))
        .iter()
        .map(|hit| hit.id)
        .collect();
    assert_eq!(ids, vec![id(2), id(3), id(1)]);
}

#[test]
fn test_raycast_without_frame_is_empty() {
    let (interface, script) = running_interface(ArConfig::default());
    script.emit(AnchorEvent::Added {
        id: id(1),
        pose: pose_at(0.0, 0.0, 0.0),
        kind: floor_plane(10.0),
    });
    assert!(interface.raycast(Vec2::splat(0.5)).is_empty());
}

// ============================================================================
// Cross-Thread Ingestion
// ============================================================================

/// The session thread churns anchors while the render thread raycasts and
/// reads tracker poses. Readers must never see a torn pose or an
/// over-capacity registry.
#[test]
fn test_concurrent_ingest_and_raycast() {
    let (mut interface, script) = running_interface(ArConfig::default().with_max_anchors(4));
    script.push_frame(frame(0.0, looking_down(Vec3::new(0.0, 10.0, 0.0))));
    interface.process();

    let done = Arc::new(AtomicBool::new(false));
    let producer = {
        let script = script.clone();
        let done = done.clone();
        thread::spawn(move || {
            for round in 0..500u32 {
                for n in 0..6u128 {
                    // Poses always keep x == z so a torn read is detectable.
                    let v = (round % 7) as f32;
                    script.emit(AnchorEvent::Updated {
                        id: id(n),
                        pose: pose_at(v, 0.0, v),
                        kind: floor_plane(40.0),
                    });
                }
                script.emit(AnchorEvent::Removed {
                    id: id((round % 6) as u128),
                });
            }
            done.store(true, Ordering::Release);
        })
    };

    while !done.load(Ordering::Acquire) {
        let hits = interface.raycast(Vec2::splat(0.5));
        assert!(hits.len() <= 4);
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        for slot in interface.anchor_snapshot() {
            let pose = slot.tracker.pose();
            assert_eq!(pose.translation.x, pose.translation.z);
        }
    }
    producer.join().unwrap();

    interface.stop_session();
    assert!(interface.anchors().is_empty());
}

/// Callbacks keep arriving on the session thread while the host stops the
/// session. Nothing delivered after the stop may survive into the next run.
#[test]
fn test_stop_session_while_callbacks_in_flight() {
    let (mut interface, _script) = running_interface(ArConfig::default().with_max_anchors(8));
    let late = interface.anchors().clone();

    let stopped = Arc::new(AtomicBool::new(false));
    let producer = {
        let late = late.clone();
        let stopped = stopped.clone();
        thread::spawn(move || {
            let mut after_stop = 0;
            for round in 0..5000u128 {
                let seen_stop = stopped.load(Ordering::Acquire);
                late.ingest(AnchorEvent::Added {
                    id: id(round % 8),
                    pose: pose_at(0.0, 0.0, 0.0),
                    kind: AnchorKind::Generic,
                });
                if seen_stop {
                    after_stop += 1;
                    if after_stop >= 200 {
                        break;
                    }
                }
            }
        })
    };

    while late.is_empty() {
        thread::yield_now();
    }
    interface.stop_session();
    stopped.store(true, Ordering::Release);
    producer.join().unwrap();

    assert!(interface.anchors().is_empty());
    assert!(interface.anchor_snapshot().is_empty());

    interface.start_session().unwrap();
    assert!(interface.anchors().is_empty());
    assert_eq!(
        late.ingest(AnchorEvent::Added {
            id: id(1),
            pose: pose_at(0.0, 0.0, 0.0),
            kind: AnchorKind::Generic,
        }),
        IngestOutcome::Created
    );
}
