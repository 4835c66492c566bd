//! Shared helpers for the integration tests.

#![allow(dead_code)]

use glam::{Vec2, Vec3};

use redlilium_ar::anchor::PlaneAlignment;
use redlilium_ar::frame::ViewIntrinsics;
use redlilium_ar::image::ImagePlane;
use redlilium_ar::session::SessionTrackingState;
use redlilium_ar::{
    AnchorId, AnchorKind, ArConfig, ArInterface, CameraFrame, Pose, ReferenceImage,
    ScriptedSession,
};

/// Install a test logger once. Safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn id(n: u128) -> AnchorId {
    AnchorId::from_u128(n)
}

pub fn pose_at(x: f32, y: f32, z: f32) -> Pose {
    Pose::from_translation(Vec3::new(x, y, z))
}

/// A horizontal plane of `size` x `size` meters centered on its anchor.
pub fn floor_plane(size: f32) -> AnchorKind {
    AnchorKind::Plane {
        alignment: PlaneAlignment::Horizontal,
        center: Vec3::ZERO,
        extent: Vec2::splat(size),
    }
}

/// Camera at `position` looking straight down (-Y).
pub fn looking_down(position: Vec3) -> Pose {
    Pose::looking_at(position, position + Vec3::NEG_Y, Vec3::NEG_Z)
}

/// A tracked 1920x1080 frame with a 60 degree vertical field of view.
pub fn frame(timestamp: f64, camera_pose: Pose) -> CameraFrame {
    CameraFrame {
        timestamp,
        camera_pose,
        tracking_state: SessionTrackingState::Normal,
        intrinsics: [
            Some(ViewIntrinsics::from_fov(
                60f32.to_radians(),
                Vec2::new(1920.0, 1080.0),
            )),
            None,
        ],
        eye_height: 1.5,
        display_size: Some(Vec2::new(1920.0, 1080.0)),
        ..Default::default()
    }
}

/// Two planes whose bytes all equal `generation`, so readers can tell which
/// frame a plane came from.
pub fn planes(generation: u8) -> Vec<ImagePlane> {
    vec![
        ImagePlane::new(8, 4, 1, vec![generation; 32]),
        ImagePlane::new(4, 2, 2, vec![generation; 16]),
    ]
}

pub fn reference_image(name: &str) -> ReferenceImage {
    ReferenceImage::new(name, 4, 2, vec![255u8; 4 * 2 * 4])
}

/// An initialized interface over a scripted session, plus a handle to drive
/// the session.
pub fn running_interface(config: ArConfig) -> (ArInterface, ScriptedSession) {
    init_logging();
    let script = ScriptedSession::new();
    let mut interface = ArInterface::new(script.clone(), config);
    interface
        .initialize()
        .expect("scripted session should initialize");
    (interface, script)
}
