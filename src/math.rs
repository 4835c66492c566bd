//! Rigid transforms and rectangles shared by the bridge.

use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

/// A rigid transform (rotation followed by translation).
///
/// Anchor and camera poses reported by the session never carry scale, so a
/// pose is kept as a quaternion and a translation instead of a full matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub rotation: Quat,
    pub translation: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Pose {
    pub const IDENTITY: Self = Self {
        rotation: Quat::IDENTITY,
        translation: Vec3::ZERO,
    };

    pub fn new(rotation: Quat, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation,
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            translation: Vec3::ZERO,
        }
    }

    /// Build a pose from an affine matrix, discarding any scale.
    pub fn from_matrix(matrix: Mat4) -> Self {
        let (_scale, rotation, translation) = matrix.to_scale_rotation_translation();
        Self {
            rotation: rotation.normalize(),
            translation,
        }
    }

    /// Build a pose looking from `eye` toward `target` (local -Z forward).
    pub fn looking_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        Self {
            rotation: Quat::from_mat3(&Mat3::from_cols(right, up, -forward)),
            translation: eye,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }

    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            rotation,
            translation: rotation * -self.translation,
        }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * point + self.translation
    }

    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * vector
    }

    /// Local +X in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local +Y in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local -Z in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Scale the translation, leaving rotation untouched.
    pub fn scaled(&self, world_scale: f32) -> Self {
        Self {
            rotation: self.rotation,
            translation: self.translation * world_scale,
        }
    }

    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.translation.abs_diff_eq(other.translation, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl std::ops::Mul for Pose {
    type Output = Pose;

    fn mul(self, rhs: Pose) -> Pose {
        Pose {
            rotation: (self.rotation * rhs.rotation).normalize(),
            translation: self.rotation * rhs.translation + self.translation,
        }
    }
}

/// Floating point rectangle (position + size).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect2 {
    pub position: Vec2,
    pub size: Vec2,
}

impl Rect2 {
    /// The full normalized rectangle `(0, 0, 1, 1)`.
    pub const UNIT: Self = Self {
        position: Vec2::ZERO,
        size: Vec2::ONE,
    };

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn end(&self) -> Vec2 {
        self.position + self.size
    }

    pub fn aspect(&self) -> f32 {
        if self.size.y == 0.0 {
            1.0
        } else {
            self.size.x / self.size.y
        }
    }

    pub fn to_rect2i(&self) -> Rect2i {
        Rect2i::new(
            self.position.x.round() as i32,
            self.position.y.round() as i32,
            self.size.x.round() as i32,
            self.size.y.round() as i32,
        )
    }
}

impl Default for Rect2 {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect2i {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect2i {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pose_inverse_roundtrip() {
        let pose = Pose::new(
            Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.3),
            Vec3::new(1.0, 2.0, -3.0),
        );
        let identity = pose * pose.inverse();
        assert!(identity.abs_diff_eq(&Pose::IDENTITY, 1e-5));
    }

    #[test]
    fn test_pose_matches_matrix_composition() {
        let a = Pose::new(Quat::from_rotation_z(0.4), Vec3::new(0.5, 0.0, 1.0));
        let b = Pose::new(Quat::from_rotation_x(1.1), Vec3::new(-2.0, 3.0, 0.0));
        let composed = (a * b).matrix();
        let expected = a.matrix() * b.matrix();
        assert!(composed.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_pose_from_matrix_drops_scale() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::splat(2.0),
            Quat::from_rotation_y(0.5),
            Vec3::new(1.0, 0.0, 0.0),
        );
        let pose = Pose::from_matrix(matrix);
        assert!(pose
            .rotation
            .abs_diff_eq(Quat::from_rotation_y(0.5), 1e-5));
        assert!(pose.translation.abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_looking_at_forward() {
        let pose = Pose::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        assert!(pose.forward().abs_diff_eq(-Vec3::Z, 1e-5));
        assert!(pose.right().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_rect_to_pixels() {
        let rect = Rect2::new(0.4, 10.6, 640.2, 479.7);
        assert_eq!(rect.to_rect2i(), Rect2i::new(0, 11, 640, 480));
        assert_eq!(Rect2::new(0.0, 0.0, 4.0, 0.0).aspect(), 1.0);
    }
}
