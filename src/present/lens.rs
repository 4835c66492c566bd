//! Radial lens distortion for headset displays.

use glam::Vec2;

use crate::error::{ArError, ArResult};

/// Lens distortion parameters attached to a blit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensDistortion {
    /// Whether the host should distort this blit at all.
    pub apply: bool,
    /// Lens center in the eye's normalized [-1, 1] space.
    pub eye_center: Vec2,
    pub k1: f32,
    pub k2: f32,
    /// Oversampling factor of the render target.
    pub upscale: f32,
    pub aspect_ratio: f32,
}

impl Default for LensDistortion {
    fn default() -> Self {
        Self {
            apply: false,
            eye_center: Vec2::ZERO,
            k1: 0.0,
            k2: 0.0,
            upscale: 1.0,
            aspect_ratio: 1.0,
        }
    }
}

impl LensDistortion {
    /// Evaluate the radial model `p * (1 + k1 r^2 + k2 r^4)` around the eye
    /// center, for a point in the eye's normalized [-1, 1] space.
    ///
    /// Returns `point` unchanged when distortion is not applied.
    pub fn distort(&self, point: Vec2) -> Vec2 {
        if !self.apply {
            return point;
        }
        let mut offset = point - self.eye_center;
        offset.y /= self.aspect_ratio;
        let r2 = offset.length_squared();
        let factor = 1.0 + self.k1 * r2 + self.k2 * r2 * r2;
        let mut distorted = offset * factor / self.upscale;
        distorted.y *= self.aspect_ratio;
        distorted + self.eye_center
    }
}

/// Physical description of a headset's lenses and display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensProfile {
    pub k1: f32,
    pub k2: f32,
    /// Render target oversampling to compensate for barrel distortion.
    pub oversample: f32,
    /// Width of the physical display in meters.
    pub display_width: f32,
    /// Distance from the display to the lenses in meters.
    pub display_to_lens: f32,
    /// Distance between the lens centers in meters.
    pub interocular_distance: f32,
}

impl Default for LensProfile {
    fn default() -> Self {
        Self {
            k1: 0.215,
            k2: 0.215,
            oversample: 1.5,
            display_width: 14.5e-2,
            display_to_lens: 4.0e-2,
            interocular_distance: 6.0e-2,
        }
    }
}

impl LensProfile {
    /// Check that the profile describes a real display.
    pub fn validate(&self) -> ArResult<()> {
        if !(self.display_width.is_finite() && self.display_width > 0.0) {
            return Err(ArError::InvalidParameter(format!(
                "lens display width must be positive, got {}",
                self.display_width
            )));
        }
        if !(self.oversample.is_finite() && self.oversample > 0.0) {
            return Err(ArError::InvalidParameter(format!(
                "lens oversample must be positive, got {}",
                self.oversample
            )));
        }
        Ok(())
    }

    /// Horizontal lens center for `view` (0 = left, 1 = right) in the eye's
    /// normalized [-1, 1] space.
    ///
    /// Each eye covers half the display; the lens sits half the interocular
    /// distance from the display center. A profile without a positive display
    /// width centers the lens.
    pub fn eye_center(&self, view: u32) -> Vec2 {
        let half_display = self.display_width * 0.5;
        if !(half_display.is_finite() && half_display > 0.0) {
            return Vec2::ZERO;
        }
        let x = (half_display * 0.5 - self.interocular_distance * 0.5) / (half_display * 0.5);
        if view == 0 {
            Vec2::new(x, 0.0)
        } else {
            Vec2::new(-x, 0.0)
        }
    }

    /// Distortion parameters for `view` at the given per-eye aspect ratio.
    pub fn distortion_for_view(&self, view: u32, aspect_ratio: f32) -> LensDistortion {
        LensDistortion {
            apply: true,
            eye_center: self.eye_center(view),
            k1: self.k1,
            k2: self.k2,
            upscale: self.oversample,
            aspect_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distort_disabled_is_identity() {
        let lens = LensDistortion {
            k1: 0.5,
            ..Default::default()
        };
        let p = Vec2::new(0.3, -0.7);
        assert_eq!(lens.distort(p), p);
    }

    #[test]
    fn test_distort_center_is_fixed_and_edges_push_out() {
        let lens = LensDistortion {
            apply: true,
            k1: 0.2,
            k2: 0.1,
            ..Default::default()
        };
        assert_eq!(lens.distort(Vec2::ZERO), Vec2::ZERO);

        let edge = lens.distort(Vec2::new(1.0, 0.0));
        assert!((edge.x - 1.3).abs() < 1e-6);
        assert_eq!(edge.y, 0.0);
    }

    #[test]
    fn test_eye_centers_are_mirrored() {
        let profile = LensProfile {
            display_width: 0.12,
            interocular_distance: 0.06,
            ..Default::default()
        };
        // Lenses sit exactly at the center of each half: no offset.
        assert!(profile.eye_center(0).abs_diff_eq(Vec2::ZERO, 1e-6));

        let wide = LensProfile::default();
        assert_eq!(wide.eye_center(0).x, -wide.eye_center(1).x);
        assert!(wide.eye_center(0).x > 0.0);
    }

    #[test]
    fn test_degenerate_profile_is_rejected() {
        let flat = LensProfile {
            display_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(flat.validate(), Err(ArError::InvalidParameter(_))));
        assert_eq!(flat.eye_center(0), Vec2::ZERO);
        assert!(LensProfile::default().validate().is_ok());
    }
}
