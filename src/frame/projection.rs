//! Perspective projections built from session camera intrinsics.

use glam::{Mat4, Vec2, Vec4};

use super::ScreenOrientation;

/// Clip-space depth mapping used by the host renderer.
///
/// The projection must match the host's convention, not the session's:
/// getting it wrong silently produces wrong depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepthConvention {
    /// Near plane maps to 0, far plane to 1 (wgpu, Vulkan, Metal, D3D).
    #[default]
    ZeroToOne,
    /// Near plane maps to -1, far plane to 1 (OpenGL).
    NegativeOneToOne,
    /// Near plane maps to 1, far plane to 0.
    ReversedZ,
}

impl DepthConvention {
    /// Normalized device depth of the near plane.
    pub fn near_ndc(&self) -> f32 {
        match self {
            DepthConvention::ZeroToOne => 0.0,
            DepthConvention::NegativeOneToOne => -1.0,
            DepthConvention::ReversedZ => 1.0,
        }
    }

    /// Normalized device depth of the far plane.
    pub fn far_ndc(&self) -> f32 {
        match self {
            DepthConvention::ZeroToOne | DepthConvention::NegativeOneToOne => 1.0,
            DepthConvention::ReversedZ => 0.0,
        }
    }

    /// `(z_scale, z_offset)` such that clip depth = `z_scale * z + z_offset`
    /// for a view-space point at depth `z` (negative in front of the camera).
    fn depth_terms(&self, near: f32, far: f32) -> (f32, f32) {
        match self {
            DepthConvention::ZeroToOne => {
                let r = 1.0 / (near - far);
                (far * r, near * far * r)
            }
            DepthConvention::NegativeOneToOne => {
                let r = 1.0 / (near - far);
                ((far + near) * r, 2.0 * near * far * r)
            }
            DepthConvention::ReversedZ => {
                let r = 1.0 / (far - near);
                (near * r, near * far * r)
            }
        }
    }
}

/// Pinhole intrinsics reported by the session for one view.
///
/// All values are in pixels of the captured image. Image Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewIntrinsics {
    /// Focal length `(fx, fy)`.
    pub focal: Vec2,
    /// Principal point `(cx, cy)`.
    pub principal: Vec2,
    /// Captured image size `(width, height)`.
    pub image_size: Vec2,
}

impl ViewIntrinsics {
    pub fn new(focal: Vec2, principal: Vec2, image_size: Vec2) -> Self {
        Self {
            focal,
            principal,
            image_size,
        }
    }

    /// Centered intrinsics matching a vertical field of view.
    pub fn from_fov(fov_y: f32, image_size: Vec2) -> Self {
        let fy = image_size.y * 0.5 / (fov_y * 0.5).tan();
        Self {
            focal: Vec2::new(fy, fy),
            principal: image_size * 0.5,
            image_size,
        }
    }

    pub fn fov_y(&self) -> f32 {
        2.0 * (self.image_size.y * 0.5 / self.focal.y).atan()
    }

    pub fn aspect(&self) -> f32 {
        self.image_size.x / self.image_size.y
    }

    pub fn is_valid(&self) -> bool {
        self.focal.x > 0.0
            && self.focal.y > 0.0
            && self.image_size.x > 0.0
            && self.image_size.y > 0.0
    }

    /// Intrinsics of the image as seen on a display in `orientation`.
    ///
    /// Sensor images are delivered in landscape-right; other orientations
    /// rotate the image and swap axes accordingly.
    pub fn oriented(&self, orientation: ScreenOrientation) -> Self {
        let Vec2 { x: w, y: h } = self.image_size;
        let Vec2 { x: cx, y: cy } = self.principal;
        match orientation {
            ScreenOrientation::LandscapeRight => *self,
            ScreenOrientation::Portrait => Self {
                focal: Vec2::new(self.focal.y, self.focal.x),
                principal: Vec2::new(h - cy, cx),
                image_size: Vec2::new(h, w),
            },
            ScreenOrientation::LandscapeLeft => Self {
                focal: self.focal,
                principal: Vec2::new(w - cx, h - cy),
                image_size: self.image_size,
            },
            ScreenOrientation::PortraitUpsideDown => Self {
                focal: Vec2::new(self.focal.y, self.focal.x),
                principal: Vec2::new(cy, w - cx),
                image_size: Vec2::new(h, w),
            },
        }
    }

    /// Right-handed perspective projection for these intrinsics.
    ///
    /// The vertical field of view comes from `fy`; the horizontal scale comes
    /// from the caller's `aspect` so the viewport is filled without stretching.
    /// The principal point becomes an off-center frustum shift. Clip planes
    /// are always the caller's: the session does not own the depth range.
    pub fn projection(
        &self,
        aspect: f32,
        near: f32,
        far: f32,
        convention: DepthConvention,
    ) -> Mat4 {
        let y_scale = 2.0 * self.focal.y / self.image_size.y;
        let x_scale = y_scale / aspect;
        let x_shift = 1.0 - 2.0 * self.principal.x / self.image_size.x;
        let y_shift = 2.0 * self.principal.y / self.image_size.y - 1.0;
        let (z_scale, z_offset) = convention.depth_terms(near, far);

        Mat4::from_cols(
            Vec4::new(x_scale, 0.0, 0.0, 0.0),
            Vec4::new(0.0, y_scale, 0.0, 0.0),
            Vec4::new(x_shift, y_shift, z_scale, -1.0),
            Vec4::new(0.0, 0.0, z_offset, 0.0),
        )
    }
}

/// Right-handed perspective projection from a vertical field of view.
pub fn perspective(
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    convention: DepthConvention,
) -> Mat4 {
    let y_scale = 1.0 / (fov_y * 0.5).tan();
    let (z_scale, z_offset) = convention.depth_terms(near, far);
    Mat4::from_cols(
        Vec4::new(y_scale / aspect, 0.0, 0.0, 0.0),
        Vec4::new(0.0, y_scale, 0.0, 0.0),
        Vec4::new(0.0, 0.0, z_scale, -1.0),
        Vec4::new(0.0, 0.0, z_offset, 0.0),
    )
}
