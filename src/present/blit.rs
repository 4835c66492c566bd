//! Blit descriptions handed to the host renderer at frame submission.

use glam::Vec2;

use super::{LensDistortion, LensProfile};
use crate::math::{Rect2, Rect2i};

/// Opaque host render target handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderTargetId(pub u64);

/// Layer slice selection for layered (multi-view) render targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MultiViewLayer {
    pub use_layer: bool,
    pub layer: u32,
}

/// Declarative instruction to copy (and optionally distort) a render target
/// onto the presentation surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlitToScreen {
    pub render_target: RenderTargetId,
    /// Source rectangle in normalized target coordinates.
    pub src_rect: Rect2,
    /// Destination rectangle in screen pixels.
    pub dst_rect: Rect2i,
    pub multi_view: MultiViewLayer,
    pub lens_distortion: LensDistortion,
}

impl BlitToScreen {
    /// Plain copy of the whole target into `dst_rect`.
    pub fn new(render_target: RenderTargetId, dst_rect: Rect2i) -> Self {
        Self {
            render_target,
            src_rect: Rect2::UNIT,
            dst_rect,
            multi_view: MultiViewLayer::default(),
            lens_distortion: LensDistortion::default(),
        }
    }

    pub fn with_src_rect(mut self, src_rect: Rect2) -> Self {
        self.src_rect = src_rect;
        self
    }

    /// Target one layer of a layered render target.
    pub fn with_layer(mut self, layer: u32) -> Self {
        self.multi_view = MultiViewLayer {
            use_layer: true,
            layer,
        };
        self
    }

    pub fn with_lens_distortion(mut self, lens_distortion: LensDistortion) -> Self {
        self.lens_distortion = lens_distortion;
        self
    }

    pub fn is_distorted(&self) -> bool {
        self.lens_distortion.apply
    }
}

/// Builds the per-frame blit list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PresentationCompositor {
    /// Lens profile for headset displays; `None` means plain copies.
    pub lens: Option<LensProfile>,
    /// Whether stereo views render into separate layers of one target
    /// instead of side-by-side halves.
    pub use_layers: bool,
}

impl PresentationCompositor {
    pub fn new(lens: Option<LensProfile>, use_layers: bool) -> Self {
        Self { lens, use_layers }
    }

    /// Render target size for `view_count` views on a `display_size` display.
    ///
    /// Stereo splits the display horizontally; a lens profile oversamples to
    /// keep detail after distortion.
    pub fn render_target_size(&self, display_size: Vec2, view_count: u32) -> Vec2 {
        let per_view = if view_count > 1 {
            Vec2::new(display_size.x / view_count as f32, display_size.y)
        } else {
            display_size
        };
        match self.lens {
            Some(lens) if view_count > 1 => per_view * lens.oversample,
            _ => per_view,
        }
    }

    /// Blits for one rendered frame.
    ///
    /// Mono copies the whole target onto `screen_rect`. Stereo places each
    /// view on its half of the screen, sourcing either its layer or its half
    /// of the target, with lens distortion when a profile is configured.
    pub fn compose(
        &self,
        render_target: RenderTargetId,
        screen_rect: Rect2,
        view_count: u32,
    ) -> Vec<BlitToScreen> {
        if view_count == 0 {
            return Vec::new();
        }
        if view_count == 1 {
            let blit = BlitToScreen::new(render_target, screen_rect.to_rect2i());
            let blit = if self.use_layers {
                blit.with_layer(0)
            } else {
                blit
            };
            return vec![blit];
        }

        let width = screen_rect.size.x / view_count as f32;
        (0..view_count)
            .map(|view| {
                let dst = Rect2::new(
                    screen_rect.position.x + width * view as f32,
                    screen_rect.position.y,
                    width,
                    screen_rect.size.y,
                );
                let mut blit = BlitToScreen::new(render_target, dst.to_rect2i());
                blit = if self.use_layers {
                    blit.with_layer(view)
                } else {
                    let src_width = 1.0 / view_count as f32;
                    blit.with_src_rect(Rect2::new(src_width * view as f32, 0.0, src_width, 1.0))
                };
                if let Some(lens) = self.lens {
                    blit = blit.with_lens_distortion(lens.distortion_for_view(view, dst.aspect()));
                }
                blit
            })
            .collect()
    }
}
