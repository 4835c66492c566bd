//! Post-render compositing: blit descriptions with optional lens distortion
//! and multi-view layer selection.

mod blit;
mod lens;

pub use blit::{BlitToScreen, MultiViewLayer, PresentationCompositor, RenderTargetId};
pub use lens::{LensDistortion, LensProfile};
