//! Camera images, reference images and environment maps.

mod environment;
mod planes;
mod reference;

pub use environment::{Cubemap, CubemapFormat, EnvironmentMap, CUBEMAP_FACES};
pub use planes::{CameraImage, ImagePlane, ImagePlaneBuffer, MAX_IMAGE_PLANES};
pub use reference::{ReferenceEntry, ReferenceImage, ReferenceImageSet};
