//! Environment cubemaps produced by light estimation.

use std::sync::Arc;

use crate::error::{ArError, ArResult};

/// Pixel format of cubemap faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CubemapFormat {
    #[default]
    Rgba8Unorm,
    Rgba16Float,
}

impl CubemapFormat {
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            CubemapFormat::Rgba8Unorm => 4,
            CubemapFormat::Rgba16Float => 8,
        }
    }
}

/// Cubemap face order: +X, -X, +Y, -Y, +Z, -Z.
pub const CUBEMAP_FACES: usize = 6;

/// Read-only environment cubemap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cubemap {
    size: u32,
    format: CubemapFormat,
    faces: [Arc<[u8]>; CUBEMAP_FACES],
}

impl Cubemap {
    /// Build a cubemap from six square faces of `size` x `size` pixels.
    pub fn new(
        size: u32,
        format: CubemapFormat,
        faces: [Arc<[u8]>; CUBEMAP_FACES],
    ) -> ArResult<Self> {
        if size == 0 {
            return Err(ArError::InvalidParameter(
                "cubemap size cannot be zero".to_string(),
            ));
        }
        let expected = size as usize * size as usize * format.bytes_per_pixel() as usize;
        if let Some(index) = faces.iter().position(|face| face.len() != expected) {
            return Err(ArError::InvalidParameter(format!(
                "cubemap face {index} holds {} bytes, expected {expected}",
                faces[index].len()
            )));
        }
        Ok(Self { size, format, faces })
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn format(&self) -> CubemapFormat {
        self.format
    }

    pub fn face(&self, index: usize) -> Option<&[u8]> {
        self.faces.get(index).map(|face| &face[..])
    }
}

/// Shared environment map handle. Consumers only read it.
pub type EnvironmentMap = Arc<Cubemap>;
