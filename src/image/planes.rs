//! Double-buffered camera image planes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::error::{ArError, ArResult};

/// Maximum number of planes in a camera image (luma + interleaved chroma).
pub const MAX_IMAGE_PLANES: usize = 2;

/// One plane of a camera image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePlane {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel of this plane (1 for luma, 2 for interleaved CbCr).
    pub bytes_per_pixel: u32,
    pub data: Arc<[u8]>,
}

impl ImagePlane {
    pub fn new(
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        data: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            width,
            height,
            bytes_per_pixel,
            data: data.into(),
        }
    }

    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.bytes_per_pixel as usize
    }
}

/// Planes of one camera frame. Published as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CameraImage {
    /// Monotonic refresh counter; 0 means no frame has been published.
    pub generation: u64,
    pub timestamp: f64,
    pub planes: Vec<ImagePlane>,
}

impl CameraImage {
    pub fn plane(&self, index: usize) -> Option<&ImagePlane> {
        self.planes.get(index)
    }

    pub fn plane_count(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

/// Lock-free double buffer for camera planes.
///
/// The writer builds a complete [`CameraImage`] and swaps it in; readers load
/// the current `Arc` and keep whichever frame they got. A reader therefore
/// sees either the old pair or the new pair, never one plane from each, and
/// never blocks on the writer.
#[derive(Debug)]
pub struct ImagePlaneBuffer {
    current: ArcSwap<CameraImage>,
    generation: AtomicU64,
}

impl ImagePlaneBuffer {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(CameraImage::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Replace the stored planes with a new frame.
    ///
    /// Accepts one (packed) or two (planar) planes whose data covers their
    /// declared size. Invalid frames are rejected and the previous frame stays
    /// visible. Returns the new generation.
    pub fn refresh(&self, planes: Vec<ImagePlane>, timestamp: f64) -> ArResult<u64> {
        if planes.is_empty() || planes.len() > MAX_IMAGE_PLANES {
            return Err(ArError::InvalidParameter(format!(
                "camera image must have 1 or {MAX_IMAGE_PLANES} planes, got {}",
                planes.len()
            )));
        }
        if let Some((index, plane)) = planes
            .iter()
            .enumerate()
            .find(|(_, plane)| plane.data.len() < plane.expected_len())
        {
            return Err(ArError::InvalidParameter(format!(
                "plane {index} holds {} bytes, expected {}",
                plane.data.len(),
                plane.expected_len()
            )));
        }

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.current.store(Arc::new(CameraImage {
            generation,
            timestamp,
            planes,
        }));
        Ok(generation)
    }

    /// The latest complete frame.
    pub fn current(&self) -> Arc<CameraImage> {
        self.current.load_full()
    }

    /// Data of plane `index` from the latest frame.
    ///
    /// Two separate calls may observe different frames; use
    /// [`current`](Self::current) when both planes are needed together.
    pub fn plane(&self, index: usize) -> Option<Arc<[u8]>> {
        self.current
            .load()
            .plane(index)
            .map(|plane| plane.data.clone())
    }

    pub fn generation(&self) -> u64 {
        self.current.load().generation
    }

    /// Drop the stored planes (session stopped).
    pub fn clear(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.current.store(Arc::new(CameraImage {
            generation,
            ..Default::default()
        }));
    }
}

impl Default for ImagePlaneBuffer {
    fn default() -> Self {
        Self::new()
    }
}
