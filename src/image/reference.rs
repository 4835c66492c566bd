//! Reference images used to seed image detection.

use std::sync::Arc;

use glam::Vec2;

use crate::error::{ArError, ArResult};

/// A caller-supplied image the session should detect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixels, row-major.
    pub pixels: Arc<[u8]>,
}

impl ReferenceImage {
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        pixels: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixels: pixels.into(),
        }
    }
}

/// One entry of a [`ReferenceImageSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub image: ReferenceImage,
    /// Printed width of the image in meters.
    pub physical_width: f32,
}

impl ReferenceEntry {
    /// Physical width and height in meters, keeping the image aspect ratio.
    pub fn physical_size(&self) -> Vec2 {
        let aspect = if self.image.width == 0 {
            1.0
        } else {
            self.image.height as f32 / self.image.width as f32
        };
        Vec2::new(self.physical_width, self.physical_width * aspect)
    }
}

/// Ordered set of reference images.
///
/// The position of an entry is the index detected image anchors report, so
/// the caller's order is preserved exactly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReferenceImageSet {
    entries: Vec<ReferenceEntry>,
}

impl ReferenceImageSet {
    /// Pair `images` with `physical_widths` by position.
    ///
    /// Fails with [`ArError::ArgumentMismatch`] if the lengths differ and with
    /// [`ArError::InvalidParameter`] for non-positive widths.
    pub fn new(images: Vec<ReferenceImage>, physical_widths: Vec<f32>) -> ArResult<Self> {
        if images.len() != physical_widths.len() {
            return Err(ArError::ArgumentMismatch {
                images: images.len(),
                widths: physical_widths.len(),
            });
        }
        if let Some((index, width)) = physical_widths
            .iter()
            .enumerate()
            .find(|(_, width)| !(**width > 0.0 && width.is_finite()))
        {
            return Err(ArError::InvalidParameter(format!(
                "physical width of reference image {index} must be positive, got {width}"
            )));
        }

        Ok(Self {
            entries: images
                .into_iter()
                .zip(physical_widths)
                .map(|(image, physical_width)| ReferenceEntry {
                    image,
                    physical_width,
                })
                .collect(),
        })
    }

    pub fn get(&self, index: usize) -> Option<&ReferenceEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, width: u32, height: u32) -> ReferenceImage {
        ReferenceImage::new(name, width, height, vec![0u8; (width * height * 4) as usize])
    }

    #[test]
    fn test_order_is_preserved() {
        let set = ReferenceImageSet::new(
            vec![image("poster", 4, 2), image("logo", 2, 2)],
            vec![0.1, 0.2],
        )
        .unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(0).unwrap().image.name, "poster");
        assert_eq!(set.get(1).unwrap().physical_width, 0.2);
        assert_eq!(set.get(0).unwrap().physical_size(), Vec2::new(0.1, 0.05));
    }

    #[test]
    fn test_length_mismatch() {
        let err = ReferenceImageSet::new(vec![image("a", 1, 1)], vec![0.1, 0.2]).unwrap_err();
        assert_eq!(
            err,
            ArError::ArgumentMismatch {
                images: 1,
                widths: 2
            }
        );
    }

    #[test]
    fn test_rejects_non_positive_width() {
        let result = ReferenceImageSet::new(vec![image("a", 1, 1)], vec![0.0]);
        assert!(matches!(result, Err(ArError::InvalidParameter(_))));
    }

    #[test]
    fn test_empty_set_is_valid() {
        let set = ReferenceImageSet::new(Vec::new(), Vec::new()).unwrap();
        assert!(set.is_empty());
    }
}
