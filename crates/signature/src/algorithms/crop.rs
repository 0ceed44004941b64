use tracing::debug;

use crate::{error::Result, traits::ImageStage, types::BinaryImage};

/// Crops to the bounding box of the foreground plus a margin
#[derive(Debug, Clone, Copy)]
pub struct Cropper {
    pub margin: usize,
}

impl Default for Cropper {
    fn default() -> Self {
        Self { margin: 2 }
    }
}

impl Cropper {
    /// Returns a copy of `image` when it holds no Black pixel.
    pub fn crop(&self, image: &BinaryImage) -> BinaryImage {
        let Some(bounds) = image.bounding_box() else {
            debug!("Image has no foreground, skipping crop");
            return image.clone();
        };
        let region = bounds.expand(self.margin, image.height(), image.width());
        image.sub_image(region)
    }
}

impl ImageStage for Cropper {
    fn name(&self) -> &'static str {
        "cropped"
    }

    fn apply(&self, image: &BinaryImage) -> Result<BinaryImage> {
        Ok(self.crop(image))
    }
}
