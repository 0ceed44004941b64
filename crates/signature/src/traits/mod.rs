use image::{Rgb, RgbImage};

use crate::{
    error::Result,
    types::{BinaryImage, MatrixPosition},
};

/// Trait for pixel thresholding policies
pub trait Binarizer: Send + Sync {
    /// Short policy name used in logs and pipeline descriptions
    fn name(&self) -> &'static str;

    /// Decide whether a color is foreground (Black)
    fn is_black(&self, color: Rgb<u8>) -> bool;

    /// Threshold a whole raster, one row per rayon task
    fn binarize(&self, image: &RgbImage) -> BinaryImage {
        BinaryImage::from_fn_par(image.width() as usize, image.height() as usize, |p: MatrixPosition| {
            self.is_black(*image.get_pixel(p.n as u32, p.m as u32))
        })
    }
}

/// Trait for binary image transforms that make up the recognition pipeline
pub trait ImageStage: Send + Sync {
    /// Name of the stage output, also used as the debug image file stem
    fn name(&self) -> &'static str;

    /// Transform the image; the input is never modified
    fn apply(&self, image: &BinaryImage) -> Result<BinaryImage>;

    /// Transform the image and report the output to `observer`
    fn apply_observed(&self, image: &BinaryImage, observer: &mut dyn StageObserver) -> Result<BinaryImage> {
        let output = self.apply(image)?;
        observer.observe(self.name(), &output)?;
        Ok(output)
    }
}

/// Receives every intermediate image produced by a pipeline run
pub trait StageObserver {
    fn observe(&mut self, stage: &str, image: &BinaryImage) -> Result<()>;
}
