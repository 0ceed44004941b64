use crate::{
    error::{Result, SignatureError},
    traits::ImageStage,
    types::{BinaryImage, MatrixPosition},
};

/// Halves both dimensions with a 2x2 majority vote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shrinker {
    threshold: f32,
}

impl Default for Shrinker {
    fn default() -> Self {
        Self { threshold: 0.75 }
    }
}

impl Shrinker {
    /// `threshold` is the minimum Black fraction of the 2x2 window for a Black
    /// output pixel, in `0..=1`.
    pub fn new(threshold: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SignatureError::InvalidStageSetting {
                stage: "downSized",
                reason: format!("threshold must lie in 0..=1, got {threshold}"),
            });
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn shrink(&self, image: &BinaryImage) -> BinaryImage {
        BinaryImage::from_fn_par(image.width() / 2, image.height() / 2, |p| {
            let window = image.neighbor_matrix(MatrixPosition::new(2 * p.m, 2 * p.n), 2, 2);
            window.average_value() >= self.threshold
        })
    }
}

impl ImageStage for Shrinker {
    fn name(&self) -> &'static str {
        "downSized"
    }

    fn apply(&self, image: &BinaryImage) -> Result<BinaryImage> {
        Ok(self.shrink(image))
    }
}
