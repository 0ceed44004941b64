use crate::{
    error::{Result, SignatureError},
    traits::ImageStage,
    types::BinaryImage,
};

/// Majority filter over a square window. Pixels closer than the window radius to
/// the border keep their value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    window_size: usize,
    threshold: f32,
}

impl Default for Smoother {
    fn default() -> Self {
        Self {
            window_size: 7,
            threshold: 0.5,
        }
    }
}

impl Smoother {
    /// `window_size` must be odd and at least 3, `threshold` a Black fraction in `0..=1`.
    pub fn new(window_size: usize, threshold: f32) -> Result<Self> {
        if window_size < 3 || window_size % 2 == 0 {
            return Err(SignatureError::InvalidStageSetting {
                stage: "smoothed",
                reason: format!("window size must be odd and at least 3, got {window_size}"),
            });
        }
        if !(0.0..=1.0).contains(&threshold) {
            return Err(SignatureError::InvalidStageSetting {
                stage: "smoothed",
                reason: format!("threshold must lie in 0..=1, got {threshold}"),
            });
        }
        Ok(Self {
            window_size,
            threshold,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn smooth(&self, image: &BinaryImage) -> BinaryImage {
        let radius = self.window_size / 2;
        let (height, width) = (image.height(), image.width());

        // Every window reads from `image`, never from the output being built.
        BinaryImage::from_fn_par(width, height, |p| {
            let interior = p.m >= radius && p.m + radius < height && p.n >= radius && p.n + radius < width;
            if !interior {
                return image.at(p);
            }
            let window = image.neighbor_matrix(p, self.window_size, self.window_size);
            window.average_value() >= self.threshold
        })
    }
}

impl ImageStage for Smoother {
    fn name(&self) -> &'static str {
        "smoothed"
    }

    fn apply(&self, image: &BinaryImage) -> Result<BinaryImage> {
        Ok(self.smooth(image))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removes_isolated_noise_but_keeps_border() {
        let mut image = BinaryImage::new(9, 9);
        image.set(0, 0, true);
        image.set(4, 4, true);

        let smoothed = Smoother::default().smooth(&image);
        assert!(smoothed.get(0, 0), "border pixels are left as they were");
        assert!(!smoothed.get(4, 4), "isolated pixel is removed");
        assert_eq!(smoothed.black_count(), 1);
    }

    #[test]
    fn test_keeps_straight_edges() {
        let rows: Vec<String> = (0..9).map(|_| "#####    ".to_string()).collect();
        let image = BinaryImage::from_ascii_art(&rows).expect("Should parse art");

        let smoothed = Smoother::default().smooth(&image);
        assert_eq!(smoothed, image);
    }

    #[test]
    fn test_windows_read_from_unmodified_input() {
        // A diagonal staircase; updating in place would let earlier rows leak into
        // later windows and change the result.
        let rows = [
            "#########",
            "########.",
            "#######..",
            "######...",
            "#####....",
            "####.....",
            "###......",
            "##.......",
            "#........",
        ]
        .map(|row| row.replace('.', " "));
        let image = BinaryImage::from_ascii_art(&rows).expect("Should parse art");
        let smoothed = Smoother::default().smooth(&image);

        for m in 3..6 {
            for n in 3..6 {
                let window = image.neighbor_matrix(crate::types::MatrixPosition::new(m, n), 7, 7);
                assert_eq!(smoothed.get(m, n), window.average_value() >= 0.5);
            }
        }
    }

    #[test]
    fn test_rejects_bad_settings() {
        for window_size in [0, 1, 2, 6] {
            assert!(matches!(
                Smoother::new(window_size, 0.5),
                Err(SignatureError::InvalidStageSetting { stage: "smoothed", .. })
            ));
        }
        assert!(Smoother::new(7, 1.5).is_err());
        assert!(Smoother::new(7, f32::NAN).is_err());

        let smoother = Smoother::new(3, 0.5).expect("Should accept settings");
        assert_eq!(smoother.window_size(), 3);
        assert_eq!(Smoother::new(7, 0.5).expect("Should accept settings"), Smoother::default());
    }

    #[test]
    fn test_small_images_are_untouched() {
        let image = BinaryImage::from_ascii_art(&["# #", " # "]).expect("Should parse art");
        assert_eq!(Smoother::default().smooth(&image), image);
    }
}
