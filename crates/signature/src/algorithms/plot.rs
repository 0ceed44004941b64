use crate::types::{BinaryImage, ShapeSignature};

/// Rows left below the largest radius of a plotted signature
pub const PLOT_MARGIN: usize = 3;

/// Renders a signature as an image: column = sampling line, row = radius.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignaturePlotter;

impl SignaturePlotter {
    pub fn plot(signature: &ShapeSignature) -> BinaryImage {
        let max_radius = signature.max_radius().unwrap_or(0) as usize;
        let mut image = BinaryImage::new(signature.sampling_rate(), max_radius + PLOT_MARGIN);
        for (index, line) in signature.lines().iter().enumerate() {
            for radius in line {
                image.set(*radius as usize, index, true);
            }
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_dimensions_and_pixels() {
        let signature = ShapeSignature::new(vec![vec![3], vec![4], vec![3], vec![4]]).expect("Should accept 4 lines");
        let image = SignaturePlotter::plot(&signature);

        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 7);
        assert_eq!(
            image,
            BinaryImage::from_ascii_art(&["    ", "    ", "    ", "# # ", " # #", "    ", "    "])
                .expect("Should parse art")
        );
    }

    #[test]
    fn test_empty_signature_plots_blank_strip() {
        let image = SignaturePlotter::plot(
            &ShapeSignature::new(vec![Vec::new(); 6]).expect("Should accept 6 lines"),
        );
        assert_eq!(image.width(), 6);
        assert_eq!(image.height(), PLOT_MARGIN);
        assert!(image.is_blank());
    }
}
