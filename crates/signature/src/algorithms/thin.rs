use std::convert::Infallible;

use tracing::{debug, trace};

use crate::{
    error::Result,
    traits::{ImageStage, StageObserver},
    types::{BinaryImage, SelCell, StructuringElement, WHITE},
};

use SelCell::{Black as K, Ignore as X, White as O};

pub const B1: [[SelCell; 3]; 3] = [[O, O, O], [X, K, X], [K, K, K]];
pub const B2: [[SelCell; 3]; 3] = [[X, O, O], [K, K, O], [K, K, X]];
pub const B3: [[SelCell; 3]; 3] = [[K, X, O], [K, K, O], [K, X, O]];
pub const B4: [[SelCell; 3]; 3] = [[K, K, X], [K, K, O], [X, O, O]];
pub const B5: [[SelCell; 3]; 3] = [[K, K, K], [X, K, X], [O, O, O]];
pub const B6: [[SelCell; 3]; 3] = [[X, K, K], [O, K, K], [O, O, X]];
pub const B7: [[SelCell; 3]; 3] = [[O, X, K], [O, K, K], [O, X, K]];
pub const B8: [[SelCell; 3]; 3] = [[O, O, X], [O, K, K], [X, K, K]];

/// The eight border-removal elements in the order a thinning pass applies them.
pub fn thinning_elements() -> Vec<StructuringElement> {
    [B1, B2, B3, B4, B5, B6, B7, B8]
        .into_iter()
        .map(StructuringElement::from_grid)
        .collect()
}

/// Result of running thinning passes until the image stops changing.
#[derive(Debug, Clone, PartialEq)]
pub struct ThinningOutcome {
    pub image: BinaryImage,
    /// Full passes executed, including the one that confirmed the fixed point
    pub passes: usize,
    /// False when the iteration cap stopped the loop first
    pub converged: bool,
}

/// Sequential hit-and-miss thinning
#[derive(Debug, Clone)]
pub struct Thinner {
    pub elements: Vec<StructuringElement>,
    pub max_iterations: usize,
}

impl Default for Thinner {
    fn default() -> Self {
        Self {
            elements: thinning_elements(),
            max_iterations: 35,
        }
    }
}

impl Thinner {
    pub fn with_max_iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..Self::default()
        }
    }

    /// Turn every pixel whose neighborhood matches `element` White.
    pub fn hit_and_miss(image: &BinaryImage, element: &StructuringElement) -> BinaryImage {
        BinaryImage::from_fn_par(image.width(), image.height(), |p| {
            let neighbors = image.neighbor_matrix(p, element.height(), element.width());
            if element.matches(&neighbors) { WHITE } else { image.at(p) }
        })
    }

    /// Apply `elements` in order, each one to the output of the previous.
    pub fn thin_with(image: &BinaryImage, elements: &[StructuringElement]) -> BinaryImage {
        elements
            .iter()
            .fold(image.clone(), |current, element| Self::hit_and_miss(&current, element))
    }

    /// One full pass over the configured elements.
    pub fn thin_pass(&self, image: &BinaryImage) -> BinaryImage {
        Self::thin_with(image, &self.elements)
    }

    /// Exactly `iterations` full passes.
    pub fn thin_iterations(&self, image: &BinaryImage, iterations: usize) -> BinaryImage {
        (0..iterations).fold(image.clone(), |current, _| self.thin_pass(&current))
    }

    /// Repeat full passes until one leaves the image unchanged or the cap is reached.
    pub fn thin_to_convergence(&self, image: &BinaryImage) -> ThinningOutcome {
        let Ok(outcome) = self.converge::<Infallible, _>(image, |_, _| Ok(()));
        outcome
    }

    fn converge<E, F>(&self, image: &BinaryImage, mut on_pass: F) -> std::result::Result<ThinningOutcome, E>
    where
        F: FnMut(usize, &BinaryImage) -> std::result::Result<(), E>,
    {
        let mut current = image.clone();
        for pass in 0..self.max_iterations {
            let next = self.thin_pass(&current);
            on_pass(pass, &next)?;
            trace!(pass, black_pixels = next.black_count(), "thinning pass");

            if next == current {
                debug!(passes = pass + 1, "thinning converged");
                return Ok(ThinningOutcome {
                    image: next,
                    passes: pass + 1,
                    converged: true,
                });
            }
            current = next;
        }

        debug!(max_iterations = self.max_iterations, "thinning stopped at iteration cap");
        Ok(ThinningOutcome {
            image: current,
            passes: self.max_iterations,
            converged: false,
        })
    }
}

impl ImageStage for Thinner {
    fn name(&self) -> &'static str {
        "thinned"
    }

    fn apply(&self, image: &BinaryImage) -> Result<BinaryImage> {
        Ok(self.thin_to_convergence(image).image)
    }

    /// Reports every pass as `thinned_itrNN`.
    fn apply_observed(&self, image: &BinaryImage, observer: &mut dyn StageObserver) -> Result<BinaryImage> {
        let outcome = self.converge(image, |pass, output| {
            observer.observe(&format!("thinned_itr{pass:02}"), output)
        })?;
        Ok(outcome.image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::StageRecorder;

    fn art(rows: &[&str]) -> BinaryImage {
        BinaryImage::from_ascii_art(rows).expect("Should parse art")
    }

    fn sample() -> BinaryImage {
        art(&[
            "###########",
            "#########  ",
            "#########  ",
            "#########  ",
            "###  ####  ",
        ])
    }

    #[test]
    fn test_single_element_removes_matching_pixels() {
        let element = StructuringElement::from_values(&[[0i8, 0, -1], [1, 1, -1], [-1, -1, -1]])
            .expect("Should build element");
        let image = BinaryImage::from_matrix_string("000\r\n111\r\n111").expect("Should parse image");

        let result = Thinner::thin_with(&image, &[element]);
        assert_eq!(result.to_matrix_string(), "000\r\n100\r\n111");
    }

    #[test]
    fn test_elements_are_chained() {
        let elements = thinning_elements();
        let after_b1 = Thinner::thin_with(&sample(), &elements[..1]);
        assert_eq!(
            after_b1,
            art(&[
                "#       ###",
                "#########  ",
                "#########  ",
                "#########  ",
                "###  ####  ",
            ])
        );

        let after_b4 = Thinner::thin_with(&sample(), &elements[..4]);
        assert_eq!(
            after_b4,
            art(&[
                "#       ###",
                "#########  ",
                "########   ",
                "########   ",
                "##   ####  ",
            ])
        );

        let after_b7 = Thinner::thin_with(&sample(), &elements[..7]);
        assert_eq!(
            after_b7,
            art(&[
                "#       ###",
                "#########  ",
                " #######   ",
                "###  ###   ",
                "#      ##  ",
            ])
        );
    }

    #[test]
    fn test_two_iterations() {
        let result = Thinner::default().thin_iterations(&sample(), 2);
        assert_eq!(
            result,
            art(&[
                "#       ###",
                "##     ##  ",
                " #######   ",
                "##     #   ",
                "#      ##  ",
            ])
        );
    }

    #[test]
    fn test_converges_to_fixed_point() {
        let thinner = Thinner::default();
        let outcome = thinner.thin_to_convergence(&sample());

        assert!(outcome.converged);
        assert_eq!(outcome.passes, 3);
        assert_eq!(outcome.image, thinner.thin_iterations(&sample(), 2));
        assert_eq!(thinner.thin_pass(&outcome.image), outcome.image);
    }

    #[test]
    fn test_iteration_cap_stops_the_loop() {
        let outcome = Thinner::with_max_iterations(1).thin_to_convergence(&sample());
        assert!(!outcome.converged);
        assert_eq!(outcome.passes, 1);
    }

    #[test]
    fn test_never_creates_black_pixels() {
        let image = sample();
        let thinned = Thinner::default().thin_to_convergence(&image).image;
        for m in 0..image.height() {
            for n in 0..image.width() {
                assert!(!thinned.get(m, n) || image.get(m, n));
            }
        }
    }

    #[test]
    fn test_observed_run_reports_each_pass() {
        let mut recorder = StageRecorder::default();
        let thinned = Thinner::default()
            .apply_observed(&sample(), &mut recorder)
            .expect("Should thin image");

        assert_eq!(recorder.names(), vec!["thinned_itr00", "thinned_itr01", "thinned_itr02"]);
        assert_eq!(recorder.last(), Some(&thinned));
    }
}
