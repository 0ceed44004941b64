use std::path::Path;
use std::sync::Arc;

use image::DynamicImage;
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::{
    algorithms::SignatureMatcher,
    error::Result,
    io::{Digit, TemplateSet, load_image},
    pipeline::{NoopObserver, Pipeline, builder::PipelineBuilder},
    traits::StageObserver,
    types::{BinaryImage, ShapeSignature},
};

/// Label shown when no template matches
pub const UNKNOWN_LABEL: &str = "?";

/// Outcome of identifying one image
#[derive(Debug, Clone, Serialize)]
pub struct Recognition {
    /// Digits whose template the signature fits, ascending
    pub matches: Vec<Digit>,
    /// Matches joined with ", ", or "?" when there are none
    pub label: String,
    pub signature: ShapeSignature,
    #[serde(skip)]
    pub signature_image: BinaryImage,
}

impl Recognition {
    pub fn is_recognized(&self) -> bool {
        !self.matches.is_empty()
    }
}

pub fn format_label(matches: &[Digit]) -> String {
    if matches.is_empty() {
        return UNKNOWN_LABEL.to_string();
    }
    matches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Computes signatures and compares them against the digit templates
#[derive(Clone)]
pub struct DigitRecognizer {
    pipeline: Arc<Pipeline>,
    templates: Arc<TemplateSet>,
}

impl DigitRecognizer {
    pub fn new(pipeline: Pipeline, templates: TemplateSet) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            templates: Arc::new(templates),
        }
    }

    /// Standard pipeline with templates loaded from `dir`, binarized with the
    /// pipeline's own policy
    pub fn from_templates_dir<P: AsRef<Path>>(dir: P, sampling_rate: u32) -> Result<Self> {
        let pipeline = PipelineBuilder::build_standard(sampling_rate)?;
        let templates = TemplateSet::load_dir(dir, pipeline.binarizer())?;
        Ok(Self::new(pipeline, templates))
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Load an image file and identify it
    pub fn identify_file<P: AsRef<Path>>(&self, path: P) -> Result<Recognition> {
        let raw = load_image(path)?;
        self.identify(&raw)
    }

    pub fn identify(&self, raw: &DynamicImage) -> Result<Recognition> {
        self.identify_observed(raw, &mut NoopObserver)
    }

    /// Identify an image, reporting every intermediate image to `observer`
    pub fn identify_observed(&self, raw: &DynamicImage, observer: &mut dyn StageObserver) -> Result<Recognition> {
        let processed = self.pipeline.process_observed(raw, observer)?;
        let matches = self.match_signature(&processed.image);
        let label = format_label(&matches);
        info!(label = %label, sampling_rate = self.pipeline.sampling_rate(), "identified image");

        Ok(Recognition {
            matches,
            label,
            signature: processed.signature,
            signature_image: processed.image,
        })
    }

    /// Digits whose template the plotted signature fits, checked in parallel
    pub fn match_signature(&self, signature_image: &BinaryImage) -> Vec<Digit> {
        self.templates
            .entries()
            .par_iter()
            .filter(|(_, template)| SignatureMatcher::is_match(signature_image, template))
            .map(|(digit, _)| *digit)
            .collect()
    }

    /// Identify independent images concurrently, one result per input
    pub fn identify_many(&self, images: &[DynamicImage]) -> Vec<Result<Recognition>> {
        images.par_iter().map(|raw| self.identify(raw)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::SignatureReader;
    use image::{Rgb, RgbImage};
    use strum::IntoEnumIterator;

    fn bar_raster() -> DynamicImage {
        let mut raster = RgbImage::from_pixel(60, 80, Rgb([255, 255, 255]));
        for y in 10..70 {
            for x in 26..34 {
                raster.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        DynamicImage::ImageRgb8(raster)
    }

    /// Template that forbids everything except the columns listed
    fn template_allowing(columns: &[usize], width: usize, height: usize) -> BinaryImage {
        let mut template = BinaryImage::new(width, height);
        for m in 0..height {
            for n in 0..width {
                if !columns.contains(&n) {
                    template.set(m, n, true);
                }
            }
        }
        template
    }

    fn recognizer_with(templates: TemplateSet) -> DigitRecognizer {
        let pipeline = PipelineBuilder::build_standard(16).expect("Should build pipeline");
        DigitRecognizer::new(pipeline, templates)
    }

    #[test]
    fn test_label_formatting() {
        assert_eq!(format_label(&[]), "?");
        assert_eq!(format_label(&[Digit::One]), "1");
        assert_eq!(format_label(&[Digit::One, Digit::Seven]), "1, 7");
    }

    #[test]
    fn test_vertical_stroke_matches_vertical_template() {
        // A vertical stroke is crossed only by the rays near 90 and 270 degrees.
        let reader = SignatureReader::new(16).expect("Should accept rate");
        let vertical: Vec<usize> = (0..16)
            .filter(|i| matches!(reader.angle_of(*i as u32), 68..=113 | 248..=293))
            .collect();

        let templates = TemplateSet::from_images([
            (Digit::One, template_allowing(&vertical, 16, 64)),
            (Digit::Zero, BinaryImage::from_fn_par(16, 64, |_| true)),
        ]);
        let recognition = recognizer_with(templates).identify(&bar_raster()).expect("Should identify bar");

        assert_eq!(recognition.matches, vec![Digit::One]);
        assert_eq!(recognition.label, "1");
        assert!(recognition.is_recognized());
    }

    #[test]
    fn test_no_match_gives_unknown_label() {
        let templates = TemplateSet::from_images(
            Digit::iter().map(|digit| (digit, BinaryImage::from_fn_par(16, 64, |_| true))),
        );
        let recognition = recognizer_with(templates).identify(&bar_raster()).expect("Should identify bar");

        assert!(recognition.matches.is_empty());
        assert_eq!(recognition.label, UNKNOWN_LABEL);
    }

    #[test]
    fn test_blank_templates_match_everything_in_order() {
        let templates = TemplateSet::from_images(
            Digit::iter().rev().map(|digit| (digit, BinaryImage::new(16, 64))),
        );
        let recognition = recognizer_with(templates).identify(&bar_raster()).expect("Should identify bar");
        assert_eq!(recognition.label, "0, 1, 2, 3, 4, 5, 6, 7, 8, 9");
    }

    #[test]
    fn test_identify_many_keeps_input_order() {
        let templates = TemplateSet::from_images([(Digit::Eight, BinaryImage::new(16, 64))]);
        let recognizer = recognizer_with(templates);
        let blank = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 255, 255])));

        let results = recognizer.identify_many(&[bar_raster(), blank]);
        assert_eq!(results.len(), 2);
        let bar = results[0].as_ref().expect("Should identify bar");
        let empty = results[1].as_ref().expect("Should identify blank image");
        assert!(bar.signature.hit_count() > 0);
        assert_eq!(empty.signature.hit_count(), 0);
    }

    #[test]
    fn test_recognition_serializes_without_image() {
        let templates = TemplateSet::from_images([(Digit::Two, BinaryImage::new(16, 64))]);
        let recognition = recognizer_with(templates).identify(&bar_raster()).expect("Should identify bar");

        let json = serde_json::to_value(&recognition).expect("Should serialize");
        assert_eq!(json["label"], "2");
        assert_eq!(json["matches"][0], "2");
        assert!(json.get("signature_image").is_none());
    }
}
