pub mod builder;

use std::time::Instant;

use image::DynamicImage;
use tracing::debug;

use crate::{
    algorithms::{SignaturePlotter, SignatureReader},
    error::Result,
    io::raster::binarize_image,
    traits::{Binarizer, ImageStage, StageObserver},
    types::{BinaryImage, ShapeSignature},
};

/// Sampling lines used when none is configured
pub const DEFAULT_SAMPLING_RATE: u32 = 180;

/// Signature of one processed image, both as radii and as the plotted image
/// that is compared against templates.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedSignature {
    pub signature: ShapeSignature,
    pub image: BinaryImage,
}

/// Binarize, run the image stages in order, then read and plot the signature
pub struct Pipeline {
    binarizer: Box<dyn Binarizer>,
    stages: Vec<Box<dyn ImageStage>>,
    reader: SignatureReader,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> builder::PipelineBuilder {
        builder::PipelineBuilder::new()
    }

    /// Create a new pipeline with the given components
    pub fn new(binarizer: Box<dyn Binarizer>, stages: Vec<Box<dyn ImageStage>>, reader: SignatureReader) -> Self {
        Self {
            binarizer,
            stages,
            reader,
        }
    }

    pub fn sampling_rate(&self) -> u32 {
        self.reader.sampling_rate()
    }

    pub fn binarizer(&self) -> &dyn Binarizer {
        self.binarizer.as_ref()
    }

    /// Threshold a decoded raster with the configured policy
    pub fn binarize(&self, raw: &DynamicImage) -> BinaryImage {
        binarize_image(raw, self.binarizer.as_ref())
    }

    /// Process a raster through the entire pipeline
    pub fn process(&self, raw: &DynamicImage) -> Result<ProcessedSignature> {
        self.process_observed(raw, &mut NoopObserver)
    }

    /// Process a raster, reporting every intermediate image to `observer`
    pub fn process_observed(&self, raw: &DynamicImage, observer: &mut dyn StageObserver) -> Result<ProcessedSignature> {
        let binary = self.binarize(raw);
        debug!(
            binarizer = self.binarizer.name(),
            width = binary.width(),
            height = binary.height(),
            "binarized input"
        );
        observer.observe("binary", &binary)?;
        self.process_binary_observed(&binary, observer)
    }

    /// Process an image that is already binary
    pub fn process_binary(&self, image: &BinaryImage) -> Result<ProcessedSignature> {
        self.process_binary_observed(image, &mut NoopObserver)
    }

    pub fn process_binary_observed(
        &self,
        image: &BinaryImage,
        observer: &mut dyn StageObserver,
    ) -> Result<ProcessedSignature> {
        let mut current = image.clone();
        for stage in &self.stages {
            let started = Instant::now();
            current = stage.apply_observed(&current, observer)?;
            debug!(
                stage = stage.name(),
                width = current.width(),
                height = current.height(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "stage finished"
            );
        }

        let signature = self.reader.read(&current)?;
        let plotted = SignaturePlotter::plot(&signature);
        observer.observe(&format!("signature{}", self.sampling_rate()), &plotted)?;

        Ok(ProcessedSignature {
            signature,
            image: plotted,
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        let stages: Vec<&str> = self.stages.iter().map(|stage| stage.name()).collect();
        format!(
            "Pipeline: {} binarizer, stages [{}], {} sampling lines",
            self.binarizer.name(),
            stages.join(", "),
            self.sampling_rate()
        )
    }
}

/// Discards every intermediate image
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl StageObserver for NoopObserver {
    fn observe(&mut self, _stage: &str, _image: &BinaryImage) -> Result<()> {
        Ok(())
    }
}

/// Keeps every intermediate image in memory, in the order produced
#[derive(Debug, Clone, Default)]
pub struct StageRecorder {
    stages: Vec<(String, BinaryImage)>,
}

impl StageRecorder {
    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, stage: &str) -> Option<&BinaryImage> {
        self.stages
            .iter()
            .find(|(name, _)| name == stage)
            .map(|(_, image)| image)
    }

    pub fn last(&self) -> Option<&BinaryImage> {
        self.stages.last().map(|(_, image)| image)
    }

    pub fn stages(&self) -> &[(String, BinaryImage)] {
        &self.stages
    }
}

impl StageObserver for StageRecorder {
    fn observe(&mut self, stage: &str, image: &BinaryImage) -> Result<()> {
        self.stages.push((stage.to_string(), image.clone()));
        Ok(())
    }
}
