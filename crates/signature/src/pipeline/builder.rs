use crate::{
    algorithms::{ChannelMinimumBinarizer, Cropper, Shrinker, SignatureReader, Smoother, Thinner},
    error::Result,
    pipeline::{DEFAULT_SAMPLING_RATE, Pipeline},
    traits::{Binarizer, ImageStage},
};

/// Builder for creating processing pipelines with a fluent API
pub struct PipelineBuilder {
    binarizer: Option<Box<dyn Binarizer>>,
    stages: Vec<Box<dyn ImageStage>>,
    sampling_rate: u32,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            binarizer: None,
            stages: Vec::new(),
            sampling_rate: DEFAULT_SAMPLING_RATE,
        }
    }

    /// Set the thresholding policy (replaces any existing one)
    pub fn set_binarizer<B>(mut self, binarizer: B) -> Self
    where
        B: Binarizer + 'static,
    {
        self.binarizer = Some(Box::new(binarizer));
        self
    }

    /// Append an image stage; stages run in the order added
    pub fn add_stage<S>(mut self, stage: S) -> Self
    where
        S: ImageStage + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Number of sampling lines of the signature, checked by `build`
    pub fn with_sampling_rate(mut self, sampling_rate: u32) -> Self {
        self.sampling_rate = sampling_rate;
        self
    }

    /// Crop, shrink, smooth and thin with the default settings, thinning for at
    /// most `max_thinning_iterations` passes
    pub fn with_standard_stages(self, max_thinning_iterations: usize) -> Self {
        self.add_stage(Cropper::default())
            .add_stage(Shrinker::default())
            .add_stage(Smoother::default())
            .add_stage(Thinner::with_max_iterations(max_thinning_iterations))
    }

    /// Build the pipeline, using the channel-minimum binarizer when none was set
    /// and the standard stages when none were added
    pub fn build(self) -> Result<Pipeline> {
        let reader = SignatureReader::new(self.sampling_rate)?;
        let binarizer = self
            .binarizer
            .unwrap_or_else(|| Box::new(ChannelMinimumBinarizer::default()));

        let stages = if self.stages.is_empty() {
            Self::new().with_standard_stages(Thinner::default().max_iterations).stages
        } else {
            self.stages
        };

        Ok(Pipeline::new(binarizer, stages, reader))
    }

    /// Build the standard pipeline with the given number of sampling lines
    pub fn build_standard(sampling_rate: u32) -> Result<Pipeline> {
        Self::new().with_sampling_rate(sampling_rate).build()
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
