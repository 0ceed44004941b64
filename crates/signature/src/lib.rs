//! # Shape Signature Digit Recognition
//!
//! Recognizes handwritten digits by the polar signature of their skeleton. An
//! image is binarized, cropped to its foreground, halved, smoothed and thinned
//! to a one pixel wide skeleton. Rays cast from the skeleton's center record the
//! radii at which they cross it, and the plotted result is checked against one
//! template of forbidden zones per digit.
//!
//! ## Core Features
//!
//! - **Trait-based Stages**: every step is an [`ImageStage`], thresholding is a [`Binarizer`]
//! - **Pipeline System**: compose stages with [`PipelineBuilder`] and observe every intermediate image
//! - **Row Parallelism**: stages compute output rows independently with rayon
//! - **Template Matching**: [`DigitRecognizer`] checks one signature against all templates concurrently
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use signature::DigitRecognizer;
//!
//! let recognizer = DigitRecognizer::from_templates_dir("templates", 180)?;
//! let recognition = recognizer.identify_file("digit.png")?;
//! println!("{}", recognition.label);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Custom Pipeline
//!
//! ```rust,no_run
//! use signature::{Pipeline, algorithms::*};
//!
//! let pipeline = Pipeline::builder()
//!     .set_binarizer(AverageLuminanceBinarizer::default())
//!     .add_stage(Cropper { margin: 4 })
//!     .add_stage(Shrinker::default())
//!     .add_stage(Thinner::with_max_iterations(10))
//!     .with_sampling_rate(90)
//!     .build()?;
//! let raw = image::open("digit.png")?;
//! let processed = pipeline.process(&raw)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Core modules
pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod pipeline;
pub mod io;
pub mod recognizer;

// Re-exports for convenience
pub use error::{Result, SignatureError};
pub use types::*;
pub use traits::*;
pub use pipeline::{NoopObserver, Pipeline, ProcessedSignature, StageRecorder, builder::PipelineBuilder};
pub use io::{DebugImageWriter, Digit, TemplateSet};
pub use recognizer::{DigitRecognizer, Recognition};

use image::DynamicImage;

/// Run the standard pipeline on a decoded raster and return the plotted signature.
///
/// Fails before any processing when `sampling_rate` is outside `4..=360`.
pub fn process_to_signature(raw: &DynamicImage, sampling_rate: u32) -> Result<BinaryImage> {
    let pipeline = PipelineBuilder::build_standard(sampling_rate)?;
    Ok(pipeline.process(raw)?.image)
}
