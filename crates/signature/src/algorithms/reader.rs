use rayon::prelude::*;
use tracing::debug;

use crate::{
    error::Result,
    types::{BinaryImage, MatrixPosition, SamplingLine, SamplingPoint, ShapeSignature, check_sampling_rate},
};

/// Upper bound on radial steps along one sampling line
pub const MAX_WALK_STEPS: u32 = 50_000;

/// Reads the polar signature of a thinned shape.
///
/// Rays start at the midpoint of the foreground bounding box. Angle 0 walks toward
/// decreasing column index (west) and angles grow clockwise: 90 points up, 180
/// east, 270 down. The radius of a point is its step count along the ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureReader {
    sampling_rate: u32,
}

impl SignatureReader {
    /// Fails when `sampling_rate` lies outside `4..=360`.
    pub fn new(sampling_rate: u32) -> Result<Self> {
        Ok(Self {
            sampling_rate: check_sampling_rate(sampling_rate)?,
        })
    }

    pub fn sampling_rate(&self) -> u32 {
        self.sampling_rate
    }

    /// Angle in whole degrees of sampling line `index`.
    pub fn angle_of(&self, index: u32) -> u32 {
        (f64::from(index) * 360.0 / f64::from(self.sampling_rate)).round() as u32
    }

    /// Midpoint of the foreground bounding box, `None` for a blank image.
    pub fn center_of(image: &BinaryImage) -> Option<MatrixPosition> {
        image.bounding_box().map(|bounds| bounds.center())
    }

    /// Every sampling line of `image`. Lines are empty when the image has no foreground.
    pub fn sampling_lines(&self, image: &BinaryImage) -> Vec<SamplingLine> {
        let center = Self::center_of(image);
        (0..self.sampling_rate)
            .into_par_iter()
            .map(|index| {
                let angle = self.angle_of(index);
                match center {
                    Some(center) => cast_line(image.height(), image.width(), center, angle),
                    None => SamplingLine::new(angle),
                }
            })
            .collect()
    }

    /// Radii at which each sampling line crosses a Black pixel.
    pub fn read(&self, image: &BinaryImage) -> Result<ShapeSignature> {
        let lines: Vec<Vec<u32>> = self
            .sampling_lines(image)
            .iter()
            .map(|line| {
                line.points()
                    .iter()
                    .filter(|point| image.at(point.position))
                    .map(|point| point.radius)
                    .collect()
            })
            .collect();

        let signature = ShapeSignature::new(lines)?;
        debug!(
            sampling_rate = self.sampling_rate,
            hits = signature.hit_count(),
            "read shape signature"
        );
        Ok(signature)
    }
}

/// Walk from `center` at `angle` degrees to the edge of a `height` x `width` image.
///
/// Both offsets grow monotonically with the radius, so a position can only
/// repeat the one visited just before it.
pub fn cast_line(height: usize, width: usize, center: MatrixPosition, angle: u32) -> SamplingLine {
    let phi = f64::from(angle + 180).to_radians();
    let (sin, cos) = phi.sin_cos();
    let mut line = SamplingLine::new(angle);

    for radius in 1..=MAX_WALK_STEPS {
        let r = f64::from(radius);
        let delta_n = (r * cos) as i64;
        let delta_m = (r * sin) as i64;

        let Some(position) = center.offset(delta_m, delta_n, height, width) else {
            break;
        };
        let repeated = line.points().last().is_some_and(|last| last.position == position);
        if position == center || repeated {
            continue;
        }
        line.push(SamplingPoint { position, radius });
    }
    line
}
