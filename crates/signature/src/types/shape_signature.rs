use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SignatureError},
    types::position::MatrixPosition,
};

pub const MIN_SAMPLING_RATE: u32 = 4;
pub const MAX_SAMPLING_RATE: u32 = 360;

/// Fails when `sampling_rate` lies outside `4..=360`.
pub fn check_sampling_rate(sampling_rate: u32) -> Result<u32> {
    if !(MIN_SAMPLING_RATE..=MAX_SAMPLING_RATE).contains(&sampling_rate) {
        return Err(SignatureError::InvalidSamplingRate { value: sampling_rate });
    }
    Ok(sampling_rate)
}

/// A pixel visited while walking a sampling line, with its step count from the center.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplingPoint {
    pub position: MatrixPosition,
    pub radius: u32,
}

/// The ordered pixels on one ray from the shape center to the image edge.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SamplingLine {
    pub angle: u32,
    points: Vec<SamplingPoint>,
}

impl SamplingLine {
    pub fn new(angle: u32) -> Self {
        Self {
            angle,
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, point: SamplingPoint) {
        self.points.push(point);
    }

    pub fn contains_position(&self, position: MatrixPosition) -> bool {
        self.points.iter().any(|point| point.position == position)
    }

    pub fn points(&self) -> &[SamplingPoint] {
        &self.points
    }

    pub fn positions(&self) -> impl Iterator<Item = MatrixPosition> + '_ {
        self.points.iter().map(|point| point.position)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Polar profile of a shape: for each sampling line, the radii where the
/// skeleton was crossed, in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShapeSignature")]
pub struct ShapeSignature {
    lines: Vec<Vec<u32>>,
}

#[derive(Deserialize)]
struct RawShapeSignature {
    lines: Vec<Vec<u32>>,
}

impl TryFrom<RawShapeSignature> for ShapeSignature {
    type Error = SignatureError;

    fn try_from(raw: RawShapeSignature) -> Result<Self> {
        Self::new(raw.lines)
    }
}

impl ShapeSignature {
    /// One hit list per sampling line. Fails unless there are 4 to 360 lines.
    pub fn new(lines: Vec<Vec<u32>>) -> Result<Self> {
        let count = u32::try_from(lines.len()).unwrap_or(u32::MAX);
        check_sampling_rate(count)?;
        Ok(Self { lines })
    }

    /// Number of sampling lines.
    pub fn sampling_rate(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&[u32]> {
        self.lines.get(index).map(Vec::as_slice)
    }

    pub fn lines(&self) -> &[Vec<u32>] {
        &self.lines
    }

    /// Largest radius over all lines, `None` when no line has a hit.
    pub fn max_radius(&self) -> Option<u32> {
        self.lines.iter().flatten().copied().max()
    }

    pub fn hit_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_radius_and_hits() {
        let signature =
            ShapeSignature::new(vec![vec![3], vec![], vec![2, 7], vec![]]).expect("Should accept 4 lines");
        assert_eq!(signature.sampling_rate(), 4);
        assert_eq!(signature.max_radius(), Some(7));
        assert_eq!(signature.hit_count(), 3);
        assert_eq!(signature.line(1), Some(&[][..]));
        let empty = ShapeSignature::new(vec![vec![]; 4]).expect("Should accept 4 lines");
        assert!(empty.max_radius().is_none());
    }

    #[test]
    fn test_line_count_must_be_in_range() {
        for count in [0, 3, 361] {
            assert!(matches!(
                ShapeSignature::new(vec![vec![1]; count]),
                Err(SignatureError::InvalidSamplingRate { value }) if value as usize == count
            ));
        }
        assert!(ShapeSignature::new(vec![Vec::new(); 4]).is_ok());
        assert!(ShapeSignature::new(vec![Vec::new(); 360]).is_ok());
    }

    #[test]
    fn test_json_with_too_few_lines_is_rejected() {
        let signature = ShapeSignature::new(vec![vec![2]; 4]).expect("Should accept 4 lines");
        let json = signature.to_json().expect("Should serialize");
        let parsed: ShapeSignature = serde_json::from_str(&json).expect("Should parse");
        assert_eq!(parsed, signature);

        assert!(serde_json::from_str::<ShapeSignature>(r#"{ "lines": [[1], [2], [3]] }"#).is_err());
    }

    #[test]
    fn test_sampling_line_tracks_positions() {
        let mut line = SamplingLine::new(45);
        line.push(SamplingPoint {
            position: MatrixPosition::new(4, 4),
            radius: 2,
        });
        assert!(line.contains_position(MatrixPosition::new(4, 4)));
        assert!(!line.contains_position(MatrixPosition::new(3, 3)));
        assert_eq!(line.len(), 1);
    }
}
