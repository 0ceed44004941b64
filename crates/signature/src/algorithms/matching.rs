use crate::types::BinaryImage;

/// Tests a signature image against a template of forbidden zones.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureMatcher;

impl SignatureMatcher {
    /// True when no position of the overlapping rectangle is Black in both images.
    pub fn is_match(signature: &BinaryImage, template: &BinaryImage) -> bool {
        let height = signature.height().min(template.height());
        let width = signature.width().min(template.width());

        !(0..height).any(|m| (0..width).any(|n| signature.get(m, n) && template.get(m, n)))
    }
}
