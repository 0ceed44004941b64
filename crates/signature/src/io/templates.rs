use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use tracing::debug;

use crate::{
    error::{Result, SignatureError},
    io::raster::{binarize_image, load_image},
    traits::Binarizer,
    types::BinaryImage,
};

/// The digit classes a template can stand for
#[derive(
    Debug, Clone, Copy,
    PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize,
    Display, EnumString, EnumIter, IntoStaticStr,
)]
#[repr(u8)]
pub enum Digit {
    #[strum(serialize = "0")]
    #[serde(rename = "0")]
    Zero = 0,
    #[strum(serialize = "1")]
    #[serde(rename = "1")]
    One = 1,
    #[strum(serialize = "2")]
    #[serde(rename = "2")]
    Two = 2,
    #[strum(serialize = "3")]
    #[serde(rename = "3")]
    Three = 3,
    #[strum(serialize = "4")]
    #[serde(rename = "4")]
    Four = 4,
    #[strum(serialize = "5")]
    #[serde(rename = "5")]
    Five = 5,
    #[strum(serialize = "6")]
    #[serde(rename = "6")]
    Six = 6,
    #[strum(serialize = "7")]
    #[serde(rename = "7")]
    Seven = 7,
    #[strum(serialize = "8")]
    #[serde(rename = "8")]
    Eight = 8,
    #[strum(serialize = "9")]
    #[serde(rename = "9")]
    Nine = 9,
}

impl Digit {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Self::iter().find(|digit| digit.value() == value)
    }

    /// File name of the template image for this digit
    pub fn template_file_name(self) -> String {
        format!("signTemplate_{}.png", self.value())
    }
}

/// Binarized template images, one per digit, shared read-only after load
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<(Digit, Arc<BinaryImage>)>,
}

impl TemplateSet {
    /// Load `signTemplate_0.png` .. `signTemplate_9.png` from `dir`
    pub fn load_dir<P: AsRef<Path>>(dir: P, binarizer: &dyn Binarizer) -> Result<Self> {
        let dir = dir.as_ref();
        let templates = Digit::iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|digit| {
                let path = dir.join(digit.template_file_name());
                let image = load_template(digit, &path, binarizer)?;
                Ok((digit, Arc::new(image)))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(dir = %dir.display(), count = templates.len(), "loaded signature templates");
        Ok(Self { templates })
    }

    pub fn from_images<I>(images: I) -> Self
    where
        I: IntoIterator<Item = (Digit, BinaryImage)>,
    {
        let mut templates: Vec<_> = images
            .into_iter()
            .map(|(digit, image)| (digit, Arc::new(image)))
            .collect();
        templates.sort_by_key(|(digit, _)| *digit);
        Self { templates }
    }

    pub fn get(&self, digit: Digit) -> Option<&BinaryImage> {
        self.templates
            .iter()
            .find(|(candidate, _)| *candidate == digit)
            .map(|(_, image)| image.as_ref())
    }

    /// Templates in ascending digit order
    pub fn iter(&self) -> impl Iterator<Item = (Digit, &BinaryImage)> {
        self.templates.iter().map(|(digit, image)| (*digit, image.as_ref()))
    }

    pub(crate) fn entries(&self) -> &[(Digit, Arc<BinaryImage>)] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn load_template(digit: Digit, path: &Path, binarizer: &dyn Binarizer) -> Result<BinaryImage> {
    if !path.is_file() {
        return Err(SignatureError::TemplateMissing {
            digit: digit.value(),
            path: path.to_path_buf(),
        });
    }
    let raw = load_image(path)?;
    Ok(binarize_image(&raw, binarizer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::ChannelMinimumBinarizer;
    use crate::io::raster::{ColorSettings, render};

    fn write_templates(dir: &Path, digits: impl Iterator<Item = Digit>) {
        for digit in digits {
            let mut image = BinaryImage::new(10, 4);
            image.set(0, digit.value() as usize, true);
            render(&image, &ColorSettings::transparent_background())
                .save(dir.join(digit.template_file_name()))
                .expect("Should write template");
        }
    }

    #[test]
    fn test_digit_names() {
        assert_eq!(Digit::Seven.to_string(), "7");
        assert_eq!("3".parse::<Digit>().expect("Should parse digit"), Digit::Three);
        assert_eq!(Digit::from_value(9), Some(Digit::Nine));
        assert_eq!(Digit::from_value(10), None);
        assert_eq!(Digit::Zero.template_file_name(), "signTemplate_0.png");
        assert_eq!(Digit::iter().count(), 10);
    }

    #[test]
    fn test_loads_all_templates() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        write_templates(dir.path(), Digit::iter());

        let templates = TemplateSet::load_dir(dir.path(), &ChannelMinimumBinarizer::default())
            .expect("Should load templates");
        assert_eq!(templates.len(), 10);
        for (digit, image) in templates.iter() {
            assert_eq!(image.black_count(), 1);
            assert!(image.get(0, digit.value() as usize));
        }
    }

    #[test]
    fn test_missing_template_is_reported() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        write_templates(dir.path(), Digit::iter().filter(|digit| *digit != Digit::Four));

        let error = TemplateSet::load_dir(dir.path(), &ChannelMinimumBinarizer::default())
            .expect_err("Should fail without template 4");
        assert!(matches!(error, SignatureError::TemplateMissing { digit: 4, .. }));
    }
}
