use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    error::Result,
    io::raster::{ColorSettings, render},
    traits::StageObserver,
    types::BinaryImage,
};

/// Saves every intermediate image as `<dir>/<stage>.png`
#[derive(Debug, Clone)]
pub struct DebugImageWriter {
    dir: PathBuf,
    settings: ColorSettings,
}

impl DebugImageWriter {
    /// Create the writer, creating `dir` if needed
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            settings: ColorSettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: ColorSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stage: &str) -> PathBuf {
        self.dir.join(format!("{stage}.png"))
    }
}

impl StageObserver for DebugImageWriter {
    fn observe(&mut self, stage: &str, image: &BinaryImage) -> Result<()> {
        let path = self.path_for(stage);
        render(image, &self.settings).save(&path)?;
        debug!(path = %path.display(), "wrote processed image");
        Ok(())
    }
}
