//! Images submitted for prediction.

use std::path::{Component, Path, PathBuf};

use crate::model::ModelError;

/// An image file located inside the configured images directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    path: PathBuf,
}

impl ImageFile {
    /// Resolve `filename` against `images_dir`.
    ///
    /// Only a bare file name is accepted; anything that could point outside
    /// the directory, or that is not an existing file, is rejected.
    pub fn resolve(images_dir: &Path, filename: &str) -> Result<Self, ModelError> {
        let not_found = || ModelError::ImageNotFound(filename.to_string());

        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(not_found()),
        }
        if filename.contains('\\') {
            return Err(not_found());
        }

        let path = images_dir.join(filename);
        if !path.is_file() {
            return Err(not_found());
        }

        Ok(Self {
            name: filename.to_string(),
            path,
        })
    }

    /// The file name as requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
