//! Local state directory: the gallery cache and the color history.
//!
//! Layout under the state dir:
//! - `gallery.json`: `[{ "id": 1, "pixelData": "..." }, ...]`
//! - `tinydots.colorHistory.json`: the color history key

use std::fs;
use std::io;
use std::path::PathBuf;

use canvas::gallery::{Gallery, GalleryRecord};
use canvas::history::{ColorHistory, FileStore};

use crate::CliError;

const GALLERY_FILE: &str = "gallery.json";

pub struct StateDir {
    dir: PathBuf,
}

impl StateDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(test)]
    pub fn path(&self) -> &std::path::Path {
        &self.dir
    }

    /// Cached gallery; empty when no cache was written yet.
    pub fn load_gallery(&self) -> Result<Gallery, CliError> {
        let raw = match fs::read_to_string(self.dir.join(GALLERY_FILE)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Gallery::new()),
            Err(e) => return Err(e.into()),
        };
        let records: Vec<GalleryRecord> = serde_json::from_str(&raw)?;
        Ok(Gallery::from_records(&records))
    }

    pub fn store_gallery(&self, gallery: &Gallery) -> Result<(), CliError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(&gallery.to_records())?;
        fs::write(self.dir.join(GALLERY_FILE), json)?;
        Ok(())
    }

    /// Color history persisted in this directory.
    pub fn history(&self) -> ColorHistory {
        ColorHistory::load(Box::new(FileStore::new(&self.dir)))
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
