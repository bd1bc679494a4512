//! Saved-drawing thumbnail cache.
//!
//! Mirrors the drawings the server holds for the current user so the
//! sidebar and gallery can render previews without refetching. After a
//! save or delete the client reconciles this cache with the response:
//! a save updates the matching entry or appends a new one, a delete drops
//! it. Order is the order entries were first seen.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::consts::SIDEBAR_THUMB_LIMIT;
use crate::matrix;
use crate::render::{self, Raster};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryEntry {
    pub id: i64,
    pub buffer: PixelBuffer,
}

/// On-disk / on-wire form of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryRecord {
    pub id: i64,
    pub pixel_data: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gallery {
    entries: Vec<GalleryEntry>,
}

impl Gallery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored records, skipping any whose matrix does not decode.
    #[must_use]
    pub fn from_records(records: &[GalleryRecord]) -> Self {
        let mut gallery = Self::new();
        for record in records {
            match matrix::decode(&record.pixel_data) {
                Ok(decoded) => gallery.entries.push(GalleryEntry { id: record.id, buffer: decoded.buffer }),
                Err(e) => log::warn!("skipping drawing {} in gallery: {e}", record.id),
            }
        }
        gallery
    }

    #[must_use]
    pub fn to_records(&self) -> Vec<GalleryRecord> {
        self.entries
            .iter()
            .map(|entry| GalleryRecord { id: entry.id, pixel_data: matrix::encode(&entry.buffer) })
            .collect()
    }

    /// Reconcile with a successful save: update in place, or put a new id
    /// first to match the server's newest-first listing.
    pub fn record_save(&mut self, id: i64, buffer: PixelBuffer) {
        match self.entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) => entry.buffer = buffer,
            None => self.entries.insert(0, GalleryEntry { id, buffer }),
        }
    }

    /// Reconcile with a successful delete. Returns `true` if an entry was dropped.
    pub fn remove(&mut self, id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&GalleryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn entries(&self) -> &[GalleryEntry] {
        &self.entries
    }

    /// The entries visible in the sidebar; the rest live in the gallery.
    #[must_use]
    pub fn sidebar(&self) -> &[GalleryEntry] {
        &self.entries[..self.entries.len().min(SIDEBAR_THUMB_LIMIT)]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn thumbnail(&self, id: i64, side: u32) -> Option<Raster> {
        self.get(id)
            .map(|entry| render::render_thumbnail(&entry.buffer, side))
    }
}
