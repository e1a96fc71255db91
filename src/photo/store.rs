use image::{DynamicImage, ImageFormat, RgbaImage};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::source::{decode_locator, decode_locator_async, FileSource, LocatorSource};
use crate::error::{Result, WidgetError};
use crate::state::data::{ImageReference, Slot};
use crate::state::prefs::PrefStore;

/// Namespace holding the per-day locators
pub const IMAGES_NAMESPACE: &str = "week_images";
const KEY_PREFIX: &str = "day_uri_";

/// What `set_reference` managed to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SetOutcome {
    /// Locator saved and a fresh bitmap written to the cache
    Cached,
    /// Locator saved, but fetching, decoding or caching failed.
    /// The previous cache file (if any) is left untouched.
    SavedWithoutBitmap,
    /// Blank locator, nothing was saved
    ReferenceInvalid,
}

/// Per-day photo references with a decode-once PNG cache
///
/// Locators live in the preference store under `day_uri_<index>`,
/// decoded copies in `<cache_dir>/day_<index>.png`. The two may disagree
/// (locator set, decode failed); readers must treat that as "no photo".
pub struct ImageStore {
    prefs: PrefStore,
    cache_dir: PathBuf,
    source: Arc<dyn LocatorSource>,
}

impl ImageStore {
    /// Create a store reading locators from the filesystem
    pub fn new(prefs: PrefStore, cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)?;
        Ok(Self {
            prefs,
            cache_dir,
            source: Arc::new(FileSource),
        })
    }

    /// Replace the locator source (picker backends, tests)
    pub fn with_source(mut self, source: Arc<dyn LocatorSource>) -> Self {
        self.source = source;
        self
    }

    /// Get the day cache directory
    /// Returns ~/.cache/week-widget/days on Linux
    pub fn default_cache_dir() -> Result<PathBuf> {
        let mut path = dirs_next::cache_dir()
            .or_else(dirs_next::home_dir)
            .ok_or(WidgetError::NoDirectory("cache"))?;

        path.push("week-widget");
        path.push("days");
        Ok(path)
    }

    pub fn prefs(&self) -> &PrefStore {
        &self.prefs
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Expected cache file for a slot (doesn't check that it exists)
    pub fn cache_path(&self, slot: Slot) -> PathBuf {
        self.cache_dir.join(format!("day_{}.png", slot.index()))
    }

    /// Save `locator` for `slot`, then fetch, decode and cache it
    ///
    /// Only a failure to save the locator itself is an error; fetch and
    /// decode problems are logged and reported as `SavedWithoutBitmap`.
    pub fn set_reference(&self, slot: Slot, locator: &str) -> Result<SetOutcome> {
        if !self.persist_locator(slot, locator)? {
            return Ok(SetOutcome::ReferenceInvalid);
        }

        let decoded = decode_locator(self.source.as_ref(), locator);
        Ok(self.store_decoded(slot, locator, decoded))
    }

    /// Same contract as `set_reference`, with the fetch and decode
    /// running on the blocking pool
    pub async fn set_reference_async(&self, slot: Slot, locator: &str) -> Result<SetOutcome> {
        if !self.persist_locator(slot, locator)? {
            return Ok(SetOutcome::ReferenceInvalid);
        }

        let decoded = decode_locator_async(Arc::clone(&self.source), locator.to_string()).await;
        Ok(self.store_decoded(slot, locator, decoded))
    }

    /// Returns false (and saves nothing) for a blank locator
    fn persist_locator(&self, slot: Slot, locator: &str) -> Result<bool> {
        if locator.trim().is_empty() {
            warn!("⚠️  Refusing blank locator for day {}", slot);
            return Ok(false);
        }

        self.prefs.put_string(IMAGES_NAMESPACE, &locator_key(slot), locator)?;
        debug!("Saved locator for day {}: {}", slot, locator);
        Ok(true)
    }

    fn store_decoded(&self, slot: Slot, locator: &str, decoded: Result<DynamicImage>) -> SetOutcome {
        match decoded.and_then(|img| self.write_cache(slot, &img.to_rgba8())) {
            Ok(path) => {
                info!("📸 Cached day {} at {}", slot, path.display());
                SetOutcome::Cached
            }
            Err(e) => {
                warn!("⚠️  Saved {:?} for day {} without a bitmap: {}", locator, slot, e);
                SetOutcome::SavedWithoutBitmap
            }
        }
    }

    /// Write through a temporary file so a failed write never clobbers
    /// the previous cache entry
    fn write_cache(&self, slot: Slot, bitmap: &RgbaImage) -> Result<PathBuf> {
        let path = self.cache_path(slot);
        let tmp_path = path.with_extension("png.tmp");

        if let Err(e) = bitmap.save_with_format(&tmp_path, ImageFormat::Png) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(path)
    }

    /// Locator currently saved for `slot`
    pub fn get_reference(&self, slot: Slot) -> Result<Option<String>> {
        self.prefs.get_string(IMAGES_NAMESPACE, &locator_key(slot))
    }

    /// One entry per slot, in index order
    pub fn get_all_references(&self) -> Result<Vec<Option<String>>> {
        Slot::all().map(|slot| self.get_reference(slot)).collect()
    }

    /// Last successfully cached bitmap for `slot`
    ///
    /// `None` on a cache miss, or when the cache file can't be decoded.
    pub fn get_cached_bitmap(&self, slot: Slot) -> Option<RgbaImage> {
        let path = self.cache_path(slot);
        if !path.exists() {
            return None;
        }

        match image::open(&path) {
            Ok(img) => Some(img.to_rgba8()),
            Err(e) => {
                warn!("⚠️  Unreadable cache file {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Same answer as `get_cached_bitmap(slot).is_some()`; a corrupt
    /// cache file doesn't count
    pub fn has_cached_bitmap(&self, slot: Slot) -> bool {
        self.get_cached_bitmap(slot).is_some()
    }

    /// Locator plus cache state for a slot, `None` if no photo was picked
    pub fn image_reference(&self, slot: Slot) -> Result<Option<ImageReference>> {
        Ok(self.get_reference(slot)?.map(|locator| ImageReference {
            slot,
            locator,
            cached: self.has_cached_bitmap(slot),
        }))
    }

    /// `image_reference` for every slot, in index order
    pub fn all_image_references(&self) -> Result<Vec<Option<ImageReference>>> {
        Ok(Slot::all()
            .zip(self.get_all_references()?)
            .map(|(slot, locator)| {
                locator.map(|locator| ImageReference {
                    slot,
                    locator,
                    cached: self.has_cached_bitmap(slot),
                })
            })
            .collect())
    }
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("prefs", &self.prefs)
            .field("cache_dir", &self.cache_dir)
            .finish()
    }
}

fn locator_key(slot: Slot) -> String {
    format!("{}{}", KEY_PREFIX, slot.index())
}
