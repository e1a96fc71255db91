/// Locator sources
///
/// A locator is whatever the user picked (a `file://` URI or a plain
/// path). Sources turn a locator into bytes; decoding happens here too
/// so it can be pushed onto the blocking pool in one piece.

use image::DynamicImage;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task;
use url::{ParseError, Url};

use crate::error::{Result, WidgetError};

/// Opens a locator and returns the raw bytes behind it
pub trait LocatorSource: Send + Sync {
    fn open(&self, locator: &str) -> Result<Vec<u8>>;
}

/// Reads `file://` URIs and plain filesystem paths
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSource;

impl LocatorSource for FileSource {
    fn open(&self, locator: &str) -> Result<Vec<u8>> {
        let path = locator_path(locator)?;
        Ok(std::fs::read(path)?)
    }
}

/// Filesystem path behind a locator
///
/// `file:///a/b.png` and `file://localhost/a/b.png` both give `/a/b.png`,
/// with percent-escapes decoded. A `file://` URI naming another host,
/// or any other scheme, is unsupported. Strings without a scheme are
/// plain paths.
pub fn locator_path(locator: &str) -> Result<PathBuf> {
    let unsupported = || WidgetError::UnsupportedLocator(locator.to_string());

    let url = match Url::parse(locator) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => return Ok(PathBuf::from(locator)),
        Err(_) => return Err(unsupported()),
    };

    // `C:\photos\mon.jpg` parses with scheme "c"
    if url.scheme().len() == 1 && cfg!(windows) {
        return Ok(PathBuf::from(locator));
    }
    if url.scheme() != "file" {
        return Err(unsupported());
    }

    let path = url.to_file_path().map_err(|()| unsupported())?;
    if path.file_name().is_none() {
        return Err(unsupported());
    }
    Ok(path)
}

/// Fetch and decode a locator on the current thread
pub fn decode_locator(source: &dyn LocatorSource, locator: &str) -> Result<DynamicImage> {
    let bytes = source.open(locator)?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Fetch and decode on tokio's blocking pool; only the decoded image
/// comes back to the caller
pub async fn decode_locator_async(
    source: Arc<dyn LocatorSource>,
    locator: String,
) -> Result<DynamicImage> {
    task::spawn_blocking(move || decode_locator(source.as_ref(), &locator))
        .await
        .map_err(|e| WidgetError::Task(e.to_string()))?
}
