//! Logo asset sizing for the branding step.

use image::ImageReader;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, warn};

/// Rendered logo height in points; width follows the source aspect ratio.
pub const LOGO_HEIGHT_PT: f64 = 34.0;

/// Aspect ratio (width / height) used when the asset's intrinsic dimensions
/// cannot be determined.
pub const FALLBACK_ASPECT_RATIO: f64 = 3.25;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Width and height, in points, for an inserted inline image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageSizePt {
    pub width: f64,
    pub height: f64,
}

/// Intrinsic pixel dimensions read from the image's header bytes, if the
/// format is recognizable. Only the header is decoded, never the pixel data.
#[must_use]
pub fn dimensions_from_bytes(bytes: &[u8]) -> Option<(u32, u32)> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Size for the logo at the standard height.
///
/// Preserves the source aspect ratio when the asset can be fetched and its
/// header decoded; otherwise falls back to [`FALLBACK_ASPECT_RATIO`] so the
/// pipeline never blocks on size discovery.
pub async fn probe_logo_size(uri: &str) -> ImageSizePt {
    let dimensions = fetch_dimensions(uri).await;
    if dimensions.is_none() {
        warn!("could not determine logo dimensions for '{uri}', using fallback aspect ratio");
    }
    size_from_dimensions(dimensions)
}

/// Converts probed pixel dimensions into point sizing at the standard
/// height.
#[must_use]
pub fn size_from_dimensions(dimensions: Option<(u32, u32)>) -> ImageSizePt {
    let aspect = match dimensions {
        Some((width, height)) if height > 0 => {
            debug!("logo intrinsic size: {width}x{height} px");
            f64::from(width) / f64::from(height)
        }
        _ => FALLBACK_ASPECT_RATIO,
    };
    ImageSizePt {
        width: LOGO_HEIGHT_PT * aspect,
        height: LOGO_HEIGHT_PT,
    }
}

async fn fetch_dimensions(uri: &str) -> Option<(u32, u32)> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .ok()?;
    let response = client.get(uri).send().await.ok()?;
    if !response.status().is_success() {
        return None;
    }
    let bytes = response.bytes().await.ok()?;
    dimensions_from_bytes(&bytes)
}
