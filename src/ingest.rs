//! Ingest pipeline: candidate files → normalized, size-capped items.
//!
//! Per accepted file the pipeline decodes, resamples to a maximum display
//! height preserving aspect ratio, flattens any transparency onto an opaque
//! theme-colored background, re-encodes as lossy JPEG, and appends the
//! result to the unranked bucket as a `data:image/jpeg;base64` payload.
//!
//! Processing is strictly sequential in input order — items are appended and
//! progress callbacks fire in that same order, never interleaved. Failures
//! never abort a batch:
//!
//! - non-image media types are silently dropped before processing,
//! - oversized files produce a user-visible warning and the batch continues,
//! - decode failures produce a skip notice and the batch continues.

use crate::store::{Bucket, Item, TierState};
use crate::theme::EffectiveTheme;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::imageops::FilterType;
use image::{DynamicImage, Rgba, RgbaImage};
use std::io;
use std::path::Path;
use thiserror::Error;

/// Per-file size ceiling: files larger than this are rejected with a warning.
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Ingested thumbnails are capped at this height; width scales with aspect.
pub const MAX_INGEST_HEIGHT: u32 = 150;

/// JPEG quality for the re-encode (the original's 0.7 canvas quality).
pub const JPEG_QUALITY: u8 = 70;

/// Extensions with a known raster media type, used when ingesting from the
/// filesystem. Matches the set of decoders compiled into the `image` crate
/// for this build.
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("bmp", "image/bmp"),
];

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to decode {name}: {source}")]
    Decode {
        name: String,
        source: image::ImageError,
    },
    #[error("failed to encode {name}: {source}")]
    Encode {
        name: String,
        source: image::ImageError,
    },
}

/// A file offered to the pipeline: declared media type, name, raw bytes.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Outcome of one ingest batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Files that passed the media-type filter.
    pub accepted: usize,
    /// Items actually appended to unranked.
    pub added: usize,
    /// One user-visible warning per oversized rejection.
    pub warnings: Vec<String>,
    /// One notice per decode/encode failure (file skipped, batch continued).
    pub skipped: Vec<String>,
}

/// Run one ingest batch against the store.
///
/// `progress(done, total)` fires after each accepted file, strictly in input
/// order; `total` is the accepted count (post media-type filter). Items are
/// appended to [`Bucket::Unranked`] with freshly generated ids. The effective
/// theme picks the opaque background that flattens transparency before the
/// lossy re-encode.
pub fn ingest(
    store: &mut TierState,
    files: Vec<CandidateFile>,
    theme: EffectiveTheme,
    mut progress: impl FnMut(usize, usize),
) -> IngestReport {
    let accepted: Vec<CandidateFile> = files
        .into_iter()
        .filter(|f| f.media_type.starts_with("image/"))
        .collect();
    let total = accepted.len();
    let background = theme.ingest_background();

    let mut report = IngestReport {
        accepted: total,
        ..IngestReport::default()
    };

    for (index, file) in accepted.into_iter().enumerate() {
        if file.bytes.len() > MAX_FILE_BYTES {
            report.warnings.push(format!(
                "File \"{}\" is too large ({:.1}MB). Maximum size is 5MB.",
                file.name,
                file.bytes.len() as f64 / (1024.0 * 1024.0)
            ));
        } else {
            match process_file(&file, background) {
                Ok(item) => {
                    store.append_item(item, Bucket::Unranked);
                    report.added += 1;
                }
                Err(err) => report.skipped.push(err.to_string()),
            }
        }
        progress(index + 1, total);
    }

    report
}

/// Decode, cap height, flatten, and re-encode one file into an [`Item`].
fn process_file(file: &CandidateFile, background: Rgba<u8>) -> Result<Item, IngestError> {
    let decoded = image::load_from_memory(&file.bytes).map_err(|source| IngestError::Decode {
        name: file.name.clone(),
        source,
    })?;

    let scaled = if decoded.height() > MAX_INGEST_HEIGHT {
        let width = (decoded.width() as f64 * MAX_INGEST_HEIGHT as f64 / decoded.height() as f64)
            .round()
            .max(1.0) as u32;
        decoded.resize_exact(width, MAX_INGEST_HEIGHT, FilterType::Lanczos3)
    } else {
        decoded
    };

    // Flatten transparency onto the theme background before the lossy encode
    let mut flat = RgbaImage::from_pixel(scaled.width(), scaled.height(), background);
    image::imageops::overlay(&mut flat, &scaled.to_rgba8(), 0, 0);

    let mut jpeg = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(io::Cursor::new(&mut jpeg), JPEG_QUALITY);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(flat).to_rgb8())
        .write_with_encoder(encoder)
        .map_err(|source| IngestError::Encode {
            name: file.name.clone(),
            source,
        })?;

    Ok(Item::new(
        format!("data:image/jpeg;base64,{}", BASE64.encode(&jpeg)),
        file.name.clone(),
    ))
}

/// Decode an item's `data:` payload back into pixels.
///
/// Returns `None` for anything that is not a decodable data URI — the export
/// renderer tolerates this by skipping the item.
pub fn decode_payload(src: &str) -> Option<DynamicImage> {
    let encoded = src.split_once(";base64,")?.1;
    let bytes = BASE64.decode(encoded).ok()?;
    image::load_from_memory(&bytes).ok()
}

/// The declared media type for a filesystem path, from its extension.
pub fn media_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

/// Read a file into a [`CandidateFile`]. Unknown extensions get a non-image
/// media type so the batch filter drops them silently, same as a browser
/// would for a non-image drop.
pub fn candidate_from_path(path: &Path) -> io::Result<CandidateFile> {
    let bytes = std::fs::read(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let media_type = media_type_for(path).unwrap_or("application/octet-stream");
    Ok(CandidateFile {
        name,
        media_type: media_type.to_string(),
        bytes,
    })
}
