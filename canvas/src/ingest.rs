//! Custom icon upload validation.
//!
//! Uploads are accepted only as SVG or PNG and only up to
//! [`MAX_ICON_BYTES`](crate::consts::MAX_ICON_BYTES). A rejected upload
//! changes nothing; an accepted one becomes a [`CustomIcon`] whose artwork is
//! a `data:` URI, ready to merge into the catalog.

#[cfg(test)]
#[path = "ingest_test.rs"]
mod ingest_test;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use uuid::Uuid;

use crate::catalog::{CUSTOM_CATEGORY, CustomIcon};
use crate::consts::MAX_ICON_BYTES;

/// Rejection reasons. The display text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IngestError {
    #[error("Only SVG or PNG files are accepted (got {0:?})")]
    UnsupportedType(String),
    #[error("Icon file is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },
    #[error("Icon file is empty")]
    Empty,
    #[error("Icon artwork is not a base64 data URI")]
    Malformed,
}

/// Accepted artwork formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconFormat {
    Svg,
    Png,
}

impl IconFormat {
    /// Classify a MIME type. Matches the way browsers report uploads, so
    /// `image/svg+xml` and `image/png` are the common cases.
    #[must_use]
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.to_ascii_lowercase();
        if mime.contains("svg") {
            Some(Self::Svg)
        } else if mime.contains("png") {
            Some(Self::Png)
        } else {
            None
        }
    }

    /// Canonical MIME type.
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Svg => "image/svg+xml",
            Self::Png => "image/png",
        }
    }
}

/// A file as handed over by the browser or an HTTP upload.
#[derive(Debug, Clone, Copy)]
pub struct UploadedFile<'a> {
    pub file_name: &'a str,
    pub mime_type: &'a str,
    pub bytes: &'a [u8],
}

/// Metadata entered next to the file picker.
#[derive(Debug, Clone, Default)]
pub struct IconDetails {
    /// Display name; defaults to the file name without extension.
    pub name: Option<String>,
    /// Category; defaults to `custom`.
    pub category: Option<String>,
    pub created_by: String,
    pub created_at: String,
}

/// Check type and size.
///
/// # Errors
///
/// Returns [`IngestError`] for a non-SVG/PNG type, a file over the size
/// limit, or an empty file.
pub fn validate_upload(file: &UploadedFile<'_>) -> Result<IconFormat, IngestError> {
    let Some(format) = IconFormat::from_mime(file.mime_type) else {
        return Err(IngestError::UnsupportedType(file.mime_type.to_owned()));
    };
    if file.bytes.len() > MAX_ICON_BYTES {
        return Err(IngestError::TooLarge { size: file.bytes.len(), limit: MAX_ICON_BYTES });
    }
    if file.bytes.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(format)
}

/// Encode bytes as a base64 `data:` URI.
#[must_use]
pub fn to_data_uri(format: IconFormat, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", format.mime(), STANDARD.encode(bytes))
}

/// Re-check artwork that arrives already encoded (from storage or the
/// server) against the upload rules: an SVG or PNG base64 `data:` URI whose
/// decoded size is within the limit.
///
/// # Errors
///
/// Returns [`IngestError::Malformed`] for anything that is not a base64
/// `data:` URI, and the upload errors for a wrong type, size or empty body.
pub fn check_encoded(data_uri: &str) -> Result<IconFormat, IngestError> {
    let Some((header, payload)) = data_uri.strip_prefix("data:").and_then(|rest| rest.split_once(',')) else {
        return Err(IngestError::Malformed);
    };
    let Some(mime) = header.strip_suffix(";base64") else {
        return Err(IngestError::Malformed);
    };
    let format = match IconFormat::from_mime(mime) {
        Some(format) if format.mime() == mime => format,
        _ => return Err(IngestError::UnsupportedType(mime.to_owned())),
    };
    let bytes = STANDARD.decode(payload).map_err(|_| IngestError::Malformed)?;
    validate_upload(&UploadedFile { file_name: "", mime_type: format.mime(), bytes: &bytes })
}

/// File name without its last extension (`"cajon.svg"` → `"cajon"`).
#[must_use]
pub fn default_icon_name(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[..idx].to_owned(),
        _ => file_name.to_owned(),
    }
}

/// Validate an upload and turn it into a catalog-ready custom icon.
///
/// # Errors
///
/// Returns [`IngestError`] when [`validate_upload`] rejects the file.
pub fn ingest(file: &UploadedFile<'_>, details: IconDetails) -> Result<CustomIcon, IngestError> {
    let format = validate_upload(file)?;
    let name = details
        .name
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_icon_name(file.file_name));
    let category = details
        .category
        .map(|c| c.trim().to_owned())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| CUSTOM_CATEGORY.to_owned());

    Ok(CustomIcon {
        id: Uuid::new_v4().to_string(),
        name,
        category,
        svg_data: to_data_uri(format, file.bytes),
        created_by: details.created_by,
        created_at: details.created_at,
    })
}
