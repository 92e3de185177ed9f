//! Drag payload wire format.
//!
//! When an icon is dragged out of the library, the host serializes a
//! [`DragPayload`] as JSON into the drag event. The drop handler parses it
//! back with [`DragPayload::parse`]; anything that does not parse is an
//! ignorable drop, never a crash.

#[cfg(test)]
#[path = "payload_test.rs"]
mod payload_test;

use serde::{Deserialize, Serialize};

use crate::catalog::builtin_by_label;
use crate::doc::IconRef;

/// Errors from decoding a drop payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("drag payload is empty")]
    Empty,
    #[error("malformed drag payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("drag payload has no label")]
    MissingLabel,
}

/// `{id, label, icon, category, isCustom}` as written by the icon library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPayload {
    /// Catalog type identifier or custom icon id. Older hosts omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    /// Glyph for built-ins, custom icon id for uploads.
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub is_custom: bool,
}

impl DragPayload {
    /// Parse a raw drag-event string.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] for blank input, invalid JSON, a JSON shape
    /// that doesn't match, or a blank label.
    pub fn parse(raw: &str) -> Result<Self, PayloadError> {
        if raw.trim().is_empty() {
            return Err(PayloadError::Empty);
        }
        let payload: DragPayload = serde_json::from_str(raw)?;
        if payload.label.trim().is_empty() {
            return Err(PayloadError::MissingLabel);
        }
        Ok(payload)
    }

    /// Serialize for the drag event.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Type identifier for the placed item.
    ///
    /// Uses the explicit `id` when present, otherwise the built-in entry with
    /// the same label, otherwise a slug of the label.
    #[must_use]
    pub fn kind(&self) -> String {
        if let Some(id) = self.id.as_deref().filter(|id| !id.trim().is_empty()) {
            return id.to_owned();
        }
        if !self.is_custom {
            if let Some(builtin) = builtin_by_label(self.label.trim()) {
                return builtin.id.to_owned();
            }
        }
        slugify(&self.label)
    }

    /// Artwork reference for the placed item.
    #[must_use]
    pub fn icon_ref(&self) -> IconRef {
        if self.is_custom {
            let id = self
                .id
                .as_deref()
                .filter(|id| !id.is_empty())
                .unwrap_or(&self.icon);
            return IconRef::Custom(id.to_owned());
        }
        IconRef::Glyph(self.icon.clone())
    }
}

/// Lowercase `label`, collapsing every run of non-alphanumerics into one `-`.
#[must_use]
pub fn slugify(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for ch in label.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}
