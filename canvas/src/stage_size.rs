//! Stage size dialog form.
//!
//! The dialog edits width and depth as free text. With "keep aspect ratio" on,
//! editing one side recomputes the other from the ratio captured when the
//! dialog opened (or when the box was re-checked). Submitting parses both
//! drafts; any invalid value refuses the save and leaves the document as-is.

#[cfg(test)]
#[path = "stage_size_test.rs"]
mod stage_size_test;

use crate::doc::StageSize;

/// Why a stage size was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StageSizeError {
    #[error("{field} must be a number (got {raw:?})")]
    NotANumber { field: &'static str, raw: String },
    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
}

/// Parse one dimension draft.
///
/// # Errors
///
/// Returns [`StageSizeError`] for non-numeric, non-finite or non-positive input.
pub fn parse_dimension(field: &'static str, raw: &str) -> Result<f64, StageSizeError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| StageSizeError::NotANumber { field, raw: raw.to_owned() })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(StageSizeError::NotPositive { field, value });
    }
    Ok(value)
}

/// Parse both drafts into a stage size.
///
/// # Errors
///
/// Returns the first [`StageSizeError`] found, width before height.
pub fn parse_stage_size(width: &str, height: &str) -> Result<StageSize, StageSizeError> {
    let width = parse_dimension("width", width)?;
    let height = parse_dimension("height", height)?;
    StageSize::new(width, height)
}

/// Draft state of the stage size dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSizeForm {
    width: String,
    height: String,
    keep_aspect_ratio: bool,
    aspect_ratio: f64,
}

impl StageSizeForm {
    /// Open the dialog on the current size, with the ratio locked.
    #[must_use]
    pub fn open(current: StageSize) -> Self {
        Self {
            width: current.width().to_string(),
            height: current.height().to_string(),
            keep_aspect_ratio: true,
            aspect_ratio: current.aspect_ratio(),
        }
    }

    #[must_use]
    pub fn width(&self) -> &str {
        &self.width
    }

    #[must_use]
    pub fn height(&self) -> &str {
        &self.height
    }

    #[must_use]
    pub fn keep_aspect_ratio(&self) -> bool {
        self.keep_aspect_ratio
    }

    pub fn set_width(&mut self, value: impl Into<String>) {
        self.width = value.into();
        if !self.keep_aspect_ratio {
            return;
        }
        if let Ok(width) = parse_dimension("width", &self.width) {
            self.height = format!("{:.2}", width / self.aspect_ratio);
        }
    }

    pub fn set_height(&mut self, value: impl Into<String>) {
        self.height = value.into();
        if !self.keep_aspect_ratio {
            return;
        }
        if let Ok(height) = parse_dimension("height", &self.height) {
            self.width = format!("{:.2}", height * self.aspect_ratio);
        }
    }

    /// Toggle the ratio lock. Re-locking captures the ratio of the current drafts.
    pub fn set_keep_aspect_ratio(&mut self, keep: bool) {
        self.keep_aspect_ratio = keep;
        if !keep {
            return;
        }
        if let Ok(size) = parse_stage_size(&self.width, &self.height) {
            self.aspect_ratio = size.aspect_ratio();
        }
    }

    /// Validate the drafts.
    ///
    /// # Errors
    ///
    /// Returns [`StageSizeError`] when either draft is not a positive number.
    pub fn submit(&self) -> Result<StageSize, StageSizeError> {
        parse_stage_size(&self.width, &self.height)
    }
}
