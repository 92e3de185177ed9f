//! Document model: placed stage items, stage dimensions and project metadata.
//!
//! This module defines what is on the stage (`StageItem`), how big the stage
//! is in the real world (`StageSize`), and the in-memory store that owns the
//! placed items in z-order (`StageDocument`).
//!
//! Positions are percentages of the canvas, so changing the stage size or the
//! view zoom never rescales items. Every path that puts an item into the
//! document normalizes it first: `x`/`y` land in `[0, 100]` and `scale` in
//! `[0.3, 3.0]`.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::builtin_by_id;
use crate::consts::{DEFAULT_STAGE_HEIGHT_M, DEFAULT_STAGE_WIDTH_M, SCALE_MAX, SCALE_MIN};
use crate::payload::slugify;
use crate::stage_size::StageSizeError;
use crate::viewport::clamp_percent;

/// Unique identifier for a placed item.
pub type ItemId = Uuid;

/// Where an item's artwork comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum IconRef {
    /// Built-in catalog glyph (an emoji in the default catalog).
    Glyph(String),
    /// Id of a user-uploaded custom icon.
    Custom(String),
}

/// Normalized placement of an item on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemPosition {
    /// Horizontal center in percent of canvas width.
    #[serde(default = "center_percent")]
    pub x: f64,
    /// Vertical center in percent of canvas height.
    #[serde(default = "center_percent")]
    pub y: f64,
    /// Clockwise rotation in degrees. Unconstrained.
    #[serde(default)]
    pub rotation: f64,
}

fn center_percent() -> f64 {
    50.0
}

impl Default for ItemPosition {
    fn default() -> Self {
        Self::new(center_percent(), center_percent())
    }
}

impl ItemPosition {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, rotation: 0.0 }
    }

    /// Copy of this position with both axes clamped into `[0, 100]`.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self { x: clamp_percent(self.x), y: clamp_percent(self.y), rotation: self.rotation }
    }
}

/// One placed piece of equipment.
///
/// Deserialization goes through [`RawStageItem`] so that older or partial
/// shapes still load: every field has a fallback, and an id that is not a
/// UUID is replaced by a fresh one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawStageItem")]
pub struct StageItem {
    /// Assigned at creation, never changes.
    pub id: ItemId,
    /// Catalog type identifier (`kick`, `vocal-mic`, a custom icon id, ...).
    pub kind: String,
    /// Display text; defaults to the catalog name.
    pub label: String,
    /// Artwork reference, fixed at placement.
    pub icon: IconRef,
    /// Catalog category inherited at placement time.
    pub category: String,
    pub position: ItemPosition,
    /// Multiplier on the base render size.
    pub scale: f64,
    /// Whether the label is drawn under the icon.
    pub show_label: bool,
}

fn default_scale() -> f64 {
    1.0
}

/// Artwork as stored: the tagged form, or a bare glyph string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawIcon {
    Tagged(IconRef),
    Plain(String),
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawStageItem {
    id: Option<serde_json::Value>,
    kind: Option<String>,
    label: Option<String>,
    icon: Option<RawIcon>,
    category: Option<String>,
    position: Option<ItemPosition>,
    scale: Option<f64>,
    show_label: bool,
}

fn stored_id(raw: Option<&serde_json::Value>) -> ItemId {
    if let Some(Ok(id)) = raw.and_then(serde_json::Value::as_str).map(Uuid::parse_str) {
        return id;
    }
    log::debug!("stage item id {raw:?} is not a UUID; assigning a new one");
    Uuid::new_v4()
}

impl From<RawStageItem> for StageItem {
    fn from(raw: RawStageItem) -> Self {
        let id = stored_id(raw.id.as_ref());
        let label = raw.label.unwrap_or_default();
        let kind = raw
            .kind
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| slugify(&label));
        let builtin = builtin_by_id(&kind);
        let icon = match raw.icon {
            Some(RawIcon::Tagged(icon)) => icon,
            Some(RawIcon::Plain(glyph)) => IconRef::Glyph(glyph),
            None => IconRef::Glyph(builtin.map(|b| b.glyph.to_owned()).unwrap_or_default()),
        };
        let label = if label.is_empty() {
            builtin.map_or_else(|| kind.clone(), |b| b.label.to_owned())
        } else {
            label
        };
        let category = raw
            .category
            .or_else(|| builtin.map(|b| b.category.to_owned()))
            .unwrap_or_default();

        Self {
            id,
            kind,
            label,
            icon,
            category,
            position: raw.position.unwrap_or_default(),
            scale: raw.scale.unwrap_or_else(default_scale),
            show_label: raw.show_label,
        }
    }
}

/// Clamp a scale factor into `[0.3, 3.0]`. NaN maps to 1.0.
#[must_use]
pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_nan() {
        return default_scale();
    }
    scale.clamp(SCALE_MIN, SCALE_MAX)
}

impl StageItem {
    /// Create a freshly placed item: new id, scale 1.0, rotation 0, label hidden.
    #[must_use]
    pub fn new(kind: impl Into<String>, label: impl Into<String>, icon: IconRef, category: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: kind.into(),
            label: label.into(),
            icon,
            category: category.into(),
            position: ItemPosition::new(x, y).clamped(),
            scale: 1.0,
            show_label: false,
        }
    }

    /// Copy of this item with position and scale forced into range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.position = self.position.clamped();
        self.scale = clamp_scale(self.scale);
        self
    }
}

/// Physical stage dimensions in meters. Both sides are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStageSize")]
pub struct StageSize {
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawStageSize {
    width: f64,
    height: f64,
}

impl TryFrom<RawStageSize> for StageSize {
    type Error = StageSizeError;

    fn try_from(raw: RawStageSize) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl Default for StageSize {
    fn default() -> Self {
        Self { width: DEFAULT_STAGE_WIDTH_M, height: DEFAULT_STAGE_HEIGHT_M }
    }
}

impl StageSize {
    /// Validate and build a stage size.
    ///
    /// # Errors
    ///
    /// Returns [`StageSizeError::NotPositive`] unless both sides are finite and > 0.
    pub fn new(width: f64, height: f64) -> Result<Self, StageSizeError> {
        if !width.is_finite() || width <= 0.0 {
            return Err(StageSizeError::NotPositive { field: "width", value: width });
        }
        if !height.is_finite() || height <= 0.0 {
            return Err(StageSizeError::NotPositive { field: "height", value: height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Band contact block shown on the rider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub manager: String,
}

/// Project metadata stored next to the stage plot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub band_name: String,
    pub contact_info: ContactInfo,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl Project {
    /// A fresh, unnamed project stamped with `now`.
    #[must_use]
    pub fn new(now: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "New Stage Plot".into(),
            band_name: String::new(),
            contact_info: ContactInfo::default(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// In-memory stage plot: dimensions plus placed items in z-order.
///
/// Insertion order is render order (later items draw on top). There is
/// exactly one writer, so every mutation applies immediately in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageDocument {
    stage_size: StageSize,
    items: Vec<StageItem>,
}

impl StageDocument {
    /// Create an empty document with the default 12 m × 9 m stage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item on top of the stack.
    pub fn append(&mut self, item: StageItem) {
        self.items.push(item.normalized());
    }

    /// Replace an item by id with `f(old)`. The id is preserved and the result
    /// normalized. Returns the stored item, or `None` when the id is unknown.
    pub fn update<F>(&mut self, id: &ItemId, f: F) -> Option<&StageItem>
    where
        F: FnOnce(&StageItem) -> StageItem,
    {
        let idx = self.index_of(id)?;
        let mut next = f(&self.items[idx]).normalized();
        next.id = *id;
        self.items[idx] = next;
        self.items.get(idx)
    }

    /// Remove an item by id, returning it if it was present.
    pub fn remove(&mut self, id: &ItemId) -> Option<StageItem> {
        let idx = self.index_of(id)?;
        Some(self.items.remove(idx))
    }

    /// Replace all items (bulk import). Items are normalized on the way in.
    pub fn replace_items(&mut self, items: Vec<StageItem>) {
        self.items = items.into_iter().map(StageItem::normalized).collect();
    }

    /// Return a reference to an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&StageItem> {
        self.items.iter().find(|item| item.id == *id)
    }

    /// Position of an item in z-order.
    #[must_use]
    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }

    /// All items in z-order, bottom first.
    #[must_use]
    pub fn items(&self) -> &[StageItem] {
        &self.items
    }

    #[must_use]
    pub fn stage_size(&self) -> StageSize {
        self.stage_size
    }

    /// Set the physical stage size. Item positions are left untouched.
    pub fn set_stage_size(&mut self, size: StageSize) {
        self.stage_size = size;
    }

    /// Number of placed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if nothing is placed on the stage.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
