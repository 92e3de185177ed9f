//! Icon catalog: the static built-in taxonomy plus user-uploaded custom icons.
//!
//! The catalog is the drag source for the canvas. Built-in entries are fixed;
//! custom icons are merged in at read time, either into their own `custom`
//! category or into one of the built-in categories they were filed under.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use serde::{Deserialize, Serialize};

use crate::doc::IconRef;
use crate::payload::DragPayload;

/// Category that uploads land in unless filed elsewhere.
pub const CUSTOM_CATEGORY: &str = "custom";

/// A static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinIcon {
    pub id: &'static str,
    pub label: &'static str,
    pub glyph: &'static str,
    pub category: &'static str,
}

const fn builtin(category: &'static str, id: &'static str, label: &'static str, glyph: &'static str) -> BuiltinIcon {
    BuiltinIcon { id, label, glyph, category }
}

/// Built-in categories in display order.
pub const BUILTIN_CATEGORIES: [&str; 5] = ["drums", "guitars", "mics", "monitors", "keys"];

/// Built-in icons grouped by category, in display order.
pub const BUILTIN_ICONS: [BuiltinIcon; 17] = [
    builtin("drums", "kick", "Kick Drum", "🥁"),
    builtin("drums", "snare", "Snare", "🥁"),
    builtin("drums", "hihat", "Hi-Hat", "🥁"),
    builtin("drums", "tom", "Tom", "🥁"),
    builtin("guitars", "electric-guitar", "Electric Guitar", "🎸"),
    builtin("guitars", "acoustic-guitar", "Acoustic Guitar", "🎸"),
    builtin("guitars", "bass", "Bass Guitar", "🎸"),
    builtin("guitars", "amp", "Amp", "📻"),
    builtin("mics", "vocal-mic", "Vocal Mic", "🎤"),
    builtin("mics", "instrument-mic", "Instrument Mic", "🎤"),
    builtin("mics", "condenser", "Condenser", "🎤"),
    builtin("monitors", "wedge", "Wedge Monitor", "🔊"),
    builtin("monitors", "iem", "In-Ear Monitor", "🎧"),
    builtin("monitors", "sidefill", "Side Fill", "🔊"),
    builtin("keys", "keyboard", "Keyboard", "🎹"),
    builtin("keys", "piano", "Piano", "🎹"),
    builtin("keys", "synth", "Synthesizer", "🎹"),
];

/// Look up a built-in icon by its type identifier.
#[must_use]
pub fn builtin_by_id(id: &str) -> Option<&'static BuiltinIcon> {
    BUILTIN_ICONS.iter().find(|icon| icon.id == id)
}

/// Look up a built-in icon by its exact display label.
#[must_use]
pub fn builtin_by_label(label: &str) -> Option<&'static BuiltinIcon> {
    BUILTIN_ICONS.iter().find(|icon| icon.label == label)
}

/// A user-uploaded icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomIcon {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Inline SVG markup or an image data URI.
    pub svg_data: String,
    pub created_by: String,
    pub created_at: String,
}

/// Sparse edit for a custom icon. Only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomIconPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// One draggable entry as presented by the icon library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub label: String,
    pub icon: IconRef,
    pub category: String,
    pub is_custom: bool,
}

impl CatalogEntry {
    fn from_builtin(icon: &BuiltinIcon) -> Self {
        Self {
            id: icon.id.to_owned(),
            label: icon.label.to_owned(),
            icon: IconRef::Glyph(icon.glyph.to_owned()),
            category: icon.category.to_owned(),
            is_custom: false,
        }
    }

    fn from_custom(icon: &CustomIcon) -> Self {
        Self {
            id: icon.id.clone(),
            label: icon.name.clone(),
            icon: IconRef::Custom(icon.id.clone()),
            category: icon.category.clone(),
            is_custom: true,
        }
    }

    /// The payload written to the drag event when this entry is dragged.
    #[must_use]
    pub fn drag_payload(&self) -> DragPayload {
        let icon = match &self.icon {
            IconRef::Glyph(glyph) => glyph.clone(),
            IconRef::Custom(id) => id.clone(),
        };
        DragPayload {
            id: Some(self.id.clone()),
            label: self.label.clone(),
            icon,
            category: self.category.clone(),
            is_custom: self.is_custom,
        }
    }

    fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.label.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Built-in taxonomy plus the custom icons added in this session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IconCatalog {
    custom: Vec<CustomIcon>,
}

impl IconCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog around previously persisted custom icons.
    #[must_use]
    pub fn with_custom(custom: Vec<CustomIcon>) -> Self {
        Self { custom }
    }

    /// Category names in display order: built-ins first, then `custom`, then
    /// any other category a custom icon was filed under.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = BUILTIN_CATEGORIES.iter().map(|c| (*c).to_owned()).collect();
        out.push(CUSTOM_CATEGORY.to_owned());
        for icon in &self.custom {
            if !out.contains(&icon.category) {
                out.push(icon.category.clone());
            }
        }
        out
    }

    /// Entries in `category` whose label contains `query` (case-insensitive).
    /// Built-ins come before custom icons.
    #[must_use]
    pub fn entries(&self, category: &str, query: &str) -> Vec<CatalogEntry> {
        let builtins = BUILTIN_ICONS
            .iter()
            .filter(|icon| icon.category == category)
            .map(CatalogEntry::from_builtin);
        let custom = self
            .custom
            .iter()
            .filter(|icon| icon.category == category)
            .map(CatalogEntry::from_custom);
        builtins.chain(custom).filter(|entry| entry.matches(query)).collect()
    }

    /// Every entry matching `query`, across all categories.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<CatalogEntry> {
        BUILTIN_ICONS
            .iter()
            .map(CatalogEntry::from_builtin)
            .chain(self.custom.iter().map(CatalogEntry::from_custom))
            .filter(|entry| entry.matches(query))
            .collect()
    }

    /// Find an entry by type identifier or custom icon id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<CatalogEntry> {
        builtin_by_id(id)
            .map(CatalogEntry::from_builtin)
            .or_else(|| self.custom(id).map(CatalogEntry::from_custom))
    }

    /// The custom icons, oldest first.
    #[must_use]
    pub fn custom_icons(&self) -> &[CustomIcon] {
        &self.custom
    }

    #[must_use]
    pub fn custom(&self, id: &str) -> Option<&CustomIcon> {
        self.custom.iter().find(|icon| icon.id == id)
    }

    pub fn add_custom(&mut self, icon: CustomIcon) {
        self.custom.push(icon);
    }

    /// Apply a sparse edit. Returns false if the icon doesn't exist.
    pub fn update_custom(&mut self, id: &str, patch: &CustomIconPatch) -> bool {
        let Some(icon) = self.custom.iter_mut().find(|icon| icon.id == id) else {
            return false;
        };
        if let Some(name) = &patch.name {
            icon.name.clone_from(name);
        }
        if let Some(category) = &patch.category {
            icon.category.clone_from(category);
        }
        true
    }

    /// Remove a custom icon by id, returning it if it was present.
    ///
    /// Items already placed with this icon keep their reference.
    pub fn remove_custom(&mut self, id: &str) -> Option<CustomIcon> {
        let idx = self.custom.iter().position(|icon| icon.id == id)?;
        Some(self.custom.remove(idx))
    }
}
