//! Console input list derived from the placed items.
//!
//! [`derive`] is a pure projection of the document: channel numbers follow
//! item order, sources come from a fixed instrument table, and phantom power
//! is flagged for condenser-class types. Nothing here is stored; the list is
//! recomputed on every read.

#[cfg(test)]
#[path = "input_list_test.rs"]
mod input_list_test;

use serde::Serialize;

use crate::doc::StageItem;

/// Placeholder source for instrument types with no suggestion.
pub const UNKNOWN_SOURCE: &str = "TBD";

/// Substring of a type identifier that marks a condenser-class microphone.
pub const CONDENSER_MARKER: &str = "condenser";

const SOURCE_TABLE: [(&str, &str); 7] = [
    ("kick", "AKG D112"),
    ("snare", "Shure SM57"),
    ("tom", "Sennheiser MD 421"),
    ("vocal-mic", "Shure SM58"),
    ("electric-guitar", "Shure SM57"),
    ("bass", "DI Box + SM57"),
    ("keyboard", "DI (Stereo)"),
];

/// One mixing-console input channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputChannel {
    /// 1-based, in item order.
    pub channel_number: usize,
    pub instrument_label: String,
    pub suggested_source: String,
    pub phantom_power_required: bool,
}

/// Suggested microphone or DI for an instrument type, or `"TBD"`.
#[must_use]
pub fn suggest_source(kind: &str) -> &'static str {
    SOURCE_TABLE
        .iter()
        .find(|(k, _)| *k == kind)
        .map_or(UNKNOWN_SOURCE, |(_, source)| source)
}

/// Whether an instrument type needs +48V. Case-sensitive substring match.
#[must_use]
pub fn needs_phantom_power(kind: &str) -> bool {
    kind.contains(CONDENSER_MARKER)
}

/// Map items to console channels, preserving order.
#[must_use]
pub fn derive(items: &[StageItem]) -> Vec<InputChannel> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| InputChannel {
            channel_number: index + 1,
            instrument_label: item.label.clone(),
            suggested_source: suggest_source(&item.kind).to_owned(),
            phantom_power_required: needs_phantom_power(&item.kind),
        })
        .collect()
}
