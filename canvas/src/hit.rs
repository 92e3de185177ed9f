#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::ITEM_BASE_SIZE_PX;
use crate::doc::{ItemId, StageDocument, StageItem};
use crate::viewport::{CanvasBounds, Point};

/// Rendered center of an item in client coordinates.
#[must_use]
pub fn item_center(item: &StageItem, bounds: &CanvasBounds) -> Point {
    bounds.percent_to_client(Point::new(item.position.x, item.position.y))
}

/// Half the rendered side of an item, in CSS pixels.
#[must_use]
pub fn half_extent_px(item: &StageItem) -> f64 {
    ITEM_BASE_SIZE_PX * item.scale * 0.5
}

/// Whether `client` falls inside the item's rendered (rotated) square.
#[must_use]
pub fn item_contains(item: &StageItem, bounds: &CanvasBounds, client: Point) -> bool {
    let d = client.sub(item_center(item, bounds));
    let (sin, cos) = (-item.position.rotation.to_radians()).sin_cos();
    let local_x = d.x * cos - d.y * sin;
    let local_y = d.x * sin + d.y * cos;
    let half = half_extent_px(item);
    local_x.abs() <= half && local_y.abs() <= half
}

/// Topmost item under `client`, if any. Later items sit on top.
#[must_use]
pub fn hit_test(client: Point, doc: &StageDocument, bounds: &CanvasBounds) -> Option<ItemId> {
    doc.items()
        .iter()
        .rev()
        .find(|item| item_contains(item, bounds, client))
        .map(|item| item.id)
}
