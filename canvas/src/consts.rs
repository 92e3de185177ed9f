//! Shared numeric constants for the canvas crate.

// ── Placement ───────────────────────────────────────────────────

/// Lower bound for item positions, in percent of the canvas.
pub const POSITION_MIN: f64 = 0.0;

/// Upper bound for item positions, in percent of the canvas.
pub const POSITION_MAX: f64 = 100.0;

/// Smallest allowed item scale.
pub const SCALE_MIN: f64 = 0.3;

/// Largest allowed item scale.
pub const SCALE_MAX: f64 = 3.0;

/// Scale change applied by the enlarge/shrink menu buttons.
pub const RESIZE_STEP: f64 = 0.1;

/// Offset in percentage points applied on both axes to a duplicate.
pub const DUPLICATE_OFFSET: f64 = 5.0;

/// Rotation applied by the rotate menu button, in degrees.
pub const ROTATE_STEP_DEG: f64 = 90.0;

/// Rendered side of an item at scale 1.0, in CSS pixels.
pub const ITEM_BASE_SIZE_PX: f64 = 48.0;

// ── Interaction ─────────────────────────────────────────────────

/// Maximum gap between two clicks on the same item that opens the action menu.
pub const DOUBLE_CLICK_WINDOW_MS: f64 = 300.0;

/// Pointer travel after a press, in CSS pixels, before it becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 3.0;

// ── Viewport ────────────────────────────────────────────────────

/// Logical canvas width at 100 % zoom, in CSS pixels.
pub const CANVAS_BASE_WIDTH_PX: f64 = 800.0;

/// Logical canvas height at 100 % zoom, in CSS pixels.
pub const CANVAS_BASE_HEIGHT_PX: f64 = 600.0;

pub const ZOOM_MIN_PERCENT: u32 = 50;
pub const ZOOM_MAX_PERCENT: u32 = 200;
pub const ZOOM_STEP_PERCENT: u32 = 10;
pub const ZOOM_DEFAULT_PERCENT: u32 = 100;

// ── Document defaults ───────────────────────────────────────────

/// Default stage width in meters.
pub const DEFAULT_STAGE_WIDTH_M: f64 = 12.0;

/// Default stage depth in meters.
pub const DEFAULT_STAGE_HEIGHT_M: f64 = 9.0;

// ── Ingestion / persistence ─────────────────────────────────────

/// Largest accepted custom icon upload, in bytes.
pub const MAX_ICON_BYTES: usize = 500_000;

/// Storage namespace for the persisted snapshot.
pub const STORAGE_KEY: &str = "stage-plot-storage";

/// Current snapshot shape.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;
