//! Shared numeric constants for the editor crate.

// ── Level defaults ──────────────────────────────────────────────

/// Canvas width used for new levels and levels stored without dimensions.
pub const DEFAULT_LEVEL_WIDTH: f64 = 800.0;

/// Canvas height used for new levels and levels stored without dimensions.
pub const DEFAULT_LEVEL_HEIGHT: f64 = 600.0;

/// Minimum margin between the container edge and the level, in screen pixels.
pub const LEVEL_PADDING_PX: f64 = 100.0;

// ── Selection ───────────────────────────────────────────────────

/// A marquee must exceed this size on at least one axis to select anything.
pub const DRAG_SELECT_THRESHOLD: f64 = 5.0;

/// Screen-space hit slop in pixels for resize handles.
pub const HANDLE_RADIUS_PX: f64 = 8.0;

// ── Editing ─────────────────────────────────────────────────────

/// Smallest width or height a resize may produce.
pub const MIN_OBJECT_SIZE: f64 = 5.0;

/// Arrow-key nudge distance.
pub const NUDGE_STEP: f64 = 1.0;

/// Arrow-key nudge distance with shift held.
pub const NUDGE_STEP_LARGE: f64 = 10.0;

/// Display name given to synthetic group objects.
pub const GROUP_NAME: &str = "Group";

// ── Palette sizing ──────────────────────────────────────────────

/// Default placement size for small item categories (fruit, stones, ...).
pub const ITEM_DEFAULT_SIZE: f64 = 64.0;

/// Largest side allowed when sizing large assets (islands, start points).
pub const LARGE_ASSET_MAX_DIM: f64 = 128.0;
