//! Shared numeric constants and name tables for the viewer.

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest scale factor a puppet may be zoomed to.
pub const MIN_ZOOM: f64 = 0.01;

/// Largest scale factor a puppet may be zoomed to.
pub const MAX_ZOOM: f64 = 10.0;

/// Exponent step per wheel notch; one notch scales by `exp(±0.075)`.
pub const ZOOM_SENSITIVITY: f64 = 0.075;

/// Pinches that start with the fingers closer than this (in pixels) never rescale.
pub const PINCH_MIN_DISTANCE: f64 = 1e-6;

// ── Layout ──────────────────────────────────────────────────────

/// Fraction of the viewport a freshly loaded puppet is fitted into.
pub const MODEL_FIT_PADDING: f64 = 0.9;

/// Scale used when a loaded puppet reports unusable dimensions.
pub const FALLBACK_MODEL_SCALE: f64 = 0.1;

// ── Taps ────────────────────────────────────────────────────────

/// Pointer travel (pixels) tolerated before a press stops counting as a tap.
pub const TAP_SLOP_PX: f64 = 0.0;

/// How long region highlights stay lit after a tap, in milliseconds.
pub const HIGHLIGHT_DURATION_MS: u64 = 500;

// ── Trigger resolution ──────────────────────────────────────────

/// Prefixes combined with a struck region name to find trigger groups.
pub const REGION_PREFIXES: [&str; 3] = ["tap_", "flick_", "hit_"];

/// Groups tried, in order, when nothing matched the struck region.
pub const GENERIC_TRIGGER_GROUPS: [&str; 4] = ["tap", "idle", "idletap", "tapbody"];
