//! Shared numeric constants for the canvas crate.

// ── Notes ───────────────────────────────────────────────────────

/// Width of a freshly created note, in canvas units.
pub const DEFAULT_NOTE_WIDTH: f64 = 400.0;

/// Height of a freshly created note, in canvas units.
pub const DEFAULT_NOTE_HEIGHT: f64 = 300.0;

/// Resize floor for note width.
pub const MIN_NOTE_WIDTH: f64 = 250.0;

/// Resize floor for note height.
pub const MIN_NOTE_HEIGHT: f64 = 150.0;

/// Diagonal offset between consecutive auto-placed notes.
pub const STAGGER_STEP: f64 = 30.0;

/// Number of stagger steps before placement wraps back to the center.
pub const STAGGER_CYCLE: usize = 10;

// ── History ─────────────────────────────────────────────────────

/// Maximum number of snapshots retained by the undo/redo history.
pub const HISTORY_LIMIT: usize = 50;

// ── Viewport ────────────────────────────────────────────────────

/// Smallest zoom factor the viewport allows by default.
pub const MIN_ZOOM: f64 = 0.1;

/// Largest zoom factor the viewport allows by default.
pub const MAX_ZOOM: f64 = 4.0;

/// Exponential zoom rate per wheel pixel.
pub const WHEEL_ZOOM_RATE: f64 = 0.002;

// ── Note chrome (canvas units) ──────────────────────────────────

/// Height of the drag bar along the top edge of a note.
pub const DRAG_BAR_HEIGHT: f64 = 32.0;

/// Side of the square resize handle in the bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f64 = 48.0;

/// Side of the square delete button.
pub const DELETE_BUTTON_SIZE: f64 = 24.0;

/// Inset of the delete button from the top and right edges.
pub const DELETE_BUTTON_INSET: f64 = 12.0;

/// Side of a single color swatch.
pub const SWATCH_SIZE: f64 = 20.0;

/// Distance between the left edges of adjacent swatches.
pub const SWATCH_PITCH: f64 = 28.0;

/// Gap between the swatch row and the bottom edge of a note.
pub const SWATCH_BOTTOM_INSET: f64 = 20.0;
