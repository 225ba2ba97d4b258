//! Shared constants for sheet layout and quoting
//!
//! This module centralizes the fixed press-room numbers used throughout
//! the production and pricing calculations.

// =============================================================================
// Base Sheet
// =============================================================================

/// Default base sheet width in millimeters (70 × 100 cm stock)
pub const DEFAULT_BASE_SHEET_WIDTH_MM: f64 = 700.0;

/// Default base sheet height in millimeters
pub const DEFAULT_BASE_SHEET_HEIGHT_MM: f64 = 1000.0;

/// Default base sheet as tuple (width, height)
pub const DEFAULT_BASE_SHEET_MM: (f64, f64) =
    (DEFAULT_BASE_SHEET_WIDTH_MM, DEFAULT_BASE_SHEET_HEIGHT_MM);

/// Format values at or below this are read as centimeters ("70x100")
pub const CENTIMETER_FORMAT_LIMIT: f64 = 200.0;

/// Millimeters per centimeter
pub const MM_PER_CM: f64 = 10.0;

// =============================================================================
// Mechanical Margins
// =============================================================================

/// Gripper edge ("pinza"), removed from the useful sheet height
pub const GRIPPER_MARGIN_MM: f64 = 10.0;

/// Tail edge ("cola"), removed from the useful sheet height
pub const TAIL_MARGIN_MM: f64 = 10.0;

/// Side margin, removed from both sides of the useful sheet width
pub const SIDE_MARGIN_MM: f64 = 10.0;

// =============================================================================
// Waste
// =============================================================================

/// Base spoilage percentage applied to every run
pub const BASE_WASTE_PCT: u64 = 3;

/// Every full block of this many useful sheets adds one waste point
pub const WASTE_STEP_SHEETS: u64 = 1000;

/// Waste percentage assumed by the quick-quote ratio when none is given
pub const DEFAULT_QUICK_WASTE_PCT: f64 = 3.0;

// =============================================================================
// Presses
// =============================================================================

/// Simultaneous colors assumed when the press type names no capacity
pub const DEFAULT_COLOR_CAPACITY: u32 = 4;

/// Minutes per hour
pub const MINUTES_PER_HOUR: f64 = 60.0;

// =============================================================================
// Rounding
// =============================================================================

/// Float noise tolerated before rounding a sheet count up
pub const SHEET_EPSILON: f64 = 1e-9;

/// Round to 2 decimals (hours and money)
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Round a fractional sheet count up, ignoring float noise
#[inline]
pub fn ceil_sheets(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    (value - SHEET_EPSILON).ceil().max(0.0) as u64
}
