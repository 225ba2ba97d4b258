//! Sheet geometry resolution
//!
//! Works out which stock sheet a job is printed from and, when the stock
//! is cut down before printing, the size of the useful sheet fed to the
//! press and how many of them one base sheet yields.

use crate::catalog::Material;
use crate::constants::*;
use crate::job::{CutSheetRequest, JobInput, both_positive};
use crate::types::*;
use regex::Regex;
use std::sync::LazyLock;

/// Two numbers joined by `x`, `X` or `×`, e.g. "70x100" or "72,5 × 102"
const SHEET_FORMAT_PATTERN: &str = r"([0-9]+(?:[.,][0-9]+)?)\s*[xX×]\s*([0-9]+(?:[.,][0-9]+)?)";

static SHEET_FORMAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(SHEET_FORMAT_PATTERN).expect("valid regex"));

// =============================================================================
// Base Sheet
// =============================================================================

/// Resolve the base sheet size in millimeters.
///
/// First match wins:
/// 1. explicit base sheet width/height
/// 2. explicit pliego width/height
/// 3. the job's named format string
/// 4. the material's declared base format
/// 5. the 700×1000 mm default
pub fn resolve_base_sheet(job: &JobInput, material: Option<&Material>) -> (f64, f64) {
    if let Some(size) = both_positive(job.base_sheet_width_mm, job.base_sheet_height_mm) {
        log::debug!("Base sheet from explicit dimensions: {:?}", size);
        return size;
    }

    if let Some(size) = both_positive(job.pliego_width_mm, job.pliego_height_mm) {
        log::debug!("Base sheet from pliego dimensions: {:?}", size);
        return size;
    }

    if let Some(size) = job.sheet_format.as_deref().and_then(parse_sheet_format) {
        log::debug!("Base sheet from format {:?}: {:?}", job.sheet_format, size);
        return size;
    }

    if let Some(size) = material
        .and_then(|m| m.formato_base.as_deref())
        .and_then(parse_sheet_format)
    {
        log::debug!("Base sheet from material format: {:?}", size);
        return size;
    }

    DEFAULT_BASE_SHEET_MM
}

/// Parse a "WxH" sheet format into millimeters.
///
/// Accepts `x`, `X` or `×` as separator and comma or dot decimals; any
/// surrounding text is ignored. When both numbers are at most 200 they
/// are read as centimeters. Returns `None` when no "AxB" pattern with two
/// positive numbers is found.
pub fn parse_sheet_format(format: &str) -> Option<(f64, f64)> {
    SHEET_FORMAT_RE.captures_iter(format).find_map(|caps| {
        let first = parse_decimal(&caps[1])?;
        let second = parse_decimal(&caps[2])?;
        (first > 0.0 && second > 0.0).then(|| to_millimeters(first, second))
    })
}

/// Comma or dot decimal mark
fn parse_decimal(text: &str) -> Option<f64> {
    text.replace(',', ".").parse().ok()
}

fn to_millimeters(first: f64, second: f64) -> (f64, f64) {
    if first <= CENTIMETER_FORMAT_LIMIT && second <= CENTIMETER_FORMAT_LIMIT {
        (first * MM_PER_CM, second * MM_PER_CM)
    } else {
        (first, second)
    }
}

// =============================================================================
// Sheet Context
// =============================================================================

/// Derive the full sheet context for a job: base sheet, cut mode, useful
/// sheet and pieces per base sheet.
pub fn resolve_sheet_context(job: &JobInput, material: Option<&Material>) -> SheetContext {
    let base_sheet_mm = resolve_base_sheet(job, material);

    match job.cut_sheet.as_ref() {
        Some(request) if request.mode == CutMode::Fraction => {
            fraction_context(base_sheet_mm, request)
        }
        Some(request) if request.mode == CutMode::Custom => {
            custom_context(base_sheet_mm, request)
        }
        _ => SheetContext {
            base_sheet_mm,
            use_cut_sheet: false,
            cut_mode: CutMode::None,
            cut_fraction: None,
            useful_sheet_mm: base_sheet_mm,
            pieces_per_base: 1,
            warnings: Vec::new(),
        },
    }
}

fn fraction_context(base_sheet_mm: (f64, f64), request: &CutSheetRequest) -> SheetContext {
    let fraction = request
        .fraction
        .as_deref()
        .and_then(CutFraction::parse)
        .unwrap_or_default();

    SheetContext {
        base_sheet_mm,
        use_cut_sheet: true,
        cut_mode: CutMode::Fraction,
        cut_fraction: Some(fraction),
        useful_sheet_mm: split_sheet(base_sheet_mm, fraction.pieces()),
        pieces_per_base: fraction.pieces(),
        warnings: Vec::new(),
    }
}

/// Split a sheet into equal strips, shrinking the axis whose strip stays
/// larger so the useful sheet is as square as possible.
pub fn split_sheet((base_w, base_h): (f64, f64), pieces: u32) -> (f64, f64) {
    let pieces = pieces.max(1) as f64;
    let candidate_w = base_w / pieces;
    let candidate_h = base_h / pieces;

    if candidate_w >= candidate_h {
        (round2(candidate_w), round2(base_h))
    } else {
        (round2(base_w), round2(candidate_h))
    }
}

fn custom_context(base_sheet_mm: (f64, f64), request: &CutSheetRequest) -> SheetContext {
    let mut warnings = Vec::new();

    let useful = both_positive(request.useful_width_mm, request.useful_height_mm);
    if useful.is_none() {
        push_unique(&mut warnings, "define width/height of custom useful sheet");
    }
    let useful_sheet_mm = useful.unwrap_or(base_sheet_mm);

    let pieces_per_base = match request.pieces_per_base.filter(|&p| p > 0) {
        Some(pieces) => pieces.min(u32::MAX as i64) as u32,
        None => {
            let estimate = estimate_pieces_per_base(base_sheet_mm, useful_sheet_mm);
            if estimate == 0 {
                push_unique(&mut warnings, "custom useful sheet does not fit the base sheet");
            }
            estimate.max(1)
        }
    };

    SheetContext {
        base_sheet_mm,
        use_cut_sheet: true,
        cut_mode: CutMode::Custom,
        cut_fraction: None,
        useful_sheet_mm,
        pieces_per_base,
        warnings,
    }
}

/// Rectangle-count estimate of useful sheets per base sheet, trying both
/// orientations. This is a floor-division approximation, not a packing
/// solver: mixed orientations on one sheet are never considered.
pub fn estimate_pieces_per_base(
    (base_w, base_h): (f64, f64),
    (useful_w, useful_h): (f64, f64),
) -> u32 {
    let count = |w: f64, h: f64| -> u32 {
        if w <= 0.0 || h <= 0.0 {
            return 0;
        }
        let across = (base_w / w).floor() as u32;
        let down = (base_h / h).floor() as u32;
        across.saturating_mul(down)
    };

    count(useful_w, useful_h).max(count(useful_h, useful_w))
}

// =============================================================================
// Tests
// =============================================================================
