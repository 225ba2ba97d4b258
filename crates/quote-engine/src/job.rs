//! Job payload
//!
//! The caller's job as received, plus accessors that clamp and default
//! each value before the engine uses it.

use crate::constants::DEFAULT_QUICK_WASTE_PCT;
use crate::types::*;
use crate::work_type::WorkType;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Press requested for a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressSelection {
    /// Cheapest active press from the catalog
    #[default]
    Auto,
    Id(u64),
}

impl PressSelection {
    /// Requested press id; `None` means auto-select. Id 0 is read as auto.
    pub fn id(self) -> Option<u64> {
        match self {
            PressSelection::Id(id) if id > 0 => Some(id),
            _ => None,
        }
    }
}

/// Cut-down sheet request
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CutSheetRequest {
    pub mode: CutMode,
    /// "1/2", "1/3" or "1/4" in fraction mode
    pub fraction: Option<String>,
    /// Useful sheet size in custom mode
    pub useful_width_mm: Option<f64>,
    pub useful_height_mm: Option<f64>,
    /// Explicit useful sheets per base sheet in custom mode
    pub pieces_per_base: Option<i64>,
}

/// Caller-provided job. Raw values are kept as given; the accessors
/// apply the clamping and defaulting rules.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JobInput {
    // Run
    pub quantity: i64,
    pub work_type: String,

    // Piece
    pub piece_width_mm: f64,
    pub piece_height_mm: f64,
    pub bleed_mm: f64,
    /// Ink counts as "F/B"
    pub colors: Option<String>,
    pub special_colors: Option<String>,

    // Sheet selection, in precedence order
    pub base_sheet_width_mm: Option<f64>,
    pub base_sheet_height_mm: Option<f64>,
    pub pliego_width_mm: Option<f64>,
    pub pliego_height_mm: Option<f64>,
    /// Named format such as "70x100" (cm) or "700x1000" (mm)
    pub sheet_format: Option<String>,
    pub cut_sheet: Option<CutSheetRequest>,

    // Imposition and waste
    pub forms_per_sheet: Option<i64>,
    pub manual_imposition: bool,
    pub waste_pct: Option<f64>,

    // Pricing
    pub margin_pct: f64,
    pub material_id: Option<u64>,
    pub press: PressSelection,
    pub process_ids: Vec<u64>,
    pub hours: Option<f64>,
    /// Honored only for privileged callers
    pub cost_per_hour: Option<f64>,

    // Work-type fields
    pub pages: Option<i64>,
    pub die_cut: bool,
    pub binding: Option<String>,
    pub roll_material: Option<String>,
    pub anilox: Option<String>,
    pub cylinder: Option<String>,
    pub cover_weight_gsm: Option<f64>,
    pub interior_weight_gsm: Option<f64>,
    pub double_sheet: bool,
}

impl Default for JobInput {
    fn default() -> Self {
        Self {
            quantity: 1,
            work_type: WorkType::Otro.as_str().to_string(),
            piece_width_mm: 0.0,
            piece_height_mm: 0.0,
            bleed_mm: 0.0,
            colors: None,
            special_colors: None,
            base_sheet_width_mm: None,
            base_sheet_height_mm: None,
            pliego_width_mm: None,
            pliego_height_mm: None,
            sheet_format: None,
            cut_sheet: None,
            forms_per_sheet: None,
            manual_imposition: false,
            waste_pct: None,
            margin_pct: 0.0,
            material_id: None,
            press: PressSelection::Auto,
            process_ids: Vec::new(),
            hours: None,
            cost_per_hour: None,
            pages: None,
            die_cut: false,
            binding: None,
            roll_material: None,
            anilox: None,
            cylinder: None,
            cover_weight_gsm: None,
            interior_weight_gsm: None,
            double_sheet: false,
        }
    }
}

impl JobInput {
    /// Load a job from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let job = serde_json::from_slice(&bytes)
            .map_err(|e| QuoteError::Config(format!("Failed to parse job: {}", e)))?;
        Ok(job)
    }

    /// Save the job to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| QuoteError::Config(format!("Failed to serialize job: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn work_type(&self) -> WorkType {
        WorkType::from_tag(&self.work_type)
    }

    pub fn quantity(&self) -> u64 {
        self.quantity.max(1) as u64
    }

    pub fn bleed_mm(&self) -> f64 {
        non_negative(self.bleed_mm)
    }

    /// Piece size without bleed (width, height)
    pub fn piece_mm(&self) -> (f64, f64) {
        (non_negative(self.piece_width_mm), non_negative(self.piece_height_mm))
    }

    /// Piece size with bleed added on every edge
    pub fn piece_with_bleed_mm(&self) -> (f64, f64) {
        let (w, h) = self.piece_mm();
        let bleed = self.bleed_mm();
        if bleed > 0.0 {
            (w + 2.0 * bleed, h + 2.0 * bleed)
        } else {
            (w, h)
        }
    }

    pub fn has_piece_geometry(&self) -> bool {
        let (w, h) = self.piece_mm();
        w > 0.0 && h > 0.0
    }

    /// Parsed ink counts, "0/0" when absent
    pub fn colors(&self) -> Colors {
        self.colors.as_deref().map(Colors::parse).unwrap_or_default()
    }

    pub fn margin_pct(&self) -> f64 {
        non_negative(self.margin_pct)
    }

    pub fn pages(&self) -> Option<u32> {
        self.pages
            .filter(|&p| p > 0)
            .map(|p| p.min(u32::MAX as i64) as u32)
    }

    pub fn hours(&self) -> Option<f64> {
        positive(self.hours)
    }

    pub fn cost_per_hour(&self) -> Option<f64> {
        positive(self.cost_per_hour)
    }

    /// Manual imposition, only when enabled and > 0
    pub fn forms_per_sheet_override(&self) -> Option<u64> {
        if !self.manual_imposition {
            return None;
        }
        self.forms_per_sheet.filter(|&f| f > 0).map(|f| f as u64)
    }

    /// Forms per sheet for the flat-ratio path (at least 1)
    pub fn quick_forms_per_sheet(&self) -> u64 {
        self.forms_per_sheet.unwrap_or(1).max(1) as u64
    }

    /// Waste percentage for the flat-ratio path
    pub fn quick_waste_pct(&self) -> f64 {
        self.waste_pct
            .filter(|w| w.is_finite())
            .map(|w| w.max(0.0))
            .unwrap_or(DEFAULT_QUICK_WASTE_PCT)
    }

    /// Whether any explicit sheet source (dimensions or format) is given
    pub fn has_sheet_source(&self) -> bool {
        both_positive(self.base_sheet_width_mm, self.base_sheet_height_mm).is_some()
            || both_positive(self.pliego_width_mm, self.pliego_height_mm).is_some()
            || has_text(&self.sheet_format)
    }
}

/// Both dimensions when each is > 0
pub(crate) fn both_positive(width: Option<f64>, height: Option<f64>) -> Option<(f64, f64)> {
    match (positive(width), positive(height)) {
        (Some(w), Some(h)) => Some((w, h)),
        _ => None,
    }
}

pub(crate) fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;

    impl Serialize for PressSelection {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            match self {
                PressSelection::Auto => serializer.serialize_str("auto"),
                PressSelection::Id(id) => serializer.serialize_u64(*id),
            }
        }
    }

    impl<'de> Deserialize<'de> for PressSelection {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, Visitor};
            use std::fmt;

            struct PressSelectionVisitor;

            impl<'de> Visitor<'de> for PressSelectionVisitor {
                type Value = PressSelection;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a press id or \"auto\"")
                }

                fn visit_u64<E>(self, value: u64) -> std::result::Result<PressSelection, E>
                where
                    E: de::Error,
                {
                    Ok(match value {
                        0 => PressSelection::Auto,
                        id => PressSelection::Id(id),
                    })
                }

                fn visit_i64<E>(self, value: i64) -> std::result::Result<PressSelection, E>
                where
                    E: de::Error,
                {
                    if value <= 0 {
                        Ok(PressSelection::Auto)
                    } else {
                        self.visit_u64(value as u64)
                    }
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<PressSelection, E>
                where
                    E: de::Error,
                {
                    let value = value.trim();
                    if value.is_empty() || value.eq_ignore_ascii_case("auto") {
                        return Ok(PressSelection::Auto);
                    }
                    match value.parse::<u64>() {
                        Ok(id) => self.visit_u64(id),
                        Err(_) => Err(de::Error::invalid_value(de::Unexpected::Str(value), &self)),
                    }
                }

                fn visit_unit<E>(self) -> std::result::Result<PressSelection, E>
                where
                    E: de::Error,
                {
                    Ok(PressSelection::Auto)
                }
            }

            deserializer.deserialize_any(PressSelectionVisitor)
        }
    }
} // end of serde_impls module
