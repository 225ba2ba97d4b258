//! Work-type rules
//!
//! Each product category carries a fixed set of required inputs and a few
//! structural constraints. Missing required fields block a quote; the
//! structural warnings are advisory.

use crate::job::{JobInput, has_text};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Product category of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WorkType {
    /// Magazine: bound, multi-page
    Revista,
    /// Leaflet: folded, never bound
    Folleto,
    /// Business card: single page
    Tarjeta,
    /// Roll label (flexo)
    Etiqueta,
    /// Folding box
    Caja,
    /// Anything else; requires nothing
    #[default]
    Otro,
}

impl WorkType {
    pub const ALL: [WorkType; 6] = [
        WorkType::Revista,
        WorkType::Folleto,
        WorkType::Tarjeta,
        WorkType::Etiqueta,
        WorkType::Caja,
        WorkType::Otro,
    ];

    /// Resolve a tag; unknown tags fall back to `Otro`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "revista" => WorkType::Revista,
            "folleto" => WorkType::Folleto,
            "tarjeta" => WorkType::Tarjeta,
            "etiqueta" => WorkType::Etiqueta,
            "caja" => WorkType::Caja,
            _ => WorkType::Otro,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkType::Revista => "revista",
            WorkType::Folleto => "folleto",
            WorkType::Tarjeta => "tarjeta",
            WorkType::Etiqueta => "etiqueta",
            WorkType::Caja => "caja",
            WorkType::Otro => "otro",
        }
    }

    pub fn config(self) -> WorkTypeConfig {
        match self {
            WorkType::Revista => WorkTypeConfig {
                requires_pages: true,
                requires_sheet_format: true,
                requires_binding: true,
                allows_multiple_weights: true,
                page_multiple: 4,
                uses_front_back: true,
                ..WorkTypeConfig::PERMISSIVE
            },
            WorkType::Folleto => WorkTypeConfig {
                requires_pages: true,
                requires_sheet_format: true,
                page_multiple: 2,
                uses_front_back: true,
                ..WorkTypeConfig::PERMISSIVE
            },
            WorkType::Tarjeta => WorkTypeConfig {
                requires_sheet_format: true,
                uses_front_back: true,
                ..WorkTypeConfig::PERMISSIVE
            },
            WorkType::Etiqueta => WorkTypeConfig {
                requires_die_cut: true,
                requires_roll_material: true,
                requires_anilox: true,
                requires_cylinder: true,
                uses_special_colors: true,
                ..WorkTypeConfig::PERMISSIVE
            },
            WorkType::Caja => WorkTypeConfig {
                requires_sheet_format: true,
                requires_die_cut: true,
                uses_front_back: true,
                ..WorkTypeConfig::PERMISSIVE
            },
            WorkType::Otro => WorkTypeConfig::PERMISSIVE,
        }
    }
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Required inputs and constraints of a work type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorkTypeConfig {
    pub requires_pages: bool,
    pub requires_sheet_format: bool,
    pub requires_die_cut: bool,
    pub requires_binding: bool,
    pub requires_roll_material: bool,
    pub requires_anilox: bool,
    pub requires_cylinder: bool,
    /// Separate cover and interior paper weights
    pub allows_multiple_weights: bool,
    /// Page count must be a multiple of this (0 = no constraint)
    pub page_multiple: u32,
    pub uses_front_back: bool,
    pub uses_special_colors: bool,
}

impl WorkTypeConfig {
    pub const PERMISSIVE: WorkTypeConfig = WorkTypeConfig {
        requires_pages: false,
        requires_sheet_format: false,
        requires_die_cut: false,
        requires_binding: false,
        requires_roll_material: false,
        requires_anilox: false,
        requires_cylinder: false,
        allows_multiple_weights: false,
        page_multiple: 0,
        uses_front_back: false,
        uses_special_colors: false,
    };
}

// Input field names, as they appear on `JobInput`
pub const FIELD_PAGES: &str = "pages";
pub const FIELD_SHEET_FORMAT: &str = "sheet_format";
pub const FIELD_DIE_CUT: &str = "die_cut";
pub const FIELD_BINDING: &str = "binding";
pub const FIELD_ROLL_MATERIAL: &str = "roll_material";
pub const FIELD_ANILOX: &str = "anilox";
pub const FIELD_CYLINDER: &str = "cylinder";
pub const FIELD_COVER_WEIGHT: &str = "cover_weight_gsm";
pub const FIELD_INTERIOR_WEIGHT: &str = "interior_weight_gsm";
pub const FIELD_COLORS: &str = "colors";
pub const FIELD_SPECIAL_COLORS: &str = "special_colors";

/// Required field names for a work-type tag, in a fixed order
pub fn get_required_fields(tag: &str) -> Vec<&'static str> {
    let config = WorkType::from_tag(tag).config();

    let flagged = [
        (config.requires_pages, FIELD_PAGES),
        (config.requires_sheet_format, FIELD_SHEET_FORMAT),
        (config.requires_die_cut, FIELD_DIE_CUT),
        (config.requires_binding, FIELD_BINDING),
        (config.requires_roll_material, FIELD_ROLL_MATERIAL),
        (config.requires_anilox, FIELD_ANILOX),
        (config.requires_cylinder, FIELD_CYLINDER),
        (config.allows_multiple_weights, FIELD_COVER_WEIGHT),
        (config.allows_multiple_weights, FIELD_INTERIOR_WEIGHT),
        (config.uses_front_back, FIELD_COLORS),
        (config.uses_special_colors, FIELD_SPECIAL_COLORS),
    ];

    let mut fields = Vec::new();
    for (required, field) in flagged {
        if required && !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

/// Outcome of the work-type check
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StructureReport {
    /// True when no required field is missing
    pub valid: bool,
    pub work_type: WorkType,
    pub config: WorkTypeConfig,
    pub required_fields: Vec<String>,
    pub missing_fields: Vec<String>,
    /// Advisory structural warnings
    pub warnings: Vec<String>,
}

/// Check a job against its work-type rules.
///
/// Every rule is evaluated independently, so one job may collect several
/// warnings. Only `missing_fields` makes the report invalid.
pub fn validate_work_structure(job: &JobInput) -> StructureReport {
    let work_type = job.work_type();
    let config = work_type.config();
    let required = get_required_fields(work_type.as_str());

    let missing_fields: Vec<String> = required
        .iter()
        .filter(|field| !field_present(job, field))
        .map(|field| field.to_string())
        .collect();

    let mut warnings = Vec::new();
    let pages = job.pages();

    if config.requires_pages && pages.is_none() {
        warnings.push(format!("{} requires a page count", work_type));
    }

    let multiple = config.page_multiple;
    if multiple > 0 && pages.is_some_and(|p| p % multiple != 0) {
        warnings.push(format!("page count must be a multiple of {}", multiple));
    }

    match work_type {
        WorkType::Revista => {
            if !has_text(&job.binding) {
                warnings.push("revista requires a binding".to_string());
            }
        }
        WorkType::Folleto => {
            if has_text(&job.binding) {
                warnings.push("folleto must not use binding".to_string());
            }
        }
        WorkType::Tarjeta => {
            if pages.is_some_and(|p| p != 1) {
                warnings.push("tarjeta must have 1 page".to_string());
            }
            if job.double_sheet {
                warnings.push("tarjeta does not use double sheet".to_string());
            }
        }
        WorkType::Etiqueta => {
            if !has_text(&job.roll_material) {
                warnings.push("etiqueta requires roll material".to_string());
            }
            if !has_text(&job.anilox) {
                warnings.push("etiqueta requires anilox".to_string());
            }
            if pages.is_some() {
                warnings.push("etiqueta doesn't use pages".to_string());
            }
        }
        WorkType::Caja => {
            if !job.die_cut {
                warnings.push("caja requires die-cut".to_string());
            }
            if !job.has_sheet_source() {
                warnings.push("caja requires a sheet format".to_string());
            }
        }
        WorkType::Otro => {}
    }

    if !missing_fields.is_empty() {
        log::debug!("{} job missing fields: {:?}", work_type, missing_fields);
    }

    StructureReport {
        valid: missing_fields.is_empty(),
        work_type,
        config,
        required_fields: required.iter().map(|f| f.to_string()).collect(),
        missing_fields,
        warnings,
    }
}

fn field_present(job: &JobInput, field: &str) -> bool {
    match field {
        FIELD_PAGES => job.pages().is_some(),
        FIELD_SHEET_FORMAT => job.has_sheet_source(),
        FIELD_DIE_CUT => job.die_cut,
        FIELD_BINDING => has_text(&job.binding),
        FIELD_ROLL_MATERIAL => has_text(&job.roll_material),
        FIELD_ANILOX => has_text(&job.anilox),
        FIELD_CYLINDER => has_text(&job.cylinder),
        FIELD_COVER_WEIGHT => job.cover_weight_gsm.is_some_and(|w| w > 0.0),
        FIELD_INTERIOR_WEIGHT => job.interior_weight_gsm.is_some_and(|w| w > 0.0),
        FIELD_COLORS => has_text(&job.colors),
        FIELD_SPECIAL_COLORS => has_text(&job.special_colors),
        _ => true,
    }
}
