//! Sheet-count strategies
//!
//! Two algorithms count the sheets a quote is priced on and they
//! deliberately disagree: the flat ratio ignores geometry, margins and
//! setup waste, the full geometry model accounts for all of them. The
//! caller's inputs pick one and the quote records which.

use crate::catalog::{Machine, Material};
use crate::constants::ceil_sheets;
use crate::job::JobInput;
use crate::production::calculate_production;
use crate::types::*;

/// Sheets to price, plus whatever the strategy learned along the way
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCount {
    pub sheets: u64,
    /// Press hours when the strategy models machine time
    pub hours: Option<f64>,
    pub production: Option<ProductionResult>,
    pub warnings: Vec<String>,
}

pub trait SheetCountStrategy {
    fn kind(&self) -> SheetStrategyKind;

    fn count(
        &self,
        job: &JobInput,
        material: Option<&Material>,
        press: Option<&Machine>,
    ) -> SheetCount;
}

/// Quick-quote ratio: `ceil(quantity / forms × (1 + waste / 100))`
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRatio;

impl SheetCountStrategy for FlatRatio {
    fn kind(&self) -> SheetStrategyKind {
        SheetStrategyKind::FlatRatio
    }

    fn count(
        &self,
        job: &JobInput,
        _material: Option<&Material>,
        _press: Option<&Machine>,
    ) -> SheetCount {
        SheetCount {
            sheets: flat_ratio_sheets(
                job.quantity(),
                job.quick_forms_per_sheet(),
                job.quick_waste_pct(),
            ),
            hours: None,
            production: None,
            warnings: Vec::new(),
        }
    }
}

/// Full imposition model; prices the base sheets to purchase
#[derive(Debug, Clone, Copy, Default)]
pub struct FullGeometry;

impl SheetCountStrategy for FullGeometry {
    fn kind(&self) -> SheetStrategyKind {
        SheetStrategyKind::FullGeometry
    }

    fn count(
        &self,
        job: &JobInput,
        material: Option<&Material>,
        press: Option<&Machine>,
    ) -> SheetCount {
        let production = calculate_production(job, material, press);
        SheetCount {
            sheets: production.pliegos_base,
            hours: press.map(|_| production.tiempo_horas),
            warnings: production.warnings.clone(),
            production: Some(production),
        }
    }
}

/// Sheet count of the quick-quote ratio. Forms are taken as at least 1
/// and waste as at least 0, so the count always covers the quantity.
pub fn flat_ratio_sheets(quantity: u64, forms_per_sheet: u64, waste_pct: f64) -> u64 {
    let forms = forms_per_sheet.max(1) as f64;
    let waste = if waste_pct.is_finite() {
        waste_pct.max(0.0)
    } else {
        0.0
    };
    ceil_sheets(quantity as f64 / forms * (1.0 + waste / 100.0))
}

/// Full geometry when the piece has both dimensions, flat ratio otherwise
pub fn select_strategy(job: &JobInput) -> &'static dyn SheetCountStrategy {
    if job.has_piece_geometry() {
        &FullGeometry
    } else {
        &FlatRatio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_ratio_sheets() {
        assert_eq!(flat_ratio_sheets(1000, 10, 3.0), 103);
        assert_eq!(flat_ratio_sheets(1000, 10, 0.0), 100);
        assert_eq!(flat_ratio_sheets(1001, 10, 0.0), 101);
        assert_eq!(flat_ratio_sheets(500, 0, 5.0), 525);
        assert_eq!(flat_ratio_sheets(10, 3, -20.0), 4);
    }

    #[test]
    fn test_flat_ratio_never_under_orders() {
        for quantity in [1u64, 7, 99, 1000, 12_345] {
            for forms in [1u64, 2, 3, 8, 24, 119] {
                for waste in [0.0, 2.5, 3.0, 10.0] {
                    let sheets = flat_ratio_sheets(quantity, forms, waste);
                    assert!(
                        sheets * forms >= quantity,
                        "{quantity} pieces at {forms} per sheet, {waste}% waste: {sheets} sheets"
                    );
                }
            }
        }
    }

    #[test]
    fn test_select_strategy() {
        let mut job = JobInput::default();
        assert_eq!(select_strategy(&job).kind(), SheetStrategyKind::FlatRatio);

        job.piece_width_mm = 90.0;
        assert_eq!(select_strategy(&job).kind(), SheetStrategyKind::FlatRatio);

        job.piece_height_mm = 50.0;
        assert_eq!(select_strategy(&job).kind(), SheetStrategyKind::FullGeometry);
    }
}
