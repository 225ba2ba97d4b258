//! Production engine
//!
//! Imposes the job on the useful sheet, grows the sheet count for waste,
//! and derives plates, press passes and machine time.

use crate::catalog::{Machine, Material};
use crate::constants::*;
use crate::job::JobInput;
use crate::sheet::resolve_sheet_context;
use crate::types::*;

/// Compute the physical production plan for a job.
///
/// Never fails: a piece that does not fit or a press without throughput
/// is reported through `is_viable` and `warnings`. A job that is not
/// viable carries no sheets, waste, time or cost. Sheet counts always
/// round up and saturate instead of overflowing.
pub fn calculate_production(
    job: &JobInput,
    material: Option<&Material>,
    press: Option<&Machine>,
) -> ProductionResult {
    let quantity = job.quantity();
    let sheet = resolve_sheet_context(job, material);
    let mut warnings = sheet.warnings.clone();

    // Imposition
    let pieza_mm = job.piece_with_bleed_mm();
    let area_util_mm = usable_area(sheet.useful_sheet_mm);
    let formas_horizontal = forms_along(area_util_mm.0, pieza_mm.0);
    let formas_vertical = forms_along(area_util_mm.1, pieza_mm.1);
    let formas_auto = formas_horizontal.saturating_mul(formas_vertical);
    let formas_por_pliego = job.forms_per_sheet_override().unwrap_or(formas_auto);
    let is_viable = formas_por_pliego > 0;

    log::debug!(
        "Imposition {}x{} = {} per sheet (using {})",
        formas_horizontal,
        formas_vertical,
        formas_auto,
        formas_por_pliego
    );

    if !is_viable {
        log::warn!(
            "Piece {:?} does not fit useful sheet {:?}",
            pieza_mm,
            sheet.useful_sheet_mm
        );
        push_unique(&mut warnings, "piece does not fit the useful sheet: job not viable");
    }

    // Sheets and waste
    let base_need = if is_viable {
        quantity.div_ceil(formas_por_pliego)
    } else {
        0
    };
    let merma_pct = waste_pct(base_need);
    let merma_setup = match press {
        Some(press) if is_viable => setup_waste_sheets(press),
        _ => 0,
    };
    let merma_pliegos = base_need
        .saturating_mul(merma_pct)
        .div_ceil(100)
        .saturating_add(merma_setup);
    let pliegos_utiles = base_need.saturating_add(merma_pliegos);
    let pliegos_base = pliegos_utiles.div_ceil(sheet.pieces_per_base.max(1) as u64);

    // Plates and passes
    let colores = job.colors();
    let capacidad_color = press
        .map(Machine::color_capacity)
        .unwrap_or(DEFAULT_COLOR_CAPACITY);
    let pasadas = press_passes(colores, capacidad_color);

    // Machine time
    let (setup_hours, run_hours) = if is_viable {
        machine_hours(press, pliegos_utiles, &mut warnings)
    } else {
        (0.0, 0.0)
    };
    let tiempo_horas = round2(setup_hours + run_hours);
    let costo_hora = press.map(|p| p.costo_hora.max(0.0)).unwrap_or(0.0);
    let costo_produccion = round2(tiempo_horas * costo_hora);

    ProductionResult {
        pliegos_utiles,
        pliegos_base,
        formas_por_pliego,
        formas_horizontal,
        formas_vertical,
        formas_auto,
        colores,
        chapas: colores.plates(),
        pasadas,
        capacidad_color,
        tiempo_arranque_horas: round2(setup_hours),
        tiempo_tiraje_horas: round2(run_hours),
        tiempo_horas,
        costo_produccion,
        merma_pliegos,
        merma_setup,
        merma_pct,
        pieza_mm,
        area_util_mm,
        sheet,
        is_viable,
        warnings,
    }
}

/// Printable area of a useful sheet once gripper, tail and side margins
/// are removed.
pub fn usable_area((width, height): (f64, f64)) -> (f64, f64) {
    (
        (width - 2.0 * SIDE_MARGIN_MM).max(0.0),
        (height - GRIPPER_MARGIN_MM - TAIL_MARGIN_MM).max(0.0),
    )
}

fn forms_along(available: f64, piece: f64) -> u64 {
    if piece <= 0.0 {
        return 0;
    }
    (available / piece).floor() as u64
}

/// Waste percentage for a run: the base rate plus one point per full
/// thousand useful sheets.
pub fn waste_pct(base_need: u64) -> u64 {
    BASE_WASTE_PCT + base_need / WASTE_STEP_SHEETS
}

/// Setup and run hours on the press
fn machine_hours(press: Option<&Machine>, sheets: u64, warnings: &mut Vec<String>) -> (f64, f64) {
    let Some(press) = press else {
        push_unique(warnings, "no press selected: run time not computed");
        return (0.0, 0.0);
    };

    let setup_hours = press.setup_minutes() / MINUTES_PER_HOUR;
    let throughput = press.sheets_per_hour();
    if throughput > 0.0 {
        (setup_hours, sheets as f64 / throughput)
    } else {
        push_unique(warnings, "press has no throughput: run time not computed");
        (setup_hours, 0.0)
    }
}

/// One sheet per started minute of setup
fn setup_waste_sheets(press: &Machine) -> u64 {
    press.setup_minutes().ceil() as u64
}

/// Press passes for a color configuration. Each face needs
/// ceil(inks / capacity) passes; printing a back face doubles them.
pub fn press_passes(colors: Colors, capacity: u32) -> u32 {
    let passes = colors.active_faces().div_ceil(capacity.max(1));
    if colors.back > 0 {
        passes.saturating_mul(2)
    } else {
        passes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waste_pct_steps() {
        assert_eq!(waste_pct(0), 3);
        assert_eq!(waste_pct(999), 3);
        assert_eq!(waste_pct(1000), 4);
        assert_eq!(waste_pct(2500), 5);
    }

    #[test]
    fn test_press_passes() {
        assert_eq!(press_passes(Colors::new(4, 0), 4), 1);
        assert_eq!(press_passes(Colors::new(4, 4), 4), 2);
        assert_eq!(press_passes(Colors::new(4, 1), 2), 4);
        assert_eq!(press_passes(Colors::new(1, 0), 4), 1);
        assert_eq!(press_passes(Colors::new(0, 0), 4), 0);
        assert_eq!(press_passes(Colors::new(u32::MAX, 1), 1), u32::MAX);
    }

    #[test]
    fn test_usable_area() {
        assert_eq!(usable_area((700.0, 1000.0)), (680.0, 980.0));
        assert_eq!(usable_area((15.0, 15.0)), (0.0, 0.0));
    }
}
