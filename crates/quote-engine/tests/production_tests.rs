use quote_engine::*;

fn offset_press() -> Machine {
    Machine {
        id: 2,
        nombre: "GTO 52".to_string(),
        tipo: "Offset 4 colores".to_string(),
        costo_hora: 100.0,
        rendimiento_pliegos_hora: Some(500.0),
        setup_min: 15.0,
        ..Default::default()
    }
}

fn business_cards(quantity: i64) -> JobInput {
    JobInput {
        quantity,
        work_type: "tarjeta".to_string(),
        piece_width_mm: 90.0,
        piece_height_mm: 50.0,
        bleed_mm: 3.0,
        colors: Some("4/0".to_string()),
        base_sheet_width_mm: Some(700.0),
        base_sheet_height_mm: Some(1000.0),
        ..Default::default()
    }
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_business_cards_on_full_sheet() {
    let press = offset_press();
    let result = calculate_production(&business_cards(1000), None, Some(&press));

    assert_eq!(result.pieza_mm, (96.0, 56.0));
    assert_eq!(result.area_util_mm, (680.0, 980.0));
    assert_eq!(result.formas_horizontal, 7);
    assert_eq!(result.formas_vertical, 17);
    assert_eq!(result.formas_por_pliego, 119);

    // 9 sheets needed, 1 sheet at 3%, 15 setup sheets
    assert_eq!(result.merma_pct, 3);
    assert_eq!(result.merma_setup, 15);
    assert_eq!(result.merma_pliegos, 16);
    assert_eq!(result.pliegos_utiles, 25);
    assert_eq!(result.pliegos_base, 25);

    assert_eq!(result.colores, Colors::new(4, 0));
    assert_eq!(result.chapas, 4);
    assert_eq!(result.capacidad_color, 4);
    assert_eq!(result.pasadas, 1);

    assert_close(result.tiempo_arranque_horas, 0.25);
    assert_close(result.tiempo_tiraje_horas, 0.05);
    assert_close(result.tiempo_horas, 0.3);
    assert_close(result.costo_produccion, 30.0);

    assert!(result.is_viable);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_without_bleed() {
    let mut job = business_cards(1000);
    job.bleed_mm = 0.0;
    let result = calculate_production(&job, None, None);

    assert_eq!(result.pieza_mm, (90.0, 50.0));
    assert_eq!(result.formas_por_pliego, 7 * 19);
}

#[test]
fn test_negative_bleed_ignored() {
    let mut job = business_cards(1000);
    job.bleed_mm = -3.0;
    let result = calculate_production(&job, None, None);
    assert_eq!(result.pieza_mm, (90.0, 50.0));
}

#[test]
fn test_sheets_monotonic_in_quantity() {
    let press = offset_press();
    let mut previous = 0;
    for quantity in (1..=150_000).step_by(997) {
        let result = calculate_production(&business_cards(quantity), None, Some(&press));
        assert!(
            result.pliegos_base >= previous,
            "{quantity} pieces: {} sheets after {previous}",
            result.pliegos_base
        );
        previous = result.pliegos_base;
    }
}

#[test]
fn test_sheets_cover_quantity() {
    for quantity in [1, 118, 119, 120, 5000, 99_999] {
        let result = calculate_production(&business_cards(quantity), None, None);
        let printed = (result.pliegos_utiles - result.merma_pliegos) * result.formas_por_pliego;
        assert!(printed >= quantity as u64);
    }
}

#[test]
fn test_waste_grows_with_run_length() {
    // 119_000 pieces need exactly 1000 sheets
    let result = calculate_production(&business_cards(119_000), None, None);
    assert_eq!(result.merma_pct, 4);
    assert_eq!(result.merma_pliegos, 40);
    assert_eq!(result.pliegos_utiles, 1040);
}

#[test]
fn test_half_cut_sheet() {
    let mut job = business_cards(1000);
    job.cut_sheet = Some(CutSheetRequest {
        mode: CutMode::Fraction,
        fraction: Some("1/2".to_string()),
        ..Default::default()
    });

    let result = calculate_production(&job, None, None);
    assert_eq!(result.sheet.useful_sheet_mm, (700.0, 500.0));
    assert_eq!(result.area_util_mm, (680.0, 480.0));
    assert_eq!(result.formas_por_pliego, 7 * 8);

    // 18 sheets + 1 waste, two useful sheets per base sheet
    assert_eq!(result.pliegos_utiles, 19);
    assert_eq!(result.pliegos_base, 10);
}

#[test]
fn test_manual_imposition_override() {
    let mut job = business_cards(1000);
    job.forms_per_sheet = Some(50);

    // Ignored until manual imposition is enabled
    let result = calculate_production(&job, None, None);
    assert_eq!(result.formas_por_pliego, 119);

    job.manual_imposition = true;
    let result = calculate_production(&job, None, None);
    assert_eq!(result.formas_auto, 119);
    assert_eq!(result.formas_por_pliego, 50);
    assert_eq!(result.pliegos_utiles, 21);

    job.forms_per_sheet = Some(0);
    let result = calculate_production(&job, None, None);
    assert_eq!(result.formas_por_pliego, 119);
}

#[test]
fn test_piece_larger_than_sheet() {
    let mut job = business_cards(1000);
    job.piece_width_mm = 800.0;
    job.piece_height_mm = 1200.0;

    let result = calculate_production(&job, None, None);
    assert!(!result.is_viable);
    assert_eq!(result.formas_por_pliego, 0);
    assert_eq!(result.pliegos_utiles, 0);
    assert_eq!(result.pliegos_base, 0);
    assert!(result
        .warnings
        .contains(&"piece does not fit the useful sheet: job not viable".to_string()));

    // Nothing is charged for setup on a job that cannot be printed
    let press = offset_press();
    let result = calculate_production(&job, None, Some(&press));
    assert!(!result.is_viable);
    assert_eq!(result.merma_setup, 0);
    assert_eq!(result.merma_pliegos, 0);
    assert_eq!(result.pliegos_utiles, 0);
    assert_eq!(result.pliegos_base, 0);
    assert_eq!(result.tiempo_horas, 0.0);
    assert_eq!(result.costo_produccion, 0.0);
}

#[test]
fn test_missing_piece_dimensions_not_viable() {
    let job = JobInput {
        quantity: 500,
        ..Default::default()
    };
    let result = calculate_production(&job, None, None);
    assert!(!result.is_viable);
    assert_eq!(result.pliegos_base, 0);
}

#[test]
fn test_without_press() {
    let result = calculate_production(&business_cards(1000), None, None);

    assert_eq!(result.capacidad_color, 4);
    assert_eq!(result.merma_setup, 0);
    assert_eq!(result.pliegos_utiles, 10);
    assert_eq!(result.tiempo_horas, 0.0);
    assert_eq!(result.costo_produccion, 0.0);
    assert_eq!(
        result.warnings,
        vec!["no press selected: run time not computed".to_string()]
    );
}

#[test]
fn test_press_without_throughput() {
    let press = Machine {
        rendimiento_pliegos_hora: None,
        rendimiento_hora: None,
        ..offset_press()
    };
    let result = calculate_production(&business_cards(1000), None, Some(&press));

    assert_close(result.tiempo_horas, 0.25);
    assert_close(result.costo_produccion, 25.0);
    assert!(result
        .warnings
        .contains(&"press has no throughput: run time not computed".to_string()));
}

#[test]
fn test_double_sided_passes() {
    let press = offset_press();
    let mut job = business_cards(1000);
    job.colors = Some("4/4".to_string());

    let result = calculate_production(&job, None, Some(&press));
    assert_eq!(result.chapas, 8);
    assert_eq!(result.pasadas, 2);

    let two_color = Machine {
        tipo: "Offset 2 colores".to_string(),
        ..offset_press()
    };
    job.colors = Some("4/0".to_string());
    let result = calculate_production(&job, None, Some(&two_color));
    assert_eq!(result.capacidad_color, 2);
    assert_eq!(result.pasadas, 2);
}

#[test]
fn test_material_format_used_for_sheet() {
    let mut job = business_cards(1000);
    job.base_sheet_width_mm = None;
    job.base_sheet_height_mm = None;
    let material = Material {
        id: 4,
        nombre: "Opalina".to_string(),
        precio_vigente: Some(1.0),
        formato_base: Some("50x70".to_string()),
    };

    let result = calculate_production(&job, Some(&material), None);
    assert_eq!(result.sheet.base_sheet_mm, (500.0, 700.0));
    assert_eq!(result.area_util_mm, (480.0, 680.0));
}

#[test]
fn test_tiny_piece_saturates_forms() {
    let job = JobInput {
        quantity: 1000,
        piece_width_mm: 1e-12,
        piece_height_mm: 1e-12,
        ..Default::default()
    };

    let result = calculate_production(&job, None, None);
    assert!(result.is_viable);
    assert_eq!(result.formas_auto, u64::MAX);
    // One sheet plus 3% waste rounded up
    assert_eq!(result.pliegos_utiles, 2);
}

#[test]
fn test_huge_quantity_saturates_waste() {
    let press = offset_press();
    let job = JobInput {
        quantity: 200_000_000_000,
        piece_width_mm: 600.0,
        piece_height_mm: 900.0,
        ..Default::default()
    };

    let result = calculate_production(&job, None, Some(&press));
    assert!(result.is_viable);
    assert_eq!(result.formas_por_pliego, 1);
    assert!(result.merma_pliegos > 0);
    assert!(result.pliegos_utiles >= 200_000_000_000);
    assert!(result.pliegos_base >= 200_000_000_000);
}

#[test]
fn test_huge_ink_counts() {
    let press = offset_press();
    let mut job = business_cards(1000);
    job.colors = Some("4294967295/1".to_string());

    let result = calculate_production(&job, None, Some(&press));
    assert_eq!(result.chapas, u32::MAX);
    assert!(result.pasadas > 0);
}
