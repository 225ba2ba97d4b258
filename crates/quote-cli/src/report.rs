//! Plain-text rendering of engine results

use quote_engine::{ProductionResult, QuoteResult, SheetContext, StructureReport};

fn mm((width, height): (f64, f64)) -> String {
    format!("{} x {} mm", width, height)
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!("Warnings:");
    for warning in warnings {
        println!("  - {}", warning);
    }
}

pub fn print_sheet(sheet: &SheetContext) {
    println!("Sheet:");
    println!("  Base sheet: {}", mm(sheet.base_sheet_mm));
    println!("  Useful sheet: {}", mm(sheet.useful_sheet_mm));
    if sheet.use_cut_sheet {
        match sheet.cut_fraction {
            Some(fraction) => println!("  Cut: {}", fraction.as_str()),
            None => println!("  Cut: custom"),
        }
    }
    println!("  Useful sheets per base sheet: {}", sheet.pieces_per_base);
    print_warnings(&sheet.warnings);
}

pub fn print_production(production: &ProductionResult) {
    println!("Production:");
    println!("  Piece with bleed: {}", mm(production.pieza_mm));
    println!("  Printable area: {}", mm(production.area_util_mm));
    println!(
        "  Forms per sheet: {} ({} x {}, auto {})",
        production.formas_por_pliego,
        production.formas_horizontal,
        production.formas_vertical,
        production.formas_auto
    );
    println!("  Useful sheets: {}", production.pliegos_utiles);
    println!("  Base sheets: {}", production.pliegos_base);
    println!(
        "  Waste: {} sheets ({}% + {} setup)",
        production.merma_pliegos, production.merma_pct, production.merma_setup
    );
    println!(
        "  Colors: {} ({} plates, {} passes at {} per pass)",
        production.colores, production.chapas, production.pasadas, production.capacidad_color
    );
    println!(
        "  Time: {} h (setup {} h, run {} h)",
        production.tiempo_horas, production.tiempo_arranque_horas, production.tiempo_tiraje_horas
    );
    println!("  Production cost: {:.2}", production.costo_produccion);
    if !production.is_viable {
        println!("  Not viable");
    }
    print_warnings(&production.warnings);
}

pub fn print_quote(quote: &QuoteResult) {
    println!("Quote ({}):", quote.estrategia.as_str());
    println!(
        "  Sheets: {} at {:.2} = {:.2}",
        quote.pliegos_necesarios, quote.precio_pliego, quote.costo_papel
    );
    if let Some(note) = &quote.price_note {
        println!("  Note: {}", note);
    }
    for line in &quote.procesos {
        println!(
            "  {}: {} x {:.2} = {:.2}",
            line.nombre, line.multiplicador, line.costo_unitario, line.subtotal
        );
    }
    println!("  Processes: {:.2}", quote.costo_procesos);
    match &quote.maquina {
        Some(press) => println!(
            "  Press: {}{} ({} h at {:.2}) = {:.2}",
            press.nombre,
            if quote.maquina_por_defecto { " [auto]" } else { "" },
            quote.horas,
            quote.costo_hora,
            quote.costo_maquina
        ),
        None => println!("  Press: none"),
    }
    println!("  Subtotal: {:.2}", quote.subtotal);
    println!("  Margin ({}%): {:.2}", quote.margen_pct, quote.margen);
    println!("  Total: {:.2}", quote.total);
    println!("  Unit price: {:.2}", quote.precio_unitario);
    print_warnings(&quote.warnings);
}

pub fn print_report(report: &StructureReport) {
    println!(
        "Work type {}: {}",
        report.work_type,
        if report.valid { "complete" } else { "incomplete" }
    );
    println!("  Required: {}", report.required_fields.join(", "));
    if !report.missing_fields.is_empty() {
        println!("  Missing: {}", report.missing_fields.join(", "));
    }
    print_warnings(&report.warnings);
}
