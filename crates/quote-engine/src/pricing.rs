//! Pricing calculator
//!
//! Turns a sheet count and machine time into paper, process and machine
//! costs, then applies the margin.

use crate::catalog::{Catalog, ChargeMode, Machine, Material, Process};
use crate::constants::round2;
use crate::job::JobInput;
use crate::strategy::select_strategy;
use crate::types::*;
use crate::work_type::validate_work_structure;

pub const NO_PRICE_NOTE: &str = "no current price for this material";

/// Price a job against already-resolved catalog records.
///
/// Negative or missing inputs are clamped to their minimum, never
/// rejected. `privileged` gates the caller's hourly-rate override.
pub fn calculate_quote(
    job: &JobInput,
    material: Option<&Material>,
    processes: &[&Process],
    press: Option<&Machine>,
    privileged: bool,
) -> QuoteResult {
    let quantity = job.quantity();
    let mut warnings = Vec::new();

    // Paper
    let (precio_pliego, price_note) = match material.and_then(|m| m.precio_vigente) {
        Some(price) => (price.max(0.0), None),
        None => {
            log::warn!("No current price for material {:?}", material.map(|m| m.id));
            (0.0, Some(NO_PRICE_NOTE.to_string()))
        }
    };

    let strategy = select_strategy(job);
    let count = strategy.count(job, material, press);
    log::debug!("{} sheets via {}", count.sheets, strategy.kind().as_str());
    for warning in &count.warnings {
        push_unique(&mut warnings, warning.as_str());
    }

    let pliegos_necesarios = count.sheets;
    // A job that cannot be imposed is reported, not billed
    let billable = count.production.as_ref().is_none_or(|p| p.is_viable);
    let costo_papel = round2(pliegos_necesarios as f64 * precio_pliego);

    // Machine time and rate
    let horas = match (job.hours(), press) {
        (Some(hours), _) => hours,
        (None, Some(press)) => count
            .hours
            .unwrap_or_else(|| hours_from_throughput(pliegos_necesarios, press)),
        (None, None) => 0.0,
    };

    let mut costo_hora = press.map(|p| p.costo_hora.max(0.0)).unwrap_or(0.0);
    if let Some(rate) = job.cost_per_hour() {
        if privileged {
            costo_hora = rate;
        } else {
            push_unique(&mut warnings, "cost-per-hour override ignored: not privileged");
        }
    }

    if press.is_none() {
        push_unique(&mut warnings, "no press selected: machine cost not included");
    }

    // Finishing
    let procesos: Vec<ProcessLine> = processes
        .iter()
        .map(|process| process_line(process, quantity, pliegos_necesarios, horas, billable))
        .collect();
    let costo_procesos = round2(procesos.iter().map(|line| line.subtotal).sum());

    let costo_maquina = match press {
        Some(_) if billable && horas > 0.0 => round2(costo_hora * horas),
        _ => 0.0,
    };

    // Totals
    let margen_pct = job.margin_pct();
    let subtotal = round2(costo_papel + costo_procesos + costo_maquina);
    let margen = round2(subtotal * margen_pct / 100.0);
    let total = round2(subtotal + margen);

    QuoteResult {
        pliegos_necesarios,
        precio_pliego,
        costo_papel,
        costo_procesos,
        costo_maquina,
        subtotal,
        margen,
        total,
        margen_pct,
        precio_unitario: round2(total / quantity as f64),
        horas,
        costo_hora,
        material: material.cloned(),
        maquina: press.cloned(),
        maquina_por_defecto: false,
        procesos,
        estrategia: strategy.kind(),
        produccion: count.production,
        warnings,
        price_note,
    }
}

/// Resolve material, press and processes from a catalog snapshot, then
/// price the job. `PressSelection::Auto` (or press id 0) picks the cheapest
/// active press.
pub fn quote_with_catalog(job: &JobInput, catalog: &Catalog, privileged: bool) -> QuoteResult {
    let mut warnings = Vec::new();

    let material = job.material_id.and_then(|id| {
        let found = catalog.material(id);
        if found.is_none() {
            warnings.push(format!("material {} not found", id));
        }
        found
    });

    let (press, defaulted) = match job.press.id() {
        None => {
            let press = catalog.cheapest_active_press();
            if press.is_none() {
                warnings.push("no active press available".to_string());
            }
            (press, press.is_some())
        }
        Some(id) => {
            let press = catalog.press(id);
            if press.is_none() {
                warnings.push(format!("press {} not found", id));
            }
            (press, false)
        }
    };

    for id in &job.process_ids {
        if !catalog.processes.iter().any(|p| p.id == *id) {
            warnings.push(format!("process {} not found", id));
        }
    }
    let processes = catalog.processes(&job.process_ids);

    let mut quote = calculate_quote(job, material, &processes, press, privileged);
    quote.maquina_por_defecto = defaulted;
    for warning in quote.warnings.drain(..) {
        push_unique(&mut warnings, warning);
    }
    quote.warnings = warnings;
    quote
}

/// Quote only when the work-type check finds every required field.
/// Structural warnings are carried into the quote.
pub fn checked_quote(job: &JobInput, catalog: &Catalog, privileged: bool) -> Result<QuoteResult> {
    let report = validate_work_structure(job);
    if !report.valid {
        return Err(QuoteError::MissingFields(report.missing_fields));
    }

    let mut quote = quote_with_catalog(job, catalog, privileged);
    for warning in report.warnings {
        push_unique(&mut quote.warnings, warning);
    }
    Ok(quote)
}

fn hours_from_throughput(sheets: u64, press: &Machine) -> f64 {
    let throughput = press.sheets_per_hour();
    if throughput > 0.0 {
        round2(sheets as f64 / throughput)
    } else {
        0.0
    }
}

fn process_line(
    process: &Process,
    quantity: u64,
    sheets: u64,
    hours: f64,
    billable: bool,
) -> ProcessLine {
    let multiplicador = match process.modo_cobro {
        _ if !billable => 0.0,
        ChargeMode::PorUnidad => quantity as f64,
        ChargeMode::PorPliego => sheets.max(1) as f64,
        ChargeMode::PorHora => hours.max(1.0),
        ChargeMode::PorMillar | ChargeMode::PorM2 | ChargeMode::PorKg | ChargeMode::Fijo => 1.0,
    };
    let costo_unitario = process.costo_base.max(0.0);

    ProcessLine {
        id: process.id,
        nombre: process.nombre.clone(),
        modo_cobro: process.modo_cobro,
        multiplicador,
        costo_unitario,
        subtotal: round2(costo_unitario * multiplicador),
    }
}
