use quote_engine::{
    Catalog, JobInput, Machine, Material, calculate_production, checked_quote,
    quote_with_catalog, resolve_sheet_context, validate_work_structure,
};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::{QuoteUpdate, RequestId};

/// Run an engine calculation off the async threads
async fn run_blocking<T, F>(f: F) -> quote_engine::Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await?)
}

fn send_error(update_tx: &mpsc::UnboundedSender<QuoteUpdate>, request: RequestId, message: String) {
    log::warn!("Request {:?} failed: {}", request, message);
    let _ = update_tx.send(QuoteUpdate::Error { request, message });
}

pub async fn handle_preview_sheet(
    request: RequestId,
    job: JobInput,
    material: Option<Material>,
    update_tx: &mpsc::UnboundedSender<QuoteUpdate>,
) {
    match run_blocking(move || resolve_sheet_context(&job, material.as_ref())).await {
        Ok(sheet) => {
            let _ = update_tx.send(QuoteUpdate::SheetPreview { request, sheet });
        }
        Err(e) => send_error(update_tx, request, format!("Failed to resolve sheet: {}", e)),
    }
}

pub async fn handle_calculate_production(
    request: RequestId,
    job: JobInput,
    material: Option<Material>,
    press: Option<Machine>,
    update_tx: &mpsc::UnboundedSender<QuoteUpdate>,
) {
    let result =
        run_blocking(move || calculate_production(&job, material.as_ref(), press.as_ref())).await;
    match result {
        Ok(production) => {
            let _ = update_tx.send(QuoteUpdate::ProductionCalculated {
                request,
                production,
            });
        }
        Err(e) => send_error(
            update_tx,
            request,
            format!("Failed to calculate production: {}", e),
        ),
    }
}

pub async fn handle_calculate_quote(
    request: RequestId,
    job: JobInput,
    catalog: Catalog,
    privileged: bool,
    force: bool,
    update_tx: &mpsc::UnboundedSender<QuoteUpdate>,
) {
    let result = run_blocking(move || {
        if force {
            Ok(quote_with_catalog(&job, &catalog, privileged))
        } else {
            checked_quote(&job, &catalog, privileged)
        }
    })
    .await
    .and_then(|quote| quote);

    match result {
        Ok(quote) => {
            let _ = update_tx.send(QuoteUpdate::QuoteCalculated { request, quote });
        }
        Err(e) => send_error(update_tx, request, format!("Failed to calculate quote: {}", e)),
    }
}

pub async fn handle_validate(
    request: RequestId,
    job: JobInput,
    update_tx: &mpsc::UnboundedSender<QuoteUpdate>,
) {
    let report = validate_work_structure(&job);
    let _ = update_tx.send(QuoteUpdate::StructureValidated { request, report });
}

pub async fn handle_load_job(
    request: RequestId,
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<QuoteUpdate>,
) {
    match JobInput::load(&path).await {
        Ok(job) => {
            let _ = update_tx.send(QuoteUpdate::JobLoaded { request, job });
        }
        Err(e) => send_error(
            update_tx,
            request,
            format!("Failed to load job {}: {}", path.display(), e),
        ),
    }
}

pub async fn handle_load_catalog(
    request: RequestId,
    path: PathBuf,
    update_tx: &mpsc::UnboundedSender<QuoteUpdate>,
) {
    match Catalog::load(&path).await {
        Ok(catalog) => {
            let _ = update_tx.send(QuoteUpdate::CatalogLoaded { request, catalog });
        }
        Err(e) => send_error(
            update_tx,
            request,
            format!("Failed to load catalog {}: {}", path.display(), e),
        ),
    }
}
