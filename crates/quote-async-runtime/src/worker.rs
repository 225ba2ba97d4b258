use tokio::sync::mpsc;

use crate::{QuoteCommand, QuoteUpdate, handlers};

/// Async worker task that answers quote commands until the command
/// channel closes. Nothing is carried between commands.
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<QuoteCommand>,
    update_tx: mpsc::UnboundedSender<QuoteUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, quote worker stopping");
}

async fn process_command(
    cmd: QuoteCommand,
    command_rx: &mut mpsc::UnboundedReceiver<QuoteCommand>,
    update_tx: &mpsc::UnboundedSender<QuoteUpdate>,
) {
    match cmd {
        QuoteCommand::PreviewSheet {
            mut request,
            mut job,
            mut material,
        } => {
            // Drain any queued previews, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                if let QuoteCommand::PreviewSheet {
                    request: new_request,
                    job: new_job,
                    material: new_material,
                } = next_cmd
                {
                    log::debug!(
                        "Discarding queued sheet preview {:?}, using {:?}",
                        request,
                        new_request
                    );
                    request = new_request;
                    job = new_job;
                    material = new_material;
                } else {
                    // Can't put it back, answer it before the preview
                    Box::pin(process_command(next_cmd, command_rx, update_tx)).await;
                }
            }

            handlers::handle_preview_sheet(request, job, material, update_tx).await;
        }
        QuoteCommand::CalculateProduction {
            request,
            job,
            material,
            press,
        } => {
            handlers::handle_calculate_production(request, job, material, press, update_tx).await;
        }
        QuoteCommand::CalculateQuote {
            request,
            job,
            catalog,
            privileged,
            force,
        } => {
            handlers::handle_calculate_quote(request, job, catalog, privileged, force, update_tx)
                .await;
        }
        QuoteCommand::ValidateStructure { request, job } => {
            handlers::handle_validate(request, job, update_tx).await;
        }
        QuoteCommand::LoadJob { request, path } => {
            handlers::handle_load_job(request, path, update_tx).await;
        }
        QuoteCommand::LoadCatalog { request, path } => {
            handlers::handle_load_catalog(request, path, update_tx).await;
        }
    }
}
