use std::path::PathBuf;

// Re-export types from the engine crate
pub use quote_engine::{
    Catalog, JobInput, Machine, Material, ProductionResult, QuoteResult, SheetContext,
    StructureReport,
};

mod handlers;
mod worker;

pub use worker::worker_task;

/// Commands sent from a host to the worker
#[derive(Debug)]
pub enum QuoteCommand {
    /// Resolve the sheet context only. Queued previews are coalesced,
    /// only the newest one is answered.
    PreviewSheet {
        request: RequestId,
        job: JobInput,
        material: Option<Material>,
    },
    CalculateProduction {
        request: RequestId,
        job: JobInput,
        material: Option<Material>,
        press: Option<Machine>,
    },
    /// Price a job against a catalog snapshot. Without `force`, a job with
    /// missing required fields is answered with an error.
    CalculateQuote {
        request: RequestId,
        job: JobInput,
        catalog: Catalog,
        privileged: bool,
        force: bool,
    },
    ValidateStructure {
        request: RequestId,
        job: JobInput,
    },
    LoadJob {
        request: RequestId,
        path: PathBuf,
    },
    LoadCatalog {
        request: RequestId,
        path: PathBuf,
    },
}

impl QuoteCommand {
    pub fn request(&self) -> RequestId {
        match self {
            QuoteCommand::PreviewSheet { request, .. }
            | QuoteCommand::CalculateProduction { request, .. }
            | QuoteCommand::CalculateQuote { request, .. }
            | QuoteCommand::ValidateStructure { request, .. }
            | QuoteCommand::LoadJob { request, .. }
            | QuoteCommand::LoadCatalog { request, .. } => *request,
        }
    }
}

/// Updates sent from the worker back to the host
#[derive(Debug, Clone)]
pub enum QuoteUpdate {
    SheetPreview {
        request: RequestId,
        sheet: SheetContext,
    },
    ProductionCalculated {
        request: RequestId,
        production: ProductionResult,
    },
    QuoteCalculated {
        request: RequestId,
        quote: QuoteResult,
    },
    StructureValidated {
        request: RequestId,
        report: StructureReport,
    },
    JobLoaded {
        request: RequestId,
        job: JobInput,
    },
    CatalogLoaded {
        request: RequestId,
        catalog: Catalog,
    },
    Error {
        request: RequestId,
        message: String,
    },
}

impl QuoteUpdate {
    /// The request this update answers
    pub fn request(&self) -> RequestId {
        match self {
            QuoteUpdate::SheetPreview { request, .. }
            | QuoteUpdate::ProductionCalculated { request, .. }
            | QuoteUpdate::QuoteCalculated { request, .. }
            | QuoteUpdate::StructureValidated { request, .. }
            | QuoteUpdate::JobLoaded { request, .. }
            | QuoteUpdate::CatalogLoaded { request, .. }
            | QuoteUpdate::Error { request, .. } => *request,
        }
    }
}

/// Caller-chosen id echoed on every update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);
