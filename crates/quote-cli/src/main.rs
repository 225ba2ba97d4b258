use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use quote_engine::{Catalog, JobInput, Machine, PressSelection, WorkType};
use std::path::{Path, PathBuf};

mod logger;
mod report;

#[derive(Parser)]
#[command(name = "pqt", about = "Print quote tools CLI", version)]
struct Cli {
    /// Print results as pretty JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the base and useful sheet for a job
    Sheet {
        /// Job JSON file
        #[arg(short, long)]
        job: PathBuf,

        /// Catalog JSON file (for the material's base format)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },

    /// Compute the production plan: imposition, sheets, plates, time
    Produce {
        /// Job JSON file
        #[arg(short, long)]
        job: PathBuf,

        /// Catalog JSON file
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Press id, overrides the job's press selection
        #[arg(long)]
        press: Option<u64>,
    },

    /// Price a job against a catalog
    Quote {
        /// Job JSON file
        #[arg(short, long)]
        job: PathBuf,

        /// Catalog JSON file
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Allow the job's hourly-rate override
        #[arg(long)]
        privileged: bool,

        /// Quote even when required fields are missing
        #[arg(long)]
        force: bool,
    },

    /// Check the job against its work-type rules
    Validate {
        /// Job JSON file
        #[arg(short, long)]
        job: PathBuf,
    },

    /// List the fields a work type requires
    Fields {
        #[arg(value_enum)]
        work_type: WorkTypeArg,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum WorkTypeArg {
    Revista,
    Folleto,
    Tarjeta,
    Etiqueta,
    Caja,
    Otro,
}

impl From<WorkTypeArg> for WorkType {
    fn from(arg: WorkTypeArg) -> Self {
        match arg {
            WorkTypeArg::Revista => Self::Revista,
            WorkTypeArg::Folleto => Self::Folleto,
            WorkTypeArg::Tarjeta => Self::Tarjeta,
            WorkTypeArg::Etiqueta => Self::Etiqueta,
            WorkTypeArg::Caja => Self::Caja,
            WorkTypeArg::Otro => Self::Otro,
        }
    }
}

async fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let catalog = Catalog::load(path).await?;
            log::info!(
                "Loaded catalog: {} materials, {} presses, {} processes",
                catalog.materials.len(),
                catalog.presses.len(),
                catalog.processes.len()
            );
            Ok(catalog)
        }
        None => {
            log::warn!("No catalog given, pricing without materials, presses or processes");
            Ok(Catalog::default())
        }
    }
}

fn select_press(catalog: &Catalog, selection: PressSelection) -> Option<&Machine> {
    let press = match selection.id() {
        None => catalog.cheapest_active_press(),
        Some(id) => catalog.press(id),
    };
    if press.is_none() {
        log::warn!("No press found for {:?}", selection);
    }
    press
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::CliLogger::from_flags(cli.verbose, cli.quiet).init()?;

    match cli.command {
        Commands::Sheet { job, catalog } => {
            let job = JobInput::load(&job).await?;
            let catalog = load_catalog(catalog.as_deref()).await?;
            let material = job.material_id.and_then(|id| catalog.material(id));

            let sheet = quote_engine::resolve_sheet_context(&job, material);
            if cli.json {
                print_json(&sheet)?;
            } else {
                report::print_sheet(&sheet);
            }
        }

        Commands::Produce {
            job,
            catalog,
            press,
        } => {
            let job = JobInput::load(&job).await?;
            let catalog = load_catalog(catalog.as_deref()).await?;
            let material = job.material_id.and_then(|id| catalog.material(id));
            let selection = press.map(PressSelection::Id).unwrap_or(job.press);
            let press = select_press(&catalog, selection);

            let production = quote_engine::calculate_production(&job, material, press);
            if cli.json {
                print_json(&production)?;
            } else {
                report::print_production(&production);
            }
        }

        Commands::Quote {
            job,
            catalog,
            privileged,
            force,
        } => {
            let job = JobInput::load(&job).await?;
            let catalog = load_catalog(catalog.as_deref()).await?;

            let quote = if force {
                quote_engine::quote_with_catalog(&job, &catalog, privileged)
            } else {
                quote_engine::checked_quote(&job, &catalog, privileged)?
            };
            if cli.json {
                print_json(&quote)?;
            } else {
                report::print_quote(&quote);
            }
        }

        Commands::Validate { job } => {
            let job = JobInput::load(&job).await?;
            let structure = quote_engine::validate_work_structure(&job);
            if cli.json {
                print_json(&structure)?;
            } else {
                report::print_report(&structure);
            }
            if !structure.valid {
                bail!(
                    "Missing required fields: {}",
                    structure.missing_fields.join(", ")
                );
            }
        }

        Commands::Fields { work_type } => {
            let work_type = WorkType::from(work_type);
            let fields = quote_engine::get_required_fields(work_type.as_str());
            if cli.json {
                print_json(&fields)?;
            } else if fields.is_empty() {
                println!("{}: no required fields", work_type);
            } else {
                println!("{}: {}", work_type, fields.join(", "));
            }
        }
    }

    Ok(())
}
