//! Print-shop quoting engine: sheet geometry, work-type rules, production
//! planning and pricing over a read-only catalog snapshot.

mod catalog;
pub mod constants;
mod job;
mod pricing;
mod production;
mod sheet;
mod strategy;
mod types;
mod work_type;

pub use catalog::*;
pub use job::{CutSheetRequest, JobInput, PressSelection};
pub use pricing::{NO_PRICE_NOTE, calculate_quote, checked_quote, quote_with_catalog};
pub use production::{calculate_production, press_passes, usable_area, waste_pct};
pub use sheet::{
    estimate_pieces_per_base, parse_sheet_format, resolve_base_sheet, resolve_sheet_context,
    split_sheet,
};
pub use strategy::*;
pub use types::*;
pub use work_type::*;
