//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (OrgSource, CompanySearch)
//! but are themselves concrete structs, not traits.

mod chart;
mod search;

pub use chart::ChartService;
pub use search::SearchService;
