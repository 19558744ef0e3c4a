//! orgmap: radial org-chart layout, filtering and node details.
//!
//! Layers, innermost first: `domain` (tree, layout, filter), `application`
//! (chart view state, rendering, services), `infrastructure` (data sources,
//! search client, wiring) and `cli`.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
