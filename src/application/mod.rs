//! Application layer: services, view state and presentation
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod error;
pub mod error_ext;
pub mod render;
pub mod services;
pub mod view;
pub mod viewport;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use render::{NodeDetail, NodeStyle, RenderedChart};
pub use view::{ChartSnapshot, ChartView, LoadOutcome, LoadTicket, ViewState};
pub use viewport::{CanvasConfig, Viewport};
