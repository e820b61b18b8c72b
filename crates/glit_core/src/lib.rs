//! Glit core: pure data model and view-model helpers for a harvest run.
mod model;
mod request;
mod view_model;

pub use model::{HarvestReport, HarvestResult, RepositoryDescriptor};
pub use request::HarvestRequest;
pub use view_model::{ReportRowView, ReportView};
