mod client;
mod model;

pub use client::{ApiErrorClass, DatadogClient, DatadogError};
pub use model::{
    Dashboard, DashboardSummary, Monitor, MonitorSummary, Slo, SloSummary, SloThreshold,
    Synthetic, SyntheticSummary,
};
