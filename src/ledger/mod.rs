mod active;
mod metrics;
pub(crate) mod recalc;

pub use active::{resolve_active, FallbackPolicy};
pub use metrics::{portfolio_metrics, PortfolioMetrics};
pub use recalc::{derive_position, recalculate_holding, Position};
