//! Projection engine for month-by-month newsletter growth

mod state;
mod engine;
mod records;

pub use state::ProjectionState;
pub use engine::{project, round_half_up, ProjectionEngine, ProjectionRates, DAYS_PER_MONTH};
pub use records::{MetricComparison, MonthRecord, ProjectionResult, ProjectionSummary};
