//! Newsletter Projection - month-by-month subscriber growth and ad-spend economics
//!
//! This library provides:
//! - The projection engine: churn, display-ad earnings, replenishment and
//!   reinvestment of net earnings into subscriber acquisition
//! - Input parameter validation, defaults and lenient form-style coercion
//! - CSV scenario loading and a batch/sensitivity scenario runner
//! - CSV and JSON export of month records

pub mod error;
pub mod inputs;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use error::{ProjectionError, Result};
pub use inputs::{InputParameters, Parameter, Scenario};
pub use projection::{project, MonthRecord, ProjectionEngine, ProjectionResult, ProjectionSummary};
pub use scenario::ScenarioRunner;
