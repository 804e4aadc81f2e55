//! Projection inputs and scenario loading

mod params;
pub mod loader;

pub use params::{
    coerce_number, InputParameters, Parameter, MAX_PROJECTION_MONTHS, MIN_PROJECTION_MONTHS,
};
pub use loader::{load_scenarios, load_scenarios_from_reader, Scenario};
