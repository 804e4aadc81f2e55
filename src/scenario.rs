//! Scenario runner for batch and sensitivity projections
//!
//! Every projection is independent, so batches fan out across threads with
//! rayon. Results always come back in input order.

use crate::error::Result;
use crate::inputs::{InputParameters, Parameter, Scenario};
use crate::projection::{project, ProjectionResult};
use rayon::prelude::*;

/// Outcome of one named scenario
#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<ProjectionResult>,
}

/// Runner holding a base parameter set
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(InputParameters::default());
///
/// // How does the personal budget move the final subscriber count?
/// for (budget, result) in runner.sweep(Parameter::PersonalAdSpend, &[0.0, 500.0, 1000.0]) {
///     let result = result?;
///     println!("{budget}: {}", result.summary().subscribers.projected);
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base: InputParameters,
}

impl ScenarioRunner {
    pub fn new(base: InputParameters) -> Self {
        Self { base }
    }

    /// Project the base parameters
    pub fn run(&self) -> Result<ProjectionResult> {
        project(&self.base)
    }

    /// Project several parameter sets; each fails or succeeds on its own
    pub fn run_batch(&self, params: &[InputParameters]) -> Vec<Result<ProjectionResult>> {
        log::info!("Running batch of {} projections", params.len());
        params.par_iter().map(project).collect()
    }

    /// Project labelled scenarios
    pub fn run_scenarios(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        log::info!("Running {} scenarios", scenarios.len());
        scenarios
            .par_iter()
            .map(|s| ScenarioOutcome {
                name: s.name.clone(),
                result: project(&s.params),
            })
            .collect()
    }

    /// Vary one parameter of the base set across `values`
    pub fn sweep(
        &self,
        parameter: Parameter,
        values: &[f64],
    ) -> Vec<(f64, Result<ProjectionResult>)> {
        log::info!("Sweeping {} over {} values", parameter, values.len());
        values
            .par_iter()
            .map(|&value| (value, project(&self.base.with(parameter, value))))
            .collect()
    }

    /// Get reference to base parameters
    pub fn base(&self) -> &InputParameters {
        &self.base
    }

    /// Get mutable reference to base parameters for customization
    pub fn base_mut(&mut self) -> &mut InputParameters {
        &mut self.base
    }
}
