use good_lp::solvers::SolutionStatus;
use good_lp::solvers::coin_cbc::{CoinCbcProblem, coin_cbc};
use good_lp::{ResolutionError, Solution, SolverModel};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::TentError;
use crate::interpret::INTEGRALITY_TOLERANCE;
use crate::model::TentModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Stopped early (time or gap limit) with a feasible solution.
    Feasible,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SolvedModel {
    pub status: SolveStatus,
    /// Value of each decision variable, in candidate order.
    pub values: Vec<f64>,
}

/// Something that can solve a [`TentModel`] to completion in one blocking call.
pub trait MilpSolver {
    fn solve(&self, model: TentModel) -> Result<SolvedModel, TentError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_threads")]
    pub threads: u32,
    #[serde(default)]
    pub verbose: bool,
    /// Relative optimality gap at which a solution is good enough.
    pub gap: Option<f64>,
    /// Wall clock limit in seconds.
    #[serde(rename = "timeLimit")]
    pub time_limit: Option<f64>,
}
fn default_threads() -> u32 {
    4
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            threads: default_threads(),
            verbose: false,
            gap: None,
            time_limit: None,
        }
    }
}

/// CBC through `good_lp`.
#[derive(Debug, Clone, Default)]
pub struct CbcSolver {
    config: SolverConfig,
}

impl CbcSolver {
    pub fn new(config: SolverConfig) -> Self {
        CbcSolver { config }
    }

    fn configure(&self, model: &mut CoinCbcProblem) {
        let config = &self.config;
        model.set_parameter("threads", &config.threads.to_string());
        model.set_parameter("loglevel", if config.verbose { "1" } else { "0" });
        if let Some(gap) = config.gap {
            model.set_parameter("ratioGap", &gap.to_string());
        }
        if let Some(seconds) = config.time_limit {
            model.set_parameter("seconds", &seconds.to_string());
        }
    }
}

impl MilpSolver for CbcSolver {
    fn solve(&self, model: TentModel) -> Result<SolvedModel, TentError> {
        let labels = model.labels();
        let TentModel {
            variables,
            selectors,
            memberships,
            objective,
            constraints,
        } = model;

        let mut problem = variables.maximise(objective).using(coin_cbc);
        self.configure(&mut problem);
        let problem = constraints
            .into_iter()
            .fold(problem, |m, row| m.with(row.constraint));

        info!(
            variables = selectors.len(),
            constraints = labels.len(),
            threads = self.config.threads,
            "solving"
        );
        let solution = match problem.solve() {
            Ok(solution) => solution,
            Err(ResolutionError::Infeasible) => {
                return Err(TentError::Infeasible {
                    constraints: labels,
                });
            }
            Err(err) => return Err(TentError::SolverFailure(err.to_string())),
        };

        let values: Vec<f64> = selectors.iter().map(|&v| solution.value(v)).collect();
        let status = incumbent_status(solution.status(), &values, &memberships)?;

        Ok(SolvedModel { status, values })
    }
}

/// Map the solver's status to ours.
///
/// A solve stopped by a time or gap limit may come back before any integer
/// solution was found, carrying relaxation values instead. Those are only
/// accepted when they are binary and place everyone in exactly one group.
pub fn incumbent_status(
    status: SolutionStatus,
    values: &[f64],
    memberships: &[Vec<usize>],
) -> Result<SolveStatus, TentError> {
    if matches!(status, SolutionStatus::Optimal) {
        return Ok(SolveStatus::Optimal);
    }

    let binary = values.iter().all(|v| {
        v.abs() <= INTEGRALITY_TOLERANCE || (v - 1.0).abs() <= INTEGRALITY_TOLERANCE
    });
    let placed_once = memberships.iter().all(|indices| {
        let occupancy: f64 = indices
            .iter()
            .map(|&i| values.get(i).copied().unwrap_or(0.0))
            .sum();
        (occupancy - 1.0).abs() <= INTEGRALITY_TOLERANCE * indices.len().max(1) as f64
    });

    if binary && placed_once {
        Ok(SolveStatus::Feasible)
    } else {
        Err(TentError::SolverFailure(format!(
            "stopped on {status:?} without a feasible solution"
        )))
    }
}
