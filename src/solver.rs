use good_lp::solvers::coin_cbc::coin_cbc;
use good_lp::{ResolutionError, Solution as LpSolution, SolverModel};
use tracing::{info, warn};

use crate::model::Model;

/// How a solve attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error(String),
}

/// Slot counts in catalog order, with the objective value the solver reported
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub counts: Vec<u32>,
    pub objective: f64,
}

/// Outcome of a single solve. An assignment is present exactly when the
/// solver certified an optimum.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResult {
    status: SolveStatus,
    assignment: Option<Assignment>,
}

impl SolverResult {
    pub fn optimal(counts: Vec<u32>, objective: f64) -> Self {
        Self {
            status: SolveStatus::Optimal,
            assignment: Some(Assignment { counts, objective }),
        }
    }

    /// A run without an allocation. `Optimal` is not a failure status and is
    /// reported as a solver error.
    pub fn failed(status: SolveStatus) -> Self {
        let status = match status {
            SolveStatus::Optimal => SolveStatus::Error("optimal status without assignment".into()),
            other => other,
        };
        Self {
            status,
            assignment: None,
        }
    }

    pub fn feasible(&self) -> bool {
        self.assignment.is_some()
    }

    pub fn status(&self) -> &SolveStatus {
        &self.status
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        self.assignment.as_ref()
    }
}

/// A MILP backend able to maximize a [`Model`]
pub trait MilpSolver {
    /// Make a single solve attempt. Every outcome other than a certified
    /// optimum yields an infeasible result.
    fn solve(&self, model: Model) -> SolverResult;
}

/// COIN-OR CBC branch-and-cut solver
#[derive(Debug, Clone, Copy, Default)]
pub struct CbcSolver {
    /// Keep CBC's own log output
    pub verbose: bool,
}

impl CbcSolver {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl MilpSolver for CbcSolver {
    fn solve(&self, model: Model) -> SolverResult {
        let Model {
            variables,
            counts,
            objective,
            constraints,
        } = model;

        let mut problem = variables.maximise(objective.clone()).using(coin_cbc);
        if !self.verbose {
            problem.set_parameter("loglevel", "0");
        }
        let problem = constraints
            .into_iter()
            .fold(problem, |p, labeled| p.with(labeled.constraint));

        match problem.solve() {
            Ok(solution) => {
                let values = counts
                    .iter()
                    .map(|&count| solution.value(count).round() as u32)
                    .collect();
                let objective = solution.eval(objective);
                info!(objective, "solver found an optimal allocation");
                SolverResult::optimal(values, objective)
            }
            Err(err) => {
                let status = status_of(err);
                warn!(?status, "solver did not find an optimal allocation");
                SolverResult::failed(status)
            }
        }
    }
}

fn status_of(err: ResolutionError) -> SolveStatus {
    match err {
        ResolutionError::Infeasible => SolveStatus::Infeasible,
        ResolutionError::Unbounded => SolveStatus::Unbounded,
        other => SolveStatus::Error(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, CatalogItem};
    use crate::model::{build, cost_value, objective_value};

    fn catalog(empty_slot_cost: f64) -> Catalog {
        Catalog::new(
            vec![CatalogItem::new("A", 10.0, 2.0), CatalogItem::new("B", 8.0, 1.0)],
            empty_slot_cost,
        )
        .unwrap()
    }

    fn solve(catalog: &Catalog, num_slots: u32, budget: f64) -> SolverResult {
        let model = build(catalog, num_slots, budget).unwrap();
        CbcSolver::default().solve(model)
    }

    #[test]
    fn fills_every_slot_within_budget() {
        let catalog = catalog(0.0);
        let result = solve(&catalog, 5, 9.0);
        assert!(result.feasible());
        assert_eq!(result.status(), &SolveStatus::Optimal);

        let assignment = result.assignment().unwrap();
        assert_eq!(assignment.counts, vec![4, 1, 0]);
        assert_eq!(assignment.counts.iter().sum::<u32>(), 5);
        assert!(cost_value(&catalog, &assignment.counts) <= 9.0);
        assert!((objective_value(&catalog, &assignment.counts) - assignment.objective).abs() < 1e-6);
    }

    #[test]
    fn zero_budget_leaves_every_slot_empty() {
        let result = solve(&catalog(0.0), 5, 0.0);
        assert_eq!(result.assignment().unwrap().counts, vec![0, 0, 5]);
    }

    #[test]
    fn unaffordable_slots_are_infeasible() {
        let catalog = Catalog::new(
            vec![CatalogItem::new("A", 10.0, 4.0), CatalogItem::new("B", 8.0, 3.0)],
            3.0,
        )
        .unwrap();
        let result = solve(&catalog, 5, 10.0);
        assert!(!result.feasible());
        assert_eq!(result.status(), &SolveStatus::Infeasible);
        assert!(result.assignment().is_none());
    }

    #[test]
    fn failed_result_never_claims_optimality() {
        let result = SolverResult::failed(SolveStatus::Optimal);
        assert!(!result.feasible());
        assert!(matches!(result.status(), SolveStatus::Error(_)));
    }
}
