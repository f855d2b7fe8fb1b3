use good_lp::{Constraint, Expression, ProblemVariables, Variable, variable, variables};
use tracing::debug;

use crate::catalog::{Catalog, is_non_negative};
use crate::error::ConfigurationError;

pub const SLOTS_LABEL: &str = "every slot must be assigned";
pub const BUDGET_LABEL: &str = "limited budget";

/// A constraint together with the human-readable rule it encodes
pub struct LabeledConstraint {
    pub label: &'static str,
    pub constraint: Constraint,
}

/// The integer program for a single run.
///
/// `counts[i]` is the number of slots given to the i-th catalog item.
pub struct Model {
    pub variables: ProblemVariables,
    pub counts: Vec<Variable>,
    pub objective: Expression,
    pub constraints: Vec<LabeledConstraint>,
}

impl Model {
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constraints.iter().map(|c| c.label)
    }
}

/// Formulate the allocation of `num_slots` slots among the catalog items
/// maximizing revenue within `budget`.
pub fn build(catalog: &Catalog, num_slots: u32, budget: f64) -> Result<Model, ConfigurationError> {
    if num_slots == 0 {
        return Err(ConfigurationError::NonPositiveSlots);
    }
    if !is_non_negative(budget) {
        return Err(ConfigurationError::InvalidBudget(budget));
    }
    if catalog.is_empty() {
        return Err(ConfigurationError::EmptyCatalog);
    }

    let (variables, counts) = init_variables(catalog, num_slots);
    let objective = objective_expression(catalog, &counts);
    let constraints = vec![
        constrain_every_slot_assigned(&counts, num_slots),
        constrain_budget(catalog, &counts, budget),
    ];

    debug!(
        variables = counts.len(),
        constraints = constraints.len(),
        num_slots,
        budget,
        "built allocation model"
    );

    Ok(Model {
        variables,
        counts,
        objective,
        constraints,
    })
}

/// One integer count per item, each within `[0, num_slots]`
fn init_variables(catalog: &Catalog, num_slots: u32) -> (ProblemVariables, Vec<Variable>) {
    let mut problem_vars = variables!();
    let counts = catalog
        .iter()
        .map(|_| problem_vars.add(variable().integer().min(0).max(num_slots)))
        .collect();
    (problem_vars, counts)
}

/// Total revenue as a linear expression over the decision variables
pub fn objective_expression(catalog: &Catalog, counts: &[Variable]) -> Expression {
    catalog
        .revenue_coefficients()
        .zip(counts)
        .fold(Expression::from(0.0), |sum, (revenue, &count)| {
            sum + count * revenue
        })
}

/// Total revenue of an already solved allocation
pub fn objective_value(catalog: &Catalog, counts: &[u32]) -> f64 {
    catalog
        .revenue_coefficients()
        .zip(counts)
        .map(|(revenue, &count)| f64::from(count) * revenue)
        .sum()
}

/// Total cost of an already solved allocation
pub fn cost_value(catalog: &Catalog, counts: &[u32]) -> f64 {
    catalog
        .cost_coefficients()
        .zip(counts)
        .map(|(cost, &count)| f64::from(count) * cost)
        .sum()
}

fn constrain_every_slot_assigned(counts: &[Variable], num_slots: u32) -> LabeledConstraint {
    let assigned = counts
        .iter()
        .fold(Expression::from(0.0), |sum, &count| sum + count);
    LabeledConstraint {
        label: SLOTS_LABEL,
        constraint: assigned.eq(f64::from(num_slots)),
    }
}

fn constrain_budget(catalog: &Catalog, counts: &[Variable], budget: f64) -> LabeledConstraint {
    let spent = catalog
        .cost_coefficients()
        .zip(counts)
        .fold(Expression::from(0.0), |sum, (cost, &count)| sum + count * cost);
    LabeledConstraint {
        label: BUDGET_LABEL,
        constraint: spent.leq(budget),
    }
}
