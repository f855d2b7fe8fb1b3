use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::catalog::Catalog;
use crate::config::RunConfig;
use crate::error::{ConfigurationError, PipelineError};
use crate::model::build;
use crate::report::{AllocationTable, build_table, describe};
use crate::solver::{CbcSolver, MilpSolver};

/// What a run produced: the report text, and the allocation table when the
/// run was feasible
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub message: String,
    pub table: Option<AllocationTable>,
}

impl RunReport {
    pub fn feasible(&self) -> bool {
        self.table.is_some()
    }
}

/// Load the config at `conf`, solve with CBC and write the allocation of a
/// feasible run to the configured output.
pub fn run_pipeline(conf: &Path) -> Result<RunReport, PipelineError> {
    let config = RunConfig::load(conf)?;
    run_with(&config, &CbcSolver::new(config.solver_log))
}

/// Run once with the given solver
pub fn run_with<S: MilpSolver + ?Sized>(
    config: &RunConfig,
    solver: &S,
) -> Result<RunReport, PipelineError> {
    let catalog = Catalog::load(&config.inputs, config.empty_slot_cost)?;
    info!(
        items = catalog.len(),
        inputs = %config.inputs.display(),
        "loaded catalog"
    );

    let report = allocate(&catalog, config.num_slots, config.budget, solver)?;
    if let Some(table) = &report.table {
        write_table(&config.outputs, table)?;
        info!(outputs = %config.outputs.display(), "wrote allocation");
    }
    Ok(report)
}

/// Build, solve and report on a single allocation problem in memory
pub fn allocate<S: MilpSolver + ?Sized>(
    catalog: &Catalog,
    num_slots: u32,
    budget: f64,
    solver: &S,
) -> Result<RunReport, ConfigurationError> {
    let model = build(catalog, num_slots, budget)?;
    let result = solver.solve(model);
    info!(feasible = result.feasible(), status = ?result.status(), "solve finished");

    let message = describe(&result, catalog);
    // Absent exactly when the run is infeasible.
    let table = build_table(&result, catalog).ok();
    Ok(RunReport { message, table })
}

fn write_table(path: &Path, table: &AllocationTable) -> Result<(), PipelineError> {
    let file = File::create(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::to_writer(file, table).map_err(|source| PipelineError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
