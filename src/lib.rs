pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod solver;

pub use catalog::{Catalog, CatalogItem, EMPTY_ITEM, TOTAL_KEY};
pub use config::RunConfig;
pub use error::{ConfigurationError, InvalidStateError, PipelineError};
pub use model::{Model, build, objective_expression, objective_value};
pub use pipeline::{RunReport, allocate, run_pipeline, run_with};
pub use report::{AllocationRow, AllocationTable, FAILURE_MESSAGE, build_table, describe};
pub use solver::{Assignment, CbcSolver, MilpSolver, SolveStatus, SolverResult};
