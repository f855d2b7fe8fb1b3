use serde::{Deserialize, Serialize};
use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// Parameters of a single allocation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    #[serde(alias = "num_screens")]
    pub num_slots: u32,
    pub budget: f64,
    #[serde(alias = "empty_screen_cost", default)]
    pub empty_slot_cost: f64,
    /// Catalog table to read
    #[serde(default = "default_inputs")]
    pub inputs: PathBuf,
    /// Where the allocation table of a feasible run is written
    #[serde(default = "default_outputs")]
    pub outputs: PathBuf,
    #[serde(default)]
    pub solver_log: bool,
}
fn default_inputs() -> PathBuf {
    PathBuf::from("inputs.yaml")
}
fn default_outputs() -> PathBuf {
    PathBuf::from("outputs.yaml")
}

impl RunConfig {
    /// Read a config file. Relative `inputs`/`outputs` paths are taken
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let buf = read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: RunConfig =
            serde_yaml::from_str(&buf).map_err(|source| PipelineError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(dir) = path.parent() {
            config.inputs = dir.join(&config.inputs);
            config.outputs = dir.join(&config.outputs);
        }
        Ok(config)
    }
}
