//! Read a [`SimulationConfig`] from YAML and write results back as YAML.
//!
//! Example config:
//!
//! ```yaml
//! lattice:
//!   n_sites: 20
//!   spacing: 0.5
//!   step: 1.4
//! n_cor: 20
//! n_cf: [25, 100, 1000]
//! bootstrap_samples: 100
//! potential:
//!   kind: harmonic
//!   mass: 1.0
//! action: standard
//! seed: 42
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::engine::{SimulationConfig, SimulationResult};
use crate::error::{LatticeError, Result};

fn io_error(path: &Path, source: std::io::Error) -> LatticeError {
    LatticeError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Parse and validate a configuration from a YAML string.
pub fn parse_config(text: &str) -> Result<SimulationConfig> {
    let config: SimulationConfig = serde_yaml::from_str(text)?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate a configuration file.
pub fn read_config<P: AsRef<Path>>(path: P) -> Result<SimulationConfig> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let config: SimulationConfig = serde_yaml::from_reader(BufReader::new(file))?;
    config.validate()?;
    Ok(config)
}

/// Store the curves (and ensembles, when kept) of a batch.
pub fn write_results<P: AsRef<Path>>(path: P, results: &[SimulationResult]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_error(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_yaml::to_writer(&mut writer, results)?;
    writer.flush().map_err(|e| io_error(path, e))
}
