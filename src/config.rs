use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{WaterBoxError, WaterBoxResult};

/// Floating-point precision of the materialized parameter and state tensors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Single,
    #[default]
    Double,
}

impl Precision {
    /// Round a value through the storage precision. Single precision values
    /// take the f32 round-trip; double precision is the identity.
    pub fn quantize(self, value: f64) -> f64 {
        match self {
            Precision::Single => value as f32 as f64,
            Precision::Double => value,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    #[default]
    Cpu,
}

impl Device {
    pub fn parse(name: &str) -> WaterBoxResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(Device::Cpu),
            other => Err(WaterBoxError::Unsupported(format!(
                "compute device '{other}' is not available"
            ))),
        }
    }
}

/// The on-disk layout of a fixture data set: a directory plus the file names
/// of the structure, trajectory, and parameter inputs inside it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FixtureLayout {
    pub dir: PathBuf,
    #[serde(default = "default_structure_file")]
    pub structure: String,
    #[serde(default = "default_trajectory_file")]
    pub trajectory: String,
    #[serde(default = "default_parameter_files")]
    pub parameters: Vec<String>,
}

impl FixtureLayout {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            structure: default_structure_file(),
            trajectory: default_trajectory_file(),
            parameters: default_parameter_files(),
        }
    }

    pub fn structure_path(&self) -> PathBuf {
        self.dir.join(&self.structure)
    }

    pub fn trajectory_path(&self) -> PathBuf {
        self.dir.join(&self.trajectory)
    }

    pub fn parameter_paths(&self) -> Vec<PathBuf> {
        self.parameters.iter().map(|p| self.dir.join(p)).collect()
    }
}

fn default_structure_file() -> String {
    "structure.psf".into()
}

fn default_trajectory_file() -> String {
    "output.xtc".into()
}

fn default_parameter_files() -> Vec<String> {
    vec!["parameters.prm".into()]
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WaterBoxConfig {
    pub layout: FixtureLayout,
    #[serde(default = "default_replicas")]
    pub n_replicas: usize,
    /// Requested thermostat target in Kelvin. Note that initial velocities
    /// are seeded at a fixed reference temperature, not this value; see
    /// `waterbox::VELOCITY_SEED_TEMPERATURE`.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub precision: Precision,
    #[serde(default)]
    pub device: Device,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_replicas() -> usize {
    1
}

fn default_temperature() -> f64 {
    300.0
}

impl WaterBoxConfig {
    pub fn new(layout: FixtureLayout) -> Self {
        Self {
            layout,
            n_replicas: default_replicas(),
            temperature: default_temperature(),
            precision: Precision::default(),
            device: Device::default(),
            seed: None,
        }
    }

    pub fn load(path: &Path) -> WaterBoxResult<Self> {
        let text = fs::read_to_string(path)?;
        let config: WaterBoxConfig = serde_json::from_str(&text)
            .map_err(|err| WaterBoxError::Parse(format!("bad fixture config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> WaterBoxResult<()> {
        if self.n_replicas == 0 {
            return Err(WaterBoxError::Invalid(
                "replica count must be at least 1".into(),
            ));
        }
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(WaterBoxError::Invalid(format!(
                "temperature {} K is not a valid target",
                self.temperature
            )));
        }
        Ok(())
    }
}
