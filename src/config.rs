//! Simulation parameters and their on-disk form.
//!
//! The configuration lives in a small, human-editable JSON file (by default
//! `~/.vaccinate`). Keys use the same names the file has always had, so existing files
//! keep loading:
//!
//! ```json
//! {
//! 	"InfectionRate": 10,
//! 	"MaxSickDays": 3,
//! 	"NumberOfPeople": 100,
//! 	"Visits": 10000,
//! 	"Unbounded": false
//! }
//! ```
//!
//! Missing keys fall back to their defaults and unknown keys are ignored.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

use crate::error::VaccinateError;

/// Name of the configuration file inside the configuration directory.
pub const CONFIG_FILE: &str = ".vaccinate";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SimulationConfig {
    /// Percent chance in `[0, 100]` that one contact infects a healthy neighbor.
    pub infection_rate: u32,
    /// An infected individual recovers once its sick day count exceeds this.
    pub max_sick_days: u32,
    pub number_of_people: usize,
    /// Number of nodes one `visit()` walks. Zero skips the cycle.
    #[serde(rename = "Visits")]
    pub visits_per_iteration: u64,
    /// Whether the caller should keep running cycles until told to stop.
    pub unbounded: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            infection_rate: 10,
            max_sick_days: 3,
            number_of_people: 100,
            visits_per_iteration: 10_000,
            unbounded: false,
        }
    }
}

/// Returns `~/.vaccinate`.
///
/// # Errors
/// Returns an error if the home directory cannot be determined.
pub fn default_config_path() -> Result<PathBuf, VaccinateError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_FILE))
        .ok_or_else(|| VaccinateError::ConfigError("cannot determine home directory".into()))
}

impl SimulationConfig {
    /// Checks the invariants a population relies on. A population size of zero is left
    /// to `build_population`, which reports it as a construction error.
    ///
    /// # Errors
    /// Returns `ConfigError` if `infection_rate` is not a percentage.
    pub fn validate(&self) -> Result<(), VaccinateError> {
        if self.infection_rate > 100 {
            return Err(VaccinateError::ConfigError(format!(
                "InfectionRate must be between 0 and 100, got {}",
                self.infection_rate
            )));
        }
        Ok(())
    }

    /// Reads, parses and validates the configuration stored at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or fails
    /// validation.
    pub fn load(path: &Path) -> Result<Self, VaccinateError> {
        debug!("reading configuration from {}", path.display());
        let data = fs::read_to_string(path)?;
        let config: SimulationConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration to `path` as tab-indented JSON, creating parent
    /// directories as needed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), VaccinateError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut data = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut data, formatter);
        self.serialize(&mut serializer)?;
        fs::write(path, data)?;
        debug!("wrote configuration to {}", path.display());
        Ok(())
    }

    /// Loads the configuration at `path`, first writing the defaults there if no file
    /// exists yet.
    ///
    /// # Errors
    /// Returns an error if the defaults cannot be written or the file cannot be loaded.
    pub fn load_or_create(path: &Path) -> Result<Self, VaccinateError> {
        if !path.exists() {
            info!("no configuration at {}, writing defaults", path.display());
            SimulationConfig::default().save(path)?;
        }
        SimulationConfig::load(path)
    }

    /// Updates a single field. `key` is either the on-disk name (`NumberOfPeople`) or
    /// the short form used at the prompt (`people`).
    ///
    /// # Errors
    /// Returns `ConfigError` for unknown keys, unparsable values, or a result that
    /// fails validation. On error the configuration is left unchanged.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), VaccinateError> {
        let mut updated = self.clone();
        match key {
            "people" | "NumberOfPeople" => updated.number_of_people = parse_value(key, value)?,
            "infection-rate" | "InfectionRate" => {
                updated.infection_rate = parse_value(key, value)?;
            }
            "max-sick-days" | "MaxSickDays" => updated.max_sick_days = parse_value(key, value)?,
            "visits" | "Visits" => updated.visits_per_iteration = parse_value(key, value)?,
            "unbounded" | "Unbounded" => updated.unbounded = parse_value(key, value)?,
            _ => {
                return Err(VaccinateError::ConfigError(format!(
                    "unknown configuration key: {key}"
                )))
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, VaccinateError> {
    value.parse().map_err(|_| {
        VaccinateError::ConfigError(format!("invalid value for {key}: {value}"))
    })
}
