//! Feedback-loop configuration.
//!
//! Precedence (highest to lowest):
//! 1. Environment variables (`QCF_` prefix)
//! 2. Configuration file (YAML or JSON, chosen by extension)
//! 3. Default values
//!
//! Command-line flags are applied on top by the binary.

use std::path::Path;

use qcf_operator::Coefficients;
use qcf_oracle::{SolverConfig, SolverStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{LoopError, LoopResult};

pub const ENV_ITERATIONS: &str = "QCF_ITERATIONS";
pub const ENV_COUPLING_INIT: &str = "QCF_COUPLING_INIT";
pub const ENV_LEARNING_RATE: &str = "QCF_LEARNING_RATE";
pub const ENV_STRATEGY: &str = "QCF_STRATEGY";

/// Settings for one feedback run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopConfig {
    /// Number of iterations.
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Starting coupling parameter.
    #[serde(default = "default_coupling_init")]
    pub coupling_init: f64,

    /// Step size of `coupling' = coupling - learning_rate * energy`.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    /// Basis coefficients a, b, c, d.
    #[serde(default)]
    pub coefficients: Coefficients,

    /// Solver handed to the oracle on every iteration.
    #[serde(default = "SolverConfig::vqe_feedback")]
    pub solver: SolverConfig,
}

fn default_iterations() -> usize {
    10
}

fn default_coupling_init() -> f64 {
    0.1
}

fn default_learning_rate() -> f64 {
    0.01
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            coupling_init: default_coupling_init(),
            learning_rate: default_learning_rate(),
            coefficients: Coefficients::default(),
            solver: SolverConfig::vqe_feedback(),
        }
    }
}

enum Format {
    Yaml,
    Json,
}

impl LoopConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> LoopResult<Self> {
        let path = path.as_ref();
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Format::Yaml,
            Some("json") => Format::Json,
            _ => {
                return Err(LoopError::Configuration(format!(
                    "unsupported config file '{}' (expected .yaml, .yml or .json)",
                    path.display()
                )));
            }
        };
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LoopError::Configuration(format!("cannot read '{}': {e}", path.display()))
        })?;
        match format {
            Format::Yaml => Self::from_yaml(&contents),
            Format::Json => Self::from_json(&contents),
        }
    }

    /// Parse YAML text.
    pub fn from_yaml(text: &str) -> LoopResult<Self> {
        serde_yaml_ng::from_str(text)
            .map_err(|e| LoopError::Configuration(format!("invalid YAML config: {e}")))
    }

    /// Parse JSON text.
    pub fn from_json(text: &str) -> LoopResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| LoopError::Configuration(format!("invalid JSON config: {e}")))
    }

    /// File (or defaults), then environment overrides, then validation.
    pub fn load(config_file: Option<&Path>) -> LoopResult<Self> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `QCF_*` overrides from the process environment.
    pub fn merge_env(self) -> LoopResult<Self> {
        self.merge_env_with(|key| std::env::var(key).ok())
    }

    /// Apply `QCF_*` overrides from `lookup`. Only variables that are set
    /// override; an unparsable value is a configuration error.
    pub fn merge_env_with(mut self, lookup: impl Fn(&str) -> Option<String>) -> LoopResult<Self> {
        if let Some(v) = lookup(ENV_ITERATIONS) {
            self.iterations = parse_env(ENV_ITERATIONS, &v)?;
        }
        if let Some(v) = lookup(ENV_COUPLING_INIT) {
            self.coupling_init = parse_env(ENV_COUPLING_INIT, &v)?;
        }
        if let Some(v) = lookup(ENV_LEARNING_RATE) {
            self.learning_rate = parse_env(ENV_LEARNING_RATE, &v)?;
        }
        if let Some(v) = lookup(ENV_STRATEGY) {
            self.solver.strategy = v.parse::<SolverStrategy>()?;
        }
        Ok(self)
    }

    /// Check loop settings and the embedded solver config.
    ///
    /// Non-finite coefficients are left to the operator builder, which
    /// reports them as [`LoopError::InvalidCoefficient`].
    pub fn validate(&self) -> LoopResult<()> {
        if self.iterations == 0 {
            return Err(LoopError::Configuration(
                "iterations must be greater than 0".to_string(),
            ));
        }
        if !self.learning_rate.is_finite() {
            return Err(LoopError::Configuration(format!(
                "learning_rate must be finite, got {}",
                self.learning_rate
            )));
        }
        self.solver.validate()?;
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> LoopResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| LoopError::Configuration(format!("{key}={value}: {e}")))
}
