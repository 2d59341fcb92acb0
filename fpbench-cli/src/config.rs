//! Configuration loading from fpbench.toml
//!
//! Configuration can be specified in an `fpbench.toml` file. Unless a path is
//! given explicitly, the file is discovered by walking up from the current
//! directory. Every field has a default; command-line flags override it.

use fpbench_core::{
    BINARY64_PRECISION, DEFAULT_EXEC_COUNT, DEFAULT_POOL_SIZE, DEFAULT_WARMUP_COUNT,
    ReducedFormat, Rounding,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up during discovery
pub const CONFIG_FILE_NAME: &str = "fpbench.toml";

/// fpbench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FpConfig {
    /// Iteration counts and operand pool
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Arbitrary-precision context
    #[serde(default)]
    pub precision: PrecisionConfig,
    /// Reduced-precision format
    #[serde(default)]
    pub reduced: ReducedConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Discarded calls per backend before measurement
    #[serde(default = "default_warmup_count")]
    pub warmup_count: usize,
    /// Measured calls per backend
    #[serde(default = "default_exec_count")]
    pub exec_count: usize,
    /// Number of operand pairs
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    /// Seed for a reproducible operand pool (entropy if unset)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Pin the run thread to this CPU
    #[serde(default)]
    pub pin_cpu: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_count: default_warmup_count(),
            exec_count: default_exec_count(),
            pool_size: default_pool_size(),
            seed: None,
            pin_cpu: None,
        }
    }
}

fn default_warmup_count() -> usize {
    DEFAULT_WARMUP_COUNT
}
fn default_exec_count() -> usize {
    DEFAULT_EXEC_COUNT
}
fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

/// Arbitrary-precision configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecisionConfig {
    /// Significand bits
    #[serde(default = "default_bits")]
    pub bits: u32,
    /// Rounding mode: "nearest", "zero", "up" or "down"
    #[serde(default)]
    pub rounding: Rounding,
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        Self {
            bits: default_bits(),
            rounding: Rounding::default(),
        }
    }
}

fn default_bits() -> u32 {
    BINARY64_PRECISION
}

/// Reduced-precision configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReducedConfig {
    /// Emulated format: "bf16" or "f16"
    #[serde(default)]
    pub format: ReducedFormat,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Existing directory receiving the result files
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
    /// Also write raw per-call durations
    #[serde(default)]
    pub dump_samples: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            dump_samples: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl FpConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Find `fpbench.toml` by walking up from the current directory
    pub fn discover_path() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                return Some(config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }
}
