//! Configuration for the synthesizer.
//!
//! Configuration is merged from three layers:
//! - Built-in defaults (the literals the stacks were written against)
//! - Project configuration file (`./stacksmith.toml`, or `--config`)
//! - Environment variables (`STACKSMITH_REGION`, `STACKSMITH_ACCOUNT`,
//!   `STACKSMITH_OUT_DIR`)
//!
//! The defaults address region `ap-northeast-1` with an empty account; the
//! file and env layers exist so the same declarations can be promoted to
//! other environments without touching code.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "stacksmith.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Deployment target settings
    pub target: DeployTarget,

    /// Network sizing settings
    pub network: NetworkConfig,

    /// Synthesis output settings
    pub synth: SynthConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target: DeployTarget::default(),
            network: NetworkConfig::default(),
            synth: SynthConfig::default(),
        }
    }
}

/// The account and region the stacks are addressed to.
///
/// Embedded by value in every stack record; stacks share it by copy, not by
/// reference into any live object graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployTarget {
    /// AWS account id; empty means "resolve at deploy time".
    pub account: String,

    /// AWS region the templates are synthesized for.
    pub region: String,
}

impl Default for DeployTarget {
    fn default() -> Self {
        Self {
            account: String::new(),
            region: "ap-northeast-1".to_string(),
        }
    }
}

/// Network sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of availability zones to spread subnets across.
    pub max_azs: usize,

    /// Address block of the VPC.
    pub vpc_cidr: String,

    /// Prefix length of each subnet carved from the VPC block.
    pub subnet_mask: u8,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            max_azs: 2,
            vpc_cidr: "10.0.0.0/16".to_string(),
            subnet_mask: 24,
        }
    }
}

/// Synthesis output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Directory templates and the manifest are written into.
    pub out_dir: PathBuf,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
        }
    }
}

impl Config {
    /// Loads configuration, layering file and environment over the defaults.
    ///
    /// An explicitly given path must exist; the default `stacksmith.toml` is
    /// optional.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::ConfigFileNotFound(path.to_path_buf()));
                }
                Self::from_file(path)?
            }
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration file.
    fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Applies environment variable overrides.
    fn apply_env(&mut self) {
        if let Ok(region) = env::var("STACKSMITH_REGION") {
            if !region.is_empty() {
                self.target.region = region;
            }
        }
        if let Ok(account) = env::var("STACKSMITH_ACCOUNT") {
            self.target.account = account;
        }
        if let Ok(out_dir) = env::var("STACKSMITH_OUT_DIR") {
            if !out_dir.is_empty() {
                self.synth.out_dir = PathBuf::from(out_dir);
            }
        }
    }

    /// Validates ranges the stack builders assume.
    fn validate(&self) -> Result<()> {
        if self.network.max_azs == 0 || self.network.max_azs > 4 {
            return Err(Error::InvalidConfig {
                key: "network.max_azs".to_string(),
                message: format!("must be between 1 and 4, got {}", self.network.max_azs),
            });
        }
        if !(16..=28).contains(&self.network.subnet_mask) {
            return Err(Error::InvalidConfig {
                key: "network.subnet_mask".to_string(),
                message: format!("must be between /16 and /28, got /{}", self.network.subnet_mask),
            });
        }
        if self.target.region.is_empty() {
            return Err(Error::InvalidConfig {
                key: "target.region".to_string(),
                message: "region must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
