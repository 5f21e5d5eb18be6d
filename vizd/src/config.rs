//! Daemon configuration.
//!
//! Sources, lowest priority first: built-in defaults, the JSON config file,
//! `NENGO_VIZ_*` environment variables, command-line flags.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nengo_viz::clock::{DEFAULT_KEPT_TIME, DEFAULT_SHOWN_TIME};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("missing value for {0}")]
    MissingValue(String),

    #[error("invalid value `{value}` for {flag}")]
    InvalidValue { flag: String, value: String },

    #[error("unknown argument `{0}`")]
    UnknownArgument(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VizConfig {
    /// Simulator feed address.
    pub addr: String,
    /// Redraw ticks per second.
    pub fps: u32,
    pub kept_time: f64,
    pub shown_time: f64,
    /// Seconds between status log lines. 0 disables them.
    pub status_every_secs: f64,
    /// Write the current views to the data directory on every status tick.
    pub dump_views: bool,
}

impl Default for VizConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:8080".to_string(),
            fps: 30,
            kept_time: DEFAULT_KEPT_TIME,
            shown_time: DEFAULT_SHOWN_TIME,
            status_every_secs: 5.0,
            dump_views: false,
        }
    }
}

impl VizConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full resolution: file (default location unless `--config` is given),
    /// then environment, then flags.
    pub fn load(default_file: Option<PathBuf>) -> Result<Self, ConfigError> {
        let args: Vec<String> = env::args().skip(1).collect();
        let file = config_flag(&args)?.or(default_file);

        let mut cfg = match file {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        cfg.apply_env(|key| env::var(key).ok());
        cfg.apply_args(args)?;
        Ok(cfg)
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = var("NENGO_VIZ_ADDR") {
            self.addr = addr;
        }
        if let Some(fps) = var("NENGO_VIZ_FPS").and_then(|v| v.parse::<u32>().ok()) {
            self.fps = fps;
        }
    }

    pub fn apply_args(
        &mut self,
        args: impl IntoIterator<Item = String>,
    ) -> Result<(), ConfigError> {
        let mut args = args.into_iter();
        while let Some(a) = args.next() {
            match a.as_str() {
                "--config" => {
                    // Already consumed by `load`.
                    next_value(&mut args, &a)?;
                }
                "--addr" => self.addr = next_value(&mut args, &a)?,
                "--fps" => self.fps = parse_value(&mut args, &a)?,
                "--kept-time" => self.kept_time = parse_seconds(&mut args, &a)?,
                "--shown-time" => self.shown_time = parse_seconds(&mut args, &a)?,
                "--status-secs" => self.status_every_secs = parse_seconds(&mut args, &a)?,
                "--dump" => self.dump_views = true,
                _ => return Err(ConfigError::UnknownArgument(a)),
            }
        }
        Ok(())
    }

    pub fn frame_period_ms(&self) -> u64 {
        (1000 / self.fps.max(1)).max(1) as u64
    }

    /// Interval between status lines, or `None` when they are disabled.
    pub fn status_period(&self) -> Option<Duration> {
        if self.status_every_secs.is_nan() || self.status_every_secs <= 0.0 {
            return None;
        }
        Duration::try_from_secs_f64(self.status_every_secs.max(0.1)).ok()
    }
}

fn config_flag(args: &[String]) -> Result<Option<PathBuf>, ConfigError> {
    let mut iter = args.iter();
    while let Some(a) = iter.next() {
        if a == "--config" {
            return match iter.next() {
                Some(v) => Ok(Some(PathBuf::from(v))),
                None => Err(ConfigError::MissingValue(a.clone())),
            };
        }
    }
    Ok(None)
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, ConfigError> {
    args.next()
        .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
}

fn parse_value<T: std::str::FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, ConfigError> {
    let value = next_value(args, flag)?;
    value.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        flag: flag.to_string(),
        value,
    })
}

/// A non-negative, finite number of seconds.
fn parse_seconds(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<f64, ConfigError> {
    let value = next_value(args, flag)?;
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue {
            flag: flag.to_string(),
            value,
        }),
    }
}
