use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use termcolor::ColorChoice;
use tracing::debug;

use crate::error::ConfigError;
use crate::transpose::{Transposition, MAX_SHIFT};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "MIDI_TRANSPOSER_CONFIG";
/// Picked up from the working directory when `CONFIG_ENV` is unset.
pub const CONFIG_FILE: &str = "transposer.json";
pub const DEFAULT_LOG_FILTER: &str = "midi_batch_transposer=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub transpose: TransposeConfig,
    /// Show the `i/n p%` line while running.
    pub progress: bool,
    pub color: ColorMode,
    /// Accept `q`/`quit`/`exit` on an interactive stdin to stop the run.
    pub listen_stdin: bool,
    /// Used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transpose: TransposeConfig::default(),
            progress: true,
            color: ColorMode::Auto,
            listen_stdin: true,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransposeConfig {
    pub min: i32,
    pub max: i32,
    pub include_zero: bool,
}

impl Default for TransposeConfig {
    fn default() -> Self {
        Self { min: -5, max: 6, include_zero: false }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto if std::io::stdout().is_terminal() => ColorChoice::Auto,
            ColorMode::Auto => ColorChoice::Never,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_config(path, &text)
    }

    /// The transpositions to apply to every file, ascending.
    pub fn shifts(&self) -> Result<Vec<Transposition>, ConfigError> {
        let TransposeConfig { min, max, include_zero } = self.transpose;
        let limit = MAX_SHIFT as i32;
        let range_error = |reason| ConfigError::Range { min, max, reason };

        if min < -limit || max > limit {
            return Err(range_error("bounds must lie within -12..=12"));
        }
        if min > max {
            return Err(range_error("min must not exceed max"));
        }
        let shifts: Vec<Transposition> = (min..=max)
            .filter(|v| include_zero || *v != 0)
            .filter_map(|v| Transposition::new(v).ok())
            .collect();
        if shifts.is_empty() {
            return Err(range_error("range contains no transposition to apply"));
        }
        Ok(shifts)
    }
}

fn parse_config(path: &Path, text: &str) -> Result<Config, ConfigError> {
    serde_json::from_str(text).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// `$MIDI_TRANSPOSER_CONFIG`, else `./transposer.json` if present.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    let local = Path::new(CONFIG_FILE);
    local.is_file().then(|| local.to_path_buf())
}

/// Load the config file if there is one, otherwise the defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    match config_path() {
        Some(path) => {
            debug!(path = %path.display(), "Loading config");
            Config::from_file(&path)
        }
        None => Ok(Config::default()),
    }
}
