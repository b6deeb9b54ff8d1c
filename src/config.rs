use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::error::{DissectError, Result};
use crate::import::SegmenterConfig;
use crate::input::DEFAULT_MAX_INPUT_BYTES;
use crate::session::SessionConfig;

/// Project-level config file, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "dissect.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub segmenter: SegmenterConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub robot: RobotConfig,
}

impl Config {
    /// Resolve the effective configuration.
    ///
    /// An explicit path (argument or `DISSECT_CONFIG`) replaces the global and
    /// project files. `DISSECT_*` environment variables apply last.
    pub fn load(explicit_path: Option<&Path>, project_root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("DISSECT_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                DissectError::MissingConfig(format!("config file {} not found", path.display()))
            })?;
            config.merge_patch(patch);
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(project_root)? {
                config.merge_patch(project);
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;

        Ok(config)
    }

    /// Location of the per-user config file, if the platform has one.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dissect/config.toml"))
    }

    /// Parse a TOML document and merge it over the defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let patch: ConfigPatch = toml::from_str(raw)
            .map_err(|err| DissectError::Config(format!("parse config: {err}")))?;
        let mut config = Self::default();
        config.merge_patch(patch);
        Ok(config)
    }

    /// Serialize as TOML, for `dissect config`.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| DissectError::Config(format!("serialize config: {err}")))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_project(project_root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&project_root.join(PROJECT_CONFIG_FILE))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            DissectError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            DissectError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.segmenter {
            merge_segmenter(&mut self.segmenter, patch);
        }
        if let Some(patch) = patch.session {
            merge_session(&mut self.session, patch);
        }
        if let Some(patch) = patch.input {
            self.input.merge(patch);
        }
        if let Some(patch) = patch.robot {
            self.robot.merge(patch);
        }
    }

    /// Apply `DISSECT_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvLookup(lookup);

        if let Some(value) = env.bool("DISSECT_ROBOT") {
            self.robot.enabled = value;
        }

        if let Some(value) = env.parse::<usize>("DISSECT_LONG_SEGMENT_CHARS")? {
            self.segmenter.long_segment_chars = value;
        }
        if let Some(value) = env.parse::<usize>("DISSECT_MIN_LINE_CHARS")? {
            self.segmenter.min_line_chars = value;
        }
        if let Some(value) = env.bool("DISSECT_SENTENCE_FALLBACK") {
            self.segmenter.sentence_fallback = value;
        }

        if let Some(value) = env.parse::<usize>("DISSECT_HISTORY_LIMIT")? {
            self.session.history_limit = (value > 0).then_some(value);
        }

        if let Some(value) = env.parse::<u64>("DISSECT_MAX_INPUT_BYTES")? {
            self.input.max_bytes = value;
        }

        if let Some(value) = env.string("DISSECT_ROBOT_FORMAT") {
            self.robot.format = <OutputFormat as ValueEnum>::from_str(value.trim(), true).map_err(|err| {
                DissectError::Config(format!("invalid DISSECT_ROBOT_FORMAT value {value}: {err}"))
            })?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,
}

const fn default_max_bytes() -> u64 {
    DEFAULT_MAX_INPUT_BYTES
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl InputConfig {
    fn merge(&mut self, patch: InputPatch) {
        if let Some(value) = patch.max_bytes {
            self.max_bytes = value;
        }
    }
}

/// Machine output without passing `--robot` on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_robot_format")]
    pub format: OutputFormat,
}

const fn default_robot_format() -> OutputFormat {
    OutputFormat::Json
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: OutputFormat::Json,
        }
    }
}

impl RobotConfig {
    /// Format used when no `--robot` or `--format` flag is given.
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.enabled {
            self.format
        } else {
            OutputFormat::Human
        }
    }

    fn merge(&mut self, patch: RobotPatch) {
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        if let Some(value) = patch.format {
            self.format = value;
        }
    }
}

fn merge_segmenter(config: &mut SegmenterConfig, patch: SegmenterPatch) {
    if let Some(value) = patch.long_segment_chars {
        config.long_segment_chars = value;
    }
    if let Some(value) = patch.min_line_chars {
        config.min_line_chars = value;
    }
    if let Some(value) = patch.sentence_fallback {
        config.sentence_fallback = value;
    }
}

fn merge_session(config: &mut SessionConfig, patch: SessionPatch) {
    if let Some(value) = patch.history_limit {
        config.history_limit = (value > 0).then_some(value);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigPatch {
    pub segmenter: Option<SegmenterPatch>,
    pub session: Option<SessionPatch>,
    pub input: Option<InputPatch>,
    pub robot: Option<RobotPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SegmenterPatch {
    pub long_segment_chars: Option<usize>,
    pub min_line_chars: Option<usize>,
    pub sentence_fallback: Option<bool>,
}

/// `history_limit = 0` means unbounded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionPatch {
    pub history_limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct InputPatch {
    pub max_bytes: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RobotPatch {
    pub enabled: Option<bool>,
    pub format: Option<OutputFormat>,
}

struct EnvLookup<F>(F);

impl<F> EnvLookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn string(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.string(key).map(|value| {
            matches!(
                value.to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
    }

    fn parse<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.string(key) {
            Some(value) => value.trim().parse::<T>().map(Some).map_err(|err| {
                DissectError::Config(format!("invalid {key} value {value}: {err}"))
            }),
            None => Ok(None),
        }
    }
}
