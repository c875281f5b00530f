//! @ai:module:intent Configuration structs for interpretation and reporting
//! @ai:module:layer infrastructure
//! @ai:module:public_api InsightConfig, FallbackConfig, FallbackProfile, FallbackScores, SummaryConfig, OutputConfig
//! @ai:module:stateless true

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for the analysis tool
/// @ai:effects pure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    #[serde(default)]
    pub fallback: FallbackConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// @ai:intent Named sets of scores used when a payload carries no metric records
///
/// Two result views of the web client disagreed on these numbers; both are
/// kept reproducible instead of picking one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackProfile {
    /// 5.0 / 7.0 / 6.0
    #[default]
    Current,
    /// 6.5 / 8.5 / 7.2
    Legacy,
    /// Values taken from the `[fallback]` table
    Custom,
}

impl FallbackProfile {
    /// @ai:intent Parse a profile name as given on the command line
    /// @ai:effects pure
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "current" => Some(Self::Current),
            "legacy" => Some(Self::Legacy),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

/// @ai:intent Scores substituted into a synthesized record when the text has no score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackScores {
    pub difficulty: f64,
    pub alignment: f64,
    pub complexity: f64,
}

impl FallbackScores {
    pub const CURRENT: Self = Self {
        difficulty: 5.0,
        alignment: 7.0,
        complexity: 6.0,
    };

    pub const LEGACY: Self = Self {
        difficulty: 6.5,
        alignment: 8.5,
        complexity: 7.2,
    };
}

impl Default for FallbackScores {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// @ai:intent Fallback section of the configuration file
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackConfig {
    #[serde(default)]
    pub profile: FallbackProfile,
    #[serde(default = "default_fallback_difficulty")]
    pub difficulty: f64,
    #[serde(default = "default_fallback_alignment")]
    pub alignment: f64,
    #[serde(default = "default_fallback_complexity")]
    pub complexity: f64,
}

/// @ai:intent Summary and chart tuning knobs
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_fallback_minutes")]
    pub fallback_minutes: u64,
    #[serde(default = "default_chart_axis_floor")]
    pub chart_axis_floor: f64,
    #[serde(default = "default_cognitive_level")]
    pub default_cognitive_level: String,
}

/// @ai:intent Output locations for generated reports
/// @ai:effects pure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            profile: FallbackProfile::default(),
            difficulty: default_fallback_difficulty(),
            alignment: default_fallback_alignment(),
            complexity: default_fallback_complexity(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            fallback_minutes: default_fallback_minutes(),
            chart_axis_floor: default_chart_axis_floor(),
            default_cognitive_level: default_cognitive_level(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
        }
    }
}

fn default_fallback_difficulty() -> f64 {
    FallbackScores::CURRENT.difficulty
}

fn default_fallback_alignment() -> f64 {
    FallbackScores::CURRENT.alignment
}

fn default_fallback_complexity() -> f64 {
    FallbackScores::CURRENT.complexity
}

fn default_fallback_minutes() -> u64 {
    15
}

fn default_chart_axis_floor() -> f64 {
    10.0
}

fn default_cognitive_level() -> String {
    "Apply".to_string()
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl FallbackConfig {
    /// @ai:intent Resolve the profile into concrete scores
    /// @ai:effects pure
    pub fn scores(&self) -> FallbackScores {
        match self.profile {
            FallbackProfile::Current => FallbackScores::CURRENT,
            FallbackProfile::Legacy => FallbackScores::LEGACY,
            FallbackProfile::Custom => FallbackScores {
                difficulty: self.difficulty,
                alignment: self.alignment,
                complexity: self.complexity,
            },
        }
    }
}

impl InsightConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| Error::FileWrite {
            path: path.to_path_buf(),
            source,
        })
    }
}
