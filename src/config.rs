//! Analysis configuration.
//!
//! Stored as JSON on disk; every section is optional and falls back to the
//! defaults below:
//! ```json
//! {
//!   "risk_weights": { "illnesses": 1.0, "hospitalizations": 5.0, "deaths": 20.0 },
//!   "imputation": { "contaminant": "zero" },
//!   "count_mode": "distinct-ids",
//!   "chart": { "width": 1200, "height": 1500, "top_contaminants": 10 },
//!   "delimiter": ","
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::table::{Field, FieldKind};

pub const DEFAULT_ILLNESS_WEIGHT: f64 = 1.0;
pub const DEFAULT_HOSPITALIZATION_WEIGHT: f64 = 5.0;
pub const DEFAULT_DEATH_WEIGHT: f64 = 20.0;

pub const DEFAULT_TOP_CONTAMINANTS: usize = 10;
pub const DEFAULT_FIGURE_WIDTH: u32 = 1200;
pub const DEFAULT_FIGURE_HEIGHT: u32 = 1500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub risk_weights: RiskWeights,

    #[serde(default)]
    pub imputation: ImputationPolicy,

    #[serde(default)]
    pub count_mode: CountMode,

    #[serde(default)]
    pub chart: ChartConfig,

    /// Column delimiter of the input file. Must be a single ASCII character.
    #[serde(default)]
    pub delimiter: Delimiter,
}

impl AnalysisConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AnalysisConfig = serde_json::from_str(&content)
            .map_err(|e| AnalysisError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.risk_weights.validate()?;
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(AnalysisError::Config(format!(
                "figure size must be non-zero, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        self.delimiter.as_byte()?;
        Ok(())
    }
}

/// Weights of the per-location risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    pub illnesses: f64,
    pub hospitalizations: f64,
    pub deaths: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            illnesses: DEFAULT_ILLNESS_WEIGHT,
            hospitalizations: DEFAULT_HOSPITALIZATION_WEIGHT,
            deaths: DEFAULT_DEATH_WEIGHT,
        }
    }
}

impl RiskWeights {
    pub fn score(&self, mean_illnesses: f64, mean_hospitalizations: f64, mean_deaths: f64) -> f64 {
        mean_illnesses * self.illnesses
            + mean_hospitalizations * self.hospitalizations
            + mean_deaths * self.deaths
    }

    fn validate(&self) -> Result<()> {
        for (name, w) in [
            ("illnesses", self.illnesses),
            ("hospitalizations", self.hospitalizations),
            ("deaths", self.deaths),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(AnalysisError::Config(format!(
                    "risk weight for {name} must be a non-negative number, got {w}"
                )));
            }
        }
        Ok(())
    }
}

/// How a missing cell is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Imputation {
    /// Numbers become `0.0`, labels become `"0"`, dates become 1970-01-01.
    Zero,
    /// Leave the value absent.
    Missing,
}

/// Per-field imputation strategies.
///
/// Fields without an explicit override use [`ImputationPolicy::default_for`]:
/// numeric fields are zero-filled, labels and dates are left missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImputationPolicy {
    overrides: BTreeMap<Field, Imputation>,
}

impl ImputationPolicy {
    /// Zero-fill every field, labels and dates included.
    pub fn fill_zero() -> Self {
        Self {
            overrides: Field::ALL.into_iter().map(|f| (f, Imputation::Zero)).collect(),
        }
    }

    pub fn with(mut self, field: Field, strategy: Imputation) -> Self {
        self.overrides.insert(field, strategy);
        self
    }

    pub fn default_for(kind: FieldKind) -> Imputation {
        match kind {
            FieldKind::Numeric => Imputation::Zero,
            FieldKind::Label | FieldKind::Date => Imputation::Missing,
        }
    }

    pub fn strategy(&self, field: Field) -> Imputation {
        self.overrides
            .get(&field)
            .copied()
            .unwrap_or_else(|| Self::default_for(field.kind()))
    }
}

/// What counts as one outbreak when building yearly counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CountMode {
    /// Every dated row counts once.
    #[default]
    Rows,
    /// Distinct outbreak identifiers per year.
    DistinctIds,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// Number of contaminants shown in the illness bar chart.
    pub top_contaminants: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIGURE_WIDTH,
            height: DEFAULT_FIGURE_HEIGHT,
            top_contaminants: DEFAULT_TOP_CONTAMINANTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Delimiter(pub char);

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter(',')
    }
}

impl Delimiter {
    pub fn as_byte(self) -> Result<u8> {
        if self.0.is_ascii() {
            Ok(self.0 as u8)
        } else {
            Err(AnalysisError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.0
            )))
        }
    }
}
