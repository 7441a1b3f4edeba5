//! Data types produced by the analyzers.

use serde::Serialize;
use std::collections::BTreeMap;

/// Outbreak count per calendar year, ascending by year.
pub type YearlyCounts = BTreeMap<i32, usize>;

/// Result of fitting a line through the yearly counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TrendFit {
    Linear {
        slope: f64,
        intercept: f64,
        r_squared: f64,
    },
    /// Fewer than two distinct years; no line can be fitted.
    Insufficient { distinct_years: usize },
}

impl TrendFit {
    pub fn slope(&self) -> Option<f64> {
        match self {
            TrendFit::Linear { slope, .. } => Some(*slope),
            TrendFit::Insufficient { .. } => None,
        }
    }

    pub fn r_squared(&self) -> Option<f64> {
        match self {
            TrendFit::Linear { r_squared, .. } => Some(*r_squared),
            TrendFit::Insufficient { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    pub yearly_counts: YearlyCounts,
    pub fit: TrendFit,
}

/// Summed harm for a single contaminant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContaminantTotals {
    pub contaminant: String,
    pub illnesses: f64,
    pub hospitalizations: f64,
    pub deaths: f64,
}

/// Contaminants ordered by (illnesses, hospitalizations, deaths), descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ContaminantSummary {
    pub(crate) rows: Vec<ContaminantTotals>,
}

impl ContaminantSummary {
    pub fn rows(&self) -> &[ContaminantTotals] {
        &self.rows
    }

    /// The first `n` rows, i.e. the `n` most harmful contaminants.
    pub fn top(&self, n: usize) -> &[ContaminantTotals] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn get(&self, contaminant: &str) -> Option<&ContaminantTotals> {
        self.rows.iter().find(|r| r.contaminant == contaminant)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Risk metrics for one preparation location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationRisk {
    pub location: String,
    pub count: usize,
    pub illnesses_sum: f64,
    pub illnesses_mean: f64,
    pub hospitalizations_sum: f64,
    pub hospitalizations_mean: f64,
    pub deaths_sum: f64,
    pub deaths_mean: f64,
    pub risk_score: f64,
}

/// Locations ordered by risk score, descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LocationSummary {
    pub(crate) rows: Vec<LocationRisk>,
}

impl LocationSummary {
    pub fn rows(&self) -> &[LocationRisk] {
        &self.rows
    }

    pub fn get(&self, location: &str) -> Option<&LocationRisk> {
        self.rows.iter().find(|r| r.location == location)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
