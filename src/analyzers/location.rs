use std::collections::BTreeMap;
use tracing::info;

use crate::analyzers::types::{LocationRisk, LocationSummary};
use crate::config::RiskWeights;
use crate::error::Result;
use crate::table::{Field, Table};

/// Running sum and number of observed values for one numeric field.
#[derive(Default, Clone, Copy)]
struct Accumulator {
    sum: f64,
    observed: usize,
}

impl Accumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.observed += 1;
        }
    }

    fn mean(&self) -> f64 {
        if self.observed == 0 {
            0.0
        } else {
            self.sum / self.observed as f64
        }
    }
}

#[derive(Default)]
struct LocationGroup {
    illnesses: Accumulator,
    hospitalizations: Accumulator,
    deaths: Accumulator,
}

/// Computes per-location harm statistics and ranks locations by risk.
///
/// `count` is the number of reports with an illness value. Each mean is taken
/// over the reports where that field was present. The risk score combines the
/// three means with `weights`; the result is ordered by score, descending.
pub fn analyze_locations(table: &Table, weights: &RiskWeights) -> Result<LocationSummary> {
    table.require(&[
        Field::Location,
        Field::Illnesses,
        Field::Hospitalizations,
        Field::Deaths,
    ])?;

    let mut groups: BTreeMap<&str, LocationGroup> = BTreeMap::new();
    for record in table.records() {
        let Some(location) = record.location.as_deref() else {
            continue;
        };
        let group = groups.entry(location).or_default();
        group.illnesses.push(record.illnesses);
        group.hospitalizations.push(record.hospitalizations);
        group.deaths.push(record.deaths);
    }

    let mut rows: Vec<LocationRisk> = groups
        .into_iter()
        .map(|(location, g)| {
            let ill = g.illnesses.mean();
            let hosp = g.hospitalizations.mean();
            let deaths = g.deaths.mean();
            LocationRisk {
                location: location.to_string(),
                count: g.illnesses.observed,
                illnesses_sum: g.illnesses.sum,
                illnesses_mean: ill,
                hospitalizations_sum: g.hospitalizations.sum,
                hospitalizations_mean: hosp,
                deaths_sum: g.deaths.sum,
                deaths_mean: deaths,
                risk_score: weights.score(ill, hosp, deaths),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.risk_score
            .total_cmp(&a.risk_score)
            .then_with(|| a.location.cmp(&b.location))
    });

    info!(
        locations = rows.len(),
        riskiest = rows.first().map(|r| r.location.as_str()),
        "Location risk computed"
    );
    Ok(LocationSummary { rows })
}
