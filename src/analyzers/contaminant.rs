use std::cmp::Ordering;
use std::collections::BTreeMap;
use tracing::info;

use crate::analyzers::types::{ContaminantSummary, ContaminantTotals};
use crate::error::Result;
use crate::table::{Field, Table};

/// Sums illnesses, hospitalizations and deaths per contaminant.
///
/// Rows without a contaminant are skipped. The result is ordered by
/// illnesses, then hospitalizations, then deaths, all descending; full ties
/// fall back to the contaminant name.
pub fn analyze_contaminants(table: &Table) -> Result<ContaminantSummary> {
    table.require(&[
        Field::Contaminant,
        Field::Illnesses,
        Field::Hospitalizations,
        Field::Deaths,
    ])?;

    let mut groups: BTreeMap<&str, [f64; 3]> = BTreeMap::new();
    for record in table.records() {
        let Some(contaminant) = record.contaminant.as_deref() else {
            continue;
        };
        let totals = groups.entry(contaminant).or_default();
        totals[0] += record.illnesses.unwrap_or(0.0);
        totals[1] += record.hospitalizations.unwrap_or(0.0);
        totals[2] += record.deaths.unwrap_or(0.0);
    }

    let mut rows: Vec<ContaminantTotals> = groups
        .into_iter()
        .map(|(name, [illnesses, hospitalizations, deaths])| ContaminantTotals {
            contaminant: name.to_string(),
            illnesses,
            hospitalizations,
            deaths,
        })
        .collect();

    rows.sort_by(|a, b| by_harm_desc(a, b).then_with(|| a.contaminant.cmp(&b.contaminant)));

    info!(contaminants = rows.len(), "Contaminant totals computed");
    Ok(ContaminantSummary { rows })
}

fn by_harm_desc(a: &ContaminantTotals, b: &ContaminantTotals) -> Ordering {
    b.illnesses
        .total_cmp(&a.illnesses)
        .then_with(|| b.hospitalizations.total_cmp(&a.hospitalizations))
        .then_with(|| b.deaths.total_cmp(&a.deaths))
}
