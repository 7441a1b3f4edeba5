//! Static charts for an analysis run.
//!
//! Renders one SVG document with three stacked panels: the yearly outbreak
//! line, the top contaminants by illnesses, and location risk scores.

use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt;
use tracing::debug;

use crate::analyzers::types::{ContaminantSummary, LocationSummary, YearlyCounts};
use crate::config::ChartConfig;
use crate::error::{AnalysisError, Result};

/// A rendered SVG figure.
#[derive(Clone, PartialEq)]
pub struct Figure {
    svg: String,
    width: u32,
    height: u32,
}

impl Figure {
    pub fn svg(&self) -> &str {
        &self.svg
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl fmt::Debug for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Figure")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("svg_bytes", &self.svg.len())
            .finish()
    }
}

fn render_err(e: impl fmt::Display) -> AnalysisError {
    AnalysisError::Render(e.to_string())
}

/// Draws the three analysis charts into a single figure.
pub fn render(
    yearly: &YearlyCounts,
    contaminants: &ContaminantSummary,
    locations: &LocationSummary,
    chart: &ChartConfig,
) -> Result<Figure> {
    let top: Vec<(String, f64)> = contaminants
        .top(chart.top_contaminants)
        .iter()
        .map(|r| (r.contaminant.clone(), r.illnesses))
        .collect();
    let risk: Vec<(String, f64)> = locations
        .rows()
        .iter()
        .map(|r| (r.location.clone(), r.risk_score))
        .collect();

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (chart.width, chart.height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let panels = root.split_evenly((3, 1));
        draw_trend(&panels[0], yearly)?;
        draw_bars(
            &panels[1],
            &format!("Top {} Contaminants by Illnesses", chart.top_contaminants),
            "Contaminant",
            "Number of Illnesses",
            &top,
            BLUE,
        )?;
        draw_bars(
            &panels[2],
            "Location Risk Scores",
            "Location",
            "Risk Score",
            &risk,
            RED,
        )?;

        root.present().map_err(render_err)?;
    }

    debug!(bytes = svg.len(), "Figure rendered");
    Ok(Figure {
        svg,
        width: chart.width,
        height: chart.height,
    })
}

/// Upper bound of a value axis starting at zero, with 10% headroom.
///
/// plotters cannot lay out a mesh over an unbounded range.
fn axis_max(peak: f64) -> Result<f64> {
    let y_max = if peak > 0.0 { peak * 1.1 } else { 1.0 };
    if y_max.is_finite() {
        Ok(y_max)
    } else {
        Err(AnalysisError::Render(format!("axis range 0..{y_max} is not finite")))
    }
}

fn draw_trend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    yearly: &YearlyCounts,
) -> Result<()> {
    let (first, last) = match (yearly.keys().next(), yearly.keys().next_back()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => (0, 1),
    };
    // A single year still needs a non-empty axis.
    let (x_min, x_max) = if first == last {
        (first - 1, last + 1)
    } else {
        (first, last)
    };
    let y_max = axis_max(yearly.values().copied().max().unwrap_or(0) as f64)?;

    let mut chart = ChartBuilder::on(area)
        .caption("Yearly Outbreak Trend", ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc("Number of Outbreaks")
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(LineSeries::new(
            yearly.iter().map(|(year, count)| (*year, *count as f64)),
            &BLUE,
        ))
        .map_err(render_err)?;

    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    color: RGBColor,
) -> Result<()> {
    if let Some((name, value)) = bars.iter().find(|(_, v)| !v.is_finite()) {
        return Err(AnalysisError::Render(format!(
            "{caption}: value for {name} is not finite ({value})"
        )));
    }
    let slots = bars.len().max(1) as u32;
    let y_max = axis_max(bars.iter().map(|(_, v)| *v).fold(0.0, f64::max))?;

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..slots).into_segmented(), 0f64..y_max)
        .map_err(render_err)?;

    let label = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => bars
            .get(*i as usize)
            .map(|(name, _)| name.clone())
            .unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(slots as usize + 1)
        .x_label_formatter(&label)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()
        .map_err(render_err)?;

    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
            let i = i as u32;
            let mut bar = Rectangle::new(
                [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *value)],
                color.filled(),
            );
            bar.set_margin(0, 0, 6, 6);
            bar
        }))
        .map_err(render_err)?;

    Ok(())
}
