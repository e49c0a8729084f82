//! Duration-series charts rendered with plotters.
//!
//! Only compiled with the `plot` feature. Without it, both entry points
//! return [`TrialError::PlotUnavailable`] so callers can surface a clear
//! "rebuild with the feature" message instead of a missing symbol.

use std::path::Path;

use crate::compare::Comparison;
use crate::error::TrialError;
use crate::trial::TimeTrial;

#[cfg(feature = "plot")]
use crate::statistics;
#[cfg(feature = "plot")]
use plotters::prelude::*;

/// Render a trial's duration series as a line chart at `path`.
///
/// Draws the per-run series, a horizontal line at the configured
/// aggregation's value, and (when it fits) a line at the target. The y-axis
/// tops out at three times the median so a single slow outlier cannot
/// flatten the rest of the series into the x-axis.
#[cfg(feature = "plot")]
pub fn render_trial(trial: &TimeTrial, path: &Path) -> Result<(), TrialError> {
    let series = trial.durations();
    if series.is_empty() {
        return Err(TrialError::EmptySeries);
    }

    let median = statistics::median(series)?.as_secs_f64();
    let aggregate = trial.config().aggregation.apply(series)?.as_secs_f64();
    let target = trial.config().target.as_secs_f64();
    let mut y_max = median * 3.0;
    if y_max <= 0.0 {
        // All-zero series on a coarse clock; pick something visible.
        y_max = target.max(1e-9);
    }

    let root = BitMapBackend::new(path, (960, 540)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("run durations", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(56)
        .build_cartesian_2d(0..series.len(), 0f64..y_max)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc("run")
        .y_desc("seconds")
        .draw()
        .map_err(plot_error)?;

    chart
        .draw_series(LineSeries::new(
            series.iter().enumerate().map(|(i, d)| (i, d.as_secs_f64())),
            &BLUE,
        ))
        .map_err(plot_error)?
        .label("measured")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            (0..series.len()).map(|i| (i, aggregate)),
            &GREEN,
        ))
        .map_err(plot_error)?
        .label(trial.config().aggregation.name())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREEN));

    if target <= y_max {
        chart
            .draw_series(LineSeries::new(
                (0..series.len()).map(|i| (i, target)),
                &RED,
            ))
            .map_err(plot_error)?
            .label("target")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;
    root.present().map_err(plot_error)?;
    Ok(())
}

/// Render every candidate's sample bucket as one chart at `path`, one line
/// per candidate with a legend.
#[cfg(feature = "plot")]
pub fn render_comparison(comparison: &Comparison<'_>, path: &Path) -> Result<(), TrialError> {
    let samples = comparison.samples();
    if samples.values().any(|bucket| bucket.is_empty()) {
        return Err(TrialError::EmptySeries);
    }

    let longest = samples.values().map(Vec::len).max().unwrap_or(0);
    let slowest = samples
        .values()
        .flatten()
        .map(|d| d.as_secs_f64())
        .fold(0f64, f64::max);
    let y_max = if slowest > 0.0 { slowest * 1.25 } else { 1e-9 };

    let root = BitMapBackend::new(path, (960, 540)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("comparison", ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(36)
        .y_label_area_size(56)
        .build_cartesian_2d(0..longest, 0f64..y_max)
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc("measurement")
        .y_desc("seconds")
        .draw()
        .map_err(plot_error)?;

    for (index, (label, bucket)) in samples.iter().enumerate() {
        let color = Palette99::pick(index).mix(0.9);
        chart
            .draw_series(LineSeries::new(
                bucket.iter().enumerate().map(|(i, d)| (i, d.as_secs_f64())),
                color.stroke_width(2),
            ))
            .map_err(plot_error)?
            .label(label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;
    root.present().map_err(plot_error)?;
    Ok(())
}

#[cfg(feature = "plot")]
fn plot_error<E: std::fmt::Display>(err: E) -> TrialError {
    TrialError::Plot(err.to_string())
}

/// Stub without the `plot` feature.
#[cfg(not(feature = "plot"))]
pub fn render_trial(_trial: &TimeTrial, _path: &Path) -> Result<(), TrialError> {
    Err(TrialError::PlotUnavailable)
}

/// Stub without the `plot` feature.
#[cfg(not(feature = "plot"))]
pub fn render_comparison(_comparison: &Comparison<'_>, _path: &Path) -> Result<(), TrialError> {
    Err(TrialError::PlotUnavailable)
}
