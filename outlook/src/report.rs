//! Text rendering of a finished dashboard
//!
//! The renderer only reads the panels it is given; it holds no state
//! between sections.

use crate::error::Result;
use crate::pipeline::{Dashboard, ForecastPanel, IndicatorPanel, RiskPanel};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use revenue_forecast::calendar::quarter_label;
use revenue_forecast::{RiskFlag, TimeSeries};
use std::io::Write;

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One-line chart of `values` scaled between `low` and `high`
pub fn sparkline(values: &[f64], low: f64, high: f64) -> String {
    let span = high - low;
    values
        .iter()
        .map(|v| {
            if span <= f64::EPSILON {
                return BARS[BARS.len() / 2];
            }
            let position = ((v - low) / span * (BARS.len() - 1) as f64).round();
            BARS[position.clamp(0.0, (BARS.len() - 1) as f64) as usize]
        })
        .collect()
}

fn range_of(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        })
}

fn heading(out: &mut dyn Write, title: &str) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", format!("── {} ──", title).bold())
}

fn series_chart(out: &mut dyn Write, series: &TimeSeries, precision: usize) -> std::io::Result<()> {
    let (Some(first), Some(last), Some((low, high))) =
        (series.first(), series.last(), series.value_range())
    else {
        return writeln!(out, "  (no data)");
    };

    writeln!(out, "  {}", sparkline(&series.values(), low, high))?;
    writeln!(
        out,
        "  {} → {}   min {:.p$}   max {:.p$}   last {:.p$}",
        first.date,
        last.date,
        low,
        high,
        last.value,
        p = precision
    )
}

/// Write the full dashboard as text
pub fn render(dashboard: &Dashboard, out: &mut dyn Write) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "{} Revenue Forecasting & Risk Assessment",
            dashboard.company
        )
        .bold()
        .underline()
    )?;
    writeln!(out, "Forecast horizon: {}", dashboard.horizon)?;

    heading(out, &format!("{} Revenue (Simulated)", dashboard.company))?;
    series_chart(out, &dashboard.history, 2)?;

    heading(out, "Revenue Forecast")?;
    render_forecast(dashboard, out)?;

    heading(out, "CPI Trend (FRED)")?;
    render_indicator(&dashboard.indicator, out)?;

    heading(out, "Operating Income Insight")?;
    series_chart(out, &dashboard.operating_income, 3)?;

    heading(out, "Risk Flagging")?;
    render_risk(&dashboard.risk, out)?;

    heading(out, "Summary")?;
    writeln!(out, "  {}", dashboard.summary)?;

    Ok(())
}

fn render_forecast(dashboard: &Dashboard, out: &mut dyn Write) -> std::io::Result<()> {
    let forecast = match &dashboard.forecast {
        ForecastPanel::Ready(forecast) => forecast,
        ForecastPanel::Unavailable { reason } => {
            return writeln!(
                out,
                "  {} {}",
                "Forecast unavailable:".yellow().bold(),
                reason
            );
        }
    };

    let history = dashboard.history.values();
    let projected = forecast.series.values();
    let all: Vec<f64> = history.iter().chain(projected.iter()).copied().collect();
    let (low, high) = range_of(&all);
    writeln!(
        out,
        "  {}┊{}",
        sparkline(&history, low, high),
        sparkline(&projected, low, high).cyan()
    )?;

    let coverage = (dashboard.confidence_level * 100.0).round();
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Quarter".to_string(),
        "Forecast".to_string(),
        format!("Lower {}%", coverage),
        format!("Upper {}%", coverage),
    ]);

    let intervals = forecast.result.intervals().unwrap_or_default();
    for (i, point) in forecast.series.observations().iter().enumerate() {
        let (lower, upper) = intervals
            .get(i)
            .map(|(l, u)| (format!("{:.3}", l), format!("{:.3}", u)))
            .unwrap_or_else(|| ("-".to_string(), "-".to_string()));
        table.add_row(vec![
            quarter_label(point.date),
            format!("{:.3}", point.value),
            lower,
            upper,
        ]);
    }
    writeln!(out, "{}", table)?;

    let fit = &forecast.fit;
    let (p, d, q) = fit.order;
    writeln!(
        out,
        "  ARIMA({},{},{})  ar [{}]  ma [{}]  sigma² {:.4}  AIC {:.2}",
        p,
        d,
        q,
        join_coefficients(&fit.ar_coefficients),
        join_coefficients(&fit.ma_coefficients),
        fit.sigma2,
        fit.aic
    )
}

fn join_coefficients(coefficients: &[f64]) -> String {
    coefficients
        .iter()
        .map(|c| format!("{:.3}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_indicator(panel: &IndicatorPanel, out: &mut dyn Write) -> std::io::Result<()> {
    match panel {
        IndicatorPanel::Ready { series, quarterly } => {
            series_chart(out, series, 3)?;
            if let Some(latest) = quarterly.last() {
                writeln!(
                    out,
                    "  latest quarterly average ({}): {:.3}",
                    quarter_label(latest.date),
                    latest.value
                )?;
            }
            Ok(())
        }
        IndicatorPanel::Unavailable { notice, .. } => {
            writeln!(out, "  {} {}", "⚠".yellow(), notice.yellow())
        }
        IndicatorPanel::Disabled => writeln!(out, "  Indicator fetch disabled."),
    }
}

fn render_risk(panel: &RiskPanel, out: &mut dyn Write) -> std::io::Result<()> {
    match panel {
        RiskPanel::Assessed(assessment) => {
            let message = assessment.flag.message();
            let styled = match assessment.flag {
                RiskFlag::Abnormal => format!("⚠ {}", message).red().bold(),
                RiskFlag::Normal => format!("✔ {}", message).green(),
            };
            writeln!(out, "  {}", styled)?;
            writeln!(
                out,
                "  average growth {:.2}%   forecast growth {:.2}%   threshold {:.2}%",
                assessment.avg_growth * 100.0,
                assessment.forecast_growth * 100.0,
                assessment.threshold * 100.0
            )
        }
        RiskPanel::Unavailable { reason } => {
            writeln!(out, "  Risk assessment unavailable: {}", reason)
        }
    }
}

/// Pretty-printed JSON of the whole dashboard
pub fn to_json(dashboard: &Dashboard) -> Result<String> {
    Ok(serde_json::to_string_pretty(dashboard)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sparkline_scales() {
        assert_eq!(sparkline(&[0.0, 7.0], 0.0, 7.0), "▁█");
        assert_eq!(sparkline(&[1.0, 1.0], 1.0, 1.0), "▅▅");
        assert_eq!(sparkline(&[], 0.0, 1.0), "");
    }

    #[test]
    fn test_range_of() {
        assert_eq!(range_of(&[3.0, -1.0, 2.0]), (-1.0, 3.0));
    }
}
