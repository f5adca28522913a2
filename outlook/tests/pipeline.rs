use chrono::NaiveDate;
use outlook::config::DashboardConfig;
use outlook::pipeline::{self, ForecastPanel, IndicatorPanel, RiskPanel};
use outlook::report;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use revenue_forecast::indicator::{IndicatorError, IndicatorRequest, IndicatorSource};
use revenue_forecast::calendar::quarter_ends;
use revenue_forecast::{Frequency, Horizon, RiskFlag, TimeSeries};
use std::cell::Cell;
use std::io::Write;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

/// Source that always fails with a timeout
struct TimedOut;

impl IndicatorSource for TimedOut {
    fn fetch(&self, _request: &IndicatorRequest) -> Result<TimeSeries, IndicatorError> {
        Err(IndicatorError::Timeout("operation timed out".to_string()))
    }
}

/// Source returning a flat monthly series and counting calls
struct Monthly {
    calls: Cell<usize>,
}

impl Monthly {
    fn new() -> Self {
        Self { calls: Cell::new(0) }
    }
}

impl IndicatorSource for Monthly {
    fn fetch(&self, request: &IndicatorRequest) -> Result<TimeSeries, IndicatorError> {
        self.calls.set(self.calls.get() + 1);
        let dates: Vec<NaiveDate> = (1..=6)
            .map(|m| NaiveDate::from_ymd_opt(2023, m, 1).unwrap())
            .collect();
        let values = vec![300.0, 301.0, 302.0, 303.0, 304.0, 305.0];
        TimeSeries::new(request.series_id.clone(), Frequency::Monthly, dates, values)
            .map_err(|e| IndicatorError::Malformed(e.to_string()))
    }
}

fn run_with(config: &DashboardConfig, seed: u64, source: &dyn IndicatorSource) -> outlook::Dashboard {
    let mut rng = StdRng::seed_from_u64(seed);
    pipeline::run(config, Horizon::new(4).unwrap(), today(), &mut rng, source).unwrap()
}

#[test]
fn test_indicator_failure_does_not_stop_the_run() {
    let dashboard = run_with(&DashboardConfig::default(), 7, &TimedOut);

    match &dashboard.indicator {
        IndicatorPanel::Unavailable {
            category, notice, ..
        } => {
            assert_eq!(category, "timeout");
            assert!(notice.contains("check your internet connection"));
        }
        other => panic!("expected unavailable indicator, got {:?}", other),
    }

    match &dashboard.forecast {
        ForecastPanel::Ready(forecast) => assert_eq!(forecast.series.len(), 4),
        other => panic!("expected a forecast, got {:?}", other),
    }
    assert!(matches!(dashboard.risk, RiskPanel::Assessed(_)));
    assert_eq!(dashboard.history.len(), 24);
    assert_eq!(dashboard.operating_income.len(), 24);
    assert!(dashboard.summary.contains("Starbucks"));
}

#[test]
fn test_default_run_produces_every_panel() {
    let source = Monthly::new();
    let dashboard = run_with(&DashboardConfig::default(), 42, &source);

    assert_eq!(source.calls.get(), 1);
    assert_eq!(
        dashboard.history.last().unwrap().date,
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
    );

    let forecast = dashboard.forecast.ready().expect("forecast for seed 42");
    assert_eq!(forecast.series.len(), 4);
    assert_eq!(
        forecast.series.first().unwrap().date,
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()
    );
    match &dashboard.risk {
        RiskPanel::Assessed(assessment) => {
            assert_eq!(assessment.threshold > 0.0, assessment.avg_growth > 0.0);
        }
        other => panic!("expected a risk assessment, got {:?}", other),
    }

    match &dashboard.indicator {
        IndicatorPanel::Ready { series, quarterly } => {
            assert_eq!(series.len(), 6);
            assert_eq!(quarterly.len(), 2);
            assert_eq!(quarterly.values(), vec![301.0, 304.0]);
        }
        other => panic!("expected ready indicator, got {:?}", other),
    }

    for (revenue, income) in dashboard
        .history
        .values()
        .iter()
        .zip(dashboard.operating_income.values())
    {
        let margin = income / revenue;
        assert!((0.15 - 1e-12..=0.20 + 1e-12).contains(&margin));
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let config = DashboardConfig::default();
    let first = run_with(&config, 2024, &TimedOut);
    let second = run_with(&config, 2024, &TimedOut);
    assert_eq!(first, second);

    let other = run_with(&config, 2025, &TimedOut);
    assert!(first.history != other.history);
}

#[test]
fn test_constant_history_marks_forecast_unavailable() {
    let dates = quarter_ends(NaiveDate::from_ymd_opt(2018, 1, 1).unwrap(), 24).unwrap();
    let history = TimeSeries::new("Revenue", Frequency::Quarterly, dates, vec![6.0; 24]).unwrap();

    let forecast = pipeline::forecast_panel(&history, Horizon::default()).unwrap();
    match &forecast {
        ForecastPanel::Unavailable { reason } => assert!(reason.contains("Degenerate series")),
        other => panic!("expected unavailable forecast, got {:?}", other),
    }
    assert!(matches!(
        pipeline::risk_panel(&history, &forecast),
        RiskPanel::Unavailable { .. }
    ));
}

#[test]
fn test_disabled_indicator_is_not_fetched() {
    let mut config = DashboardConfig::default();
    config.indicator.enabled = false;

    let source = Monthly::new();
    let dashboard = run_with(&config, 1, &source);

    assert_eq!(source.calls.get(), 0);
    assert_eq!(dashboard.indicator, IndicatorPanel::Disabled);
}

#[test]
fn test_invalid_config_aborts() {
    let mut config = DashboardConfig::default();
    config.company = "  ".to_string();

    let mut rng = StdRng::seed_from_u64(0);
    let result = pipeline::run(&config, Horizon::default(), today(), &mut rng, &TimedOut);
    assert!(result.is_err());
}

#[test]
fn test_render_contains_every_section() {
    let dashboard = run_with(&DashboardConfig::default(), 42, &TimedOut);

    let mut buffer = Vec::new();
    report::render(&dashboard, &mut buffer).unwrap();
    let text = String::from_utf8(buffer).unwrap();

    for heading in [
        "Starbucks Revenue Forecasting & Risk Assessment",
        "Starbucks Revenue (Simulated)",
        "Revenue Forecast",
        "CPI Trend (FRED)",
        "Operating Income Insight",
        "Risk Flagging",
        "Summary",
    ] {
        assert!(text.contains(heading), "missing heading {}", heading);
    }
    assert!(text.contains("Forecast horizon: 4 quarter(s)"));
    assert!(text.contains("Indicator data could not be loaded"));
    assert!(text.contains("indicating no immediate overstatement risks"));

    match &dashboard.risk {
        RiskPanel::Assessed(assessment) => {
            assert!(text.contains(assessment.flag.message()));
            let other = match assessment.flag {
                RiskFlag::Normal => RiskFlag::Abnormal,
                RiskFlag::Abnormal => RiskFlag::Normal,
            };
            assert!(!text.contains(other.message()));
        }
        RiskPanel::Unavailable { .. } => assert!(text.contains("Risk assessment unavailable")),
    }
}

#[test]
fn test_json_report_tags_panels() {
    let mut config = DashboardConfig::default();
    config.indicator.enabled = false;
    let dashboard = run_with(&config, 3, &TimedOut);

    let json = report::to_json(&dashboard).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["company"], "Starbucks");
    assert_eq!(value["horizon"], 4);
    assert_eq!(value["indicator"]["status"], "disabled");
    assert!(value["forecast"]["status"].is_string());
    assert_eq!(value["history"]["points"].as_array().unwrap().len(), 24);
}

#[test]
fn test_config_file_drives_the_run() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
company = "Acme Coffee"

[indicator]
enabled = false
"#
    )
    .unwrap();

    let config = DashboardConfig::from_toml_file(file.path()).unwrap();
    let dashboard = run_with(&config, 11, &TimedOut);

    assert_eq!(dashboard.company, "Acme Coffee");
    assert_eq!(dashboard.history.len(), 24);
    assert_eq!(dashboard.confidence_level, pipeline::CONFIDENCE_LEVEL);
    assert_eq!(dashboard.indicator, IndicatorPanel::Disabled);
    assert!(dashboard.summary.contains("Acme Coffee"));
}
