use approx::assert_abs_diff_eq;
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use revenue_forecast::calendar::quarter_ends;
use revenue_forecast::data::{Frequency, TimeSeries};
use revenue_forecast::models::arima::ArimaModel;
use revenue_forecast::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use revenue_forecast::ForecastError;

fn quarterly(values: Vec<f64>) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let dates = quarter_ends(start, values.len()).unwrap();
    TimeSeries::new("Revenue", Frequency::Quarterly, dates, values).unwrap()
}

fn wobbly_trend(n: usize) -> TimeSeries {
    quarterly(
        (0..n)
            .map(|t| 10.0 + 0.5 * t as f64 + (1.3 * t as f64).sin())
            .collect(),
    )
}

/// Integrated AR(1) with the given coefficient on the differences
fn integrated_ar(phi: f64, n: usize, seed: u64) -> TimeSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let mut level = 100.0;
    let mut change = 0.0;
    let mut values = Vec::with_capacity(n);
    for _ in 0..n {
        change = phi * change + noise.sample(&mut rng);
        level += change;
        values.push(level);
    }
    quarterly(values)
}

#[test]
fn test_arima_model() {
    let data = wobbly_trend(24);
    let model = ArimaModel::new(1, 1, 1).unwrap();

    let trained_model = model.train(&data).unwrap();
    let forecast = trained_model.forecast(4).unwrap();

    assert_eq!(forecast.horizons(), 4);
    assert_eq!(forecast.values().len(), 4);
    assert!(forecast.values().iter().all(|v| v.is_finite()));

    let fitted = trained_model.fitted_values();
    assert_eq!(fitted.len(), data.len());
    assert_eq!(fitted[0], data.values()[0]);
}

#[test]
fn test_arima_is_deterministic() {
    let data = wobbly_trend(24);
    let model = ArimaModel::new(1, 1, 1).unwrap();

    let first = model.train(&data).unwrap().forecast(8).unwrap();
    let second = model.train(&data).unwrap().forecast(8).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_arima_recovers_ar_coefficient() {
    let data = integrated_ar(0.6, 300, 42);
    let model = ArimaModel::new(1, 1, 0).unwrap();

    let trained = model.train(&data).unwrap();
    assert_abs_diff_eq!(trained.ar_coefficients()[0], 0.6, epsilon = 0.2);

    // ARIMA(1,1,0): first forecast is y_n + phi * (y_n - y_{n-1})
    let values = data.values();
    let n = values.len();
    let phi = trained.ar_coefficients()[0];
    let forecast = trained.forecast(1).unwrap();
    assert_abs_diff_eq!(
        forecast.values()[0],
        values[n - 1] + phi * (values[n - 1] - values[n - 2]),
        epsilon = 1e-9
    );
}

#[test]
fn test_coefficients_stay_admissible() {
    let data = integrated_ar(0.3, 60, 3);
    let trained = ArimaModel::new(1, 1, 1).unwrap().train(&data).unwrap();

    assert!(trained.ar_coefficients()[0].abs() <= 1.0);
    assert!(trained.ma_coefficients()[0].abs() <= 1.0);

    let summary = trained.summary();
    assert_eq!(summary.order, (1, 1, 1));
    assert!(summary.sigma2 > 0.0);
    assert!(summary.aic.is_finite());
    assert_eq!(summary.nobs, 59 - 1);
}

#[test]
fn test_prediction_intervals_widen() {
    let data = wobbly_trend(30);
    let trained = ArimaModel::new(1, 1, 1).unwrap().train(&data).unwrap();
    let forecast = trained.forecast(6).unwrap();

    let intervals = forecast.intervals().unwrap();
    assert_eq!(intervals.len(), 6);

    let mut previous_width = 0.0;
    for ((lower, upper), value) in intervals.iter().zip(forecast.values()) {
        assert!(lower < value && value < upper);
        let width = upper - lower;
        assert!(width >= previous_width);
        previous_width = width;
    }
}

#[test]
fn test_constant_series_is_degenerate() {
    let data = quarterly(vec![6.0; 24]);
    let result = ArimaModel::new(1, 1, 1).unwrap().train(&data);

    match result {
        Err(ForecastError::DegenerateSeries(_)) => {}
        other => panic!("Expected DegenerateSeries, got {:?}", other),
    }
}

#[test]
fn test_short_series_is_rejected() {
    let data = wobbly_trend(8);
    let result = ArimaModel::new(1, 1, 1).unwrap().train(&data);

    assert!(matches!(
        result,
        Err(ForecastError::InsufficientData {
            required: 13,
            actual: 8
        })
    ));
}

#[test]
fn test_zero_horizon_is_rejected() {
    let trained = ArimaModel::new(1, 1, 1)
        .unwrap()
        .train(&wobbly_trend(24))
        .unwrap();
    assert!(trained.forecast(0).is_err());
}

#[test]
fn test_model_parameter_validation() {
    assert!(ArimaModel::new(6, 0, 1).is_err());
    assert!(ArimaModel::new(1, 3, 1).is_err());
    assert!(ArimaModel::new(1, 1, 6).is_err());

    let model = ArimaModel::new(1, 1, 1).unwrap();
    assert_eq!(model.name(), "ARIMA(1,1,1)");
    assert_eq!(model.order(), (1, 1, 1));
    assert!(model.clone().with_confidence_level(1.5).is_err());
    assert!(model.with_confidence_level(0.8).is_ok());
}

#[test]
fn test_stationary_model_keeps_level() {
    // d = 0 estimates a mean, so forecasts stay near the sample level
    let data = integrated_ar(0.0, 40, 11);
    let differenced: Vec<f64> = data.values().windows(2).map(|w| w[1] - w[0] + 50.0).collect();
    let stationary = quarterly(differenced);

    let forecast = ArimaModel::new(1, 0, 0)
        .unwrap()
        .train(&stationary)
        .unwrap()
        .forecast(12)
        .unwrap();
    let last = forecast.values()[11];
    assert!((last - 50.0).abs() < 1.0);
}

#[test]
fn test_forecast_result_operations() {
    let values = vec![105.0, 106.0, 107.0];
    let forecast = ForecastResult::new(values.clone(), 3).unwrap();

    assert_eq!(forecast.horizons(), 3);
    assert_eq!(forecast.values(), &values);
    assert!(forecast.timestamps().is_none());

    let json = forecast.to_json().unwrap();
    assert!(json.contains("105.0"));

    assert!(ForecastResult::new(vec![1.0], 2).is_err());
    assert!(forecast.to_series("Forecast", Frequency::Quarterly).is_err());
}
