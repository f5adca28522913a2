//! # Revenue Outlook
//!
//! Umbrella crate for the revenue outlook workspace:
//!
//! - [`series_math`]: differencing, growth rates, parameter transforms and Nelder-Mead
//! - [`revenue_forecast`]: series, ARIMA forecasting, CPI retrieval and risk flagging
//! - [`outlook`]: dashboard configuration, pipeline and report rendering
//!
//! ## Example
//!
//! ```
//! use revenue_outlook_workspace::revenue_forecast::Horizon;
//!
//! let horizon = Horizon::default();
//! assert_eq!(horizon.get(), 4);
//! ```

pub use outlook;
pub use revenue_forecast;
pub use series_math;
