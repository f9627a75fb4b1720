//! Forecasting of next month's spending from the monthly totals.

mod core;
mod endpoint;

pub use self::core::{ForecastMethod, ForecastPoint, forecast};
pub(crate) use self::core::round_for_display;
pub use endpoint::get_forecast;
