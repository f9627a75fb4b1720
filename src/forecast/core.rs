//! A naive moving-average forecast of next month's spending.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{period::MonthKey, summary::MonthlyBucket};

/// The number of most recent months averaged for a forecast.
const WINDOW_MONTHS: usize = 3;

/// How a forecast was calculated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Fewer than three months of history, so the latest month's total is reused.
    CarryForward,
    /// The mean of the three most recent monthly totals.
    ThreeMonthMean,
}

/// The predicted total spending for one month.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPoint {
    /// The month the prediction is for.
    pub month: MonthKey,
    /// The unrounded predicted total.
    pub amount: Decimal,
    /// How `amount` was calculated.
    pub method: ForecastMethod,
}

impl ForecastPoint {
    /// The predicted total rounded to two decimal places for display.
    pub fn rounded_amount(&self) -> Decimal {
        round_for_display(self.amount)
    }
}

/// Round `amount` to exactly two decimal places, e.g. 100 becomes 100.00.
pub(crate) fn round_for_display(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    rounded
}

/// Predict the total spending for the month after the latest month in `monthly_totals`.
///
/// `monthly_totals` must be ordered from the earliest month to the latest, as
/// returned by [crate::monthly]. Months without expenses do not need to be
/// present; the forecast is always for the month directly after the last bucket.
///
/// # Returns
/// - `None` if there is no history to forecast from.
/// - The latest month's total if there are fewer than three months of history.
/// - Otherwise, the mean of the three latest monthly totals.
pub fn forecast(monthly_totals: &[MonthlyBucket]) -> Option<ForecastPoint> {
    let latest = monthly_totals.last()?;

    let (amount, method) = if monthly_totals.len() < WINDOW_MONTHS {
        (latest.total, ForecastMethod::CarryForward)
    } else {
        let window = &monthly_totals[monthly_totals.len() - WINDOW_MONTHS..];

        (mean(window), ForecastMethod::ThreeMonthMean)
    };

    Some(ForecastPoint {
        month: latest.period.next(),
        amount,
        method,
    })
}

/// The mean of the bucket totals in `window`, which must not be empty.
///
/// If the plain sum overflows, each total is divided before adding. The mean
/// lies between the smallest and largest total, so only rounding in the last
/// digit can push it past the decimal range, and that is saturated.
fn mean(window: &[MonthlyBucket]) -> Decimal {
    let count = Decimal::from(window.len());

    window
        .iter()
        .try_fold(Decimal::ZERO, |sum, bucket| sum.checked_add(bucket.total))
        .map(|sum| sum / count)
        .unwrap_or_else(|| {
            window.iter().fold(Decimal::ZERO, |sum, bucket| {
                sum.saturating_add(bucket.total / count)
            })
        })
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::{
        forecast::{ForecastMethod, forecast},
        period::MonthKey,
        summary::MonthlyBucket,
    };

    fn bucket(year: i32, month: u8, total: Decimal) -> MonthlyBucket {
        MonthlyBucket {
            period: MonthKey::new(year, month).unwrap(),
            total,
        }
    }

    #[test]
    fn no_history_gives_no_forecast() {
        assert_eq!(forecast(&[]), None);
    }

    #[test]
    fn single_month_carries_forward() {
        let got = forecast(&[bucket(2024, 1, dec!(100))]).unwrap();

        assert_eq!(got.month.to_string(), "2024-02");
        assert_eq!(got.amount, dec!(100));
        assert_eq!(got.rounded_amount().to_string(), "100.00");
        assert_eq!(got.method, ForecastMethod::CarryForward);
    }

    #[test]
    fn two_months_carry_forward_latest() {
        let got = forecast(&[bucket(2024, 1, dec!(80)), bucket(2024, 2, dec!(120.40))]).unwrap();

        assert_eq!(got.month.to_string(), "2024-03");
        assert_eq!(got.amount, dec!(120.40));
        assert_eq!(got.method, ForecastMethod::CarryForward);
    }

    #[test]
    fn three_months_are_averaged() {
        let got = forecast(&[
            bucket(2024, 1, dec!(90)),
            bucket(2024, 2, dec!(110)),
            bucket(2024, 3, dec!(100)),
        ])
        .unwrap();

        assert_eq!(got.month.to_string(), "2024-04");
        assert_eq!(got.rounded_amount(), dec!(100.00));
        assert_eq!(got.rounded_amount().to_string(), "100.00");
        assert_eq!(got.method, ForecastMethod::ThreeMonthMean);
    }

    #[test]
    fn only_the_latest_three_months_are_averaged() {
        let got = forecast(&[
            bucket(2023, 11, dec!(10000)),
            bucket(2023, 12, dec!(10)),
            bucket(2024, 1, dec!(20)),
            bucket(2024, 2, dec!(30)),
        ])
        .unwrap();

        assert_eq!(got.amount, dec!(20));
        assert_eq!(got.month.to_string(), "2024-03");
    }

    #[test]
    fn forecast_month_follows_latest_month_across_gaps() {
        let got = forecast(&[bucket(2023, 6, dec!(5)), bucket(2023, 12, dec!(7))]).unwrap();

        assert_eq!(got.month.to_string(), "2024-01");
    }

    #[test]
    fn unrounded_amount_is_kept() {
        let got = forecast(&[
            bucket(2024, 1, dec!(100)),
            bucket(2024, 2, dec!(100)),
            bucket(2024, 3, dec!(101)),
        ])
        .unwrap();

        assert!(got.amount > dec!(100.33));
        assert!(got.amount < dec!(100.34));
        assert_eq!(got.rounded_amount(), dec!(100.33));
    }

    #[test]
    fn huge_totals_are_averaged_without_overflow() {
        let got = forecast(&[
            bucket(2024, 1, Decimal::MAX),
            bucket(2024, 2, Decimal::MAX),
            bucket(2024, 3, Decimal::MAX),
        ])
        .unwrap();

        assert_eq!(got.method, ForecastMethod::ThreeMonthMean);
        assert!(got.amount > Decimal::MAX - dec!(10));
        assert!(got.amount <= Decimal::MAX);
    }
}
