//! AHR999 valuation metrics.
//!
//! Every function here is pure: prices in, numbers out. Network access and
//! presentation live elsewhere.

use crate::core::error::CalcError;
use crate::core::price::{PriceSeries, SeriesOrigin};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::fmt::Display;
use tracing::debug;

/// Bitcoin genesis block date.
pub const GENESIS_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2009, 1, 3) {
    Some(date) => date,
    None => panic!("invalid genesis date"),
};

const GROWTH_SLOPE: f64 = 5.84;
const GROWTH_INTERCEPT: f64 = 17.01;

/// Lower clamp applied to the index before dividing the base amount by it.
pub const MIN_INDEX_DIVISOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Band {
    SeverelyUndervalued,
    Undervalued,
    FairValue,
    Overvalued,
}

impl Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Band::SeverelyUndervalued => "Severely undervalued",
                Band::Undervalued => "Undervalued",
                Band::FairValue => "Fair value",
                Band::Overvalued => "Overvalued",
            }
        )
    }
}

/// Output of one calculation run, handed to the presenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResult {
    pub current_price: f64,
    pub dca_cost: f64,
    pub growth_estimate: f64,
    pub ahr999: f64,
    pub recommended_investment: f64,
    pub band: Band,
    pub coin_age: i64,
    pub history_origin: SeriesOrigin,
}

pub fn average_price(prices: &[f64]) -> Result<f64, CalcError> {
    if prices.is_empty() {
        return Err(CalcError::Computation(
            "cannot average an empty price series".to_string(),
        ));
    }
    Ok(prices.iter().sum::<f64>() / prices.len() as f64)
}

/// Whole days between [`GENESIS_DATE`] and `today`.
pub fn coin_age_on(today: NaiveDate) -> i64 {
    (today - GENESIS_DATE).num_days()
}

pub fn coin_age() -> i64 {
    coin_age_on(Utc::now().date_naive())
}

/// Power-law fair value: `10^(5.84 * log10(age) - 17.01)`.
pub fn growth_estimate(coin_age: i64) -> Result<f64, CalcError> {
    if coin_age <= 0 {
        return Err(CalcError::Computation(format!(
            "coin age must be positive, got {coin_age}"
        )));
    }
    let exponent = GROWTH_SLOPE * (coin_age as f64).log10() - GROWTH_INTERCEPT;
    Ok(10f64.powf(exponent))
}

pub fn ahr999_index(
    current_price: f64,
    dca_cost: f64,
    growth_estimate: f64,
) -> Result<f64, CalcError> {
    if dca_cost <= 0.0 || !dca_cost.is_finite() {
        return Err(CalcError::Computation(format!(
            "DCA cost must be positive, got {dca_cost}"
        )));
    }
    if growth_estimate <= 0.0 || !growth_estimate.is_finite() {
        return Err(CalcError::Computation(format!(
            "growth estimate must be positive, got {growth_estimate}"
        )));
    }
    Ok((current_price / dca_cost) * (current_price / growth_estimate))
}

/// Scales `base_amount` inversely with the index, capped at 10x for very low readings.
pub fn recommended_investment(ahr999: f64, base_amount: f64) -> f64 {
    base_amount / ahr999.max(MIN_INDEX_DIVISOR)
}

pub fn classify(ahr999: f64) -> Band {
    if ahr999 < 0.45 {
        Band::SeverelyUndervalued
    } else if ahr999 < 1.2 {
        Band::Undervalued
    } else if ahr999 < 5.0 {
        Band::FairValue
    } else {
        Band::Overvalued
    }
}

pub fn compute_metrics(
    current_price: f64,
    history: &PriceSeries,
    base_amount: f64,
) -> Result<MetricsResult, CalcError> {
    compute_metrics_on(current_price, history, base_amount, Utc::now().date_naive())
}

/// Same as [`compute_metrics`] with an explicit calendar date for the coin age.
pub fn compute_metrics_on(
    current_price: f64,
    history: &PriceSeries,
    base_amount: f64,
    today: NaiveDate,
) -> Result<MetricsResult, CalcError> {
    let dca_cost = average_price(history.prices())?;
    let coin_age = coin_age_on(today);
    let growth_estimate = growth_estimate(coin_age)?;
    let ahr999 = ahr999_index(current_price, dca_cost, growth_estimate)?;
    let recommended_investment = recommended_investment(ahr999, base_amount);
    let band = classify(ahr999);

    debug!(
        dca_cost,
        coin_age,
        growth_estimate,
        ahr999,
        recommended_investment,
        %band,
        "Computed metrics"
    );

    Ok(MetricsResult {
        current_price,
        dca_cost,
        growth_estimate,
        ahr999,
        recommended_investment,
        band,
        coin_age,
        history_origin: history.origin(),
    })
}
