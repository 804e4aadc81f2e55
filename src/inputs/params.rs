//! Input parameter set for a single projection run

use crate::error::{ProjectionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shortest projection horizon accepted
pub const MIN_PROJECTION_MONTHS: u32 = 1;

/// Longest projection horizon accepted (five years)
pub const MAX_PROJECTION_MONTHS: u32 = 60;

/// Starting parameters for a newsletter projection
///
/// Field names serialize as snake_case; the camelCase spellings used by
/// form-based collectors (`adConversionCost`, `displayAdRPM`, ...) are
/// accepted on input. Missing fields take the calculator defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputParameters {
    /// Cost to acquire one subscriber via ads ($/subscriber)
    #[serde(alias = "adConversionCost")]
    pub ad_conversion_cost: f64,

    /// Starting subscriber count
    #[serde(alias = "currentSubscribers")]
    pub current_subscribers: f64,

    /// Starting daily pageviews
    #[serde(alias = "dailyPageviews")]
    pub daily_pageviews: f64,

    /// Display-ad revenue per 1000 pageviews ($)
    #[serde(alias = "displayAdRPM", alias = "displayAdRpm")]
    pub display_ad_rpm: f64,

    /// Daily churn as a percentage (0.1 = 0.1% per day)
    #[serde(alias = "dailyUnsubscribeRate")]
    pub daily_unsubscribe_rate: f64,

    /// Fixed monthly ad budget supplied from outside earnings ($/month)
    #[serde(alias = "personalAdSpend")]
    pub personal_ad_spend: f64,

    /// Number of future months to project
    #[serde(alias = "projectionMonths")]
    pub projection_months: u32,
}

impl Default for InputParameters {
    fn default() -> Self {
        Self {
            ad_conversion_cost: 5.0,
            current_subscribers: 500.0,
            daily_pageviews: 1000.0,
            display_ad_rpm: 2.50,
            daily_unsubscribe_rate: 0.1,
            personal_ad_spend: 1000.0,
            projection_months: 12,
        }
    }
}

impl InputParameters {
    /// Check every precondition the projection relies on.
    ///
    /// The first failing field is reported. Zero RPM, zero churn and zero
    /// personal spend are valid; they only switch the matching terms off.
    pub fn validate(&self) -> Result<()> {
        let ad_conversion_cost = finite("ad_conversion_cost", self.ad_conversion_cost)?;
        if ad_conversion_cost <= 0.0 {
            return Err(ProjectionError::invalid(
                "ad_conversion_cost",
                format!("must be greater than 0, got {}", ad_conversion_cost),
            ));
        }

        let current_subscribers = finite("current_subscribers", self.current_subscribers)?;
        if current_subscribers <= 0.0 {
            return Err(ProjectionError::invalid(
                "current_subscribers",
                format!("must be greater than 0, got {}", current_subscribers),
            ));
        }

        non_negative("daily_pageviews", self.daily_pageviews)?;
        non_negative("display_ad_rpm", self.display_ad_rpm)?;
        non_negative("personal_ad_spend", self.personal_ad_spend)?;

        let churn = non_negative("daily_unsubscribe_rate", self.daily_unsubscribe_rate)?;
        if churn > 100.0 {
            return Err(ProjectionError::invalid(
                "daily_unsubscribe_rate",
                format!("is a percentage and cannot exceed 100, got {}", churn),
            ));
        }

        if !(MIN_PROJECTION_MONTHS..=MAX_PROJECTION_MONTHS).contains(&self.projection_months) {
            return Err(ProjectionError::invalid(
                "projection_months",
                format!(
                    "must be between {} and {}, got {}",
                    MIN_PROJECTION_MONTHS, MAX_PROJECTION_MONTHS, self.projection_months
                ),
            ));
        }

        Ok(())
    }

    /// Read one field as a number
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::AdConversionCost => self.ad_conversion_cost,
            Parameter::CurrentSubscribers => self.current_subscribers,
            Parameter::DailyPageviews => self.daily_pageviews,
            Parameter::DisplayAdRpm => self.display_ad_rpm,
            Parameter::DailyUnsubscribeRate => self.daily_unsubscribe_rate,
            Parameter::PersonalAdSpend => self.personal_ad_spend,
            Parameter::ProjectionMonths => self.projection_months as f64,
        }
    }

    /// Overwrite one field. The month count takes the floor of `value`;
    /// negative or NaN month counts become 0 and fail validation later.
    pub fn set(&mut self, parameter: Parameter, value: f64) {
        match parameter {
            Parameter::AdConversionCost => self.ad_conversion_cost = value,
            Parameter::CurrentSubscribers => self.current_subscribers = value,
            Parameter::DailyPageviews => self.daily_pageviews = value,
            Parameter::DisplayAdRpm => self.display_ad_rpm = value,
            Parameter::DailyUnsubscribeRate => self.daily_unsubscribe_rate = value,
            Parameter::PersonalAdSpend => self.personal_ad_spend = value,
            Parameter::ProjectionMonths => self.projection_months = value.floor() as u32,
        }
    }

    /// Copy with one field replaced
    pub fn with(mut self, parameter: Parameter, value: f64) -> Self {
        self.set(parameter, value);
        self
    }

    /// Set a field from raw form text.
    ///
    /// Follows the form collector's coercion: the leading numeric part of the
    /// text is used, and anything that does not parse (or parses to NaN)
    /// becomes 0. Whether 0 is acceptable is left to [`validate`](Self::validate).
    pub fn set_lenient(&mut self, parameter: Parameter, raw: &str) {
        self.set(parameter, coerce_number(raw));
    }
}

fn finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProjectionError::invalid(field, format!("must be a finite number, got {}", value)))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<f64> {
    let value = finite(field, value)?;
    if value < 0.0 {
        return Err(ProjectionError::invalid(field, format!("cannot be negative, got {}", value)));
    }
    Ok(value)
}

/// Parse the longest numeric prefix of `raw`, falling back to 0.
pub fn coerce_number(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(v) if !v.is_nan() => v,
        _ => 0.0,
    }
}

/// One of the seven input fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    AdConversionCost,
    CurrentSubscribers,
    DailyPageviews,
    DisplayAdRpm,
    DailyUnsubscribeRate,
    PersonalAdSpend,
    ProjectionMonths,
}

impl Parameter {
    pub const ALL: [Parameter; 7] = [
        Parameter::AdConversionCost,
        Parameter::CurrentSubscribers,
        Parameter::DailyPageviews,
        Parameter::DisplayAdRpm,
        Parameter::DailyUnsubscribeRate,
        Parameter::PersonalAdSpend,
        Parameter::ProjectionMonths,
    ];

    /// Canonical snake_case name
    pub fn name(self) -> &'static str {
        match self {
            Parameter::AdConversionCost => "ad_conversion_cost",
            Parameter::CurrentSubscribers => "current_subscribers",
            Parameter::DailyPageviews => "daily_pageviews",
            Parameter::DisplayAdRpm => "display_ad_rpm",
            Parameter::DailyUnsubscribeRate => "daily_unsubscribe_rate",
            Parameter::PersonalAdSpend => "personal_ad_spend",
            Parameter::ProjectionMonths => "projection_months",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = ProjectionError;

    /// Accepts snake_case, kebab-case and camelCase spellings, case-insensitively
    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Parameter::ALL
            .iter()
            .copied()
            .find(|p| p.name().replace('_', "") == key)
            .ok_or_else(|| ProjectionError::UnknownParameter(s.to_string()))
    }
}
