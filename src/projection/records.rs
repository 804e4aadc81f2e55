//! Month records and projection output structures

use crate::inputs::InputParameters;
use serde::{Deserialize, Serialize};

/// One month of projection output
///
/// Month 0 is the current state; months 1..N are projected. Counts hold
/// whole numbers but stay `f64`, so large audiences are never clamped.
/// Dollar amounts are unrounded and unformatted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthRecord {
    pub month: u32,

    // Audience
    pub subscribers: f64,
    pub monthly_unsubscribes: f64,
    pub daily_pageviews: f64,

    // Churn replacement
    pub replenishment_cost: f64,

    // Earnings
    pub monthly_display_earnings: f64,
    pub net_available_earnings: f64,

    // Ad spend
    pub personal_ad_spend: f64,
    pub reinvested_earnings: f64,
    pub total_ad_spend: f64,

    // Profit
    pub monthly_profit: f64,
    pub cumulative_profit: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Input snapshot the months were computed from
    pub inputs: InputParameters,

    /// Month records, month 0 first
    pub months: Vec<MonthRecord>,
}

impl ProjectionResult {
    pub fn new(inputs: InputParameters) -> Self {
        Self {
            inputs,
            months: Vec::new(),
        }
    }

    /// Add a month record
    pub fn add_month(&mut self, record: MonthRecord) {
        self.months.push(record);
    }

    /// Month 0 (current state)
    pub fn current(&self) -> Option<&MonthRecord> {
        self.months.first()
    }

    /// Final projected month
    pub fn last(&self) -> Option<&MonthRecord> {
        self.months.last()
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let current = self.current().cloned().unwrap_or_default();
        let last = self.last().cloned().unwrap_or_default();
        let projected = self.months.iter().skip(1);

        let total_replenishment_cost: f64 =
            projected.clone().map(|r| r.replenishment_cost).sum();
        let total_reinvested_earnings: f64 =
            projected.clone().map(|r| r.reinvested_earnings).sum();
        let total_personal_ad_spend: f64 = projected.map(|r| r.personal_ad_spend).sum();

        ProjectionSummary {
            total_months: self.months.len().saturating_sub(1) as u32,
            subscribers: MetricComparison::new(current.subscribers, last.subscribers),
            monthly_unsubscribes: MetricComparison::new(
                current.monthly_unsubscribes,
                last.monthly_unsubscribes,
            ),
            monthly_display_earnings: MetricComparison::new(
                current.monthly_display_earnings,
                last.monthly_display_earnings,
            ),
            net_available_earnings: MetricComparison::new(
                current.net_available_earnings,
                last.net_available_earnings,
            ),
            total_ad_spend: MetricComparison::new(current.total_ad_spend, last.total_ad_spend),
            daily_pageviews: MetricComparison::new(
                current.daily_pageviews,
                last.daily_pageviews,
            ),
            final_replenishment_cost: last.replenishment_cost,
            total_replenishment_cost,
            total_reinvested_earnings,
            total_personal_ad_spend,
            cumulative_profit: last.cumulative_profit,
        }
    }
}

/// Current vs projected value of one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricComparison {
    pub current: f64,
    pub projected: f64,
    /// Percentage change; `None` when the current value is zero
    pub growth_pct: Option<f64>,
}

impl MetricComparison {
    pub fn new(current: f64, projected: f64) -> Self {
        let growth_pct = if current == 0.0 {
            None
        } else {
            Some((projected - current) / current.abs() * 100.0)
        };
        Self {
            current,
            projected,
            growth_pct,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Number of projected months (excludes month 0)
    pub total_months: u32,
    pub subscribers: MetricComparison,
    pub monthly_unsubscribes: MetricComparison,
    pub monthly_display_earnings: MetricComparison,
    pub net_available_earnings: MetricComparison,
    pub total_ad_spend: MetricComparison,
    pub daily_pageviews: MetricComparison,
    pub final_replenishment_cost: f64,
    // Totals over months 1..N
    pub total_replenishment_cost: f64,
    pub total_reinvested_earnings: f64,
    pub total_personal_ad_spend: f64,
    pub cumulative_profit: f64,
}
