//! Core projection engine for monthly subscriber and ad-spend projections

use crate::error::Result;
use crate::inputs::InputParameters;
use super::state::ProjectionState;
use super::records::{MonthRecord, ProjectionResult};

/// Days in a projection month. Fixed, not calendar-accurate.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Pageviews per RPM unit
const PAGEVIEWS_PER_MILLE: f64 = 1000.0;

/// Constants derived once from the inputs and held for the whole run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionRates {
    /// Daily pageviews per subscriber; pageviews scale with subscribers
    pub pageviews_per_subscriber: f64,

    /// Daily churn as a decimal
    pub daily_churn_rate: f64,

    /// Share of subscribers surviving a 30-day month of daily churn
    pub monthly_retention_rate: f64,
}

impl ProjectionRates {
    /// Derive rates from already validated inputs
    pub fn from_inputs(params: &InputParameters) -> Self {
        let daily_churn_rate = params.daily_unsubscribe_rate / 100.0;
        Self {
            pageviews_per_subscriber: params.daily_pageviews / params.current_subscribers,
            daily_churn_rate,
            monthly_retention_rate: (1.0 - daily_churn_rate).powf(DAYS_PER_MONTH),
        }
    }

    /// Share of subscribers lost over a month
    pub fn monthly_churn_fraction(&self) -> f64 {
        1.0 - self.monthly_retention_rate
    }
}

/// Round to the nearest integer with halves going up.
///
/// `f64::round` sends -0.5 to -1; the projection's counts are non-negative
/// so the two only differ in principle, but this keeps the reference
/// rounding exact.
pub fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    params: InputParameters,
    rates: ProjectionRates,
}

impl ProjectionEngine {
    /// Validate the inputs and derive the run constants
    pub fn new(params: InputParameters) -> Result<Self> {
        params.validate()?;
        let rates = ProjectionRates::from_inputs(&params);

        log::debug!(
            "Projection rates: pageviews/sub={:.6}, churn={:.6}/day, retention={:.6}/month",
            rates.pageviews_per_subscriber,
            rates.daily_churn_rate,
            rates.monthly_retention_rate,
        );

        Ok(Self { params, rates })
    }

    pub fn params(&self) -> &InputParameters {
        &self.params
    }

    pub fn rates(&self) -> &ProjectionRates {
        &self.rates
    }

    /// Run the projection: month 0 followed by `projection_months` projected months
    pub fn project(&self) -> ProjectionResult {
        let mut result = ProjectionResult::new(self.params);

        let baseline = self.baseline_month();
        let mut state = ProjectionState::from_baseline(&baseline);
        result.add_month(baseline);

        for _month in 1..=self.params.projection_months {
            let row = self.calculate_month(&state);
            state.advance(&row);

            log::debug!(
                "Month {:>2}: subscribers={} unsubscribes={} reinvested={:.2} total_spend={:.2}",
                row.month,
                row.subscribers,
                row.monthly_unsubscribes,
                row.reinvested_earnings,
                row.total_ad_spend,
            );

            result.add_month(row);
        }

        result
    }

    /// Display-ad earnings for a month at the given daily pageviews
    fn monthly_display_earnings(&self, daily_pageviews: f64) -> f64 {
        (daily_pageviews / PAGEVIEWS_PER_MILLE) * self.params.display_ad_rpm * DAYS_PER_MONTH
    }

    /// Subscribers lost over a month from a starting count
    fn monthly_unsubscribes(&self, subscribers: f64) -> f64 {
        round_half_up(subscribers * self.rates.monthly_churn_fraction())
    }

    /// Month 0: the current state, no reinvestment yet
    fn baseline_month(&self) -> MonthRecord {
        let subscribers = self.params.current_subscribers;
        let daily_pageviews = self.params.daily_pageviews;

        let monthly_unsubscribes = self.monthly_unsubscribes(subscribers);
        let replenishment_cost = monthly_unsubscribes * self.params.ad_conversion_cost;
        let monthly_display_earnings = self.monthly_display_earnings(daily_pageviews);

        MonthRecord {
            month: 0,
            subscribers: round_half_up(subscribers),
            monthly_unsubscribes,
            daily_pageviews: round_half_up(daily_pageviews),
            replenishment_cost,
            monthly_display_earnings,
            net_available_earnings: (monthly_display_earnings - replenishment_cost).max(0.0),
            personal_ad_spend: self.params.personal_ad_spend,
            reinvested_earnings: 0.0,
            total_ad_spend: self.params.personal_ad_spend,
            monthly_profit: 0.0,
            cumulative_profit: 0.0,
        }
    }

    /// Calculate one projected month from the previous month's state
    fn calculate_month(&self, prev: &ProjectionState) -> MonthRecord {
        let params = &self.params;

        // Churn against last month's rounded count
        let remaining_subscribers = prev.subscribers * self.rates.monthly_retention_rate;
        let monthly_unsubscribes = self.monthly_unsubscribes(prev.subscribers);
        let replenishment_cost = monthly_unsubscribes * params.ad_conversion_cost;

        let daily_pageviews = prev.subscribers * self.rates.pageviews_per_subscriber;
        let monthly_display_earnings = self.monthly_display_earnings(daily_pageviews);

        // Replenishment is paid first; whatever is left is reinvested in full
        let net_available_earnings = (monthly_display_earnings - replenishment_cost).max(0.0);
        let reinvested_earnings = net_available_earnings;
        let total_ad_spend = params.personal_ad_spend + reinvested_earnings;

        let new_subscribers = total_ad_spend / params.ad_conversion_cost;
        let subscribers = remaining_subscribers + new_subscribers;

        let monthly_profit = 0.0;

        MonthRecord {
            month: prev.month + 1,
            subscribers: round_half_up(subscribers),
            monthly_unsubscribes,
            daily_pageviews: round_half_up(daily_pageviews),
            replenishment_cost,
            monthly_display_earnings,
            net_available_earnings,
            personal_ad_spend: params.personal_ad_spend,
            reinvested_earnings,
            total_ad_spend,
            monthly_profit,
            cumulative_profit: prev.cumulative_profit + monthly_profit,
        }
    }
}

/// Validate `params` and run a projection
pub fn project(params: &InputParameters) -> Result<ProjectionResult> {
    Ok(ProjectionEngine::new(*params)?.project())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProjectionError;
    use approx::assert_relative_eq;

    fn single_month() -> InputParameters {
        InputParameters {
            ad_conversion_cost: 5.0,
            current_subscribers: 500.0,
            daily_pageviews: 1000.0,
            display_ad_rpm: 2.5,
            daily_unsubscribe_rate: 0.1,
            personal_ad_spend: 1000.0,
            projection_months: 1,
        }
    }

    #[test]
    fn test_derived_rates() {
        let engine = ProjectionEngine::new(single_month()).unwrap();
        let rates = engine.rates();

        assert_relative_eq!(rates.pageviews_per_subscriber, 2.0);
        assert_relative_eq!(rates.daily_churn_rate, 0.001);
        assert_relative_eq!(rates.monthly_retention_rate, 0.999_f64.powi(30), epsilon = 1e-12);
    }

    #[test]
    fn test_reference_scenario() {
        let result = project(&single_month()).unwrap();
        assert_eq!(result.months.len(), 2);

        let m0 = &result.months[0];
        assert_eq!(m0.month, 0);
        assert_eq!(m0.subscribers, 500.0);
        assert_eq!(m0.monthly_unsubscribes, 15.0);
        assert_relative_eq!(m0.replenishment_cost, 75.0);
        assert_eq!(m0.daily_pageviews, 1000.0);
        assert_relative_eq!(m0.monthly_display_earnings, 75.0, epsilon = 1e-9);
        assert_relative_eq!(m0.net_available_earnings, 0.0, epsilon = 1e-9);
        assert_relative_eq!(m0.reinvested_earnings, 0.0);
        assert_relative_eq!(m0.total_ad_spend, 1000.0);

        let m1 = &result.months[1];
        assert_eq!(m1.month, 1);
        assert_eq!(m1.monthly_unsubscribes, 15.0);
        assert_eq!(m1.daily_pageviews, 1000.0);
        assert_relative_eq!(m1.reinvested_earnings, 0.0, epsilon = 1e-9);
        assert_relative_eq!(m1.total_ad_spend, 1000.0, epsilon = 1e-9);
        assert_eq!(m1.subscribers, 685.0);
    }

    #[test]
    fn test_default_inputs_four_months() {
        let params = InputParameters {
            projection_months: 4,
            ..Default::default()
        };
        let result = project(&params).unwrap();

        // (month, subscribers, unsubscribes, pageviews, earnings, reinvested)
        let expected = [
            (1, 685.0, 15.0, 1000.0, 75.0, 0.0),
            (2, 865.0, 20.0, 1370.0, 102.75, 2.75),
            (3, 1039.0, 26.0, 1730.0, 129.75, 0.0),
            (4, 1208.0, 31.0, 2078.0, 155.85, 0.85),
        ];

        for (month, subscribers, unsubscribes, pageviews, earnings, reinvested) in expected {
            let row = &result.months[month];
            assert_eq!(row.month, month as u32);
            assert_eq!(row.subscribers, subscribers, "subscribers in month {}", month);
            assert_eq!(row.monthly_unsubscribes, unsubscribes, "unsubscribes in month {}", month);
            assert_eq!(row.daily_pageviews, pageviews, "pageviews in month {}", month);
            assert_relative_eq!(row.replenishment_cost, unsubscribes * 5.0, epsilon = 1e-9);
            assert_relative_eq!(row.monthly_display_earnings, earnings, epsilon = 1e-9);
            assert_relative_eq!(row.reinvested_earnings, reinvested, epsilon = 1e-9);
            assert_relative_eq!(row.total_ad_spend, 1000.0 + reinvested, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_large_audience_is_not_clamped() {
        let params = InputParameters {
            current_subscribers: 1e20,
            daily_pageviews: 2e20,
            daily_unsubscribe_rate: 0.0,
            display_ad_rpm: 0.0,
            personal_ad_spend: 0.0,
            projection_months: 2,
            ..Default::default()
        };
        let result = project(&params).unwrap();
        for row in &result.months {
            assert_eq!(row.subscribers, 1e20);
            assert_eq!(row.daily_pageviews, 2e20);
        }
    }

    #[test]
    fn test_record_count_and_order() {
        for months in [1, 12, 60] {
            let params = InputParameters {
                projection_months: months,
                ..Default::default()
            };
            let result = project(&params).unwrap();
            assert_eq!(result.months.len(), months as usize + 1);
            for (i, row) in result.months.iter().enumerate() {
                assert_eq!(row.month, i as u32);
            }
        }
    }

    #[test]
    fn test_model_invariants_hold_every_month() {
        let params = InputParameters {
            display_ad_rpm: 40.0,
            daily_unsubscribe_rate: 0.5,
            projection_months: 60,
            ..Default::default()
        };
        let result = project(&params).unwrap();

        assert_relative_eq!(result.months[0].total_ad_spend, params.personal_ad_spend);
        for row in &result.months {
            assert!(row.net_available_earnings >= 0.0);
            assert_eq!(row.monthly_profit, 0.0);
            assert_eq!(row.cumulative_profit, 0.0);
            assert_eq!(row.personal_ad_spend, params.personal_ad_spend);
        }
        for row in result.months.iter().skip(1) {
            assert_relative_eq!(
                row.total_ad_spend,
                row.personal_ad_spend + row.reinvested_earnings,
                epsilon = 1e-9
            );
            assert_eq!(row.reinvested_earnings, row.net_available_earnings);
        }
    }

    #[test]
    fn test_replenishment_exceeding_earnings_floors_at_zero() {
        // Heavy churn, tiny RPM: replenishment always exceeds earnings
        let params = InputParameters {
            display_ad_rpm: 0.01,
            daily_unsubscribe_rate: 2.0,
            projection_months: 6,
            ..Default::default()
        };
        let result = project(&params).unwrap();
        for row in &result.months {
            assert!(row.monthly_display_earnings < row.replenishment_cost);
            assert_eq!(row.net_available_earnings, 0.0);
            assert_eq!(row.reinvested_earnings, 0.0);
        }
    }

    #[test]
    fn test_idempotent() {
        let params = InputParameters {
            projection_months: 36,
            ..Default::default()
        };
        assert_eq!(project(&params).unwrap(), project(&params).unwrap());
    }

    #[test]
    fn test_no_churn_never_shrinks() {
        let params = InputParameters {
            daily_unsubscribe_rate: 0.0,
            projection_months: 60,
            ..Default::default()
        };
        let result = project(&params).unwrap();
        for pair in result.months.windows(2) {
            assert!(pair[1].subscribers >= pair[0].subscribers);
            assert_eq!(pair[1].monthly_unsubscribes, 0.0);
            assert_eq!(pair[1].replenishment_cost, 0.0);
        }
    }

    #[test]
    fn test_zero_growth_holds_constant() {
        let params = InputParameters {
            personal_ad_spend: 0.0,
            display_ad_rpm: 0.0,
            daily_unsubscribe_rate: 0.0,
            projection_months: 24,
            ..Default::default()
        };
        let result = project(&params).unwrap();
        for row in &result.months {
            assert_eq!(row.subscribers, 500.0);
            assert_eq!(row.total_ad_spend, 0.0);
            assert_eq!(row.monthly_display_earnings, 0.0);
        }
    }

    #[test]
    fn test_pageviews_track_previous_subscribers() {
        let params = InputParameters {
            projection_months: 12,
            ..Default::default()
        };
        let result = project(&params).unwrap();
        for pair in result.months.windows(2) {
            // 2 pageviews per subscriber in the default inputs
            assert_eq!(pair[1].daily_pageviews, pair[0].subscribers * 2.0);
        }
    }

    #[test]
    fn test_zero_subscribers_rejected() {
        let params = InputParameters {
            current_subscribers: 0.0,
            ..Default::default()
        };
        let err = project(&params).unwrap_err();
        assert!(matches!(err, ProjectionError::InvalidInput { .. }));
        assert_eq!(err.field(), Some("current_subscribers"));
    }

    #[test]
    fn test_zero_conversion_cost_rejected() {
        let params = InputParameters {
            ad_conversion_cost: 0.0,
            ..Default::default()
        };
        assert_eq!(project(&params).unwrap_err().field(), Some("ad_conversion_cost"));
    }

    #[test]
    fn test_fractional_starting_subscribers_round_forward() {
        let params = InputParameters {
            current_subscribers: 500.4,
            daily_pageviews: 1000.8,
            daily_unsubscribe_rate: 0.0,
            personal_ad_spend: 0.0,
            display_ad_rpm: 0.0,
            projection_months: 3,
            ..Default::default()
        };
        let result = project(&params).unwrap();
        assert_eq!(result.months[0].subscribers, 500.0);
        assert_eq!(result.months[0].daily_pageviews, 1001.0);
        // Month 1 works off the rounded 500, not 500.4
        assert_eq!(result.months[1].subscribers, 500.0);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(14.5), 15.0);
        assert_eq!(round_half_up(14.49), 14.0);
        assert_eq!(round_half_up(0.0), 0.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(685.23), 685.0);
    }
}
