//! Running state carried between projection months

use super::records::MonthRecord;

/// State of the newsletter at the end of a month
///
/// Only the previous month feeds the next one, so this is all the engine
/// keeps between steps.
#[derive(Debug, Clone)]
pub struct ProjectionState {
    /// Month the state describes (0 = current)
    pub month: u32,

    /// Rounded subscriber count; basis for the next month's churn and pageviews
    pub subscribers: f64,

    /// Running total of realized profit
    pub cumulative_profit: f64,
}

impl ProjectionState {
    /// Initialize state from the month 0 record
    pub fn from_baseline(baseline: &MonthRecord) -> Self {
        Self {
            month: baseline.month,
            subscribers: baseline.subscribers,
            cumulative_profit: baseline.cumulative_profit,
        }
    }

    /// Roll forward onto a freshly calculated month
    pub fn advance(&mut self, record: &MonthRecord) {
        self.month = record.month;
        self.subscribers = record.subscribers;
        self.cumulative_profit = record.cumulative_profit;
    }
}
