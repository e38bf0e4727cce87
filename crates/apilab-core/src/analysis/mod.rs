mod metrics;
mod window;

pub use metrics::{MetricsAggregator, aggregate, median};
pub use window::TimeWindow;

use crate::model::{Call, HttpMethod};
use serde::{Deserialize, Serialize};

/// Summary of the calls inside a time window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    pub total: usize,
    pub success_rate: f64,
    pub success_percent: u32,
    pub error_count: usize,
    pub status: StatusDistribution,
    pub durations: DurationStats,
    pub methods: Vec<MethodCount>,
    pub health: Health,
    pub recent: Vec<Call>,
}

/// Calls per status class; an errored call counts as a server error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub success: usize,
    pub client_error: usize,
    pub server_error: usize,
    pub total: usize,
}

impl StatusDistribution {
    /// Rounded share of the total, 0 when there are no calls
    pub fn percent(&self, count: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (count as f64 / self.total as f64 * 100.0).round() as u32
    }
}

/// Response time statistics in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationStats {
    pub average: u64,
    pub min: u64,
    pub max: u64,
    pub median: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCount {
    pub method: HttpMethod,
    pub count: usize,
}

/// Overall health derived from the success rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Excellent,
    Good,
    NeedsAttention,
}

impl Health {
    pub fn from_counts(success: usize, total: usize) -> Self {
        let rate = success as f64 / total.max(1) as f64;
        if rate >= 0.95 {
            Health::Excellent
        } else if rate >= 0.80 {
            Health::Good
        } else {
            Health::NeedsAttention
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Health::Excellent => "Excellent",
            Health::Good => "Good",
            Health::NeedsAttention => "Needs attention",
        }
    }
}
