use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look-back windows offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "1h")]
    LastHour,
    #[default]
    #[serde(rename = "24h")]
    LastDay,
    #[serde(rename = "7d")]
    LastWeek,
    #[serde(rename = "30d")]
    LastMonth,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::LastHour,
        TimeWindow::LastDay,
        TimeWindow::LastWeek,
        TimeWindow::LastMonth,
    ];

    /// Short label, also used in export file names
    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::LastHour => "1h",
            TimeWindow::LastDay => "24h",
            TimeWindow::LastWeek => "7d",
            TimeWindow::LastMonth => "30d",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            TimeWindow::LastHour => "Last hour",
            TimeWindow::LastDay => "Last 24 hours",
            TimeWindow::LastWeek => "Last 7 days",
            TimeWindow::LastMonth => "Last 30 days",
        }
    }

    pub fn length(&self) -> Duration {
        match self {
            TimeWindow::LastHour => Duration::hours(1),
            TimeWindow::LastDay => Duration::hours(24),
            TimeWindow::LastWeek => Duration::days(7),
            TimeWindow::LastMonth => Duration::days(30),
        }
    }

    /// Earliest timestamp included when the window ends at `now`
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.length()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeWindow::ALL
            .into_iter()
            .find(|w| w.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown time window '{}' (use 1h, 24h, 7d or 30d)", s))
    }
}
