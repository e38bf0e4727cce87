use super::{DurationStats, Health, MethodCount, Metrics, StatusDistribution};
use crate::model::{Call, HttpMethod};
use chrono::{DateTime, Utc};

pub struct MetricsAggregator {
    window_start: DateTime<Utc>,
    top_methods: usize,
    recent: usize,
}

impl MetricsAggregator {
    pub fn new(window_start: DateTime<Utc>) -> Self {
        Self {
            window_start,
            top_methods: 5,
            recent: 10,
        }
    }

    pub fn with_top_methods(mut self, n: usize) -> Self {
        self.top_methods = n;
        self
    }

    pub fn with_recent(mut self, n: usize) -> Self {
        self.recent = n;
        self
    }

    /// Calls at or after the window start, in their original order
    pub fn window<'a>(&self, calls: &'a [Call]) -> Vec<&'a Call> {
        calls
            .iter()
            .filter(|call| call.timestamp >= self.window_start)
            .collect()
    }

    pub fn aggregate(&self, calls: &[Call]) -> Metrics {
        let windowed = self.window(calls);
        tracing::debug!(
            "Aggregating {} of {} call(s) since {}",
            windowed.len(),
            calls.len(),
            self.window_start
        );

        let total = windowed.len();
        let success = windowed.iter().filter(|c| c.is_success()).count();
        let client_error = windowed
            .iter()
            .filter(|c| (400..500).contains(&c.status))
            .count();
        let server_error = windowed
            .iter()
            .filter(|c| c.status >= 500 || c.is_error())
            .count();
        let error_count = windowed
            .iter()
            .filter(|c| c.status >= 400 || c.is_error())
            .count();

        let success_rate = if total > 0 {
            success as f64 / total as f64
        } else {
            0.0
        };

        let durations: Vec<u64> = windowed.iter().map(|c| c.duration).collect();
        let duration_stats = if durations.is_empty() {
            DurationStats::default()
        } else {
            let sum: u64 = durations.iter().sum();
            DurationStats {
                average: (sum as f64 / total as f64).round() as u64,
                min: durations.iter().copied().min().unwrap_or(0),
                max: durations.iter().copied().max().unwrap_or(0),
                median: median(&durations),
            }
        };

        let mut recent: Vec<Call> = windowed.iter().map(|c| (*c).clone()).collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(self.recent);

        let metrics = Metrics {
            total,
            success_rate,
            success_percent: (success_rate * 100.0).round() as u32,
            error_count,
            status: StatusDistribution {
                success,
                client_error,
                server_error,
                total,
            },
            durations: duration_stats,
            methods: self.method_counts(&windowed),
            health: Health::from_counts(success, total),
            recent,
        };

        tracing::info!(
            "Metrics: {} call(s), {}% success, median {}ms",
            metrics.total,
            metrics.success_percent,
            metrics.durations.median
        );

        metrics
    }

    /// Most used methods; ties keep the order methods were first seen
    fn method_counts(&self, calls: &[&Call]) -> Vec<MethodCount> {
        let mut counts: Vec<(HttpMethod, usize)> = Vec::new();
        for call in calls {
            match counts.iter_mut().find(|(m, _)| *m == call.method) {
                Some((_, n)) => *n += 1,
                None => counts.push((call.method, 1)),
            }
        }

        // sort_by is stable, so equal counts stay in discovery order
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(self.top_methods);

        counts
            .into_iter()
            .map(|(method, count)| MethodCount { method, count })
            .collect()
    }
}

/// Summarize the calls with `timestamp >= window_start`
pub fn aggregate(calls: &[Call], window_start: DateTime<Utc>) -> Metrics {
    MetricsAggregator::new(window_start).aggregate(calls)
}

/// Upper median: element `n / 2` of a sorted copy, 0 for no values
pub fn median(values: &[u64]) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    sorted[sorted.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::TimeWindow;
    use crate::model::CallOrigin;
    use chrono::Duration;
    use serde_json::json;

    fn call(method: HttpMethod, status: u16, duration: u64, age_minutes: i64) -> Call {
        let origin = CallOrigin {
            button_id: "btn_1".to_string(),
            button_name: "Test".to_string(),
            method,
            url: "https://example.com".to_string(),
        };
        let mut call = if status == 0 {
            Call::failed(origin, "connection refused", duration)
        } else {
            Call::completed(origin, status, "", json!({}), duration)
        };
        call.timestamp = Utc::now() - Duration::minutes(age_minutes);
        call
    }

    #[test]
    fn test_median_takes_upper_middle() {
        assert_eq!(median(&[100, 200, 300, 400]), 300);
        assert_eq!(median(&[50, 150, 250]), 150);
        assert_eq!(median(&[400, 100, 300, 200]), 300);
        assert_eq!(median(&[]), 0);
    }

    #[test]
    fn test_median_leaves_input_order() {
        let values = vec![3, 1, 2];
        median(&values);
        assert_eq!(values, vec![3, 1, 2]);
    }

    #[test]
    fn test_empty_window() {
        let metrics = aggregate(&[], Utc::now() - Duration::hours(1));
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.success_rate, 0.0);
        assert_eq!(metrics.success_percent, 0);
        assert_eq!(metrics.durations, DurationStats::default());
        assert_eq!(metrics.status.percent(0), 0);
        assert_eq!(metrics.health, Health::NeedsAttention);
        assert!(metrics.methods.is_empty());
    }

    #[test]
    fn test_status_counts() {
        let calls = vec![
            call(HttpMethod::Get, 200, 10, 1),
            call(HttpMethod::Get, 204, 10, 1),
            call(HttpMethod::Post, 404, 10, 1),
            call(HttpMethod::Post, 503, 10, 1),
            call(HttpMethod::Get, 0, 10, 1),
            call(HttpMethod::Get, 302, 10, 1),
        ];
        let metrics = aggregate(&calls, Utc::now() - Duration::hours(1));

        assert_eq!(metrics.total, 6);
        assert_eq!(metrics.status.success, 2);
        assert_eq!(metrics.status.client_error, 1);
        assert_eq!(metrics.status.server_error, 2);
        assert_eq!(metrics.error_count, 3);
        assert_eq!(metrics.success_percent, 33);
        assert_eq!(metrics.status.percent(metrics.status.success), 33);
    }

    #[test]
    fn test_window_excludes_old_calls() {
        let calls = vec![
            call(HttpMethod::Get, 200, 100, 5),
            call(HttpMethod::Get, 500, 900, 120),
        ];
        let metrics = MetricsAggregator::new(TimeWindow::LastHour.start(Utc::now())).aggregate(&calls);
        assert_eq!(metrics.total, 1);
        assert_eq!(metrics.success_rate, 1.0);
        assert_eq!(metrics.health, Health::Excellent);
    }

    #[test]
    fn test_duration_stats() {
        let calls = vec![
            call(HttpMethod::Get, 200, 400, 1),
            call(HttpMethod::Get, 200, 100, 2),
            call(HttpMethod::Get, 200, 301, 3),
            call(HttpMethod::Get, 200, 200, 4),
        ];
        let metrics = aggregate(&calls, Utc::now() - Duration::hours(1));
        assert_eq!(metrics.durations.min, 100);
        assert_eq!(metrics.durations.max, 400);
        assert_eq!(metrics.durations.median, 301);
        // (400 + 100 + 301 + 200) / 4 = 250.25
        assert_eq!(metrics.durations.average, 250);
    }

    #[test]
    fn test_method_ranking_breaks_ties_by_discovery() {
        let calls = vec![
            call(HttpMethod::Delete, 200, 1, 1),
            call(HttpMethod::Post, 200, 1, 1),
            call(HttpMethod::Get, 200, 1, 1),
            call(HttpMethod::Post, 200, 1, 1),
            call(HttpMethod::Get, 200, 1, 1),
            call(HttpMethod::Put, 200, 1, 1),
        ];
        let metrics = MetricsAggregator::new(Utc::now() - Duration::hours(1))
            .with_top_methods(3)
            .aggregate(&calls);

        let ranked: Vec<_> = metrics.methods.iter().map(|m| (m.method, m.count)).collect();
        assert_eq!(
            ranked,
            vec![
                (HttpMethod::Post, 2),
                (HttpMethod::Get, 2),
                (HttpMethod::Delete, 1)
            ]
        );
    }

    #[test]
    fn test_health_thresholds() {
        assert_eq!(Health::from_counts(95, 100), Health::Excellent);
        assert_eq!(Health::from_counts(80, 100), Health::Good);
        assert_eq!(Health::from_counts(79, 100), Health::NeedsAttention);
        assert_eq!(Health::from_counts(0, 0), Health::NeedsAttention);
    }

    #[test]
    fn test_recent_calls_newest_first() {
        let calls = vec![
            call(HttpMethod::Get, 200, 1, 30),
            call(HttpMethod::Post, 200, 1, 5),
            call(HttpMethod::Put, 200, 1, 15),
        ];
        let metrics = MetricsAggregator::new(Utc::now() - Duration::hours(1))
            .with_recent(2)
            .aggregate(&calls);
        let methods: Vec<_> = metrics.recent.iter().map(|c| c.method).collect();
        assert_eq!(methods, vec![HttpMethod::Post, HttpMethod::Put]);
    }
}
