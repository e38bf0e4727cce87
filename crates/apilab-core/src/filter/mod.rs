mod host_matcher;

pub use host_matcher::HostPattern;

use crate::model::{Call, HttpMethod};

/// Filter criteria for call history
///
/// All conditions are combined with AND logic; within `hosts` any pattern
/// may match.
#[derive(Debug, Default)]
pub struct CallFilter {
    pub hosts: Vec<HostPattern>,
    pub status: Option<StatusFilter>,
    pub method: Option<HttpMethod>,
    pub button_id: Option<String>,
}

impl CallFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hosts(mut self, patterns: &[String]) -> crate::Result<Self> {
        for pattern in patterns {
            self.hosts.push(HostPattern::parse(pattern)?);
        }
        Ok(self)
    }

    pub fn with_status(mut self, pattern: &str) -> crate::Result<Self> {
        self.status = Some(StatusFilter::parse(pattern)?);
        Ok(self)
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_button(mut self, button_id: impl Into<String>) -> Self {
        self.button_id = Some(button_id.into());
        self
    }

    pub fn matches(&self, call: &Call) -> bool {
        if !self.hosts.is_empty() && !self.hosts.iter().any(|p| p.matches_url(&call.url)) {
            return false;
        }
        if let Some(status) = &self.status
            && !status.matches(call.status)
        {
            return false;
        }
        if self.method.is_some_and(|m| m != call.method) {
            return false;
        }
        if let Some(button_id) = &self.button_id
            && *button_id != call.button_id
        {
            return false;
        }
        true
    }

    /// Matching calls, keeping history order
    pub fn apply<'a>(&self, calls: &'a [Call]) -> Vec<&'a Call> {
        calls.iter().filter(|call| self.matches(call)).collect()
    }
}

/// Status code filter: `404`, `2xx` or `500-599`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    Exact(u16),
    Range(u16, u16),
}

impl StatusFilter {
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let pattern = pattern.trim().to_lowercase();

        if let Some(prefix) = pattern.strip_suffix("xx")
            && prefix.len() == 1
            && let Some(digit) = prefix.chars().next().and_then(|c| c.to_digit(10))
            && digit > 0
        {
            let start = digit as u16 * 100;
            return Ok(StatusFilter::Range(start, start + 99));
        }

        if let Some((start, end)) = pattern.split_once('-') {
            let start = parse_code(start)?;
            let end = parse_code(end)?;
            if start > end {
                return Err(crate::Error::InvalidPattern(format!(
                    "Status range is reversed: {}",
                    pattern
                )));
            }
            return Ok(StatusFilter::Range(start, end));
        }

        Ok(StatusFilter::Exact(parse_code(&pattern)?))
    }

    pub fn matches(&self, status: u16) -> bool {
        match self {
            StatusFilter::Exact(code) => status == *code,
            StatusFilter::Range(start, end) => (*start..=*end).contains(&status),
        }
    }
}

fn parse_code(text: &str) -> crate::Result<u16> {
    text.trim()
        .parse::<u16>()
        .map_err(|_| crate::Error::InvalidPattern(format!("Invalid status code: {}", text.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CallOrigin;
    use serde_json::json;

    fn call(method: HttpMethod, url: &str, status: u16, button_id: &str) -> Call {
        let origin = CallOrigin {
            button_id: button_id.to_string(),
            button_name: "b".to_string(),
            method,
            url: url.to_string(),
        };
        if status == 0 {
            Call::failed(origin, "offline", 1)
        } else {
            Call::completed(origin, status, "", json!(null), 1)
        }
    }

    #[test]
    fn test_status_filter_forms() {
        assert_eq!(StatusFilter::parse("404").unwrap(), StatusFilter::Exact(404));
        assert_eq!(StatusFilter::parse("2xx").unwrap(), StatusFilter::Range(200, 299));
        assert_eq!(StatusFilter::parse("5XX").unwrap(), StatusFilter::Range(500, 599));
        assert_eq!(
            StatusFilter::parse("400-451").unwrap(),
            StatusFilter::Range(400, 451)
        );
    }

    #[test]
    fn test_status_filter_invalid() {
        assert!(StatusFilter::parse("abc").is_err());
        assert!(StatusFilter::parse("1xxx").is_err());
        assert!(StatusFilter::parse("0xx").is_err());
        assert!(StatusFilter::parse("200-abc").is_err());
        assert!(StatusFilter::parse("500-400").is_err());
    }

    #[test]
    fn test_zero_status_matches_only_explicitly() {
        assert!(StatusFilter::parse("0").unwrap().matches(0));
        assert!(!StatusFilter::parse("2xx").unwrap().matches(0));
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CallFilter::new();
        assert!(filter.matches(&call(HttpMethod::Get, "https://a.com", 200, "btn_1")));
        assert!(filter.matches(&call(HttpMethod::Get, "nonsense", 0, "btn_1")));
    }

    #[test]
    fn test_criteria_are_combined() {
        let calls = vec![
            call(HttpMethod::Get, "https://api.github.com/users/x", 200, "btn_1"),
            call(HttpMethod::Post, "https://jsonplaceholder.typicode.com/posts", 201, "btn_2"),
            call(HttpMethod::Get, "https://jsonplaceholder.typicode.com/users", 404, "btn_3"),
            call(HttpMethod::Get, "https://jsonplaceholder.typicode.com/users", 200, "btn_3"),
        ];

        let filter = CallFilter::new()
            .with_hosts(&["*.typicode.com".to_string()])
            .unwrap()
            .with_status("2xx")
            .unwrap()
            .with_method(HttpMethod::Get);

        let matched = filter.apply(&calls);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].status, 200);
        assert_eq!(matched[0].button_id, "btn_3");
    }

    #[test]
    fn test_button_filter() {
        let calls = vec![
            call(HttpMethod::Get, "https://a.com", 200, "btn_1"),
            call(HttpMethod::Get, "https://a.com", 200, "btn_2"),
        ];
        let matched = CallFilter::new().with_button("btn_2").apply(&calls);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].button_id, "btn_2");
    }
}
