use glob::Pattern;
use url::Url;

/// Pattern matched against the host of a call's URL
#[derive(Debug, Clone)]
pub enum HostPattern {
    /// Whole hostname, case-insensitive
    Exact(String),
    /// Glob such as `*.typicode.com` or `api?.example.com`
    Glob(Pattern),
}

impl HostPattern {
    /// Patterns containing `*` or `?` are globs, anything else is exact
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let lower = pattern.trim().to_lowercase();
        if !lower.contains(['*', '?']) {
            return Ok(HostPattern::Exact(lower));
        }

        Pattern::new(&lower).map(HostPattern::Glob).map_err(|e| {
            crate::Error::InvalidPattern(format!("Invalid host pattern '{}': {}", pattern, e))
        })
    }

    pub fn matches(&self, hostname: &str) -> bool {
        let hostname = hostname.to_lowercase();
        match self {
            HostPattern::Exact(host) => hostname == *host,
            HostPattern::Glob(glob) => glob.matches(&hostname),
        }
    }

    /// Match against the host of a URL; unparseable URLs never match
    pub fn matches_url(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => parsed.host_str().is_some_and(|host| self.matches(host)),
            Err(e) => {
                tracing::debug!("Failed to parse URL {}: {}", url, e);
                false
            }
        }
    }
}
