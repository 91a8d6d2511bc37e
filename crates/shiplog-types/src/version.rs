use serde::{Deserialize, Serialize};
use std::fmt;

/// Version string of the host framework, detected once at bootstrap
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostVersion(String);

impl HostVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_in(&self, range: &VersionRange) -> bool {
        range.contains(self)
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HostVersion {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Named set of version prefixes.
///
/// Membership is a plain prefix test, the same test the host uses, so
/// `"5.1"` also claims `"5.10"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionRange {
    name: &'static str,
    prefixes: &'static [&'static str],
}

impl VersionRange {
    pub const fn new(name: &'static str, prefixes: &'static [&'static str]) -> Self {
        Self { name, prefixes }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn prefixes(&self) -> &'static [&'static str] {
        self.prefixes
    }

    pub fn contains(&self, version: &HostVersion) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| version.as_str().starts_with(prefix))
    }
}

/// Host event families that change shape across host versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFamily {
    LogEmitted,
    QueueJobLifecycle,
    QueryExecuted,
}

impl EventFamily {
    pub const ALL: [EventFamily; 3] = [
        EventFamily::LogEmitted,
        EventFamily::QueueJobLifecycle,
        EventFamily::QueryExecuted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventFamily::LogEmitted => "log_emitted",
            EventFamily::QueueJobLifecycle => "queue_job_lifecycle",
            EventFamily::QueryExecuted => "query_executed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: VersionRange = VersionRange::new("old", &["5.0", "5.1"]);

    #[test]
    fn test_range_is_prefix_match() {
        assert!(OLD.contains(&HostVersion::new("5.1.46")));
        assert!(OLD.contains(&HostVersion::new("5.0")));
        assert!(!OLD.contains(&HostVersion::new("5.2.45")));
        assert!(!OLD.contains(&HostVersion::new("6.0.0")));
    }

    #[test]
    fn test_prefix_match_claims_two_digit_minor() {
        assert!(HostVersion::new("5.10.0").is_in(&OLD));
    }
}
