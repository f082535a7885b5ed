use std::time::Duration;

use crate::domain::value::{GeoId, Phrase};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Phrases and regions for `CreateNewWordstatReport`.
///
/// Nothing is checked here; build it through [`crate::InputValidator`] to
/// check phrase types and geo ids against the region catalog first.
/// Empty phrase lists are passed to the server as is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    phrases: Vec<Phrase>,
    geo_ids: Vec<GeoId>,
}

impl ReportRequest {
    pub fn new(phrases: Vec<Phrase>, geo_ids: Vec<GeoId>) -> Self {
        Self { phrases, geo_ids }
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn geo_ids(&self) -> &[GeoId] {
        &self.geo_ids
    }
}

/// Bounds for [`crate::ReportClient::wait_until_done`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Fixed delay between two status checks.
    pub interval: Duration,
    /// Total time to wait before giving up.
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}
