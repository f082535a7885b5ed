use rust_decimal::Decimal;

use crate::domain::value::{GeoId, ReportId};

/// Server-side state of a Wordstat report (`StatusReport`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportStatus {
    /// Still being computed.
    Pending,
    /// Results can be fetched.
    Done,
    /// The server gave up on the report.
    Failed,
    /// Any status string the server reports that this crate does not know.
    Other(String),
}

impl ReportStatus {
    /// Map the `StatusReport` string; unknown values land in [`ReportStatus::Other`].
    pub fn from_wire(value: &str) -> Self {
        match value {
            "Pending" => Self::Pending,
            "Done" => Self::Done,
            "Failed" => Self::Failed,
            other => Self::Other(other.to_owned()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportInfo {
    pub id: ReportId,
    pub status: ReportStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseShows {
    pub phrase: String,
    pub shows: u64,
}

/// Wordstat result for one requested phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordstatItem {
    pub phrase: String,
    pub geo_ids: Vec<GeoId>,
    /// Queries containing the phrase, with monthly show counts.
    pub searched_with: Vec<PhraseShows>,
    /// Queries users also searched for.
    pub searched_also: Vec<PhraseShows>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountStanding {
    pub quota_units_remaining: i64,
    /// `None` when the server reports no amount; distinct from `Some(0)`.
    pub balance: Option<Decimal>,
}
