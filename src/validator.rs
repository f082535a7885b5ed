//! Local checks for Wordstat input, run before any network call.

use serde_json::Value;
use tracing::error;

use crate::client::DirectError;
use crate::domain::{GeoId, Phrase, ReportRequest, ValidationError};
use crate::regions::RegionCodeCache;

/// Validates phrases and geo ids against a [`RegionCodeCache`].
///
/// Phrases are taken as loose JSON values because they usually come from
/// user-supplied data where a number can slip into the list.
#[derive(Debug, Clone, Copy)]
pub struct InputValidator<'a> {
    regions: &'a RegionCodeCache,
}

impl<'a> InputValidator<'a> {
    pub fn new(regions: &'a RegionCodeCache) -> Self {
        Self { regions }
    }

    /// Every element must be a JSON string; that is the only check.
    ///
    /// Empty lists and empty strings pass. On failure the error lists all
    /// non-string elements in their original order.
    pub fn validate_phrases(&self, phrases: &[Value]) -> Result<Vec<Phrase>, ValidationError> {
        let offending = phrases
            .iter()
            .filter(|phrase| !phrase.is_string())
            .cloned()
            .collect::<Vec<_>>();
        if !offending.is_empty() {
            let err = ValidationError::InvalidPhraseType { phrases: offending };
            error!(error = %err, "invalid Wordstat input");
            return Err(err);
        }

        Ok(phrases
            .iter()
            .filter_map(Value::as_str)
            .map(Phrase::new)
            .collect())
    }

    /// Every id must be in the region catalog; fails on the first unknown id.
    pub fn validate_geo_ids(&self, geo_ids: &[GeoId]) -> Result<(), DirectError> {
        for &geo_id in geo_ids {
            if !self.regions.is_valid(geo_id)? {
                let err = ValidationError::InvalidRegionCode {
                    geo_id: geo_id.get(),
                };
                error!(error = %err, "invalid Wordstat input");
                return Err(err.into());
            }
        }
        Ok(())
    }

    /// Phrases first, then regions; the first failing check wins.
    pub fn validate(
        &self,
        phrases: &[Value],
        geo_ids: &[GeoId],
    ) -> Result<ReportRequest, DirectError> {
        let phrases = self.validate_phrases(phrases)?;
        self.validate_geo_ids(geo_ids)?;
        Ok(ReportRequest::new(phrases, geo_ids.to_vec()))
    }
}
