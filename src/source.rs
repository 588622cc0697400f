//! HTTP client for the COVID-19 aggregation API.
//!
//! Calls `/metadata` for the country list and date range, `/global_and_us`
//! for the per-region summary of one date and `/global` for one country's
//! full time series.

use crate::errors::DashboardError;
use crate::models::{parse_calendar_date, DayRecord, GlobalSummary, Metadata, RegionRecord};
use crate::stats::{sort_chronologically, summarize_regions};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Fields the API would otherwise include in every record.
const HIDDEN_FIELDS: &str = "_id, country, country_code, country_iso2, country_iso3, loc, state, uid";

#[derive(Clone)]
pub struct CovidApi {
    base_url: String,
    client: reqwest::Client,
}

impl CovidApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn load_metadata(&self) -> Result<Metadata, DashboardError> {
        let metadata: Metadata = self.get_json("metadata", &[]).await?;
        if metadata.countries.is_empty() {
            return Err(DashboardError::malformed("metadata", "country list is empty"));
        }
        for (field, value) in [("first_date", &metadata.first_date), ("last_date", &metadata.last_date)] {
            if parse_calendar_date(value).is_none() {
                return Err(DashboardError::malformed(
                    "metadata",
                    format!("{field} '{value}' is not a date"),
                ));
            }
        }
        Ok(metadata)
    }

    /// Sums the per-region records of the single date `as_of`.
    pub async fn load_global_summary(&self, as_of: &str) -> Result<GlobalSummary, DashboardError> {
        let records: Vec<RegionRecord> = self
            .get_json(
                "global_and_us",
                &[
                    ("hide_fields", HIDDEN_FIELDS),
                    ("min_date", as_of),
                    ("max_date", as_of),
                ],
            )
            .await?;
        debug!(regions = records.len(), as_of, "summary records received");
        Ok(summarize_regions(&records))
    }

    /// Full time series for `country`, oldest day first.
    pub async fn load_country_series(&self, country: &str) -> Result<Vec<DayRecord>, DashboardError> {
        let records: Vec<DayRecord> = self
            .get_json("global", &[("country", country), ("hide_fields", HIDDEN_FIELDS)])
            .await?;
        debug!(days = records.len(), country, "country series received");
        sort_chronologically("global", records)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, DashboardError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%url, ?query, "requesting");

        let body = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        serde_json::from_slice(&body).map_err(|err| DashboardError::malformed(endpoint, err.to_string()))
    }
}
