use crate::errors::DashboardError;
use crate::models::{ChartPoint, DayRecord, GlobalSummary, RegionRecord, SeriesMode, StatKind};

/// Sums every region's figures; a missing count contributes zero.
pub fn summarize_regions(records: &[RegionRecord]) -> GlobalSummary {
    records.iter().fold(GlobalSummary::default(), |mut acc, record| {
        acc.totals.confirmed = acc.totals.confirmed.saturating_add(record.confirmed.unwrap_or(0));
        acc.totals.deaths = acc.totals.deaths.saturating_add(record.deaths.unwrap_or(0));
        acc.totals.recovered = acc.totals.recovered.saturating_add(record.recovered.unwrap_or(0));
        acc.daily.confirmed = acc
            .daily
            .confirmed
            .saturating_add(record.confirmed_daily.unwrap_or(0));
        acc.daily.deaths = acc.daily.deaths.saturating_add(record.deaths_daily.unwrap_or(0));
        acc.daily.recovered = acc
            .daily
            .recovered
            .saturating_add(record.recovered_daily.unwrap_or(0));
        acc
    })
}

pub fn derive_chart_series(records: &[DayRecord], stat: StatKind, mode: SeriesMode) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| ChartPoint {
            date: record.date.clone(),
            count: record.count(stat, mode),
        })
        .collect()
}

pub fn latest_country_stat(records: &[DayRecord]) -> Result<&DayRecord, DashboardError> {
    records
        .last()
        .ok_or_else(|| DashboardError::NoData("country series is empty".into()))
}

/// Orders a series by calendar date, keeping source order for equal dates.
pub fn sort_chronologically(
    endpoint: &'static str,
    records: Vec<DayRecord>,
) -> Result<Vec<DayRecord>, DashboardError> {
    let mut keyed = records
        .into_iter()
        .map(|record| match record.calendar_date() {
            Some(date) => Ok((date, record)),
            None => Err(DashboardError::malformed(
                endpoint,
                format!("unreadable date '{}'", record.date),
            )),
        })
        .collect::<Result<Vec<_>, _>>()?;
    keyed.sort_by_key(|(date, _)| *date);
    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}
