use crate::errors::DashboardError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Statistic a user can chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    #[default]
    Confirmed,
    Deaths,
}

impl StatKind {
    pub const ALL: [StatKind; 2] = [StatKind::Confirmed, StatKind::Deaths];

    pub fn key(self) -> &'static str {
        match self {
            StatKind::Confirmed => "confirmed",
            StatKind::Deaths => "deaths",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKind::Confirmed => "Confirmed",
            StatKind::Deaths => "Deaths",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for StatKind {
    type Err = DashboardError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "confirmed" => Ok(StatKind::Confirmed),
            "deaths" => Ok(StatKind::Deaths),
            other => Err(DashboardError::InvalidSelection(format!(
                "stat must be 'confirmed' or 'deaths', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesMode {
    Cumulative,
    Daily,
}

/// One day of a country's time series.
///
/// `date`, `confirmed` and `deaths` are mandatory; every other count
/// defaults to zero when the source leaves it out or sends `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: String,
    pub confirmed: i64,
    pub deaths: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub confirmed_daily: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub deaths_daily: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub recovered: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub recovered_daily: i64,
}

impl DayRecord {
    pub fn count(&self, stat: StatKind, mode: SeriesMode) -> i64 {
        match (stat, mode) {
            (StatKind::Confirmed, SeriesMode::Cumulative) => self.confirmed,
            (StatKind::Confirmed, SeriesMode::Daily) => self.confirmed_daily,
            (StatKind::Deaths, SeriesMode::Cumulative) => self.deaths,
            (StatKind::Deaths, SeriesMode::Daily) => self.deaths_daily,
        }
    }

    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

/// One country's or state's figures for a single date in the summary feed.
/// Any subset of the counts may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    #[serde(default)]
    pub confirmed: Option<i64>,
    #[serde(default)]
    pub deaths: Option<i64>,
    #[serde(default)]
    pub recovered: Option<i64>,
    #[serde(default)]
    pub confirmed_daily: Option<i64>,
    #[serde(default)]
    pub deaths_daily: Option<i64>,
    #[serde(default)]
    pub recovered_daily: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Metadata {
    pub countries: Vec<String>,
    pub first_date: String,
    pub last_date: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Figures {
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
}

impl Figures {
    pub fn new(confirmed: i64, deaths: i64, recovered: i64) -> Self {
        Self {
            confirmed,
            deaths,
            recovered,
        }
    }
}

/// World figures for the most recent date in the summary feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalSummary {
    pub totals: Figures,
    pub daily: Figures,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: String,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatChoice {
    pub key: StatKind,
    pub label: &'static str,
}

/// Immutable snapshot handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub countries: Vec<String>,
    pub stats: Vec<StatChoice>,
    pub first_date: String,
    pub last_date: String,
    pub selected_country: String,
    pub selected_stat: StatKind,
    /// Country the series and latest figures belong to. Differs from
    /// `selected_country` after a failed refresh.
    pub series_country: String,
    pub global_totals: Figures,
    pub global_daily: Figures,
    pub latest: DayRecord,
    pub daily_series: Vec<ChartPoint>,
    pub cumulative_series: Vec<ChartPoint>,
    pub notice: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub view: DashboardView,
}

#[derive(Debug, Deserialize)]
pub struct SelectCountryRequest {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectStatRequest {
    pub stat: String,
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part
/// (`2021-05-01T00:00:00.000Z`).
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = match raw.char_indices().nth(10) {
        Some((idx, 'T' | ' ')) => &raw[..idx],
        Some(_) => return None,
        None => raw,
    };
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or_default())
}
