//! Per-session dashboard state.
//!
//! A session starts `Uninitialized`, becomes `Initialized` once metadata,
//! world figures and the first country series have all loaded, and stays
//! there. Country and stat selections are self-transitions that refresh the
//! derived view.

use crate::errors::DashboardError;
use crate::models::{DashboardView, DayRecord, GlobalSummary, Metadata, SeriesMode, StatChoice, StatKind};
use crate::source::CovidApi;
use crate::stats::{derive_chart_series, latest_country_stat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initialized,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    phase: Phase,
    countries: Vec<String>,
    first_date: String,
    last_date: String,
    selected_country: String,
    selected_stat: StatKind,
    global: GlobalSummary,
    series_country: String,
    country_series: Vec<DayRecord>,
    notice: Option<String>,
}

impl SessionState {
    pub fn new(default_country: impl Into<String>) -> Self {
        Self {
            phase: Phase::Uninitialized,
            countries: Vec::new(),
            first_date: String::new(),
            last_date: String::new(),
            selected_country: default_country.into(),
            selected_stat: StatKind::default(),
            global: GlobalSummary::default(),
            series_country: String::new(),
            country_series: Vec::new(),
            notice: None,
        }
    }

    /// Loads everything the first render needs. Nothing is committed unless
    /// every fetch succeeds.
    pub async fn initialize(&mut self, source: &CovidApi) -> Result<(), DashboardError> {
        let metadata = source.load_metadata().await?;
        let global = source.load_global_summary(&metadata.last_date).await?;
        let country = self.initial_country(&metadata)?;
        let series = source.load_country_series(&country).await?;
        self.install(metadata, global, country, series)
    }

    /// Records the selection, then refreshes the series for it. On a failed
    /// refresh the selection stays recorded, the previous series stays on
    /// display and a notice describes the failure.
    pub async fn select_country(&mut self, name: &str, source: &CovidApi) -> Result<(), DashboardError> {
        self.record_country(name)?;
        let fetched = source.load_country_series(name).await;
        self.apply_country_series(name, fetched)
    }

    /// Switches the charted statistic. The cached series already carries
    /// every statistic, so nothing is fetched. A pending refresh notice is
    /// kept; only a successful country refresh clears it.
    pub fn select_stat(&mut self, stat: StatKind) -> Result<(), DashboardError> {
        self.ensure_initialized()?;
        self.selected_stat = stat;
        Ok(())
    }

    pub fn view(&self) -> Result<DashboardView, DashboardError> {
        self.ensure_initialized()?;
        let latest = latest_country_stat(&self.country_series)?.clone();

        Ok(DashboardView {
            countries: self.countries.clone(),
            stats: StatKind::ALL
                .iter()
                .map(|&key| StatChoice { key, label: key.label() })
                .collect(),
            first_date: self.first_date.clone(),
            last_date: self.last_date.clone(),
            selected_country: self.selected_country.clone(),
            selected_stat: self.selected_stat,
            series_country: self.series_country.clone(),
            global_totals: self.global.totals,
            global_daily: self.global.daily,
            latest,
            daily_series: derive_chart_series(&self.country_series, self.selected_stat, SeriesMode::Daily),
            cumulative_series: derive_chart_series(
                &self.country_series,
                self.selected_stat,
                SeriesMode::Cumulative,
            ),
            notice: self.notice.clone(),
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn selected_country(&self) -> &str {
        &self.selected_country
    }

    pub fn selected_stat(&self) -> StatKind {
        self.selected_stat
    }

    pub fn global(&self) -> GlobalSummary {
        self.global
    }

    pub fn series_country(&self) -> &str {
        &self.series_country
    }

    pub fn country_series(&self) -> &[DayRecord] {
        &self.country_series
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// The seed country when the source knows it, otherwise the first listed.
    fn initial_country(&self, metadata: &Metadata) -> Result<String, DashboardError> {
        if metadata.countries.contains(&self.selected_country) {
            return Ok(self.selected_country.clone());
        }
        metadata
            .countries
            .first()
            .cloned()
            .ok_or_else(|| DashboardError::malformed("metadata", "country list is empty"))
    }

    fn install(
        &mut self,
        metadata: Metadata,
        global: GlobalSummary,
        country: String,
        series: Vec<DayRecord>,
    ) -> Result<(), DashboardError> {
        latest_country_stat(&series).map_err(|_| DashboardError::NoData(format!("no records for {country}")))?;

        self.countries = metadata.countries;
        self.first_date = metadata.first_date;
        self.last_date = metadata.last_date;
        self.global = global;
        self.selected_country = country.clone();
        self.series_country = country;
        self.country_series = series;
        self.notice = None;
        self.phase = Phase::Initialized;
        Ok(())
    }

    fn record_country(&mut self, name: &str) -> Result<(), DashboardError> {
        self.ensure_initialized()?;
        if !self.countries.iter().any(|country| country == name) {
            return Err(DashboardError::InvalidSelection(format!("unknown country '{name}'")));
        }
        self.selected_country = name.to_string();
        Ok(())
    }

    fn apply_country_series(
        &mut self,
        country: &str,
        fetched: Result<Vec<DayRecord>, DashboardError>,
    ) -> Result<(), DashboardError> {
        let outcome = fetched.and_then(|series| {
            latest_country_stat(&series).map_err(|_| DashboardError::NoData(format!("no records for {country}")))?;
            Ok(series)
        });

        match outcome {
            Ok(series) => {
                self.series_country = country.to_string();
                self.country_series = series;
                self.notice = None;
                Ok(())
            }
            Err(err) => {
                self.notice = Some(format!(
                    "Could not refresh {country}; showing {}. {err}",
                    self.series_country
                ));
                Err(err)
            }
        }
    }

    fn ensure_initialized(&self) -> Result<(), DashboardError> {
        match self.phase {
            Phase::Initialized => Ok(()),
            Phase::Uninitialized => Err(DashboardError::NoData("session is not initialized".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn day(date: &str, confirmed: i64, confirmed_daily: i64, deaths: i64, deaths_daily: i64) -> DayRecord {
        DayRecord {
            date: date.into(),
            confirmed,
            deaths,
            confirmed_daily,
            deaths_daily,
            recovered: 0,
            recovered_daily: 0,
        }
    }

    fn metadata() -> Metadata {
        Metadata {
            countries: vec!["Sri Lanka".into(), "India".into()],
            first_date: "2020-01-22".into(),
            last_date: "2021-05-01".into(),
        }
    }

    fn initialized() -> SessionState {
        let mut session = SessionState::new("Sri Lanka");
        session
            .install(
                metadata(),
                GlobalSummary::default(),
                "Sri Lanka".into(),
                vec![
                    day("2021-04-30", 90, 4, 2, 0),
                    day("2021-05-01", 100, 10, 3, 1),
                ],
            )
            .unwrap();
        session
    }

    fn unreachable_source() -> CovidApi {
        CovidApi::new("http://127.0.0.1:9", Duration::from_millis(50)).unwrap()
    }

    #[test]
    fn new_session_has_no_view() {
        let session = SessionState::new("Sri Lanka");
        assert_eq!(session.phase(), Phase::Uninitialized);
        assert_eq!(session.selected_stat(), StatKind::Confirmed);
        assert!(matches!(session.view(), Err(DashboardError::NoData(_))));
    }

    #[test]
    fn seed_country_falls_back_to_first_listed() {
        let session = SessionState::new("Atlantis");
        let metadata = Metadata {
            countries: vec!["India".into(), "Sri Lanka".into()],
            ..metadata()
        };
        assert_eq!(session.initial_country(&metadata).unwrap(), "India");
    }

    #[test]
    fn install_rejects_empty_series() {
        let mut session = SessionState::new("Sri Lanka");
        let result = session.install(metadata(), GlobalSummary::default(), "Sri Lanka".into(), Vec::new());
        assert!(matches!(result, Err(DashboardError::NoData(_))));
        assert_eq!(session.phase(), Phase::Uninitialized);
        assert!(session.countries().is_empty());
    }

    #[test]
    fn view_derives_series_for_selected_stat() {
        let mut session = initialized();
        session.select_stat(StatKind::Deaths).unwrap();
        let view = session.view().unwrap();

        assert_eq!(view.latest.date, "2021-05-01");
        let daily: Vec<i64> = view.daily_series.iter().map(|point| point.count).collect();
        let totals: Vec<i64> = view.cumulative_series.iter().map(|point| point.count).collect();
        assert_eq!(daily, vec![0, 1]);
        assert_eq!(totals, vec![2, 3]);
        assert_eq!(view.stats.len(), 2);
    }

    #[test]
    fn selecting_same_stat_twice_is_idempotent() {
        let mut once = initialized();
        once.select_stat(StatKind::Deaths).unwrap();

        let mut twice = initialized();
        twice.select_stat(StatKind::Deaths).unwrap();
        twice.select_stat(StatKind::Deaths).unwrap();

        let once = once.view().unwrap();
        let twice = twice.view().unwrap();
        assert_eq!(once.daily_series, twice.daily_series);
        assert_eq!(once.cumulative_series, twice.cumulative_series);
        assert_eq!(once.latest, twice.latest);
    }

    #[tokio::test]
    async fn unknown_country_is_rejected_without_changes() {
        let mut session = initialized();
        let before = session.country_series().to_vec();

        let result = session.select_country("Unknown", &unreachable_source()).await;

        assert!(matches!(result, Err(DashboardError::InvalidSelection(_))));
        assert_eq!(session.selected_country(), "Sri Lanka");
        assert_eq!(session.country_series(), before.as_slice());
        assert!(session.notice().is_none());
    }

    #[test]
    fn failed_refresh_keeps_previous_series() {
        let mut session = initialized();
        let before = session.country_series().to_vec();

        session.record_country("India").unwrap();
        let result = session.apply_country_series(
            "India",
            Err(DashboardError::SourceUnavailable("request timed out".into())),
        );

        assert!(matches!(result, Err(DashboardError::SourceUnavailable(_))));
        assert_eq!(session.selected_country(), "India");
        assert_eq!(session.series_country(), "Sri Lanka");
        assert_eq!(session.country_series(), before.as_slice());
        assert!(session.notice().unwrap().contains("India"));
        assert_eq!(session.view().unwrap().selected_country, "India");
    }

    #[test]
    fn stat_change_keeps_refresh_notice() {
        let mut session = initialized();
        session.record_country("India").unwrap();
        let _ = session.apply_country_series("India", Err(DashboardError::NoData("empty".into())));

        session.select_stat(StatKind::Deaths).unwrap();

        assert!(session.notice().unwrap().contains("India"));
        assert!(session.view().unwrap().notice.is_some());
    }

    #[test]
    fn successful_refresh_replaces_series_and_clears_notice() {
        let mut session = initialized();
        session.record_country("India").unwrap();
        let _ = session.apply_country_series("India", Err(DashboardError::NoData("empty".into())));
        assert!(session.notice().is_some());

        let india = vec![day("2021-05-01", 100, 10, 5, 1)];
        session.apply_country_series("India", Ok(india.clone())).unwrap();

        assert_eq!(session.series_country(), "India");
        assert_eq!(session.country_series(), india.as_slice());
        assert!(session.notice().is_none());
    }

    #[test]
    fn empty_refresh_is_reported_as_no_data() {
        let mut session = initialized();
        session.record_country("India").unwrap();
        let result = session.apply_country_series("India", Ok(Vec::new()));
        assert!(matches!(result, Err(DashboardError::NoData(_))));
        assert_eq!(session.series_country(), "Sri Lanka");
    }
}
