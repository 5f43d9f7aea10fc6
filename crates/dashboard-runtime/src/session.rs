//! The dashboard's single "current dataset" context.
//!
//! A [`DashboardSession`] owns the dataset built from the current source and
//! the interactive filter state. Loading a new source replaces the dataset
//! wholesale; a failed load leaves the previous one in place. Every
//! [`DashboardSession::snapshot`] recomputes all aggregates from scratch.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use dashboard_core::countries::CountryTable;
use dashboard_core::error::Result;
use dashboard_core::models::ContentType;
use dashboard_core::time_utils::TimezoneHandler;
use dashboard_data::aggregator::{
    CountryUsage, DeviceUsage, Heatmap, ProfileFilter, ProfileHours, TitleCount,
    ViewingAggregator, WeekdayHours,
};
use dashboard_data::loader::DataSource;
use dashboard_data::metrics::HeadlineMetrics;
use dashboard_data::pipeline::{build_dataset, Dataset, LoadStats};
use serde::Serialize;
use tracing::{debug, info, warn};

// ── Filters ───────────────────────────────────────────────────────────────────

/// Interactive selections that shape the charts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filters {
    /// Profiles included in top titles, devices and countries.
    pub selected_profiles: BTreeSet<String>,
    /// Which kind the top-titles chart shows.
    pub content_type: ContentType,
    /// Profile shown in the heatmap.
    pub heatmap_profile: Option<String>,
}

impl Filters {
    /// Everything selected, movies first, heatmap on the first profile.
    pub fn for_profiles(profiles: &[String]) -> Self {
        Self {
            selected_profiles: profiles.iter().cloned().collect(),
            content_type: ContentType::Movie,
            heatmap_profile: profiles.first().cloned(),
        }
    }

    pub fn profile_filter(&self) -> ProfileFilter {
        ProfileFilter::Only(self.selected_profiles.clone())
    }

    /// Keep what still applies to `profiles`; new profiles start selected.
    fn carry_over(&self, previous: &[String], profiles: &[String]) -> Self {
        let selected_profiles = profiles
            .iter()
            .filter(|p| self.selected_profiles.contains(*p) || !previous.contains(*p))
            .cloned()
            .collect();
        let heatmap_profile = self
            .heatmap_profile
            .as_ref()
            .filter(|p| profiles.contains(*p))
            .cloned()
            .or_else(|| profiles.first().cloned());
        Self {
            selected_profiles,
            content_type: self.content_type,
            heatmap_profile,
        }
    }
}

// ── DashboardSnapshot ─────────────────────────────────────────────────────────

/// Everything one frame or report needs, computed from the current dataset.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub timezone: String,
    pub stats: LoadStats,
    pub headline: HeadlineMetrics,
    /// All profiles, sorted; the `1`–`9` keys index into this list.
    pub profiles: Vec<String>,
    pub selected_profiles: BTreeSet<String>,
    pub content_type: ContentType,
    pub hours_by_profile: Vec<ProfileHours>,
    pub top_titles: Vec<TitleCount>,
    pub hours_by_weekday: Vec<WeekdayHours>,
    pub devices: DeviceUsage,
    pub countries: CountryUsage,
    pub heatmap: Option<Heatmap>,
    pub last_error: Option<String>,
}

// ── DashboardSession ──────────────────────────────────────────────────────────

pub struct DashboardSession {
    source: DataSource,
    countries: CountryTable,
    tz: TimezoneHandler,
    dataset: Dataset,
    filters: Filters,
    last_error: Option<String>,
}

impl DashboardSession {
    /// Build the initial dataset. Failure here is fatal for the caller.
    pub fn open(source: DataSource, countries: CountryTable, tz: TimezoneHandler) -> Result<Self> {
        let dataset = build_dataset(&source, countries.clone(), &tz)?;
        let filters = Filters::for_profiles(&dataset.profiles());
        info!(
            "Session opened on {} with {} profiles",
            source.describe(),
            filters.selected_profiles.len()
        );
        Ok(Self {
            source,
            countries,
            tz,
            dataset,
            filters,
            last_error: None,
        })
    }

    /// Load `source` and, on success, make it the current dataset.
    ///
    /// Filters reset to their defaults. On failure the previous dataset and
    /// source stay current and the error is kept for the status line.
    pub fn replace_source(&mut self, source: DataSource) -> Result<()> {
        match build_dataset(&source, self.countries.clone(), &self.tz) {
            Ok(dataset) => {
                info!("Replaced dataset with {}", source.describe());
                self.filters = Filters::for_profiles(&dataset.profiles());
                self.dataset = dataset;
                self.source = source;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Load of {} failed, keeping previous data: {}", source.describe(), e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Re-read the current source, keeping filters that still apply.
    pub fn reload(&mut self) -> Result<()> {
        let previous_profiles = self.dataset.profiles();
        let previous_filters = self.filters.clone();
        self.replace_source(self.source.clone())?;
        self.filters = previous_filters.carry_over(&previous_profiles, &self.dataset.profiles());
        Ok(())
    }

    // ── Filter mutators ───────────────────────────────────────────────────────

    pub fn toggle_content_type(&mut self) {
        self.filters.content_type = self.filters.content_type.toggled();
        debug!("Top titles now show {}", self.filters.content_type);
    }

    /// Flip selection of the profile at `index` in [`Dataset::profiles`].
    /// Returns `false` when the index is out of range.
    pub fn toggle_profile(&mut self, index: usize) -> bool {
        let Some(profile) = self.dataset.profiles().into_iter().nth(index) else {
            return false;
        };
        if !self.filters.selected_profiles.remove(&profile) {
            self.filters.selected_profiles.insert(profile);
        }
        true
    }

    pub fn select_all_profiles(&mut self) {
        self.filters.selected_profiles = self.dataset.profiles().into_iter().collect();
    }

    /// Move the heatmap to the next (or previous) profile, wrapping around.
    pub fn cycle_heatmap_profile(&mut self, forward: bool) {
        let profiles = self.dataset.profiles();
        if profiles.is_empty() {
            self.filters.heatmap_profile = None;
            return;
        }
        let current = self
            .filters
            .heatmap_profile
            .as_ref()
            .and_then(|p| profiles.iter().position(|q| q == p));
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % profiles.len(),
            (Some(i), false) => (i + profiles.len() - 1) % profiles.len(),
        };
        self.filters.heatmap_profile = profiles.get(next).cloned();
    }

    /// Show `profile` in the heatmap. Returns `false` for unknown profiles.
    pub fn set_heatmap_profile(&mut self, profile: &str) -> bool {
        if self.dataset.profiles().iter().any(|p| p == profile) {
            self.filters.heatmap_profile = Some(profile.to_string());
            true
        } else {
            false
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    // ── Snapshot ──────────────────────────────────────────────────────────────

    /// Recompute every aggregate for the current dataset and filters.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let events = &self.dataset.events;
        let filter = self.filters.profile_filter();

        DashboardSnapshot {
            source: self.source.describe(),
            loaded_at: self.dataset.loaded_at,
            timezone: self.tz.display_tz().name().to_string(),
            stats: self.dataset.stats,
            headline: HeadlineMetrics::compute(events, &self.dataset.billing),
            profiles: self.dataset.profiles(),
            selected_profiles: self.filters.selected_profiles.clone(),
            content_type: self.filters.content_type,
            hours_by_profile: ViewingAggregator::hours_by_profile(events),
            top_titles: ViewingAggregator::top_titles(events, self.filters.content_type, &filter),
            hours_by_weekday: ViewingAggregator::hours_by_weekday(events),
            devices: ViewingAggregator::device_usage(events, &filter),
            countries: ViewingAggregator::country_sessions(events, &self.dataset.countries, &filter),
            heatmap: self
                .filters
                .heatmap_profile
                .as_deref()
                .map(|p| ViewingAggregator::viewing_heatmap(events, p)),
            last_error: self.last_error.clone(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
