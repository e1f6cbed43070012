use crate::event_log::{EventLog, today_key};
use crate::models::{
    DetailDraft, DetailPatch, Insight, LogEntry, Profile, ProfileError, ProfileResponse, Summary,
};
use crate::stats;
use crate::storage::{LOGS_KEY, PROFILE_KEY, SETUP_DISMISSED_KEY, Storage};
use chrono::{DateTime, TimeZone};
use tracing::{info, warn};

/// Everything the user has recorded, plus the transient state of the page.
///
/// All mutations go through these methods. Derived numbers are never stored
/// here; [`Tracker::summary`] recomputes them from the current clock.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    log: EventLog,
    profile: Option<Profile>,
    draft: DetailDraft,
    setup_dismissed: bool,
    adds: u64,
}

impl Tracker {
    pub fn new(log: EventLog, profile: Option<Profile>, setup_dismissed: bool) -> Self {
        Self {
            log,
            profile,
            setup_dismissed,
            ..Self::default()
        }
    }

    /// Restores state from storage. Anything missing or unreadable starts empty.
    pub async fn load<Tz: TimeZone>(storage: &Storage, now: &DateTime<Tz>) -> Self {
        let entries: Vec<LogEntry> = storage.load(LOGS_KEY, Vec::new()).await;
        let log = EventLog::from_entries(entries);

        let profile: Option<Profile> = storage.load(PROFILE_KEY, None).await;
        let profile = profile.filter(|profile| match profile.validate(today_key(now)) {
            Ok(()) => true,
            Err(err) => {
                warn!("ignoring stored profile: {err}");
                false
            }
        });

        let setup_dismissed = storage.load_flag(SETUP_DISMISSED_KEY).await;
        info!(
            entries = log.len(),
            has_profile = profile.is_some(),
            setup_dismissed,
            "tracker state loaded"
        );

        Self::new(log, profile, setup_dismissed)
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn draft(&self) -> &DetailDraft {
        &self.draft
    }

    pub fn setup_dismissed(&self) -> bool {
        self.setup_dismissed
    }

    /// Logs one cigarette now, attaching and clearing the pending draft.
    pub fn add_one<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> LogEntry {
        let draft = std::mem::take(&mut self.draft);
        let entry = LogEntry::new(now.timestamp_millis(), draft);
        self.log.append(entry.clone());
        self.adds += 1;
        entry
    }

    /// Message for the most recent add of this session.
    pub fn impact_message(&self) -> Option<&'static str> {
        (self.adds > 0).then(|| stats::impact_message(self.adds))
    }

    pub fn remove_last_today<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Option<LogEntry> {
        self.log
            .delete_most_recent_for_day(today_key(now), &now.timezone())
    }

    pub fn delete_log(&mut self, id: &str) -> bool {
        self.log.delete_by_id(id)
    }

    /// Replaces the profile wholesale. Saving also counts as finishing setup.
    pub fn save_profile<Tz: TimeZone>(
        &mut self,
        profile: Profile,
        now: &DateTime<Tz>,
    ) -> Result<(), ProfileError> {
        profile.validate(today_key(now))?;
        self.profile = Some(profile);
        self.setup_dismissed = true;
        Ok(())
    }

    pub fn dismiss_setup(&mut self) {
        self.setup_dismissed = true;
    }

    pub fn patch_draft(&mut self, patch: DetailPatch) -> &DetailDraft {
        self.draft.apply(patch);
        &self.draft
    }

    pub fn clear_draft(&mut self) {
        self.draft = DetailDraft::default();
    }

    pub fn profile_response<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> ProfileResponse {
        ProfileResponse {
            profile: self.profile.clone(),
            years_smoked: self
                .profile
                .as_ref()
                .map(|profile| stats::years_since(profile.start_month, profile.start_year, now)),
        }
    }

    /// Dashboard view model for the instant `now`.
    pub fn summary<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Summary {
        let today = stats::today_view(&self.log, now);
        let week = stats::week_buckets(&self.log, now);
        let week_total = stats::week_total(&week);

        let lifetime = self.profile.as_ref().map(|profile| {
            stats::lifetime_view(stats::lifetime_stats(profile, self.log.total_count(), now))
        });
        let insight = (self.profile.is_some() && today.count > 3).then(|| Insight {
            today_count: today.count,
            active_day_average: stats::active_day_average(&week),
        });

        Summary {
            high_risk: stats::is_high_risk(&week),
            show_setup: self.profile.is_none() && !self.setup_dismissed,
            show_setup_prompt: self.profile.is_none() && self.setup_dismissed,
            draft: self.draft.clone(),
            today,
            week,
            week_total,
            lifetime,
            insight,
        }
    }
}
