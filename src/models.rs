use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// One recorded cigarette, with whatever details were pending when it was logged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LogEntry {
    pub fn new(timestamp: i64, draft: DetailDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            count: 1,
            location: draft.location,
            trigger: draft.trigger,
            mood: draft.mood,
            notes: draft.notes,
        }
    }

    /// Location, trigger and mood joined for compact display.
    pub fn detail_line(&self) -> String {
        [&self.location, &self.trigger, &self.mood]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" • ")
    }
}

/// Historical smoking habits used to project lifetime totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub start_month: u32,
    pub start_year: i32,
    pub avg_per_day: f64,
    pub per_pack: u32,
    pub cost_per_cig: f64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("start month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("start year {0} is out of range")]
    InvalidYear(i32),
    #[error("start date cannot be in the future")]
    StartInFuture,
    #[error("average per day must be between 0 and {}", Profile::MAX_AVG_PER_DAY)]
    InvalidAverage,
    #[error("pack size must be at least 1")]
    ZeroPackSize,
    #[error("cost per cigarette must be above 0 and at most {}", Profile::MAX_COST_PER_CIG)]
    InvalidCost,
}

impl Profile {
    const MIN_START_YEAR: i32 = 1900;
    pub const MAX_AVG_PER_DAY: f64 = 200.0;
    pub const MAX_COST_PER_CIG: f64 = 100_000.0;

    pub fn validate(&self, today: NaiveDate) -> Result<(), ProfileError> {
        if !(1..=12).contains(&self.start_month) {
            return Err(ProfileError::InvalidMonth(self.start_month));
        }
        if self.start_year < Self::MIN_START_YEAR || self.start_year > today.year() {
            return Err(ProfileError::InvalidYear(self.start_year));
        }
        if (self.start_year, self.start_month) > (today.year(), today.month()) {
            return Err(ProfileError::StartInFuture);
        }
        if !(0.0..=Self::MAX_AVG_PER_DAY).contains(&self.avg_per_day) {
            return Err(ProfileError::InvalidAverage);
        }
        if self.per_pack == 0 {
            return Err(ProfileError::ZeroPackSize);
        }
        if !(self.cost_per_cig > 0.0 && self.cost_per_cig <= Self::MAX_COST_PER_CIG) {
            return Err(ProfileError::InvalidCost);
        }
        Ok(())
    }
}

/// Details waiting to be attached to the next logged entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailDraft {
    pub location: Option<String>,
    pub trigger: Option<String>,
    pub mood: Option<String>,
    pub notes: Option<String>,
}

/// Partial update to a [`DetailDraft`].
///
/// Each field is tri-state: missing leaves the draft field alone, `null`
/// clears it, and a string sets it. Blank strings clear as well.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailPatch {
    #[serde(default, deserialize_with = "present")]
    pub location: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub trigger: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub mood: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl DetailDraft {
    pub fn apply(&mut self, patch: DetailPatch) {
        merge_field(&mut self.location, patch.location);
        merge_field(&mut self.trigger, patch.trigger);
        merge_field(&mut self.mood, patch.mood);
        merge_field(&mut self.notes, patch.notes);
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_none() && self.trigger.is_none() && self.mood.is_none() && self.notes.is_none()
    }
}

fn merge_field(slot: &mut Option<String>, update: Option<Option<String>>) {
    if let Some(value) = update {
        *slot = value.filter(|v| !v.trim().is_empty());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LifetimeStats {
    pub total_cigarettes: f64,
    pub life_days_affected: u64,
    pub total_spend: f64,
    pub total_packs: u64,
}

/// Lifetime stats alongside their display strings.
#[derive(Debug, Serialize)]
pub struct LifetimeView {
    #[serde(flatten)]
    pub stats: LifetimeStats,
    pub life_days_display: String,
    pub total_cigarettes_display: String,
    pub total_spend_display: String,
    pub total_packs_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekBucket {
    pub date: String,
    pub label: String,
    pub count: u64,
    pub is_today: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodayResponse {
    pub date: String,
    pub count: u64,
    pub last_log_at: Option<i64>,
    pub last_log_time: Option<String>,
    pub progress: f64,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: String,
    pub timestamp: i64,
    pub time: String,
    pub count: u32,
    pub details: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub entries: Vec<HistoryItem>,
}

#[derive(Debug, Serialize)]
pub struct Insight {
    pub today_count: u64,
    pub active_day_average: u64,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub today: TodayResponse,
    pub week: Vec<WeekBucket>,
    pub week_total: u64,
    pub lifetime: Option<LifetimeView>,
    pub insight: Option<Insight>,
    pub high_risk: bool,
    pub show_setup: bool,
    pub show_setup_prompt: bool,
    pub draft: DetailDraft,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub entry: LogEntry,
    pub message: String,
    pub today: TodayResponse,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub removed: Option<LogEntry>,
    pub today: TodayResponse,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Option<Profile>,
    pub years_smoked: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            start_month: 1,
            start_year: 2020,
            avg_per_day: 10.0,
            per_pack: 20,
            cost_per_cig: 16.0,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn valid_profile_passes() {
        assert_eq!(profile().validate(today()), Ok(()));
    }

    #[test]
    fn profile_rejects_bad_inputs() {
        let cases = [
            (Profile { start_month: 13, ..profile() }, ProfileError::InvalidMonth(13)),
            (Profile { start_month: 0, ..profile() }, ProfileError::InvalidMonth(0)),
            (Profile { start_year: 1850, ..profile() }, ProfileError::InvalidYear(1850)),
            (Profile { start_year: 2027, ..profile() }, ProfileError::InvalidYear(2027)),
            (
                Profile { start_year: 2026, start_month: 4, ..profile() },
                ProfileError::StartInFuture,
            ),
            (Profile { avg_per_day: -1.0, ..profile() }, ProfileError::InvalidAverage),
            (Profile { avg_per_day: f64::NAN, ..profile() }, ProfileError::InvalidAverage),
            (Profile { per_pack: 0, ..profile() }, ProfileError::ZeroPackSize),
            (Profile { cost_per_cig: 0.0, ..profile() }, ProfileError::InvalidCost),
        ];
        for (candidate, expected) in cases {
            assert_eq!(candidate.validate(today()), Err(expected));
        }
    }

    #[test]
    fn profile_rejects_amounts_too_large_to_display() {
        let cases = [
            (Profile { avg_per_day: 1e300, ..profile() }, ProfileError::InvalidAverage),
            (Profile { avg_per_day: f64::INFINITY, ..profile() }, ProfileError::InvalidAverage),
            (Profile { avg_per_day: 200.5, ..profile() }, ProfileError::InvalidAverage),
            (Profile { cost_per_cig: 1e18, ..profile() }, ProfileError::InvalidCost),
            (Profile { cost_per_cig: f64::NAN, ..profile() }, ProfileError::InvalidCost),
        ];
        for (candidate, expected) in cases {
            assert_eq!(candidate.validate(today()), Err(expected));
        }
    }

    #[test]
    fn profile_accepts_upper_bounds() {
        let candidate = Profile {
            start_year: 1900,
            avg_per_day: Profile::MAX_AVG_PER_DAY,
            cost_per_cig: Profile::MAX_COST_PER_CIG,
            ..profile()
        };
        assert_eq!(candidate.validate(today()), Ok(()));
    }

    #[test]
    fn profile_uses_camel_case_on_disk() {
        let json = serde_json::to_value(profile()).unwrap();
        assert_eq!(json["startMonth"], 1);
        assert_eq!(json["avgPerDay"], 10.0);
        assert_eq!(json["costPerCig"], 16.0);
    }

    #[test]
    fn entry_omits_missing_details() {
        let entry = LogEntry::new(1_000, DetailDraft::default());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["count"], 1);
        assert!(json.get("location").is_none());
        assert!(json.get("notes").is_none());
    }

    #[test]
    fn entry_ids_are_unique() {
        let a = LogEntry::new(1, DetailDraft::default());
        let b = LogEntry::new(1, DetailDraft::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn patch_sets_clears_and_leaves_fields() {
        let mut draft = DetailDraft {
            location: Some("Home".into()),
            trigger: Some("Stress".into()),
            ..DetailDraft::default()
        };
        let patch: DetailPatch =
            serde_json::from_str(r#"{"trigger": null, "mood": "😐", "notes": "  "}"#).unwrap();
        draft.apply(patch);

        assert_eq!(draft.location.as_deref(), Some("Home"));
        assert_eq!(draft.trigger, None);
        assert_eq!(draft.mood.as_deref(), Some("😐"));
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn detail_line_skips_missing_fields() {
        let draft = DetailDraft {
            location: Some("Work".into()),
            mood: Some("😔".into()),
            ..DetailDraft::default()
        };
        let entry = LogEntry::new(0, draft);
        assert_eq!(entry.detail_line(), "Work • 😔");
    }
}
