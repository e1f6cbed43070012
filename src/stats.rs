use crate::event_log::{EventLog, day_key, today_key, trailing_days};
use crate::format::{group_digits, round_half_up};
use crate::models::{
    HistoryDay, HistoryItem, LifetimeStats, LifetimeView, Profile, TodayResponse, WeekBucket,
};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Minutes of life lost per cigarette (NHS estimate).
pub const MINUTES_PER_CIGARETTE: f64 = 11.0;
const MINUTES_PER_DAY: f64 = 24.0 * 60.0;
const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Daily count at which the progress ring is full.
pub const DAILY_RING_TARGET: u64 = 20;
const HIGH_RISK_DAILY_AVERAGE: f64 = 15.0;

const IMPACT_MESSAGES: [&str; 5] = [
    "That's 11 minutes affected",
    "11 minutes you won't get back",
    "Your body needs 11 minutes to recover",
    "Each one takes 11 minutes from your life",
    "11 minutes less with the people you love",
];

pub fn today_total<Tz: TimeZone>(log: &EventLog, now: &DateTime<Tz>) -> u64 {
    let tz = now.timezone();
    log.on_day(today_key(now), &tz)
        .map(|entry| u64::from(entry.count))
        .sum()
}

pub fn last_log_timestamp<Tz: TimeZone>(log: &EventLog, now: &DateTime<Tz>) -> Option<i64> {
    let tz = now.timezone();
    log.on_day(today_key(now), &tz)
        .map(|entry| entry.timestamp)
        .max()
}

pub fn today_view<Tz: TimeZone>(log: &EventLog, now: &DateTime<Tz>) -> TodayResponse {
    let count = today_total(log, now);
    let last_log_at = last_log_timestamp(log, now);
    let tz = now.timezone();
    let last_log_time = last_log_at.map(|timestamp| local_time(timestamp, &tz));

    TodayResponse {
        date: today_key(now).to_string(),
        count,
        last_log_at,
        last_log_time,
        progress: ring_progress(count),
    }
}

fn local_time<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|utc| utc.with_timezone(tz).naive_local().format("%H:%M").to_string())
        .unwrap_or_default()
}

pub fn ring_progress(count: u64) -> f64 {
    (count as f64 / DAILY_RING_TARGET as f64).min(1.0)
}

/// Per-day totals for today and the six days before it, oldest first.
pub fn week_buckets<Tz: TimeZone>(log: &EventLog, now: &DateTime<Tz>) -> Vec<WeekBucket> {
    let tz = now.timezone();
    let today = today_key(now);

    trailing_days(today)
        .into_iter()
        .map(|day| WeekBucket {
            date: day.to_string(),
            label: day.format("%a").to_string(),
            count: log.on_day(day, &tz).map(|entry| u64::from(entry.count)).sum(),
            is_today: day == today,
        })
        .collect()
}

pub fn week_total(buckets: &[WeekBucket]) -> u64 {
    buckets.iter().map(|bucket| bucket.count).sum()
}

/// Week total spread over the days that have any entries.
pub fn active_day_average(buckets: &[WeekBucket]) -> u64 {
    let active = buckets.iter().filter(|bucket| bucket.count > 0).count().max(1);
    round_half_up(week_total(buckets) as f64 / active as f64) as u64
}

pub fn is_high_risk(buckets: &[WeekBucket]) -> bool {
    let total = week_total(buckets);
    total > 0 && total as f64 / 7.0 > HIGH_RISK_DAILY_AVERAGE
}

/// Whole days since local midnight on the first of the profile's start month,
/// never negative.
pub fn elapsed_days<Tz: TimeZone>(profile: &Profile, now: &DateTime<Tz>) -> i64 {
    let Some(start) = start_of_month_ms(profile.start_year, profile.start_month, &now.timezone())
    else {
        return 0;
    };
    (now.timestamp_millis() - start).div_euclid(MS_PER_DAY).max(0)
}

fn start_of_month_ms<Tz: TimeZone>(year: i32, month: u32, tz: &Tz) -> Option<i64> {
    let midnight = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    let millis = tz
        .from_local_datetime(&midnight)
        .earliest()
        .map(|start| start.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis());
    Some(millis)
}

/// Projects lifetime totals from the profile's background rate plus
/// everything logged. Logged entries are added on top of the projection,
/// not subtracted from it.
pub fn lifetime_stats<Tz: TimeZone>(
    profile: &Profile,
    total_logged: u64,
    now: &DateTime<Tz>,
) -> LifetimeStats {
    let total = elapsed_days(profile, now) as f64 * profile.avg_per_day + total_logged as f64;

    LifetimeStats {
        total_cigarettes: total,
        life_days_affected: round_half_up(total * MINUTES_PER_CIGARETTE / MINUTES_PER_DAY) as u64,
        total_spend: total * profile.cost_per_cig,
        total_packs: round_half_up(total / f64::from(profile.per_pack)) as u64,
    }
}

pub fn lifetime_view(stats: LifetimeStats) -> LifetimeView {
    LifetimeView {
        life_days_display: group_digits(stats.life_days_affected as f64),
        total_cigarettes_display: group_digits(stats.total_cigarettes),
        total_spend_display: group_digits(stats.total_spend),
        total_packs_display: group_digits(stats.total_packs as f64),
        stats,
    }
}

/// Years between the start month and the current month, to one decimal.
pub fn years_since<Tz: TimeZone>(start_month: u32, start_year: i32, now: &DateTime<Tz>) -> f64 {
    let months = (now.year() - start_year) * 12 + now.month() as i32 - start_month as i32;
    (f64::from(months.max(0)) / 12.0 * 10.0).round() / 10.0
}

/// Message shown after the `nth` add of the session.
pub fn impact_message(nth: u64) -> &'static str {
    IMPACT_MESSAGES[(nth % IMPACT_MESSAGES.len() as u64) as usize]
}

/// Entries grouped by local date, newest day first and newest entry first.
pub fn history<Tz: TimeZone>(log: &EventLog, tz: &Tz) -> Vec<HistoryDay> {
    let mut days: Vec<(NaiveDate, HistoryDay)> = Vec::new();

    for entry in log.entries().iter().rev() {
        let Some(day) = day_key(entry.timestamp, tz) else {
            continue;
        };
        let item = HistoryItem {
            id: entry.id.clone(),
            timestamp: entry.timestamp,
            time: local_time(entry.timestamp, tz),
            count: entry.count,
            details: entry.detail_line(),
            notes: entry.notes.clone(),
        };

        match days.iter_mut().find(|(key, _)| *key == day) {
            Some((_, group)) => group.entries.push(item),
            None => days.push((
                day,
                HistoryDay {
                    date: day.format("%-d %b %Y").to_string(),
                    entries: vec![item],
                },
            )),
        }
    }

    days.into_iter().map(|(_, group)| group).collect()
}
