//! Aggregate statistics: totals, day streaks and achievements.
//!
//! Only completed sessions count. Stats are updated incrementally as each
//! completed session is saved, and can be rebuilt from the full session
//! history when the stored aggregate is missing or suspect.

use std::collections::BTreeSet;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::database::SessionRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Achievement {
    #[serde(rename = "first_session")]
    FirstSession,
    #[serde(rename = "sessions_10")]
    Sessions10,
    #[serde(rename = "sessions_50")]
    Sessions50,
    #[serde(rename = "sessions_100")]
    Sessions100,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_30")]
    Streak30,
    #[serde(rename = "hour_total")]
    HourTotal,
}

impl Achievement {
    pub const ALL: [Achievement; 8] = [
        Achievement::FirstSession,
        Achievement::Sessions10,
        Achievement::Sessions50,
        Achievement::Sessions100,
        Achievement::Streak3,
        Achievement::Streak7,
        Achievement::Streak30,
        Achievement::HourTotal,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Achievement::FirstSession => "First session",
            Achievement::Sessions10 => "10 sessions",
            Achievement::Sessions50 => "50 sessions",
            Achievement::Sessions100 => "100 sessions",
            Achievement::Streak3 => "3-day streak",
            Achievement::Streak7 => "7-day streak",
            Achievement::Streak30 => "30-day streak",
            Achievement::HourTotal => "One hour of training",
        }
    }

    fn is_earned(self, stats: &Stats) -> bool {
        match self {
            Achievement::FirstSession => stats.total_sessions >= 1,
            Achievement::Sessions10 => stats.total_sessions >= 10,
            Achievement::Sessions50 => stats.total_sessions >= 50,
            Achievement::Sessions100 => stats.total_sessions >= 100,
            Achievement::Streak3 => stats.max_streak >= 3,
            Achievement::Streak7 => stats.max_streak >= 7,
            Achievement::Streak30 => stats.max_streak >= 30,
            Achievement::HourTotal => stats.total_duration_secs >= 3_600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_duration_secs: u64,
    pub current_streak: u32,
    pub max_streak: u32,
    #[serde(default)]
    pub last_session_date: Option<NaiveDate>,
    #[serde(default)]
    pub achievements: BTreeSet<Achievement>,
}

impl Stats {
    /// Fold one completed session into the aggregate.
    ///
    /// Returns the achievements this session unlocked.
    pub fn record_completed(&mut self, duration_secs: u64, day: NaiveDate) -> Vec<Achievement> {
        self.total_sessions += 1;
        self.total_duration_secs += duration_secs;

        match self.last_session_date {
            Some(last) if day <= last => {}
            Some(last) if last.succ_opt() == Some(day) => {
                self.current_streak += 1;
                self.last_session_date = Some(day);
            }
            _ => {
                self.current_streak = 1;
                self.last_session_date = Some(day);
            }
        }
        self.max_streak = self.max_streak.max(self.current_streak);

        let unlocked: Vec<Achievement> = Achievement::ALL
            .into_iter()
            .filter(|a| !self.achievements.contains(a) && a.is_earned(self))
            .collect();
        self.achievements.extend(unlocked.iter().copied());
        unlocked
    }

    /// Rebuild the aggregate from the full session history.
    pub fn from_history(records: &[SessionRecord]) -> Self {
        let mut completed: Vec<&SessionRecord> = records.iter().filter(|r| r.completed).collect();
        completed.sort_by_key(|r| r.date);

        let mut stats = Stats::default();
        for record in completed {
            stats.record_completed(record.duration_secs, local_day(record.date));
        }
        stats
    }

    /// The streak as seen on `today`: it lapses once a whole calendar day
    /// passes without a completed session.
    pub fn effective_current_streak(&self, today: NaiveDate) -> u32 {
        match self.last_session_date {
            Some(last) if last == today || last.succ_opt() == Some(today) => self.current_streak,
            _ => 0,
        }
    }
}

/// Calendar day of `at` in the local time zone.
pub fn local_day(at: DateTime<Utc>) -> NaiveDate {
    at.with_timezone(&Local).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn consecutive_days_extend_streak() {
        let mut stats = Stats::default();
        stats.record_completed(240, day(1));
        stats.record_completed(240, day(2));
        stats.record_completed(240, day(2));
        stats.record_completed(240, day(3));
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.max_streak, 3);
        assert_eq!(stats.total_sessions, 4);
        assert_eq!(stats.total_duration_secs, 960);
    }

    #[test]
    fn gap_resets_current_but_not_max() {
        let mut stats = Stats::default();
        stats.record_completed(60, day(1));
        stats.record_completed(60, day(2));
        stats.record_completed(60, day(5));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.max_streak, 2);
        assert_eq!(stats.last_session_date, Some(day(5)));
    }

    #[test]
    fn unlocks_are_reported_once() {
        let mut stats = Stats::default();
        let first = stats.record_completed(3_600, day(1));
        assert_eq!(first, vec![Achievement::FirstSession, Achievement::HourTotal]);
        let second = stats.record_completed(60, day(2));
        assert!(second.is_empty());
        let third = stats.record_completed(60, day(3));
        assert_eq!(third, vec![Achievement::Streak3]);
    }

    #[test]
    fn effective_streak_lapses_after_missed_day() {
        let mut stats = Stats::default();
        stats.record_completed(60, day(1));
        stats.record_completed(60, day(2));
        assert_eq!(stats.effective_current_streak(day(2)), 2);
        assert_eq!(stats.effective_current_streak(day(3)), 2);
        assert_eq!(stats.effective_current_streak(day(4)), 0);
    }

    #[test]
    fn achievements_serialize_as_snake_case_ids() {
        let json = serde_json::to_string(&Achievement::Streak7).unwrap();
        assert_eq!(json, "\"streak_7\"");
    }
}
