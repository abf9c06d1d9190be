use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, UtcOffset};

use crate::meals::repo::MealEntry;
use crate::oracle::MARKER_UNHEALTHY;

/// Days shown in the recency strip, and days needed to earn one freeze token.
pub const RECENT_WINDOW_DAYS: usize = 10;
pub const DAYS_PER_FREEZE_TOKEN: u32 = 10;

/// One logged calendar day with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayStatus {
    pub date: Date,
    pub healthy: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    /// Consecutive logged days ending at (and including) the reference day.
    pub current_streak: u32,
    pub healthy_days: u32,
    pub unhealthy_days: u32,
    pub total_logged_days: u32,
    /// Up to the 10 most recent logged days, oldest first.
    pub recent_days: Vec<DayStatus>,
}

impl StreakSummary {
    pub fn empty() -> Self {
        Self {
            current_streak: 0,
            healthy_days: 0,
            unhealthy_days: 0,
            total_logged_days: 0,
            recent_days: Vec::new(),
        }
    }
}

/// Group meals by local calendar day and classify each day. A day starts
/// healthy and flips iff any of its meals carries the [U] marker; unmarked or
/// empty assessments never flip it.
pub fn classify_days(meals: &[MealEntry], offset: UtcOffset) -> BTreeMap<Date, bool> {
    let mut days: BTreeMap<Date, bool> = BTreeMap::new();
    for m in meals {
        let date = m.created_at.to_offset(offset).date();
        let healthy = days.entry(date).or_insert(true);
        if m.assessment.contains(MARKER_UNHEALTHY) {
            *healthy = false;
        }
    }
    days
}

/// Full streak summary over the unfiltered meal log. `today` is the
/// caller-supplied reference day; the function never reads a clock.
pub fn summarize(meals: &[MealEntry], today: Date, offset: UtcOffset) -> StreakSummary {
    let days = classify_days(meals, offset);
    if days.is_empty() {
        return StreakSummary::empty();
    }

    // Walk back from today; the first unlogged day ends the streak. The day
    // flag does not matter here: the streak measures logging consistency.
    let mut current_streak = 0;
    let mut cursor = today;
    while days.contains_key(&cursor) {
        current_streak += 1;
        match cursor.previous_day() {
            Some(prev) => cursor = prev,
            None => break,
        }
    }

    let healthy_days = days.values().filter(|h| **h).count() as u32;
    let total_logged_days = days.len() as u32;

    let mut recent_days: Vec<DayStatus> = days
        .iter()
        .rev()
        .take(RECENT_WINDOW_DAYS)
        .map(|(date, healthy)| DayStatus {
            date: *date,
            healthy: *healthy,
        })
        .collect();
    recent_days.reverse();

    StreakSummary {
        current_streak,
        healthy_days,
        unhealthy_days: total_logged_days - healthy_days,
        total_logged_days,
        recent_days,
    }
}

/// One token is earned per ten logged days; consumed tokens come off the
/// balance, which never goes negative.
pub fn freeze_tokens_available(total_logged_days: u32, used_tokens: u32) -> u32 {
    (total_logged_days / DAYS_PER_FREEZE_TOKEN).saturating_sub(used_tokens)
}

#[cfg(test)]
mod streak_tests {
    use super::*;
    use crate::meals::repo::PortionSize;
    use time::macros::{date, datetime};
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    const TODAY: Date = date!(2026-08-25);

    fn meal(created_at: OffsetDateTime, assessment: &str) -> MealEntry {
        MealEntry {
            id: Uuid::new_v4(),
            user_key: "alice".into(),
            description: String::new(),
            portion: PortionSize::Medium,
            image_keys: vec![],
            assessment: assessment.into(),
            created_at,
        }
    }

    fn meal_days_ago(days: i64, assessment: &str) -> MealEntry {
        meal(
            datetime!(2026-08-25 10:00 UTC) - Duration::days(days),
            assessment,
        )
    }

    #[test]
    fn empty_log_yields_empty_summary() {
        let s = summarize(&[], TODAY, UtcOffset::UTC);
        assert_eq!(s, StreakSummary::empty());
    }

    #[test]
    fn gap_breaks_streak_but_not_counts() {
        // logged today, yesterday and three days ago; the day between is a gap
        let meals = vec![
            meal_days_ago(0, "Balanced. [H]"),
            meal_days_ago(1, "Balanced. [H]"),
            meal_days_ago(3, "Balanced. [H]"),
        ];
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.current_streak, 2);
        assert_eq!(s.total_logged_days, 3);
    }

    #[test]
    fn no_entry_today_means_streak_zero() {
        let meals = vec![meal_days_ago(1, "Balanced. [H]"), meal_days_ago(2, "[H]")];
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.total_logged_days, 2);
    }

    #[test]
    fn unhealthy_logged_day_still_extends_streak() {
        let meals = vec![
            meal_days_ago(0, "Deep fried everything. [U]"),
            meal_days_ago(1, "Balanced. [H]"),
        ];
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.current_streak, 2);
        assert_eq!(s.unhealthy_days, 1);
    }

    #[test]
    fn any_unhealthy_meal_flips_the_whole_day() {
        let meals = vec![
            meal_days_ago(0, "Balanced. [H]"),
            meal_days_ago(0, "High in sugar. [U]"),
        ];
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.healthy_days, 0);
        assert_eq!(s.unhealthy_days, 1);
        assert!(!s.recent_days[0].healthy);
    }

    #[test]
    fn unmarked_and_empty_assessments_stay_healthy() {
        let meals = vec![meal_days_ago(0, ""), meal_days_ago(0, "no verdict here")];
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.healthy_days, 1);
        assert_eq!(s.unhealthy_days, 0);
    }

    #[test]
    fn counts_always_sum_to_total() {
        let meals: Vec<MealEntry> = (0..15)
            .map(|i| meal_days_ago(i, if i % 3 == 0 { "[U]" } else { "[H]" }))
            .collect();
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.healthy_days + s.unhealthy_days, s.total_logged_days);
        assert_eq!(s.total_logged_days, 15);
        assert_eq!(s.current_streak, 15);
    }

    #[test]
    fn recent_window_is_capped_and_ascending() {
        let meals: Vec<MealEntry> = (0..12).map(|i| meal_days_ago(i, "[H]")).collect();
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.recent_days.len(), RECENT_WINDOW_DAYS);
        assert_eq!(s.recent_days.last().unwrap().date, TODAY);
        assert_eq!(s.recent_days.first().unwrap().date, date!(2026-08-16));
        assert!(s
            .recent_days
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));
    }

    #[test]
    fn short_history_yields_short_window() {
        let meals = vec![meal_days_ago(0, "[H]"), meal_days_ago(1, "[U]")];
        let s = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s.recent_days.len(), 2);
        assert_eq!(
            s.recent_days,
            vec![
                DayStatus {
                    date: date!(2026-08-24),
                    healthy: false
                },
                DayStatus {
                    date: TODAY,
                    healthy: true
                },
            ]
        );
    }

    #[test]
    fn removing_todays_only_entry_drops_streak_to_remaining_run() {
        let mut meals = vec![
            meal_days_ago(0, "[H]"),
            meal_days_ago(1, "[H]"),
            meal_days_ago(2, "[H]"),
        ];
        assert_eq!(summarize(&meals, TODAY, UtcOffset::UTC).current_streak, 3);
        meals.remove(0);
        // yesterday and the day before are still logged, but the run no
        // longer reaches today
        assert_eq!(summarize(&meals, TODAY, UtcOffset::UTC).current_streak, 0);
    }

    #[test]
    fn offset_shifts_day_boundaries() {
        // 23:30 UTC is already the next local day at +02:00
        let meals = vec![meal(datetime!(2026-08-24 23:30 UTC), "[H]")];
        let plus_two = UtcOffset::from_hms(2, 0, 0).unwrap();
        let s = summarize(&meals, TODAY, plus_two);
        assert_eq!(s.current_streak, 1);
        assert_eq!(s.recent_days[0].date, TODAY);

        let s_utc = summarize(&meals, TODAY, UtcOffset::UTC);
        assert_eq!(s_utc.current_streak, 0);
    }

    #[test]
    fn freeze_token_entitlement() {
        assert_eq!(freeze_tokens_available(27, 1), 1);
        assert_eq!(freeze_tokens_available(27, 0), 2);
        assert_eq!(freeze_tokens_available(9, 0), 0);
        // over-consumption clamps at zero instead of going negative
        assert_eq!(freeze_tokens_available(10, 5), 0);
        assert_eq!(freeze_tokens_available(0, 0), 0);
    }
}
