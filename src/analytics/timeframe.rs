use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::meals::repo::MealEntry;

/// Trailing display window applied to a meal list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Timeframe {
    Day,
    Week,
    Month,
    #[default]
    All,
}

impl Timeframe {
    pub fn window(self) -> Option<Duration> {
        match self {
            Timeframe::Day => Some(Duration::days(1)),
            Timeframe::Week => Some(Duration::days(7)),
            Timeframe::Month => Some(Duration::days(30)),
            Timeframe::All => None,
        }
    }
}

/// Entries younger than the window, input order preserved. Ages exactly at
/// the boundary are excluded.
pub fn filter_by_timeframe(
    meals: &[MealEntry],
    timeframe: Timeframe,
    now: OffsetDateTime,
) -> Vec<&MealEntry> {
    match timeframe.window() {
        Some(window) => meals.iter().filter(|m| now - m.created_at < window).collect(),
        None => meals.iter().collect(),
    }
}
