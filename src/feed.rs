use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ts_rs::TS;
use utoipa::ToSchema;

use crate::models::{NoticeView, Role};

/// DayBucket
///
/// One tab of the day feed: a calendar day and the notices posted on it,
/// already ordered for display. Days with no notices still get a bucket so
/// the client can render the full tab strip.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DayBucket {
    #[ts(type = "string")]
    pub day: NaiveDate,
    pub notices: Vec<NoticeView>,
}

/// build_feed
///
/// Organizes notices into the rolling day-tab feed:
/// - one bucket per calendar day over the last `window_days` days (today
///   included), ascending so the rightmost tab is today;
/// - notices dated outside the window are dropped;
/// - within a day, admin-authored notices come first, then everything else,
///   ties broken most-recent-first.
///
/// Bucketing uses the notice's UTC calendar day, matching the server-assigned
/// timestamps. Pure function; the caller supplies `today` so the window is
/// deterministic under test.
pub fn build_feed(notices: Vec<NoticeView>, today: NaiveDate, window_days: u32) -> Vec<DayBucket> {
    let oldest = today
        .checked_sub_days(Days::new(u64::from(window_days.saturating_sub(1))))
        .unwrap_or(today);

    let mut by_day: HashMap<NaiveDate, Vec<NoticeView>> = HashMap::new();
    for notice in notices {
        let day = notice.date.date_naive();
        if day < oldest || day > today {
            continue;
        }
        by_day.entry(day).or_default().push(notice);
    }

    let mut feed = Vec::with_capacity(window_days as usize);
    let mut day = oldest;
    while day <= today {
        let mut bucket = by_day.remove(&day).unwrap_or_default();
        bucket.sort_by(|a, b| {
            display_rank(a)
                .cmp(&display_rank(b))
                .then_with(|| b.date.cmp(&a.date))
        });
        feed.push(DayBucket {
            day,
            notices: bucket,
        });
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    feed
}

// Admin posts rank ahead of everything else, unattributed posts included.
fn display_rank(notice: &NoticeView) -> u8 {
    match notice.poster_role {
        Some(Role::Admin) => 0,
        Some(Role::Teacher) | Some(Role::Student) | None => 1,
    }
}
