//! Entity repositories.
//!
//! Each repository wraps a [`Collection`](crate::store::Collection) for one entity kind and adds
//! owner-scoped reads with the entity's fixed sort order:
//!
//! | Repository | `get_by_cat` order |
//! |---|---|
//! | health logs | storage order (`get_recent`: newest first) |
//! | symptoms | storage order (`get_recent`: newest first) |
//! | weights | oldest first |
//! | vet visits | newest first |
//! | prescriptions | storage order |
//! | moods | newest first |

mod chat;
mod health_logs;
mod moods;
mod prescriptions;
mod symptoms;
mod vet_visits;
mod weights;

pub use chat::*;
pub use health_logs::*;
pub use moods::*;
pub use prescriptions::*;
pub use symptoms::*;
pub use vet_visits::*;
pub use weights::*;

use crate::clock::DAY_MS;
use crate::store::{OwnedRecord, Timestamped};

/// Records owned by `cat_id`, in their existing order.
pub(crate) fn owned_by<T: OwnedRecord>(records: Vec<T>, cat_id: &str) -> Vec<T> {
    records.into_iter().filter(|r| r.cat_id() == cat_id).collect()
}

pub(crate) fn sort_newest_first<T: Timestamped>(records: &mut [T]) {
    records.sort_by_key(|r| std::cmp::Reverse(r.timestamp()));
}

pub(crate) fn sort_oldest_first<T: Timestamped>(records: &mut [T]) {
    records.sort_by_key(|r| r.timestamp());
}

/// Start of a `days`-long window ending at `now_millis`.
pub fn window_start(now_millis: i64, days: u32) -> i64 {
    now_millis - i64::from(days) * DAY_MS
}

/// Records owned by `cat_id` inside the window, newest first.
pub(crate) fn recent<T: OwnedRecord + Timestamped>(
    records: Vec<T>,
    cat_id: &str,
    days: u32,
    now_millis: i64,
) -> Vec<T> {
    let start = window_start(now_millis, days);
    let mut recent: Vec<T> = records
        .into_iter()
        .filter(|r| r.cat_id() == cat_id && r.timestamp() >= start)
        .collect();
    sort_newest_first(&mut recent);
    recent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_start() {
        assert_eq!(window_start(10 * DAY_MS, 7), 3 * DAY_MS);
        assert_eq!(window_start(0, 0), 0);
    }
}
