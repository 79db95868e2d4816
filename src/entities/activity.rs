use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The feed keeps only the latest entries, like the dashboard widget it
/// backs.
pub const ACTIVITY_LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub title: String,
    pub description: String,
    /// Icon tag the dashboard renders, e.g. "fas fa-bus".
    pub icon: String,
    pub time: DateTime<Utc>,
}

impl ActivityEntry {
    pub fn new(title: &str, description: String, icon: &str) -> Self {
        Self {
            title: title.to_string(),
            description,
            icon: icon.to_string(),
            time: Utc::now(),
        }
    }
}

/// Newest-first feed capped at [`ACTIVITY_LOG_CAPACITY`] entries.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub fn push(&mut self, entry: ActivityEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(ACTIVITY_LOG_CAPACITY);
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }
}
