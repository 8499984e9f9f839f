// Refresh Scheduler - Per-record refresh times with jitter

use crate::db::models::CertificateRecord;
use crate::monitor::config::{MAX_INTERVAL_SECONDS, MAX_JITTER_PERCENT};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::collections::{HashMap, HashSet};

/// Decides which records are due for a refresh
pub struct RefreshScheduler {
    next_refresh_times: HashMap<i64, DateTime<Utc>>,
    interval_seconds: u64,
    jitter_percent: u8,
}

impl RefreshScheduler {
    /// Create new scheduler with ±10% jitter
    pub fn new(interval_seconds: u64) -> Self {
        Self {
            next_refresh_times: HashMap::new(),
            interval_seconds,
            jitter_percent: 10,
        }
    }

    /// Create with custom jitter percentage
    pub fn with_jitter(mut self, jitter_percent: u8) -> Self {
        self.jitter_percent = jitter_percent.min(MAX_JITTER_PERCENT);
        self
    }

    /// Records due now; each one returned is scheduled again
    ///
    /// Records never seen before are due immediately.
    pub fn due_records<'a>(&mut self, records: &'a [CertificateRecord]) -> Vec<&'a CertificateRecord> {
        let now = Utc::now();
        let mut due = Vec::new();

        for record in records {
            let is_due = match self.next_refresh_times.get(&record.id) {
                Some(next_refresh) => now >= *next_refresh,
                None => true,
            };

            if is_due {
                due.push(record);
                self.schedule_next(record.id);
            }
        }

        due
    }

    /// Schedule the next refresh of `id` one jittered interval from now
    ///
    /// Intervals beyond `MAX_INTERVAL_SECONDS` are clamped, and a time past
    /// the end of the calendar saturates instead of overflowing.
    pub fn schedule_next(&mut self, id: i64) {
        let seconds = self.interval_seconds.min(MAX_INTERVAL_SECONDS) as i64;
        let interval = self.add_jitter(Duration::try_seconds(seconds).unwrap_or(Duration::MAX));
        let next = Utc::now()
            .checked_add_signed(interval)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        self.next_refresh_times.insert(id, next);
    }

    /// Make `id` due on the next tick
    pub fn schedule_immediate(&mut self, id: i64) {
        self.next_refresh_times.insert(id, Utc::now());
    }

    /// Add random variation of ±jitter_percent to the duration
    fn add_jitter(&self, duration: Duration) -> Duration {
        let seconds = duration.num_seconds();
        let jitter_range = seconds.saturating_mul(self.jitter_percent as i64) / 100;

        if jitter_range == 0 {
            return duration;
        }

        let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
        Duration::try_seconds(seconds.saturating_add(jitter)).unwrap_or(duration)
    }

    pub fn next_refresh_time(&self, id: i64) -> Option<DateTime<Utc>> {
        self.next_refresh_times.get(&id).copied()
    }

    /// Drop the schedule of a removed record
    pub fn forget(&mut self, id: i64) {
        self.next_refresh_times.remove(&id);
    }

    /// Drop schedules for every id not in `records`
    pub fn retain_records(&mut self, records: &[CertificateRecord]) {
        let live: HashSet<i64> = records.iter().map(|r| r.id).collect();
        self.next_refresh_times.retain(|id, _| live.contains(id));
    }

    pub fn scheduled_count(&self) -> usize {
        self.next_refresh_times.len()
    }
}
