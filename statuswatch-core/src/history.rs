//! Append-only log of aggregated service statuses and the uptime statistics
//! derived from it.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::model::{ServiceId, ServiceStatus};
use crate::status::StatusType;

pub const DEFAULT_MAX_ENTRIES: usize = 1000;
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("history file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusHistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub service_name: ServiceId,
    pub status: StatusType,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AvailabilityStats {
    /// Percent of the observed time spent operational, 2 decimals
    pub uptime: f64,
    pub downtime: f64,
    /// Intervals spent in a partial or major outage
    pub incidents: usize,
    pub last_incident: Option<DateTime<Utc>>,
}

impl AvailabilityStats {
    fn no_data() -> Self {
        Self {
            uptime: 100.0,
            downtime: 0.0,
            incidents: 0,
            last_incident: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PeriodStats {
    pub day: AvailabilityStats,
    pub week: AvailabilityStats,
    pub month: AvailabilityStats,
}

#[derive(Clone, Debug)]
pub struct StatusHistory {
    pub max_entries: usize,
    pub retention: Duration,
    entries: Vec<StatusHistoryEntry>,
}

impl Default for StatusHistory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_RETENTION_DAYS)
    }
}

impl StatusHistory {
    pub fn new(max_entries: usize, retention_days: i64) -> Self {
        Self {
            max_entries,
            retention: Duration::days(retention_days),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[StatusHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append one entry per service, stamped `now`. Consecutive identical
    /// statuses are kept; interval lengths come from the timestamps.
    pub fn record(&mut self, services: &[ServiceStatus], now: DateTime<Utc>) {
        self.entries
            .extend(services.iter().map(|service| StatusHistoryEntry {
                timestamp: now,
                service_name: service.service_name.clone(),
                status: service.overall_status(),
            }));
        self.prune(now);
    }

    pub fn push(&mut self, entry: StatusHistoryEntry, now: DateTime<Utc>) {
        self.entries.push(entry);
        self.prune(now);
    }

    /// Drop entries older than the retention window, then keep the newest
    /// `max_entries`.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = now - self.retention;
        self.entries.retain(|e| e.timestamp >= cutoff);
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }
    }

    pub fn services(&self) -> Vec<ServiceId> {
        let mut names: Vec<ServiceId> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.service_name) {
                names.push(entry.service_name.clone());
            }
        }
        names
    }

    /// Availability of one service over the `period` ending at `now`.
    ///
    /// Each entry opens an interval that lasts until the next entry of the
    /// same service; the last one runs until `now`. Only operational time
    /// counts as uptime.
    pub fn availability(
        &self,
        service: &str,
        period: Duration,
        now: DateTime<Utc>,
    ) -> AvailabilityStats {
        let cutoff = now - period;
        let points: Vec<&StatusHistoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.service_name == service && e.timestamp >= cutoff)
            .collect();

        if points.is_empty() {
            return AvailabilityStats::no_data();
        }

        let mut operational_ms: i64 = 0;
        let mut down_ms: i64 = 0;
        let mut incidents = 0;
        let mut last_incident: Option<DateTime<Utc>> = None;

        for (i, entry) in points.iter().enumerate() {
            let end = points.get(i + 1).map(|next| next.timestamp).unwrap_or(now);
            let duration = (end - entry.timestamp).num_milliseconds().max(0);

            if entry.status == StatusType::Operational {
                operational_ms += duration;
            } else {
                down_ms += duration;
                if entry.status.is_outage() {
                    incidents += 1;
                    if last_incident.is_none_or(|t| entry.timestamp > t) {
                        last_incident = Some(entry.timestamp);
                    }
                }
            }
        }

        let total = operational_ms + down_ms;
        let (uptime, downtime) = if total > 0 {
            (
                operational_ms as f64 / total as f64 * 100.0,
                down_ms as f64 / total as f64 * 100.0,
            )
        } else {
            (100.0, 0.0)
        };

        AvailabilityStats {
            uptime: round2(uptime),
            downtime: round2(downtime),
            incidents,
            last_incident,
        }
    }

    pub fn period_stats(&self, service: &str, now: DateTime<Utc>) -> PeriodStats {
        PeriodStats {
            day: self.availability(service, Duration::hours(24), now),
            week: self.availability(service, Duration::days(7), now),
            month: self.availability(service, Duration::days(30), now),
        }
    }

    /// Load a history file, applying retention. A missing file is an empty
    /// history.
    pub fn load(
        path: &Path,
        max_entries: usize,
        retention_days: i64,
        now: DateTime<Utc>,
    ) -> Result<Self, HistoryError> {
        let mut history = Self::new(max_entries, retention_days);
        if !path.exists() {
            return Ok(history);
        }
        let content = std::fs::read_to_string(path)?;
        history.entries = serde_json::from_str(&content)?;
        history.entries.sort_by_key(|e| e.timestamp);
        history.prune(now);
        debug!(path = %path.display(), entries = history.entries.len(), "loaded status history");
        Ok(history)
    }

    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string(&self.entries)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
