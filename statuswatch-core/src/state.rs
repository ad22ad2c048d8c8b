use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::history::StatusHistory;
use crate::model::{ServiceId, ServiceStatus};
use crate::notify::{StatusChange, TransitionTracker};

/// Number of notifications kept for the banner
const MAX_NOTIFICATIONS: usize = 50;

pub type SharedState = Arc<RwLock<DashboardState>>;

#[derive(Clone, Debug)]
pub struct Notification {
    pub at: DateTime<Utc>,
    pub change: StatusChange,
}

/// Everything the dashboard renders, mutated only by the reducer.
#[derive(Debug)]
pub struct DashboardState {
    /// Configured slugs in display order
    pub catalog: Vec<ServiceId>,
    /// Latest snapshot per service, kept in catalog order
    pub services: Vec<ServiceStatus>,
    /// Services with a poll in flight
    pub loading: BTreeSet<ServiceId>,
    pub history: StatusHistory,
    pub tracker: TransitionTracker,
    /// Most recent first
    pub notifications: VecDeque<Notification>,
    pub notifications_enabled: bool,
    pub last_event_id: u64,
    pub last_update: Option<DateTime<Utc>>,
}

impl DashboardState {
    pub fn new(catalog: Vec<ServiceId>, history: StatusHistory) -> Self {
        Self {
            catalog,
            services: Vec::new(),
            loading: BTreeSet::new(),
            history,
            tracker: TransitionTracker::new(),
            notifications: VecDeque::new(),
            notifications_enabled: true,
            last_event_id: 0,
            last_update: None,
        }
    }

    pub fn shared(self) -> SharedState {
        Arc::new(RwLock::new(self))
    }

    pub fn service(&self, slug: &str) -> Option<&ServiceStatus> {
        self.services.iter().find(|s| s.service_name == slug)
    }

    pub fn is_loading(&self, slug: &str) -> bool {
        self.loading.contains(slug)
    }

    /// True until every catalog service has reported once.
    pub fn is_initial_load(&self) -> bool {
        self.catalog.iter().any(|slug| self.service(slug).is_none())
    }

    /// Replace the snapshot of one service wholesale. Services outside the
    /// catalog are appended after it.
    pub fn upsert(&mut self, snapshot: ServiceStatus) {
        match self
            .services
            .iter_mut()
            .find(|s| s.service_name == snapshot.service_name)
        {
            Some(existing) => *existing = snapshot,
            None => {
                self.services.push(snapshot);
                let catalog = &self.catalog;
                self.services.sort_by_key(|s| {
                    catalog
                        .iter()
                        .position(|slug| *slug == s.service_name)
                        .unwrap_or(usize::MAX)
                });
            }
        }
    }

    pub fn push_notification(&mut self, notification: Notification) {
        self.notifications.push_front(notification);
        self.notifications.truncate(MAX_NOTIFICATIONS);
    }

    pub fn latest_notification(&self) -> Option<&Notification> {
        self.notifications.front()
    }
}
