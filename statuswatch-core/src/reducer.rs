use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::history::StatusHistoryEntry;
use crate::model::{ServiceId, ServiceStatus};
use crate::notify::NotificationKind;
use crate::state::{DashboardState, Notification};

#[derive(Clone, Debug)]
pub enum DashboardEvent {
    PollStarted {
        service: ServiceId,
    },
    PollCompleted {
        snapshot: ServiceStatus,
    },
    NotificationsToggled {
        enabled: bool,
    },
}

#[derive(Clone, Debug)]
pub struct EventEnvelope {
    pub id: u64,
    pub at: DateTime<Utc>,
    pub event: DashboardEvent,
}

/// Apply one event. A completed poll replaces the service snapshot, clears
/// its loading flag, appends to history and checks for a notable transition,
/// all under the same borrow so readers never see a half-applied poll.
///
/// Placeholder snapshots are recorded as UNKNOWN so an unreachable spell
/// counts as downtime. They are not fed to the transition tracker, which keeps
/// the last real status as its baseline.
pub fn reduce(state: &mut DashboardState, env: &EventEnvelope) {
    state.last_event_id = env.id;

    match &env.event {
        DashboardEvent::PollStarted { service } => {
            state.loading.insert(service.clone());
        }
        DashboardEvent::PollCompleted { snapshot } => {
            state.loading.remove(&snapshot.service_name);
            state.last_update = Some(env.at);

            state.history.push(
                StatusHistoryEntry {
                    timestamp: env.at,
                    service_name: snapshot.service_name.clone(),
                    status: snapshot.overall_status(),
                },
                env.at,
            );

            if !snapshot.is_placeholder() {
                if let Some(change) = state.tracker.observe(snapshot) {
                    match change.kind {
                        NotificationKind::Outage => warn!(
                            service = %change.service_name,
                            from = %change.previous,
                            to = %change.current,
                            "{}", change.message()
                        ),
                        NotificationKind::Recovery => info!(
                            service = %change.service_name,
                            from = %change.previous,
                            "{}", change.message()
                        ),
                    }
                    if state.notifications_enabled {
                        state.push_notification(Notification { at: env.at, change });
                    }
                }
            }

            state.upsert(snapshot.clone());
        }
        DashboardEvent::NotificationsToggled { enabled } => {
            state.notifications_enabled = *enabled;
        }
    }
}
