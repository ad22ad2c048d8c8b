use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error};

use statuswatch_core::config::ServiceEntry;
use statuswatch_core::model::ServiceStatus;
use statuswatch_core::reducer::{DashboardEvent, EventEnvelope};
use statuswatch_core::source::{StatusSource, snapshot};

/// Polls every configured service through one [`StatusSource`].
#[derive(Clone)]
pub struct Poller {
    source: Arc<dyn StatusSource>,
    services: Vec<ServiceEntry>,
    interval: Duration,
    next_id: Arc<AtomicU64>,
}

impl Poller {
    pub fn new(
        source: Arc<dyn StatusSource>,
        services: Vec<ServiceEntry>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            services,
            interval,
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Wrap an event with the next id of this poller's sequence.
    pub fn envelope(&self, event: DashboardEvent) -> EventEnvelope {
        envelope(&self.next_id, event)
    }

    /// Poll every service concurrently and wait for all of them. One slow or
    /// failing service never cuts the others short. Results are in catalog
    /// order.
    pub async fn poll_all(&self) -> Vec<ServiceStatus> {
        let mut set = JoinSet::new();
        for (index, service) in self.services.iter().cloned().enumerate() {
            let source = self.source.clone();
            set.spawn(async move { (index, snapshot(source.as_ref(), &service).await) });
        }

        let mut results: Vec<Option<ServiceStatus>> = vec![None; self.services.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, status)) => results[index] = Some(status),
                Err(e) => error!(error = %e, "poll task failed"),
            }
        }

        results
            .into_iter()
            .zip(&self.services)
            .map(|(status, service)| {
                status.unwrap_or_else(|| service.unavailable("poll task failed"))
            })
            .collect()
    }

    /// Start one interval loop per service. Each loop also re-polls
    /// immediately whenever `refresh_tx` fires.
    pub fn spawn(
        &self,
        event_tx: broadcast::Sender<EventEnvelope>,
        refresh_tx: &broadcast::Sender<()>,
    ) -> Vec<JoinHandle<()>> {
        self.services
            .iter()
            .cloned()
            .map(|service| {
                let worker = ServiceLoop {
                    source: self.source.clone(),
                    service,
                    interval: self.interval,
                    next_id: self.next_id.clone(),
                };
                let tx = event_tx.clone();
                let refresh_rx = refresh_tx.subscribe();
                tokio::spawn(async move {
                    worker.run(tx, refresh_rx).await;
                })
            })
            .collect()
    }
}

/// A background poll loop for a single service
struct ServiceLoop {
    source: Arc<dyn StatusSource>,
    service: ServiceEntry,
    interval: Duration,
    next_id: Arc<AtomicU64>,
}

impl ServiceLoop {
    async fn run(
        self,
        event_tx: broadcast::Sender<EventEnvelope>,
        mut refresh_rx: broadcast::Receiver<()>,
    ) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                received = refresh_rx.recv() => {
                    if let Err(broadcast::error::RecvError::Closed) = received {
                        return;
                    }
                    ticker.reset();
                }
            }

            if !self.poll_once(&event_tx).await {
                debug!(service = %self.service.slug, "no listeners left, stopping poll loop");
                return;
            }
        }
    }

    /// Returns false once nobody is listening.
    async fn poll_once(&self, event_tx: &broadcast::Sender<EventEnvelope>) -> bool {
        if self
            .emit(event_tx, DashboardEvent::PollStarted {
                service: self.service.slug.clone(),
            })
            .is_err()
        {
            return false;
        }

        let status = snapshot(self.source.as_ref(), &self.service).await;
        self.emit(event_tx, DashboardEvent::PollCompleted { snapshot: status })
            .is_ok()
    }

    fn emit(
        &self,
        event_tx: &broadcast::Sender<EventEnvelope>,
        event: DashboardEvent,
    ) -> Result<usize, broadcast::error::SendError<EventEnvelope>> {
        event_tx.send(envelope(&self.next_id, event))
    }
}

fn envelope(next_id: &AtomicU64, event: DashboardEvent) -> EventEnvelope {
    EventEnvelope {
        id: next_id.fetch_add(1, Ordering::SeqCst),
        at: Utc::now(),
        event,
    }
}
