use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use statuswatch_core::config::ServiceEntry;
use statuswatch_core::model::ComponentStatus;
use statuswatch_core::source::{SourceError, StatusSource};
use statuswatch_core::status::StatusType;

/// Synthesizes plausible, slowly changing statuses without touching the
/// network. Each fetch advances a global tick; the tick and the service slug
/// pick the status of every component.
pub struct DemoSource {
    latency: Duration,
    tick: AtomicU64,
}

impl DemoSource {
    pub fn new() -> Self {
        Self {
            latency: Duration::from_millis(150),
            tick: AtomicU64::new(0),
        }
    }

    #[cfg(test)]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

fn seed(slug: &str) -> u64 {
    slug.bytes()
        .fold(7u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64))
}

fn demo_status(seed: u64, tick: u64, index: usize) -> StatusType {
    let phase = (seed + tick / 4 + index as u64 * 3) % 40;
    match phase {
        0 => StatusType::MajorOutage,
        1 | 2 => StatusType::PartialOutage,
        3..=5 => StatusType::DegradedPerformance,
        6 => StatusType::UnderMaintenance,
        _ => StatusType::Operational,
    }
}

fn component_names(service: &ServiceEntry) -> Vec<String> {
    if !service.components.is_empty() {
        return service.components.clone();
    }
    if !service.include.is_empty() {
        return service.include.clone();
    }
    ["API", "Dashboard", "Webhooks"].iter().map(|s| s.to_string()).collect()
}

#[async_trait]
impl StatusSource for DemoSource {
    fn name(&self) -> &'static str {
        "demo"
    }

    async fn fetch(&self, service: &ServiceEntry) -> Result<Vec<ComponentStatus>, SourceError> {
        tokio::time::sleep(self.latency).await;

        let tick = self.tick.fetch_add(1, Ordering::Relaxed);
        let seed = seed(&service.slug);

        // Occasional fetch failure so the placeholder path shows up too
        if (seed + tick) % 53 == 11 {
            return Err(SourceError::Timeout);
        }

        Ok(component_names(service)
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let status = demo_status(seed, tick, i);
                let component = ComponentStatus::new(format!("{}-{}", service.slug, i), name, status);
                match status {
                    StatusType::Operational => component,
                    other => component.with_description(format!("Demo: {}", other.label())),
                }
            })
            .collect())
    }
}
