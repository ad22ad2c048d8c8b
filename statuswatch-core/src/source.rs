use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::warn;

use crate::config::ServiceEntry;
use crate::model::{ComponentStatus, ServiceStatus};
use crate::vendor::VendorError;

/// Failure of a single fetch, after any retries the source performs.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(String),
    #[error("upstream returned HTTP {code}")]
    Status { code: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("could not decode payload: {0}")]
    Decode(#[from] VendorError),
}

/// A pluggable way of obtaining the current components of a service.
///
/// Implementations:
/// - `HttpSource`: fetches the vendor's JSON endpoint
/// - `DemoSource`: synthesizes statuses for demos and tests
///
/// Components returned here are already normalized through the vendor
/// decoders.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, service: &ServiceEntry) -> Result<Vec<ComponentStatus>, SourceError>;

    /// Get the name of this source implementation
    fn name(&self) -> &'static str;
}

/// Fetch one service and wrap the result into a snapshot. A failed fetch
/// becomes the unknown placeholder, so this never fails.
pub async fn snapshot(source: &dyn StatusSource, service: &ServiceEntry) -> ServiceStatus {
    match source.fetch(service).await {
        Ok(components) => ServiceStatus {
            service_name: service.slug.clone(),
            display_name: service.display_name.clone(),
            components,
            page_url: service.page_url.clone(),
            icon: service.icon.clone(),
            description: service.description.clone(),
            updated_at: Utc::now(),
            error: None,
        },
        Err(e) => {
            warn!(service = %service.slug, source = source.name(), error = %e, "status fetch failed");
            service.unavailable(e.to_string())
        }
    }
}
