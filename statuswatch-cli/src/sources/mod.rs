use std::sync::Arc;

use statuswatch_core::config::StatuswatchConfig;
use statuswatch_core::source::{SourceError, StatusSource};

mod demo;
#[cfg(feature = "http")]
mod http;

pub use demo::DemoSource;
#[cfg(feature = "http")]
pub use http::HttpSource;

/// Pick the source for this run.
#[cfg(feature = "http")]
pub fn build_source(
    config: &StatuswatchConfig,
    demo: bool,
) -> Result<Arc<dyn StatusSource>, SourceError> {
    if demo {
        return Ok(Arc::new(DemoSource::new()));
    }
    Ok(Arc::new(HttpSource::new(config)?))
}

/// Without an HTTP client only the demo source is available
#[cfg(not(feature = "http"))]
pub fn build_source(
    _config: &StatuswatchConfig,
    demo: bool,
) -> Result<Arc<dyn StatusSource>, SourceError> {
    if !demo {
        tracing::warn!("built without the `http` feature, falling back to demo data");
    }
    Ok(Arc::new(DemoSource::new()))
}
