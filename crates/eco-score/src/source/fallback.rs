//! Ordered composition of data sources.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use eco_common::{EcoError, EcoResult, Location};

use super::{DataSource, SourcedBands};

/// Tries each source in order and returns the first answer.
///
/// Source failures (`DataNotAvailable`, `DataReadError`) are logged and
/// skipped. Any other error stops the chain immediately. When every source
/// fails, the last failure is returned.
#[derive(Clone, Default)]
pub struct FallbackChain {
    sources: Vec<Arc<dyn DataSource>>,
}

impl FallbackChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the end of the chain.
    pub fn with_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of the sources in try order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for FallbackChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackChain")
            .field("sources", &self.source_names())
            .finish()
    }
}

#[async_trait]
impl DataSource for FallbackChain {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn fetch_bands(
        &self,
        location: &Location,
        date: Option<NaiveDate>,
    ) -> EcoResult<SourcedBands> {
        let mut last_error = None;

        for source in &self.sources {
            match source.fetch_bands(location, date).await {
                Ok(result) => {
                    if last_error.is_some() {
                        tracing::debug!(
                            provider = %result.provider,
                            source = %result.source,
                            %location,
                            "fallback source answered"
                        );
                    }
                    return Ok(result);
                }
                Err(e) if e.is_source_failure() => {
                    tracing::warn!(
                        source = source.name(),
                        %location,
                        error = %e,
                        "data source failed, trying next"
                    );
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            EcoError::DataNotAvailable("no data sources configured".to_string())
        }))
    }
}
