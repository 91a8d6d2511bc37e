use crate::collector::{DataCollector, MemoryCollector};
use crate::token::{CorrelationTokenProvider, TokenProvider};

/// State scoped to one logical unit of work (one HTTP request or one queued job).
///
/// Concurrent units must each own a separate instance.
pub struct UnitOfWork {
    token: Box<dyn TokenProvider>,
    collector: Option<Box<dyn DataCollector>>,
}

impl std::fmt::Debug for UnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitOfWork")
            .field("token", &self.token.token())
            .field("collector", &self.collector.is_some())
            .finish()
    }
}

impl Default for UnitOfWork {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitOfWork {
    /// Fresh token and an unbounded in-memory collector
    pub fn new() -> Self {
        Self::from_parts(
            Box::new(CorrelationTokenProvider::new()),
            Some(Box::new(MemoryCollector::new())),
        )
    }

    pub fn with_collector_limit(limit: usize) -> Self {
        Self::from_parts(
            Box::new(CorrelationTokenProvider::new()),
            Some(Box::new(MemoryCollector::with_limit(limit))),
        )
    }

    /// Unit without a collector; collected fields resolve to absent
    pub fn without_collector() -> Self {
        Self::from_parts(Box::new(CorrelationTokenProvider::new()), None)
    }

    pub fn from_parts(
        token: Box<dyn TokenProvider>,
        collector: Option<Box<dyn DataCollector>>,
    ) -> Self {
        Self { token, collector }
    }

    pub fn token(&self) -> String {
        self.token.token()
    }

    pub fn token_provider(&self) -> &dyn TokenProvider {
        self.token.as_ref()
    }

    pub fn collector(&self) -> Option<&dyn DataCollector> {
        self.collector.as_deref()
    }

    /// Boundary between two units: new token, empty collector
    pub fn reset(&self) {
        self.token.generate();
        if let Some(collector) = &self.collector {
            collector.reset();
        }
        tracing::debug!(
            target: "shiplog.unit",
            unit_id = %self.token.token(),
            "unit of work reset"
        );
    }
}
