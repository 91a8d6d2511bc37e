use shiplog_core::{RequestContextSnapshot, RuntimeInfo, UnitOfWork};
use shiplog_events::IgnoreRule;
use shiplog_fields::FieldRegistry;
use shiplog_types::HostEvent;
use std::sync::Arc;

use crate::Result;
use crate::config::Config;
use crate::integration::{Handled, Integration, Target};
use crate::sink::{FieldSink, Shipper};
use crate::transport::{RecordKind, Transport};

/// Everything one process needs to turn host events into shipped records.
///
/// Shared by all units of work in the process. Events passed to
/// [`Client::handle`] belong to the process unit (console commands, queue
/// workers). Each web request gets its own unit and facades through
/// [`Client::begin_request`], so overlapping requests never see each
/// other's token, queries or request data.
#[derive(Debug)]
pub struct Client {
    integration: Integration,
    shipper: Arc<Shipper>,
    runtime: Arc<RuntimeInfo>,
    collector_limit: Option<usize>,
    process: UnitBinding,
}

impl Client {
    /// Validate `config` against `registry` and wire the pipeline.
    ///
    /// A configured environment overrides the one reported by the host.
    pub fn bootstrap(
        config: &Config,
        runtime: RuntimeInfo,
        registry: FieldRegistry,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        config.validate(&registry)?;

        let runtime = match &config.environment {
            Some(environment) => runtime.with_environment(environment.as_str()),
            None => runtime,
        };
        let runtime = Arc::new(runtime);

        let shipper = Arc::new(Shipper::new(
            registry,
            config.field_requests(),
            Arc::clone(&runtime),
            transport,
        )?);
        let integration = Integration::new(config, &runtime);
        let process = UnitBinding::new(
            &shipper,
            new_unit(config.collector_limit),
            RequestContextSnapshot::empty(),
        );

        Ok(Self {
            integration,
            shipper,
            runtime,
            collector_limit: config.collector_limit,
            process,
        })
    }

    pub fn with_ignore(mut self, rule: IgnoreRule) -> Self {
        self.integration = self.integration.with_ignore(rule);
        self
    }

    pub fn listened_events(&self) -> &[&'static str] {
        self.integration.listened_events()
    }

    /// Handle an event of the process unit
    pub fn handle(&self, event: &HostEvent) -> Result<Handled> {
        self.integration.handle(event, self.process.target())
    }

    /// Fresh unit of work for an incoming request, with its facades bound.
    ///
    /// The unit ends when the returned scope is dropped.
    pub fn begin_request(&self, request: RequestContextSnapshot) -> RequestScope<'_> {
        let binding = UnitBinding::new(&self.shipper, new_unit(self.collector_limit), request);
        tracing::debug!(
            target: "shiplog.runtime",
            token = %binding.unit.token(),
            "request unit started"
        );
        RequestScope {
            integration: &self.integration,
            binding,
        }
    }

    /// The process unit
    pub fn unit(&self) -> &UnitOfWork {
        &self.process.unit
    }

    pub fn runtime(&self) -> &RuntimeInfo {
        &self.runtime
    }

    pub fn integration(&self) -> &Integration {
        &self.integration
    }
}

/// One web request: its own unit of work and request facades
#[derive(Debug)]
pub struct RequestScope<'c> {
    integration: &'c Integration,
    binding: UnitBinding,
}

impl RequestScope<'_> {
    /// Handle an event raised while serving this request
    pub fn handle(&self, event: &HostEvent) -> Result<Handled> {
        self.integration.handle(event, self.binding.target())
    }

    pub fn unit(&self) -> &UnitOfWork {
        &self.binding.unit
    }

    pub fn request(&self) -> &RequestContextSnapshot {
        &self.binding.request
    }
}

fn new_unit(collector_limit: Option<usize>) -> UnitOfWork {
    match collector_limit {
        Some(limit) => UnitOfWork::with_collector_limit(limit),
        None => UnitOfWork::new(),
    }
}

#[derive(Debug)]
struct UnitBinding {
    unit: Arc<UnitOfWork>,
    request: Arc<RequestContextSnapshot>,
    structured: FieldSink,
    errors: FieldSink,
}

impl UnitBinding {
    fn new(shipper: &Arc<Shipper>, unit: UnitOfWork, request: RequestContextSnapshot) -> Self {
        let unit = Arc::new(unit);
        let request = Arc::new(request);
        Self {
            structured: shipper.sink(RecordKind::Event, Arc::clone(&unit), Arc::clone(&request)),
            errors: shipper.sink(RecordKind::Error, Arc::clone(&unit), Arc::clone(&request)),
            unit,
            request,
        }
    }

    fn target(&self) -> Target<'_> {
        Target {
            unit: &self.unit,
            structured: &self.structured,
            errors: &self.errors,
        }
    }
}
