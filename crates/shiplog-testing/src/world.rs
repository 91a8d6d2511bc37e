//! TestHost pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Bootstrapping a client for a given host version
//! - Feeding it host events in the shape that version dispatches, either
//!   to the process unit or to a per-request [`TestRequest`]
//! - Reading back the records it shipped

use anyhow::Result;
use serde_json::{Value, json};
use shiplog_core::{RequestContextSnapshot, RuntimeInfo};
use shiplog_events::{ExtractionStrategy, IgnoreRule, event_names};
use shiplog_fields::FieldRegistry;
use shiplog_runtime::{Client, Config, Handled, Record, RequestScope};
use shiplog_types::{Context, HostEvent, HostValue, HostVersion};
use std::sync::Arc;

use crate::transport::MemoryTransport;

/// Bootstrapped client wired to an in-memory transport.
///
/// # Example
/// ```no_run
/// use shiplog_testing::TestHost;
/// use shiplog_types::Context;
///
/// let host = TestHost::builder("5.6.40").build().unwrap();
/// host.log("info", "hello", Context::new()).unwrap();
/// assert_eq!(host.records().len(), 1);
/// ```
pub struct TestHost {
    client: Client,
    transport: Arc<MemoryTransport>,
}

pub struct TestHostBuilder {
    version: HostVersion,
    argv: Option<Vec<String>>,
    environment: String,
    config: Config,
    registry: FieldRegistry,
    ignore: Vec<IgnoreRule>,
}

impl TestHostBuilder {
    /// Run as a console process with the given argv.
    pub fn in_console(mut self, argv: &[&str]) -> Self {
        self.argv = Some(argv.iter().map(|arg| arg.to_string()).collect());
        self
    }

    /// Environment reported by the host.
    pub fn environment(mut self, environment: &str) -> Self {
        self.environment = environment.to_string();
        self
    }

    pub fn configure(mut self, f: impl FnOnce(&mut Config)) -> Self {
        f(&mut self.config);
        self
    }

    pub fn registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn ignore(mut self, rule: IgnoreRule) -> Self {
        self.ignore.push(rule);
        self
    }

    pub fn build(self) -> Result<TestHost> {
        let mut runtime = RuntimeInfo::new(self.version).with_environment(self.environment);
        if let Some(argv) = self.argv {
            runtime = runtime.in_console(argv);
        }

        let transport = Arc::new(MemoryTransport::new());
        let mut client =
            Client::bootstrap(&self.config, runtime, self.registry, transport.clone())?;
        for rule in self.ignore {
            client = client.with_ignore(rule);
        }
        Ok(TestHost { client, transport })
    }
}

impl TestHost {
    pub fn builder(version: &str) -> TestHostBuilder {
        TestHostBuilder {
            version: HostVersion::new(version),
            argv: None,
            environment: "testing".to_string(),
            config: Config::default(),
            registry: FieldRegistry::new(),
            ignore: Vec::new(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn transport(&self) -> &MemoryTransport {
        &self.transport
    }

    pub fn records(&self) -> Vec<Record> {
        self.transport.records()
    }

    /// Dispatch a log call in the event shape of this host version.
    pub fn log(
        &self,
        level: &str,
        message: impl Into<HostValue>,
        context: Context,
    ) -> Result<Handled> {
        Ok(self.client.handle(&self.log_event(level, message, context))?)
    }

    /// Dispatch an executed query in the event shape of this host version.
    pub fn query(&self, sql: &str, bindings: Value, time: f64) -> Result<Handled> {
        Ok(self.client.handle(&self.query_event(sql, bindings, time))?)
    }

    /// Dispatch the queue event marking a job boundary.
    pub fn job_boundary(&self) -> Result<Handled> {
        let strategy = self.client.integration().adapters().queue;
        let name = strategy
            .event_names()
            .first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("strategy {} listens to nothing", strategy.as_str()))?;
        Ok(self.client.handle(&HostEvent::new(name, Vec::new()))?)
    }

    /// Start a web request with its own unit of work.
    pub fn request(&self, request: RequestContextSnapshot) -> TestRequest<'_> {
        TestRequest {
            host: self,
            scope: self.client.begin_request(request),
        }
    }

    pub fn log_event(
        &self,
        level: &str,
        message: impl Into<HostValue>,
        context: Context,
    ) -> HostEvent {
        let (level, message, context) = (
            HostValue::from(level),
            message.into(),
            HostValue::Map(context),
        );
        match self.client.integration().adapters().log {
            ExtractionStrategy::PositionalLog => HostEvent::new(
                event_names::ILLUMINATE_LOG,
                vec![level, message, context],
            ),
            _ => HostEvent::object(
                event_names::MESSAGE_LOGGED,
                [("level", level), ("message", message), ("context", context)],
            ),
        }
    }

    pub fn query_event(&self, sql: &str, bindings: Value, time: f64) -> HostEvent {
        match self.client.integration().adapters().query {
            ExtractionStrategy::PositionalQuery => HostEvent::new(
                event_names::ILLUMINATE_QUERY,
                vec![sql.into(), bindings.into(), json!(time).into()],
            ),
            _ => HostEvent::object(
                event_names::QUERY_EXECUTED,
                [
                    ("sql", HostValue::from(sql)),
                    ("bindings", HostValue::from(bindings)),
                    ("time", HostValue::from(json!(time))),
                    ("connectionName", HostValue::from("mysql")),
                ],
            ),
        }
    }
}

/// One in-flight web request of a [`TestHost`].
pub struct TestRequest<'h> {
    host: &'h TestHost,
    scope: RequestScope<'h>,
}

impl TestRequest<'_> {
    pub fn scope(&self) -> &RequestScope<'_> {
        &self.scope
    }

    pub fn token(&self) -> String {
        self.scope.unit().token()
    }

    pub fn log(
        &self,
        level: &str,
        message: impl Into<HostValue>,
        context: Context,
    ) -> Result<Handled> {
        Ok(self.scope.handle(&self.host.log_event(level, message, context))?)
    }

    pub fn query(&self, sql: &str, bindings: Value, time: f64) -> Result<Handled> {
        Ok(self.scope.handle(&self.host.query_event(sql, bindings, time))?)
    }
}
