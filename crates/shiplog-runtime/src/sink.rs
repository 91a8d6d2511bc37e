use chrono::Utc;
use shiplog_core::{RequestContextSnapshot, RuntimeInfo, UnitOfWork};
use shiplog_events::EventSink;
use shiplog_fields::{FieldRegistry, FieldRequest, Scope};
use shiplog_types::{Context, Level, LogOccurrence, Message};
use std::sync::Arc;

use crate::Result;
use crate::transport::{Record, RecordKind, Transport};

/// Resolves the configured fields for each classified occurrence and hands
/// the finished record to the transport.
///
/// Holds no per-unit state; the unit of work and request facades come in
/// with each record, so one shipper serves every concurrent unit.
pub struct Shipper {
    registry: FieldRegistry,
    requests: Vec<FieldRequest>,
    runtime: Arc<RuntimeInfo>,
    transport: Arc<dyn Transport>,
}

impl Shipper {
    /// Fails when a request is bound to an unregistered resolver
    pub fn new(
        registry: FieldRegistry,
        requests: Vec<FieldRequest>,
        runtime: Arc<RuntimeInfo>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        registry.check(&requests)?;
        Ok(Self {
            registry,
            requests,
            runtime,
            transport,
        })
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Build the record for one occurrence of `unit`
    pub fn record(
        &self,
        unit: &UnitOfWork,
        request: &RequestContextSnapshot,
        kind: RecordKind,
        occurrence: LogOccurrence,
    ) -> Result<Record> {
        let scope = Scope::new(&occurrence, request, &self.runtime, unit);
        let fields = self.registry.resolve_values(&self.requests, &scope)?;

        let LogOccurrence {
            level,
            message,
            context,
        } = occurrence;
        Ok(Record {
            kind,
            level,
            message,
            context,
            fields,
            timestamp: Utc::now(),
        })
    }

    /// Build and send; failures are logged, never raised into the host
    pub fn ship(
        &self,
        unit: &UnitOfWork,
        request: &RequestContextSnapshot,
        kind: RecordKind,
        occurrence: LogOccurrence,
    ) {
        let level = occurrence.level;
        let result = self
            .record(unit, request, kind, occurrence)
            .and_then(|record| self.transport.send(record));
        if let Err(err) = result {
            tracing::warn!(
                target: "shiplog.runtime",
                kind = %kind,
                level = %level,
                error = %err,
                "record dropped"
            );
        }
    }

    /// Sink feeding records of `kind` for one unit of work into this shipper
    pub fn sink(
        self: &Arc<Self>,
        kind: RecordKind,
        unit: Arc<UnitOfWork>,
        request: Arc<RequestContextSnapshot>,
    ) -> FieldSink {
        FieldSink {
            shipper: Arc::clone(self),
            kind,
            unit,
            request,
        }
    }
}

impl std::fmt::Debug for Shipper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shipper")
            .field("registry", &self.registry)
            .field("fields", &self.requests.len())
            .finish()
    }
}

/// [`EventSink`] backed by a [`Shipper`], bound to one unit of work
#[derive(Clone)]
pub struct FieldSink {
    shipper: Arc<Shipper>,
    kind: RecordKind,
    unit: Arc<UnitOfWork>,
    request: Arc<RequestContextSnapshot>,
}

impl FieldSink {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }
}

impl EventSink for FieldSink {
    fn accept(&self, level: Level, message: Message, context: Context) {
        self.shipper.ship(
            &self.unit,
            &self.request,
            self.kind,
            LogOccurrence::new(level, message, context),
        );
    }
}

impl std::fmt::Debug for FieldSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSink")
            .field("kind", &self.kind)
            .field("token", &self.unit.token())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use shiplog_core::{RequestSnapshot, SessionSnapshot};
    use shiplog_fields::names;
    use shiplog_types::HostVersion;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<Record>>);

    impl Transport for Collect {
        fn send(&self, record: Record) -> Result<()> {
            self.0.lock().unwrap().push(record);
            Ok(())
        }
    }

    struct Refuse;

    impl Transport for Refuse {
        fn send(&self, _record: Record) -> Result<()> {
            Err(Error::Transport("queue full".to_string()))
        }
    }

    fn shipper(transport: Arc<dyn Transport>) -> Arc<Shipper> {
        let requests = vec![
            FieldRequest::new("url", names::GET_URL),
            FieldRequest::new("session_id", names::GET_SESSION_ID),
            FieldRequest::new("environment", names::GET_ENVIRONMENT),
            FieldRequest::new("pid", names::GET_PROCESS_IDENTIFIER),
        ];
        let runtime = RuntimeInfo::new(HostVersion::new("5.6.40")).with_environment("testing");
        let shipper =
            Shipper::new(FieldRegistry::new(), requests, Arc::new(runtime), transport).unwrap();
        Arc::new(shipper)
    }

    fn hello() -> LogOccurrence {
        LogOccurrence::new(Level::Info, "hello", Context::new())
    }

    #[test]
    fn test_new_rejects_unregistered_field() {
        let err = Shipper::new(
            FieldRegistry::new(),
            vec![FieldRequest::new("tenant", "getTenant")],
            Arc::new(RuntimeInfo::new(HostVersion::new("5.6"))),
            Arc::new(Collect::default()),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Fields(_)));
    }

    #[test]
    fn test_record_uses_given_request_and_unit() {
        let shipper = shipper(Arc::new(Collect::default()));
        let unit = UnitOfWork::new();

        let record = shipper
            .record(&unit, &RequestContextSnapshot::empty(), RecordKind::Event, hello())
            .unwrap();
        assert!(record.fields.is_absent("url"));
        assert_eq!(record.fields.get("environment"), Some(&json!("testing")));
        assert_eq!(record.fields.get("pid"), Some(&json!(unit.token())));

        let request = RequestContextSnapshot::empty()
            .with_request(RequestSnapshot::new("GET", "orders").with_query("page=2"))
            .with_session(SessionSnapshot::new("abc"));
        let record = shipper
            .record(&unit, &request, RecordKind::Event, hello())
            .unwrap();
        assert_eq!(record.fields.get("url"), Some(&json!("/orders?page=2")));
        assert!(record.fields.get("session_id").is_some());
    }

    #[test]
    fn test_sinks_are_bound_to_their_unit() {
        let transport = Arc::new(Collect::default());
        let shipper = shipper(transport.clone());
        let (a, b) = (Arc::new(UnitOfWork::new()), Arc::new(UnitOfWork::new()));
        let orders = Arc::new(
            RequestContextSnapshot::empty().with_request(RequestSnapshot::new("GET", "orders")),
        );
        let admin = Arc::new(
            RequestContextSnapshot::empty().with_request(RequestSnapshot::new("POST", "admin")),
        );
        let sink_a = shipper.sink(RecordKind::Error, a.clone(), orders);
        let sink_b = shipper.sink(RecordKind::Event, b.clone(), admin);

        sink_b.accept(Level::Info, "saved".into(), Context::new());
        sink_a.accept(Level::Error, "boom".into(), Context::new());

        let records = transport.0.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].kind, RecordKind::Error);
        assert_eq!(records[1].message.as_str(), Some("boom"));
        assert_eq!(records[1].fields.get("url"), Some(&json!("/orders")));
        assert_eq!(records[1].fields.get("pid"), Some(&json!(a.token())));
        assert_eq!(records[0].fields.get("url"), Some(&json!("/admin")));
        assert_eq!(records[0].fields.get("pid"), Some(&json!(b.token())));
    }

    #[test]
    fn test_transport_failure_is_swallowed() {
        let shipper = shipper(Arc::new(Refuse));
        shipper
            .sink(
                RecordKind::Event,
                Arc::new(UnitOfWork::new()),
                Arc::new(RequestContextSnapshot::empty()),
            )
            .accept(Level::Info, "hello".into(), Context::new());
    }
}
