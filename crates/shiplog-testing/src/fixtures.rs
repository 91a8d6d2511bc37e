//! Sample host data for tests.

use serde_json::{Value, json};
use shiplog_core::{
    AuthProbe, FnProbe, ProbeError, RequestContextSnapshot, RequestSnapshot, Route,
    RouterSnapshot, SessionSnapshot,
};
use shiplog_types::{Context, ErrorRef, HostValue};

pub const SAMPLE_SESSION_ID: &str = "lW0f3Qx1yM2kZr5b8TnC4vGd7HsJ9aEu";

/// Error as the host reports an uncaught query failure.
pub fn sample_error() -> ErrorRef {
    ErrorRef::new(
        "Illuminate\\Database\\QueryException",
        "SQLSTATE[42S02]: Base table or view not found",
    )
    .at("app/Http/Controllers/OrderController.php", 42)
}

/// Context carrying the grouping keys of [`sample_error`].
pub fn grouping_context() -> Context {
    let err = sample_error();
    let mut context = Context::new();
    context.insert("class".into(), HostValue::from(err.class.as_str()));
    context.insert("file".into(), HostValue::from(err.file.unwrap_or_default()));
    context.insert("line".into(), HostValue::from(json!(err.line)));
    context
}

/// Typical browser request against a named route, behind one trusted proxy.
pub fn web_request() -> RequestContextSnapshot {
    RequestContextSnapshot::empty()
        .with_session(SessionSnapshot::new(SAMPLE_SESSION_ID).with_value("cart_id", json!(991)))
        .with_router(RouterSnapshot::new(Some(Route::named("orders.show"))))
        .with_request(
            RequestSnapshot::new("GET", "orders/17")
                .with_query("tab=items")
                .with_server("SERVER_ADDR", "10.0.0.5")
                .with_server("REMOTE_ADDR", "10.0.0.1")
                .with_server("HTTP_USER_AGENT", "Mozilla/5.0 (X11; Linux x86_64)")
                .with_trusted_proxy("10.0.0.1")
                .with_header("X-Forwarded-For", "203.0.113.7, 10.0.0.1"),
        )
}

/// Probe whose guard is not configured.
pub fn failing_probe(name: &'static str) -> impl AuthProbe {
    FnProbe::new(name, move || Err(ProbeError::new(format!("{} guard not configured", name))))
}

/// Probe always reporting `id`.
pub fn static_probe(name: &'static str, id: Value) -> impl AuthProbe {
    FnProbe::new(name, move || Ok(Some(id.clone())))
}
