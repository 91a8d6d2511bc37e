//! Built-in resolvers.
//!
//! Each resolver reads one facade from the [`Scope`]. A missing facade
//! makes the field absent; none of them can fail.

use serde_json::Value;
use shiplog_core::{LOGGER_VERSION, SQL_QUERIES};
use shiplog_types::{ErrorRef, FieldValue, sha1_hex};

use crate::names;
use crate::resolver::{Resolver, resolver};
use crate::scope::Scope;

type BuiltinFn = for<'a, 'b> fn(&'a Scope<'b>) -> Option<FieldValue>;

/// Marker standing in for a missing grouping part
const NULL_MARKER: &str = "null";

const GROUP_PARTS: [&str; 3] = ["class", "file", "line"];

pub(crate) const BUILTINS: [(&str, BuiltinFn); 16] = [
    (names::GET_SESSION_ID, session_id),
    (names::GET_ROUTE_NAME, route_name),
    (names::GET_URL, url),
    (names::GET_REQUEST_METHOD, request_method),
    (names::GET_SERVER_IP, server_ip),
    (names::GET_CLIENT_IP, client_ip),
    (names::GET_CLIENT_USER_AGENT, client_user_agent),
    (names::GET_ENVIRONMENT, environment),
    (names::GET_PROCESS_IDENTIFIER, process_identifier),
    (names::GET_USER_ID, user_id),
    (names::GET_GROUP_ID, group_id),
    (names::GET_LARAVEL_VERSION, laravel_version),
    (names::GET_SQL_QUERIES, sql_queries),
    (names::GET_ARTISAN_COMMAND_NAME, artisan_command_name),
    (names::GET_RUNNING_IN_CONSOLE, running_in_console),
    (names::GET_LOGGER_VERSION, logger_version),
];

/// SHA-1 of the session id; the raw id never leaves the process
pub fn session_id(scope: &Scope<'_>) -> Option<FieldValue> {
    let session = scope.request.session()?;
    Some(Value::String(sha1_hex(&session.id())))
}

pub fn route_name(scope: &Scope<'_>) -> Option<FieldValue> {
    let route = scope.request.router()?.current_route()?;
    route.name.map(Value::String)
}

/// Path with a leading `/`, plus `?query` when a query string is present
pub fn url(scope: &Scope<'_>) -> Option<FieldValue> {
    let request = scope.request.request()?;
    let path = request.path();
    let mut url = if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    };
    if let Some(query) = request.query_string() {
        url.push('?');
        url.push_str(&query);
    }
    Some(Value::String(url))
}

pub fn request_method(scope: &Scope<'_>) -> Option<FieldValue> {
    let request = scope.request.request()?;
    Some(Value::String(request.method()))
}

pub fn server_ip(scope: &Scope<'_>) -> Option<FieldValue> {
    scope
        .request
        .request()?
        .server("SERVER_ADDR")
        .map(Value::String)
}

pub fn client_ip(scope: &Scope<'_>) -> Option<FieldValue> {
    scope.request.request()?.client_ip().map(Value::String)
}

pub fn client_user_agent(scope: &Scope<'_>) -> Option<FieldValue> {
    scope
        .request
        .request()?
        .server("HTTP_USER_AGENT")
        .map(Value::String)
}

pub fn environment(scope: &Scope<'_>) -> Option<FieldValue> {
    scope.runtime.environment.clone().map(Value::String)
}

pub fn process_identifier(scope: &Scope<'_>) -> Option<FieldValue> {
    Some(Value::String(scope.unit.token()))
}

/// First signed-in user reported by the installed auth probes.
///
/// A failing probe counts as "no user" and the next probe is asked.
pub fn user_id(scope: &Scope<'_>) -> Option<FieldValue> {
    for probe in scope.request.auth_probes() {
        match probe.current_user_id() {
            Ok(Some(id)) if !is_empty_id(&id) => return Some(id),
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(
                    target: "shiplog.fields",
                    probe = probe.name(),
                    error = %err,
                    "auth probe failed, trying next"
                );
            }
        }
    }
    None
}

fn is_empty_id(id: &Value) -> bool {
    match id {
        Value::Null | Value::Bool(false) => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Hash of `class#file#line` taken from the occurrence context.
///
/// Parts missing from the context are read from the error carried as the
/// message, if any, before falling back to the null marker.
pub fn group_id(scope: &Scope<'_>) -> Option<FieldValue> {
    let error = scope.occurrence.message.as_error();
    let parts: Vec<String> = GROUP_PARTS
        .iter()
        .map(|key| {
            scope
                .occurrence
                .context_value(key)
                .and_then(|value| value.coerce_to_string())
                .or_else(|| error.and_then(|error| error_part(error, key)))
                .unwrap_or_else(|| NULL_MARKER.to_string())
        })
        .collect();
    Some(Value::String(sha1_hex(&parts.join("#"))))
}

fn error_part(error: &ErrorRef, key: &str) -> Option<String> {
    match key {
        "class" => Some(error.class.clone()),
        "file" => error.file.clone(),
        "line" => error.line.map(|line| line.to_string()),
        _ => None,
    }
}

pub fn laravel_version(scope: &Scope<'_>) -> Option<FieldValue> {
    Some(Value::String(scope.runtime.host_version.to_string()))
}

pub fn sql_queries(scope: &Scope<'_>) -> Option<FieldValue> {
    let collector = scope.unit.collector()?;
    Some(Value::Array(collector.get_by_key(SQL_QUERIES)))
}

pub fn artisan_command_name(scope: &Scope<'_>) -> Option<FieldValue> {
    scope.runtime.command_line().map(Value::String)
}

pub fn running_in_console(scope: &Scope<'_>) -> Option<FieldValue> {
    Some(Value::Bool(scope.runtime.running_in_console))
}

pub fn logger_version(_scope: &Scope<'_>) -> Option<FieldValue> {
    Some(Value::String(LOGGER_VERSION.to_string()))
}

/// Resolver reading `key` from the current session
pub fn from_session(key: impl Into<String>) -> Resolver {
    let key = key.into();
    resolver(move |scope| scope.request.session()?.get(&key))
}
