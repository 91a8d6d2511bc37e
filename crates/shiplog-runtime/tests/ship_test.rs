use anyhow::Result;
use serde_json::json;
use shiplog_core::{RequestContextSnapshot, RequestSnapshot, SQL_QUERIES};
use shiplog_events::{IgnoreRule, Outcome};
use shiplog_fields::{FieldRegistry, from_session, names};
use shiplog_runtime::{FieldConfig, Handled, RecordKind};
use shiplog_testing::TestHost;
use shiplog_testing::assertions::{assert_absent, assert_field, assert_kinds};
use shiplog_testing::fixtures::{
    failing_probe, grouping_context, sample_error, static_probe, web_request,
};
use shiplog_types::{Context, ErrorRef, HostValue};
use std::collections::HashSet;
use std::thread;

fn snapshot_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("url", names::GET_URL),
        FieldConfig::new("route", names::GET_ROUTE_NAME),
        FieldConfig::new("client_ip", names::GET_CLIENT_IP),
        FieldConfig::new("user_id", names::GET_USER_ID),
        FieldConfig::new("group_id", names::GET_GROUP_ID),
        FieldConfig::new("environment", names::GET_ENVIRONMENT),
        FieldConfig::new("running_in_console", names::GET_RUNNING_IN_CONSOLE),
        FieldConfig::new("process_identifier", names::GET_PROCESS_IDENTIFIER),
    ]
}

#[test]
fn test_error_record_snapshot() -> Result<()> {
    let host = TestHost::builder("5.6.40")
        .configure(|config| config.fields = snapshot_fields())
        .build()?;
    let request = host.request(
        web_request()
            .with_auth_probe(failing_probe("sentinel"))
            .with_auth_probe(static_probe("auth", json!(5))),
    );

    let mut context = grouping_context();
    context.insert("order_id".into(), json!(17).into());
    context.insert("exception".into(), sample_error().into());
    let handled = request.log("error", "Order lookup failed", context)?;
    assert_eq!(handled, Handled::Log(Outcome::ErrorEvent));

    let records = host.records();
    assert_kinds(&records, &[RecordKind::Error])?;
    insta::assert_json_snapshot!(records[0], {
        ".timestamp" => "[timestamp]",
        ".fields.process_identifier" => "[token]",
    }, @r#"
    {
      "kind": "error",
      "level": "error",
      "message": {
        "class": "Illuminate\\Database\\QueryException",
        "message": "SQLSTATE[42S02]: Base table or view not found",
        "file": "app/Http/Controllers/OrderController.php",
        "line": 42
      },
      "context": {
        "class": "Illuminate\\Database\\QueryException",
        "file": "app/Http/Controllers/OrderController.php",
        "line": 42,
        "order_id": 17
      },
      "fields": {
        "url": "/orders/17?tab=items",
        "route": "orders.show",
        "client_ip": "203.0.113.7",
        "user_id": 5,
        "group_id": "9d7e18ca8e4b183139f8819ae5d040ceb08e727d",
        "environment": "testing",
        "running_in_console": false,
        "process_identifier": "[token]"
      },
      "timestamp": "[timestamp]"
    }
    "#);
    Ok(())
}

#[test]
fn test_structured_and_error_records_on_legacy_host() -> Result<()> {
    let host = TestHost::builder("5.2.45").build()?;

    host.log("info", "user signed in", Context::new())?;
    let mut context = Context::new();
    context.insert("exception".into(), sample_error().into());
    host.log("error", "Order lookup failed", context)?;

    let records = host.records();
    assert_kinds(&records, &[RecordKind::Event, RecordKind::Error])?;
    // legacy hosts keep the side channel untouched
    assert_eq!(records[1].message.as_str(), Some("Order lookup failed"));
    assert!(records[1].context.contains_key("exception"));
    assert_absent(&records[0], "url")?;
    assert_field(&records[0], "environment", &json!("testing"))?;
    Ok(())
}

#[test]
fn test_sql_queries_shipped_and_cleared_per_job() -> Result<()> {
    let host = TestHost::builder("5.8.38")
        .in_console(&["artisan", "queue:work", "--tries=3"])
        .build()?;

    assert_eq!(
        host.query("select * from orders where id = ?", json!([17]), 1.5)?,
        Handled::QueryRecorded
    );
    host.log("warning", "slow order lookup", Context::new())?;
    let first = host.transport().take();
    assert_field(
        &first[0],
        "sql_queries",
        &json!([{"query": "select * from orders where id = ?", "bindings": [17], "time": 1.5}]),
    )?;
    assert_field(
        &first[0],
        "artisan_command_name",
        &json!("artisan queue:work --tries=3"),
    )?;
    let first_token = first[0].fields.get("process_identifier").cloned();

    assert_eq!(host.job_boundary()?, Handled::UnitReset);
    host.log("warning", "next job", Context::new())?;
    let second = host.transport().take();
    assert_field(&second[0], "sql_queries", &json!([]))?;
    assert_ne!(second[0].fields.get("process_identifier").cloned(), first_token);
    Ok(())
}

#[test]
fn test_sql_disabled_ignores_queries() -> Result<()> {
    let host = TestHost::builder("5.8.38")
        .configure(|config| config.sql_enabled = false)
        .build()?;
    assert_eq!(host.query("select 1", json!([]), 0.1)?, Handled::NotListened);

    let collector = host.client().unit().collector().expect("collector");
    assert!(collector.get_by_key(SQL_QUERIES).is_empty());
    Ok(())
}

#[test]
fn test_custom_resolver_and_ignore_rule() -> Result<()> {
    let mut registry = FieldRegistry::new();
    registry.register("getCartId", from_session("cart_id"));
    let host = TestHost::builder("6.20.44")
        .registry(registry)
        .ignore(IgnoreRule::new("health", |_, message, _| {
            message.as_str() == Some("health check")
        }))
        .configure(|config| {
            config.fields = vec![FieldConfig::new("cart_id", "getCartId")];
            config.ignored_levels = vec!["debug".parse().unwrap()];
        })
        .build()?;
    let request = host.request(web_request());

    request.log("debug", "cache miss", Context::new())?;
    request.log("notice", HostValue::from("health check"), Context::new())?;
    request.log("notice", "cart updated", Context::new())?;
    let records = host.records();
    assert_eq!(records.len(), 1);
    assert_field(&records[0], "cart_id", &json!(991))?;
    Ok(())
}

#[test]
fn test_bootstrap_rejects_unknown_resolver() {
    let result = TestHost::builder("5.6.40")
        .configure(|config| config.fields.push(FieldConfig::new("tenant", "getTenant")))
        .build();
    assert!(result.is_err());
}

#[test]
fn test_side_channel_errors_group_by_their_origin() -> Result<()> {
    let host = TestHost::builder("5.6.40")
        .configure(|config| config.fields = snapshot_fields())
        .build()?;
    for (class, file, line) in [("A\\OrderFailed", "a.php", 10), ("B\\DiskFull", "b.php", 99)] {
        let mut context = Context::new();
        context.insert(
            "exception".into(),
            ErrorRef::new(class, "failed").at(file, line).into(),
        );
        host.log("error", "job failed", context)?;
    }

    let records = host.records();
    assert_kinds(&records, &[RecordKind::Error, RecordKind::Error])?;
    assert_ne!(
        records[0].fields.get("group_id"),
        records[1].fields.get("group_id")
    );
    Ok(())
}

#[test]
fn test_overlapping_requests_keep_their_own_unit() -> Result<()> {
    let host = TestHost::builder("5.6.40")
        .configure(|config| config.fields = snapshot_fields())
        .build()?;
    let orders = host.request(web_request());
    let admin = host.request(RequestContextSnapshot::empty().with_request(
        RequestSnapshot::new("POST", "admin/delete"),
    ));
    assert_ne!(orders.token(), admin.token());

    orders.log("info", "order viewed", Context::new())?;
    let records = host.transport().take();
    assert_field(&records[0], "url", &json!("/orders/17?tab=items"))?;
    assert_field(&records[0], "process_identifier", &json!(orders.token()))?;

    assert_eq!(
        admin.query("delete from users where id = ?", json!([3]), 0.2)?,
        Handled::QueryRecorded
    );
    let collector = orders.scope().unit().collector().expect("collector");
    assert!(collector.get_by_key(SQL_QUERIES).is_empty());
    Ok(())
}

#[test]
fn test_concurrent_requests_on_shared_client() -> Result<()> {
    let host = TestHost::builder("5.6.40")
        .configure(|config| config.fields = snapshot_fields())
        .build()?;

    thread::scope(|s| {
        for worker in 0..4 {
            let host = &host;
            s.spawn(move || {
                let request = host.request(RequestContextSnapshot::empty().with_request(
                    RequestSnapshot::new("GET", format!("workers/{}", worker)),
                ));
                for _ in 0..5 {
                    request
                        .log("info", format!("worker {}", worker), Context::new())
                        .expect("log handled");
                }
            });
        }
    });

    let records = host.records();
    assert_eq!(records.len(), 20);
    for record in &records {
        let worker = record
            .message
            .as_str()
            .and_then(|message| message.strip_prefix("worker "))
            .expect("worker message");
        assert_field(record, "url", &json!(format!("/workers/{}", worker)))?;
    }
    let tokens: HashSet<_> = records
        .iter()
        .filter_map(|record| record.fields.get("process_identifier").cloned())
        .map(|token| token.to_string())
        .collect();
    assert_eq!(tokens.len(), 4);
    Ok(())
}
