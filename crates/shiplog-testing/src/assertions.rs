//! Custom assertions for shipped records.
//!
//! Return `anyhow::Result` so tests can chain them with `?`.

use anyhow::{Context, Result};
use serde_json::Value;
use shiplog_runtime::{Record, RecordKind};

/// Assert that `name` resolved to `expected`.
pub fn assert_field(record: &Record, name: &str, expected: &Value) -> Result<()> {
    let actual = record
        .fields
        .get(name)
        .with_context(|| format!("Field '{}' is absent", name))?;

    if actual != expected {
        anyhow::bail!("Field '{}' is {} but expected {}", name, actual, expected);
    }

    Ok(())
}

/// Assert that `name` was requested but resolved to absent.
pub fn assert_absent(record: &Record, name: &str) -> Result<()> {
    if !record.fields.contains(name) {
        anyhow::bail!("Field '{}' was never requested", name);
    }
    if let Some(value) = record.fields.get(name) {
        anyhow::bail!("Field '{}' should be absent but is {}", name, value);
    }
    Ok(())
}

/// Assert the kinds of the shipped records, in order.
pub fn assert_kinds(records: &[Record], expected: &[RecordKind]) -> Result<()> {
    let kinds: Vec<RecordKind> = records.iter().map(|record| record.kind).collect();
    if kinds != expected {
        anyhow::bail!("Expected record kinds {:?}, got {:?}", expected, kinds);
    }
    Ok(())
}
