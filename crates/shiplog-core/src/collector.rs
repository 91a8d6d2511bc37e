use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Category under which executed SQL statements are collected
pub const SQL_QUERIES: &str = "sql_queries";

/// Accumulating store for the current unit of work, keyed by category
pub trait DataCollector: Send + Sync {
    /// Records collected under `category`, oldest first
    fn get_by_key(&self, category: &str) -> Vec<Value>;

    /// Append a record under `category`
    fn set_in_array(&self, category: &str, record: Value);

    /// Drop everything collected so far
    fn reset(&self);
}

/// In-memory collector with an optional per-category cap.
///
/// Once a category holds `limit` records, further records for it are dropped
/// until the next `reset`.
#[derive(Debug, Default)]
pub struct MemoryCollector {
    limit: Option<usize>,
    store: Mutex<HashMap<String, Vec<Value>>>,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            store: Mutex::default(),
        }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

impl DataCollector for MemoryCollector {
    fn get_by_key(&self, category: &str) -> Vec<Value> {
        let store = self.store.lock().unwrap_or_else(|p| p.into_inner());
        store.get(category).cloned().unwrap_or_default()
    }

    fn set_in_array(&self, category: &str, record: Value) {
        let mut store = self.store.lock().unwrap_or_else(|p| p.into_inner());
        let records = store.entry(category.to_string()).or_default();
        if let Some(limit) = self.limit
            && records.len() >= limit
        {
            tracing::trace!(
                target: "shiplog.collector",
                category,
                limit,
                "collector category full, record dropped"
            );
            return;
        }
        records.push(record);
    }

    fn reset(&self) {
        self.store.lock().unwrap_or_else(|p| p.into_inner()).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_accumulate_per_category() {
        let collector = MemoryCollector::new();
        collector.set_in_array(SQL_QUERIES, json!({"query": "select 1"}));
        collector.set_in_array(SQL_QUERIES, json!({"query": "select 2"}));
        collector.set_in_array("cache_hits", json!("users:1"));

        assert_eq!(
            collector.get_by_key(SQL_QUERIES),
            vec![json!({"query": "select 1"}), json!({"query": "select 2"})]
        );
        assert_eq!(collector.get_by_key("cache_hits").len(), 1);
        assert!(collector.get_by_key("unknown").is_empty());
    }

    #[test]
    fn test_reset_clears_all_categories() {
        let collector = MemoryCollector::new();
        collector.set_in_array(SQL_QUERIES, json!(1));
        collector.set_in_array("other", json!(2));
        collector.reset();

        assert!(collector.get_by_key(SQL_QUERIES).is_empty());
        assert!(collector.get_by_key("other").is_empty());
    }

    #[test]
    fn test_limit_drops_newest_records() {
        let collector = MemoryCollector::with_limit(2);
        for i in 0..5 {
            collector.set_in_array(SQL_QUERIES, json!(i));
        }
        assert_eq!(collector.get_by_key(SQL_QUERIES), vec![json!(0), json!(1)]);

        collector.reset();
        collector.set_in_array(SQL_QUERIES, json!("after reset"));
        assert_eq!(collector.get_by_key(SQL_QUERIES), vec![json!("after reset")]);
    }
}
