//! Concurrent units of work never observe each other's state.

use serde_json::json;
use shiplog_core::{SQL_QUERIES, UnitOfWork};
use std::collections::HashSet;
use std::thread;

#[test]
fn test_units_on_separate_threads_are_isolated() {
    let handles: Vec<_> = (0..4)
        .map(|worker| {
            thread::spawn(move || {
                let unit = UnitOfWork::new();
                let collector = unit.collector().expect("collector");
                for i in 0..10 {
                    collector.set_in_array(SQL_QUERIES, json!({"worker": worker, "i": i}));
                }
                let records = collector.get_by_key(SQL_QUERIES);
                assert_eq!(records.len(), 10);
                assert!(records.iter().all(|record| record["worker"] == json!(worker)));
                unit.token()
            })
        })
        .collect();

    let tokens: HashSet<String> = handles
        .into_iter()
        .map(|handle| handle.join().expect("worker panicked"))
        .collect();
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_token_stable_within_unit_and_fresh_across_units() {
    let unit = UnitOfWork::new();
    let first = unit.token();
    assert_eq!(unit.token(), first);

    unit.reset();
    let second = unit.token();
    assert_ne!(second, first);
    assert_eq!(unit.token(), second);
}
