//! Testing infrastructure for shiplog integration tests.
//!
//! This crate provides utilities for writing integration tests:
//! - `TestHost`: fluent builder for a bootstrapped client fed with host events
//! - `MemoryTransport`: transport keeping shipped records in memory
//! - `fixtures`: sample errors, requests and auth probes
//! - `assertions`: checks on shipped records

pub mod assertions;
pub mod fixtures;
pub mod transport;
pub mod world;

pub use transport::MemoryTransport;
pub use world::{TestHost, TestRequest};
