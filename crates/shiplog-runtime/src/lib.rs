//! Bootstrap and routing for shiplog.
//!
//! Wires the pieces together for one host process:
//! - [`Config`]: which fields to resolve, which events to listen to
//! - [`Integration`]: routes host events to the classifier and the unit of work
//! - [`Shipper`]: resolves fields for classified occurrences and hands
//!   [`Record`]s to a [`Transport`]
//! - [`Client`]: all of the above behind one handle, with a
//!   [`RequestScope`] per web request

pub mod client;
pub mod config;
pub mod error;
pub mod integration;
pub mod logging;
pub mod sink;
pub mod transport;

pub use client::{Client, RequestScope};
pub use config::{Config, FieldConfig, ResolverSpec, default_fields};
pub use error::{Error, Result};
pub use integration::{Handled, Integration, Target};
pub use sink::{FieldSink, Shipper};
pub use transport::{Record, RecordKind, Transport};
