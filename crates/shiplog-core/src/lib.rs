//! Leaf collaborators of the field registry.
//!
//! - Per unit-of-work state: correlation token and data collector
//! - Read-only facades over the host's request, session and router
//! - Auth probes reporting the signed-in user
//! - Static runtime information fixed at bootstrap

pub mod auth;
pub mod collector;
pub mod context;
pub mod request;
pub mod router;
pub mod runtime;
pub mod session;
pub mod token;
pub mod unit;

pub use auth::{AuthProbe, FnProbe, ProbeError};
pub use collector::{DataCollector, MemoryCollector, SQL_QUERIES};
pub use context::RequestContextSnapshot;
pub use request::{Request, RequestSnapshot};
pub use router::{Route, Router, RouterSnapshot};
pub use runtime::{LOGGER_VERSION, RuntimeInfo};
pub use session::{SessionSnapshot, SessionStore};
pub use token::{CorrelationTokenProvider, TokenProvider};
pub use unit::UnitOfWork;
