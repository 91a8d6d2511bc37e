// Error types
pub mod error;

// Field name constants
pub mod names;

// Resolver function type and request bindings
pub mod resolver;

// Resolution scope (occurrence + ambient state)
pub mod scope;

// Built-in resolvers
pub mod builtin;

// Registry
pub mod registry;

pub use builtin::from_session;
pub use error::{Error, Result};
pub use registry::FieldRegistry;
pub use resolver::{FieldBinding, FieldRequest, Resolver, resolver};
pub use scope::Scope;
