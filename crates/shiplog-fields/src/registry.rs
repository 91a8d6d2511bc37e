use shiplog_types::{FieldValue, ResolvedFieldSet};
use std::collections::HashMap;
use std::sync::Arc;

use crate::builtin::BUILTINS;
use crate::error::{Error, Result};
use crate::resolver::{FieldBinding, FieldRequest, Resolver};
use crate::scope::Scope;

/// Named, extensible set of field resolvers
///
/// Registering a name that already exists replaces its resolver and keeps
/// its original registration slot.
#[derive(Clone)]
pub struct FieldRegistry {
    resolvers: HashMap<String, Resolver>,
    order: Vec<String>,
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldRegistry {
    /// Registry holding the built-in resolvers
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (name, builtin) in BUILTINS {
            registry.register(name, Arc::new(builtin));
        }
        registry
    }

    pub fn empty() -> Self {
        Self {
            resolvers: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Insert or replace the resolver for `name`
    pub fn register(&mut self, name: impl Into<String>, resolver: Resolver) {
        let name = name.into();
        if self.resolvers.insert(name.clone(), resolver).is_none() {
            self.order.push(name);
        }
    }

    pub fn register_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&Scope<'_>) -> Option<FieldValue> + Send + Sync + 'static,
    {
        self.register(name, Arc::new(f));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolvers.contains_key(name)
    }

    /// Registered names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Invoke the resolver registered under `name`
    pub fn resolve(&self, name: &str, scope: &Scope<'_>) -> Result<Option<FieldValue>> {
        let resolver = self
            .resolvers
            .get(name)
            .ok_or_else(|| Error::UnregisteredField {
                field: name.to_string(),
                resolver: name.to_string(),
            })?;
        Ok(resolver(scope))
    }

    /// Check that every request is bound to something invocable
    pub fn check(&self, requests: &[FieldRequest]) -> Result<()> {
        for request in requests {
            self.lookup(request)?;
        }
        Ok(())
    }

    /// Resolve every requested field for one occurrence.
    ///
    /// Bindings are checked up front, so an unregistered name fails the
    /// whole call before any resolver runs. Each field name is resolved
    /// once; a repeated name keeps its first value.
    pub fn resolve_values(
        &self,
        requests: &[FieldRequest],
        scope: &Scope<'_>,
    ) -> Result<ResolvedFieldSet> {
        let resolvers = requests
            .iter()
            .map(|request| self.lookup(request).map(|resolver| (request, resolver)))
            .collect::<Result<Vec<_>>>()?;

        let mut resolved = ResolvedFieldSet::with_capacity(requests.len());
        for (request, resolver) in resolvers {
            if resolved.contains(&request.name) {
                tracing::debug!(
                    target: "shiplog.fields",
                    field = %request.name,
                    "field requested twice, keeping first value"
                );
                continue;
            }
            let value = resolver(scope);
            tracing::trace!(
                target: "shiplog.fields",
                field = %request.name,
                present = value.is_some(),
                "field resolved"
            );
            resolved.insert(request.name.clone(), value);
        }
        Ok(resolved)
    }

    fn lookup<'a>(&'a self, request: &'a FieldRequest) -> Result<&'a Resolver> {
        match request.binding.primary() {
            Some(FieldBinding::Inline(resolver)) => Ok(resolver),
            Some(FieldBinding::Named(name)) => {
                self.resolvers
                    .get(name)
                    .ok_or_else(|| Error::UnregisteredField {
                        field: request.name.clone(),
                        resolver: name.clone(),
                    })
            }
            Some(FieldBinding::Sequence(_)) | None => {
                Err(Error::EmptyBinding(request.name.clone()))
            }
        }
    }
}

impl std::fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("resolvers", &self.order)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::names;
    use serde_json::json;
    use shiplog_core::{RequestContextSnapshot, RuntimeInfo, UnitOfWork};
    use shiplog_types::{Context, HostVersion, Level, LogOccurrence};

    struct Fixture {
        occurrence: LogOccurrence,
        request: RequestContextSnapshot,
        runtime: RuntimeInfo,
        unit: UnitOfWork,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                occurrence: LogOccurrence::new(Level::Info, "hello", Context::new()),
                request: RequestContextSnapshot::empty(),
                runtime: RuntimeInfo::new(HostVersion::new("5.6.40")).with_environment("production"),
                unit: UnitOfWork::new(),
            }
        }

        fn scope(&self) -> Scope<'_> {
            Scope::new(&self.occurrence, &self.request, &self.runtime, &self.unit)
        }
    }

    #[test]
    fn test_new_registers_builtins_in_order() {
        let registry = FieldRegistry::new();
        let names: Vec<&str> = registry.names().collect();
        assert_eq!(names, names::DEFAULT_RESOLVERS.to_vec());
        assert!(!registry.contains(names::GET_FROM_SESSION));
    }

    #[test]
    fn test_register_replaces_and_keeps_slot() {
        let mut registry = FieldRegistry::new();
        registry.register_fn(names::GET_ENVIRONMENT, |_| Some(json!("overridden")));
        assert_eq!(registry.len(), names::DEFAULT_RESOLVERS.len());

        let position = registry.names().position(|n| n == names::GET_ENVIRONMENT);
        assert_eq!(position, Some(7));

        let fixture = Fixture::new();
        let value = registry.resolve(names::GET_ENVIRONMENT, &fixture.scope()).unwrap();
        assert_eq!(value, Some(json!("overridden")));
    }

    #[test]
    fn test_resolve_values_in_request_order() {
        let registry = FieldRegistry::new();
        let fixture = Fixture::new();
        let requests = vec![
            FieldRequest::new("url", names::GET_URL),
            FieldRequest::new("env", names::GET_ENVIRONMENT),
            FieldRequest::new("version", names::GET_LARAVEL_VERSION),
        ];

        let resolved = registry.resolve_values(&requests, &fixture.scope()).unwrap();
        let names: Vec<&str> = resolved.names().collect();
        assert_eq!(names, vec!["url", "env", "version"]);
        assert!(resolved.is_absent("url"));
        assert_eq!(resolved.get("env"), Some(&json!("production")));
        assert_eq!(resolved.get("version"), Some(&json!("5.6.40")));
    }

    #[test]
    fn test_unregistered_name_fails_before_resolving() {
        let registry = FieldRegistry::new();
        let fixture = Fixture::new();
        let requests = vec![
            FieldRequest::new("env", names::GET_ENVIRONMENT),
            FieldRequest::new("tenant", "getTenant"),
        ];

        let err = registry.resolve_values(&requests, &fixture.scope()).unwrap_err();
        assert_eq!(
            err,
            Error::UnregisteredField {
                field: "tenant".to_string(),
                resolver: "getTenant".to_string(),
            }
        );
        assert!(registry.check(&requests).is_err());
    }

    #[test]
    fn test_sequence_binding_uses_first_element() {
        let registry = FieldRegistry::new();
        let fixture = Fixture::new();
        let requests = vec![FieldRequest::new(
            "env",
            FieldBinding::Sequence(vec![
                FieldBinding::named(names::GET_ENVIRONMENT),
                FieldBinding::named("notRegisteredButReserved"),
            ]),
        )];

        let resolved = registry.resolve_values(&requests, &fixture.scope()).unwrap();
        assert_eq!(resolved.get("env"), Some(&json!("production")));
    }

    #[test]
    fn test_empty_sequence_is_rejected() {
        let registry = FieldRegistry::new();
        let requests = vec![FieldRequest::new("x", FieldBinding::Sequence(Vec::new()))];
        assert_eq!(
            registry.check(&requests).unwrap_err(),
            Error::EmptyBinding("x".to_string())
        );
    }

    #[test]
    fn test_inline_binding() {
        let registry = FieldRegistry::empty();
        let fixture = Fixture::new();
        let requests = vec![FieldRequest::new(
            "level",
            FieldBinding::inline(|scope| Some(json!(scope.occurrence.level.as_str()))),
        )];
        let resolved = registry.resolve_values(&requests, &fixture.scope()).unwrap();
        assert_eq!(resolved.get("level"), Some(&json!("info")));
    }

    #[test]
    fn test_duplicate_field_resolved_once() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut registry = FieldRegistry::empty();
        registry.register_fn("count", move |_| {
            Some(json!(counter.fetch_add(1, Ordering::SeqCst)))
        });

        let fixture = Fixture::new();
        let requests = vec![
            FieldRequest::new("n", "count"),
            FieldRequest::new("n", "count"),
        ];
        let resolved = registry.resolve_values(&requests, &fixture.scope()).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.get("n"), Some(&json!(0)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
