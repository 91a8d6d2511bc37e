use shiplog_types::FieldValue;
use std::fmt;
use std::sync::Arc;

use crate::scope::Scope;

/// Computes one field from a resolution scope; `None` means the field is absent
pub type Resolver = Arc<dyn Fn(&Scope<'_>) -> Option<FieldValue> + Send + Sync>;

/// Wrap a closure as a [`Resolver`]
pub fn resolver<F>(f: F) -> Resolver
where
    F: Fn(&Scope<'_>) -> Option<FieldValue> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// How a requested field finds its resolver
#[derive(Clone)]
pub enum FieldBinding {
    /// Resolver registered under this name
    Named(String),
    /// Resolver supplied directly by the caller
    Inline(Resolver),
    /// Only the first element is invoked; the rest is reserved
    Sequence(Vec<FieldBinding>),
}

impl FieldBinding {
    pub fn named(name: impl Into<String>) -> Self {
        FieldBinding::Named(name.into())
    }

    pub fn inline<F>(f: F) -> Self
    where
        F: Fn(&Scope<'_>) -> Option<FieldValue> + Send + Sync + 'static,
    {
        FieldBinding::Inline(resolver(f))
    }

    /// The binding that is actually invoked
    pub fn primary(&self) -> Option<&FieldBinding> {
        match self {
            FieldBinding::Sequence(items) => items.first().and_then(FieldBinding::primary),
            other => Some(other),
        }
    }
}

impl fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldBinding::Named(name) => f.debug_tuple("Named").field(name).finish(),
            FieldBinding::Inline(_) => f.write_str("Inline(..)"),
            FieldBinding::Sequence(items) => f.debug_tuple("Sequence").field(items).finish(),
        }
    }
}

impl From<&str> for FieldBinding {
    fn from(name: &str) -> Self {
        FieldBinding::named(name)
    }
}

impl From<String> for FieldBinding {
    fn from(name: String) -> Self {
        FieldBinding::Named(name)
    }
}

impl From<Resolver> for FieldBinding {
    fn from(resolver: Resolver) -> Self {
        FieldBinding::Inline(resolver)
    }
}

/// One entry of the requested field map: output name and its binding
#[derive(Debug, Clone)]
pub struct FieldRequest {
    pub name: String,
    pub binding: FieldBinding,
}

impl FieldRequest {
    pub fn new(name: impl Into<String>, binding: impl Into<FieldBinding>) -> Self {
        Self {
            name: name.into(),
            binding: binding.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_of_sequence_is_first_element() {
        let binding = FieldBinding::Sequence(vec![
            FieldBinding::named("getUrl"),
            FieldBinding::named("ignored"),
        ]);
        match binding.primary() {
            Some(FieldBinding::Named(name)) => assert_eq!(name, "getUrl"),
            other => panic!("Expected Named binding, got {:?}", other),
        }
    }

    #[test]
    fn test_primary_of_nested_sequence() {
        let binding = FieldBinding::Sequence(vec![FieldBinding::Sequence(vec![
            FieldBinding::named("getUserId"),
        ])]);
        assert!(matches!(binding.primary(), Some(FieldBinding::Named(n)) if n == "getUserId"));
    }

    #[test]
    fn test_primary_of_empty_sequence() {
        assert!(FieldBinding::Sequence(Vec::new()).primary().is_none());
    }
}
