use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use shiplog_fields::{FieldBinding, FieldRegistry, FieldRequest, names};
use shiplog_types::Level;
use std::collections::HashSet;
use std::path::Path;

/// Resolver reference as written in the config file: a single name, or a
/// list whose first element is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResolverSpec {
    Name(String),
    Sequence(Vec<String>),
}

impl ResolverSpec {
    pub fn binding(&self) -> FieldBinding {
        match self {
            ResolverSpec::Name(name) => FieldBinding::named(name.as_str()),
            ResolverSpec::Sequence(names) => FieldBinding::Sequence(
                names.iter().map(|name| FieldBinding::named(name.as_str())).collect(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub name: String,
    pub resolver: ResolverSpec,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, resolver: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolver: ResolverSpec::Name(resolver.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Master switch; a disabled integration subscribes to nothing
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Record executed SQL statements into the collector
    #[serde(default = "default_true")]
    pub sql_enabled: bool,
    /// Overrides the environment reported by the host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default)]
    pub ignored_levels: Vec<Level>,
    /// Max records kept per collector category within one unit of work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_limit: Option<usize>,
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldConfig>,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            sql_enabled: true,
            environment: None,
            ignored_levels: Vec::new(),
            collector_limit: None,
            fields: default_fields(),
        }
    }
}

/// Every built-in resolver under its snake_case field name
pub fn default_fields() -> Vec<FieldConfig> {
    names::DEFAULT_RESOLVERS
        .iter()
        .map(|resolver| FieldConfig::new(field_name_for(resolver), *resolver))
        .collect()
}

/// `getClientUserAgent` -> `client_user_agent`
pub fn field_name_for(resolver: &str) -> String {
    let stem = resolver.strip_prefix("get").unwrap_or(resolver);
    let mut name = String::with_capacity(stem.len() + 4);
    for (i, c) in stem.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                name.push('_');
            }
            name.push(c.to_ascii_lowercase());
        } else {
            name.push(c);
        }
    }
    name
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Requested fields in config order, as handed to the registry
    pub fn field_requests(&self) -> Vec<FieldRequest> {
        self.fields
            .iter()
            .map(|field| FieldRequest::new(field.name.as_str(), field.resolver.binding()))
            .collect()
    }

    /// Fail fast on anything that would only surface once events flow
    pub fn validate(&self, registry: &FieldRegistry) -> Result<()> {
        if self.collector_limit == Some(0) {
            return Err(Error::Config(
                "collector_limit must be greater than zero".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(Error::Config("field name must not be empty".to_string()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(Error::Config(format!(
                    "field '{}' is configured twice",
                    field.name
                )));
            }
        }

        registry.check(&self.field_requests())?;
        Ok(())
    }
}
