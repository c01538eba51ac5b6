use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::errors::{ConfigError, RegistryError};

/// A catalog entry for an MFA mechanism. Only `id` takes part in validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Catalog ranking; carried along for callers, not consulted here.
    #[serde(default)]
    pub order: i32,
}

impl ProviderDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None, order: 0 }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// The application that asked for the context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredService {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RegisteredService {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None }
    }
}

/// Lookup from a context identifier to the provider able to satisfy it.
///
/// Implementations may block on I/O; timeouts and retries are theirs to
/// handle. An `Err` is treated by the validator exactly like `Ok(None)`.
pub trait ProviderRegistry: Send + Sync {
    fn find_provider(&self, context_id: &str) -> Result<Option<ProviderDescriptor>, RegistryError>;

    /// Service-aware lookup. Catalogs with per-service overrides replace this.
    fn find_provider_for_service(
        &self,
        context_id: &str,
        _service: Option<&RegisteredService>,
    ) -> Result<Option<ProviderDescriptor>, RegistryError> {
        self.find_provider(context_id)
    }
}

/// Thread-safe in-memory catalog, cheap to clone.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRegistry {
    inner: Arc<HashMap<String, ProviderDescriptor>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn with_providers<I>(providers: I) -> Self
    where
        I: IntoIterator<Item = ProviderDescriptor>,
    {
        let map = providers.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self { inner: Arc::new(map) }
    }

    /// Insert or replace the provider registered under its id.
    pub fn register(&mut self, provider: ProviderDescriptor) {
        let map = Arc::make_mut(&mut self.inner);
        map.insert(provider.id.clone(), provider);
    }

    pub fn len(&self) -> usize { self.inner.len() }

    pub fn is_empty(&self) -> bool { self.inner.is_empty() }

    /// Catalog from a JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let providers: Vec<ProviderDescriptor> = serde_json::from_str(json)?;
        Ok(Self::with_providers(providers))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&raw)?)
    }
}

impl ProviderRegistry for InMemoryRegistry {
    fn find_provider(&self, context_id: &str) -> Result<Option<ProviderDescriptor>, RegistryError> {
        Ok(self.inner.get(context_id).cloned())
    }
}
