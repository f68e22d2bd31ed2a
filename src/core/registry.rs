//! Typed service registry.
//!
//! A [`Registry`] maps capability names to shared service values. A
//! [`Resolver`] binds one registry and forwards reads and writes to it, so
//! consumers can treat a resolver as a bag of named services.

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use miette::Diagnostic;
use thiserror::Error;

/// A shared, type-erased service.
pub type Service = Arc<dyn Any + Send + Sync>;

/// Errors raised when looking up services.
#[derive(Debug, Error, Diagnostic, PartialEq, Eq)]
pub enum RegistryError {
    #[error("resolver has no registry bound")]
    #[diagnostic(
        code(pax::registry::unbound),
        help("call `init_registry` before reading or writing services")
    )]
    Unbound,

    #[error("no service registered under `{key}`")]
    #[diagnostic(code(pax::registry::missing))]
    Missing { key: String },

    #[error("service `{key}` is not a `{expected}`")]
    #[diagnostic(code(pax::registry::type_mismatch))]
    TypeMismatch { key: String, expected: &'static str },
}

/// Well-known services exposed to theme resolvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Image,
    Store,
    Response,
    Currency,
    ModelStoreProduct,
    Load,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Image => "image",
            Capability::Store => "store",
            Capability::Response => "response",
            Capability::Currency => "currency",
            Capability::ModelStoreProduct => "model_store_product",
            Capability::Load => "load",
        }
    }
}

impl AsRef<str> for Capability {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<Capability> for String {
    fn from(capability: Capability) -> Self {
        capability.as_str().to_string()
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value store of services.
#[derive(Clone, Default)]
pub struct Registry {
    services: HashMap<String, Service>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry {
            services: HashMap::new(),
        }
    }

    /// Register `value` under `key`, returning the service it replaced.
    pub fn set<T>(&mut self, key: impl Into<String>, value: T) -> Option<Service>
    where
        T: Any + Send + Sync,
    {
        self.set_shared(key, Arc::new(value))
    }

    /// Register an already shared service under `key`.
    pub fn set_shared<T>(&mut self, key: impl Into<String>, value: Arc<T>) -> Option<Service>
    where
        T: Any + Send + Sync,
    {
        let key = key.into();
        tracing::debug!("registering service `{}`", key);
        self.services.insert(key, value)
    }

    /// Look up the service under `key` as a `T`.
    pub fn get<T>(&self, key: impl AsRef<str>) -> Result<Arc<T>, RegistryError>
    where
        T: Any + Send + Sync,
    {
        let key = key.as_ref();
        let service = self
            .services
            .get(key)
            .ok_or_else(|| RegistryError::Missing {
                key: key.to_string(),
            })?;

        Arc::clone(service)
            .downcast::<T>()
            .map_err(|_| RegistryError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.services.contains_key(key.as_ref())
    }

    pub fn remove(&mut self, key: impl AsRef<str>) -> Option<Service> {
        self.services.remove(key.as_ref())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.services.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("services", &self.keys())
            .finish()
    }
}

/// Forwards named service access to a bound [`Registry`].
#[derive(Debug, Default)]
pub struct Resolver {
    registry: Option<Registry>,
}

impl Resolver {
    /// Create a resolver with no registry bound.
    pub fn new() -> Self {
        Resolver { registry: None }
    }

    /// Bind `registry`, returning the previously bound one.
    pub fn init_registry(&mut self, registry: Registry) -> Option<Registry> {
        self.registry.replace(registry)
    }

    pub fn registry(&self) -> Option<&Registry> {
        self.registry.as_ref()
    }

    pub fn into_registry(self) -> Option<Registry> {
        self.registry
    }

    /// Read a service from the bound registry.
    pub fn get<T>(&self, key: impl AsRef<str>) -> Result<Arc<T>, RegistryError>
    where
        T: Any + Send + Sync,
    {
        self.registry
            .as_ref()
            .ok_or(RegistryError::Unbound)?
            .get(key)
    }

    /// Write a service into the bound registry.
    pub fn set<T>(&mut self, key: impl Into<String>, value: T) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
    {
        self.registry
            .as_mut()
            .ok_or(RegistryError::Unbound)?
            .set(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Currency {
        code: &'static str,
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let mut resolver = Resolver::new();
        resolver.init_registry(Registry::new());

        resolver
            .set(Capability::Currency, Currency { code: "EUR" })
            .unwrap();

        let currency = resolver.get::<Currency>(Capability::Currency).unwrap();
        assert_eq!(*currency, Currency { code: "EUR" });
    }

    #[test]
    fn test_set_overwrites() {
        let mut registry = Registry::new();
        assert!(registry.set("store", 1u32).is_none());
        assert!(registry.set("store", 2u32).is_some());

        assert_eq!(*registry.get::<u32>("store").unwrap(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unbound_resolver() {
        let mut resolver = Resolver::new();
        assert_eq!(
            resolver.get::<u32>("store").unwrap_err(),
            RegistryError::Unbound
        );
        assert_eq!(resolver.set("store", 1u32), Err(RegistryError::Unbound));
    }

    #[test]
    fn test_missing_and_mismatched() {
        let mut registry = Registry::new();
        registry.set(Capability::Image, String::from("resizer"));

        assert_eq!(
            registry.get::<String>("load").unwrap_err(),
            RegistryError::Missing {
                key: "load".to_string()
            }
        );
        assert!(matches!(
            registry.get::<u32>(Capability::Image),
            Err(RegistryError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_shared_service_is_not_copied() {
        let shared = Arc::new(String::from("catalog"));
        let mut registry = Registry::new();
        registry.set_shared(Capability::ModelStoreProduct, Arc::clone(&shared));

        let fetched = registry
            .get::<String>(Capability::ModelStoreProduct)
            .unwrap();
        assert!(Arc::ptr_eq(&shared, &fetched));
    }

    #[test]
    fn test_rebinding_returns_previous_registry() {
        let mut first = Registry::new();
        first.set("response", 200u16);

        let mut resolver = Resolver::new();
        assert!(resolver.init_registry(first).is_none());

        let previous = resolver.init_registry(Registry::new()).unwrap();
        assert!(previous.contains("response"));
        assert!(resolver.registry().unwrap().is_empty());
    }

    #[test]
    fn test_keys_sorted() {
        let mut registry = Registry::new();
        registry.set(Capability::Store, ());
        registry.set(Capability::Currency, ());
        registry.set(Capability::Load, ());

        assert_eq!(registry.keys(), vec!["currency", "load", "store"]);
        assert!(registry.remove("load").is_some());
        assert!(!registry.contains(Capability::Load));
    }
}
