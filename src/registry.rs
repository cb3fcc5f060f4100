//! Name-to-factory registry for handler and filter types.
//!
//! Configuration refers to component types by name. A bare name resolves
//! against the kind's default namespace; a qualified `ns.Name` resolves
//! against the namespace `ns` (which may itself contain dots; the split is
//! at the last one). Hosts populate the registry at startup with explicit
//! registration calls; nothing is discovered at resolution time.

use std::collections::HashMap;
use std::fmt;

use crate::component::{BoxError, ComponentArgs, StorageFilter, StorageHandler};
use crate::error::StorewireError;
use crate::params::ParamSpec;

/// Default namespace for handler type names without an explicit namespace.
pub const HANDLER_NAMESPACE: &str = "handlers";

/// Default namespace for filter type names without an explicit namespace.
pub const FILTER_NAMESPACE: &str = "filters";

pub type HandlerFactory =
    Box<dyn Fn(ComponentArgs) -> Result<Box<dyn StorageHandler>, BoxError> + Send + Sync>;

pub type FilterFactory =
    Box<dyn Fn(ComponentArgs) -> Result<Box<dyn StorageFilter>, BoxError> + Send + Sync>;

struct Entry<F> {
    params: &'static ParamSpec,
    factory: F,
}

type NamespaceTable<F> = HashMap<String, HashMap<String, Entry<F>>>;

/// Registered component types, grouped by kind and namespace.
pub struct Registry {
    handlers: NamespaceTable<HandlerFactory>,
    filters: NamespaceTable<FilterFactory>,
}

impl Registry {
    /// An empty registry with the two default namespaces present, so an
    /// unregistered name in a default namespace reports "no component"
    /// rather than "namespace not registered".
    pub fn new() -> Self {
        let mut handlers = NamespaceTable::new();
        handlers.insert(HANDLER_NAMESPACE.to_string(), HashMap::new());
        let mut filters = NamespaceTable::new();
        filters.insert(FILTER_NAMESPACE.to_string(), HashMap::new());
        Self { handlers, filters }
    }

    /// Register a handler type under the default handler namespace.
    pub fn register_handler<F>(&mut self, name: &str, params: &'static ParamSpec, factory: F)
    where
        F: Fn(ComponentArgs) -> Result<Box<dyn StorageHandler>, BoxError> + Send + Sync + 'static,
    {
        self.register_handler_in(HANDLER_NAMESPACE, name, params, factory);
    }

    /// Register a handler type under an explicit namespace. A second
    /// registration of the same name replaces the first.
    pub fn register_handler_in<F>(
        &mut self,
        namespace: &str,
        name: &str,
        params: &'static ParamSpec,
        factory: F,
    ) where
        F: Fn(ComponentArgs) -> Result<Box<dyn StorageHandler>, BoxError> + Send + Sync + 'static,
    {
        self.handlers.entry(namespace.to_string()).or_default().insert(
            name.to_string(),
            Entry {
                params,
                factory: Box::new(factory),
            },
        );
    }

    /// Register a filter type under the default filter namespace.
    pub fn register_filter<F>(&mut self, name: &str, params: &'static ParamSpec, factory: F)
    where
        F: Fn(ComponentArgs) -> Result<Box<dyn StorageFilter>, BoxError> + Send + Sync + 'static,
    {
        self.register_filter_in(FILTER_NAMESPACE, name, params, factory);
    }

    /// Register a filter type under an explicit namespace.
    pub fn register_filter_in<F>(
        &mut self,
        namespace: &str,
        name: &str,
        params: &'static ParamSpec,
        factory: F,
    ) where
        F: Fn(ComponentArgs) -> Result<Box<dyn StorageFilter>, BoxError> + Send + Sync + 'static,
    {
        self.filters.entry(namespace.to_string()).or_default().insert(
            name.to_string(),
            Entry {
                params,
                factory: Box::new(factory),
            },
        );
    }

    pub(crate) fn resolve_handler(
        &self,
        reference: &str,
    ) -> Result<Resolved<'_, HandlerFactory>, ResolveError> {
        resolve_in(&self.handlers, HANDLER_NAMESPACE, reference)
    }

    pub(crate) fn resolve_filter(
        &self,
        reference: &str,
    ) -> Result<Resolved<'_, FilterFactory>, ResolveError> {
        resolve_in(&self.filters, FILTER_NAMESPACE, reference)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut handler_namespaces: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        let mut filter_namespaces: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        handler_namespaces.sort_unstable();
        filter_namespaces.sort_unstable();
        f.debug_struct("Registry")
            .field("handler_namespaces", &handler_namespaces)
            .field("filter_namespaces", &filter_namespaces)
            .finish()
    }
}

/// A resolved type reference: the declared parameter spec plus the factory.
/// Computed on demand and never cached across setup calls.
pub(crate) struct Resolved<'r, F> {
    pub params: &'static ParamSpec,
    pub factory: &'r F,
}

impl<F> fmt::Debug for Resolved<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Why a reference failed to resolve; the builder adds the key location.
#[derive(Debug)]
pub(crate) struct ResolveError {
    missing_namespace: bool,
    namespace: String,
    name: String,
}

impl ResolveError {
    pub(crate) fn locate(self, key: &str) -> StorewireError {
        if self.missing_namespace {
            StorewireError::UnknownNamespace {
                key: key.to_string(),
                namespace: self.namespace,
            }
        } else {
            StorewireError::UnknownComponent {
                key: key.to_string(),
                namespace: self.namespace,
                name: self.name,
            }
        }
    }
}

fn resolve_in<'r, F>(
    table: &'r NamespaceTable<F>,
    default_namespace: &str,
    reference: &str,
) -> Result<Resolved<'r, F>, ResolveError> {
    let (namespace, name) = split_reference(default_namespace, reference);

    let Some(entries) = table.get(namespace) else {
        return Err(ResolveError {
            missing_namespace: true,
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
    };
    let Some(entry) = entries.get(name) else {
        return Err(ResolveError {
            missing_namespace: false,
            namespace: namespace.to_string(),
            name: name.to_string(),
        });
    };

    Ok(Resolved {
        params: entry.params,
        factory: &entry.factory,
    })
}

/// Split `ns.Name` at the last dot; a bare or dot-prefixed name falls back
/// to the default namespace.
fn split_reference<'a>(default_namespace: &'a str, reference: &'a str) -> (&'a str, &'a str) {
    match reference.rsplit_once('.') {
        Some((namespace, name)) if !namespace.is_empty() => (namespace, name),
        Some((_, name)) => (default_namespace, name),
        None => (default_namespace, reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{FILTER_BASE, HANDLER_BASE};

    #[derive(Debug)]
    struct NullHandler;

    impl StorageHandler for NullHandler {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[derive(Debug)]
    struct NullFilter;

    impl StorageFilter for NullFilter {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn registry() -> Registry {
        let mut registry = Registry::new();
        registry.register_handler("NullHandler", &HANDLER_BASE, |_| Ok(Box::new(NullHandler)));
        registry.register_handler_in("cloud.aws", "NullHandler", &HANDLER_BASE, |_| {
            Ok(Box::new(NullHandler))
        });
        registry.register_filter("NullFilter", &FILTER_BASE, |_| Ok(Box::new(NullFilter)));
        registry
    }

    #[test]
    fn bare_name_resolves_in_default_namespace() {
        let registry = registry();
        let resolved = registry.resolve_handler("NullHandler");
        assert!(resolved.is_ok());
    }

    #[test]
    fn qualified_name_resolves_in_named_namespace() {
        let registry = registry();
        let resolved = registry.resolve_handler("cloud.aws.NullHandler");
        assert!(resolved.is_ok());
    }

    #[test]
    fn unknown_namespace_is_its_own_failure() {
        let err = registry().resolve_handler("nowhere.Thing").unwrap_err();
        let located = err.locate("store.handler");
        assert!(matches!(located, StorewireError::UnknownNamespace { .. }));
        assert!(located.to_string().contains("nowhere"));
    }

    #[test]
    fn unknown_name_in_default_namespace() {
        let err = registry().resolve_handler("MissingHandler").unwrap_err();
        let located = err.locate("store.handler");
        assert!(matches!(located, StorewireError::UnknownComponent { .. }));
        assert!(located.to_string().contains("MissingHandler"));
    }

    #[test]
    fn filters_and_handlers_are_separate_tables() {
        let registry = registry();
        assert!(registry.resolve_filter("NullFilter").is_ok());
        assert!(registry.resolve_filter("NullHandler").is_err());
        assert!(registry.resolve_handler("NullFilter").is_err());
    }

    #[test]
    fn empty_registry_reports_missing_name_not_namespace() {
        let err = Registry::new().resolve_handler("Anything").unwrap_err();
        let located = err.locate("store.handler");
        assert!(matches!(located, StorewireError::UnknownComponent { .. }));
    }

    #[test]
    fn reregistration_replaces() {
        let mut registry = registry();
        registry.register_handler("NullHandler", &HANDLER_BASE, |_| {
            Err("always fails".into())
        });
        let resolved = registry.resolve_handler("NullHandler").unwrap();
        assert!((resolved.factory)(ComponentArgs::default()).is_err());
    }

    #[test]
    fn split_reference_cases() {
        assert_eq!(split_reference("handlers", "X"), ("handlers", "X"));
        assert_eq!(split_reference("handlers", "a.X"), ("a", "X"));
        assert_eq!(split_reference("handlers", "a.b.X"), ("a.b", "X"));
        assert_eq!(split_reference("handlers", ".X"), ("handlers", "X"));
    }
}
