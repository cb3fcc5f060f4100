//! Recursive assembly of configured stores: the resolution core.
//!
//! Data flows one direction, from flat settings through the normalized tree
//! into the instantiated component graph. Control flow is recursive descent
//! over the tree, mirroring the container hierarchy being built. Nothing
//! here performs I/O or keeps state between setup calls.

use tracing::{debug, trace};

use crate::component::{ComponentArgs, StorageFilter, StorageHandler};
use crate::container::StorageContainer;
use crate::error::{StorewireError, closest_match};
use crate::literal;
use crate::registry::Registry;
use crate::tree::{self, ConfigNode};

/// Default settings-key prefix.
pub const DEFAULT_PREFIX: &str = "store";

/// Entry point: configure a [`StorageContainer`] tree from flat settings.
///
/// ```
/// # use storewire::{Registry, Setup, StorageContainer};
/// # let registry = Registry::new();
/// # let mut store = StorageContainer::new();
/// let settings: Vec<(String, String)> = Vec::new();
/// let configured = Setup::new(&registry)
///     .key_prefix("uploads")
///     .configure(settings, &mut store)?;
/// assert!(!configured);
/// # Ok::<(), storewire::StorewireError>(())
/// ```
pub struct Setup<'r> {
    registry: &'r Registry,
    key_prefix: String,
}

impl<'r> Setup<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            key_prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Override the settings prefix (default `"store"`). Only keys beginning
    /// `prefix.` or `prefix[` take part in configuration.
    pub fn key_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// Configure `store` from `settings`, returning whether any matching
    /// configuration was found.
    ///
    /// With no matching keys the store's handler is set to disabled and
    /// `Ok(false)` comes back: an unconfigured store is deliberately inert,
    /// not an error. The store is not finalized either way; that is the
    /// host's separate step once every store is wired.
    pub fn configure<K, V>(
        &self,
        settings: impl IntoIterator<Item = (K, V)>,
        store: &mut StorageContainer,
    ) -> Result<bool, StorewireError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let node = tree::collect_prefix(&self.key_prefix, settings);
        if node.is_empty() {
            debug!(prefix = %self.key_prefix, "no storage settings found; store disabled");
            store.set_handler(None)?;
            return Ok(false);
        }

        debug!(prefix = %self.key_prefix, "configuring store from settings");
        setup_store(self.registry, store, &self.key_prefix, node)?;
        Ok(true)
    }
}

/// Configure one store from its subtree, then recurse into bracket-quoted
/// child keys.
fn setup_store(
    registry: &Registry,
    store: &mut StorageContainer,
    key_prefix: &str,
    mut node: ConfigNode,
) -> Result<(), StorewireError> {
    let handler_node = node.children.remove("handler");
    let type_name = handler_node
        .as_ref()
        .and_then(|handler_node| handler_node.value.clone())
        .ok_or_else(|| StorewireError::MissingHandler {
            key: key_prefix.to_string(),
        })?;

    let handler = if type_name.eq_ignore_ascii_case("none") {
        None
    } else {
        let handler_node = handler_node.unwrap_or_default();
        let key = format!("{key_prefix}.handler");
        Some(build_handler(registry, &key, &type_name, handler_node)?)
    };
    store.set_handler(handler)?;

    for (key, child_node) in node.children {
        let Some(name) = substore_name(&key) else {
            return Err(StorewireError::UnknownKey {
                key: format!("{key_prefix}.{key}"),
            });
        };
        let child_prefix = format!("{key_prefix}{key}");
        setup_store(registry, store.child(name), &child_prefix, child_node)?;
    }
    Ok(())
}

/// The name inside a `['name']` / `["name"]` child key; `None` for any other
/// key shape.
fn substore_name(key: &str) -> Option<&str> {
    let inner = key.strip_prefix('[')?.strip_suffix(']')?;
    inner
        .strip_prefix('\'')
        .and_then(|inner| inner.strip_suffix('\''))
        .or_else(|| {
            inner
                .strip_prefix('"')
                .and_then(|inner| inner.strip_suffix('"'))
        })
}

/// Resolve, validate, and instantiate one handler.
fn build_handler(
    registry: &Registry,
    key: &str,
    type_name: &str,
    node: ConfigNode,
) -> Result<Box<dyn StorageHandler>, StorewireError> {
    let resolved = registry
        .resolve_handler(type_name)
        .map_err(|err| err.locate(key))?;
    trace!(key, type_name, "resolved handler type");

    let accepted = resolved.params.accepted();
    let mut args = ComponentArgs::default();
    for (arg_name, child) in node.children {
        if arg_name == "filters" {
            args.insert_filters(build_filter_chain(registry, key, child)?);
        } else if !accepted.contains(arg_name.as_str()) {
            return Err(StorewireError::UnknownArgument {
                suggestion: closest_match(&arg_name, accepted.iter().copied()),
                key: key.to_string(),
                argument: arg_name,
            });
        } else {
            let value = literal::decode_leaf(&format!("{key}.{arg_name}"), &child)?;
            args.insert_literal(arg_name, value);
        }
    }

    (resolved.factory)(args).map_err(|err| StorewireError::Construction {
        key: key.to_string(),
        reason: err.to_string(),
    })
}

/// Build the ordered filter chain under a handler's `filters` key.
///
/// Order comes from the ascending integer index in each bracket key, not
/// from the order keys appear in the settings map.
fn build_filter_chain(
    registry: &Registry,
    key_prefix: &str,
    node: ConfigNode,
) -> Result<Vec<Box<dyn StorageFilter>>, StorewireError> {
    let mut indexed: Vec<(i64, Box<dyn StorageFilter>)> = Vec::new();
    for (index_key, filter_node) in node.children {
        let filter_key = format!("{key_prefix}.filters{index_key}");
        let index: i64 = index_key
            .trim_start_matches('[')
            .trim_end_matches(']')
            .trim()
            .parse()
            .map_err(|err: std::num::ParseIntError| StorewireError::BadFilterIndex {
                key: filter_key.clone(),
                reason: err.to_string(),
            })?;
        indexed.push((index, build_filter(registry, &filter_key, filter_node)?));
    }

    indexed.sort_by_key(|(index, _)| *index);
    debug!(key = key_prefix, count = indexed.len(), "built filter chain");
    Ok(indexed.into_iter().map(|(_, filter)| filter).collect())
}

/// Resolve, validate, and instantiate one filter. Filters take no nested
/// sub-components; every child key must be a declared argument.
fn build_filter(
    registry: &Registry,
    key: &str,
    mut node: ConfigNode,
) -> Result<Box<dyn StorageFilter>, StorewireError> {
    let type_name = node.value.take().ok_or_else(|| StorewireError::MissingValue {
        key: key.to_string(),
    })?;
    let resolved = registry
        .resolve_filter(&type_name)
        .map_err(|err| err.locate(key))?;
    trace!(key, type_name, "resolved filter type");

    let accepted = resolved.params.accepted();
    let mut args = ComponentArgs::default();
    for (arg_name, child) in node.children {
        if !accepted.contains(arg_name.as_str()) {
            return Err(StorewireError::UnknownArgument {
                suggestion: closest_match(&arg_name, accepted.iter().copied()),
                key: key.to_string(),
                argument: arg_name,
            });
        }
        let value = literal::decode_leaf(&format!("{key}.{arg_name}"), &child)?;
        args.insert_literal(arg_name, value);
    }

    (resolved.factory)(args).map_err(|err| StorewireError::Construction {
        key: key.to_string(),
        reason: err.to_string(),
    })
}
