//! The externally-owned tree of configured stores.
//!
//! A container is addressable by name to reach nested child stores, holds at
//! most one handler, and is finalized exactly once by the host after setup.
//! The engine only populates it; ownership stays with the caller. A single
//! container must not be configured from two threads at once: all mutation
//! here assumes exclusive access for the duration of one setup pass.

use std::collections::BTreeMap;

use tracing::debug;

use crate::component::StorageHandler;
use crate::error::StorewireError;

/// The handler slot: never configured, explicitly disabled, or populated.
#[derive(Debug)]
enum HandlerSlot {
    Unset,
    Disabled,
    Active(Box<dyn StorageHandler>),
}

/// One node of the store tree.
#[derive(Debug)]
pub struct StorageContainer {
    label: String,
    slot: HandlerSlot,
    children: BTreeMap<String, StorageContainer>,
    finalized: bool,
}

impl StorageContainer {
    /// A root container labeled `store`, the default settings prefix.
    pub fn new() -> Self {
        Self::labeled("store")
    }

    /// A root container with an explicit label. The label prefixes every
    /// error message about this store and its descendants.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            slot: HandlerSlot::Unset,
            children: BTreeMap::new(),
            finalized: false,
        }
    }

    /// The bracket-quoted lineage of this store, e.g. `store['a']['b']`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Set or disable the handler. `None` records an explicit "no handler";
    /// reassignment and post-finalize assignment are configuration errors.
    pub fn set_handler(
        &mut self,
        handler: Option<Box<dyn StorageHandler>>,
    ) -> Result<(), StorewireError> {
        if self.finalized {
            return Err(StorewireError::Finalized {
                store: self.label.clone(),
            });
        }
        if !matches!(self.slot, HandlerSlot::Unset) {
            return Err(StorewireError::HandlerAlreadySet {
                store: self.label.clone(),
            });
        }
        self.slot = match handler {
            Some(handler) => HandlerSlot::Active(handler),
            None => HandlerSlot::Disabled,
        };
        Ok(())
    }

    /// The configured handler; an error when unset or disabled.
    pub fn handler(&self) -> Result<&dyn StorageHandler, StorewireError> {
        match &self.slot {
            HandlerSlot::Active(handler) => Ok(handler.as_ref()),
            _ => Err(StorewireError::NoHandler {
                store: self.label.clone(),
            }),
        }
    }

    pub fn has_handler(&self) -> bool {
        matches!(self.slot, HandlerSlot::Active(_))
    }

    /// Whether the handler was explicitly configured away.
    pub fn is_disabled(&self) -> bool {
        matches!(self.slot, HandlerSlot::Disabled)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Get or create the named child store.
    pub fn child(&mut self, name: &str) -> &mut StorageContainer {
        let label = format!("{}['{}']", self.label, name);
        self.children
            .entry(name.to_string())
            .or_insert_with(|| StorageContainer::labeled(label))
    }

    pub fn get_child(&self, name: &str) -> Option<&StorageContainer> {
        self.children.get(name)
    }

    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Validate every handler in the tree and lock further mutation.
    ///
    /// A store that was never configured fails; an explicitly disabled one
    /// is skipped. Idempotent: a finalized tree finalizes to `Ok` again.
    pub fn finalize(&mut self) -> Result<(), StorewireError> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;
        debug!(store = %self.label, "finalizing store");

        match &self.slot {
            HandlerSlot::Unset => {
                return Err(StorewireError::NoHandler {
                    store: self.label.clone(),
                });
            }
            HandlerSlot::Disabled => {}
            HandlerSlot::Active(handler) => {
                handler.validate().map_err(|err| StorewireError::Validation {
                    store: self.label.clone(),
                    reason: err.to_string(),
                })?;
            }
        }

        for child in self.children.values_mut() {
            child.finalize()?;
        }
        Ok(())
    }
}

impl Default for StorageContainer {
    fn default() -> Self {
        Self::new()
    }
}
