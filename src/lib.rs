//! Config-driven wiring for storage handler trees. Describe your stores in
//! flat ini-style settings, register your component types once, and go.
//!
//! Storewire resolves a flat key/value map into a live tree of storage
//! components: each store holds a handler, a handler owns an ordered chain
//! of filters, and stores nest under bracket-quoted names. The engine
//! validates every key against the declared parameter sets of the types it
//! resolves and reports located, suggestion-bearing errors when something
//! is off.
//!
//! ```
//! use std::collections::HashMap;
//! use storewire::{ParamSpec, Registry, Setup, StorageContainer, HANDLER_BASE};
//!
//! #[derive(Debug)]
//! struct MemoryHandler {
//!     prefix: Option<String>,
//!     filters: Vec<Box<dyn storewire::StorageFilter>>,
//! }
//!
//! impl storewire::StorageHandler for MemoryHandler {
//!     fn as_any(&self) -> &dyn std::any::Any {
//!         self
//!     }
//! }
//!
//! static MEMORY_PARAMS: ParamSpec = ParamSpec {
//!     names: &["prefix"],
//!     base: Some(&HANDLER_BASE),
//! };
//!
//! let mut registry = Registry::new();
//! registry.register_handler("MemoryHandler", &MEMORY_PARAMS, |mut args| {
//!     Ok(Box::new(MemoryHandler {
//!         prefix: args.take_str("prefix")?,
//!         filters: args.take_filters(),
//!     }))
//! });
//!
//! let settings = HashMap::from([
//!     ("store.handler".to_string(), "MemoryHandler".to_string()),
//!     ("store.handler.prefix".to_string(), "'uploads'".to_string()),
//! ]);
//!
//! let mut store = StorageContainer::new();
//! let configured = Setup::new(&registry).configure(&settings, &mut store)?;
//! assert!(configured);
//! store.finalize()?;
//! # Ok::<(), storewire::StorewireError>(())
//! ```
//!
//! # Why storewire
//!
//! Applications that store user files rarely have one store. There is the
//! main upload bucket, a thumbnails store with different filters, a local
//! spool for tests, and each deployment wants to swap these around without
//! code changes. The typical approach wires every combination by hand and
//! grows a thicket of `if` around it.
//!
//! Storewire replaces that plumbing with settings. The settings map names
//! the handler type for every store, configures its constructor arguments,
//! orders its filters, and nests sub-stores, all in a flat namespace any
//! ini-style config system can carry. The host keeps full control of the
//! component types through the [`Registry`]; the engine contributes
//! resolution, validation, and assembly, and nothing else. It performs no
//! I/O and defines no storage semantics.
//!
//! # The key grammar
//!
//! Keys are dotted paths with two bracket forms:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `store.handler` | handler type name for the root store |
//! | `store.handler.base_url` | a constructor argument |
//! | `store.handler.filters[0]` | filter type at chain position 0 |
//! | `store.handler.filters[0].extensions` | an argument of that filter |
//! | `store['thumbs'].handler` | handler type for the `thumbs` sub-store |
//!
//! Filter order is the ascending integer index, not the order keys appear
//! in the map. Sub-store names are single- or double-quoted inside the
//! brackets; filter indices are bare integers. Setting a handler to the
//! literal `none` (any casing) disables that store explicitly instead of
//! resolving a type.
//!
//! # Values
//!
//! Every value is a string on the way in and a typed [`Literal`] on the way
//! out:
//!
//! - `'text'` / `"text"`: the quotes are stripped, nothing else is.
//! - `42`: an all-digit value becomes an integer.
//! - `['png', 'jpg']`, `{'png', 'jpg'}`, `{'depth': 3}`: lists, sets and
//!   maps of literals, parsed by a restricted parser that accepts exactly
//!   this grammar. There is no expression evaluation.
//! - anything else stays a string.
//!
//! # Types and parameters
//!
//! Handler names resolve in the registry's `handlers` namespace, filter
//! names in `filters`; a qualified `ns.Name` picks an explicit namespace.
//! Each registration carries a [`ParamSpec`] declaring the parameter names
//! the type accepts on top of its base's: [`HANDLER_BASE`] contributes
//! `base_url`, `filters` and `path` to every handler. Unknown argument keys
//! fail fast, with the closest accepted name suggested when one is close.
//!
//! # Errors
//!
//! All failures are [`StorewireError`], designed to be shown to whoever is
//! editing the settings: every message carries the full key path that
//! caused it, constructor failures are re-wrapped with their location, and
//! startup is expected to abort on any of them. With the `rich-errors`
//! feature the error type also implements `miette::Diagnostic`.
//!
//! # Ownership and lifecycle
//!
//! The [`StorageContainer`] tree is owned by the host. One
//! [`Setup::configure`] call populates it and reports whether any
//! configuration was found; an untouched prefix leaves the store
//! deliberately inert rather than failing. Finalizing the tree, a
//! separate host-driven step, validates every handler and locks further
//! mutation. The engine keeps no state between calls, and two setups
//! against distinct containers are independent; a single container must
//! only be configured from one thread at a time.

pub mod error;

mod builder;
mod component;
mod container;
mod literal;
mod params;
mod registry;
mod tree;

#[cfg(test)]
mod fixtures;

pub use builder::{DEFAULT_PREFIX, Setup};
pub use component::{ArgValue, BoxError, ComponentArgs, StorageFilter, StorageHandler};
pub use container::StorageContainer;
pub use error::StorewireError;
pub use literal::{Literal, decode};
pub use params::{FILTER_BASE, HANDLER_BASE, ParamSpec};
pub use registry::{FILTER_NAMESPACE, HANDLER_NAMESPACE, Registry};
