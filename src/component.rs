//! Component traits and the argument bundle handed to factories.
//!
//! Concrete handlers and filters live outside this crate. The engine only
//! resolves their types, validates and decodes their arguments, and calls the
//! registered factory with a [`ComponentArgs`] bundle. What a handler does
//! with a stored item afterwards is its own business.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;

use crate::literal::Literal;

/// Boxed error a factory or validation hook may fail with. The engine wraps
/// it into a located configuration error; the original type is not preserved.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A component that persists and retrieves file-like data.
pub trait StorageHandler: fmt::Debug + Send + Sync {
    /// Check configuration consistency. Called once when the owning store
    /// tree is finalized. Handlers are expected to validate the filters they
    /// own as part of this.
    fn validate(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Downcast support for hosts and tests.
    fn as_any(&self) -> &dyn Any;
}

/// A component that transforms or checks an item before storage. A handler
/// applies its filters front-to-back in configured order.
pub trait StorageFilter: fmt::Debug + Send + Sync {
    /// Check configuration consistency; invoked through the owning handler's
    /// [`StorageHandler::validate`].
    fn validate(&self) -> Result<(), BoxError> {
        Ok(())
    }

    /// Downcast support for hosts and tests.
    fn as_any(&self) -> &dyn Any;
}

/// One assembled argument: a decoded literal, or the built filter chain
/// bound under the `filters` name.
#[derive(Debug)]
pub enum ArgValue {
    Literal(Literal),
    Filters(Vec<Box<dyn StorageFilter>>),
}

/// Keyword arguments assembled for one component construction.
///
/// The engine has already rejected names the component does not declare, so a
/// factory only deals with presence and typing of the names it knows.
#[derive(Debug, Default)]
pub struct ComponentArgs {
    values: BTreeMap<String, ArgValue>,
}

impl ComponentArgs {
    pub fn insert_literal(&mut self, name: impl Into<String>, value: Literal) {
        self.values.insert(name.into(), ArgValue::Literal(value));
    }

    pub fn insert_filters(&mut self, filters: Vec<Box<dyn StorageFilter>>) {
        self.values
            .insert("filters".to_string(), ArgValue::Filters(filters));
    }

    /// Remove and return a literal argument. `None` when absent or when the
    /// name is bound to the filter chain.
    pub fn take(&mut self, name: &str) -> Option<Literal> {
        match self.values.remove(name) {
            Some(ArgValue::Literal(value)) => Some(value),
            Some(other) => {
                self.values.insert(name.to_string(), other);
                None
            }
            None => None,
        }
    }

    /// Remove and return the filter chain; empty when none was configured.
    pub fn take_filters(&mut self) -> Vec<Box<dyn StorageFilter>> {
        match self.values.remove("filters") {
            Some(ArgValue::Filters(filters)) => filters,
            Some(other) => {
                self.values.insert("filters".to_string(), other);
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    /// Remove a string argument, failing if it is present but not a string.
    pub fn take_str(&mut self, name: &str) -> Result<Option<String>, BoxError> {
        match self.take(name) {
            None => Ok(None),
            Some(Literal::Str(s)) => Ok(Some(s)),
            Some(other) => Err(format!("argument '{name}' expects a string, got {other:?}").into()),
        }
    }

    /// Remove an integer argument, failing if it is present but not an integer.
    pub fn take_int(&mut self, name: &str) -> Result<Option<i64>, BoxError> {
        match self.take(name) {
            None => Ok(None),
            Some(Literal::Int(i)) => Ok(Some(i)),
            Some(other) => {
                Err(format!("argument '{name}' expects an integer, got {other:?}").into())
            }
        }
    }

    /// Remove a required string argument.
    pub fn require_str(&mut self, name: &str) -> Result<String, BoxError> {
        self.take_str(name)?
            .ok_or_else(|| format!("missing required argument '{name}'").into())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names still present in the bundle.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}
