//! Declared constructor parameters for registered component types.
//!
//! Argument names are validated against an explicit contract rather than any
//! form of signature inspection: every component registers a [`ParamSpec`]
//! naming its own parameters and linking to its base's spec, and
//! [`ParamSpec::accepted`] unions the chain. The chain ends at the handler or
//! filter root spec, so a component only has to declare what it adds.
//!
//! The limitation this inherits is deliberate: a component that quietly
//! swallows arbitrary extra arguments has no closed parameter set to validate
//! against, so every component is expected to declare the names it forwards.

use std::collections::BTreeSet;

/// The parameter names one component type declares, plus its base's spec.
#[derive(Debug)]
pub struct ParamSpec {
    /// Names declared by this component itself.
    pub names: &'static [&'static str],
    /// The base component's spec, if any.
    pub base: Option<&'static ParamSpec>,
}

/// Parameters every storage handler accepts.
pub static HANDLER_BASE: ParamSpec = ParamSpec {
    names: &["base_url", "filters", "path"],
    base: None,
};

/// Filters declare all of their parameters themselves.
pub static FILTER_BASE: ParamSpec = ParamSpec {
    names: &[],
    base: None,
};

impl ParamSpec {
    /// Union of the names declared along the whole base chain.
    pub fn accepted(&self) -> BTreeSet<&'static str> {
        let mut names: BTreeSet<&'static str> = BTreeSet::new();
        let mut spec = Some(self);
        while let Some(current) = spec {
            names.extend(current.names.iter().copied());
            spec = current.base;
        }
        names
    }

    /// Whether `name` appears anywhere along the chain.
    pub fn accepts(&self, name: &str) -> bool {
        let mut spec = Some(self);
        while let Some(current) = spec {
            if current.names.contains(&name) {
                return true;
            }
            spec = current.base;
        }
        false
    }
}
