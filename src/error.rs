use thiserror::Error;

/// Errors raised while resolving storage configuration.
///
/// Every variant is a configuration problem meant to be shown to whoever is
/// editing the settings, usually at process startup. Messages carry the full
/// dotted/bracketed key path that triggered them; none of these are expected
/// to be recovered from programmatically.
#[derive(Debug, Error)]
#[cfg_attr(feature = "rich-errors", derive(miette::Diagnostic))]
pub enum StorewireError {
    /// A store node with no `handler` entry naming its type.
    #[error("settings have no key for '{key}.handler'")]
    MissingHandler { key: String },

    /// The namespace part of a type reference is not registered.
    #[error("bad value for '{key}': namespace '{namespace}' is not registered")]
    UnknownNamespace { key: String, namespace: String },

    /// The namespace exists but does not contain the referenced name.
    #[error("bad value for '{key}': namespace '{namespace}' has no component '{name}'")]
    UnknownComponent {
        key: String,
        namespace: String,
        name: String,
    },

    /// An argument name the resolved type does not accept.
    #[error("invalid setting '{key}.{argument}'{}", suggestion_text(suggestion))]
    UnknownArgument {
        key: String,
        argument: String,
        suggestion: Option<String>,
    },

    /// A structured literal the restricted parser rejected.
    #[error("bad value {value}: {reason}")]
    BadLiteral { value: String, reason: String },

    /// A filter key whose bracket content is not an integer.
    #[error("bad key '{key}': {reason}")]
    BadFilterIndex { key: String, reason: String },

    /// The component factory refused the assembled arguments.
    #[error("bad args for '{key}': {reason}")]
    Construction { key: String, reason: String },

    /// A child key that is neither an accepted argument nor a quoted
    /// sub-store name.
    #[error("unknown key '{key}'")]
    UnknownKey { key: String },

    /// A key path that should have carried a leaf value but did not.
    #[error("expected a value at '{key}'")]
    MissingValue { key: String },

    /// Handler access on a store that has none configured.
    #[error("no handler configured for {store}")]
    NoHandler { store: String },

    /// A second handler assignment to the same store.
    #[error("setting {store}.handler: handler already set")]
    HandlerAlreadySet { store: String },

    /// Mutation of a store after its configuration was locked.
    #[error("setting {store}.handler: store already finalized")]
    Finalized { store: String },

    /// A handler or filter failed its own validation during finalize.
    #[error("invalid config for {store}: {reason}")]
    Validation { store: String, reason: String },
}

fn suggestion_text(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(". Did you mean '{name}'?"),
        None => String::new(),
    }
}

/// Pick the accepted name closest to `target`, if any is close enough.
///
/// "Close enough" means the edit distance is at most half the longer of the
/// two names, so short typos match while unrelated names are left out.
pub(crate) fn closest_match<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (levenshtein(target, candidate), candidate))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, candidate)| distance * 2 <= target.len().max(candidate.len()))
        .map(|(_, candidate)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }

    // Single-row formulation: row[j] holds the distance between the first
    // i chars of `a` and the first j chars of `b`.
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut previous_diagonal = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let substitution = previous_diagonal + cost;
            previous_diagonal = row[j + 1];
            row[j + 1] = substitution.min(row[j] + 1).min(row[j + 1] + 1);
        }
    }
    row[b.len()]
}
