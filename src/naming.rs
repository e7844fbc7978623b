//! Route-group naming: deterministic numeric suffixes over a shared registry.
//!
//! Names are `<base><n>` where `n` is one more than the largest suffix already
//! registered for `base`. The registry is scanned on every allocation so names
//! inserted out of band, or released and re-added, are accounted for.

use crate::error::{NamingError, RegistrationError};
use std::collections::BTreeSet;
use std::sync::Mutex;

/// Base name for a collection: `<collection>api`.
pub fn base_name(collection_name: &str) -> String {
    format!("{}api", collection_name)
}

/// Next free name for `base` given the names already in use.
pub fn next_name<'a, I>(base: &str, existing: I) -> Result<String, NamingError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut max: Option<u64> = None;
    for entry in existing {
        let Some(suffix) = entry.strip_prefix(base) else {
            continue;
        };
        let n = parse_suffix(suffix).ok_or_else(|| NamingError::MalformedEntry {
            base: base.to_string(),
            entry: entry.to_string(),
        })?;
        max = Some(max.map_or(n, |m| m.max(n)));
    }
    let next = match max {
        None => 0,
        Some(m) => m.checked_add(1).ok_or_else(|| NamingError::MalformedEntry {
            base: base.to_string(),
            entry: format!("{}{}", base, m),
        })?,
    };
    Ok(format!("{}{}", base, next))
}

fn parse_suffix(suffix: &str) -> Option<u64> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

/// Process-wide set of allocated route-group names.
#[derive(Debug, Default)]
pub struct NameRegistry {
    names: Mutex<BTreeSet<String>>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the next name for `base` and record it in one critical section.
    pub fn allocate(&self, base: &str) -> Result<String, RegistrationError> {
        let mut names = self.names.lock().map_err(|_| NamingError::RegistryUnavailable)?;
        let name = next_name(base, names.iter().map(String::as_str))?;
        if !names.insert(name.clone()) {
            return Err(RegistrationError::Collision(name));
        }
        Ok(name)
    }

    /// Record a name registered outside the generator.
    pub fn insert(&self, name: impl Into<String>) -> Result<bool, NamingError> {
        let mut names = self.names.lock().map_err(|_| NamingError::RegistryUnavailable)?;
        Ok(names.insert(name.into()))
    }

    /// Drop a name on host teardown or when the host rejected the group.
    pub fn release(&self, name: &str) -> Result<bool, NamingError> {
        let mut names = self.names.lock().map_err(|_| NamingError::RegistryUnavailable)?;
        Ok(names.remove(name))
    }

    pub fn contains(&self, name: &str) -> Result<bool, NamingError> {
        let names = self.names.lock().map_err(|_| NamingError::RegistryUnavailable)?;
        Ok(names.contains(name))
    }

    /// Snapshot in sorted order.
    pub fn names(&self) -> Result<Vec<String>, NamingError> {
        let names = self.names.lock().map_err(|_| NamingError::RegistryUnavailable)?;
        Ok(names.iter().cloned().collect())
    }

    /// Leave the lock poisoned, as if a holder had panicked.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _names = self.names.lock();
            panic!("registry holder panicked");
        }));
    }
}
