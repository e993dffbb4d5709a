//! Registry of declared event names and their owners.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use crate::error::{EventError, EventResult};

/// Declared event names, each owned by one component.
#[derive(Debug, Default)]
pub struct KnownEvents {
    names: RwLock<BTreeMap<String, String>>,
}

impl KnownEvents {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare event names on behalf of `owner`.
    ///
    /// Either every name is declared or none is. Re-declaring a name the
    /// same owner already holds is accepted.
    ///
    /// # Errors
    ///
    /// Returns [`EventError::NameCollision`] if another owner holds any of
    /// the names, or [`EventError::InvalidName`] for an empty name.
    pub fn declare<S: AsRef<str>>(&self, owner: &str, names: &[S]) -> EventResult<()> {
        let mut map = self.names.write().unwrap_or_else(PoisonError::into_inner);

        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(EventError::InvalidName(name.to_owned()));
            }
            if let Some(existing) = map.get(name)
                && existing != owner
            {
                return Err(EventError::NameCollision {
                    name: name.to_owned(),
                    owner: existing.clone(),
                    claimant: owner.to_owned(),
                });
            }
        }

        for name in names {
            map.insert(name.as_ref().to_owned(), owner.to_owned());
        }
        debug!(owner = %owner, count = names.len(), "Declared events");
        Ok(())
    }

    /// Drop every name held by `owner`. Returns how many were dropped.
    pub fn undeclare_owner(&self, owner: &str) -> usize {
        let mut map = self.names.write().unwrap_or_else(PoisonError::into_inner);
        let before = map.len();
        map.retain(|_, o| o != owner);
        before.saturating_sub(map.len())
    }

    /// Whether the name has been declared.
    #[must_use]
    pub fn is_known(&self, name: &str) -> bool {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Owner of a declared name.
    #[must_use]
    pub fn owner_of(&self, name: &str) -> Option<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Every declared name, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.names
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}
