//! A store that evaluates factories at provide time

use super::{FactoryFn, SharedValue, Store};
use crate::{error::Error, key::Key};

use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug, Formatter};

/// A store that runs every factory synchronously when it is provided.
///
/// The outcome (value or captured error) is stored under the key and
/// replayed on every resolution, so a factory runs exactly once, at provide
/// time. Registering a dependency chain in the wrong order therefore fails
/// at registration, not at resolution, which makes mis-wired dependency
/// graphs easy to spot.
///
/// There is no cycle protection here: the factory is evaluated before its
/// key is inserted, so a factory resolving its own key simply observes the
/// previous registration, or [`Error::KeyNotProvided`].
///
/// # Example
/// ```
/// use infuse::{Provider, StoreExt, StrictStore};
///
/// let answer: Provider<String, i32> = Provider::new("answer".into());
///
/// let mut store = StrictStore::new();
/// store.provide(&answer, |_| Ok(42));
///
/// assert_eq!(store.resolve(&answer).unwrap(), 42);
/// ```
#[derive(Clone)]
pub struct StrictStore<K> {
    outcomes: HashMap<K, Result<SharedValue, Error<K>>>,
}

impl<K: Key> Default for StrictStore<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> StrictStore<K> {
    /// Creates an empty store.
    #[inline]
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
        }
    }
}

impl<K: Key> Store<K> for StrictStore<K> {
    fn resolve_key(&mut self, key: &K) -> Result<SharedValue, Error<K>> {
        match self.outcomes.get(key) {
            Some(outcome) => outcome.clone(),
            None => Err(Error::KeyNotProvided(key.clone())),
        }
    }

    fn provide_key(&mut self, key: K, factory: FactoryFn<K>) {
        let outcome = factory(&mut *self);
        #[cfg(feature = "tracing")]
        if let Err(ref _err) = outcome {
            tracing::debug!("factory for key {key:?} failed at provide time: {_err}");
        }
        self.outcomes.insert(key, outcome);
    }

    fn revoke_key(&mut self, key: &K) {
        self.outcomes.remove(key);
    }

    fn provided_keys(&self) -> HashSet<K> {
        self.outcomes.keys().cloned().collect()
    }

    fn contains(&self, key: &K) -> bool {
        self.outcomes.contains_key(key)
    }
}

impl<K: Key> Debug for StrictStore<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrictStore")
            .field("keys", &self.outcomes.keys().collect::<Vec<_>>())
            .finish()
    }
}
