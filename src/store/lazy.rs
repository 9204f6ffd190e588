//! A store that defers factory evaluation to the first resolution

use super::{state::ResolveState, FactoryFn, SharedValue, Store};
use crate::{error::Error, key::Key};

use std::collections::{HashMap, HashSet};

/// A store that records factories on provide and runs them on first resolve.
///
/// The first resolution of a key evaluates its factory and memoizes the
/// outcome (value or error), which every later resolution replays without
/// re-invoking the factory. Factories may resolve other keys of the same
/// store re-entrantly, so whole dependency chains can be registered in any
/// order and get evaluated on demand.
///
/// A chain that loops back on itself is detected: while a factory runs, its
/// key is marked in progress, and a resolution re-entering that key fails
/// with [`Error::CyclicDependency`] instead of recursing without bound.
///
/// # Example
/// ```
/// use infuse::{LazyStore, Provider, Store, StoreExt};
///
/// let n: Provider<String, i32> = Provider::new("n".into());
/// let next: Provider<String, i32> = Provider::new("n+1".into());
///
/// let mut store = LazyStore::new();
/// store.provide_value(&n, 3);
///
/// let dep = n.clone();
/// store.provide(&next, move |store: &mut dyn Store<String>| {
///     Ok(store.resolve(&dep)? + 1)
/// });
///
/// assert_eq!(store.resolve(&next).unwrap(), 4);
/// assert_eq!(store.resolve(&n).unwrap(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct LazyStore<K> {
    registrations: HashMap<K, ResolveState<K>>,
}

impl<K: Key> Default for LazyStore<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Key> LazyStore<K> {
    /// Creates an empty store.
    #[inline]
    pub fn new() -> Self {
        Self {
            registrations: HashMap::new(),
        }
    }
}

impl<K: Key> Store<K> for LazyStore<K> {
    fn resolve_key(&mut self, key: &K) -> Result<SharedValue, Error<K>> {
        let factory = match self.registrations.get_mut(key) {
            None => return Err(Error::KeyNotProvided(key.clone())),
            Some(ResolveState::Resolved(outcome)) => return outcome.clone(),
            Some(ResolveState::Resolving) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("cyclic dependency detected while resolving key {key:?}");
                return Err(Error::CyclicDependency(key.clone()));
            }
            Some(state) => {
                let ResolveState::Unresolved(factory) =
                    std::mem::replace(state, ResolveState::Resolving)
                else {
                    unreachable!("the resolved and in-progress arms are matched above")
                };
                factory
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!("evaluating deferred factory for key {key:?}");

        let outcome = factory(&mut *self);

        // The factory may have revoked or re-provided its own key; only an
        // untouched in-progress marker gets the memoized outcome.
        if let Some(state) = self.registrations.get_mut(key) {
            if state.is_resolving() {
                *state = ResolveState::Resolved(outcome.clone());
            }
        }
        outcome
    }

    fn provide_key(&mut self, key: K, factory: FactoryFn<K>) {
        self.registrations
            .insert(key, ResolveState::Unresolved(factory));
    }

    fn revoke_key(&mut self, key: &K) {
        self.registrations.remove(key);
    }

    fn provided_keys(&self) -> HashSet<K> {
        self.registrations.keys().cloned().collect()
    }

    fn contains(&self, key: &K) -> bool {
        self.registrations.contains_key(key)
    }
}
