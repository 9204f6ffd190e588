//! A shared handle that adds reference semantics to a value store

use super::{FactoryFn, SharedValue, Store};
use crate::{error::Error, key::Key};

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Wraps a value-semantics store behind a shared, mutable handle.
///
/// Cloning a `GlobalStore` clones the handle, not the store: every clone
/// observes the same registrations, so components at different layers of an
/// application can hold "the same" store without a process-wide singleton.
/// Use [`snapshot`](GlobalStore::snapshot) for an independent deep copy.
///
/// Operations clone the wrapped store out of the shared cell, run against
/// the clone and commit the mutated store back, so factories run lock-free
/// and may resolve re-entrantly. This is designed for
/// single-threaded or externally serialized access: two threads mutating
/// the same handle concurrently do not corrupt it, but the later commit
/// wins. Wrap the handle in your own lock if you need cross-thread
/// coordination.
///
/// # Example
/// ```
/// use infuse::{LazyStore, Provider, StoreExt};
///
/// let port: Provider<String, u16> = Provider::new("port".into());
///
/// let mut shared = LazyStore::new().globalize();
/// let mut handle = shared.clone();
///
/// shared.provide_value(&port, 8080);
/// assert_eq!(handle.resolve(&port).unwrap(), 8080);
/// ```
#[derive(Debug)]
pub struct GlobalStore<S> {
    cell: Arc<RwLock<S>>,
}

impl<S> Clone for GlobalStore<S> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<S: Default> Default for GlobalStore<S> {
    #[inline]
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> GlobalStore<S> {
    /// Wraps the given store behind a new shared handle.
    #[inline]
    pub fn new(inner: S) -> Self {
        Self {
            cell: Arc::new(RwLock::new(inner)),
        }
    }

    /// Deep-copies the current contents into an independent store.
    ///
    /// The snapshot no longer observes mutations made through this handle,
    /// which makes it useful for isolating a store before composing it.
    pub fn snapshot(&self) -> Self
    where
        S: Clone,
    {
        Self::new(self.read().clone())
    }

    fn read(&self) -> RwLockReadGuard<'_, S> {
        self.cell.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, S> {
        self.cell.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K: Key, S: Store<K> + Clone> Store<K> for GlobalStore<S> {
    fn resolve_key(&mut self, key: &K) -> Result<SharedValue, Error<K>> {
        let mut inner = self.read().clone();
        let outcome = inner.resolve_key(key);
        *self.write() = inner;
        outcome
    }

    fn provide_key(&mut self, key: K, factory: FactoryFn<K>) {
        let mut inner = self.read().clone();
        inner.provide_key(key, factory);
        *self.write() = inner;
    }

    fn revoke_key(&mut self, key: &K) {
        self.write().revoke_key(key);
    }

    fn provided_keys(&self) -> HashSet<K> {
        self.read().provided_keys()
    }

    fn contains(&self, key: &K) -> bool {
        self.read().contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::GlobalStore;
    use crate::{
        error::Error,
        provider::Provider,
        store::{LazyStore, Store, StoreExt, StrictStore},
    };
    use std::sync::{Arc, Mutex};

    fn int_provider(key: &str) -> Provider<String, i32> {
        Provider::new(key.into())
    }

    #[test]
    fn it_shares_registrations_between_handles() {
        let k = int_provider("k");

        let mut first = StrictStore::new().globalize();
        let mut second = first.clone();

        first.provide_value(&k, 3);

        assert_eq!(second.resolve(&k).unwrap(), 3);
        assert!(second.contains(k.key()));
    }

    #[test]
    fn it_shares_revocations_between_handles() {
        let k = int_provider("k");

        let mut first = LazyStore::new().globalize();
        let mut second = first.clone();

        first.provide_value(&k, 3);
        second.revoke(&k);

        assert_eq!(
            first.resolve(&k).unwrap_err(),
            Error::KeyNotProvided("k".to_string())
        );
    }

    #[test]
    fn it_commits_memoization_back_to_the_shared_cell() {
        let calls = Arc::new(Mutex::new(0));
        let counter = calls.clone();

        let k = int_provider("k");
        let mut first = LazyStore::new().globalize();
        let mut second = first.clone();

        first.provide(&k, move |_| {
            *counter.lock().unwrap() += 1;
            Ok(3)
        });

        assert_eq!(second.resolve(&k).unwrap(), 3);
        assert_eq!(first.resolve(&k).unwrap(), 3);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn it_resolves_chains_through_the_shared_cell() {
        let n = int_provider("n");
        let next = int_provider("n+1");

        let mut store = LazyStore::new().globalize();

        let dep = n.clone();
        store.provide(&next, move |store: &mut dyn Store<String>| {
            Ok(store.resolve(&dep)? + 1)
        });
        store.provide_value(&n, 3);

        assert_eq!(store.resolve(&next).unwrap(), 4);
    }

    #[test]
    fn it_snapshots_independently() {
        let k = int_provider("k");

        let mut shared = StrictStore::new().globalize();
        shared.provide_value(&k, 1);

        let mut snapshot = shared.snapshot();
        shared.provide_value(&k, 2);

        assert_eq!(snapshot.resolve(&k).unwrap(), 1);
        assert_eq!(shared.resolve(&k).unwrap(), 2);
    }

    #[test]
    fn it_keeps_provided_keys_in_sync() {
        let k = int_provider("k");
        let m = int_provider("m");

        let mut first = StrictStore::new().globalize();
        let second = first.clone();

        first.provide_value(&k, 1);
        first.provide_value(&m, 2);

        let keys = second.provided_keys();
        assert!(keys.contains("k"));
        assert!(keys.contains("m"));
        assert_eq!(keys.len(), 2);
    }
}
