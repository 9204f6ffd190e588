//! Type erasure for heterogeneous store composition

use super::{FactoryFn, SharedValue, Store};
use crate::{error::Error, key::Key};

use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};

/// A [`Store`] that can be cloned behind a `Box`.
///
/// The generic adapter below implements it for every cloneable store, which
/// is all [`AnyStore`] needs to erase a concrete store type.
pub(crate) trait CloneStore<K: Key>: Store<K> + Send + Sync {
    fn clone_box(&self) -> Box<dyn CloneStore<K>>;
}

impl<K: Key, S> CloneStore<K> for S
where
    S: Store<K> + Clone + Send + Sync + 'static,
{
    fn clone_box(&self) -> Box<dyn CloneStore<K>> {
        Box::new(self.clone())
    }
}

/// Hides a concrete store type behind the plain [`Store`] contract.
///
/// `AnyStore` adds no behavior of its own: every operation dispatches to
/// the wrapped store, and factories are passed through untouched, so the
/// wrapped store's mutation semantics are preserved exactly. Cloning an
/// erased value store deep-copies it; cloning an erased
/// [`GlobalStore`](super::GlobalStore) clones the shared handle.
///
/// This is the common currency type [`ComposedStore`](super::ComposedStore)
/// uses to hold two differently-typed stores in one field each.
///
/// # Example
/// ```
/// use infuse::{AnyStore, LazyStore, Provider, StoreExt, StrictStore};
///
/// let k: Provider<String, i32> = Provider::new("k".into());
///
/// let mut stores = vec![
///     AnyStore::new(StrictStore::new().providing_value(&k, 1)),
///     AnyStore::new(LazyStore::new().providing_value(&k, 2)),
/// ];
///
/// let values: Vec<i32> = stores
///     .iter_mut()
///     .map(|store| store.resolve(&k).unwrap())
///     .collect();
/// assert_eq!(values, [1, 2]);
/// ```
pub struct AnyStore<K: Key> {
    inner: Box<dyn CloneStore<K>>,
}

impl<K: Key> AnyStore<K> {
    /// Erases the concrete type of the given store.
    pub fn new<S>(store: S) -> Self
    where
        S: Store<K> + Clone + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(store),
        }
    }
}

impl<K: Key> Clone for AnyStore<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl<K: Key> Store<K> for AnyStore<K> {
    fn resolve_key(&mut self, key: &K) -> Result<SharedValue, Error<K>> {
        self.inner.resolve_key(key)
    }

    fn provide_key(&mut self, key: K, factory: FactoryFn<K>) {
        self.inner.provide_key(key, factory);
    }

    fn revoke_key(&mut self, key: &K) {
        self.inner.revoke_key(key);
    }

    fn provided_keys(&self) -> HashSet<K> {
        self.inner.provided_keys()
    }

    fn contains(&self, key: &K) -> bool {
        self.inner.contains(key)
    }
}

impl<K: Key> Debug for AnyStore<K> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("AnyStore(..)")
    }
}
