//! A pair of stores where the second is a fallback for the first

use super::{any::AnyStore, FactoryFn, SharedValue, Store, StoreExt};
use crate::{error::Error, key::Key, provider::Provider};

use std::collections::HashSet;
use std::sync::Arc;

/// Composes two stores into a primary/fallback pair.
///
/// Default operations treat [`left`](ComposedStore::left) as the primary:
/// resolution tries it first and only consults
/// [`right`](ComposedStore::right) on failure, while registrations go to
/// the primary alone. That lets a local store shadow shared defaults
/// without either store knowing the other's concrete type: local
/// registrations win, unregistered keys fall through. Revoking removes the
/// key from
/// both sides, so a revoked key stops resolving entirely.
///
/// When both sides fail, the errors are aggregated: two "not provided"
/// failures for the key collapse into one, a single miss surfaces the other
/// side's error, and anything else becomes [`Error::Composed`] carrying
/// both.
///
/// Factories registered through the pair run against a composed view, so a
/// locally provided chain can consume fallback registrations. The view
/// captures the opposite side at provide time; with a reference-semantics
/// fallback (the usual "global defaults" setup) it observes later updates
/// as well.
///
/// The `*_left`, `*_right` and `*_both` operations address one or both
/// sides explicitly.
///
/// # Example
/// ```
/// use infuse::{Provider, StoreExt, StrictStore};
///
/// let greeting: Provider<String, String> = Provider::new("greeting".into());
///
/// let mut defaults = StrictStore::new();
/// defaults.provide_value(&greeting, "hello".to_string());
///
/// let mut store = StrictStore::new().compose_with(defaults);
/// assert_eq!(store.resolve(&greeting).unwrap(), "hello");
///
/// store.provide_value(&greeting, "howdy".to_string());
/// assert_eq!(store.resolve(&greeting).unwrap(), "howdy");
/// ```
#[derive(Debug, Clone)]
pub struct ComposedStore<K: Key> {
    /// The primary store; default operations target it.
    pub left: AnyStore<K>,
    /// The fallback store consulted when the primary fails.
    pub right: AnyStore<K>,
}

impl<K: Key> ComposedStore<K> {
    /// Composes `left` as the primary store with `right` as its fallback.
    pub fn new<L, R>(left: L, right: R) -> Self
    where
        L: Store<K> + Clone + Send + Sync + 'static,
        R: Store<K> + Clone + Send + Sync + 'static,
    {
        Self::from_parts(AnyStore::new(left), AnyStore::new(right))
    }

    /// Composes two already erased stores.
    #[inline]
    pub fn from_parts(left: AnyStore<K>, right: AnyStore<K>) -> Self {
        Self { left, right }
    }

    /// Resolves from the primary store only.
    pub fn resolve_left<V>(&mut self, provider: &Provider<K, V>) -> Result<V, Error<K>>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.left.resolve(provider)
    }

    /// Resolves from the fallback store only.
    pub fn resolve_right<V>(&mut self, provider: &Provider<K, V>) -> Result<V, Error<K>>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.right.resolve(provider)
    }

    /// Resolves from both stores, failing on the first side that fails.
    pub fn resolve_both<V>(&mut self, provider: &Provider<K, V>) -> Result<(V, V), Error<K>>
    where
        V: Clone + Send + Sync + 'static,
    {
        Ok((self.resolve_left(provider)?, self.resolve_right(provider)?))
    }

    /// Registers a factory in the primary store.
    ///
    /// Same as the default [`provide`](StoreExt::provide); the factory runs
    /// against the composed view.
    pub fn provide_left<V, F>(&mut self, provider: &Provider<K, V>, factory: F)
    where
        V: Send + Sync + 'static,
        F: Fn(&mut dyn Store<K>) -> Result<V, Error<K>> + Send + Sync + 'static,
    {
        let factory = pair_factory(self.right.clone(), true, erase_factory(factory));
        self.left.provide_key(provider.key().clone(), factory);
    }

    /// Registers a factory in the fallback store.
    ///
    /// The factory still runs against the composed view, with the primary
    /// side captured at provide time.
    pub fn provide_right<V, F>(&mut self, provider: &Provider<K, V>, factory: F)
    where
        V: Send + Sync + 'static,
        F: Fn(&mut dyn Store<K>) -> Result<V, Error<K>> + Send + Sync + 'static,
    {
        let factory = pair_factory(self.left.clone(), false, erase_factory(factory));
        self.right.provide_key(provider.key().clone(), factory);
    }

    /// Registers a factory in both stores.
    pub fn provide_both<V, F>(&mut self, provider: &Provider<K, V>, factory: F)
    where
        V: Send + Sync + 'static,
        F: Fn(&mut dyn Store<K>) -> Result<V, Error<K>> + Send + Sync + 'static,
    {
        let factory = erase_factory(factory);
        self.left.provide_key(
            provider.key().clone(),
            pair_factory(self.right.clone(), true, factory.clone()),
        );
        self.right.provide_key(
            provider.key().clone(),
            pair_factory(self.left.clone(), false, factory),
        );
    }

    /// Removes the registration from the primary store only.
    pub fn revoke_left<V>(&mut self, provider: &Provider<K, V>) {
        self.left.revoke_key(provider.key());
    }

    /// Removes the registration from the fallback store only.
    pub fn revoke_right<V>(&mut self, provider: &Provider<K, V>) {
        self.right.revoke_key(provider.key());
    }

    /// Removes the registration from both stores.
    ///
    /// Same as the default [`revoke`](StoreExt::revoke).
    pub fn revoke_both<V>(&mut self, provider: &Provider<K, V>) {
        self.revoke_left(provider);
        self.revoke_right(provider);
    }
}

impl<K: Key> Store<K> for ComposedStore<K> {
    fn resolve_key(&mut self, key: &K) -> Result<SharedValue, Error<K>> {
        resolve_with_fallback(&mut self.left, &mut self.right, key)
    }

    fn provide_key(&mut self, key: K, factory: FactoryFn<K>) {
        let factory = pair_factory(self.right.clone(), true, factory);
        self.left.provide_key(key, factory);
    }

    fn revoke_key(&mut self, key: &K) {
        self.left.revoke_key(key);
        self.right.revoke_key(key);
    }

    fn provided_keys(&self) -> HashSet<K> {
        let mut keys = self.left.provided_keys();
        keys.extend(self.right.provided_keys());
        keys
    }

    fn contains(&self, key: &K) -> bool {
        self.left.contains(key) || self.right.contains(key)
    }
}

/// Tries `primary`, falls back to `fallback` and aggregates both failures.
fn resolve_with_fallback<K: Key>(
    primary: &mut dyn Store<K>,
    fallback: &mut dyn Store<K>,
    key: &K,
) -> Result<SharedValue, Error<K>> {
    match primary.resolve_key(key) {
        Ok(value) => Ok(value),
        Err(primary_err) => match fallback.resolve_key(key) {
            Ok(value) => Ok(value),
            Err(fallback_err) => Err(Error::compose(key, primary_err, fallback_err)),
        },
    }
}

/// The store view factories registered through a [`ComposedStore`] run
/// against: the side holding the factory stays live, the opposite side is
/// the handle captured at provide time.
struct PairView<'a, K: Key> {
    live: &'a mut dyn Store<K>,
    captured: AnyStore<K>,
    live_is_primary: bool,
}

impl<K: Key> Store<K> for PairView<'_, K> {
    fn resolve_key(&mut self, key: &K) -> Result<SharedValue, Error<K>> {
        if self.live_is_primary {
            resolve_with_fallback(&mut *self.live, &mut self.captured, key)
        } else {
            resolve_with_fallback(&mut self.captured, &mut *self.live, key)
        }
    }

    fn provide_key(&mut self, key: K, factory: FactoryFn<K>) {
        self.live.provide_key(key, factory);
    }

    fn revoke_key(&mut self, key: &K) {
        self.live.revoke_key(key);
        self.captured.revoke_key(key);
    }

    fn provided_keys(&self) -> HashSet<K> {
        let mut keys = self.live.provided_keys();
        keys.extend(self.captured.provided_keys());
        keys
    }

    fn contains(&self, key: &K) -> bool {
        self.live.contains(key) || self.captured.contains(key)
    }
}

/// Wraps a stored factory so it runs against a [`PairView`] instead of the
/// bare side it lives in.
fn pair_factory<K: Key>(
    captured: AnyStore<K>,
    live_is_primary: bool,
    factory: FactoryFn<K>,
) -> FactoryFn<K> {
    Arc::new(move |live: &mut dyn Store<K>| {
        let mut view = PairView {
            live,
            captured: captured.clone(),
            live_is_primary,
        };
        factory(&mut view)
    })
}

fn erase_factory<K, V, F>(factory: F) -> FactoryFn<K>
where
    K: Key,
    V: Send + Sync + 'static,
    F: Fn(&mut dyn Store<K>) -> Result<V, Error<K>> + Send + Sync + 'static,
{
    Arc::new(move |store: &mut dyn Store<K>| {
        factory(store).map(|value| Arc::new(value) as SharedValue)
    })
}
