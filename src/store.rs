//! Keyed stores and the typed resolution layer
//!
//! A store associates [`Key`]s with type-erased values produced by
//! factories. The [`Store`] trait is the object-safe core contract every
//! variant implements; [`StoreExt`] adds the typed API on top of it, driven
//! by [`Provider`](crate::Provider) descriptors. All downcasting between
//! the erased representation and static types happens in this module.

use crate::{error::Error, key::Key, provider::Provider};

use std::{
    any::Any,
    collections::HashSet,
    sync::Arc,
};

pub use self::{
    any::AnyStore,
    composed::ComposedStore,
    global::GlobalStore,
    lazy::LazyStore,
    strict::StrictStore,
};

pub mod any;
pub mod composed;
pub mod global;
pub mod lazy;
pub mod strict;

mod state;

/// The erased representation every store keeps its values in.
pub type SharedValue = Arc<
    dyn Any
    + Send
    + Sync
>;

/// A stored factory producing an erased value.
///
/// Factories receive mutable access to the store they are being resolved
/// from, so they can resolve other keys re-entrantly to build dependency
/// chains.
pub type FactoryFn<K> = Arc<
    dyn Fn(&mut dyn Store<K>) -> Result<SharedValue, Error<K>>
    + Send
    + Sync
>;

/// The capability contract shared by every store variant.
///
/// Operates on bare keys and erased values; the typed API lives in
/// [`StoreExt`]. The trait is object-safe, and `&mut dyn Store<K>` is the
/// store view handed to factories.
pub trait Store<K: Key> {
    /// Resolves the value stored under `key`.
    ///
    /// Depending on the variant this may evaluate a pending factory.
    fn resolve_key(&mut self, key: &K) -> Result<SharedValue, Error<K>>;

    /// Registers `factory` under `key`, replacing any previous registration.
    fn provide_key(&mut self, key: K, factory: FactoryFn<K>);

    /// Removes the registration for `key`. Unknown keys are a no-op.
    fn revoke_key(&mut self, key: &K);

    /// All keys that received a provide call, whether or not their
    /// resolution succeeds.
    fn provided_keys(&self) -> HashSet<K>;

    /// Returns `true` if `key` is currently provided.
    fn contains(&self, key: &K) -> bool;
}

/// Typed operations and composition helpers for every [`Store`].
///
/// Blanket-implemented, including for `dyn Store<K>`, so factories can use
/// the typed API on the store view they receive.
pub trait StoreExt<K: Key>: Store<K> {
    /// Resolves a value and returns a cloned instance.
    ///
    /// `V` must implement [`Clone`]; otherwise use
    /// [`resolve_shared`](StoreExt::resolve_shared), which returns a shared
    /// pointer.
    fn resolve<V>(&mut self, provider: &Provider<K, V>) -> Result<V, Error<K>>
    where
        V: Clone + Send + Sync + 'static,
    {
        self.resolve_shared(provider)
            .map(|value| value.as_ref().clone())
    }

    /// Resolves a value and returns a shared pointer to it.
    fn resolve_shared<V>(&mut self, provider: &Provider<K, V>) -> Result<Arc<V>, Error<K>>
    where
        V: Send + Sync + 'static,
    {
        let value = self.resolve_key(provider.key())?;
        value.downcast::<V>().map_err(|value| Error::NonMatchingType {
            provided: value.as_ref().type_id(),
            expected: std::any::type_name::<V>(),
        })
    }

    /// Registers a factory for the provider's key.
    ///
    /// When the factory runs depends on the store variant: a
    /// [`StrictStore`] evaluates it here, a [`LazyStore`] on first
    /// resolution.
    fn provide<V, F>(&mut self, provider: &Provider<K, V>, factory: F)
    where
        V: Send + Sync + 'static,
        F: Fn(&mut dyn Store<K>) -> Result<V, Error<K>> + Send + Sync + 'static,
    {
        let factory: FactoryFn<K> = Arc::new(move |store: &mut dyn Store<K>| {
            factory(store).map(|value| Arc::new(value) as SharedValue)
        });
        self.provide_key(provider.key().clone(), factory);
    }

    /// Registers an already materialized value for the provider's key.
    fn provide_value<V>(&mut self, provider: &Provider<K, V>, value: V)
    where
        V: Send + Sync + 'static,
    {
        let value: SharedValue = Arc::new(value);
        let factory: FactoryFn<K> =
            Arc::new(move |_: &mut dyn Store<K>| Ok(value.clone()));
        self.provide_key(provider.key().clone(), factory);
    }

    /// Removes the registration for the provider's key.
    fn revoke<V>(&mut self, provider: &Provider<K, V>) {
        self.revoke_key(provider.key());
    }

    /// Builder form of [`provide`](StoreExt::provide).
    fn providing<V, F>(mut self, provider: &Provider<K, V>, factory: F) -> Self
    where
        Self: Sized,
        V: Send + Sync + 'static,
        F: Fn(&mut dyn Store<K>) -> Result<V, Error<K>> + Send + Sync + 'static,
    {
        self.provide(provider, factory);
        self
    }

    /// Builder form of [`provide_value`](StoreExt::provide_value).
    fn providing_value<V>(mut self, provider: &Provider<K, V>, value: V) -> Self
    where
        Self: Sized,
        V: Send + Sync + 'static,
    {
        self.provide_value(provider, value);
        self
    }

    /// Builder form of [`revoke`](StoreExt::revoke).
    fn revoking<V>(mut self, provider: &Provider<K, V>) -> Self
    where
        Self: Sized,
    {
        self.revoke(provider);
        self
    }

    /// Wraps this store behind a shared, reference-semantics handle.
    fn globalize(self) -> GlobalStore<Self>
    where
        Self: Sized,
    {
        GlobalStore::new(self)
    }

    /// Hides the concrete store type behind [`AnyStore`].
    fn erase(self) -> AnyStore<K>
    where
        Self: Sized + Clone + Send + Sync + 'static,
    {
        AnyStore::new(self)
    }

    /// Composes this store with a fallback consulted when a key cannot be
    /// resolved here.
    fn compose_with<R>(self, fallback: R) -> ComposedStore<K>
    where
        Self: Sized + Clone + Send + Sync + 'static,
        R: Store<K> + Clone + Send + Sync + 'static,
    {
        ComposedStore::new(self, fallback)
    }
}

impl<K: Key, S: Store<K> + ?Sized> StoreExt<K> for S {}
