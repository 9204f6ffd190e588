//! Typed descriptors that bind a key to a value type

use std::{
    any,
    fmt::{self, Debug, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// Adds static type information to a key.
///
/// A `Provider<K, V>` promises that the value stored under its key is a `V`,
/// which lets [`StoreExt::resolve`](crate::StoreExt::resolve) hand back a
/// typed value from an otherwise type-erased store. Equality and hashing are
/// defined by the key only.
///
/// ```
/// use infuse::Provider;
///
/// let base_url: Provider<String, String> = Provider::new("base_url".into());
/// assert_eq!(base_url.key(), "base_url");
/// ```
pub struct Provider<K, V> {
    key: K,
    value: PhantomData<fn() -> V>,
}

impl<K, V> Provider<K, V> {
    /// Creates a provider representing the given key.
    #[inline]
    pub fn new(key: K) -> Self {
        Self {
            key,
            value: PhantomData,
        }
    }

    /// The represented key.
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// Unwraps the represented key.
    #[inline]
    pub fn into_key(self) -> K {
        self.key
    }
}

impl<V> Provider<String, V> {
    /// Creates a provider whose key is derived from the value type's name.
    ///
    /// Handy when a type is only ever registered once per store and a
    /// separate key constant would just repeat its name.
    #[inline]
    pub fn from_type() -> Self {
        Self::new(any::type_name::<V>().to_string())
    }
}

impl<K: Clone, V> Clone for Provider<K, V> {
    #[inline]
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl<K: PartialEq, V> PartialEq for Provider<K, V> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<K: Eq, V> Eq for Provider<K, V> {}

impl<K: Hash, V> Hash for Provider<K, V> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: Debug, V> Debug for Provider<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider")
            .field("key", &self.key)
            .field("value", &any::type_name::<V>())
            .finish()
    }
}
