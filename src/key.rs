//! Keys that identify registrations within a store

use std::{
    borrow::Cow,
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

/// A value that can identify a registration within a store.
///
/// Implemented automatically for every type with the required capabilities,
/// so plain `String`s, integers or custom id types all work as keys.
pub trait Key: Eq + Hash + Clone + Debug + Send + Sync + 'static {}

impl<K: Eq + Hash + Clone + Debug + Send + Sync + 'static> Key for K {}

/// A string key tagged with a phantom namespace type.
///
/// The namespace is usually an empty marker type, declared only so keys of
/// different subsystems cannot be mixed up at compile time:
///
/// ```
/// use infuse::TypedKey;
///
/// enum Services {}
///
/// let key: TypedKey<Services> = "base_url".into();
/// assert_eq!(key.name(), "base_url");
/// ```
pub struct TypedKey<Ns> {
    name: Cow<'static, str>,
    namespace: PhantomData<fn() -> Ns>,
}

impl<Ns> TypedKey<Ns> {
    /// Creates a new key with the given name.
    #[inline]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            namespace: PhantomData,
        }
    }

    /// The name of the represented key.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<Ns> From<&'static str> for TypedKey<Ns> {
    #[inline]
    fn from(name: &'static str) -> Self {
        Self::new(name)
    }
}

impl<Ns> From<String> for TypedKey<Ns> {
    #[inline]
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl<Ns> Clone for TypedKey<Ns> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            namespace: PhantomData,
        }
    }
}

impl<Ns> PartialEq for TypedKey<Ns> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<Ns> Eq for TypedKey<Ns> {}

impl<Ns> Hash for TypedKey<Ns> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<Ns> Display for TypedKey<Ns> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<Ns> Debug for TypedKey<Ns> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", std::any::type_name::<Ns>(), self.name)
    }
}
