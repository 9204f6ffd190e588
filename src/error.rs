//! Describes injection errors

use std::{
    any::TypeId,
    error::Error as StdError,
    fmt::{self, Debug, Display, Formatter},
    sync::Arc,
};

type BoxedCause = Arc<
    dyn StdError
    + Send
    + Sync
>;

/// An error produced while resolving or providing a value.
///
/// All failures are returned as values; resolution never panics. `K` is the
/// key type of the store that produced the error.
#[derive(Debug, Clone)]
pub enum Error<K> {
    /// No value has been provided for the key.
    KeyNotProvided(K),
    /// A typed [`Provider`](crate::Provider) resolved a stored value whose
    /// runtime type disagrees with the provider's declared type.
    ///
    /// Usually means two providers share a key with different value types.
    NonMatchingType {
        /// Runtime type of the stored value.
        provided: TypeId,
        /// Type the provider expected.
        expected: &'static str,
    },
    /// A deferred resolution revisited a key that is still being evaluated.
    CyclicDependency(K),
    /// Any error raised by a factory that is not one of the built-in kinds.
    Custom(BoxedCause),
    /// Both sides of a fallback pair failed; carries both underlying errors.
    Composed(Box<Error<K>>, Box<Error<K>>),
}

impl<K> Error<K> {
    /// Wraps an arbitrary factory error.
    #[inline]
    pub fn custom(err: impl StdError + Send + Sync + 'static) -> Self {
        Error::Custom(Arc::new(err))
    }
}

impl<K: PartialEq> Error<K> {
    /// Aggregates the failures of both sides of a fallback pair for `key`.
    ///
    /// Two `KeyNotProvided` errors for the resolved key collapse into one;
    /// if only one side misses the key, the other side's error wins. A
    /// `KeyNotProvided` for a different key is a missing transitive
    /// dependency and is kept.
    pub(crate) fn compose(key: &K, left: Self, right: Self) -> Self {
        match (left, right) {
            (Error::KeyNotProvided(lk), Error::KeyNotProvided(rk))
                if lk == *key && rk == *key => Error::KeyNotProvided(lk),
            (Error::KeyNotProvided(lk), right) if lk == *key => right,
            (left, Error::KeyNotProvided(rk)) if rk == *key => left,
            (left, right) => Error::Composed(Box::new(left), Box::new(right)),
        }
    }
}

/// Compares errors by kind.
///
/// Ignores [`Error::Custom`]'s payload and [`Error::NonMatchingType`]'s
/// `provided` field, so tests can assert on the error kind without matching
/// opaque payloads.
impl<K: PartialEq> PartialEq for Error<K> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Error::KeyNotProvided(lhs), Error::KeyNotProvided(rhs)) => lhs == rhs,
            (Error::NonMatchingType { expected: lhs, .. },
             Error::NonMatchingType { expected: rhs, .. }) => lhs == rhs,
            (Error::CyclicDependency(lhs), Error::CyclicDependency(rhs)) => lhs == rhs,
            (Error::Custom(_), Error::Custom(_)) => true,
            (Error::Composed(ll, lr), Error::Composed(rl, rr)) => ll == rl && lr == rr,
            _ => false,
        }
    }
}

impl<K: Debug> Display for Error<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyNotProvided(key) =>
                write!(f, "Injection Error: no value provided for key {key:?}"),
            Error::NonMatchingType { expected, .. } =>
                write!(f, "Injection Error: the stored value is not of type {expected}"),
            Error::CyclicDependency(key) =>
                write!(f, "Injection Error: cyclic dependency while resolving key {key:?}"),
            Error::Custom(err) => write!(f, "{err}"),
            Error::Composed(left, right) =>
                write!(f, "Injection Error: both stores failed: {left}; {right}"),
        }
    }
}

impl<K: Debug + 'static> StdError for Error<K> {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Custom(err) => Some(err.as_ref()),
            Error::Composed(left, _) => Some(left.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Error;
    use std::any::TypeId;
    use std::io;

    fn io_err(msg: &str) -> Error<String> {
        Error::custom(io::Error::other(msg.to_string()))
    }

    #[test]
    fn it_compares_key_not_provided_by_key() {
        let lhs: Error<String> = Error::KeyNotProvided("a".into());
        assert_eq!(lhs, Error::KeyNotProvided("a".into()));
        assert_ne!(lhs, Error::KeyNotProvided("b".into()));
    }

    #[test]
    fn it_ignores_custom_payload_for_equality() {
        assert_eq!(io_err("first"), io_err("completely different"));
    }

    #[test]
    fn it_compares_non_matching_type_by_expected_only() {
        let lhs: Error<String> = Error::NonMatchingType {
            provided: TypeId::of::<i32>(),
            expected: "alloc::string::String",
        };
        let rhs = Error::NonMatchingType {
            provided: TypeId::of::<u8>(),
            expected: "alloc::string::String",
        };
        assert_eq!(lhs, rhs);

        let other = Error::NonMatchingType {
            provided: TypeId::of::<i32>(),
            expected: "i32",
        };
        assert_ne!(lhs, other);
    }

    #[test]
    fn it_distinguishes_kinds() {
        let not_provided: Error<String> = Error::KeyNotProvided("a".into());
        let cyclic: Error<String> = Error::CyclicDependency("a".into());
        assert_ne!(not_provided, cyclic);
        assert_ne!(cyclic, io_err("x"));
    }

    #[test]
    fn it_collapses_double_key_not_provided() {
        let key = "k".to_string();
        let composed = Error::compose(
            &key,
            Error::KeyNotProvided(key.clone()),
            Error::KeyNotProvided(key.clone()),
        );
        assert_eq!(composed, Error::KeyNotProvided(key));
    }

    #[test]
    fn it_surfaces_the_more_specific_side() {
        let key = "k".to_string();
        let composed = Error::compose(&key, Error::KeyNotProvided(key.clone()), io_err("boom"));
        assert_eq!(composed, io_err("boom"));

        let composed = Error::compose(&key, io_err("boom"), Error::KeyNotProvided(key.clone()));
        assert_eq!(composed, io_err("boom"));
    }

    #[test]
    fn it_keeps_missing_transitive_dependencies() {
        let key = "k".to_string();
        let composed = Error::compose(
            &key,
            Error::KeyNotProvided("dependency".to_string()),
            Error::KeyNotProvided(key.clone()),
        );
        assert_eq!(composed, Error::KeyNotProvided("dependency".to_string()));

        let composed = Error::compose(
            &key,
            Error::KeyNotProvided("dependency".to_string()),
            io_err("boom"),
        );
        assert!(matches!(composed, Error::Composed(..)));
    }

    #[test]
    fn it_aggregates_two_real_failures() {
        let key = "k".to_string();
        let composed = Error::compose(&key, io_err("left"), Error::CyclicDependency(key.clone()));
        match composed {
            Error::Composed(left, right) => {
                assert_eq!(*left, io_err("left"));
                assert_eq!(*right, Error::CyclicDependency(key));
            }
            other => panic!("expected a composed error, got {other:?}"),
        }
    }

    #[test]
    fn it_displays_the_key() {
        let err: Error<String> = Error::KeyNotProvided("base_url".into());
        assert_eq!(
            err.to_string(),
            "Injection Error: no value provided for key \"base_url\""
        );
    }
}
