//! Memoization state for deferred factory evaluation

use super::{FactoryFn, SharedValue};
use crate::error::Error;

use std::fmt::{self, Debug, Formatter};

/// Tracks a registration through its single factory evaluation.
///
/// A deferred registration starts out [`Unresolved`](ResolveState::Unresolved)
/// holding its factory, is marked [`Resolving`](ResolveState::Resolving)
/// while the factory runs, and ends up
/// [`Resolved`](ResolveState::Resolved) with the captured outcome that every
/// later resolution replays. Observing `Resolving` again before the factory
/// finished means the dependency chain looped back on itself.
#[derive(Clone)]
pub(crate) enum ResolveState<K> {
    /// The factory has been recorded but never ran.
    Unresolved(FactoryFn<K>),
    /// The factory is running on this call stack right now.
    Resolving,
    /// The factory ran exactly once; its outcome is replayed forever after.
    Resolved(Result<SharedValue, Error<K>>),
}

impl<K> ResolveState<K> {
    /// Returns `true` while the factory is being evaluated.
    pub(crate) fn is_resolving(&self) -> bool {
        matches!(self, ResolveState::Resolving)
    }
}

impl<K: Debug> Debug for ResolveState<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ResolveState::Unresolved(_) => f.write_str("ResolveState::Unresolved(..)"),
            ResolveState::Resolving => f.write_str("ResolveState::Resolving"),
            ResolveState::Resolved(Ok(_)) => f.write_str("ResolveState::Resolved(Ok(..))"),
            ResolveState::Resolved(Err(err)) => write!(f, "ResolveState::Resolved(Err({err:?}))"),
        }
    }
}
