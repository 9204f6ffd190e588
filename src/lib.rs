//! # Infuse
//!
//! > Typed, keyed dependency injection containers: provide values for keys without
//! > losing any type information, compose stores, and resolve whole dependency
//! > chains on demand.
//!
//! ## Features
//! * Eager ([`StrictStore`]) and deferred ([`LazyStore`]) factory evaluation
//! * Cycle detection for deferred dependency chains
//! * Shared reference-semantics handles ([`GlobalStore`])
//! * Primary/fallback store composition ([`ComposedStore`])
//! * Type erasure without losing the typed API ([`AnyStore`])
//! * Runs on stable Rust 1.80+
//!
//! ## Example
//! ```toml
//! [dependencies]
//! infuse = "0.1"
//! ```
//! ```
//! use infuse::{LazyStore, Provider, Store, StoreExt};
//!
//! let base_url: Provider<String, String> = Provider::new("base_url".into());
//! let health: Provider<String, String> = Provider::new("health_url".into());
//!
//! let mut store = LazyStore::new();
//!
//! // factories may resolve other keys, in any registration order
//! let dep = base_url.clone();
//! store.provide(&health, move |store: &mut dyn Store<String>| {
//!     Ok(format!("{}/health", store.resolve(&dep)?))
//! });
//! store.provide_value(&base_url, "https://my.service".to_string());
//!
//! assert_eq!(store.resolve(&health).unwrap(), "https://my.service/health");
//! ```

#![forbid(unsafe_code)]
#![deny(unreachable_pub)]

pub mod error;
pub mod key;
pub mod provider;
pub mod store;

pub use crate::{
    error::Error,
    key::{Key, TypedKey},
    provider::Provider,
    store::{
        AnyStore,
        ComposedStore,
        FactoryFn,
        GlobalStore,
        LazyStore,
        SharedValue,
        Store,
        StoreExt,
        StrictStore,
    },
};
