//! End-to-end composition scenarios across store variants

use infuse::{LazyStore, Provider, Store, StoreExt, StrictStore, TypedKey};
use std::sync::{Arc, Mutex};

enum Services {}

type ServiceKey = TypedKey<Services>;

fn provider<V>(name: &'static str) -> Provider<ServiceKey, V> {
    Provider::new(name.into())
}

#[derive(Clone)]
struct NetworkService {
    base_url: String,
}

#[derive(Clone)]
struct DataManager {
    network: NetworkService,
}

#[test]
fn a_lazy_chain_resolves_in_dependency_order() {
    let base_url: Provider<ServiceKey, String> = provider("base_url");
    let network: Provider<ServiceKey, NetworkService> = provider("network_service");
    let manager: Provider<ServiceKey, DataManager> = provider("data_manager");

    let evaluated = Arc::new(Mutex::new(Vec::new()));

    let mut store = LazyStore::new();

    let log = evaluated.clone();
    store.provide(&base_url, move |_| {
        log.lock().unwrap().push("base_url");
        Ok("https://my.base.url/".to_string())
    });

    let log = evaluated.clone();
    let manager_dep = network.clone();
    store.provide(&manager, move |store: &mut dyn Store<ServiceKey>| {
        log.lock().unwrap().push("data_manager");
        Ok(DataManager {
            network: store.resolve(&manager_dep)?,
        })
    });

    let log = evaluated.clone();
    let network_dep = base_url.clone();
    store.provide(&network, move |store: &mut dyn Store<ServiceKey>| {
        log.lock().unwrap().push("network_service");
        Ok(NetworkService {
            base_url: store.resolve(&network_dep)?,
        })
    });

    // nothing ran at provide time
    assert!(evaluated.lock().unwrap().is_empty());

    let resolved = store.resolve(&manager).unwrap();
    assert_eq!(resolved.network.base_url, "https://my.base.url/");

    // the chain evaluated on demand, dependencies last-registered first
    assert_eq!(
        *evaluated.lock().unwrap(),
        ["data_manager", "network_service", "base_url"]
    );

    // every factory ran exactly once
    store.resolve(&network).unwrap();
    store.resolve(&base_url).unwrap();
    assert_eq!(evaluated.lock().unwrap().len(), 3);
}

#[test]
fn request_stores_shadow_shared_defaults() {
    let greeting: Provider<ServiceKey, String> = provider("greeting");
    let audience: Provider<ServiceKey, String> = provider("audience");

    let mut defaults = LazyStore::new().globalize();
    defaults.provide_value(&greeting, "hello".to_string());
    defaults.provide_value(&audience, "world".to_string());

    let mut request = StrictStore::new().compose_with(defaults.clone());
    request.provide_value(&audience, "rustaceans".to_string());

    assert_eq!(request.resolve(&greeting).unwrap(), "hello");
    assert_eq!(request.resolve(&audience).unwrap(), "rustaceans");

    // a second request sees the untouched defaults
    let mut request = StrictStore::new().compose_with(defaults.clone());
    assert_eq!(request.resolve(&audience).unwrap(), "world");

    // updating the shared defaults reaches composed stores built earlier
    defaults.provide_value(&greeting, "howdy".to_string());
    assert_eq!(request.resolve(&greeting).unwrap(), "howdy");
}

#[test]
fn snapshots_isolate_from_later_default_changes() {
    let port: Provider<ServiceKey, u16> = provider("port");

    let mut defaults = StrictStore::new().globalize();
    defaults.provide_value(&port, 8080);

    let mut frozen = defaults.snapshot();
    defaults.provide_value(&port, 9090);

    assert_eq!(frozen.resolve(&port).unwrap(), 8080);
    assert_eq!(defaults.resolve(&port).unwrap(), 9090);
}

#[test]
fn heterogeneous_stores_compose_through_erasure() {
    let n: Provider<ServiceKey, i32> = provider("n");
    let next: Provider<ServiceKey, i32> = provider("n+1");

    // a lazy local store over strict shared defaults
    let mut defaults = StrictStore::new();
    defaults.provide_value(&n, 3);

    let mut store = LazyStore::new().compose_with(defaults.globalize());

    let dep = n.clone();
    store.provide(&next, move |store: &mut dyn Store<ServiceKey>| {
        Ok(store.resolve(&dep)? + 1)
    });

    assert_eq!(store.resolve(&next).unwrap(), 4);

    let keys = store.provided_keys();
    assert!(keys.contains(&ServiceKey::new("n")));
    assert!(keys.contains(&ServiceKey::new("n+1")));
}
