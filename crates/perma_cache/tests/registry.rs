// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The process-wide registry. Everything that touches it lives in one test so
//! nothing else in this binary can observe the global slot changing.

use perma_cache::{CacheRegistry, Cacheable, Error, ErrorKind, Memoized, MemoryStore, Options, RebuildFlags};
use perma_cache_store::testing::MockStore;
use serde_json::json;

#[derive(Default)]
struct Widget {
    flags: RebuildFlags,
}

impl Cacheable for Widget {
    type Error = Error;

    fn rebuild_flags(&self) -> &RebuildFlags {
        &self.flags
    }
}

#[test]
fn global_registry_lifecycle() {
    let method: Memoized<Widget, u32> = Memoized::declare("count", Options::new(), |_: &Widget| Ok(3));
    let widget = Widget::default();

    // Nothing set yet: every store-backed entry fails, the bypass still works.
    assert!(perma_cache::clear_cache().is_none());
    for result in [method.call(&widget), method.rebuild(&widget)] {
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::UndefinedCache);
    }
    assert_eq!(method.get_perma_cache(&widget).unwrap_err().kind(), &ErrorKind::UndefinedCache);
    assert_eq!(method.without_perma_cache(&widget).unwrap(), 3);
    assert!(!method.was_rebuilt(&widget));

    // Keys do not need a store.
    assert_eq!(method.perma_cache_key(&widget).unwrap(), "perma_cache/v1/Widget/count");

    // Set a recording store and go through it.
    let recording = MockStore::new();
    perma_cache::set_cache(recording.clone());
    assert!(CacheRegistry::global().is_set());
    assert_eq!(method.call(&widget).unwrap(), 3);
    assert_eq!(recording.peek("perma_cache/v1/Widget/count"), Some(json!(3)));

    // Replacing the store is picked up on the next call.
    perma_cache::set_cache(MemoryStore::new());
    assert_eq!(method.get_perma_cache(&widget).unwrap(), None);
    assert_eq!(recording.read_count(), 1);

    // An injected store wins over the registry.
    let injected = MockStore::new();
    let pinned: Memoized<Widget, u32> =
        Memoized::declare("count", Options::new(), |_: &Widget| Ok(4)).with_store(injected.clone());
    assert_eq!(pinned.call(&widget).unwrap(), 4);
    assert_eq!(injected.write_count(), 1);

    // Clearing restores the undefined state.
    assert!(perma_cache::clear_cache().is_some());
    assert!(perma_cache::cache().err().is_some_and(|e| e.is_undefined_cache()));
    assert_eq!(method.call(&widget).unwrap_err().kind(), &ErrorKind::UndefinedCache);
}
