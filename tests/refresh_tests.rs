// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for change notification and rebuilding.

use remotecfg::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const GROUP: &str = "DEFAULT_GROUP";

fn identity() -> AppIdentity {
    AppIdentity::new("app").with_profile("dev")
}

#[test]
fn test_rebuild_after_change_sees_new_values() {
    let store = InMemoryConfigStore::new();
    store.publish("app.properties", GROUP, "a=1");
    let builder = CompositeBuilder::new(store.clone());

    let before = builder.build(&identity());
    store.publish("app.properties", GROUP, "a=2");
    let after = builder.build(&identity());

    // A composite is a snapshot; rebuilding is how changes are picked up
    assert_eq!(before.get("a"), Some("1"));
    assert_eq!(after.get("a"), Some("2"));
}

#[test]
fn test_watch_reports_changed_layer() {
    let store = InMemoryConfigStore::new();
    store.publish("app.properties", GROUP, "a=1");
    let builder = CompositeBuilder::new(store.clone());
    let mut watcher = store.watcher();

    let changed = Arc::new(Mutex::new(Vec::new()));
    let changed_clone = Arc::clone(&changed);
    builder
        .watch_layers(
            &identity(),
            &mut watcher,
            Arc::new(move |layer: &LayerRequest| {
                changed_clone.lock().unwrap().push(layer.data_id.to_string());
            }),
        )
        .unwrap();

    store.publish("app.properties", GROUP, "a=2");
    store.publish("app-dev.properties", GROUP, "a=3");
    store.remove("app-dev.properties", GROUP);

    assert_eq!(
        *changed.lock().unwrap(),
        vec!["app.properties", "app-dev.properties", "app-dev.properties"]
    );
}

#[test]
fn test_unrelated_documents_do_not_notify() {
    let store = InMemoryConfigStore::new();
    let builder = CompositeBuilder::new(store.clone());
    let mut watcher = store.watcher();

    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    builder
        .watch_layers(
            &identity(),
            &mut watcher,
            Arc::new(move |_: &LayerRequest| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

    store.publish("other.properties", GROUP, "a=1");
    store.publish("app-prod.properties", GROUP, "a=1");
    store.publish("app.properties", "OTHER_GROUP", "a=1");

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[test]
fn test_stop_ends_notifications() {
    let store = InMemoryConfigStore::new();
    let builder = CompositeBuilder::new(store.clone());
    let mut watcher = store.watcher();

    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    builder
        .watch_layers(
            &identity(),
            &mut watcher,
            Arc::new(move |_: &LayerRequest| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

    store.publish("app.properties", GROUP, "a=1");
    watcher.stop().unwrap();
    store.publish("app.properties", GROUP, "a=2");

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_refresh_loop_rebuilds_on_another_thread() {
    let store = InMemoryConfigStore::new();
    store.publish("app.properties", GROUP, "mode=initial");
    let builder = Arc::new(CompositeBuilder::new(store.clone()));
    let mut watcher = store.watcher();

    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    builder
        .watch_layers(
            &identity(),
            &mut watcher,
            Arc::new(move |_: &LayerRequest| {
                let _ = tx.lock().unwrap().send(());
            }),
        )
        .unwrap();

    let refresher = {
        let builder = Arc::clone(&builder);
        std::thread::spawn(move || {
            rx.recv_timeout(Duration::from_secs(5)).unwrap();
            builder.build(&identity())
        })
    };

    store.publish("app-dev.properties", GROUP, "mode=dev");

    let refreshed = refresher.join().unwrap();
    assert_eq!(refreshed.get("mode"), Some("dev"));
}
