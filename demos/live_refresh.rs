// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live refresh example.
//!
//! This example demonstrates:
//! - Subscribing to every layer an identity resolves to
//! - Rebuilding the composite when a layer changes
//! - Picking up an overlay that did not exist at startup
//! - Sharing the latest composite between threads
//!
//! To run this example:
//! ```bash
//! cargo run --example live_refresh
//! ```

use remotecfg::prelude::*;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

const GROUP: &str = "DEFAULT_GROUP";

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Remote Configuration: Live Refresh ===\n");

    let store = InMemoryConfigStore::new();
    store.publish("pricing.properties", GROUP, "discount=0\ncurrency=EUR");

    let identity = AppIdentity::new("pricing").with_profile("sale");
    let builder = Arc::new(CompositeBuilder::new(store.clone()));
    let current = Arc::new(RwLock::new(builder.build(&identity)));

    // Change notifications are forwarded to a refresh thread
    let (tx, rx) = mpsc::channel::<LayerRequest>();
    let tx = Mutex::new(tx);
    let mut watcher = store.watcher();
    let watched = builder.watch_layers(
        &identity,
        &mut watcher,
        Arc::new(move |layer: &LayerRequest| {
            if let Ok(tx) = tx.lock() {
                let _ = tx.send(layer.clone());
            }
        }),
    )?;
    println!("Watching: {:?}\n", watched.iter().map(|l| l.to_string()).collect::<Vec<_>>());

    let refresher = {
        let builder = Arc::clone(&builder);
        let current = Arc::clone(&current);
        let identity = identity.clone();
        thread::spawn(move || {
            while let Ok(layer) = rx.recv_timeout(Duration::from_millis(500)) {
                println!("↻ {} changed, rebuilding", layer);
                let rebuilt = builder.build(&identity);
                if let Ok(mut current) = current.write() {
                    *current = rebuilt;
                }
            }
        })
    };

    let show = |label: &str| {
        if let Ok(config) = current.read() {
            println!(
                "{:<24} discount={} currency={}",
                label,
                config.get("discount").unwrap_or("-"),
                config.get("currency").unwrap_or("-")
            );
        }
    };

    show("startup:");

    store.publish("pricing-sale.properties", GROUP, "discount=20");
    thread::sleep(Duration::from_millis(100));
    show("after sale overlay:");

    store.publish("pricing.properties", GROUP, "discount=0\ncurrency=USD");
    thread::sleep(Duration::from_millis(100));
    show("after base change:");

    store.remove("pricing-sale.properties", GROUP);
    thread::sleep(Duration::from_millis(100));
    show("after sale ended:");

    watcher.stop()?;
    let _ = refresher.join();

    println!("\n=== Example Complete ===");
    Ok(())
}
