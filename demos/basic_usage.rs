// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the remote configuration resolver.
//!
//! This example demonstrates:
//! - Publishing documents to an in-memory store
//! - Building a composite configuration for an application
//! - Reading values, with and without type conversion
//! - Inspecting per-layer outcomes and warnings
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use remotecfg::prelude::*;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== Remote Configuration: Basic Usage ===\n");

    let store = InMemoryConfigStore::new();
    store.publish(
        "orders.properties",
        "DEFAULT_GROUP",
        "server.port=8080\n\
         server.host=localhost\n\
         feature.search=true\n\
         # request timeout in seconds\n\
         http.timeout=2.5\n",
    );

    let identity = AppIdentity::new("orders");
    let builder = CompositeBuilder::new(store);
    let config = builder.build(&identity);

    // Example 1: Raw string values
    println!("--- Example 1: String Values ---");
    match config.get("server.host") {
        Some(host) => println!("✓ server.host = {}", host),
        None => println!("✗ server.host not set"),
    }
    let region = config.get("deploy.region").unwrap_or("eu-west-1");
    println!("  deploy.region = {} (default)", region);

    // Example 2: Typed values
    println!("\n--- Example 2: Typed Values ---");
    let port: u16 = config.get_parsed("server.port")?.unwrap_or(80);
    let search: bool = config.get_parsed("feature.search")?.unwrap_or(false);
    let timeout: f64 = config.get_parsed("http.timeout")?.unwrap_or(1.0);
    println!("✓ server.port = {} (u16)", port);
    println!("✓ feature.search = {} (bool)", search);
    println!("✓ http.timeout = {} (f64)", timeout);

    // Example 3: Conversion errors are reported, not hidden
    println!("\n--- Example 3: Conversion Errors ---");
    match config.get_parsed::<u16>("server.host") {
        Ok(value) => println!("  unexpected value: {:?}", value),
        Err(e) => println!("✓ {}", e),
    }

    // Example 4: What the builder did
    println!("\n--- Example 4: Layer Outcomes ---");
    for outcome in config.outcomes() {
        println!("  {} -> {:?}", outcome.request, outcome.status);
    }
    println!("  {} keys, {} warnings", config.len(), config.warnings().len());

    println!("\n=== Example Complete ===");
    Ok(())
}
