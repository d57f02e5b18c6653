// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile overlay example.
//!
//! This example demonstrates:
//! - A base YAML document with per-profile overlays
//! - How later profiles override earlier ones key by key
//! - Missing overlays being skipped silently
//! - Broken overlays being skipped with a warning
//! - Building the identity from the command line
//!
//! To run this example:
//! ```bash
//! cargo run --example profile_overlays -- --name orders --file-extension yaml --profiles dev,local
//! ```

use remotecfg::prelude::*;

const GROUP: &str = "DEFAULT_GROUP";

fn seed(store: &InMemoryConfigStore) {
    store.publish(
        "orders.yaml",
        GROUP,
        r#"
server:
  port: 8080
  host: 0.0.0.0
database:
  url: postgres://db.internal/orders
  pool: 10
log:
  level: info
"#,
    );
    store.publish(
        "orders-dev.yaml",
        GROUP,
        r#"
database:
  url: postgres://localhost/orders_dev
log:
  level: debug
"#,
    );
    store.publish(
        "orders-local.yaml",
        GROUP,
        r#"
server:
  port: 9090
"#,
    );
    store.publish("orders-broken.yaml", GROUP, "database: [unterminated\n");
}

fn print_config(config: &CompositeConfiguration) {
    for key in config.keys() {
        let source = config
            .winning_layer(key)
            .map(|layer| layer.data_id().to_string())
            .unwrap_or_default();
        println!("  {:<16} = {:<32} ({})", key, config.get(key).unwrap_or(""), source);
    }
    for warning in config.warnings() {
        println!("  ⚠ {}", warning);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Remote Configuration: Profile Overlays ===\n");

    let store = InMemoryConfigStore::new();
    seed(&store);
    let builder = CompositeBuilder::new(store);

    // Fall back to a fixed identity when no arguments are given
    #[cfg(feature = "cli")]
    let identity = if std::env::args().len() > 1 {
        IdentityArgs::from_env_args()?.into_parts().0
    } else {
        AppIdentity::new("orders")
            .with_file_extension("yaml")
            .with_profiles(["dev", "local"])
    };
    #[cfg(not(feature = "cli"))]
    let identity = AppIdentity::new("orders")
        .with_file_extension("yaml")
        .with_profiles(["dev", "local"]);

    println!("--- Requested identity: {:?} ---", identity.active_profiles());
    print_config(&builder.build(&identity));

    println!("\n--- Base only ---");
    print_config(&builder.build(&AppIdentity::new("orders").with_file_extension("yaml")));

    println!("\n--- Missing overlay (prod) ---");
    let prod = AppIdentity::new("orders")
        .with_file_extension("yaml")
        .with_profile("prod");
    print_config(&builder.build(&prod));

    println!("\n--- Broken overlay ---");
    let broken = AppIdentity::new("orders")
        .with_file_extension("yaml")
        .with_profiles(["dev", "broken"]);
    print_config(&builder.build(&broken));

    println!("\n=== Example Complete ===");
    Ok(())
}
