// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for resolving and building composite configurations.

mod common;

use common::{init_tracing, ScriptedFetcher};
use remotecfg::domain::{LayerStatus, WarningKind};
use remotecfg::prelude::*;
use std::sync::Arc;
use std::time::Duration;

const GROUP: &str = "DEFAULT_GROUP";

fn shared(fetcher: ScriptedFetcher) -> (Arc<ScriptedFetcher>, CompositeBuilder) {
    let fetcher = Arc::new(fetcher);
    let builder = CompositeBuilder::from_shared(fetcher.clone());
    (fetcher, builder)
}

#[test]
fn test_no_profiles_fetches_base_only() {
    init_tracing();
    let (fetcher, builder) = shared(ScriptedFetcher::new().with_document("app.properties", "a=1"));

    let config = builder.build(&AppIdentity::new("app"));

    assert_eq!(fetcher.requested_ids(), vec!["app.properties"]);
    assert_eq!(config.get("a"), Some("1"));
    assert_eq!(config.outcomes().len(), 1);
}

#[test]
fn test_layers_fetched_in_resolution_order() {
    init_tracing();
    let (fetcher, builder) = shared(ScriptedFetcher::new());
    let identity = AppIdentity::new("app")
        .with_group("TEAM")
        .with_file_extension("yaml")
        .with_profiles(["prod", "dev", "local"]);

    builder.build(&identity);

    let calls = fetcher.calls();
    let ids: Vec<&str> = calls.iter().map(|(id, _, _)| id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["app.yaml", "app-prod.yaml", "app-dev.yaml", "app-local.yaml"]
    );
    assert!(calls.iter().all(|(_, group, _)| group == "TEAM"));
}

#[test]
fn test_fetch_timeout_is_passed_through() {
    let (fetcher, builder) = shared(ScriptedFetcher::new());
    let builder = builder.with_settings(ResolverSettings::default().with_fetch_timeout_millis(750));

    builder.build(&AppIdentity::new("app"));

    assert_eq!(fetcher.calls()[0].2, Duration::from_millis(750));
}

#[test]
fn test_default_fetch_timeout_is_three_seconds() {
    let (fetcher, builder) = shared(ScriptedFetcher::new());

    builder.build(&AppIdentity::new("app"));

    assert_eq!(fetcher.calls()[0].2, Duration::from_millis(3000));
}

#[test]
fn test_prefix_replaces_name_in_data_ids() {
    let (fetcher, builder) = shared(ScriptedFetcher::new());
    let identity = AppIdentity::new("orders")
        .with_prefix("shop")
        .with_profile("dev");

    builder.build(&identity);

    assert_eq!(
        fetcher.requested_ids(),
        vec!["shop.properties", "shop-dev.properties"]
    );
}

#[test]
fn test_empty_prefix_falls_back_to_name() {
    let (fetcher, builder) = shared(ScriptedFetcher::new());

    builder.build(&AppIdentity::new("orders").with_prefix(""));

    assert_eq!(fetcher.requested_ids(), vec!["orders.properties"]);
}

#[test]
fn test_missing_overlay_gives_base_without_warning() {
    init_tracing();
    let (_, builder) = shared(ScriptedFetcher::new().with_document("app.properties", "a=1\nb=1"));

    let config = builder.build(&AppIdentity::new("app").with_profile("dev"));

    assert_eq!(config.get("a"), Some("1"));
    assert_eq!(config.get("b"), Some("1"));
    assert!(config.warnings().is_empty());
    assert_eq!(config.layers().len(), 1);
    assert_eq!(config.outcomes()[1].status, LayerStatus::NotFound);
}

#[test]
fn test_malformed_overlay_gives_base_with_one_warning() {
    init_tracing();
    let (_, builder) = shared(
        ScriptedFetcher::new()
            .with_document("app.properties", "a=1")
            .with_document("app-dev.properties", "broken=\\u12"),
    );

    let config = builder.build(&AppIdentity::new("app").with_profile("dev"));

    assert_eq!(config.get("a"), Some("1"));
    assert!(!config.contains_key("broken"));
    assert_eq!(config.warnings().len(), 1);
    let warning = &config.warnings()[0];
    assert_eq!(warning.kind, WarningKind::ParseFailed);
    assert_eq!(warning.data_id, Some(DataId::from("app-dev.properties")));
    assert!(warning.to_string().contains("app-dev.properties"));
    assert_eq!(config.outcomes()[1].status, LayerStatus::ParseFailed);
}

#[test]
#[cfg(feature = "yaml")]
fn test_malformed_yaml_overlay_is_skipped() {
    let (_, builder) = shared(
        ScriptedFetcher::new()
            .with_document("app.yaml", "server:\n  port: 8080\n")
            .with_document("app-dev.yaml", "server: [unclosed\n"),
    );
    let identity = AppIdentity::new("app")
        .with_file_extension("yaml")
        .with_profile("dev");

    let config = builder.build(&identity);

    assert_eq!(config.get("server.port"), Some("8080"));
    assert_eq!(config.warnings().len(), 1);
    assert_eq!(config.warnings()[0].kind, WarningKind::ParseFailed);
}

#[test]
fn test_failed_fetch_is_skipped_and_later_layers_still_apply() {
    let (_, builder) = shared(
        ScriptedFetcher::new()
            .with_document("app.properties", "a=1\nb=1\nc=1")
            .with_failure("app-one.properties", "connection reset")
            .with_document("app-two.properties", "c=2"),
    );

    let config = builder.build(&AppIdentity::new("app").with_profiles(["one", "two"]));

    assert_eq!(config.get("c"), Some("2"));
    assert_eq!(config.warnings().len(), 1);
    assert_eq!(config.warnings()[0].kind, WarningKind::FetchFailed);
    assert!(config.warnings()[0].message.contains("connection reset"));
}

#[test]
fn test_unknown_extension_is_reported_as_unsupported() {
    let (fetcher, builder) = shared(
        ScriptedFetcher::new()
            .with_document("app.toml", "a = 1")
            .with_document("app-dev.toml", "a = 2"),
    );
    let identity = AppIdentity::new("app")
        .with_file_extension("toml")
        .with_profile("dev");

    let config = builder.build(&identity);

    assert!(config.is_empty());
    assert_eq!(fetcher.calls().len(), 2);
    assert_eq!(config.warnings().len(), 2);
    assert!(config
        .warnings()
        .iter()
        .all(|w| w.kind == WarningKind::UnsupportedFormat));
}

#[test]
fn test_no_service_gives_empty_composite() {
    init_tracing();
    let config = CompositeBuilder::unavailable("no server address configured")
        .build(&AppIdentity::new("app").with_profile("dev"));

    assert!(config.is_empty());
    assert_eq!(config.name(), "REMOTE");
    assert_eq!(config.warnings().len(), 1);
    assert_eq!(config.warnings()[0].kind, WarningKind::ServiceUnavailable);
}

#[test]
fn test_failed_connect_gives_empty_composite() {
    let builder = CompositeBuilder::connect(|| -> Result<InMemoryConfigStore> {
        Err(ConfigError::ServiceUnavailable {
            message: "connection refused".to_string(),
            source: None,
        })
    });

    assert!(!builder.has_service());
    let config = builder.build(&AppIdentity::new("app"));
    assert!(config.is_empty());
    assert!(config.warnings()[0].message.contains("connection refused"));
}

#[test]
fn test_build_is_idempotent() {
    let (fetcher, builder) = shared(
        ScriptedFetcher::new()
            .with_document("app.properties", "a=1\nb=1")
            .with_document("app-dev.properties", "b=2"),
    );
    let identity = AppIdentity::new("app").with_profile("dev");

    let first = builder.build(&identity);
    let second = builder.build(&identity);

    assert_eq!(first.as_map(), second.as_map());
    assert_eq!(first.outcomes(), second.outcomes());
    assert_eq!(fetcher.calls().len(), 4);
}

#[test]
fn test_composite_name_is_configurable() {
    let (_, builder) = shared(ScriptedFetcher::new());
    let builder =
        builder.with_settings(ResolverSettings::default().with_composite_name("NACOS"));

    assert_eq!(builder.build(&AppIdentity::new("app")).name(), "NACOS");
}

#[test]
fn test_composite_is_a_config_source() {
    let (_, builder) = shared(
        ScriptedFetcher::new()
            .with_document("app.properties", "a=1")
            .with_document("app-dev.properties", "b=2"),
    );
    let config = builder.build(&AppIdentity::new("app").with_profile("dev"));
    let source: &dyn ConfigSource = &config;

    assert_eq!(source.name(), "REMOTE");
    assert_eq!(source.get("b"), Some("2"));
    assert_eq!(source.all_keys(), vec!["a", "b"]);
}

#[test]
fn test_concurrent_fetching_merges_in_resolution_order() {
    init_tracing();
    let store = InMemoryConfigStore::new();
    store.publish("app.properties", GROUP, "k=base\nonly.base=yes");
    store.publish("app-a.properties", GROUP, "k=a");
    store.publish("app-b.properties", GROUP, "k=b");
    store.publish("app-c.properties", GROUP, "k=c");
    // Make earlier layers finish last
    store.delay("app.properties", GROUP, Duration::from_millis(120));
    store.delay("app-a.properties", GROUP, Duration::from_millis(80));
    store.delay("app-b.properties", GROUP, Duration::from_millis(40));

    let builder = CompositeBuilder::new(store)
        .with_settings(ResolverSettings::default().with_fetch_mode(FetchMode::Concurrent));
    let config = builder.build(&AppIdentity::new("app").with_profiles(["a", "b", "c"]));

    assert_eq!(config.get("k"), Some("c"));
    assert_eq!(config.get("only.base"), Some("yes"));
    let statuses: Vec<LayerStatus> = config.outcomes().iter().map(|o| o.status).collect();
    assert_eq!(statuses, vec![LayerStatus::Loaded; 4]);
}

#[test]
fn test_deadline_keeps_completed_layers() {
    let store = InMemoryConfigStore::new();
    store.publish("app.properties", GROUP, "a=1");
    store.publish("app-slow.properties", GROUP, "a=2");
    store.delay("app-slow.properties", GROUP, Duration::from_secs(2));

    let settings = ResolverSettings::default()
        .with_fetch_mode(FetchMode::Concurrent)
        .with_deadline(Duration::from_millis(150));
    let builder = CompositeBuilder::new(store).with_settings(settings);

    let config = builder.build(&AppIdentity::new("app").with_profile("slow"));

    assert_eq!(config.get("a"), Some("1"));
    assert_eq!(config.warnings().len(), 1);
    assert_eq!(
        config.warnings()[0].data_id,
        Some(DataId::from("app-slow.properties"))
    );
}

#[test]
fn test_try_build_surfaces_parse_errors() {
    let (_, builder) = shared(
        ScriptedFetcher::new()
            .with_document("app.properties", "a=1")
            .with_document("app-dev.properties", "b=\\uZZZZ"),
    );

    let result = builder.try_build(&AppIdentity::new("app").with_profile("dev"));

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn test_try_build_tolerates_missing_layers() {
    let (_, builder) = shared(ScriptedFetcher::new().with_document("app.properties", "a=1"));

    let config = builder
        .try_build(&AppIdentity::new("app").with_profile("dev"))
        .unwrap();

    assert_eq!(config.get("a"), Some("1"));
    assert!(config.warnings().is_empty());
}
