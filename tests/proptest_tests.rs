// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property-based tests using proptest.
//!
//! These tests check the resolution and merge rules against arbitrary
//! identities and layer contents.

use indexmap::IndexMap;
use proptest::prelude::*;
use remotecfg::domain::{merge_layers, AppIdentity, ConfigFormat, DataId, ParsedLayer};
use remotecfg::service::LayerResolver;

fn segment() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}"
}

fn layer(values: IndexMap<String, String>, index: usize) -> ParsedLayer {
    ParsedLayer::new(
        DataId::from(format!("layer{}.properties", index)),
        "G",
        ConfigFormat::Properties,
        values,
    )
}

fn layer_values() -> impl Strategy<Value = IndexMap<String, String>> {
    prop::collection::vec(("[a-e]", "[0-9]{1,3}"), 0..6)
        .prop_map(|pairs| pairs.into_iter().collect())
}

// N profiles always resolve to N + 1 layers, base first, in declaration order
proptest! {
    #[test]
    fn test_resolution_is_base_then_profiles(
        name in segment(),
        extension in "(properties|yaml|json)",
        profiles in prop::collection::vec(segment(), 0..6),
    ) {
        let identity = AppIdentity::new(name.clone())
            .with_file_extension(extension.clone())
            .with_profiles(profiles.clone());

        let layers = LayerResolver::resolve(&identity);

        prop_assert_eq!(layers.len(), profiles.len() + 1);
        prop_assert_eq!(layers[0].data_id.as_str(), format!("{}.{}", name, extension));
        for (layer, profile) in layers[1..].iter().zip(&profiles) {
            prop_assert_eq!(
                layer.data_id.as_str(),
                format!("{}-{}.{}", name, profile, extension)
            );
        }
    }
}

// Distinct profiles yield distinct data ids
proptest! {
    #[test]
    fn test_key_building_is_injective(
        prefix in segment(),
        a in prop::option::of(segment()),
        b in prop::option::of(segment()),
    ) {
        prop_assume!(a != b);
        let first = DataId::build(&prefix, a.as_deref(), "yaml");
        let second = DataId::build(&prefix, b.as_deref(), "yaml");
        prop_assert_ne!(first, second);
    }
}

// Every key takes its value from the last layer that defines it
proptest! {
    #[test]
    fn test_merge_takes_last_definition(
        contents in prop::collection::vec(layer_values(), 0..5),
    ) {
        let layers: Vec<ParsedLayer> = contents
            .iter()
            .cloned()
            .enumerate()
            .map(|(i, values)| layer(values, i))
            .collect();

        let merged = merge_layers(&layers);

        for (key, value) in &merged {
            let expected = contents.iter().rev().find_map(|values| values.get(key));
            prop_assert_eq!(Some(value), expected);
        }
        let defined: usize = {
            let mut all: Vec<&String> = contents.iter().flat_map(|v| v.keys()).collect();
            all.sort();
            all.dedup();
            all.len()
        };
        prop_assert_eq!(merged.len(), defined);
    }
}

// Merging a single layer reproduces it
proptest! {
    #[test]
    fn test_single_layer_merge_is_identity(values in layer_values()) {
        let merged = merge_layers(&[layer(values.clone(), 0)]);
        prop_assert_eq!(merged, values);
    }
}
