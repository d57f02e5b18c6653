// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key joining shared by the structured-format parsers.
//!
//! Nested mappings are joined with dots and sequence elements get an index
//! suffix, which matches the keys a property-list document would use.

/// Key of a mapping entry below `prefix`.
pub(crate) fn child_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Key of a sequence element below `prefix`.
pub(crate) fn index_key(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}
