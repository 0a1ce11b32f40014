//! Layering a parsed document over the current value of a destination.
//!
//! [`decode`](crate::decode) encodes the destination into a [`Table`], lays
//! the document over it with [`layer`] and binds the result, so keys the
//! document leaves out keep the destination's values. When binding fails
//! part way, [`revert_from`] restores every entry from the failing one on,
//! which leaves exactly the entries bound before the failure.

use std::collections::HashSet;

use crate::error::PathSegment;
use crate::options::KeyMatching;
use crate::{Table, Value};

/// Lays `doc` over `seed`. Tables present on both sides merge key by key,
/// unless the seed's table is inline; every other document value replaces
/// the seed's.
pub(crate) fn layer(seed: &mut Table, doc: Table, matching: KeyMatching) {
    let doc_keys: HashSet<String> = doc.keys().cloned().collect();
    let mut claimed = HashSet::new();
    for (key, position, value) in doc.into_entries() {
        let target = target_key(seed, &key, matching, &doc_keys, &claimed);
        claimed.insert(target.clone());
        let mergeable = value.is_table()
            && matches!(seed.get(&target), Some(Value::Table(existing)) if !existing.is_inline());
        match value {
            Value::Table(table) if mergeable => {
                if let Some(Value::Table(existing)) = seed.get_mut(&target) {
                    layer(existing, table, matching);
                }
            }
            value => {
                seed.insert_at(target, value, position);
            }
        }
    }
}

/// The seed key a document key lands on: itself when the seed has it,
/// otherwise a seed key equal ignoring ASCII case that the document does not
/// name itself.
fn target_key(
    seed: &Table,
    key: &str,
    matching: KeyMatching,
    doc_keys: &HashSet<String>,
    claimed: &HashSet<String>,
) -> String {
    if seed.contains_key(key) || matching == KeyMatching::Exact {
        return key.to_string();
    }
    seed.keys()
        .find(|existing| {
            existing.eq_ignore_ascii_case(key)
                && !doc_keys.contains(existing.as_str())
                && !claimed.contains(existing.as_str())
        })
        .cloned()
        .unwrap_or_else(|| key.to_string())
}

/// Restores `merged` from `seed`, starting at the entry `path` points into.
///
/// Entries after that one go back to their seed value, or are removed when
/// the seed has none. The entry itself is reverted recursively while both
/// sides hold tables and the path continues with a key, and restored whole
/// otherwise. Returns `false`, changing nothing, when the path does not
/// start with a key of `merged`.
pub(crate) fn revert_from(merged: &mut Table, seed: &Table, path: &[PathSegment]) -> bool {
    let key = match path.first() {
        Some(PathSegment::Key(key)) => match merged_key(merged, key) {
            Some(found) => found,
            None => return false,
        },
        _ => return false,
    };

    let later: Vec<String> = merged
        .keys()
        .skip_while(|existing| **existing != key)
        .skip(1)
        .cloned()
        .collect();
    for later_key in later {
        restore(merged, seed, &later_key);
    }

    let reverted = match (merged.get_mut(&key), seed.get(&key), path.get(1)) {
        (Some(Value::Table(child)), Some(Value::Table(original)), Some(PathSegment::Key(_))) => {
            revert_from(child, original, &path[1..])
        }
        _ => false,
    };
    if !reverted {
        restore(merged, seed, &key);
    }
    true
}

/// The binder reports renamed keys, so fall back to a case-insensitive match.
fn merged_key(merged: &Table, key: &str) -> Option<String> {
    if merged.contains_key(key) {
        return Some(key.to_string());
    }
    merged
        .keys()
        .find(|existing| existing.eq_ignore_ascii_case(key))
        .cloned()
}

fn restore(merged: &mut Table, seed: &Table, key: &str) {
    match seed.get(key) {
        Some(original) => {
            merged.insert(key, original.clone());
        }
        None => {
            merged.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, value};

    fn table(value: Value) -> Table {
        match value {
            Value::Table(table) => table,
            other => panic!("expected a table, found {other:?}"),
        }
    }

    #[test]
    fn test_layer_keeps_absent_keys() {
        let mut seed = table(value!({ "max" = 10, "min" = 3, "inner" = { "a" = 1, "b" = 2 } }));
        let doc = table(parse("max = 20\ninner.b = 5\nextra = true").unwrap());
        layer(&mut seed, doc, KeyMatching::Exact);
        assert_eq!(
            Value::Table(seed),
            value!({ "max" = 20, "min" = 3, "inner" = { "a" = 1, "b" = 5 }, "extra" = true })
        );
    }

    #[test]
    fn test_layer_replaces_inline_and_scalar_values() {
        let mut seed = table(parse("shape = { Circle = 1.0 }\nn = 1").unwrap());
        let doc = table(parse("shape = { Rect = 2 }\nn = { a = 1 }").unwrap());
        layer(&mut seed, doc, KeyMatching::Exact);
        assert_eq!(seed.get("shape"), Some(&value!({ "Rect" = 2 })));
        assert_eq!(seed.get("n"), Some(&value!({ "a" = 1 })));
    }

    #[test]
    fn test_layer_matches_keys_ignoring_case() {
        let mut seed = table(value!({ "title" = "old", "name" = "kept" }));
        let doc = table(parse("Title = \"new\"").unwrap());
        layer(&mut seed, doc.clone(), KeyMatching::CaseInsensitive);
        assert_eq!(Value::Table(seed), value!({ "title" = "new", "name" = "kept" }));

        let mut exact = table(value!({ "title" = "old" }));
        layer(&mut exact, doc, KeyMatching::Exact);
        assert_eq!(Value::Table(exact), value!({ "title" = "old", "Title" = "new" }));
    }

    #[test]
    fn test_revert_from_restores_failing_and_later_entries() {
        let seed = table(value!({ "a" = 1, "b" = 1, "c" = { "x" = 1, "y" = 1 }, "d" = 1 }));
        let mut merged = seed.clone();
        layer(
            &mut merged,
            table(parse("a = 5\nb = 6\nc.x = 7\nc.y = 8\nd = 9\ne = 10").unwrap()),
            KeyMatching::Exact,
        );
        let path = [PathSegment::Key("c".into()), PathSegment::Key("y".into())];
        assert!(revert_from(&mut merged, &seed, &path));
        assert_eq!(
            Value::Table(merged),
            value!({ "a" = 5, "b" = 6, "c" = { "x" = 7, "y" = 1 }, "d" = 1 })
        );
    }

    #[test]
    fn test_revert_from_unknown_path() {
        let seed = table(value!({ "a" = 1 }));
        let mut merged = seed.clone();
        assert!(!revert_from(&mut merged, &seed, &[PathSegment::Key("zz".into())]));
        assert!(!revert_from(&mut merged, &seed, &[PathSegment::Index(0)]));
        assert!(!revert_from(&mut merged, &seed, &[]));
    }
}
