use super::*;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

// A narrow alphabet so that generated keys share prefixes often
fn key_value_pairs(
    min_pairs: usize,
    max_pairs: usize,
) -> impl Strategy<Value = Vec<(String, i32)>> {
    proptest::collection::vec(
        ("[a-d]{0,6}".prop_map(String::from), proptest::num::i32::ANY),
        min_pairs..max_pairs,
    )
}

fn int_key_value_pairs(
    min_pairs: usize,
    max_pairs: usize,
) -> impl Strategy<Value = Vec<(Vec<u16>, i32)>> {
    proptest::collection::vec(
        (
            proptest::collection::vec(0u16..4, 0..6),
            proptest::num::i32::ANY,
        ),
        min_pairs..max_pairs,
    )
}

#[derive(Debug, Clone)]
enum Operation {
    Insert(String, i32),
    Erase(String),
    RemovePrefix(String),
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Operation>> {
    let op = prop_oneof![
        4 => ("[a-c]{0,5}", proptest::num::i32::ANY)
            .prop_map(|(key, value)| Operation::Insert(key, value)),
        3 => "[a-c]{0,5}".prop_map(Operation::Erase),
        1 => "[a-c]{0,3}".prop_map(Operation::RemovePrefix),
    ];
    proptest::collection::vec(op, 0..max_ops)
}

fn build(pairs: &[(String, i32)]) -> (Trie<char, i32>, BTreeMap<String, i32>) {
    let mut trie = Trie::new();
    let mut reference = BTreeMap::new();
    for (key, value) in pairs {
        trie.insert(key, *value);
        reference.insert(key.clone(), *value);
    }
    (trie, reference)
}

/// Root plus one node per distinct non-empty prefix of the stored keys.
fn expected_node_count<'a>(keys: impl Iterator<Item = &'a String>) -> usize {
    let mut prefixes = BTreeSet::new();
    for key in keys {
        let chars: Vec<char> = key.chars().collect();
        for end in 1..=chars.len() {
            prefixes.insert(chars[..end].to_vec());
        }
    }
    prefixes.len() + 1
}

fn as_strings(trie: &Trie<char, i32>) -> Vec<(String, i32)> {
    trie.iter()
        .map(|(key, &value)| (key.into_iter().collect(), value))
        .collect()
}

#[test]
fn test_long_key_and_wide_alphabet() {
    let mut trie = Trie::new();
    let long_key = "a".repeat(1000);
    trie.insert(&long_key, 1);
    assert_eq!(trie.get(&long_key), Some(&1));
    assert_eq!(trie.node_count(), 1001);

    for symbol in 0..=255u8 {
        trie.insert(String::from(symbol as char), symbol as i32);
    }
    assert_eq!(trie.len(), 257);

    assert!(trie.erase(&long_key));
    assert_eq!(trie.node_count(), 257);
}

#[test]
fn test_memory_reuse_after_erase() {
    let mut trie = Trie::new();
    for i in 0..100 {
        trie.insert(format!("key_{i:03}"), i);
    }
    let allocated = trie.pool.nodes.len();

    for i in 0..50 {
        trie.erase(format!("key_{i:03}"));
    }
    for i in 0..50 {
        trie.insert(format!("key_{i:03}"), i);
    }

    assert_eq!(trie.pool.nodes.len(), allocated);
    assert_eq!(trie.len(), 100);
}

proptest! {
    #[test]
    fn insert_get_round_trip(pairs in key_value_pairs(1, 100)) {
        let (trie, reference) = build(&pairs);

        prop_assert_eq!(trie.len(), reference.len());
        for (key, value) in &reference {
            prop_assert_eq!(trie.get(key), Some(value));
            prop_assert!(trie.contains_key(key));
        }
    }

    #[test]
    fn every_prefix_of_a_key_is_a_prefix(pairs in key_value_pairs(1, 50)) {
        let (trie, _) = build(&pairs);

        for (key, _) in &pairs {
            let chars: Vec<char> = key.chars().collect();
            for end in 0..=chars.len() {
                prop_assert!(trie.contains_prefix(&chars[..end]));
                prop_assert!(trie.starts_with(&chars[..end]));
            }
        }
    }

    #[test]
    fn overwrite_keeps_last_value(pairs in key_value_pairs(1, 50), bump in 1i32..1000) {
        let (mut trie, mut reference) = build(&pairs);

        for (key, value) in reference.iter_mut() {
            *value = value.wrapping_add(bump);
            trie.insert(key, *value);
        }

        prop_assert_eq!(trie.len(), reference.len());
        for (key, value) in &reference {
            prop_assert_eq!(trie.get(key), Some(value));
        }
    }

    #[test]
    fn erase_matches_model(pairs in key_value_pairs(1, 80), to_erase in key_value_pairs(1, 40)) {
        let (mut trie, mut reference) = build(&pairs);

        for (key, _) in &to_erase {
            prop_assert_eq!(trie.erase(key), reference.remove(key).is_some());
        }

        prop_assert_eq!(trie.len(), reference.len());
        for (key, _) in &to_erase {
            prop_assert!(!trie.contains_key(key));
        }
        for (key, value) in &reference {
            prop_assert_eq!(trie.get(key), Some(value));
        }
        prop_assert_eq!(trie.node_count(), expected_node_count(reference.keys()));
    }

    #[test]
    fn erase_of_missing_key_changes_nothing(pairs in key_value_pairs(1, 50), missing in "[e-f]{0,4}") {
        let (mut trie, _) = build(&pairs);
        let before = render(&trie);
        let nodes = trie.node_count();

        if !trie.contains_key(&missing) {
            prop_assert!(!trie.erase(&missing));
            prop_assert_eq!(render(&trie), before);
            prop_assert_eq!(trie.node_count(), nodes);
        }
    }

    #[test]
    fn node_count_is_minimal(ops in operations(120)) {
        let mut trie = Trie::new();
        let mut reference: BTreeMap<String, i32> = BTreeMap::new();

        for op in ops {
            match op {
                Operation::Insert(key, value) => {
                    let previous = trie.insert(&key, value);
                    prop_assert_eq!(previous, reference.insert(key, value));
                }
                Operation::Erase(key) => {
                    prop_assert_eq!(trie.remove(&key), reference.remove(&key));
                }
                Operation::RemovePrefix(prefix) => {
                    let removed: Vec<(String, i32)> = trie
                        .remove_prefix(&prefix)
                        .into_iter()
                        .map(|(key, value)| (key.into_iter().collect(), value))
                        .collect();
                    let expected: Vec<(String, i32)> = reference
                        .iter()
                        .filter(|(key, _)| key.starts_with(prefix.as_str()))
                        .map(|(key, value)| (key.clone(), *value))
                        .collect();
                    reference.retain(|key, _| !key.starts_with(prefix.as_str()));
                    prop_assert_eq!(removed, expected);
                }
            }
            prop_assert_eq!(trie.len(), reference.len());
            prop_assert_eq!(trie.node_count(), expected_node_count(reference.keys()));
        }
    }

    #[test]
    fn iteration_is_sorted_and_complete(pairs in key_value_pairs(0, 80)) {
        let (trie, reference) = build(&pairs);

        let expected: Vec<(String, i32)> = reference
            .iter()
            .map(|(key, value)| (key.clone(), *value))
            .collect();
        prop_assert_eq!(as_strings(&trie), expected);
        prop_assert_eq!(trie.keys().count(), reference.len());
        prop_assert_eq!(trie.values().count(), reference.len());
    }

    #[test]
    fn prefix_iter_matches_filter(pairs in key_value_pairs(1, 80), prefix in "[a-d]{0,3}") {
        let (trie, reference) = build(&pairs);

        let found: Vec<String> = trie
            .prefix_keys(&prefix)
            .map(|key| key.into_iter().collect())
            .collect();
        let expected: Vec<String> = reference
            .keys()
            .filter(|key| key.starts_with(prefix.as_str()))
            .cloned()
            .collect();
        prop_assert_eq!(&found, &expected);
        prop_assert_eq!(trie.starts_with(&prefix), !expected.is_empty());
    }

    #[test]
    fn clone_is_deep_copy(pairs in key_value_pairs(1, 60), extra in key_value_pairs(1, 20)) {
        let (mut original, reference) = build(&pairs);
        let copy = original.clone();

        prop_assert_eq!(&copy, &original);
        prop_assert_eq!(render(&copy), render(&original));
        prop_assert_eq!(copy.node_count(), original.node_count());

        for (key, value) in &extra {
            original.insert(key, *value);
        }
        for (key, _) in &pairs {
            original.erase(key);
        }

        for (key, value) in &reference {
            prop_assert_eq!(copy.get(key), Some(value));
        }
        prop_assert_eq!(copy.len(), reference.len());
    }

    #[test]
    fn retain_matches_model(pairs in key_value_pairs(1, 80)) {
        let (mut trie, mut reference) = build(&pairs);

        trie.retain(|key, value| key.len() % 2 == 0 || *value > 0);
        reference.retain(|key, value| key.chars().count() % 2 == 0 || *value > 0);

        prop_assert_eq!(as_strings(&trie), reference.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn integer_symbols_behave_like_model(pairs in int_key_value_pairs(1, 60)) {
        let mut trie: Trie<u16, i32> = Trie::new();
        let mut reference = BTreeMap::new();

        for (key, value) in &pairs {
            trie.insert(key, *value);
            reference.insert(key.clone(), *value);
        }

        let found: Vec<(Vec<u16>, i32)> = trie.iter().map(|(key, &value)| (key, value)).collect();
        prop_assert_eq!(found, reference.clone().into_iter().collect::<Vec<_>>());

        if let Some((key, _)) = pairs.first() {
            prop_assert!(trie.erase(key));
            reference.remove(key);
            prop_assert!(!trie.contains_key(key));
            prop_assert_eq!(trie.len(), reference.len());
        }
    }

    #[test]
    fn entry_api_behaves_like_direct_methods(pairs in key_value_pairs(1, 60)) {
        let mut via_entry = Trie::new();
        let mut direct = Trie::new();

        for (key, value) in &pairs {
            *via_entry.entry(key).or_insert(0) += *value as i64;
            let current = direct.get(key).copied().unwrap_or(0i64);
            direct.insert(key, current + *value as i64);
        }

        prop_assert_eq!(via_entry, direct);
    }
}
