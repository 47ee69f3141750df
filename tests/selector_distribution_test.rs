use std::collections::{HashMap, HashSet};

use rand::Rng;

use quorum_kv::{
    selector::NodeSelector,
    types::data_types::{NodeAddress, RecordKey, ReplicationFactor},
};

mod common;

use common::cluster::addresses;

const KEYS: usize = 10_000;

fn random_keys() -> Vec<RecordKey> {
    let mut rng = rand::thread_rng();
    (0..KEYS).map(|_| RecordKey::new(rng.gen())).collect()
}

/// Tests that every node is assigned roughly its fair share of keys.
///
/// With 10 nodes and `N = 3`, each node should be selected for about 30% of keys.
#[test]
fn selection_is_balanced_test() {
    let nodes = addresses(10);
    let selector = NodeSelector::with_default_hasher(ReplicationFactor::new(3));

    let mut load: HashMap<NodeAddress, usize> = HashMap::new();
    for key in random_keys() {
        for node in selector.select(key, &nodes) {
            *load.entry(node).or_insert(0) += 1;
        }
    }

    assert_eq!(load.len(), nodes.len());
    for (node, count) in load {
        let share = count as f64 / KEYS as f64;
        assert!(
            (0.25..=0.35).contains(&share),
            "node {} selected for {} of keys",
            node,
            share
        );
    }
}

/// Tests that adding a node moves only the keys that the new node takes over.
///
/// Going from 10 to 11 nodes with `N = 3`, a key's replica set changes exactly when the new node ranks in
/// its top 3, i.e., for about 3/11 of keys. When it does, the new node replaces exactly one old replica.
#[test]
fn adding_a_node_moves_few_keys_test() {
    let mut nodes = addresses(11);
    let new_node = nodes.pop().unwrap();
    let selector = NodeSelector::with_default_hasher(ReplicationFactor::new(3));

    let mut changed = 0;
    for key in random_keys() {
        let before: HashSet<NodeAddress> = selector.select(key, &nodes).into_iter().collect();
        nodes.push(new_node.clone());
        let after: HashSet<NodeAddress> = selector.select(key, &nodes).into_iter().collect();
        nodes.pop();

        if before != after {
            changed += 1;
            assert_eq!(before.symmetric_difference(&after).count(), 2);
            assert!(after.contains(&new_node));
        }
    }

    let fraction = changed as f64 / KEYS as f64;
    assert!(
        (0.22..=0.33).contains(&fraction),
        "{} of keys moved",
        fraction
    );
}
