// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random edit sequences never break the tree's structural invariants.

use arbor_tree::{NeuriteTree, NodeData, NodeId, TreeError, VoxelPoint};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    Add(u32),
    Remove(u32),
    Prune(u32),
    Reparent(u32, u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    // Ids are picked from a small range so that most ops hit live nodes.
    let id = 1_u32..24;
    prop_oneof![
        4 => id.clone().prop_map(Op::Add),
        2 => id.clone().prop_map(Op::Remove),
        1 => id.clone().prop_map(Op::Prune),
        2 => (id.clone(), id).prop_map(|(a, b)| Op::Reparent(a, b)),
    ]
}

fn id(raw: u32) -> NodeId {
    NodeId::new(raw).unwrap_or(NodeId::ROOT)
}

fn data(n: u32) -> NodeData {
    NodeData::at(VoxelPoint::new(f64::from(n), 0.0, 0))
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

    #[test]
    fn edits_preserve_invariants(ops in proptest::collection::vec(op_strategy(), 1..64)) {
        let mut tree = NeuriteTree::new();
        tree.add_child(NodeId::ROOT, data(0)).unwrap();

        for (step, op) in ops.into_iter().enumerate() {
            let before = tree.clone();
            let len = tree.len();
            let result = match op {
                Op::Add(p) => tree.add_child(id(p), data(step as u32)).map(|_| {
                    assert_eq!(tree.len(), len + 1);
                }),
                Op::Remove(n) => {
                    let n = id(n);
                    let branch = tree.is_branch_point(n);
                    let parent = tree.parent(n);
                    let child = tree.children(n).first().copied();
                    let slot = parent.and_then(|p| tree.children(p).iter().position(|&c| c == n));
                    let r = tree.remove_leaf_or_chain(n);
                    // Fails exactly for dead ids, branch points and the root, in that order.
                    let expected = if !before.contains(n) {
                        Err(TreeError::InvalidNode(n))
                    } else if branch {
                        Err(TreeError::BranchPoint(n))
                    } else if parent.is_none() {
                        Err(TreeError::RootRemoval)
                    } else {
                        Ok(())
                    };
                    prop_assert_eq!(r.clone(), expected);
                    if r.is_ok() {
                        prop_assert_eq!(tree.len(), len - 1);
                        if let (Some(c), Some(p), Some(i)) = (child, parent, slot) {
                            prop_assert_eq!(tree.children(p)[i], c);
                        }
                    }
                    r
                }
                Op::Prune(n) => {
                    let n = id(n);
                    let expected = before.subtree(n).len();
                    let r = tree.prune(n).map(|removed| {
                        assert_eq!(removed, expected);
                        assert_eq!(tree.len(), len - expected);
                    });
                    if n == NodeId::ROOT {
                        prop_assert_eq!(r.clone(), Err(TreeError::RootRemoval));
                    }
                    r
                }
                Op::Reparent(c, p) => {
                    let (c, p) = (id(c), id(p));
                    let shape = before.subtree(c);
                    let cyclic = before.in_subtree(p, c);
                    let r = tree.reparent(c, p);
                    if before.contains(c) && before.contains(p) {
                        prop_assert_eq!(r.is_err(), cyclic, "fails iff new parent is inside the moved subtree");
                    }
                    if r.is_ok() {
                        prop_assert_eq!(tree.len(), len);
                        prop_assert_eq!(tree.parent(c), Some(p));
                        prop_assert_eq!(tree.subtree(c), shape);
                    }
                    r
                }
            };
            if result.is_err() {
                prop_assert_eq!(tree.len(), before.len(), "failed edits must not mutate");
                let after: Vec<_> = tree.iter().map(|(i, n)| (i, n.parent(), n.children().to_vec())).collect();
                let prior: Vec<_> = before.iter().map(|(i, n)| (i, n.parent(), n.children().to_vec())).collect();
                prop_assert_eq!(after, prior);
            }
            prop_assert!(tree.validate().is_ok(), "invariants broken after {:?}", result);
            prop_assert_eq!(tree.root(), Some(NodeId::ROOT));
        }
    }
}
