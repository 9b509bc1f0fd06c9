use std::collections::HashMap;

use crate::{
    api::{Comment, CommentId},
    Order,
};

/// Index of a node in the arena of a `CommentForest`. Only meaningful for the
/// forest that handed it out.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommentNode {
    pub comment: Comment,

    /// Direct replies, in forest order
    pub children: Vec<NodeId>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Visibility {
    /// Active comment, rendered in full
    Shown,

    /// Removed comment with a live reply somewhere below it: rendered as a
    /// marker only, so that the replies stay attached to the thread
    Placeholder,

    /// Nothing in this subtree is active, render none of it
    Hidden,
}

/// Threaded view of the flat comment list of one post.
///
/// All nodes live in one arena owned by the forest; parents refer to their
/// children by `NodeId` and no node knows its parent.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommentForest {
    nodes: Vec<CommentNode>,
    roots: Vec<NodeId>,
}

impl CommentForest {
    /// Builds the forest with the default (oldest first) order
    pub fn build(comments: Vec<Comment>) -> CommentForest {
        CommentForest::build_ordered(comments, &Order::default())
    }

    /// Every comment ends up exactly once in the forest: under its parent when
    /// the parent is part of `comments`, as a root otherwise. Roots and each
    /// list of replies are sorted according to `order`.
    pub fn build_ordered(comments: Vec<Comment>, order: &Order) -> CommentForest {
        let mut nodes = comments
            .into_iter()
            .map(|comment| CommentNode {
                comment,
                children: Vec::new(),
            })
            .collect::<Vec<_>>();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.comment.id, NodeId(i)))
            .collect::<HashMap<CommentId, NodeId>>();

        let mut roots = Vec::new();
        for i in 0..nodes.len() {
            let comment = &nodes[i].comment;
            let parent = comment
                .parent_id
                .filter(|p| *p != comment.id)
                .and_then(|p| index.get(&p).copied());
            match parent {
                Some(NodeId(p)) => nodes[p].children.push(NodeId(i)),
                None => {
                    if let Some(parent_id) = comment.parent_id {
                        // Keep replies to comments outside of this batch visible
                        tracing::debug!(
                            comment = comment.id.0,
                            parent = parent_id.0,
                            "parent not found, promoting comment to root"
                        );
                    }
                    roots.push(NodeId(i));
                }
            }
        }

        order.sort(&mut roots, |n| &nodes[n.0].comment);
        for i in 0..nodes.len() {
            let mut children = std::mem::take(&mut nodes[i].children);
            order.sort(&mut children, |n| &nodes[n.0].comment);
            nodes[i].children = children;
        }

        CommentForest { nodes, roots }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Panics if `id` does not come from this forest
    pub fn node(&self, id: NodeId) -> &CommentNode {
        &self.nodes[id.0]
    }

    /// Panics if `id` does not come from this forest
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn find(&self, comment: CommentId) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|n| n.comment.id == comment)
            .map(NodeId)
    }

    /// All nodes, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &CommentNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// A node is visible if it is active, or if any of its descendants is.
    ///
    /// Re-walks the whole subtree on every call.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.comment.is_active() || node.children.iter().any(|c| self.is_visible(*c))
    }

    pub fn visibility(&self, id: NodeId) -> Visibility {
        if self.node(id).comment.is_active() {
            Visibility::Shown
        } else if self.is_visible(id) {
            Visibility::Placeholder
        } else {
            Visibility::Hidden
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        api::{Status, UserId},
        OrderType,
    };

    pub(crate) fn comment(id: i64, parent: Option<i64>, status: Status, minute: u32) -> Comment {
        Comment {
            id: CommentId(id),
            post_id: None,
            parent_id: parent.map(CommentId),
            body: format!("comment {id}"),
            author_id: UserId(1),
            author_name: None,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, minute, 0).unwrap(),
            status,
        }
    }

    pub(crate) fn ids(forest: &CommentForest, nodes: &[NodeId]) -> Vec<i64> {
        nodes.iter().map(|n| forest.node(*n).comment.id.0).collect()
    }

    use Status::{Active, Removed};

    /// Scenario from the forum's threading rules: a removed reply with a live
    /// answer, and a reply to a comment that is not in the batch
    fn scenario() -> CommentForest {
        CommentForest::build(vec![
            comment(1, None, Active, 0),
            comment(2, Some(1), Removed, 1),
            comment(3, Some(2), Active, 2),
            comment(4, Some(99), Active, 3),
        ])
    }

    #[test]
    fn example_thread() {
        let f = scenario();
        assert_eq!(ids(&f, f.roots()), vec![1, 4]);

        let one = f.find(CommentId(1)).unwrap();
        let two = f.find(CommentId(2)).unwrap();
        let three = f.find(CommentId(3)).unwrap();
        let four = f.find(CommentId(4)).unwrap();
        assert_eq!(ids(&f, f.children(one)), vec![2]);
        assert_eq!(ids(&f, f.children(two)), vec![3]);
        assert!(f.children(four).is_empty());

        assert!(f.is_visible(two));
        assert_eq!(f.visibility(two), Visibility::Placeholder);
        assert_eq!(f.visibility(three), Visibility::Shown);
    }

    #[test]
    fn removed_leaf_is_hidden() {
        let f = CommentForest::build(vec![comment(1, None, Removed, 0)]);
        let n = f.roots()[0];
        assert!(!f.is_visible(n));
        assert_eq!(f.visibility(n), Visibility::Hidden);
    }

    #[test]
    fn removed_chain_without_live_reply_is_hidden() {
        let f = CommentForest::build(vec![
            comment(1, None, Removed, 0),
            comment(2, Some(1), Removed, 1),
            comment(3, Some(2), Removed, 2),
        ]);
        for (id, _) in f.iter() {
            assert_eq!(f.visibility(id), Visibility::Hidden);
        }
    }

    #[test]
    fn deep_live_reply_keeps_all_ancestors() {
        let f = CommentForest::build(vec![
            comment(1, None, Removed, 0),
            comment(2, Some(1), Removed, 1),
            comment(3, Some(2), Removed, 2),
            comment(4, Some(3), Active, 3),
        ]);
        for id in [1, 2, 3] {
            let n = f.find(CommentId(id)).unwrap();
            assert_eq!(f.visibility(n), Visibility::Placeholder);
        }
    }

    #[test]
    fn self_parent_is_a_root() {
        let f = CommentForest::build(vec![comment(5, Some(5), Active, 0)]);
        assert_eq!(ids(&f, f.roots()), vec![5]);
        assert!(f.children(f.roots()[0]).is_empty());
    }

    #[test]
    fn orders_by_date_then_id() {
        let f = CommentForest::build(vec![
            comment(3, None, Active, 5),
            comment(2, None, Active, 5),
            comment(1, None, Active, 9),
            comment(10, Some(1), Active, 7),
            comment(11, Some(1), Active, 6),
        ]);
        assert_eq!(ids(&f, f.roots()), vec![2, 3, 1]);
        let one = f.find(CommentId(1)).unwrap();
        assert_eq!(ids(&f, f.children(one)), vec![11, 10]);
    }

    #[test]
    fn newest_first_order() {
        let f = CommentForest::build_ordered(
            vec![
                comment(1, None, Active, 0),
                comment(2, None, Active, 1),
                comment(3, Some(1), Active, 2),
                comment(4, Some(1), Active, 3),
            ],
            &Order::CreationDate(OrderType::Desc),
        );
        assert_eq!(ids(&f, f.roots()), vec![2, 1]);
        let one = f.find(CommentId(1)).unwrap();
        assert_eq!(ids(&f, f.children(one)), vec![4, 3]);
    }

    #[test]
    fn empty_batch() {
        let f = CommentForest::build(Vec::new());
        assert!(f.is_empty());
        assert!(f.roots().is_empty());
    }

    /// Turns fuzzer input into a batch with unique ids and an acyclic parent
    /// graph: parents are either earlier comments or negative ids, which never
    /// appear in a batch.
    /// The batch is then rotated so that children may come before parents.
    fn batch_from(input: &(Vec<(Option<u8>, u8, bool)>, u8)) -> Vec<Comment> {
        let (shape, rotation) = input;
        let mut batch = shape
            .iter()
            .enumerate()
            .map(|(i, (parent, minute, active))| {
                let id = i as i64 + 1;
                let parent = parent.map(|p| match (p % 4, i) {
                    (0, _) | (_, 0) => -(p as i64) - 1,
                    _ => (p as i64 % (i as i64)) + 1,
                });
                let status = if *active { Active } else { Removed };
                comment(id, parent, status, *minute as u32 % 60)
            })
            .collect::<Vec<_>>();
        if !batch.is_empty() {
            let by = *rotation as usize % batch.len();
            batch.rotate_left(by);
        }
        batch
    }

    fn all_reachable(f: &CommentForest) -> Vec<i64> {
        let mut seen = Vec::new();
        let mut stack = f.roots().to_vec();
        while let Some(n) = stack.pop() {
            seen.push(f.node(n).comment.id.0);
            stack.extend(f.children(n).iter().copied());
        }
        seen
    }

    #[test]
    fn fuzz_every_comment_once() {
        bolero::check!()
            .with_type::<(Vec<(Option<u8>, u8, bool)>, u8)>()
            .cloned()
            .for_each(|input| {
                let batch = batch_from(&input);
                let f = CommentForest::build(batch.clone());
                let mut seen = all_reachable(&f);
                seen.sort_unstable();
                let mut expected = batch.iter().map(|c| c.id.0).collect::<Vec<_>>();
                expected.sort_unstable();
                assert_eq!(seen, expected);
            });
    }

    #[test]
    fn fuzz_parents_and_orphans() {
        bolero::check!()
            .with_type::<(Vec<(Option<u8>, u8, bool)>, u8)>()
            .cloned()
            .for_each(|input| {
                let batch = batch_from(&input);
                let present = batch.iter().map(|c| c.id).collect::<HashSet<_>>();
                let f = CommentForest::build(batch.clone());
                let roots = ids(&f, f.roots()).into_iter().collect::<HashSet<_>>();
                for c in &batch {
                    match c.parent_id {
                        Some(p) if present.contains(&p) => {
                            let parent = f.find(p).unwrap();
                            assert!(ids(&f, f.children(parent)).contains(&c.id.0));
                            assert!(!roots.contains(&c.id.0));
                        }
                        _ => assert!(roots.contains(&c.id.0)),
                    }
                }
            });
    }

    #[test]
    fn fuzz_lists_are_sorted() {
        bolero::check!()
            .with_type::<(Vec<(Option<u8>, u8, bool)>, u8)>()
            .cloned()
            .for_each(|input| {
                let f = CommentForest::build(batch_from(&input));
                let sorted = |list: &[NodeId]| {
                    list.windows(2).all(|w| {
                        f.node(w[0]).comment.created_at <= f.node(w[1]).comment.created_at
                    })
                };
                assert!(sorted(f.roots()));
                for (id, _) in f.iter() {
                    assert!(sorted(f.children(id)));
                }
            });
    }

    #[test]
    fn fuzz_rebuild_is_identical() {
        bolero::check!()
            .with_type::<(Vec<(Option<u8>, u8, bool)>, u8)>()
            .cloned()
            .for_each(|input| {
                let batch = batch_from(&input);
                assert_eq!(
                    CommentForest::build(batch.clone()),
                    CommentForest::build(batch),
                );
            });
    }

    #[test]
    fn fuzz_visibility_matches_subtree() {
        bolero::check!()
            .with_type::<(Vec<(Option<u8>, u8, bool)>, u8)>()
            .cloned()
            .for_each(|input| {
                let f = CommentForest::build(batch_from(&input));
                for (id, node) in f.iter() {
                    let mut stack = vec![id];
                    let mut any_active = false;
                    while let Some(n) = stack.pop() {
                        any_active |= f.node(n).comment.is_active();
                        stack.extend(f.children(n).iter().copied());
                    }
                    assert_eq!(f.is_visible(id), any_active);
                    if node.comment.is_active() {
                        assert_eq!(f.visibility(id), Visibility::Shown);
                    }
                }
            });
    }
}
