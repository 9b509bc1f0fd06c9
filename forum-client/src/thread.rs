use crate::{CommentForest, NodeId, Visibility};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ThreadEntry {
    pub node: NodeId,

    /// 0 for roots
    pub depth: usize,

    /// Never `Visibility::Hidden`
    pub visibility: Visibility,
}

impl CommentForest {
    /// Render order of the forest: depth-first, parents before their replies,
    /// siblings in forest order. Hidden subtrees are left out entirely.
    pub fn thread(&self) -> Vec<ThreadEntry> {
        let mut res = Vec::with_capacity(self.len());
        let mut stack = self
            .roots()
            .iter()
            .rev()
            .map(|n| (*n, 0))
            .collect::<Vec<_>>();
        while let Some((node, depth)) = stack.pop() {
            let visibility = self.visibility(node);
            if visibility == Visibility::Hidden {
                continue;
            }
            res.push(ThreadEntry {
                node,
                depth,
                visibility,
            });
            stack.extend(self.children(node).iter().rev().map(|c| (*c, depth + 1)));
        }
        res
    }
}
