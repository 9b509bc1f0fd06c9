use std::cmp::Reverse;

use crate::api::Comment;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OrderType {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Order {
    CreationDate(OrderType),
}

impl Default for Order {
    /// Oldest first, so that a thread reads top to bottom
    fn default() -> Order {
        Order::CreationDate(OrderType::Asc)
    }
}

impl Order {
    /// Sorts `items` by the comment each one refers to. Ties on the creation
    /// date are broken by comment id, so the result does not depend on the
    /// order `items` came in.
    pub fn sort<'c, T>(&self, items: &mut [T], comment_of: impl Fn(&T) -> &'c Comment) {
        match self {
            Order::CreationDate(OrderType::Asc) => items.sort_unstable_by_key(|i| {
                let c = comment_of(i);
                (c.created_at, c.id)
            }),
            Order::CreationDate(OrderType::Desc) => items.sort_unstable_by_key(|i| {
                let c = comment_of(i);
                Reverse((c.created_at, c.id))
            }),
        }
    }
}
