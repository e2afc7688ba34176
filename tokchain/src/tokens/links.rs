//! Bracket links
//!
//! The link relation pairs matching delimiters. It is stored on the nodes and
//! is always mutual: either both ends point at each other or neither does.

use super::list::{TokenId, TokenList};

impl TokenList {
    /// Pair `a` and `b`. Any previous partner of either node is unlinked.
    ///
    /// # Panics
    ///
    /// Panics if `a == b` or either handle is stale.
    pub fn create_mutual_links(&mut self, a: TokenId, b: TokenId) {
        assert_ne!(a, b, "a token cannot be linked to itself");

        self.remove_link(a);
        self.remove_link(b);
        self.node_mut(a).link = Some(b);
        self.node_mut(b).link = Some(a);
    }

    /// Drop the link of `id` on both ends
    pub fn remove_link(&mut self, id: TokenId) {
        let Some(partner) = self.node_mut(id).link.take() else {
            return;
        };

        if let Some(node) = self.node(partner) {
            if node.link == Some(id) {
                self.node_mut(partner).link = None;
            }
        }
    }

    /// Whether `a` and `b` are linked to each other
    pub fn are_linked(&self, a: TokenId, b: TokenId) -> bool {
        self.link(a) == Some(b) && self.link(b) == Some(a)
    }
}

#[cfg(test)]
mod tests {
    use crate::tokens::test_support::chain;

    #[test]
    fn test_create_mutual_links() {
        let (mut list, ids) = chain(&["(", "x", ")"]);
        list.create_mutual_links(ids[0], ids[2]);

        assert_eq!(list.link(ids[0]), Some(ids[2]));
        assert_eq!(list.link(ids[2]), Some(ids[0]));
        assert!(list.are_linked(ids[2], ids[0]));
        assert_eq!(list.link(ids[1]), None);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_relinking_unlinks_previous_partner() {
        let (mut list, ids) = chain(&["(", "(", ")"]);
        list.create_mutual_links(ids[0], ids[2]);
        list.create_mutual_links(ids[1], ids[2]);

        assert_eq!(list.link(ids[0]), None);
        assert!(list.are_linked(ids[1], ids[2]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_remove_link_clears_both_ends() {
        let (mut list, ids) = chain(&["[", "]"]);
        list.create_mutual_links(ids[0], ids[1]);

        list.remove_link(ids[1]);

        assert_eq!(list.link(ids[0]), None);
        assert_eq!(list.link(ids[1]), None);

        // Removing again is harmless
        list.remove_link(ids[1]);
    }

    #[test]
    #[should_panic(expected = "a token cannot be linked to itself")]
    fn test_self_link_panics() {
        let (mut list, ids) = chain(&["("]);
        list.create_mutual_links(ids[0], ids[0]);
    }
}
