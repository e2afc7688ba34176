//! In-place chain surgery
//!
//! Every primitive leaves the chain continuous, the head and tail exact, and
//! the bracket link relation symmetric. A node is unthreaded and unlinked
//! before its slot is released.

use super::list::{TokenId, TokenList};
use super::token::Token;

impl TokenList {
    /// Thread `a -> b`. A missing side updates the head or tail instead.
    pub(super) fn stitch(&mut self, a: Option<TokenId>, b: Option<TokenId>) {
        match a {
            Some(a) => self.node_mut(a).next = b,
            None => self.front = b,
        }
        match b {
            Some(b) => self.node_mut(b).prev = a,
            None => self.back = a,
        }
    }

    /// Remove the successor of `id`. No-op when `id` is the tail.
    pub fn delete_next(&mut self, id: TokenId) {
        let Some(next) = self.next(id) else {
            return;
        };

        let after = self.next(next);
        self.stitch(Some(id), after);
        self.remove_link(next);
        self.release(next);
    }

    /// Delete `id` by absorbing its successor.
    ///
    /// The successor's token and bracket link move into `id` and the successor
    /// node is removed, so `id` stays valid and now denotes what used to be
    /// the next token. `id` keeps its own progress value. If `id` was paired
    /// with its successor the pair dissolves; a partner of the old `id` is
    /// unlinked.
    ///
    /// A node without a successor cannot be removed this way; its text
    /// becomes the placeholder `;` and its link is dropped.
    pub fn delete_this(&mut self, id: TokenId) {
        let Some(next) = self.next(id) else {
            self.remove_link(id);
            self[id].set_text(";");
            return;
        };

        let absorbed_partner = self.link(next).filter(|&partner| partner != id);
        self.remove_link(id);
        self.remove_link(next);

        let progress = self[id].progress_value();
        let mut token: Token = self[next].clone();
        token.set_progress_value(progress);
        self[id] = token;

        if let Some(partner) = absorbed_partner {
            self.create_mutual_links(id, partner);
        }

        self.delete_next(id);
    }

    /// Insert a token after `id`, inheriting its line, file and progress value
    pub fn insert_after(&mut self, id: TokenId, text: &str) -> TokenId {
        let (line_number, file_index, progress_value) = {
            let anchor = &self[id];
            (
                anchor.line_number(),
                anchor.file_index(),
                anchor.progress_value(),
            )
        };

        let mut token = Token::new(text);
        token.set_line_number(line_number);
        token.set_file_index(file_index);
        token.set_progress_value(progress_value);

        let inserted = self.alloc(token);
        let after = self.next(id);
        self.stitch(Some(inserted), after);
        self.stitch(Some(id), Some(inserted));
        inserted
    }

    /// Move the range `start..=end` into the position of `target` and delete
    /// `target`. The range must not contain `target`.
    pub fn replace(&mut self, target: TokenId, start: TokenId, end: TokenId) {
        assert!(
            target != start && target != end,
            "replacement range must not contain the replaced token"
        );

        // Close the gap left by the range
        let before = self.previous(start);
        let after = self.next(end);
        self.stitch(before, after);

        // Neighbours are read after the gap is closed; target may have been
        // adjacent to the range
        let target_prev = self.previous(target);
        let target_next = self.next(target);
        self.stitch(target_prev, Some(start));
        self.stitch(Some(end), target_next);

        self.remove_link(target);
        self.release(target);
    }

    /// Relocate `start..=end` to just after `destination`. Every moved token
    /// takes the destination's progress value.
    pub fn move_range(&mut self, start: TokenId, end: TokenId, destination: TokenId) {
        debug_assert!(
            !self.range_contains(start, end, destination),
            "destination lies inside the moved range"
        );

        let before = self.previous(start);
        let after = self.next(end);
        self.stitch(before, after);

        let destination_next = self.next(destination);
        self.stitch(Some(destination), Some(start));
        self.stitch(Some(end), destination_next);

        let progress = self[destination].progress_value();
        let mut current = Some(start);
        while let Some(id) = current {
            self[id].set_progress_value(progress);
            if id == end {
                break;
            }
            current = self.next(id);
        }
    }

    /// Delete the nodes strictly between `begin` and `end`. With no `end`,
    /// everything after `begin` goes.
    pub fn erase_range(&mut self, begin: Option<TokenId>, end: Option<TokenId>) {
        let Some(begin) = begin else {
            return;
        };

        while let Some(next) = self.next(begin) {
            if Some(next) == end {
                break;
            }
            self.delete_next(begin);
        }
    }

    fn range_contains(&self, start: TokenId, end: TokenId, id: TokenId) -> bool {
        self.iter_from(start)
            .take_while({
                let mut done = false;
                move |&current| {
                    let keep = !done;
                    done = current == end;
                    keep
                }
            })
            .any(|current| current == id)
    }
}

#[cfg(test)]
mod tests {
    use crate::tokens::test_support::{chain, joined};
    use crate::tokens::TokenList;

    #[test]
    fn test_delete_next_middle() {
        let (mut list, ids) = chain(&["a", "b", "c"]);
        list.delete_next(ids[0]);

        assert_eq!(joined(&list), "a c");
        assert_eq!(list.previous(ids[2]), Some(ids[0]));
        assert_eq!(list.len(), 2);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_delete_next_updates_tail() {
        let (mut list, ids) = chain(&["a", "b"]);
        list.delete_next(ids[0]);

        assert_eq!(list.back(), Some(ids[0]));
        assert!(list.validate().is_ok());

        // Nothing after the tail
        list.delete_next(ids[0]);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_delete_next_clears_partner_link() {
        let (mut list, ids) = chain(&["(", "x", ")"]);
        list.create_mutual_links(ids[0], ids[2]);

        list.delete_next(ids[1]);

        assert_eq!(list.link(ids[0]), None);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_delete_this_absorbs_successor() {
        let (mut list, ids) = chain(&["a", "b", "c"]);
        list[ids[1]].set_var_id(4);
        list[ids[0]].set_progress_value(10);
        list[ids[1]].set_progress_value(20);

        list.delete_this(ids[0]);

        assert_eq!(joined(&list), "b c");
        assert_eq!(list.front(), Some(ids[0]));
        assert_eq!(list[ids[0]].var_id(), 4);
        assert_eq!(list[ids[0]].line_number(), 2);
        assert_eq!(list[ids[0]].progress_value(), 10);
        assert!(!list.contains(ids[1]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_delete_this_takes_over_successor_link() {
        // x ( y ) : deleting x makes the merged node the '(' of the pair
        let (mut list, ids) = chain(&["x", "(", "y", ")"]);
        list.create_mutual_links(ids[1], ids[3]);

        list.delete_this(ids[0]);

        assert_eq!(list[ids[0]].text(), "(");
        assert_eq!(list.link(ids[0]), Some(ids[3]));
        assert_eq!(list.link(ids[3]), Some(ids[0]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_delete_this_dissolves_pair_with_successor() {
        let (mut list, ids) = chain(&["f", "(", ")", ";"]);
        list.create_mutual_links(ids[1], ids[2]);

        list.delete_this(ids[1]);

        assert_eq!(joined(&list), "f ) ;");
        assert_eq!(list.link(ids[1]), None);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_delete_this_unlinks_old_partner() {
        let (mut list, ids) = chain(&["(", "a", ")"]);
        list.create_mutual_links(ids[0], ids[2]);

        list.delete_this(ids[2]);
        // ')' had no successor: it becomes the placeholder and drops its link
        assert_eq!(list[ids[2]].text(), ";");
        assert_eq!(list.link(ids[0]), None);

        list.create_mutual_links(ids[0], ids[2]);
        list.delete_this(ids[0]);
        assert_eq!(list[ids[0]].text(), "a");
        assert_eq!(list.link(ids[2]), None);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_delete_this_single_token_becomes_placeholder() {
        let (mut list, ids) = chain(&["x"]);
        list[ids[0]].set_var_id(3);

        list.delete_this(ids[0]);

        assert_eq!(list.len(), 1);
        assert_eq!(list[ids[0]].text(), ";");
        assert_eq!(list[ids[0]].var_id(), 0);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_insert_after_copies_provenance() {
        let (mut list, ids) = chain(&["a", "c"]);
        list[ids[0]].set_file_index(2);
        list[ids[0]].set_progress_value(7);

        let b = list.insert_after(ids[0], "b");

        assert_eq!(joined(&list), "a b c");
        assert_eq!(list[b].line_number(), 1);
        assert_eq!(list[b].file_index(), 2);
        assert_eq!(list[b].progress_value(), 7);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_insert_after_tail_moves_tail() {
        let (mut list, ids) = chain(&["a"]);
        let b = list.insert_after(ids[0], "b");

        assert_eq!(list.back(), Some(b));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_replace_with_range_from_tail() {
        // a T b [c d] -> a c d b
        let (mut list, ids) = chain(&["a", "T", "b", "c", "d"]);
        list.replace(ids[1], ids[3], ids[4]);

        assert_eq!(joined(&list), "a c d b");
        assert_eq!(list.back(), Some(ids[2]));
        assert!(!list.contains(ids[1]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_replace_head_target() {
        let (mut list, ids) = chain(&["T", "a", "b", "c"]);
        list.replace(ids[0], ids[2], ids[3]);

        assert_eq!(joined(&list), "b c a");
        assert_eq!(list.front(), Some(ids[2]));
        assert_eq!(list.back(), Some(ids[1]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_replace_tail_target_with_adjacent_range() {
        let (mut list, ids) = chain(&["a", "b", "T"]);
        list.replace(ids[2], ids[0], ids[1]);

        assert_eq!(joined(&list), "a b");
        assert_eq!(list.back(), Some(ids[1]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_replace_drops_target_link() {
        let (mut list, ids) = chain(&["(", "x", ")", "y"]);
        list.create_mutual_links(ids[0], ids[2]);

        list.replace(ids[2], ids[3], ids[3]);

        assert_eq!(joined(&list), "( x y");
        assert_eq!(list.link(ids[0]), None);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_move_range_forward() {
        // [a b] c d -> c a b d
        let (mut list, ids) = chain(&["a", "b", "c", "d"]);
        list[ids[2]].set_progress_value(50);

        list.move_range(ids[0], ids[1], ids[2]);

        assert_eq!(joined(&list), "c a b d");
        assert_eq!(list.front(), Some(ids[2]));
        assert_eq!(list[ids[0]].progress_value(), 50);
        assert_eq!(list[ids[1]].progress_value(), 50);
        assert_eq!(list[ids[3]].progress_value(), 0);
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_move_range_to_tail() {
        let (mut list, ids) = chain(&["a", "b", "c", "d"]);
        list.move_range(ids[1], ids[2], ids[3]);

        assert_eq!(joined(&list), "a d b c");
        assert_eq!(list.back(), Some(ids[2]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_move_range_backward_from_tail() {
        let (mut list, ids) = chain(&["a", "b", "c", "d"]);
        list.move_range(ids[2], ids[3], ids[0]);

        assert_eq!(joined(&list), "a c d b");
        assert_eq!(list.back(), Some(ids[1]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_move_range_keeps_links() {
        let (mut list, ids) = chain(&["(", ")", "x"]);
        list.create_mutual_links(ids[0], ids[1]);

        list.move_range(ids[0], ids[1], ids[2]);

        assert_eq!(joined(&list), "x ( )");
        assert_eq!(list.link(ids[0]), Some(ids[1]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_erase_range_exclusive() {
        let (mut list, ids) = chain(&["a", "b", "c", "d"]);
        list.erase_range(Some(ids[0]), Some(ids[3]));

        assert_eq!(joined(&list), "a d");
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_erase_range_to_end() {
        let (mut list, ids) = chain(&["a", "b", "c"]);
        list.erase_range(Some(ids[0]), None);

        assert_eq!(joined(&list), "a");
        assert_eq!(list.back(), Some(ids[0]));
        assert!(list.validate().is_ok());
    }

    #[test]
    fn test_erase_range_without_begin_is_noop() {
        let (mut list, _) = chain(&["a", "b"]);
        list.erase_range(None, None);

        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_edits_on_fresh_list_keep_invariants() {
        let mut list = TokenList::new();
        let a = list.push_back("a", 1, 0);
        let z = list.insert_after(a, "z");
        let y = list.insert_after(a, "y");
        list.create_mutual_links(a, z);

        list.move_range(y, y, z);
        assert_eq!(joined(&list), "a z y");

        list.delete_this(a);
        assert_eq!(joined(&list), "z y");
        assert_eq!(list.link(a), None);
        assert!(list.validate().is_ok());
    }
}
