//! Arena-backed doubly-linked token chain
//!
//! Nodes live in a slot vector and are addressed by [`TokenId`], an index plus
//! a generation. Freeing a slot bumps its generation, so a handle to a deleted
//! node never aliases the node that later reuses the slot.

use super::token::Token;
use crate::diagnostics::{ErrorMessage, ErrorReporter, LoggingReporter};
use crate::logging::codes::{self, Code};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::Arc;
use thiserror::Error;

/// Generation-checked handle to a node of one [`TokenList`]
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenId {
    index: u32,
    generation: u32,
}

impl TokenId {
    #[inline]
    pub const fn index(self) -> usize {
        self.index as usize
    }

    #[inline]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// Structural problems found by [`TokenList::validate`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("Chain is broken at {at}: neighbours do not point back")]
    BrokenChain { at: TokenId },

    #[error("{count} live nodes are not reachable from the head")]
    Unreachable { count: usize },

    #[error("Head node has a predecessor")]
    HeadMismatch,

    #[error("Stored tail is not the last reachable node")]
    TailMismatch,

    #[error("Link from {from} to {to} is not mutual")]
    AsymmetricLink { from: TokenId, to: TokenId },

    #[error("Node {at} is linked to itself")]
    SelfLink { at: TokenId },

    #[error("Handle {id} refers to a deleted node")]
    StaleHandle { id: TokenId },
}

impl ListError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::BrokenChain { .. } | Self::Unreachable { .. } => codes::list::BROKEN_CHAIN,
            Self::HeadMismatch => codes::list::HEAD_MISMATCH,
            Self::TailMismatch => codes::list::TAIL_MISMATCH,
            Self::AsymmetricLink { .. } => codes::list::ASYMMETRIC_LINK,
            Self::SelfLink { .. } => codes::list::SELF_LINK,
            Self::StaleHandle { .. } => codes::list::STALE_HANDLE,
        }
    }
}

pub type ListResult<T> = Result<T, ListError>;

#[derive(Debug, Clone)]
pub(super) struct Node {
    pub(super) token: Token,
    pub(super) next: Option<TokenId>,
    pub(super) prev: Option<TokenId>,
    pub(super) link: Option<TokenId>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An ordered chain of tokens with a known head and tail
#[derive(Clone)]
pub struct TokenList {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
    pub(super) front: Option<TokenId>,
    pub(super) back: Option<TokenId>,
    reporter: Arc<dyn ErrorReporter>,
}

impl Default for TokenList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenList")
            .field("len", &self.live)
            .field("front", &self.front)
            .field("back", &self.back)
            .finish()
    }
}

impl TokenList {
    pub fn new() -> Self {
        Self::with_reporter(Arc::new(LoggingReporter))
    }

    /// Create a list whose diagnostics go to `reporter`
    pub fn with_reporter(reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            front: None,
            back: None,
            reporter,
        }
    }

    pub fn set_reporter(&mut self, reporter: Arc<dyn ErrorReporter>) {
        self.reporter = reporter;
    }

    pub fn report_error(&self, message: &ErrorMessage) {
        self.reporter.report_error(message);
    }

    // === ARENA ===

    pub(super) fn alloc(&mut self, token: Token) -> TokenId {
        let node = Node {
            token,
            next: None,
            prev: None,
            link: None,
        };
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return TokenId {
                index,
                generation: slot.generation,
            };
        }

        assert!(self.slots.len() < u32::MAX as usize, "token arena exhausted");
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        TokenId {
            index,
            generation: 0,
        }
    }

    /// Release a slot that is already unthreaded and unlinked
    pub(super) fn release(&mut self, id: TokenId) {
        let slot = &mut self.slots[id.index()];
        debug_assert_eq!(slot.generation, id.generation);
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
    }

    pub(super) fn node(&self, id: TokenId) -> Option<&Node> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub(super) fn node_mut(&mut self, id: TokenId) -> &mut Node {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .unwrap_or_else(|| panic!("stale token handle {:?}", id))
    }

    fn live_node(&self, id: TokenId) -> &Node {
        self.node(id)
            .unwrap_or_else(|| panic!("stale token handle {:?}", id))
    }

    // === ACCESS ===

    /// Whether `id` still names a live node of this list
    pub fn contains(&self, id: TokenId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: TokenId) -> Option<&Token> {
        self.node(id).map(|node| &node.token)
    }

    pub fn get_mut(&mut self, id: TokenId) -> Option<&mut Token> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
            .map(|node| &mut node.token)
    }

    pub fn front(&self) -> Option<TokenId> {
        self.front
    }

    pub fn back(&self) -> Option<TokenId> {
        self.back
    }

    pub fn next(&self, id: TokenId) -> Option<TokenId> {
        self.live_node(id).next
    }

    pub fn previous(&self, id: TokenId) -> Option<TokenId> {
        self.live_node(id).prev
    }

    /// Bracket partner of `id`, if any
    pub fn link(&self, id: TokenId) -> Option<TokenId> {
        self.live_node(id).link
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Node `offset` hops after (positive) or before (negative) `id`
    pub fn token_at(&self, id: TokenId, offset: i32) -> Option<TokenId> {
        let mut current = Some(id);
        for _ in 0..offset.unsigned_abs() {
            let here = current?;
            current = if offset > 0 {
                self.next(here)
            } else {
                self.previous(here)
            };
        }
        current
    }

    /// Text of the node at `offset`, or `""` past either end
    pub fn text_at(&self, id: TokenId, offset: i32) -> &str {
        self.token_at(id, offset)
            .map(|at| self[at].text())
            .unwrap_or("")
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            current: self.front,
        }
    }

    /// Iterate from `start` (inclusive) to the tail
    pub fn iter_from(&self, start: TokenId) -> Iter<'_> {
        Iter {
            list: self,
            current: Some(start),
        }
    }

    // === BUILDING ===

    /// Append a token at the tail
    pub fn push_back(&mut self, text: &str, line_number: u32, file_index: u32) -> TokenId {
        let mut token = Token::new(text);
        token.set_line_number(line_number);
        token.set_file_index(file_index);

        let id = self.alloc(token);
        match self.back {
            Some(back) => {
                self.node_mut(back).next = Some(id);
                self.node_mut(id).prev = Some(back);
            }
            None => self.front = Some(id),
        }
        self.back = Some(id);
        id
    }

    // === INTEGRITY ===

    /// Check every chain and link invariant, reporting the first violation
    pub fn validate(&self) -> ListResult<()> {
        let Some(front) = self.front else {
            return match (self.back, self.live) {
                (None, 0) => Ok(()),
                (Some(_), _) => Err(ListError::TailMismatch),
                (None, count) => Err(ListError::Unreachable { count }),
            };
        };

        let front_node = self
            .node(front)
            .ok_or(ListError::StaleHandle { id: front })?;
        if front_node.prev.is_some() {
            return Err(ListError::HeadMismatch);
        }

        let mut visited = 0usize;
        let mut last = front;
        let mut current = Some(front);

        while let Some(id) = current {
            visited += 1;
            if visited > self.live {
                // More hops than live nodes means a cycle
                return Err(ListError::BrokenChain { at: id });
            }

            let node = self.node(id).ok_or(ListError::StaleHandle { id })?;

            if let Some(next) = node.next {
                let next_node = self.node(next).ok_or(ListError::StaleHandle { id: next })?;
                if next_node.prev != Some(id) {
                    return Err(ListError::BrokenChain { at: id });
                }
            }

            if let Some(partner) = node.link {
                if partner == id {
                    return Err(ListError::SelfLink { at: id });
                }
                let partner_node = self
                    .node(partner)
                    .ok_or(ListError::StaleHandle { id: partner })?;
                if partner_node.link != Some(id) {
                    return Err(ListError::AsymmetricLink {
                        from: id,
                        to: partner,
                    });
                }
            }

            last = id;
            current = node.next;
        }

        if self.back != Some(last) {
            return Err(ListError::TailMismatch);
        }

        if visited != self.live {
            return Err(ListError::Unreachable {
                count: self.live - visited,
            });
        }

        Ok(())
    }
}

impl Index<TokenId> for TokenList {
    type Output = Token;

    fn index(&self, id: TokenId) -> &Token {
        &self.live_node(id).token
    }
}

impl IndexMut<TokenId> for TokenList {
    fn index_mut(&mut self, id: TokenId) -> &mut Token {
        &mut self.node_mut(id).token
    }
}

/// Forward iterator over node handles
pub struct Iter<'a> {
    list: &'a TokenList,
    current: Option<TokenId>,
}

impl Iterator for Iter<'_> {
    type Item = TokenId;

    fn next(&mut self) -> Option<TokenId> {
        let id = self.current?;
        self.current = self.list.next(id);
        Some(id)
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = TokenId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}
