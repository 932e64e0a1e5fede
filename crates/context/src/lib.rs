//! Bounded conversation context for KICAI.
//!
//! `ContextWindow` holds the trailing turns of a session in insertion order.
//! Appending past capacity evicts the oldest turns (FIFO) — never the most
//! recent. This bound is a correctness property, not a style choice: the
//! window feeds the prompt compiler directly, and an unbounded history would
//! grow the prompt without limit over a long design session.
//!
//! All operations are synchronous and non-suspending. The window is owned by
//! exactly one session; only the turn orchestrator mutates it.

use kicai_core::turn::Turn;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of turns retained per session.
pub const DEFAULT_CAPACITY: usize = 20;

/// An ordered, capacity-bounded sequence of turns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextWindow {
    turns: VecDeque<Turn>,
    capacity: usize,
}

impl ContextWindow {
    /// Create a window with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a window holding at most `capacity` turns (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turns: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a turn, evicting from the front until within capacity.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > self.capacity {
            if let Some(evicted) = self.turns.pop_front() {
                tracing::debug!(
                    role = evicted.role.label(),
                    "Evicted oldest turn from context window"
                );
            }
        }
    }

    /// The current turns, oldest first. No reordering, no deduplication.
    pub fn window(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    /// Clear all turns. Idempotent.
    pub fn reset(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(n: usize) -> Turn {
        Turn::user(format!("message {n}"))
    }

    #[test]
    fn append_preserves_insertion_order() {
        let mut ctx = ContextWindow::new();
        ctx.append(Turn::user("first"));
        ctx.append(Turn::assistant("second"));
        ctx.append(Turn::user("third"));

        let window = ctx.window();
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "first");
        assert_eq!(window[2].content, "third");
    }

    /// The bound is a correctness property: without it, long sessions grow
    /// the window (and the compiled prompt) without limit.
    #[test]
    fn eviction_bounds_history_growth() {
        let capacity = 20;
        let mut ctx = ContextWindow::with_capacity(capacity);
        let total = 57;
        for n in 0..total {
            ctx.append(user(n));
        }

        let window = ctx.window();
        assert_eq!(window.len(), capacity);
        // The survivors are exactly the last `capacity` turns, in order.
        for (i, turn) in window.iter().enumerate() {
            assert_eq!(turn.content, format!("message {}", total - capacity + i));
        }
    }

    #[test]
    fn newest_turn_is_never_evicted() {
        let mut ctx = ContextWindow::with_capacity(1);
        ctx.append(Turn::user("old"));
        ctx.append(Turn::user("new"));
        let window = ctx.window();
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].content, "new");
    }

    #[test]
    fn reset_is_idempotent() {
        let mut ctx = ContextWindow::new();
        ctx.append(Turn::user("hello"));
        ctx.reset();
        assert!(ctx.is_empty());
        ctx.reset();
        assert!(ctx.is_empty());
    }

    #[test]
    fn zero_capacity_clamps_to_one() {
        let mut ctx = ContextWindow::with_capacity(0);
        assert_eq!(ctx.capacity(), 1);
        ctx.append(Turn::user("kept"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn duplicate_content_is_not_deduplicated() {
        let mut ctx = ContextWindow::new();
        ctx.append(Turn::user("same"));
        ctx.append(Turn::user("same"));
        assert_eq!(ctx.len(), 2);
    }
}
