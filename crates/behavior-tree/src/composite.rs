//! Composite node semantics.
//!
//! Composite nodes control the execution flow of multiple children. This
//! module implements the two composites of the tree: Sequence (AND logic with
//! a resumable cursor) and Selector (OR logic in fixed priority order).

use crate::tree::{Node, NodeId, Tree};
use crate::Status;

impl<C> Tree<C> {
    /// Ticks a sequence node.
    ///
    /// # Semantics
    ///
    /// Children are ticked left to right starting at the stored cursor:
    /// - `Running` pins the cursor on that child and the sequence is `Running`
    /// - `Succeeded` advances the cursor; past the last child the sequence
    ///   succeeds and the cursor rewinds to 0 for the next activation
    /// - `Failed` aborts every running descendant, rewinds the cursor and the
    ///   sequence fails
    ///
    /// The cursor never moves backward within one uninterrupted activation.
    pub(crate) fn tick_sequence(&mut self, id: NodeId, ctx: &mut C) -> Status {
        let start = self.sequence_cursor(id);
        let count = self.child_count(id);

        for index in start..count {
            let Some(child) = self.child(id, index) else {
                break;
            };

            match self.tick_node(child, ctx) {
                Status::Running => {
                    self.set_sequence_cursor(id, index);
                    return Status::Running;
                }
                Status::Succeeded => continue,
                Status::Failed | Status::Idle => {
                    self.abort_children(id, ctx);
                    self.set_sequence_cursor(id, 0);
                    return Status::Failed;
                }
            }
        }

        // Every child succeeded
        self.set_sequence_cursor(id, 0);
        Status::Succeeded
    }

    /// Ticks a selector node.
    ///
    /// # Semantics
    ///
    /// Children are tried left to right every tick, stopping at the first one
    /// that does not fail; its status becomes the selector's status. Children
    /// after the winner were not visited this tick, so any of them still
    /// running from an earlier tick is aborted. A failing condition leaf
    /// therefore short-circuits its whole branch and hands control to the
    /// next sibling.
    ///
    /// A displaced sibling is aborted before the first action of the new
    /// winner is entered, so its safe-stop never lands on top of the winner's
    /// entry command. Conditions do not touch the context mutably, so a child
    /// that fails on its guards leaves the running sibling untouched.
    pub(crate) fn tick_selector(&mut self, id: NodeId, ctx: &mut C) -> Status {
        let count = self.child_count(id);

        for index in 0..count {
            let Some(child) = self.child(id, index) else {
                break;
            };

            let displacing = self.running_after(id, index);
            if displacing {
                self.displaced.push((id, index + 1));
            }
            let status = self.tick_node(child, ctx);
            if displacing {
                self.displaced.retain(|&(parent, _)| parent != id);
            }

            match status {
                Status::Failed | Status::Idle => continue,
                status => {
                    self.abort_children_from(id, index + 1, ctx);
                    return status;
                }
            }
        }

        // All children failed
        Status::Failed
    }

    /// Returns `true` if a child after `index` is still running.
    fn running_after(&self, id: NodeId, index: usize) -> bool {
        (index + 1..self.child_count(id))
            .filter_map(|later| self.child(id, later))
            .any(|child| self.slots[child.index()].status.is_running())
    }

    fn sequence_cursor(&self, id: NodeId) -> usize {
        match &self.slots[id.index()].node {
            Node::Sequence { cursor, .. } => *cursor,
            _ => 0,
        }
    }

    fn set_sequence_cursor(&mut self, id: NodeId, value: usize) {
        if let Node::Sequence { cursor, .. } = &mut self.slots[id.index()].node {
            *cursor = value;
        }
    }
}
