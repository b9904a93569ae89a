//! Arena-backed tree and the tick/abort executor.
//!
//! Every node lives in a flat arena and is addressed by a [`NodeId`]. Cross-tick
//! state (node status, sequence cursors) is stored in the arena slots rather
//! than on the call stack, so a tree can be paused, resumed, aborted and
//! inspected deterministically between ticks.

use crate::{Action, Condition, Status};

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Kind of a node, as exposed for inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Condition,
    Action,
    Sequence,
    Selector,
}

/// Tagged node variant stored in the arena.
pub(crate) enum Node<C> {
    Condition(Box<dyn Condition<C>>),
    Action(Box<dyn Action<C>>),
    Sequence { children: Vec<NodeId>, cursor: usize },
    Selector { children: Vec<NodeId> },
}

pub(crate) struct Slot<C> {
    pub(crate) name: &'static str,
    pub(crate) node: Node<C>,
    pub(crate) status: Status,
}

impl<C> Slot<C> {
    pub(crate) fn kind(&self) -> NodeKind {
        match self.node {
            Node::Condition(_) => NodeKind::Condition,
            Node::Action(_) => NodeKind::Action,
            Node::Sequence { .. } => NodeKind::Sequence,
            Node::Selector { .. } => NodeKind::Selector,
        }
    }
}

/// A behavior tree with persistent per-node state.
///
/// Built with [`crate::builder`]; see [`Tree::build`].
pub struct Tree<C> {
    pub(crate) name: &'static str,
    pub(crate) slots: Vec<Slot<C>>,
    pub(crate) root: NodeId,
    /// Running siblings displaced by a higher-priority selector child that is
    /// being tried this tick: `(selector, first displaced index)`.
    pub(crate) displaced: Vec<(NodeId, usize)>,
}

impl<C> Tree<C> {
    /// Name given to the tree at build time.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the arena is empty. Built trees never are.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Status of the root node as of the last tick.
    pub fn status(&self) -> Status {
        self.slots[self.root.index()].status
    }

    /// Returns `true` if the root is in control and running.
    pub fn is_running(&self) -> bool {
        self.status().is_running()
    }

    /// Status of an arbitrary node.
    pub fn node_status(&self, id: NodeId) -> Option<Status> {
        self.slots.get(id.index()).map(|slot| slot.status)
    }

    /// Label of an arbitrary node.
    pub fn node_name(&self, id: NodeId) -> Option<&'static str> {
        self.slots.get(id.index()).map(|slot| slot.name)
    }

    /// Kind of an arbitrary node.
    pub fn node_kind(&self, id: NodeId) -> Option<NodeKind> {
        self.slots.get(id.index()).map(Slot::kind)
    }

    /// Cursor of a sequence node, `None` for any other kind.
    pub fn cursor(&self, id: NodeId) -> Option<usize> {
        match self.slots.get(id.index())?.node {
            Node::Sequence { cursor, .. } => Some(cursor),
            _ => None,
        }
    }

    /// Finds the first node (in build order) with the given label.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.slots
            .iter()
            .position(|slot| slot.name == name)
            .map(|index| NodeId(index as u32))
    }

    /// Labels of all actions currently running, in arena order.
    pub fn running_actions(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.node, Node::Action(_)) && slot.status.is_running())
            .map(|slot| slot.name)
            .collect()
    }

    /// Ticks the whole tree once.
    ///
    /// Returns the root status, never [`Status::Idle`].
    pub fn tick(&mut self, ctx: &mut C) -> Status {
        self.tick_node(self.root, ctx)
    }

    /// Aborts every running node and resets the tree to `Idle`.
    ///
    /// Running actions receive exactly one `on_abort`. Calling this on a tree
    /// that is not running only resets bookkeeping and issues no command.
    pub fn abort(&mut self, ctx: &mut C) {
        self.abort_node(self.root, ctx);
    }

    pub(crate) fn child(&self, parent: NodeId, index: usize) -> Option<NodeId> {
        match &self.slots[parent.index()].node {
            Node::Sequence { children, .. } | Node::Selector { children } => {
                children.get(index).copied()
            }
            _ => None,
        }
    }

    pub(crate) fn child_count(&self, parent: NodeId) -> usize {
        match &self.slots[parent.index()].node {
            Node::Sequence { children, .. } | Node::Selector { children } => children.len(),
            _ => 0,
        }
    }

    pub(crate) fn tick_node(&mut self, id: NodeId, ctx: &mut C) -> Status {
        let status = match self.slots[id.index()].kind() {
            NodeKind::Condition => self.evaluate_condition(id, ctx),
            NodeKind::Action => self.tick_action(id, ctx),
            NodeKind::Sequence => self.tick_sequence(id, ctx),
            NodeKind::Selector => self.tick_selector(id, ctx),
        };
        self.slots[id.index()].status = status;
        status
    }

    fn evaluate_condition(&self, id: NodeId, ctx: &C) -> Status {
        match &self.slots[id.index()].node {
            Node::Condition(condition) => Status::from_bool(condition.evaluate(ctx)),
            _ => Status::Failed,
        }
    }

    fn tick_action(&mut self, id: NodeId, ctx: &mut C) -> Status {
        let entering = !self.slots[id.index()].status.is_running();
        if entering {
            // The new branch is about to act, so whatever it displaces stops first.
            self.abort_displaced(ctx);
        }

        let slot = &mut self.slots[id.index()];
        let name = slot.name;
        let Node::Action(action) = &mut slot.node else {
            return Status::Failed;
        };

        if entering {
            tracing::trace!("action `{}` entered", name);
            action.on_enter(ctx);
        }

        match action.on_tick(ctx) {
            Status::Idle => {
                tracing::warn!("action `{}` reported Idle from on_tick, treating as Failed", name);
                Status::Failed
            }
            status => status,
        }
    }

    pub(crate) fn abort_node(&mut self, id: NodeId, ctx: &mut C) {
        let slot = &mut self.slots[id.index()];
        let was_running = slot.status.is_running();
        let name = slot.name;
        slot.status = Status::Idle;

        match &mut slot.node {
            Node::Condition(_) => {}
            Node::Action(action) => {
                if was_running {
                    tracing::debug!("aborting action `{}`", name);
                    action.on_abort(ctx);
                }
            }
            Node::Sequence { cursor, .. } => {
                *cursor = 0;
                self.abort_children(id, ctx);
            }
            Node::Selector { .. } => self.abort_children(id, ctx),
        }
    }

    pub(crate) fn abort_displaced(&mut self, ctx: &mut C) {
        while let Some((parent, start)) = self.displaced.pop() {
            self.abort_children_from(parent, start, ctx);
        }
    }

    pub(crate) fn abort_children(&mut self, parent: NodeId, ctx: &mut C) {
        self.abort_children_from(parent, 0, ctx);
    }

    pub(crate) fn abort_children_from(&mut self, parent: NodeId, start: usize, ctx: &mut C) {
        for index in start..self.child_count(parent) {
            if let Some(child) = self.child(parent, index) {
                self.abort_node(child, ctx);
            }
        }
    }
}
