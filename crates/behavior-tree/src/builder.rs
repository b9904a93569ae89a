//! Builder utilities for ergonomic behavior tree construction.
//!
//! Trees are described as a nested [`NodeSpec`] and then flattened into the
//! arena by [`Tree::build`]. Instead of writing verbose
//! `NodeSpec::Sequence { .. }` literals, use the shorter helper functions like
//! `sequence("name", vec![...])`.

use crate::tree::{Node, NodeId, Slot};
use crate::{Action, Condition, Status, Tree, TreeError};

/// Declarative description of a (sub)tree.
pub enum NodeSpec<C> {
    Condition(Box<dyn Condition<C>>),
    Action(Box<dyn Action<C>>),
    Sequence {
        name: &'static str,
        children: Vec<NodeSpec<C>>,
    },
    Selector {
        name: &'static str,
        children: Vec<NodeSpec<C>>,
    },
}

impl<C> NodeSpec<C> {
    fn name(&self) -> &'static str {
        match self {
            NodeSpec::Condition(condition) => condition.name(),
            NodeSpec::Action(action) => action.name(),
            NodeSpec::Sequence { name, .. } | NodeSpec::Selector { name, .. } => name,
        }
    }
}

impl<C> Tree<C> {
    /// Flattens a spec into an arena tree.
    ///
    /// The root spec's label becomes the tree name.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyComposite`] if any sequence or selector has
    /// no children. A composite with no children is meaningless and indicates
    /// a configuration bug, so it is rejected at startup.
    pub fn build(spec: NodeSpec<C>) -> Result<Self, TreeError> {
        let name = spec.name();
        let mut slots = Vec::new();
        let root = push_spec(&mut slots, spec, name)?;
        Ok(Self {
            name,
            slots,
            root,
            displaced: Vec::new(),
        })
    }
}

fn push_spec<C>(
    slots: &mut Vec<Slot<C>>,
    spec: NodeSpec<C>,
    tree: &'static str,
) -> Result<NodeId, TreeError> {
    let index = u32::try_from(slots.len()).map_err(|_| TreeError::TooManyNodes(tree))?;
    let id = NodeId(index);
    let name = spec.name();

    let (kind, children) = match spec {
        NodeSpec::Condition(condition) => {
            slots.push(slot(name, Node::Condition(condition)));
            return Ok(id);
        }
        NodeSpec::Action(action) => {
            slots.push(slot(name, Node::Action(action)));
            return Ok(id);
        }
        NodeSpec::Sequence { children, .. } => ("Sequence", children),
        NodeSpec::Selector { children, .. } => ("Selector", children),
    };

    if children.is_empty() {
        return Err(TreeError::EmptyComposite { kind, name });
    }

    // Reserve the parent slot first so ids follow pre-order.
    let placeholder = if kind == "Sequence" {
        Node::Sequence {
            children: Vec::new(),
            cursor: 0,
        }
    } else {
        Node::Selector {
            children: Vec::new(),
        }
    };
    slots.push(slot(name, placeholder));

    let mut ids = Vec::with_capacity(children.len());
    for child in children {
        ids.push(push_spec(slots, child, tree)?);
    }

    match &mut slots[id.index()].node {
        Node::Sequence { children, .. } | Node::Selector { children } => *children = ids,
        _ => {}
    }

    Ok(id)
}

fn slot<C>(name: &'static str, node: Node<C>) -> Slot<C> {
    Slot {
        name,
        node,
        status: Status::Idle,
    }
}

/// Creates a sequence node.
///
/// Shorthand for `NodeSpec::Sequence { name, children }`.
#[inline]
pub fn sequence<C>(name: &'static str, children: Vec<NodeSpec<C>>) -> NodeSpec<C> {
    NodeSpec::Sequence { name, children }
}

/// Creates a selector node.
///
/// Shorthand for `NodeSpec::Selector { name, children }`.
#[inline]
pub fn selector<C>(name: &'static str, children: Vec<NodeSpec<C>>) -> NodeSpec<C> {
    NodeSpec::Selector { name, children }
}

/// Wraps a condition leaf.
#[inline]
pub fn condition<C>(leaf: impl Condition<C> + 'static) -> NodeSpec<C> {
    NodeSpec::Condition(Box::new(leaf))
}

/// Wraps an action leaf.
#[inline]
pub fn action<C>(leaf: impl Action<C> + 'static) -> NodeSpec<C> {
    NodeSpec::Action(Box::new(leaf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use crate::{Not, Predicate};

    struct Ctx;

    struct Noop;
    impl Action<Ctx> for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }
        fn on_enter(&mut self, _ctx: &mut Ctx) {}
        fn on_tick(&mut self, _ctx: &mut Ctx) -> Status {
            Status::Succeeded
        }
        fn on_abort(&mut self, _ctx: &mut Ctx) {}
    }

    #[test]
    fn empty_composite_is_rejected() {
        let err = Tree::<Ctx>::build(sequence(
            "outer",
            vec![action(Noop), selector("inner", Vec::new())],
        ))
        .err();

        assert_eq!(
            err,
            Some(TreeError::EmptyComposite {
                kind: "Selector",
                name: "inner"
            })
        );
    }

    #[test]
    fn ids_follow_pre_order() {
        let tree = Tree::<Ctx>::build(selector(
            "root",
            vec![
                sequence(
                    "left",
                    vec![condition(Predicate::new("yes", |_: &Ctx| true)), action(Noop)],
                ),
                condition(Not::new(Predicate::new("no", |_: &Ctx| true))),
            ],
        ))
        .unwrap();

        assert_eq!(tree.name(), "root");
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.find("left").map(|id| id.index()), Some(1));
        assert_eq!(tree.find("noop").map(|id| id.index()), Some(3));
        assert_eq!(
            tree.find("root").and_then(|id| tree.node_kind(id)),
            Some(NodeKind::Selector)
        );
    }
}
