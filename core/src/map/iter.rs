//! Ascending iteration over a persistent map

use std::sync::Arc;

use crate::types::Tuple;
use super::node::Node;

/// Lazy, forward-only iterator over a map's entries in ascending key order
///
/// The iterator holds its own references to the nodes it walks, so it stays
/// valid independently of the map it was created from.
pub struct MapIter {
    stack: Vec<(Arc<Node>, usize)>,
}

enum Step {
    Yield(Tuple, Tuple),
    Descend(Arc<Node>),
    Pop,
}

impl MapIter {
    pub(crate) fn new(root: Arc<Node>) -> Self {
        MapIter {
            stack: vec![(root, 0)],
        }
    }
}

impl Iterator for MapIter {
    type Item = (Tuple, Tuple);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let step = {
                let (node, idx) = self.stack.last_mut()?;
                match &**node {
                    Node::Leaf { entries, .. } => match entries.get(*idx) {
                        Some((k, v)) => {
                            *idx += 1;
                            Step::Yield(k.clone(), v.clone())
                        }
                        None => Step::Pop,
                    },
                    Node::Internal { children, .. } => match children.get(*idx) {
                        Some(child) => {
                            *idx += 1;
                            Step::Descend(Arc::clone(&child.node))
                        }
                        None => Step::Pop,
                    },
                }
            };

            match step {
                Step::Yield(k, v) => return Some((k, v)),
                Step::Descend(child) => self.stack.push((child, 0)),
                Step::Pop => {
                    self.stack.pop();
                }
            }
        }
    }
}
