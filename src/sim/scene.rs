//! Display list
//!
//! Renderers draw whatever is in here. The session only cares about node
//! lifetime and label text, so positions are looked up from the physics
//! world (for bodies) or the moving-object list (for scenery) at draw time.

use serde::{Deserialize, Serialize};

use super::physics::BodyId;

/// Handle to a node in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// What a node draws as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Player,
    Ground,
    Scenery,
    UpperObstacle,
    LowerObstacle,
    /// Invisible, present so the gate's lifetime is tracked like its pair
    ScoreGate,
    ScoreLabel,
    GameOverLabel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub body: Option<BodyId>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    /// Draw order is insertion order
    nodes: Vec<Node>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_child(&mut self, kind: NodeKind, body: Option<BodyId>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.push(Node {
            id,
            kind,
            body,
            text: None,
        });
        id
    }

    pub fn add_label(&mut self, kind: NodeKind, text: impl Into<String>) -> NodeId {
        let id = self.add_child(kind, None);
        self.set_text(id, text);
        id
    }

    /// Returns the removed node, if it was present
    pub fn remove_child(&mut self, id: NodeId) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.remove(index))
    }

    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
            node.text = Some(text.into());
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
