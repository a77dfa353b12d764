//! The syntax tree arena.

use crate::node::{Node, NodeKind};
use crate::types::{MemberTypes, NodeId};
use papyrus_core::text::TextRange;

/// An arena of syntax nodes holding one or more scripts.
#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    scripts: Vec<NodeId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node. Its children (which must already be in the tree) get
    /// their parent link set to the new node. `Script` nodes are recorded
    /// as roots.
    pub fn add(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            if let Some(node) = self.nodes.get_mut(child.index()) {
                node.parent = Some(id);
            }
        }
        if matches!(kind, NodeKind::Script { .. }) {
            self.scripts.push(id);
        }
        self.nodes.push(Node {
            id,
            kind,
            range,
            parent: None,
            scope_member_types: None,
        });
        id
    }

    /// Restrict name lookup at and below `id` to `member_types`.
    pub fn set_scope_member_types(&mut self, id: NodeId, member_types: MemberTypes) {
        if let Some(node) = self.nodes.get_mut(id.index()) {
            node.scope_member_types = Some(member_types);
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    #[inline]
    pub fn range(&self, id: NodeId) -> TextRange {
        self.node(id).range
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The script roots, in the order they were added.
    pub fn scripts(&self) -> &[NodeId] {
        &self.scripts
    }

    /// The name carried by an `Identifier` node, or by the identifier child
    /// of a node that has exactly one (type identifiers, identifier
    /// expressions, imports).
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name } => Some(name.as_str()),
            NodeKind::TypeIdentifier { identifier, .. }
            | NodeKind::IdentifierExpression { identifier }
            | NodeKind::Import { identifier }
            | NodeKind::CustomEventDefinition { identifier } => self.identifier_name(*identifier),
            _ => None,
        }
    }

    /// The script root that contains `id`.
    pub fn script_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors_inclusive(id)
            .find(|a| matches!(self.kind(*a), NodeKind::Script { .. }))
    }

    /// The name of the script a script root declares.
    pub fn script_name(&self, script: NodeId) -> Option<&str> {
        match self.kind(script) {
            NodeKind::Script { header, .. } => match self.kind(*header) {
                NodeKind::ScriptHeader { identifier, .. } => self.identifier_name(*identifier),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether `node` is `ancestor` or lies below it.
    pub fn is_descendant_or_self(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors_inclusive(node).any(|a| a == ancestor)
    }

    /// Strict ancestors of `id`, innermost first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// `id` followed by its ancestors, innermost first.
    pub fn ancestors_inclusive(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }
}

/// Iterator over a node's ancestor chain.
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(tree: &mut SyntaxTree, name: &str, pos: u32) -> NodeId {
        tree.add(
            NodeKind::Identifier {
                name: name.to_string(),
            },
            TextRange::new(pos, pos + name.len() as u32),
        )
    }

    #[test]
    fn test_add_links_parents() {
        let mut tree = SyntaxTree::new();
        let name = ident(&mut tree, "Foo", 0);
        let expr = tree.add(
            NodeKind::IdentifierExpression { identifier: name },
            TextRange::new(0, 3),
        );
        assert_eq!(tree.parent(name), Some(expr));
        assert_eq!(tree.parent(expr), None);
        assert_eq!(tree.identifier_name(expr), Some("Foo"));
    }

    #[test]
    fn test_ancestors_and_script_of() {
        let mut tree = SyntaxTree::new();
        let script_name = ident(&mut tree, "Quest", 0);
        let header = tree.add(
            NodeKind::ScriptHeader {
                identifier: script_name,
                extended: None,
                flags: Default::default(),
            },
            TextRange::new(0, 5),
        );
        let script = tree.add(
            NodeKind::Script {
                header,
                imports: Vec::new(),
                definitions: Vec::new(),
            },
            TextRange::new(0, 5),
        );

        let chain: Vec<_> = tree.ancestors_inclusive(script_name).collect();
        assert_eq!(chain, vec![script_name, header, script]);
        assert_eq!(tree.ancestors(script_name).next(), Some(header));
        assert_eq!(tree.script_of(script_name), Some(script));
        assert_eq!(tree.script_name(script), Some("Quest"));
        assert_eq!(tree.scripts(), &[script]);
        assert!(tree.is_descendant_or_self(script_name, header));
        assert!(!tree.is_descendant_or_self(header, script_name));
    }
}
