//! Hierarchy construction.
//!
//! Groups the flat, repaired section sequence into a nested forest that
//! mirrors numbering depth. Construction is bottom-up over an explicit stack
//! of currently open ancestors, so the result is acyclic by construction and
//! each depth is testable on its own. Unnumbered documents degenerate to a
//! flat forest in TOC order.

use crate::splitter::Section;
use crate::toc::{numbering_label, NumberingMode};
use serde_json::{Map, Value};

/// A node of the section hierarchy.
///
/// Invariant: when numbering is present, a child's path is a strict depth+1
/// extension of its parent's path; the builder synthesizes intermediate
/// structural nodes to keep this true for orphans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyNode {
    /// Outline numbering path; empty for unnumbered nodes
    pub numbering: Vec<u32>,

    /// Title text; empty for synthesized structural nodes
    pub title: String,

    /// Body text attached directly at this numbering, if any
    pub text: Option<String>,

    /// Immediate children, one level deeper, in document order
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    fn from_section(section: &Section) -> Self {
        Self {
            numbering: section.numbering.clone(),
            title: section.title.clone(),
            text: if section.raw_text.is_empty() {
                None
            } else {
                Some(section.raw_text.clone())
            },
            children: Vec::new(),
        }
    }

    fn structural(numbering: Vec<u32>) -> Self {
        Self {
            numbering,
            title: String::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Display key for serialized output: `"1.2. Title"`, `"1.2."` for a
    /// synthesized node, or the bare title when unnumbered.
    pub fn display_key(&self) -> String {
        let label = numbering_label(&self.numbering);
        if label.is_empty() {
            self.title.clone()
        } else if self.title.is_empty() {
            format!("{}.", label)
        } else {
            format!("{}. {}", label, self.title)
        }
    }
}

/// Build the hierarchy forest from repaired sections.
///
/// Nodes with neither body text nor surviving children are pruned from the
/// result, so the returned forest never contains empty leaves.
pub fn build_forest(sections: &[Section], mode: NumberingMode) -> Vec<HierarchyNode> {
    let forest = match mode {
        NumberingMode::Numbered => build_numbered(sections),
        NumberingMode::None => sections.iter().map(HierarchyNode::from_section).collect(),
    };
    prune_empty(forest)
}

/// Stack-based grouping by numbering prefix.
fn build_numbered(sections: &[Section]) -> Vec<HierarchyNode> {
    let mut roots: Vec<HierarchyNode> = Vec::new();
    let mut stack: Vec<HierarchyNode> = Vec::new();

    for section in sections {
        let path = &section.numbering;

        if path.is_empty() {
            // Entry whose numbering never parsed: attach to the innermost
            // open ancestor, or the top level when none is open.
            attach(&mut stack, &mut roots, HierarchyNode::from_section(section));
            continue;
        }

        // Close every open node that is not a proper prefix of this path.
        while let Some(top) = stack.last() {
            let d = top.numbering.len();
            if d < path.len() && top.numbering[..] == path[..d] {
                break;
            }
            let node = stack.pop().expect("stack top exists");
            attach(&mut stack, &mut roots, node);
        }

        // Synthesize missing intermediate ancestors so the child ends up a
        // strict depth+1 extension of its parent.
        while stack.len() + 1 < path.len() {
            let depth = stack.len() + 1;
            let ancestor = HierarchyNode::structural(path[..depth].to_vec());
            log::debug!(
                "Hierarchy: synthesized structural node {}",
                numbering_label(&ancestor.numbering)
            );
            stack.push(ancestor);
        }

        stack.push(HierarchyNode::from_section(section));
    }

    while let Some(node) = stack.pop() {
        attach(&mut stack, &mut roots, node);
    }

    roots
}

/// Attach a finished node to the innermost open ancestor, or to the roots.
fn attach(stack: &mut [HierarchyNode], roots: &mut Vec<HierarchyNode>, node: HierarchyNode) {
    match stack.last_mut() {
        Some(top) => top.children.push(node),
        None => roots.push(node),
    }
}

/// Recursively drop nodes with no body text and no surviving children.
fn prune_empty(forest: Vec<HierarchyNode>) -> Vec<HierarchyNode> {
    forest
        .into_iter()
        .filter_map(|mut node| {
            node.children = prune_empty(std::mem::take(&mut node.children));
            let has_text = node.text.as_deref().is_some_and(|t| !t.is_empty());
            if has_text || !node.children.is_empty() {
                Some(node)
            } else {
                None
            }
        })
        .collect()
}

/// Serialize the forest as the nested key -> (string | mapping) structure of
/// the output contract. A leaf maps to its text; a parent maps to a mapping
/// of its children's keys, with its own body text (when present) stored
/// under an `"introduction"` key.
pub fn forest_to_map(forest: &[HierarchyNode]) -> Map<String, Value> {
    let mut map = Map::new();
    for node in forest {
        let key = node.display_key();
        if node.children.is_empty() {
            map.insert(
                key,
                Value::String(node.text.clone().unwrap_or_default()),
            );
        } else {
            let mut inner = Map::new();
            if let Some(text) = node.text.as_deref().filter(|t| !t.is_empty()) {
                inner.insert("introduction".to_string(), Value::String(text.to_string()));
            }
            inner.extend(forest_to_map(&node.children));
            map.insert(key, Value::Object(inner));
        }
    }
    map
}
