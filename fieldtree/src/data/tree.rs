use std::collections::HashSet;

use serde_json::Value;

use crate::{
    data::field::{FieldId, FieldNode, FieldType, FieldUpdate},
    error::{FieldError, Result},
};

/// Ordered forest of fields.
///
/// Ids come from a counter owned by the tree and are never reused, so an id
/// that was deleted keeps pointing at nothing. `u64::MAX` is never handed out.
///
/// Two trees are equal when their fields are equal; the id counter is not
/// part of the schema.
#[derive(Debug, Clone)]
pub struct FieldTree {
    roots: Vec<FieldNode>,
    next_id: u64,
}

impl PartialEq for FieldTree {
    fn eq(&self, other: &Self) -> bool {
        self.roots == other.roots
    }
}

impl Eq for FieldTree {}

impl Default for FieldTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldTree {
    /// The starting schema: a single required `name` text field.
    pub fn new() -> Self {
        let root = FieldNode::new(FieldId::new(1), "name", FieldType::Text, true);
        Self {
            roots: vec![root],
            next_id: 2,
        }
    }

    /// A forest without fields.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            next_id: 1,
        }
    }

    /// Build a tree from loaded root fields.
    ///
    /// Rejects an empty forest, duplicate ids and children under non-object
    /// fields, and documents that leave no room for new ids. New ids continue
    /// after the largest id found.
    pub fn from_roots(roots: Vec<FieldNode>) -> Result<Self> {
        if roots.is_empty() {
            return Err(FieldError::EmptySchema);
        }

        let mut seen = HashSet::new();
        let mut max_id: u64 = 0;
        let mut stack: Vec<&FieldNode> = roots.iter().collect();
        while let Some(node) = stack.pop() {
            if !seen.insert(node.id()) {
                return Err(FieldError::DuplicateId(node.id()));
            }
            if !node.can_have_children() && !node.children().is_empty() {
                return Err(FieldError::UnexpectedChildren {
                    id: node.id(),
                    field_type: node.field_type(),
                });
            }
            max_id = max_id.max(node.id().get());
            stack.extend(node.children());
        }

        let next_id = max_id.checked_add(1).ok_or(FieldError::IdSpaceExhausted)?;
        Ok(Self { roots, next_id })
    }

    fn alloc_id(&mut self) -> Result<FieldId> {
        let id = FieldId::new(self.next_id);
        self.next_id = self
            .next_id
            .checked_add(1)
            .ok_or(FieldError::IdSpaceExhausted)?;
        Ok(id)
    }

    pub fn roots(&self) -> &[FieldNode] {
        &self.roots
    }

    /// Consume the tree and hand back its root fields.
    pub fn into_roots(self) -> Vec<FieldNode> {
        self.roots
    }

    /// Append a root field named after its position (`field_2`, `field_3`, ...).
    pub fn add_root(&mut self) -> Result<FieldId> {
        let id = self.alloc_id()?;
        let key = format!("field_{}", self.roots.len() + 1);
        debug!("add root field {id} `{key}`");
        self.roots.push(FieldNode::new(id, key, FieldType::Text, false));
        Ok(id)
    }

    /// Append a `nested_field` child to an object field at any depth.
    pub fn add_child(&mut self, parent: FieldId) -> Result<FieldId> {
        let field_type = self
            .get(parent)
            .ok_or(FieldError::NotFound(parent))?
            .field_type();
        if !field_type.can_have_children() {
            return Err(FieldError::NotAnObject {
                id: parent,
                field_type,
            });
        }
        let id = self.alloc_id()?;
        let node = find_mut(&mut self.roots, parent).ok_or(FieldError::NotFound(parent))?;
        node.push_child(FieldNode::new(id, "nested_field", FieldType::Text, false));
        debug!("add field {id} under {parent}");
        Ok(id)
    }

    /// Merge `update` into the field with the given id, leaving every other
    /// field untouched. Returns whether the field changed.
    pub fn update(&mut self, id: FieldId, update: FieldUpdate) -> Result<bool> {
        let node = find_mut(&mut self.roots, id).ok_or(FieldError::NotFound(id))?;
        let changed = node.apply(update);
        if changed {
            debug!("update field {id}");
        }
        Ok(changed)
    }

    /// Flip the required flag of a field and return the new value.
    pub fn toggle_required(&mut self, id: FieldId) -> Result<bool> {
        let node = find_mut(&mut self.roots, id).ok_or(FieldError::NotFound(id))?;
        let required = !node.required();
        node.apply(FieldUpdate::default().with_required(required));
        Ok(required)
    }

    /// Remove a field and its subtree from any depth.
    ///
    /// The last remaining root field cannot be removed.
    pub fn delete(&mut self, id: FieldId) -> Result<FieldNode> {
        if let Some(pos) = self.roots.iter().position(|n| n.id() == id) {
            if self.roots.len() == 1 {
                return Err(FieldError::LastRoot(id));
            }
            debug!("delete root field {id}");
            return Ok(self.roots.remove(pos));
        }

        let removed = remove_nested(&mut self.roots, id).ok_or(FieldError::NotFound(id))?;
        debug!("delete field {id}");
        Ok(removed)
    }

    /// Look up a field at any depth.
    pub fn get(&self, id: FieldId) -> Option<&FieldNode> {
        self.walk().map(|(_, node)| node).find(|node| node.id() == id)
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.get(id).is_some()
    }

    /// Total number of fields.
    pub fn len(&self) -> usize {
        self.walk().count()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of levels, 0 for an empty forest.
    pub fn depth(&self) -> usize {
        self.walk().map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    /// Pre-order traversal yielding each field with its depth (roots are 0).
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.roots.iter().rev().map(|node| (0, node)).collect(),
        }
    }

    /// Sample document for this schema.
    pub fn sample(&self) -> Value {
        crate::data::sample::generate(&self.roots)
    }
}

/// Pre-order iterator over a [`FieldTree`].
pub struct Walk<'a> {
    stack: Vec<(usize, &'a FieldNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a FieldNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node))
    }
}

fn find_mut(nodes: &mut [FieldNode], id: FieldId) -> Option<&mut FieldNode> {
    nodes.iter_mut().find_map(|node| {
        if node.id() == id {
            Some(node)
        } else {
            find_mut(node.children_mut(), id)
        }
    })
}

fn remove_nested(nodes: &mut [FieldNode], id: FieldId) -> Option<FieldNode> {
    for node in nodes.iter_mut() {
        let children = node.children_mut();
        if let Some(pos) = children.iter().position(|c| c.id() == id) {
            return Some(children.remove(pos));
        }
        if let Some(removed) = remove_nested(children, id) {
            return Some(removed);
        }
    }
    None
}
