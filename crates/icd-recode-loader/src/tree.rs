//! Arena storage for the recode hierarchy.
//!
//! Groups live in one `Vec` and refer to their children by [`GroupId`].
//! The root is always at index 0 and is labeled `"root"`.

use icd_recode_types::{Group, GroupId};

/// The full group hierarchy of one recode table.
///
/// Built once by the parser; read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecodeTree {
    groups: Vec<Group>,
}

impl Default for RecodeTree {
    fn default() -> Self {
        Self {
            groups: vec![Group::new("root", 0, 0)],
        }
    }
}

impl RecodeTree {
    /// Identifier of the synthetic root group.
    pub const ROOT: GroupId = GroupId(0);

    /// Creates a tree holding only the root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the root group.
    pub fn root(&self) -> &Group {
        &self.groups[Self::ROOT.0]
    }

    /// Looks up a group by id.
    pub fn get(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.0)
    }

    /// Returns the direct children of a group in document order.
    pub fn children(&self, id: GroupId) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.get(id)
            .map(|group| group.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&child| (child, &self.groups[child.0]))
    }

    /// Returns the number of groups, root included.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the tree holds nothing but the root.
    pub fn is_empty(&self) -> bool {
        self.groups.len() <= 1
    }

    /// Walks every group depth-first, left to right, root first.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            tree: self,
            stack: vec![Self::ROOT],
        }
    }

    /// Returns every group without children, in document order.
    ///
    /// The root is excluded even when the table is empty.
    pub fn leaves(&self) -> impl Iterator<Item = (GroupId, &Group)> + '_ {
        self.depth_first()
            .filter(|(id, group)| *id != Self::ROOT && group.is_leaf())
    }

    /// Appends a new group under `parent` and returns its id.
    pub(crate) fn add_child(&mut self, parent: GroupId, group: Group) -> GroupId {
        let id = GroupId(self.groups.len());
        self.groups.push(group);
        self.groups[parent.0].children.push(id);
        id
    }

    pub(crate) fn get_mut(&mut self, id: GroupId) -> &mut Group {
        &mut self.groups[id.0]
    }
}

/// Depth-first, document-order iterator over a [`RecodeTree`].
#[derive(Debug)]
pub struct DepthFirst<'a> {
    tree: &'a RecodeTree,
    stack: Vec<GroupId>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = (GroupId, &'a Group);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let group = self.tree.get(id)?;
        // Reverse so the leftmost child is visited next.
        self.stack.extend(group.children.iter().rev().copied());
        Some((id, group))
    }
}
