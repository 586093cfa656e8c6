//! Recode table group type.
//!
//! This module provides the `Group` struct, one node of the recode hierarchy,
//! and the `GroupId` index used to refer to groups stored in an arena.

use std::fmt;

use crate::rule::{CodeQuery, CodeRule};

/// Index of a group inside its owning tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupId(pub usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the recode hierarchy.
///
/// Internal groups only carry children. Leaf groups carry the rules of the
/// table rows attached to them and the recode value those rows assign.
///
/// # Examples
///
/// ```
/// use icd_recode_types::{CodeQuery, CodeRule, Group};
///
/// let mut group = Group::new("Parkinson disease", 2, 14);
/// group.rules.push(CodeRule::range("G20".parse().unwrap(), "G21".parse().unwrap()));
/// group.recode = Some("18500".to_string());
///
/// assert!(group.is_leaf());
/// assert!(group.matches(&CodeQuery::parse("G20").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Group {
    /// Human-readable label.
    pub label: String,
    /// Nesting depth; the synthetic root is at depth 0.
    pub depth: usize,
    /// 1-based line of the table that opened this group (0 for the root).
    pub line_number: usize,
    /// Child groups in document order.
    pub children: Vec<GroupId>,
    /// Rules in document order.
    pub rules: Vec<CodeRule>,
    /// Recode value; only ever set on groups without children.
    pub recode: Option<String>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(label: impl Into<String>, depth: usize, line_number: usize) -> Self {
        Self {
            label: label.into(),
            depth,
            line_number,
            children: Vec::new(),
            rules: Vec::new(),
            recode: None,
        }
    }

    /// Returns true if this group has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if any of this group's rules matches the query.
    pub fn matches(&self, query: &CodeQuery) -> bool {
        self.rules.iter().any(|rule| rule.matches(query))
    }

    /// Returns true if every one of `codes` lies wholly inside a single rule
    /// of this group. An empty list is contained nowhere.
    pub fn contains_all(&self, codes: &[CodeRule]) -> bool {
        !codes.is_empty()
            && codes
                .iter()
                .all(|code| self.rules.iter().any(|rule| rule.contains(code)))
    }
}
