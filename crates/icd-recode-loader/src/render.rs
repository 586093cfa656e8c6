//! Human-readable rendering of a recode tree.
//!
//! The output uses the table layout itself: headings for internal groups
//! and one entry line per leaf, indented four spaces per level. Feeding it
//! back through the parser rebuilds the same leaves, values and rules.

use icd_recode_types::Group;

use crate::tree::RecodeTree;

const INDENT: &str = "    ";

/// Renders every group below the root, depth-first in document order.
pub fn describe(tree: &RecodeTree) -> String {
    let mut out = String::new();
    for (id, group) in tree.depth_first() {
        if id == RecodeTree::ROOT {
            continue;
        }
        out.push_str(&INDENT.repeat(group.depth.saturating_sub(1)));
        render_group(&mut out, group);
        out.push('\n');
    }
    out
}

fn render_group(out: &mut String, group: &Group) {
    match &group.recode {
        Some(recode) => {
            let rules: Vec<String> = group.rules.iter().map(ToString::to_string).collect();
            out.push_str(&format!("{} = {} ({})", recode, group.label, rules.join(", ")));
        }
        None => {
            out.push_str(&group.label);
            out.push(':');
        }
    }
}
