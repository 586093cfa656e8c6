//! Output formatting for lookups and trees.

use icd_recode_types::{Group, GroupId};
use icd_recode_loader::{RecodeResult, RecodeTree, Recoder};
use serde::Serialize;

/// JSON shape of one lookup.
#[derive(Debug, Serialize)]
pub struct LookupReport<'a> {
    pub code: &'a str,
    pub recodes: Vec<&'a str>,
    pub groups: Vec<&'a Group>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> LookupReport<'a> {
    pub fn new(recoder: &'a Recoder, code: &'a str) -> Self {
        match recoder.find_leaves(code) {
            Ok(groups) => Self {
                code,
                recodes: groups.iter().filter_map(|g| g.recode.as_deref()).collect(),
                groups,
                error: None,
            },
            Err(e) => Self {
                code,
                recodes: Vec::new(),
                groups: Vec::new(),
                error: Some(e.to_string()),
            },
        }
    }
}

/// JSON shape of one tree node.
#[derive(Debug, Serialize)]
pub struct TreeNode<'a> {
    pub id: GroupId,
    #[serde(flatten)]
    pub group: &'a Group,
}

/// Formats a lookup as `CODE: v1, v2`, `CODE: -` or `CODE: error: ...`.
pub fn format_lookup(code: &str, result: &RecodeResult<Vec<&str>>) -> String {
    match result {
        Ok(recodes) if recodes.is_empty() => format!("{}: -", code),
        Ok(recodes) => format!("{}: {}", code, recodes.join(", ")),
        Err(e) => format!("{}: error: {}", code, e),
    }
}

/// Lists every group of the tree in document order.
pub fn tree_nodes(tree: &RecodeTree) -> Vec<TreeNode<'_>> {
    tree.depth_first()
        .map(|(id, group)| TreeNode { id, group })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use icd_recode_loader::RecodeError;

    const TABLE: &str = "\
Diseases of the nervous system:
    18500 = Parkinson disease (G20-G21)
    Other diseases of nervous system:
        18800 = Other degenerative diseases (G20, G23-G25)
";

    #[test]
    fn test_format_lookup() {
        assert_eq!(format_lookup("G20", &Ok(vec!["18500", "18800"])), "G20: 18500, 18800");
        assert_eq!(format_lookup("Z99", &Ok(vec![])), "Z99: -");

        let err = Err(RecodeError::InvalidCodeQuery {
            query: "G2;".to_string(),
        });
        assert!(format_lookup("G2;", &err).starts_with("G2;: error: Invalid code query"));
    }

    #[test]
    fn test_lookup_report_json() {
        let recoder: Recoder = TABLE.parse().unwrap();
        let report = LookupReport::new(&recoder, "G20");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["recodes"], serde_json::json!(["18500", "18800"]));
        assert_eq!(json["groups"][0]["label"], "Parkinson disease");
        assert_eq!(json["groups"][0]["rules"][0]["kind"], "range");
        assert!(json.get("error").is_none());

        let report = LookupReport::new(&recoder, "");
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["error"].is_string());
    }

    #[test]
    fn test_tree_nodes() {
        let recoder: Recoder = TABLE.parse().unwrap();
        let nodes = tree_nodes(recoder.tree());
        assert_eq!(nodes.len(), 5);
        assert_eq!(nodes[0].group.label, "root");

        let json = serde_json::to_value(&nodes).unwrap();
        assert_eq!(json[1]["id"], 1);
        assert_eq!(json[1]["label"], "Diseases of the nervous system");
        assert_eq!(json[2]["recode"], "18500");
    }
}
