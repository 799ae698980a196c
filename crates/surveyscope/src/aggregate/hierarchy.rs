//! Hierarchical counts along a path of categorical fields (treemap input).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::input::SurveyTable;

/// One node of a count hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyNode {
    /// Unique id: labels along the path, each escaped, joined with `/`.
    pub id: String,
    /// Label at this level.
    pub label: String,
    /// Parent id; empty for top-level nodes.
    pub parent: String,
    /// Number of rows under this node.
    pub count: usize,
}

/// Count rows at each level of `path`, parents before children.
///
/// Rows missing any label along the path are skipped entirely so that
/// parent counts always equal the sum of their children.
pub fn hierarchy_counts(table: &SurveyTable, path: &[String]) -> Result<Vec<HierarchyNode>> {
    let indices = path
        .iter()
        .map(|field| table.require_column(field))
        .collect::<Result<Vec<_>>>()?;

    let mut nodes: IndexMap<String, HierarchyNode> = IndexMap::new();
    for row in 0..table.row_count() {
        let Some(labels) = indices
            .iter()
            .map(|&idx| table.label(row, idx))
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };

        let mut parent = String::new();
        for label in labels {
            let id = if parent.is_empty() {
                escape_label(label)
            } else {
                format!("{}/{}", parent, escape_label(label))
            };
            nodes
                .entry(id.clone())
                .or_insert_with(|| HierarchyNode {
                    id: id.clone(),
                    label: label.to_string(),
                    parent: parent.clone(),
                    count: 0,
                })
                .count += 1;
            parent = id;
        }
    }

    Ok(nodes.into_values().collect())
}

/// Escape `\` and `/` so that distinct label paths never share an id.
fn escape_label(label: &str) -> String {
    label.replace('\\', "\\\\").replace('/', "\\/")
}
