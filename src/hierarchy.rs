//! Rule hierarchy export.
//!
//! A strictly read-only consumer of a finished grammar: arranges the rules
//! as a tree by reference, renders it as Graphviz DOT, and optionally
//! shells out to `dot` for an image. Nothing here feeds back into
//! compression, and a missing Graphviz install degrades to a warning.

use crate::error::Result;
use crate::repair::Repair;
use crate::symbol::SymbolId;
use ahash::AHashMap as HashMap;
use std::fmt;
use std::fs;
use std::hash::Hash;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::warn;

/// Parent/child tree over the rules of a grammar.
///
/// Each rule hangs under the rule behind the first non-terminal of its
/// pair, or under the synthetic root when its pair is all terminals. Labels
/// carry the rule name and its full terminal expansion.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    /// Node 0 is the root; rules follow in creation order.
    nodes: Vec<HierarchyNode>,
}

#[derive(Debug, Clone)]
struct HierarchyNode {
    label: String,
    children: Vec<usize>,
}

impl<T: Hash + Eq + Clone + fmt::Display> Repair<T> {
    /// Builds the rule hierarchy for this grammar.
    pub fn hierarchy(&self) -> Result<Hierarchy> {
        let phrases = self.expanded_phrases()?;

        let mut nodes = vec![HierarchyNode {
            label: "root".to_string(),
            children: Vec::new(),
        }];
        let mut slot_of: HashMap<SymbolId, usize> = HashMap::default();

        for (rule, (id, phrase)) in self.rules().iter().zip(phrases) {
            debug_assert_eq!(rule.id, id);
            let slot = nodes.len();
            nodes.push(HierarchyNode {
                label: format!("R{}: {}", rule.id, phrase),
                children: Vec::new(),
            });

            let parent = match [rule.left, rule.right]
                .into_iter()
                .find(|&side| !self.table().is_terminal(side))
            {
                Some(reference) => *slot_of
                    .get(&reference)
                    .expect("a referenced rule is always minted before its user"),
                None => 0,
            };
            nodes[parent].children.push(slot);
            slot_of.insert(rule.id, slot);
        }

        Ok(Hierarchy { nodes })
    }
}

impl Hierarchy {
    /// Number of rules in the tree, excluding the synthetic root.
    pub fn rule_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Renders the tree as a Graphviz digraph, one edge per parent/child
    /// link, in creation order.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph hierarchy {\n");
        for node in &self.nodes {
            for &child in &node.children {
                out.push_str(&format!(
                    "\"{}\" -> \"{}\";\n",
                    escape(&node.label),
                    escape(&self.nodes[child].label)
                ));
            }
        }
        out.push_str("}\n");
        out
    }

    /// Writes the DOT rendering to `path`.
    pub fn write_dot(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_dot())
    }

    /// Writes the DOT rendering to `dot_path` and rasterizes it to
    /// `png_path`. Returns whether the image was produced.
    pub fn export(&self, dot_path: &Path, png_path: &Path) -> io::Result<bool> {
        self.write_dot(dot_path)?;
        render_png(dot_path, png_path)
    }
}

/// Rasterizes a DOT file to PNG with the Graphviz `dot` binary.
///
/// A missing binary or a failed render only logs a warning and returns
/// `Ok(false)`; the grammar and its DOT rendering are unaffected.
pub fn render_png(dot_path: &Path, png_path: &Path) -> io::Result<bool> {
    let status = match Command::new("dot")
        .arg("-Tpng")
        .arg(dot_path)
        .arg("-o")
        .arg(png_path)
        .status()
    {
        Ok(status) => status,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(target: "repair", "graphviz `dot` not found, skipping image export");
            return Ok(false);
        }
        Err(err) => return Err(err),
    };

    if status.success() {
        Ok(true)
    } else {
        warn!(target: "repair", %status, "graphviz `dot` failed, skipping image export");
        Ok(false)
    }
}

/// Escapes a label for use inside a double-quoted DOT string.
fn escape(label: &str) -> String {
    label.replace('\\', "\\\\").replace('"', "\\\"")
}
