//! Reductions over an expansion tree.

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::ExpansionNode;

/// Base-material totals keyed by item name, in first-seen order.
pub type Totals = IndexMap<String, u64>;

/// Sums `actual_qty` over every base-material leaf of the tree.
///
/// Crafted nodes contribute only through their leaves, so an item needed in
/// several branches is totalled across all of them. A crafted item whose
/// recipe has no ingredients is a leaf too, but it has a recipe and is left
/// out.
pub fn flatten_to_totals(node: &ExpansionNode) -> Totals {
    let mut totals = Totals::new();
    collect_totals(node, &mut totals);
    totals
}

fn collect_totals(node: &ExpansionNode, totals: &mut Totals) {
    if node.is_base() {
        let entry = totals.entry(node.name.clone()).or_default();
        *entry = entry.saturating_add(node.actual_qty);
        return;
    }
    for child in &node.children {
        collect_totals(child, totals);
    }
}

/// Sum of every node's own crafting time, assuming crafts run one after another.
///
/// This is an upper bound; crafts that could run in parallel are not overlapped.
pub fn total_crafting_time(node: &ExpansionNode) -> f64 {
    node.crafting_time_total + node.children.iter().map(total_crafting_time).sum::<f64>()
}

/// A finished calculation: the breakdown tree and both reductions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calculation {
    /// Full breakdown of crafts
    pub tree: ExpansionNode,
    /// Base materials required
    pub totals: Totals,
    /// Sequential crafting time in hours
    pub total_crafting_time: f64,
}

impl Calculation {
    /// Computes both reductions for `tree`.
    pub fn from_tree(tree: ExpansionNode) -> Self {
        let totals = flatten_to_totals(&tree);
        let total_crafting_time = total_crafting_time(&tree);
        Self {
            tree,
            totals,
            total_crafting_time,
        }
    }
}
