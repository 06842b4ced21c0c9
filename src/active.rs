//! Active-subgraph derivation (§4.3): a back-wave traversal from the output
//! genes that marks exactly the nodes a changed gene can possibly affect.
//! Mirrors the pre-computed `eval_order` idea in graph evaluation — the set
//! is derived once and reused by every evaluation and loss call until the
//! chromosome changes again.

use crate::bounds::Layout;
use std::collections::BTreeSet;

/// The active node ids and active gene indices derived from a chromosome,
/// kept in ascending order. Because every connection gene can only point at
/// an earlier column or an input, `active_nodes` is already a valid
/// evaluation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActiveSet {
    active_nodes: Vec<usize>,
    active_genes: Vec<usize>,
}

impl ActiveSet {
    pub fn active_nodes(&self) -> &[usize] {
        &self.active_nodes
    }

    pub fn active_genes(&self) -> &[usize] {
        &self.active_genes
    }

    pub fn is_node_active(&self, id: usize) -> bool {
        self.active_nodes.binary_search(&id).is_ok()
    }

    pub fn is_gene_active(&self, gene: usize) -> bool {
        self.active_genes.binary_search(&gene).is_ok()
    }

    /// Walks backward from the output genes, marking every node (input or
    /// function) reachable through connection genes, then collects the gene
    /// indices the function nodes among them (and the outputs themselves)
    /// occupy. Inputs join `active_nodes` like any other reachable node —
    /// they just contribute no genes of their own, since they have none.
    pub fn derive(layout: &Layout, x: &[usize]) -> ActiveSet {
        let mut visited_nodes: BTreeSet<usize> = BTreeSet::new();
        let mut frontier: Vec<usize> = Vec::new();

        for out_idx in layout.output_gene_range() {
            frontier.push(x[out_idx]);
        }

        while let Some(id) = frontier.pop() {
            if !visited_nodes.insert(id) {
                continue;
            }
            if layout.is_input(id) {
                continue;
            }

            let gene = layout.gene_idx()[id];
            let arity = layout.arity_of_node(id);
            for k in 0..arity {
                frontier.push(x[gene + 1 + k]);
            }
        }

        let active_nodes: Vec<usize> = visited_nodes.into_iter().collect();

        let mut active_genes: BTreeSet<usize> = BTreeSet::new();
        for &id in &active_nodes {
            if layout.is_input(id) {
                continue;
            }
            let gene = layout.gene_idx()[id];
            let arity = layout.arity_of_node(id);
            for k in 0..=arity {
                active_genes.insert(gene + k);
            }
        }
        for out_idx in layout.output_gene_range() {
            active_genes.insert(out_idx);
        }

        ActiveSet {
            active_nodes,
            active_genes: active_genes.into_iter().collect(),
        }
    }
}
