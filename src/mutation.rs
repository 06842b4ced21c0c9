//! Mutation operators (§4.5). Every operator bottoms out in [`mutate_gene`],
//! which redraws a single gene uniformly from its bound range excluding its
//! current value — a mutation that could not possibly change anything is a
//! no-op, never a wasted draw that silently keeps the old value.
//!
//! None of these operators refresh the active set themselves; recomputing
//! it is cheap only relative to evaluation, not free, so the caller decides
//! when to pay for it (here: always, after any mutating call — see
//! `Expression`'s always-refresh policy).

use crate::active::ActiveSet;
use crate::bounds::Layout;
use crate::ensure;
use crate::error::DcgpResult;
use crate::rng::Rng;

/// Redraws gene `k` to a new value in `[lb[k], ub[k]]`, excluding its
/// current value. A gene whose bounds collapse to a single value (`lb ==
/// ub`) has nothing else to become and is left untouched.
pub fn mutate_gene(layout: &Layout, x: &mut [usize], rng: &mut Rng, k: usize) -> DcgpResult<()> {
    ensure!(
        k < layout.s(),
        InvalidIndex: "gene index {} out of range (S={})",
        k,
        layout.s()
    );

    let lo = layout.lb()[k];
    let hi = layout.ub()[k];
    if lo == hi {
        return Ok(());
    }

    x[k] = rng.range_excluding(lo, hi, x[k]);
    Ok(())
}

/// Mutates exactly gene `k`.
pub fn mutate(layout: &Layout, x: &mut [usize], rng: &mut Rng, k: usize) -> DcgpResult<()> {
    mutate_gene(layout, x, rng, k)
}

/// Mutates exactly the gene indices in `ks`, in order.
pub fn mutate_many(layout: &Layout, x: &mut [usize], rng: &mut Rng, ks: &[usize]) -> DcgpResult<()> {
    for &k in ks {
        mutate_gene(layout, x, rng, k)?;
    }
    Ok(())
}

fn mutate_from_pool(
    layout: &Layout,
    x: &mut [usize],
    rng: &mut Rng,
    pool: &[usize],
    n: usize,
) -> DcgpResult<()> {
    ensure!(!pool.is_empty(), InvalidIndex: "no candidate genes to mutate from");
    for _ in 0..n {
        let k = pool[rng.index(pool.len())];
        mutate_gene(layout, x, rng, k)?;
    }
    Ok(())
}

/// Mutates `n` genes drawn (with replacement) from the whole chromosome.
pub fn mutate_random(layout: &Layout, x: &mut [usize], rng: &mut Rng, n: usize) -> DcgpResult<()> {
    for _ in 0..n {
        let k = rng.index(layout.s());
        mutate_gene(layout, x, rng, k)?;
    }
    Ok(())
}

/// Mutates `n` genes drawn (with replacement) from the currently active
/// genes only — function, connection, and output genes alike.
pub fn mutate_active(
    layout: &Layout,
    x: &mut [usize],
    rng: &mut Rng,
    active: &ActiveSet,
    n: usize,
) -> DcgpResult<()> {
    mutate_from_pool(layout, x, rng, active.active_genes(), n)
}

/// Mutates `n` function genes drawn (with replacement) from the active
/// nodes only.
pub fn mutate_active_fgene(
    layout: &Layout,
    x: &mut [usize],
    rng: &mut Rng,
    active: &ActiveSet,
    n: usize,
) -> DcgpResult<()> {
    let pool: Vec<usize> = active
        .active_nodes()
        .iter()
        .filter(|&&id| !layout.is_input(id))
        .map(|&id| layout.gene_idx()[id])
        .collect();
    mutate_from_pool(layout, x, rng, &pool, n)
}

/// Mutates `n` connection genes drawn (with replacement) from the active
/// nodes only.
pub fn mutate_active_cgene(
    layout: &Layout,
    x: &mut [usize],
    rng: &mut Rng,
    active: &ActiveSet,
    n: usize,
) -> DcgpResult<()> {
    let pool: Vec<usize> = active
        .active_nodes()
        .iter()
        .filter(|&&id| !layout.is_input(id))
        .flat_map(|&id| {
            let gene = layout.gene_idx()[id];
            let arity = layout.arity_of_node(id);
            (1..=arity).map(move |k| gene + k)
        })
        .collect();
    mutate_from_pool(layout, x, rng, &pool, n)
}

/// Mutates `n` output genes drawn (with replacement) from all `m` of them.
pub fn mutate_ogene(layout: &Layout, x: &mut [usize], rng: &mut Rng, n: usize) -> DcgpResult<()> {
    let pool: Vec<usize> = layout.output_gene_range().collect();
    mutate_from_pool(layout, x, rng, &pool, n)
}
