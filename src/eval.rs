//! Numeric and symbolic evaluation over the active subgraph (§4.4). Both
//! walk the same `active_nodes` order into a scratch array of length
//! `n + r*c`, differing only in the value domain and in where each value
//! comes from (a point's coordinates vs. free-form input names).
//! `active_nodes` can include input ids directly (an output may select an
//! input with no function node in between), so both loops skip them —
//! their scratch slots are already seeded from the point/input names.

use crate::active::ActiveSet;
use crate::bounds::Layout;
use crate::dcgp_err;
use crate::error::DcgpResult;
use crate::ensure;
use crate::kernel::Kernel;
use crate::scalar::Scalar;

fn kernel_for<'a, T>(kernels: &'a [Kernel<T>], f_id: usize) -> DcgpResult<&'a Kernel<T>> {
    kernels
        .get(f_id)
        .ok_or_else(|| dcgp_err!(InvalidNode: "kernel id {} out of range (|F|={})", f_id, kernels.len()))
}

/// Evaluates the active subgraph at one input point, returning the `m`
/// output values in output-gene order.
pub fn evaluate<T: Scalar>(
    layout: &Layout,
    kernels: &[Kernel<T>],
    active: &ActiveSet,
    x: &[usize],
    point: &[T],
) -> DcgpResult<Vec<T>> {
    ensure!(
        point.len() == layout.n(),
        ShapeMismatch: "point has length {} but n={}",
        point.len(),
        layout.n()
    );

    let mut scratch: Vec<T> = vec![T::zero(); layout.n() + layout.r() * layout.c()];
    scratch[..layout.n()].clone_from_slice(point);

    let mut args: Vec<T> = Vec::new();
    for &id in active.active_nodes() {
        if layout.is_input(id) {
            continue;
        }
        let gene = layout.gene_idx()[id];
        let f_id = x[gene];
        let arity = layout.arity_of_node(id);

        args.clear();
        for k in 0..arity {
            let src = x[gene + 1 + k];
            args.push(scratch[src].clone());
        }

        scratch[id] = kernel_for(kernels, f_id)?.apply(&args);
    }

    let mut out = Vec::with_capacity(layout.m());
    for out_idx in layout.output_gene_range() {
        out.push(scratch[x[out_idx]].clone());
    }
    Ok(out)
}

/// Symbolic counterpart of [`evaluate`]: produces one pretty-printed
/// expression string per output, reading each input's name from
/// `input_names` instead of a numeric point.
pub fn evaluate_symbolic<T>(
    layout: &Layout,
    kernels: &[Kernel<T>],
    active: &ActiveSet,
    x: &[usize],
    input_names: &[String],
) -> DcgpResult<Vec<String>> {
    ensure!(
        input_names.len() == layout.n(),
        ShapeMismatch: "input_names has length {} but n={}",
        input_names.len(),
        layout.n()
    );

    let mut scratch: Vec<String> = vec![String::new(); layout.n() + layout.r() * layout.c()];
    scratch[..layout.n()].clone_from_slice(input_names);

    let mut args: Vec<String> = Vec::new();
    for &id in active.active_nodes() {
        if layout.is_input(id) {
            continue;
        }
        let gene = layout.gene_idx()[id];
        let f_id = x[gene];
        let arity = layout.arity_of_node(id);

        args.clear();
        for k in 0..arity {
            let src = x[gene + 1 + k];
            args.push(scratch[src].clone());
        }

        scratch[id] = kernel_for(kernels, f_id)?.apply_symbolic(&args);
    }

    let mut out = Vec::with_capacity(layout.m());
    for out_idx in layout.output_gene_range() {
        out.push(scratch[x[out_idx]].clone());
    }
    Ok(out)
}
