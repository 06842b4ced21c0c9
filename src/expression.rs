//! The central object tying chromosome, bounds, active set, evaluator,
//! mutation, and loss together (§6). An `Expression<T>` owns everything it
//! needs to evaluate and mutate itself — no shared global state, no
//! interior mutability beyond its own fields.

use std::fmt;

use tracing::debug;

use crate::active::ActiveSet;
use crate::bounds::Layout;
use crate::ensure;
use crate::error::DcgpResult;
use crate::eval;
use crate::kernel::Kernel;
use crate::loss::Loss;
use crate::mutation;
use crate::rng::Rng;
use crate::scalar::Scalar;

/// A dCGP chromosome together with the grid shape and kernel library it is
/// defined over.
pub struct Expression<T> {
    layout: Layout,
    kernels: Vec<Kernel<T>>,
    x: Vec<usize>,
    active: ActiveSet,
    rng: Rng,
}

impl<T: Scalar> Expression<T> {
    /// Builds a random valid chromosome for the given shape and kernel
    /// library (§6.1, first constructor shape).
    pub fn new(
        n: usize,
        m: usize,
        r: usize,
        c: usize,
        l: usize,
        arity: Vec<usize>,
        kernels: Vec<Kernel<T>>,
        seed: u64,
    ) -> DcgpResult<Self> {
        ensure!(!kernels.is_empty(), InvalidShape: "kernel library must be non-empty");
        let layout = Layout::new(n, m, r, c, l, arity, kernels.len())?;
        let mut rng = Rng::seeded(seed);
        let x = random_chromosome(&layout, &mut rng);
        let active = ActiveSet::derive(&layout, &x);

        debug!(n, m, r, c, l, s = layout.s(), "constructed random expression");

        Ok(Expression {
            layout,
            kernels,
            x,
            active,
            rng,
        })
    }

    /// Builds an expression from a caller-supplied chromosome (§6.1, second
    /// constructor shape), validating it against the derived layout.
    pub fn from_chromosome(
        n: usize,
        m: usize,
        r: usize,
        c: usize,
        l: usize,
        arity: Vec<usize>,
        kernels: Vec<Kernel<T>>,
        x: Vec<usize>,
        seed: u64,
    ) -> DcgpResult<Self> {
        ensure!(!kernels.is_empty(), InvalidShape: "kernel library must be non-empty");
        let layout = Layout::new(n, m, r, c, l, arity, kernels.len())?;
        layout.check_valid(&x)?;
        let active = ActiveSet::derive(&layout, &x);

        debug!(n, m, r, c, l, s = layout.s(), "constructed expression from chromosome");

        Ok(Expression {
            layout,
            kernels,
            x,
            active,
            rng: Rng::seeded(seed),
        })
    }

    // -- queries (§6.2) ---------------------------------------------------

    pub fn get(&self) -> &[usize] {
        &self.x
    }

    pub fn get_lb(&self) -> &[usize] {
        self.layout.lb()
    }

    pub fn get_ub(&self) -> &[usize] {
        self.layout.ub()
    }

    pub fn get_active_genes(&self) -> &[usize] {
        self.active.active_genes()
    }

    pub fn get_active_nodes(&self) -> &[usize] {
        self.active.active_nodes()
    }

    pub fn get_n(&self) -> usize {
        self.layout.n()
    }

    pub fn get_m(&self) -> usize {
        self.layout.m()
    }

    pub fn get_r(&self) -> usize {
        self.layout.r()
    }

    pub fn get_c(&self) -> usize {
        self.layout.c()
    }

    pub fn get_l(&self) -> usize {
        self.layout.l()
    }

    pub fn get_arity(&self) -> &[usize] {
        self.layout.arity()
    }

    pub fn get_f(&self) -> &[Kernel<T>] {
        &self.kernels
    }

    pub fn get_gene_idx(&self) -> &[usize] {
        self.layout.gene_idx()
    }

    pub fn is_active(&self, id: usize) -> bool {
        self.active.is_node_active(id)
    }

    pub fn is_valid(&self, x: &[usize]) -> bool {
        self.layout.is_valid(x)
    }

    // -- setting & mutating (§6.3) -----------------------------------------

    /// Replaces the whole chromosome, validating it against this
    /// expression's layout, and refreshes the active set.
    pub fn set(&mut self, x: Vec<usize>) -> DcgpResult<()> {
        self.layout.check_valid(&x)?;
        self.x = x;
        self.refresh_active();
        Ok(())
    }

    /// Overwrites the function gene of node `id` directly, bypassing the
    /// uniform-redraw mutation path.
    pub fn set_f_gene(&mut self, id: usize, f_id: usize) -> DcgpResult<()> {
        ensure!(
            !self.layout.is_input(id) && id < self.layout.n() + self.layout.r() * self.layout.c(),
            InvalidNode: "node id {} is not a function node", id
        );
        ensure!(
            f_id < self.kernels.len(),
            InvalidNode: "kernel id {} out of range (|F|={})", f_id, self.kernels.len()
        );
        let gene = self.layout.gene_idx()[id];
        self.x[gene] = f_id;
        self.refresh_active();
        Ok(())
    }

    pub fn seed(&mut self, s: u64) {
        self.rng.reseed(s);
    }

    pub fn mutate(&mut self, k: usize) -> DcgpResult<()> {
        mutation::mutate(&self.layout, &mut self.x, &mut self.rng, k)?;
        self.refresh_active();
        Ok(())
    }

    pub fn mutate_many(&mut self, ks: &[usize]) -> DcgpResult<()> {
        mutation::mutate_many(&self.layout, &mut self.x, &mut self.rng, ks)?;
        self.refresh_active();
        Ok(())
    }

    pub fn mutate_random(&mut self, n: usize) -> DcgpResult<()> {
        mutation::mutate_random(&self.layout, &mut self.x, &mut self.rng, n)?;
        self.refresh_active();
        Ok(())
    }

    pub fn mutate_active(&mut self, n: usize) -> DcgpResult<()> {
        mutation::mutate_active(&self.layout, &mut self.x, &mut self.rng, &self.active, n)?;
        self.refresh_active();
        Ok(())
    }

    pub fn mutate_active_fgene(&mut self, n: usize) -> DcgpResult<()> {
        mutation::mutate_active_fgene(&self.layout, &mut self.x, &mut self.rng, &self.active, n)?;
        self.refresh_active();
        Ok(())
    }

    pub fn mutate_active_cgene(&mut self, n: usize) -> DcgpResult<()> {
        mutation::mutate_active_cgene(&self.layout, &mut self.x, &mut self.rng, &self.active, n)?;
        self.refresh_active();
        Ok(())
    }

    pub fn mutate_ogene(&mut self, n: usize) -> DcgpResult<()> {
        mutation::mutate_ogene(&self.layout, &mut self.x, &mut self.rng, n)?;
        self.refresh_active();
        Ok(())
    }

    fn refresh_active(&mut self) {
        self.active = ActiveSet::derive(&self.layout, &self.x);
        debug!(
            active_nodes = self.active.active_nodes().len(),
            active_genes = self.active.active_genes().len(),
            "refreshed active set"
        );
    }

    // -- evaluation (§6.4) --------------------------------------------------

    pub fn eval(&self, point: &[T]) -> DcgpResult<Vec<T>> {
        eval::evaluate(&self.layout, &self.kernels, &self.active, &self.x, point)
    }

    pub fn eval_symbolic(&self, input_names: &[String]) -> DcgpResult<Vec<String>> {
        eval::evaluate_symbolic(&self.layout, &self.kernels, &self.active, &self.x, input_names)
    }

    /// Human-readable dump (§6.2): shape, bounds, the current chromosome,
    /// and the active gene/node sets, one per line.
    pub fn render(&self) -> String {
        format!(
            "shape: n={}, m={}, r={}, c={}, l={}\n\
             lb: {:?}\n\
             ub: {:?}\n\
             x: {:?}\n\
             active_genes: {:?}\n\
             active_nodes: {:?}",
            self.layout.n(),
            self.layout.m(),
            self.layout.r(),
            self.layout.c(),
            self.layout.l(),
            self.layout.lb(),
            self.layout.ub(),
            self.x,
            self.active.active_genes(),
            self.active.active_nodes(),
        )
    }
}

impl Expression<f64> {
    /// Single-point loss (§6.4, §4.6).
    pub fn loss(&self, kind: Loss, point: &[f64], target: &[f64]) -> DcgpResult<f64> {
        let prediction = self.eval(point)?;
        kind.point_loss(&prediction, target)
    }

    /// Batch loss over `inputs`/`targets` (§6.4, §4.6). `parallel == 0`
    /// folds sequentially; `parallel == p > 0` requires `inputs.len()` to
    /// be a multiple of `p` and reduces `p` slabs in parallel.
    pub fn loss_batch(
        &self,
        kind: Loss,
        inputs: &[Vec<f64>],
        targets: &[Vec<f64>],
        parallel: usize,
    ) -> DcgpResult<f64> {
        let result = crate::loss::loss_batch(kind, inputs, targets, parallel, |x| self.eval(x));
        debug!(kind = ?kind, samples = inputs.len(), parallel, "computed batch loss");
        result
    }
}

impl<T: Scalar> fmt::Display for Expression<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn random_chromosome(layout: &Layout, rng: &mut Rng) -> Vec<usize> {
    layout
        .lb()
        .iter()
        .zip(layout.ub().iter())
        .map(|(&lo, &hi)| rng.range_inclusive(lo, hi))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels;

    fn small_expression() -> Expression<f64> {
        Expression::new(2, 1, 1, 2, 2, vec![2, 2], kernels::default_library(), 42).unwrap()
    }

    #[test]
    fn random_construction_is_valid() {
        let expr = small_expression();
        assert!(expr.is_valid(expr.get()));
    }

    #[test]
    fn from_chromosome_rejects_bad_length() {
        let result = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![0, 0],
            0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn eval_respects_arity() {
        let expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![0, 0, 1, 2],
            0,
        )
        .unwrap();
        let out = expr.eval(&[3.0, 4.0]).unwrap();
        assert_eq!(out, vec![7.0]);
    }

    #[test]
    fn mutate_active_preserves_validity_over_many_calls() {
        let mut expr = small_expression();
        for _ in 0..1000 {
            expr.mutate_active(1).unwrap();
            assert!(expr.is_valid(expr.get()));
        }
    }

    #[test]
    fn set_f_gene_updates_active_set() {
        let mut expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![0, 0, 1, 2],
            0,
        )
        .unwrap();
        expr.set_f_gene(2, 1).unwrap(); // node id 2 -> diff
        assert_eq!(expr.get()[0], 1);
        assert!(expr.is_active(2));
    }

    #[test]
    fn mse_batch_loss_matches_manual_mean() {
        let expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![0, 0, 1, 2],
            0,
        )
        .unwrap();
        let inputs = vec![vec![1.0, 1.0], vec![2.0, 3.0]];
        let targets = vec![vec![2.0], vec![0.0]];
        // predictions: 2.0, 5.0 -> errors: 0, 25 -> mean 12.5
        let loss = expr.loss_batch(Loss::Mse, &inputs, &targets, 0).unwrap();
        assert_eq!(loss, 12.5);
    }

    #[cfg(feature = "rayon")]
    #[test]
    fn parallel_batch_loss_matches_sequential_on_expression() {
        let expr = small_expression();
        let inputs: Vec<Vec<f64>> = (0..32).map(|i| vec![i as f64, (i + 1) as f64]).collect();
        let targets: Vec<Vec<f64>> = (0..32).map(|_| vec![0.0]).collect();

        let seq = expr.loss_batch(Loss::Mse, &inputs, &targets, 0).unwrap();
        let par = expr.loss_batch(Loss::Mse, &inputs, &targets, 4).unwrap();
        assert!((seq - par).abs() < 1e-9);
    }

    #[test]
    fn render_reports_shape_bounds_chromosome_and_active_sets() {
        let expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![0, 0, 1, 2],
            0,
        )
        .unwrap();
        let rendered = expr.render();
        assert!(rendered.contains("n=2, m=1, r=1, c=1, l=1"));
        assert!(rendered.contains(&format!("{:?}", expr.get())));
        assert!(rendered.contains(&format!("{:?}", expr.get_active_nodes())));
        assert!(rendered.contains(&format!("{:?}", expr.get_active_genes())));
        assert_eq!(expr.to_string(), rendered);
    }

    #[test]
    fn eval_symbolic_still_reports_the_expression_as_a_formula() {
        let expr = Expression::<f64>::from_chromosome(
            2,
            1,
            1,
            1,
            1,
            vec![2],
            kernels::default_library(),
            vec![0, 0, 1, 2],
            0,
        )
        .unwrap();
        let names = vec!["x0".to_string(), "x1".to_string()];
        assert_eq!(expr.eval_symbolic(&names).unwrap(), vec!["(x0 + x1)"]);
    }
}
