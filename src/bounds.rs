use crate::ensure;
use crate::error::DcgpResult;

/// Chromosome size, per-gene bounds, and the gene-index table derived from
/// `(n, m, r, c, L, arity, |F|)` (§3, §4.2). Immutable once built — shape
/// parameters never change after construction.
#[derive(Clone, Debug)]
pub struct Layout {
    n: usize,
    m: usize,
    r: usize,
    c: usize,
    l: usize,
    arity: Vec<usize>,
    lb: Vec<usize>,
    ub: Vec<usize>,
    /// `gene_idx[id]` is the chromosome position of node `id`'s function
    /// gene. Entries for input ids (`id < n`) are unused and left `0`.
    gene_idx: Vec<usize>,
}

impl Layout {
    pub fn new(
        n: usize,
        m: usize,
        r: usize,
        c: usize,
        l: usize,
        arity: Vec<usize>,
        f_len: usize,
    ) -> DcgpResult<Self> {
        ensure!(n > 0, InvalidShape: "n must be > 0");
        ensure!(m > 0, InvalidShape: "m must be > 0");
        ensure!(r > 0, InvalidShape: "r must be > 0");
        ensure!(c > 0, InvalidShape: "c must be > 0");
        ensure!(l > 0, InvalidShape: "levels-back L must be > 0");
        ensure!(f_len > 0, InvalidShape: "kernel library F must be non-empty");
        ensure!(
            arity.len() == c,
            InvalidShape: "arity has length {} but c={}",
            arity.len(),
            c
        );
        ensure!(
            arity.iter().all(|&a| a > 0),
            InvalidShape: "every column arity must be > 0, got {:?}",
            arity
        );

        let mut lb = Vec::new();
        let mut ub = Vec::new();
        let mut gene_idx = vec![0usize; n + r * c];

        for j in 0..c {
            let conn_lb = if j >= l { n + r * (j - l) } else { 0 };
            let conn_ub = n + j * r - 1;

            for i in 0..r {
                let id = n + j * r + i;
                gene_idx[id] = lb.len();

                lb.push(0);
                ub.push(f_len - 1);

                for _ in 0..arity[j] {
                    lb.push(conn_lb);
                    ub.push(conn_ub);
                }
            }
        }

        let out_lb = if l <= c { n + r * (c - l) } else { 0 };
        let out_ub = n + r * c - 1;
        for _ in 0..m {
            lb.push(out_lb);
            ub.push(out_ub);
        }

        Ok(Layout {
            n,
            m,
            r,
            c,
            l,
            arity,
            lb,
            ub,
            gene_idx,
        })
    }

    pub fn s(&self) -> usize {
        self.lb.len()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn r(&self) -> usize {
        self.r
    }

    pub fn c(&self) -> usize {
        self.c
    }

    pub fn l(&self) -> usize {
        self.l
    }

    pub fn arity(&self) -> &[usize] {
        &self.arity
    }

    pub fn lb(&self) -> &[usize] {
        &self.lb
    }

    pub fn ub(&self) -> &[usize] {
        &self.ub
    }

    pub fn gene_idx(&self) -> &[usize] {
        &self.gene_idx
    }

    pub fn is_input(&self, id: usize) -> bool {
        id < self.n
    }

    /// Column index of a function node. Undefined for input ids.
    #[inline]
    pub fn col(&self, id: usize) -> usize {
        debug_assert!(id >= self.n, "col() is only defined for function nodes");
        (id - self.n) / self.r
    }

    /// Row index of a function node. Undefined for input ids.
    #[inline]
    pub fn row(&self, id: usize) -> usize {
        debug_assert!(id >= self.n, "row() is only defined for function nodes");
        (id - self.n) % self.r
    }

    pub fn arity_of_node(&self, id: usize) -> usize {
        self.arity[self.col(id)]
    }

    pub fn output_gene_range(&self) -> std::ops::Range<usize> {
        (self.s() - self.m)..self.s()
    }

    pub fn is_valid(&self, x: &[usize]) -> bool {
        x.len() == self.s()
            && x.iter()
                .zip(self.lb.iter())
                .zip(self.ub.iter())
                .all(|((&v, &lo), &hi)| lo <= v && v <= hi)
    }

    pub fn check_valid(&self, x: &[usize]) -> DcgpResult<()> {
        ensure!(
            x.len() == self.s(),
            InvalidChromosome: "chromosome has length {} but S={}",
            x.len(),
            self.s()
        );
        for (k, ((&v, &lo), &hi)) in x.iter().zip(self.lb.iter()).zip(self.ub.iter()).enumerate() {
            ensure!(
                lo <= v && v <= hi,
                InvalidChromosome: "gene {} = {} outside bounds [{}, {}]",
                k,
                v,
                lo,
                hi
            );
        }
        Ok(())
    }
}
