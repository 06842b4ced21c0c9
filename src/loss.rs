//! Loss kinds and the batch reducer (§4.6). `loss_batch`'s `parallel`
//! argument picks the execution strategy: `0` folds sequentially, `p > 0`
//! splits the batch into `p` contiguous slabs and reduces each slab's
//! partial sum into a single [`SpinLock`]-guarded total on its own rayon
//! worker — the "spin lock" wording the batch reducer calls for, literally.

use crate::dcgp_err;
use crate::ensure;
use crate::error::DcgpResult;
use crate::spinlock::SpinLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loss {
    Mse,
    Ce,
}

impl Loss {
    pub fn parse(name: &str) -> DcgpResult<Loss> {
        match name {
            "MSE" => Ok(Loss::Mse),
            "CE" => Ok(Loss::Ce),
            other => Err(dcgp_err!(UnknownLoss: "unknown loss kind '{}', expected MSE or CE", other)),
        }
    }

    /// Loss at a single point. Cross-entropy runs the prediction through a
    /// max-shifted softmax first, so an unbounded prediction vector never
    /// produces a NaN or infinite loss.
    pub fn point_loss(&self, prediction: &[f64], target: &[f64]) -> DcgpResult<f64> {
        ensure!(
            prediction.len() == target.len(),
            ShapeMismatch: "prediction has length {} but target has length {}",
            prediction.len(),
            target.len()
        );

        match self {
            Loss::Mse => {
                let sum: f64 = prediction
                    .iter()
                    .zip(target.iter())
                    .map(|(p, t)| (p - t) * (p - t))
                    .sum();
                Ok(sum / prediction.len() as f64)
            }
            Loss::Ce => {
                let probs = softmax(prediction);
                const EPS: f64 = 1e-12;
                let sum: f64 = target
                    .iter()
                    .zip(probs.iter())
                    .map(|(t, p)| t * p.max(EPS).ln())
                    .sum();
                Ok(-sum)
            }
        }
    }
}

fn softmax(prediction: &[f64]) -> Vec<f64> {
    let max = prediction.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = prediction.iter().map(|&p| (p - max).exp()).collect();
    let denom: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / denom).collect()
}

fn slab_sum<F>(kind: Loss, inputs: &[Vec<f64>], targets: &[Vec<f64>], eval: &F) -> DcgpResult<f64>
where
    F: Fn(&[f64]) -> DcgpResult<Vec<f64>> + Sync,
{
    let mut total = 0.0;
    for (x, y) in inputs.iter().zip(targets.iter()) {
        total += kind.point_loss(&eval(x)?, y)?;
    }
    Ok(total)
}

/// Batch loss over `inputs`/`targets`, the mean of the per-sample loss.
///
/// `parallel == 0` folds sequentially. `parallel == p > 0` requires
/// `inputs.len()` to be a multiple of `p`, divides the batch into `p`
/// contiguous slabs, evaluates each slab's partial sum on its own rayon
/// worker, and accumulates the slab totals into one spin-locked
/// accumulator before dividing by the batch size.
pub fn loss_batch<F>(
    kind: Loss,
    inputs: &[Vec<f64>],
    targets: &[Vec<f64>],
    parallel: usize,
    eval: F,
) -> DcgpResult<f64>
where
    F: Fn(&[f64]) -> DcgpResult<Vec<f64>> + Sync,
{
    ensure!(
        !inputs.is_empty(),
        InvalidBatch: "batch must contain at least one sample"
    );
    ensure!(
        inputs.len() == targets.len(),
        InvalidBatch: "inputs has {} samples but targets has {}",
        inputs.len(),
        targets.len()
    );

    let len = inputs.len();

    if parallel == 0 {
        return Ok(slab_sum(kind, inputs, targets, &eval)? / len as f64);
    }

    ensure!(
        len % parallel == 0,
        InvalidBatch: "batch size {} is not a multiple of parallel={}",
        len,
        parallel
    );

    #[cfg(feature = "rayon")]
    {
        let slab_len = len / parallel;
        let total = SpinLock::new(0.0_f64);
        let first_err: SpinLock<Option<crate::error::DcgpError>> = SpinLock::new(None);

        rayon::scope(|scope| {
            for s in 0..parallel {
                let lo = s * slab_len;
                let hi = lo + slab_len;
                let input_slab = &inputs[lo..hi];
                let target_slab = &targets[lo..hi];
                let eval = &eval;
                let total = &total;
                let first_err = &first_err;

                scope.spawn(move |_| match slab_sum(kind, input_slab, target_slab, eval) {
                    Ok(partial) => total.with_lock(|t| *t += partial),
                    Err(e) => first_err.with_lock(|slot| {
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                    }),
                });
            }
        });

        if let Some(e) = first_err.into_inner() {
            return Err(e);
        }

        Ok(total.into_inner() / len as f64)
    }

    #[cfg(not(feature = "rayon"))]
    {
        Err(dcgp_err!(InvalidBatch: "parallel batch loss requires the 'rayon' feature"))
    }
}
