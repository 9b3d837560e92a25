//! # Evaluation Kernel
//!
//! Log-linear scoring of one context against [`EvalParameters`].
//!
//! For every active predicate `p` with weight `w` and every
//! `(outcome, λ)` in its context, `score[outcome] += λ·w`. With a
//! correction constant `C > 0` each score is then divided by `C`, and a
//! non-zero correction parameter `c` adds `(1 - fired/C)·c`, where
//! `fired` counts the parameters that touched the outcome. The scores
//! are finally turned into probabilities with a softmax.

use maxent_core::params::EvalParameters;

/// Turn the log prior in `scores` into outcome probabilities
///
/// `context` holds predicate ids; ids with no parameters are skipped.
/// `values[i]` weights `context[i]` (1.0 when `values` is `None`).
/// `scores` must have `num_outcomes` entries.
///
/// # Panics
///
/// If `scores.len()` differs from `params.num_outcomes()`, or `values` is
/// shorter than `context`.
pub fn eval(
    context: &[usize],
    values: Option<&[f32]>,
    scores: &mut [f64],
    params: &EvalParameters,
) {
    let num_outcomes = params.num_outcomes();
    assert_eq!(scores.len(), num_outcomes, "one score per outcome");
    if let Some(v) = values {
        assert!(v.len() >= context.len(), "one value per context entry");
    }

    let mut fired = vec![0u32; num_outcomes];
    for (ci, &pid) in context.iter().enumerate() {
        let Some(pred) = params.parameters().get(pid) else {
            continue;
        };
        let value = values.map_or(1.0, |v| v[ci] as f64);
        for (oid, lambda) in pred.iter() {
            fired[oid] += 1;
            scores[oid] += lambda * value;
        }
    }

    let c = params.correction_constant();
    if c > 0 {
        let inverse = params.constant_inverse();
        let correction = params.correction_param();
        for (score, &n) in scores.iter_mut().zip(&fired) {
            *score *= inverse;
            if correction != 0.0 {
                *score += (1.0 - n as f64 / c as f64) * correction;
            }
        }
    }

    normalize(scores);
}

/// Softmax in place
pub fn normalize(scores: &mut [f64]) {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        // nothing sensible to rank; fall back to uniform
        let n = scores.len() as f64;
        scores.iter_mut().for_each(|s| *s = 1.0 / n);
        return;
    }

    let mut total = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        total += *s;
    }
    for s in scores.iter_mut() {
        *s /= total;
    }
}
