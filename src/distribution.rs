//! Probability maps and the pure helpers that build them.

use std::collections::BTreeMap;

/// Probability per key. Sums to 1 over its domain.
pub type Distribution<K> = BTreeMap<K, f64>;

/// Dirichlet pseudo-counts per key.
pub type Alpha<K> = BTreeMap<K, f64>;

/// Observed counts per key.
pub type Counts<K> = BTreeMap<K, u64>;

/// Uniform distribution over `keys`. Empty in, empty out.
pub fn uniform<K: Ord + Clone>(keys: &[K]) -> Distribution<K> {
    if keys.is_empty() {
        return Distribution::new();
    }
    let p = 1.0 / keys.len() as f64;
    keys.iter().map(|k| (k.clone(), p)).collect()
}

/// Additive smoothing over a fixed vocabulary.
///
/// `(count + alpha) / sum(count + alpha)`; uniform if the total is not positive.
pub fn laplace<K: Ord + Clone>(counts: &Counts<K>, vocabulary: &[K], alpha: f64) -> Distribution<K> {
    let total: f64 = vocabulary
        .iter()
        .map(|k| counts.get(k).copied().unwrap_or(0) as f64 + alpha)
        .sum();
    if total <= 0.0 {
        return uniform(vocabulary);
    }
    vocabulary
        .iter()
        .map(|k| {
            let c = counts.get(k).copied().unwrap_or(0) as f64;
            (k.clone(), (c + alpha) / total)
        })
        .collect()
}

/// Per-key convex combination `(1 - w) * a + w * b` over `vocabulary`.
pub fn blend<K: Ord + Clone>(
    a: &Distribution<K>,
    b: &Distribution<K>,
    w: f64,
    vocabulary: &[K],
) -> Distribution<K> {
    let w = w.clamp(0.0, 1.0);
    vocabulary
        .iter()
        .map(|k| {
            let pa = a.get(k).copied().unwrap_or(0.0);
            let pb = b.get(k).copied().unwrap_or(0.0);
            (k.clone(), (1.0 - w) * pa + w * pb)
        })
        .collect()
}

/// Sum of all probabilities.
pub fn total<K>(dist: &Distribution<K>) -> f64 {
    dist.values().sum()
}

/// Key with the highest probability; ties go to the earliest key.
pub fn mode<K: Clone>(dist: &Distribution<K>) -> Option<K> {
    let mut best: Option<(&K, f64)> = None;
    for (k, &p) in dist {
        if best.map_or(true, |(_, bp)| p > bp) {
            best = Some((k, p));
        }
    }
    best.map(|(k, _)| k.clone())
}
