//! Optimistic exploration and the shared convergence criterion.

/// Exploration-adjusted estimate for a state-action pair.
///
/// Returns the raw `estimate` once the pair has been visited at least
/// `minimum_exploration_count` times; before that it returns the fixed
/// `optimistic` constant, biasing policies toward under-explored pairs.
pub fn exploration_value(
    estimate: f64,
    visits: u32,
    minimum_exploration_count: u32,
    optimistic: f64,
) -> f64 {
    if visits >= minimum_exploration_count {
        estimate
    } else {
        optimistic
    }
}

/// Max-norm contraction bound for discounted iterative updates.
///
/// Converged when `delta < tolerance * (1 - discount) / discount`. The bound
/// degenerates for discount factors of 0 or 1; a non-finite threshold counts
/// as "not yet converged" unless `delta` itself is non-finite, in which case
/// the iteration has numerically blown up and is reported as converged so
/// callers do not loop forever. That shortcut can mask true non-convergence;
/// callers wanting a hard guarantee must bound their iteration count.
pub fn converged(delta: f64, tolerance: f64, discount_factor: f64) -> bool {
    if !delta.is_finite() {
        return true;
    }
    let threshold = tolerance * (1.0 - discount_factor) / discount_factor;
    if !threshold.is_finite() {
        return false;
    }
    delta < threshold
}
