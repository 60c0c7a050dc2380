//! Iterative endpoint refinement.
//!
//! Each candidate is improved by alternating a least-squares re-fit of its endpoints against the
//! current indices with a steepest-descent round over neighboring grid endpoints. A step is only
//! taken if it strictly lowers the error, and the sequence of steps depends on nothing but the
//! starting solution. Raising the step budget therefore only ever extends the sequence.

/// Result of scoring one endpoint pair.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Solution<E> {
    pub(crate) endpoints: E,
    pub(crate) indices: [u8; 16],
    pub(crate) error: u64,
}

impl<E> Solution<E> {
    /// Returns the solution with the lower error, keeping `self` on ties.
    pub(crate) fn better(self, other: Self) -> Self {
        if other.error < self.error {
            other
        } else {
            self
        }
    }
}

/// An endpoint search problem of one block.
pub(crate) trait Fit {
    type Endpoints: Copy + PartialEq;

    /// Scores an endpoint pair. `None` if the pair cannot encode the block.
    fn evaluate(&self, endpoints: Self::Endpoints) -> Option<Solution<Self::Endpoints>>;

    /// Least-squares endpoints for the indices of `solution`.
    fn refit(&self, solution: &Solution<Self::Endpoints>) -> Self::Endpoints;

    /// Calls `visit` with every endpoint pair one grid step away from `endpoints`.
    fn for_each_neighbor(&self, endpoints: Self::Endpoints, visit: &mut dyn FnMut(Self::Endpoints));
}

/// Improves `start` with at most `steps` accepted steps.
pub(crate) fn refine<F: Fit>(
    fit: &F,
    start: Solution<F::Endpoints>,
    steps: u32,
    perturb: bool,
) -> Solution<F::Endpoints> {
    let mut current = start;

    for _ in 0..steps {
        if let Some(next) = refit_step(fit, &current) {
            current = next;
            continue;
        }

        if !perturb {
            break;
        }

        match perturb_step(fit, &current) {
            Some(next) => current = next,
            None => break,
        }
    }

    current
}

fn refit_step<F: Fit>(
    fit: &F,
    current: &Solution<F::Endpoints>,
) -> Option<Solution<F::Endpoints>> {
    let endpoints = fit.refit(current);
    if endpoints == current.endpoints {
        return None;
    }

    fit.evaluate(endpoints).filter(|next| next.error < current.error)
}

fn perturb_step<F: Fit>(
    fit: &F,
    current: &Solution<F::Endpoints>,
) -> Option<Solution<F::Endpoints>> {
    let mut best: Option<Solution<F::Endpoints>> = None;

    fit.for_each_neighbor(current.endpoints, &mut |endpoints| {
        if let Some(next) = fit.evaluate(endpoints) {
            let threshold = best.map_or(current.error, |best| best.error);
            if next.error < threshold {
                best = Some(next);
            }
        }
    });

    best
}

/// Solves the least-squares problem `min Σ |(1 - t) a + t b - p|²` for the endpoints `a` and `b`.
///
/// Each sample is given as its interpolation weight `t` and its channel values. Falls back to
/// the mean of the samples if the system is singular, which happens when all weights are equal.
pub(crate) fn least_squares<const N: usize>(
    samples: impl Iterator<Item = (f32, [f32; N])>,
) -> Option<([f32; N], [f32; N])> {
    let mut aa = 0.0f32;
    let mut ab = 0.0f32;
    let mut bb = 0.0f32;
    let mut rhs_a = [0.0f32; N];
    let mut rhs_b = [0.0f32; N];
    let mut sum = [0.0f32; N];
    let mut count = 0.0f32;

    for (t, values) in samples {
        let s = 1.0 - t;
        aa += s * s;
        ab += s * t;
        bb += t * t;
        for channel in 0..N {
            rhs_a[channel] += s * values[channel];
            rhs_b[channel] += t * values[channel];
            sum[channel] += values[channel];
        }
        count += 1.0;
    }

    if count == 0.0 {
        return None;
    }

    let det = aa * bb - ab * ab;
    if det.abs() < 1e-3 {
        let mean = sum.map(|value| value / count);
        return Some((mean, mean));
    }

    let rdet = det.recip();
    let mut a = [0.0f32; N];
    let mut b = [0.0f32; N];
    for channel in 0..N {
        a[channel] = (rhs_a[channel] * bb - rhs_b[channel] * ab) * rdet;
        b[channel] = (rhs_b[channel] * aa - rhs_a[channel] * ab) * rdet;
    }

    Some((a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_recovers_exact_line() {
        let samples = [(0.0, [10.0]), (1.0, [70.0]), (0.5, [40.0]), (0.5, [40.0])];
        let (a, b) = least_squares(samples.into_iter()).unwrap();
        assert!((a[0] - 10.0).abs() < 1e-3);
        assert!((b[0] - 70.0).abs() < 1e-3);
    }

    #[test]
    fn least_squares_singular_falls_back_to_mean() {
        let samples = [(0.0, [10.0, 0.0]), (0.0, [30.0, 4.0])];
        let (a, b) = least_squares(samples.into_iter()).unwrap();
        assert_eq!(a, [20.0, 2.0]);
        assert_eq!(b, [20.0, 2.0]);
    }

    /// Scalar toy problem: one value encoded as the pair sum.
    struct Target(u8);

    impl Fit for Target {
        type Endpoints = (u8, u8);

        fn evaluate(&self, endpoints: (u8, u8)) -> Option<Solution<(u8, u8)>> {
            let value = endpoints.0 as i64 + endpoints.1 as i64;
            Some(Solution {
                endpoints,
                indices: [0; 16],
                error: (value - self.0 as i64).unsigned_abs(),
            })
        }

        fn refit(&self, solution: &Solution<(u8, u8)>) -> (u8, u8) {
            solution.endpoints
        }

        fn for_each_neighbor(&self, endpoints: (u8, u8), visit: &mut dyn FnMut((u8, u8))) {
            visit((endpoints.0.saturating_add(1), endpoints.1));
            visit((endpoints.0.saturating_sub(1), endpoints.1));
        }
    }

    #[test]
    fn refine_never_regresses_and_respects_budget() {
        let fit = Target(10);
        let start = fit.evaluate((0, 0)).unwrap();

        assert_eq!(refine(&fit, start, 0, true), start);
        assert_eq!(refine(&fit, start, 4, false), start);
        assert_eq!(refine(&fit, start, 4, true).error, 6);
        assert_eq!(refine(&fit, start, 100, true).error, 0);
    }
}
