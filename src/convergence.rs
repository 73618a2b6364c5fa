//! Per-iteration convergence/divergence test with a linear-rate model.

use crate::Float;

/// Verdict of one convergence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvTest {
    /// The iteration has converged to tolerance.
    Converged,
    /// The correction norms are growing; recoverable.
    Diverged,
    /// Keep iterating.
    Continue,
}

/// Convergence monitor for one solve attempt.
///
/// Models the iteration as linearly convergent with estimated rate `conv_rate`:
/// at iteration `m > 0` the rate is updated to
/// `max(crdown * conv_rate, delnrm / delp)` and the iteration is accepted when
/// `min(conv_rate, 1) * delnrm / tol <= 1`. Divergence is declared when a
/// correction norm grows by more than `rdiv` over the previous one.
///
/// For a linearly-implicit configuration the whole test is bypassed and the
/// first check reports convergence unconditionally.
#[derive(Debug, Clone)]
pub struct ConvergenceMonitor {
    crdown: Float,
    rdiv: Float,
    linearly_implicit: bool,
    conv_rate: Float,
    delp: Float,
}

impl ConvergenceMonitor {
    /// Fresh monitor for a new solve attempt; the rate estimate starts at 1.
    pub fn new(crdown: Float, rdiv: Float, linearly_implicit: bool) -> Self {
        Self {
            crdown,
            rdiv,
            linearly_implicit,
            conv_rate: 1.0,
            delp: 0.0,
        }
    }

    /// Check the weighted norm `delnrm` of the latest correction update.
    ///
    /// `iter` is the zero-based iteration index within the attempt.
    pub fn check(&mut self, iter: usize, delnrm: Float, tol: Float) -> ConvTest {
        if self.linearly_implicit {
            return ConvTest::Converged;
        }

        if iter == 0 {
            self.conv_rate = 1.0;
        } else {
            self.conv_rate = (self.crdown * self.conv_rate).max(delnrm / self.delp);
        }

        let dcon = self.conv_rate.min(1.0) * delnrm / tol;
        if dcon <= 1.0 {
            return ConvTest::Converged;
        }
        if iter >= 1 && delnrm > self.rdiv * self.delp {
            return ConvTest::Diverged;
        }

        self.delp = delnrm;
        ConvTest::Continue
    }

    /// Current estimate of the linear convergence rate.
    pub fn rate(&self) -> Float {
        self.conv_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_iteration_resets_rate() {
        let mut m = ConvergenceMonitor::new(0.3, 2.3, false);
        assert_eq!(m.check(0, 10.0, 1e-2), ConvTest::Continue);
        assert!((m.rate() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn converges_when_dcon_below_one() {
        let mut m = ConvergenceMonitor::new(0.3, 2.3, false);
        // iter 0: rate = 1, dcon = 0.5/1.0 <= 1
        assert_eq!(m.check(0, 0.5, 1.0), ConvTest::Converged);
    }

    #[test]
    fn rate_follows_max_damped_rule() {
        let mut m = ConvergenceMonitor::new(0.3, 2.3, false);
        assert_eq!(m.check(0, 1.0, 1e-6), ConvTest::Continue);
        // delnrm/delp = 0.5 > crdown * 1 = 0.3
        assert_eq!(m.check(1, 0.5, 1e-6), ConvTest::Continue);
        assert!((m.rate() - 0.5).abs() < 1e-15);
        // delnrm/delp = 0.02 < crdown * 0.5 = 0.15
        assert_eq!(m.check(2, 0.01, 1e-6), ConvTest::Continue);
        assert!((m.rate() - 0.15).abs() < 1e-15);
    }

    #[test]
    fn divergence_is_growth_beyond_rdiv() {
        let mut m = ConvergenceMonitor::new(0.3, 2.3, false);
        assert_eq!(m.check(0, 1.0, 1e-6), ConvTest::Continue);
        assert_eq!(m.check(1, 2.4, 1e-6), ConvTest::Diverged);
    }

    #[test]
    fn growth_below_rdiv_continues() {
        let mut m = ConvergenceMonitor::new(0.3, 2.3, false);
        assert_eq!(m.check(0, 1.0, 1e-6), ConvTest::Continue);
        assert_eq!(m.check(1, 2.2, 1e-6), ConvTest::Continue);
    }

    #[test]
    fn never_diverges_on_first_iteration() {
        let mut m = ConvergenceMonitor::new(0.3, 2.3, false);
        assert_eq!(m.check(0, 1e12, 1e-6), ConvTest::Continue);
    }

    #[test]
    fn linearly_implicit_bypasses_everything() {
        let mut m = ConvergenceMonitor::new(0.3, 2.3, true);
        // Converged regardless of the injected norm sequence.
        assert_eq!(m.check(0, 1e300, 1e-12), ConvTest::Converged);
        assert_eq!(m.check(1, 1e300, 1e-12), ConvTest::Converged);
    }
}
