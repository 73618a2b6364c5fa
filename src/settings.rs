//! Settings for the stage solve engine.

use bon::Builder;

use crate::{
    Float,
    context::{MassKind, SolverCategory},
    error::Error,
};

/// Tunables of the stage solve engine.
///
/// The numeric constants are configuration with documented reference
/// defaults, not hard-coded magic numbers.
#[derive(Builder, Clone, Debug)]
pub struct Settings {
    /// Damping constant of the linear convergence-rate estimate. Default 0.3.
    #[builder(default = 0.3)]
    pub crdown: Float,
    /// Divergence-growth threshold: the iteration is declared diverged when a
    /// correction norm exceeds `rdiv` times the previous one. Default 2.3.
    #[builder(default = 2.3)]
    pub rdiv: Float,
    /// Gamma drift tolerance: a setup is forced when `|gamma/gammap - 1|`
    /// exceeds this value. Default 0.2.
    #[builder(default = 0.2)]
    pub dgmax: Float,
    /// Maximum number of steps between linear-solver setups. Zero or a
    /// negative value forces a setup on every attempt. Default 20.
    #[builder(default = 20)]
    pub msbp: i32,
    /// The implicit right-hand side is exactly linear in the unknown: one
    /// linear solve is exact and the convergence test is bypassed.
    #[builder(default = false)]
    pub linearly_implicit: bool,
    /// Kind of mass matrix. Default identity.
    #[builder(default = MassKind::Identity)]
    pub mass_kind: MassKind,
    /// Nonlinear solver category. Default root-finding.
    #[builder(default = SolverCategory::RootFinding)]
    pub category: SolverCategory,
}

impl Settings {
    /// Validate the tunables, collecting every violation.
    pub fn validate(&self) -> Vec<Error> {
        let mut errors = Vec::new();
        if !(self.crdown > 0.0 && self.crdown < 1.0) {
            errors.push(Error::CrdownOutOfRange(self.crdown));
        }
        if !(self.rdiv > 1.0) {
            errors.push(Error::RdivOutOfRange(self.rdiv));
        }
        if !(self.dgmax > 0.0) {
            errors.push(Error::DgmaxOutOfRange(self.dgmax));
        }
        errors
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::builder().build()
    }
}
