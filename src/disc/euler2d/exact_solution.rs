use super::flux::EulerState;

/// Analytic flow used for initial data and for the far-field boundary states.
pub trait ExactSolution: Sync {
    fn state(&self, x: f64, y: f64) -> EulerState;
    fn density(&self, x: f64, y: f64) -> f64 {
        self.state(x, y).rho
    }
}

/// Constant state everywhere.
#[derive(Clone, Copy, Debug)]
pub struct UniformFlow {
    pub state: EulerState,
}
impl UniformFlow {
    pub fn new(rho: f64, u: f64, v: f64, p: f64, hcr: f64) -> Self {
        Self {
            state: EulerState::from_primitive(rho, u, v, p, hcr),
        }
    }
    /// Unit density and sound speed, moving along +x at `mach`.
    pub fn from_mach(mach: f64, hcr: f64) -> Self {
        Self::new(1.0, mach, 0.0, 1.0 / hcr, hcr)
    }
}
impl ExactSolution for UniformFlow {
    fn state(&self, _x: f64, _y: f64) -> EulerState {
        self.state
    }
}

/// Steady isentropic vortex between two concentric circles.
///
/// Density and sound speed are one on the inner radius, where the flow moves
/// at `mach`; the flow circulates clockwise about the origin.
#[derive(Clone, Copy, Debug)]
pub struct SupersonicVortex {
    pub hcr: f64,
    pub mach: f64,
    pub r_inner: f64,
}
impl ExactSolution for SupersonicVortex {
    fn state(&self, x: f64, y: f64) -> EulerState {
        let r = (x * x + y * y).sqrt();
        let gm1 = self.hcr - 1.0;
        let ratio = self.r_inner / r;
        let rho = (1.0 + 0.5 * gm1 * self.mach.powi(2) * (1.0 - ratio.powi(2))).powf(1.0 / gm1);
        let p = rho.powf(self.hcr) / self.hcr;
        let speed = self.mach * ratio;
        EulerState::from_primitive(rho, speed * y / r, -speed * x / r, p, self.hcr)
    }
}
