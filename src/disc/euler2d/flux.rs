use crate::disc::diagnostics::FloorDiagnostics;

pub const PRESSURE_FLOOR: f64 = 1.0e-4;

/// Pointwise state with primitive velocities and conserved total energy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerState {
    pub rho: f64,
    pub u: f64,
    pub v: f64,
    pub energy: f64,
}
impl EulerState {
    /// From `[rho, rho u, rho v, E]`.
    pub fn from_conserved(q: [f64; 4]) -> Self {
        Self {
            rho: q[0],
            u: q[1] / q[0],
            v: q[2] / q[0],
            energy: q[3],
        }
    }
    pub fn from_primitive(rho: f64, u: f64, v: f64, p: f64, hcr: f64) -> Self {
        Self {
            rho,
            u,
            v,
            energy: p / (hcr - 1.0) + 0.5 * rho * (u * u + v * v),
        }
    }
    pub fn conserved(&self) -> [f64; 4] {
        [self.rho, self.rho * self.u, self.rho * self.v, self.energy]
    }
    pub fn raw_pressure(&self, hcr: f64) -> f64 {
        (hcr - 1.0) * (self.energy - 0.5 * self.rho * (self.u * self.u + self.v * self.v))
    }
    /// Ideal-gas pressure clamped to [`PRESSURE_FLOOR`].
    pub fn pressure(&self, hcr: f64, diag: &FloorDiagnostics) -> f64 {
        let p = self.raw_pressure(hcr);
        if p < 0.0 {
            diag.record_pressure();
            PRESSURE_FLOOR
        } else {
            p
        }
    }
    pub fn sound_speed(&self, p: f64, hcr: f64) -> f64 {
        (hcr * p / self.rho).sqrt()
    }
    pub fn speed(&self) -> f64 {
        (self.u * self.u + self.v * self.v).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EulerFlux {
    pub x: [f64; 4],
    pub y: [f64; 4],
}
impl EulerFlux {
    /// `F · n`
    pub fn normal(&self, n: [f64; 2]) -> [f64; 4] {
        std::array::from_fn(|k| self.x[k] * n[0] + self.y[k] * n[1])
    }
}

pub fn flux2d(state: &EulerState, p: f64) -> EulerFlux {
    let EulerState { rho, u, v, energy } = *state;
    EulerFlux {
        x: [rho * u, rho * u * u + p, rho * u * v, u * (energy + p)],
        y: [rho * v, rho * u * v, rho * v * v + p, v * (energy + p)],
    }
}
