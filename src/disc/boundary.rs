use crate::disc::{
    euler2d::{exact_solution::ExactSolution, flux::EulerState},
    mesh::mesh2d::MeshError,
};

/// Physical boundary model attached to a mesh side without a right element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryType {
    Reflecting,
    Outflow,
    Inflow,
}
impl BoundaryType {
    /// Decodes the negative neighbor ids of legacy side tables.
    pub fn from_sentinel(value: i64) -> Result<Self, MeshError> {
        match value {
            -1 => Ok(BoundaryType::Reflecting),
            -2 => Ok(BoundaryType::Outflow),
            -3 => Ok(BoundaryType::Inflow),
            _ => Err(MeshError::InvalidSentinel(value)),
        }
    }
    pub fn sentinel(self) -> i64 {
        match self {
            BoundaryType::Reflecting => -1,
            BoundaryType::Outflow => -2,
            BoundaryType::Inflow => -3,
        }
    }
    /// Exterior trace state for a boundary side.
    ///
    /// `normal` is the outward unit normal and `point` the physical location of
    /// the trace point.
    pub fn exterior_state(
        self,
        interior: &EulerState,
        normal: [f64; 2],
        point: [f64; 2],
        exact: &dyn ExactSolution,
    ) -> EulerState {
        match self {
            BoundaryType::Reflecting => {
                let un = interior.u * normal[0] + interior.v * normal[1];
                EulerState {
                    rho: interior.rho,
                    u: interior.u - 2.0 * un * normal[0],
                    v: interior.v - 2.0 * un * normal[1],
                    energy: interior.energy,
                }
            }
            // TODO: characteristic outflow treatment instead of imposing the exact state
            BoundaryType::Outflow | BoundaryType::Inflow => exact.state(point[0], point[1]),
        }
    }
}

/// Sides of an axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryPosition {
    Lower,
    Right,
    Upper,
    Left,
}
impl BoundaryPosition {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::euler2d::exact_solution::UniformFlow;
    use approx::assert_relative_eq;

    #[test]
    fn test_sentinel_roundtrip() {
        for bnd in [
            BoundaryType::Reflecting,
            BoundaryType::Outflow,
            BoundaryType::Inflow,
        ] {
            assert_eq!(BoundaryType::from_sentinel(bnd.sentinel()).unwrap(), bnd);
        }
        assert_eq!(
            BoundaryType::from_sentinel(-7).unwrap_err(),
            MeshError::InvalidSentinel(-7)
        );
    }

    #[test]
    fn test_reflecting_mirrors_normal_velocity() {
        let exact = UniformFlow::from_mach(0.5, 1.4);
        let interior = EulerState::from_primitive(1.1, 0.3, 0.4, 0.7, 1.4);
        let n = [0.6, 0.8];
        let ghost = BoundaryType::Reflecting.exterior_state(&interior, n, [0.0, 0.0], &exact);
        let un_in = interior.u * n[0] + interior.v * n[1];
        let un_out = ghost.u * n[0] + ghost.v * n[1];
        let ut_in = -interior.u * n[1] + interior.v * n[0];
        let ut_out = -ghost.u * n[1] + ghost.v * n[0];
        assert_relative_eq!(un_out, -un_in, epsilon = 1e-14);
        assert_relative_eq!(ut_out, ut_in, epsilon = 1e-14);
        assert_eq!(ghost.rho, interior.rho);
        assert_eq!(ghost.energy, interior.energy);
    }

    #[test]
    fn test_far_field_uses_exact_state() {
        let exact = UniformFlow::from_mach(2.0, 1.4);
        let interior = EulerState::from_primitive(3.0, 0.0, 0.0, 1.0, 1.4);
        for bnd in [BoundaryType::Outflow, BoundaryType::Inflow] {
            let ghost = bnd.exterior_state(&interior, [1.0, 0.0], [0.5, 0.5], &exact);
            assert_eq!(ghost, exact.state);
        }
    }
}
