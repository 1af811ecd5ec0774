pub mod exact_solution;
pub mod flux;
pub mod riemann_solver;
mod surface_integral;
mod volume_integral;

use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use rayon::prelude::*;

use crate::{
    disc::{
        basis::triangle::TriangleBasis,
        diagnostics::FloorDiagnostics,
        geometric::Geometric2D,
        mesh::mesh2d::Mesh2d,
        modal_field::{ModalField, Quantity},
    },
    solver::FlowParameters,
};
use exact_solution::ExactSolution;
use flux::EulerState;

/// Volume contributions per element and left/right surface contributions per side.
#[derive(Clone, Debug)]
pub struct RhsBuffers {
    pub volume: ModalField,
    pub left: ModalField,
    pub right: ModalField,
}

pub struct Disc2dEuler<'a> {
    pub basis: TriangleBasis,
    pub mesh: &'a Mesh2d,
    pub flow_param: &'a FlowParameters,
    pub exact: &'a dyn ExactSolution,
    pub diagnostics: FloorDiagnostics,
}
impl<'a> Disc2dEuler<'a> {
    pub fn new(
        basis: TriangleBasis,
        mesh: &'a Mesh2d,
        flow_param: &'a FlowParameters,
        exact: &'a dyn ExactSolution,
    ) -> Self {
        log::info!(
            "order {} DG on {} elements / {} sides: {} modes, {} volume and {} edge points",
            basis.n,
            mesh.elem_num,
            mesh.edge_num,
            basis.basis_num,
            basis.cub_num(),
            basis.edge_quad_num()
        );
        Self {
            basis,
            mesh,
            flow_param,
            exact,
            diagnostics: FloorDiagnostics::new(),
        }
    }
    pub fn hcr(&self) -> f64 {
        self.flow_param.hcr
    }
    /// L2 projection of the exact solution onto the basis.
    pub fn initialize_solution(&self) -> ModalField {
        let mut solution = ModalField::zeros(self.mesh.elem_num, self.basis.basis_num);
        solution
            .entities_mut()
            .into_par_iter()
            .enumerate()
            .for_each(|(ielem, mut coeffs)| {
                let (x, y) = self.mesh.element_coords(ielem);
                for q in 0..self.basis.cub_num() {
                    let [xp, yp] =
                        Mesh2d::map_to_physical(self.basis.cub_r[q], self.basis.cub_s[q], &x, &y);
                    let values = self.exact.state(xp, yp).conserved();
                    let w = self.basis.cub_w[q];
                    for (k, value) in values.iter().enumerate() {
                        coeffs
                            .row_mut(k)
                            .scaled_add(w * value, &self.basis.phis_cub.column(q));
                    }
                }
            });
        solution
    }
    pub fn evaluate_rhs(&self, solution: &ModalField) -> RhsBuffers {
        let volume = self.volume_integral(solution);
        let (left, right) = self.surface_integral(solution);
        RhsBuffers {
            volume,
            left,
            right,
        }
    }
    /// Gathers the side contributions of every element and applies the inverse
    /// mass matrix `I / jacob_det`.
    pub fn assemble_rate(&self, rhs: &RhsBuffers) -> ModalField {
        let mut rate = rhs.volume.clone();
        rate.entities_mut()
            .into_par_iter()
            .enumerate()
            .for_each(|(ielem, mut res)| {
                let element = &self.mesh.elements[ielem];
                for (local_id, &iedge) in element.iedges.iter().enumerate() {
                    let edge = &self.mesh.edges[iedge];
                    if edge.left == ielem && edge.left_local_id == local_id {
                        res += &rhs.left.entity(iedge);
                    } else {
                        res += &rhs.right.entity(iedge);
                    }
                }
                res /= element.jacob_det;
            });
        rate
    }
    /// Time derivative of the modal coefficients.
    pub fn compute_rate(&self, solution: &ModalField) -> ModalField {
        let rhs = self.evaluate_rhs(solution);
        self.assemble_rate(&rhs)
    }
    /// `|V| + c` of the mean state of every element.
    pub fn max_wave_speed(&self, solution: &ModalField) -> Array1<f64> {
        let hcr = self.hcr();
        let mut speeds = Array1::zeros(self.mesh.elem_num);
        Zip::indexed(&mut speeds).par_for_each(|ielem, speed| {
            let state = self.mean_state(solution, ielem);
            let p = state.pressure(hcr, &self.diagnostics);
            *speed = state.speed() + state.sound_speed(p, hcr);
        });
        speeds
    }
    pub fn compute_time_step(&self, solution: &ModalField, cfl: f64) -> f64 {
        let speeds = self.max_wave_speed(solution);
        let min_ratio = self
            .mesh
            .elements
            .iter()
            .zip(speeds.iter())
            .map(|(element, &speed)| element.inscribed_diameter / speed)
            .fold(f64::INFINITY, f64::min);
        cfl * min_ratio / (2.0 * self.basis.n as f64 + 1.0)
    }
    pub fn mean_state(&self, solution: &ModalField, ielem: usize) -> EulerState {
        let phi0 = self.basis.phi0;
        EulerState::from_conserved(Quantity::ALL.map(|q| solution.mean(ielem, q) * phi0))
    }
    /// Values of one quantity at the three vertices of every element, `[elem, vertex]`.
    pub fn reconstruct_at_vertices(
        &self,
        solution: &ModalField,
        quantity: Quantity,
    ) -> Array2<f64> {
        let mut values = Array2::zeros((self.mesh.elem_num, 3));
        values
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(ielem, mut row)| {
                row.assign(&solution.modes(ielem, quantity).dot(&self.basis.phis_vertex));
            });
        values
    }
    pub fn reconstruct_velocity_at_vertices(
        &self,
        solution: &ModalField,
    ) -> (Array2<f64>, Array2<f64>) {
        let rho = self.reconstruct_at_vertices(solution, Quantity::Density);
        let u = self.reconstruct_at_vertices(solution, Quantity::MomentumX) / &rho;
        let v = self.reconstruct_at_vertices(solution, Quantity::MomentumY) / &rho;
        (u, v)
    }
    /// L2 norm of the density error against the exact solution, integrated
    /// with the fixed error rule of the basis rather than the volume rule.
    pub fn l2_error(&self, solution: &ModalField) -> f64 {
        (0..self.mesh.elem_num)
            .into_par_iter()
            .map(|ielem| {
                let (x, y) = self.mesh.element_coords(ielem);
                let coeffs = solution.modes(ielem, Quantity::Density);
                let jacob_det = self.mesh.elements[ielem].jacob_det;
                (0..self.basis.err_num())
                    .map(|q| {
                        let [xp, yp] = Mesh2d::map_to_physical(
                            self.basis.err_r[q],
                            self.basis.err_s[q],
                            &x,
                            &y,
                        );
                        let err = coeffs.dot(&self.basis.phis_err.column(q))
                            - self.exact.density(xp, yp);
                        self.basis.err_w[q] * jacob_det * err * err
                    })
                    .sum::<f64>()
            })
            .sum::<f64>()
            .sqrt()
    }
    /// Integral of one quantity over the whole mesh.
    pub fn total_integral(&self, solution: &ModalField, quantity: Quantity) -> f64 {
        // the reference triangle has area 1/2
        self.mesh
            .elements
            .iter()
            .enumerate()
            .map(|(ielem, element)| {
                0.5 * element.jacob_det * solution.mean(ielem, quantity) * self.basis.phi0
            })
            .sum()
    }
    fn edge_point(&self, iedge: usize, quad_id: usize) -> [f64; 2] {
        let edge = &self.mesh.edges[iedge];
        let (x, y) = self.mesh.element_coords(edge.left);
        let (r, s) =
            TriangleBasis::compute_ref_edge_point(edge.left_local_id, self.basis.quad_p[quad_id]);
        Mesh2d::map_to_physical(r, s, &x, &y)
    }
}

/// Conserved state at a point, with non-positive density or energy replaced
/// by the cell average.
pub(crate) fn reconstruct_state(
    coeffs: ArrayView2<f64>,
    phis: ArrayView1<f64>,
    phi0: f64,
    diag: &FloorDiagnostics,
) -> EulerState {
    let mut q: [f64; 4] = std::array::from_fn(|k| coeffs.row(k).dot(&phis));
    if q[0] <= 0.0 {
        diag.record_density();
        q[0] = coeffs[[0, 0]] * phi0;
    }
    if q[3] <= 0.0 {
        diag.record_energy();
        q[3] = coeffs[[3, 0]] * phi0;
    }
    EulerState::from_conserved(q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::{
        boundary::BoundaryType,
        euler2d::{
            exact_solution::{SupersonicVortex, UniformFlow},
            flux::flux2d,
        },
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    const HCR: f64 = 1.4;

    fn flow_param() -> FlowParameters {
        FlowParameters {
            hcr: HCR,
            mach: 0.5,
        }
    }

    /// Pressure bump at rest; not an equilibrium so every term is exercised.
    struct PressureBump;
    impl ExactSolution for PressureBump {
        fn state(&self, x: f64, y: f64) -> EulerState {
            let r2 = (x - 0.5).powi(2) + (y - 0.5).powi(2);
            let bump = (-20.0 * r2).exp();
            EulerState::from_primitive(1.0 + 0.3 * bump, 0.1 * y, -0.2 * x, 1.0 + 0.5 * bump, HCR)
        }
    }

    #[test]
    fn test_single_triangle_at_rest() {
        let h = 3.0_f64.sqrt() / 2.0;
        let mesh = Mesh2d::create_single_triangle(
            [[0.0, 0.0], [1.0, 0.0], [0.5, h]],
            BoundaryType::Reflecting,
        )
        .unwrap();
        let flow = flow_param();
        let exact = UniformFlow::new(1.0, 0.0, 0.0, 1.0 / HCR, HCR);
        for n in 0..=3 {
            let disc = Disc2dEuler::new(TriangleBasis::new(n).unwrap(), &mesh, &flow, &exact);
            let solution = disc.initialize_solution();
            let rhs = disc.evaluate_rhs(&solution);
            let rate = disc.assemble_rate(&rhs);
            for v in rate.values.iter() {
                assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-12);
            }
            for iedge in 0..mesh.edge_num {
                for i in 0..disc.basis.basis_num {
                    let mass = rhs.left.get(iedge, Quantity::Density, i);
                    let energy = rhs.left.get(iedge, Quantity::Energy, i);
                    assert_abs_diff_eq!(mass, 0.0, epsilon = 1e-14);
                    assert_abs_diff_eq!(energy, 0.0, epsilon = 1e-14);
                }
            }
        }
    }

    #[test]
    fn test_two_triangles_shared_side() {
        let mesh = Mesh2d::create_rectangle_mesh(
            1,
            1,
            (0.0, 1.0),
            (0.0, 1.0),
            [BoundaryType::Reflecting; 4],
        )
        .unwrap();
        assert_eq!(mesh.internal_edges.len(), 1);
        let flow = flow_param();
        let p = 1.0 / HCR;
        let exact = UniformFlow::new(1.0, 0.0, 0.0, p, HCR);
        let disc = Disc2dEuler::new(TriangleBasis::new(2).unwrap(), &mesh, &flow, &exact);
        let solution = disc.initialize_solution();
        let rhs = disc.evaluate_rhs(&solution);
        let iedge = mesh.internal_edges[0];
        let edge = &mesh.edges[iedge];
        for i in 0..disc.basis.basis_num {
            assert_abs_diff_eq!(rhs.left.get(iedge, Quantity::Density, i), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(rhs.left.get(iedge, Quantity::Energy, i), 0.0, epsilon = 1e-14);
            assert_abs_diff_eq!(rhs.right.get(iedge, Quantity::Density, i), 0.0, epsilon = 1e-14);
            // the numerical flux reduces to the pressure p n
            let expected: f64 = (0..disc.basis.edge_quad_num())
                .map(|j| {
                    -0.5 * edge.length
                        * disc.basis.quad_w[j]
                        * p
                        * edge.normal[0]
                        * disc.basis.phis_edge[[edge.left_local_id, i, j]]
                })
                .sum();
            assert_relative_eq!(
                rhs.left.get(iedge, Quantity::MomentumX, i),
                expected,
                epsilon = 1e-13
            );
        }
        let rate = disc.assemble_rate(&rhs);
        for v in rate.values.iter() {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_free_stream_preservation() {
        let far_field = [
            BoundaryType::Inflow,
            BoundaryType::Outflow,
            BoundaryType::Outflow,
            BoundaryType::Inflow,
        ];
        let mesh =
            Mesh2d::create_rectangle_mesh(3, 2, (0.0, 1.5), (-0.5, 0.5), far_field).unwrap();
        let flow = flow_param();
        let exact = UniformFlow::new(1.2, 0.8, -0.3, 0.9, HCR);
        let disc = Disc2dEuler::new(TriangleBasis::new(2).unwrap(), &mesh, &flow, &exact);
        let solution = disc.initialize_solution();
        let rate = disc.compute_rate(&solution);
        for v in rate.values.iter() {
            assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-11);
        }
        assert_eq!(disc.diagnostics.snapshot().total(), 0);
    }

    fn far_field_square(nx: usize, ny: usize) -> Mesh2d {
        let far_field = [
            BoundaryType::Inflow,
            BoundaryType::Outflow,
            BoundaryType::Outflow,
            BoundaryType::Inflow,
        ];
        Mesh2d::create_rectangle_mesh(nx, ny, (0.0, 1.0), (0.0, 1.0), far_field).unwrap()
    }

    #[test]
    fn test_edge_points_follow_local_side() {
        let mesh = far_field_square(2, 2);
        let flow = flow_param();
        let exact = UniformFlow::from_mach(0.5, HCR);
        let disc = Disc2dEuler::new(TriangleBasis::new(2).unwrap(), &mesh, &flow, &exact);
        let mut seen = [false; 3];
        for iedge in 0..mesh.edge_num {
            let edge = &mesh.edges[iedge];
            let l = edge.left_local_id;
            seen[l] = true;
            let inodes = mesh.elements[edge.left].inodes;
            let n0 = mesh.nodes[inodes[l]];
            let n1 = mesh.nodes[inodes[(l + 1) % 3]];
            for j in 0..disc.basis.edge_quad_num() {
                let t = 0.5 * (1.0 + disc.basis.quad_p[j]);
                let [x, y] = disc.edge_point(iedge, j);
                assert_abs_diff_eq!(x, n0.x + t * (n1.x - n0.x), epsilon = 1e-14);
                assert_abs_diff_eq!(y, n0.y + t * (n1.y - n0.y), epsilon = 1e-14);
            }
        }
        assert_eq!(seen, [true; 3]);
    }

    /// Conserved variables linear in x and y, so a linear basis holds it exactly.
    struct TiltedState;
    impl ExactSolution for TiltedState {
        fn state(&self, x: f64, y: f64) -> EulerState {
            EulerState::from_conserved([
                2.0 + 0.3 * x - 0.2 * y,
                0.5 + 0.1 * y,
                -0.2 + 0.1 * x,
                6.0 + 0.2 * x + 0.3 * y,
            ])
        }
    }

    #[test]
    fn test_far_field_state_matches_trace_at_every_point() {
        // with no jump the numerical flux reduces to the physical flux at the true point
        let mesh = far_field_square(2, 3);
        let flow = flow_param();
        let disc = Disc2dEuler::new(TriangleBasis::new(1).unwrap(), &mesh, &flow, &TiltedState);
        let solution = disc.initialize_solution();
        let rhs = disc.evaluate_rhs(&solution);
        let mut local_ids = [0; 3];
        for &iedge in &mesh.boundary_edges {
            let edge = &mesh.edges[iedge];
            let l = edge.left_local_id;
            local_ids[l] += 1;
            let inodes = mesh.elements[edge.left].inodes;
            let n0 = mesh.nodes[inodes[l]];
            let n1 = mesh.nodes[inodes[(l + 1) % 3]];
            for i in 0..disc.basis.basis_num {
                let mut expected = [0.0; 4];
                for j in 0..disc.basis.edge_quad_num() {
                    let t = 0.5 * (1.0 + disc.basis.quad_p[j]);
                    let state = TiltedState
                        .state(n0.x + t * (n1.x - n0.x), n0.y + t * (n1.y - n0.y));
                    let flux = flux2d(&state, state.raw_pressure(HCR)).normal(edge.normal);
                    let w = 0.5 * edge.length * disc.basis.quad_w[j];
                    for k in 0..4 {
                        expected[k] -= w * flux[k] * disc.basis.phis_edge[[l, i, j]];
                    }
                }
                for (k, quantity) in Quantity::ALL.into_iter().enumerate() {
                    let actual = rhs.left.get(iedge, quantity, i);
                    assert_abs_diff_eq!(actual, expected[k], epsilon = 1e-12);
                }
            }
        }
        assert!(local_ids.iter().all(|&count| count > 0));
        assert_eq!(disc.diagnostics.snapshot().total(), 0);
    }

    #[test]
    fn test_reflecting_walls_conserve_mass_and_energy() {
        let mesh = Mesh2d::create_rectangle_mesh(
            3,
            3,
            (0.0, 1.0),
            (0.0, 1.0),
            [BoundaryType::Reflecting; 4],
        )
        .unwrap();
        let flow = flow_param();
        let disc = Disc2dEuler::new(TriangleBasis::new(2).unwrap(), &mesh, &flow, &PressureBump);
        let solution = disc.initialize_solution();
        let rate = disc.compute_rate(&solution);
        for quantity in [Quantity::Density, Quantity::Energy] {
            assert_abs_diff_eq!(disc.total_integral(&rate, quantity), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_negative_reconstruction_is_floored() {
        let mesh = Mesh2d::create_rectangle_mesh(
            2,
            2,
            (0.0, 1.0),
            (0.0, 1.0),
            [BoundaryType::Reflecting; 4],
        )
        .unwrap();
        let flow = flow_param();
        let exact = UniformFlow::new(1.0, 0.0, 0.0, 1.0, HCR);
        let disc = Disc2dEuler::new(TriangleBasis::new(1).unwrap(), &mesh, &flow, &exact);
        let mut solution = disc.initialize_solution();
        // steep linear modes push density and energy below zero inside the element
        let c0 = solution.mean(0, Quantity::Density);
        solution.set(0, Quantity::Density, 1, 3.0 * c0);
        solution.set(0, Quantity::Energy, 2, 10.0 * solution.mean(0, Quantity::Energy));
        let rate = disc.compute_rate(&solution);
        assert!(rate.is_finite());
        let counts = disc.diagnostics.snapshot();
        assert!(counts.density > 0);
        assert!(counts.energy > 0);
    }

    #[test]
    fn test_wave_speed_and_time_step() {
        let mesh = Mesh2d::create_rectangle_mesh(
            2,
            2,
            (0.0, 1.0),
            (0.0, 1.0),
            [BoundaryType::Inflow; 4],
        )
        .unwrap();
        let flow = flow_param();
        let exact = UniformFlow::from_mach(2.0, HCR);
        let disc = Disc2dEuler::new(TriangleBasis::new(1).unwrap(), &mesh, &flow, &exact);
        let solution = disc.initialize_solution();
        let speeds = disc.max_wave_speed(&solution);
        for &speed in speeds.iter() {
            assert_relative_eq!(speed, 3.0, epsilon = 1e-12);
        }
        let d = mesh.elements[0].inscribed_diameter;
        assert_relative_eq!(
            disc.compute_time_step(&solution, 0.6),
            0.6 * d / 3.0 / 3.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_vertex_reconstruction_of_linear_field() {
        struct Linear;
        impl ExactSolution for Linear {
            fn state(&self, x: f64, y: f64) -> EulerState {
                EulerState::from_conserved([2.0 + x - 0.5 * y, 0.3 * x, 0.2 - 0.1 * y, 5.0 + y])
            }
        }
        let mesh = Mesh2d::create_annulus_mesh(1.0, 1.384, 2, 4).unwrap();
        let flow = flow_param();
        let disc = Disc2dEuler::new(TriangleBasis::new(1).unwrap(), &mesh, &flow, &Linear);
        let solution = disc.initialize_solution();
        let rho = disc.reconstruct_at_vertices(&solution, Quantity::Density);
        let energy = disc.reconstruct_at_vertices(&solution, Quantity::Energy);
        let (u, _) = disc.reconstruct_velocity_at_vertices(&solution);
        for (ielem, element) in mesh.elements.iter().enumerate() {
            for (v, &inode) in element.inodes.iter().enumerate() {
                let node = mesh.nodes[inode];
                let expected_rho = 2.0 + node.x - 0.5 * node.y;
                assert_relative_eq!(rho[[ielem, v]], expected_rho, epsilon = 1e-12);
                assert_relative_eq!(energy[[ielem, v]], 5.0 + node.y, epsilon = 1e-12);
                assert_relative_eq!(u[[ielem, v]], 0.3 * node.x / expected_rho, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_vortex_projection_error_decreases() {
        let flow = FlowParameters {
            hcr: HCR,
            mach: 2.5,
        };
        let vortex = SupersonicVortex {
            hcr: HCR,
            mach: 2.5,
            r_inner: 1.0,
        };
        let mesh = Mesh2d::create_annulus_mesh(1.0, 1.384, 4, 8).unwrap();
        let errors: Vec<f64> = (0..=2)
            .map(|n| {
                let basis = TriangleBasis::new(n).unwrap();
                let disc = Disc2dEuler::new(basis, &mesh, &flow, &vortex);
                disc.l2_error(&disc.initialize_solution())
            })
            .collect();
        // a projection is not an interpolant, so the error is well above round-off
        assert!(errors[1] > 1e-4);
        assert!(errors[1] < errors[0]);
        assert!(errors[2] < 0.5 * errors[1]);
    }
}
