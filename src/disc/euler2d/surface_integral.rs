use ndarray::{parallel::prelude::*, s};

use super::{Disc2dEuler, reconstruct_state, riemann_solver::rusanov};
use crate::disc::{
    mesh::mesh2d::EdgeNeighbor,
    modal_field::{ModalField, QUANTITY_NUM},
};

impl Disc2dEuler<'_> {
    /// Numerical flux contributions of every side to its left and right
    /// elements. Boundary sides leave their right buffer at zero.
    pub fn surface_integral(&self, solution: &ModalField) -> (ModalField, ModalField) {
        let basis = &self.basis;
        let hcr = self.hcr();
        let quad_num = basis.edge_quad_num();
        let mut left = ModalField::zeros(self.mesh.edge_num, basis.basis_num);
        let mut right = ModalField::zeros(self.mesh.edge_num, basis.basis_num);
        left.entities_mut()
            .into_par_iter()
            .zip(right.entities_mut().into_par_iter())
            .enumerate()
            .for_each(|(iedge, (mut res_left, mut res_right))| {
                let edge = &self.mesh.edges[iedge];
                let coeffs_left = solution.entity(edge.left);
                for j in 0..quad_num {
                    // the right element traverses the side in the opposite direction
                    let j_right = quad_num - 1 - j;
                    let state_left = reconstruct_state(
                        coeffs_left,
                        basis.phis_edge.slice(s![edge.left_local_id, .., j]),
                        basis.phi0,
                        &self.diagnostics,
                    );
                    let state_right = match edge.right {
                        EdgeNeighbor::Element { ielem, local_id } => reconstruct_state(
                            solution.entity(ielem),
                            basis.phis_edge.slice(s![local_id, .., j_right]),
                            basis.phi0,
                            &self.diagnostics,
                        ),
                        EdgeNeighbor::Boundary(bnd) => bnd.exterior_state(
                            &state_left,
                            edge.normal,
                            self.edge_point(iedge, j),
                            self.exact,
                        ),
                    };
                    let flux =
                        rusanov(&state_left, &state_right, edge.normal, hcr, &self.diagnostics);
                    let w = 0.5 * edge.length * basis.quad_w[j];
                    for i in 0..basis.basis_num {
                        let phi_left = basis.phis_edge[[edge.left_local_id, i, j]];
                        for k in 0..QUANTITY_NUM {
                            res_left[[k, i]] -= w * flux[k] * phi_left;
                        }
                        if let EdgeNeighbor::Element { local_id, .. } = edge.right {
                            let phi_right = basis.phis_edge[[local_id, i, j_right]];
                            for k in 0..QUANTITY_NUM {
                                res_right[[k, i]] += w * flux[k] * phi_right;
                            }
                        }
                    }
                }
            });
        (left, right)
    }
}
