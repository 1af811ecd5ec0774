use ndarray::parallel::prelude::*;

use super::{Disc2dEuler, flux::flux2d, reconstruct_state};
use crate::disc::modal_field::{ModalField, QUANTITY_NUM};

impl Disc2dEuler<'_> {
    /// `∫ F · ∇φ_i dx` on every element, with the cubature weights carried by
    /// the gradient tables.
    pub fn volume_integral(&self, solution: &ModalField) -> ModalField {
        let basis = &self.basis;
        let hcr = self.hcr();
        let mut volume = ModalField::zeros(self.mesh.elem_num, basis.basis_num);
        volume
            .entities_mut()
            .into_par_iter()
            .enumerate()
            .for_each(|(ielem, mut res)| {
                let element = &self.mesh.elements[ielem];
                let coeffs = solution.entity(ielem);
                for q in 0..basis.cub_num() {
                    let state = reconstruct_state(
                        coeffs,
                        basis.phis_cub.column(q),
                        basis.phi0,
                        &self.diagnostics,
                    );
                    let p = state.pressure(hcr, &self.diagnostics);
                    let flux = flux2d(&state, p);
                    for i in 0..basis.basis_num {
                        let dphi_dr = basis.dphis_dr_cub[[i, q]];
                        let dphi_ds = basis.dphis_ds_cub[[i, q]];
                        let gx = dphi_dr * element.ys - dphi_ds * element.yr;
                        let gy = -dphi_dr * element.xs + dphi_ds * element.xr;
                        for k in 0..QUANTITY_NUM {
                            res[[k, i]] += flux.x[k] * gx + flux.y[k] * gy;
                        }
                    }
                }
            });
        volume
    }
}
