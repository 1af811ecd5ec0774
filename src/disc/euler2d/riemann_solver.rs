use super::flux::{EulerState, flux2d};
use crate::disc::diagnostics::FloorDiagnostics;

/// Largest signal speed `|u · n| + c` of a trace state.
pub fn normal_wave_speed(state: &EulerState, p: f64, normal: [f64; 2], hcr: f64) -> f64 {
    (state.u * normal[0] + state.v * normal[1]).abs() + state.sound_speed(p, hcr)
}

/// Local Lax-Friedrichs (Rusanov) flux through a side with unit normal `normal`
/// pointing from `left` to `right`.
pub fn rusanov(
    left: &EulerState,
    right: &EulerState,
    normal: [f64; 2],
    hcr: f64,
    diag: &FloorDiagnostics,
) -> [f64; 4] {
    let p_l = left.pressure(hcr, diag);
    let p_r = right.pressure(hcr, diag);
    let lambda = normal_wave_speed(left, p_l, normal, hcr)
        .max(normal_wave_speed(right, p_r, normal, hcr));
    let f_l = flux2d(left, p_l).normal(normal);
    let f_r = flux2d(right, p_r).normal(normal);
    let q_l = left.conserved();
    let q_r = right.conserved();
    std::array::from_fn(|k| 0.5 * (f_l[k] + f_r[k]) + 0.5 * lambda * (q_l[k] - q_r[k]))
}
