use thiserror::Error;

use crate::{
    disc::{
        euler2d::Disc2dEuler,
        modal_field::{ModalField, Quantity},
    },
    io::{OutputError, write_to_csv::write_vertex_values, write_to_vtu::write_vertex_solution},
    temporal_disc::TemporalDisc,
};

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("time step {0} is not a positive finite number")]
    NonFiniteTimeStep(f64),
    #[error(transparent)]
    Output(#[from] OutputError),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SolverParameters {
    pub cfl: f64,
    pub final_time: f64,
    pub final_step: usize,
    pub polynomial_order: usize,
    // 0 disables intermediate output
    pub output_interval: usize,
}
#[derive(Clone, Debug, PartialEq)]
pub struct FlowParameters {
    pub hcr: f64,
    pub mach: f64,
}
#[derive(Clone, Debug, PartialEq)]
pub struct MeshParameters {
    pub r_inner: f64,
    pub r_outer: f64,
    pub radial_num: usize,
    pub angular_num: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SolveSummary {
    pub steps: usize,
    pub final_time: f64,
    pub l2_error: f64,
}

pub struct Solver<'a> {
    pub solutions: ModalField,
    pub curr_step: usize,
    pub disc: Disc2dEuler<'a>,
    pub solver_params: &'a SolverParameters,
}
impl<'a> Solver<'a> {
    pub fn new(disc: Disc2dEuler<'a>, solver_params: &'a SolverParameters) -> Self {
        let solutions = disc.initialize_solution();
        Self {
            solutions,
            curr_step: 0,
            disc,
            solver_params,
        }
    }
    pub fn solve(&mut self) -> Result<SolveSummary, SolverError> {
        let initial_error = self.disc.l2_error(&self.solutions);
        log::info!("initial density L2 error: {initial_error:.6e}");
        let mut temporal_disc = TemporalDisc::new(&self.disc, self.solver_params);
        temporal_disc.time_march(&mut self.solutions, |step, _time, solution| {
            write_vertex_solution("solution", solution, &self.disc, step)?;
            Ok(())
        })?;
        self.curr_step = temporal_disc.curr_step;
        let summary = SolveSummary {
            steps: temporal_disc.curr_step,
            final_time: temporal_disc.curr_time,
            l2_error: self.disc.l2_error(&self.solutions),
        };
        log::info!(
            "finished {} steps at t = {:.6}, density L2 error: {:.6e}",
            summary.steps,
            summary.final_time,
            summary.l2_error
        );
        Ok(summary)
    }
    /// Writes the final state as VTU and the vertex densities as CSV.
    pub fn write_output(&self) -> Result<(), SolverError> {
        write_vertex_solution("solution", &self.solutions, &self.disc, self.curr_step)?;
        write_vertex_values("density", &self.solutions, &self.disc, Quantity::Density)?;
        Ok(())
    }
}
