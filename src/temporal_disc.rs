use crate::{
    disc::{euler2d::Disc2dEuler, modal_field::ModalField},
    solver::{SolverError, SolverParameters},
};

/// Classical four-stage Runge-Kutta driver.
pub struct TemporalDisc<'a, 'b> {
    pub disc: &'b Disc2dEuler<'a>,
    pub solver_param: &'b SolverParameters,
    pub curr_time: f64,
    pub curr_step: usize,
}
impl<'a, 'b> TemporalDisc<'a, 'b> {
    pub fn new(disc: &'b Disc2dEuler<'a>, solver_param: &'b SolverParameters) -> Self {
        Self {
            disc,
            solver_param,
            curr_time: 0.0,
            curr_step: 0,
        }
    }
    pub fn step(&self, solution: &mut ModalField, dt: f64) {
        let k1 = self.disc.compute_rate(solution);
        let mut stage = solution.clone();
        stage.assign_axpy(solution, 0.5 * dt, &k1);
        let k2 = self.disc.compute_rate(&stage);
        stage.assign_axpy(solution, 0.5 * dt, &k2);
        let k3 = self.disc.compute_rate(&stage);
        stage.assign_axpy(solution, dt, &k3);
        let k4 = self.disc.compute_rate(&stage);
        solution.scaled_add(dt / 6.0, &k1);
        solution.scaled_add(dt / 3.0, &k2);
        solution.scaled_add(dt / 3.0, &k3);
        solution.scaled_add(dt / 6.0, &k4);
    }
    /// Marches until the final time or final step; `on_output` is called every
    /// `output_interval` steps.
    pub fn time_march<F>(
        &mut self,
        solution: &mut ModalField,
        mut on_output: F,
    ) -> Result<(), SolverError>
    where
        F: FnMut(usize, f64, &ModalField) -> Result<(), SolverError>,
    {
        let params = self.solver_param;
        while self.curr_step < params.final_step && self.curr_time < params.final_time {
            let mut time_step = self.disc.compute_time_step(solution, params.cfl);
            if !time_step.is_finite() || time_step <= 0.0 {
                return Err(SolverError::NonFiniteTimeStep(time_step));
            }
            if self.curr_time + time_step > params.final_time {
                time_step = params.final_time - self.curr_time;
            }
            self.step(solution, time_step);
            self.curr_time += time_step;
            self.curr_step += 1;
            self.disc
                .diagnostics
                .report(&format!("step {}", self.curr_step));
            log::debug!(
                "step {}: t = {:.6}, dt = {:.3e}",
                self.curr_step,
                self.curr_time,
                time_step
            );
            if params.output_interval > 0 && self.curr_step % params.output_interval == 0 {
                log::info!("step {}: t = {:.6}", self.curr_step, self.curr_time);
                on_output(self.curr_step, self.curr_time, solution)?;
            }
        }
        Ok(())
    }
}
