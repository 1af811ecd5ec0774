use std::sync::atomic::{AtomicUsize, Ordering};

/// Counters for the positivity floors applied while evaluating fluxes.
///
/// Shared by reference across the parallel kernels.
#[derive(Debug, Default)]
pub struct FloorDiagnostics {
    density: AtomicUsize,
    energy: AtomicUsize,
    pressure: AtomicUsize,
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloorCounts {
    pub density: usize,
    pub energy: usize,
    pub pressure: usize,
}
impl FloorCounts {
    pub fn total(&self) -> usize {
        self.density + self.energy + self.pressure
    }
}
impl FloorDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn record_density(&self) {
        self.density.fetch_add(1, Ordering::Relaxed);
    }
    pub fn record_energy(&self) {
        self.energy.fetch_add(1, Ordering::Relaxed);
    }
    pub fn record_pressure(&self) {
        self.pressure.fetch_add(1, Ordering::Relaxed);
    }
    pub fn snapshot(&self) -> FloorCounts {
        FloorCounts {
            density: self.density.load(Ordering::Relaxed),
            energy: self.energy.load(Ordering::Relaxed),
            pressure: self.pressure.load(Ordering::Relaxed),
        }
    }
    pub fn reset(&self) {
        self.density.store(0, Ordering::Relaxed);
        self.energy.store(0, Ordering::Relaxed);
        self.pressure.store(0, Ordering::Relaxed);
    }
    /// Logs the current counts and clears them.
    pub fn report(&self, context: &str) -> FloorCounts {
        let counts = self.snapshot();
        if counts.total() > 0 {
            log::warn!(
                "{context}: floored {} density, {} energy and {} pressure values",
                counts.density,
                counts.energy,
                counts.pressure
            );
        } else {
            log::trace!("{context}: no floors applied");
        }
        self.reset();
        counts
    }
}
