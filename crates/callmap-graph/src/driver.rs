use crate::graph::Vec2;
use crate::simulation::ForceSimulation;
use std::time::{Duration, Instant};

/// Frame-driven runner that stops the simulation for good after a fixed
/// wall-clock budget, whatever alpha has reached by then.
#[derive(Debug)]
pub struct LayoutDriver {
    simulation: ForceSimulation,
    started_at: Instant,
    auto_stop: Duration,
    stopped: bool,
}

impl LayoutDriver {
    pub const DEFAULT_AUTO_STOP: Duration = Duration::from_secs(3);

    pub fn start(simulation: ForceSimulation, auto_stop: Duration, now: Instant) -> Self {
        Self {
            simulation,
            started_at: now,
            auto_stop,
            stopped: false,
        }
    }

    /// Run at most one tick for the frame at `now`. Returns whether
    /// positions changed.
    pub fn step(&mut self, now: Instant) -> bool {
        if self.stopped {
            return false;
        }
        if now.saturating_duration_since(self.started_at) >= self.auto_stop {
            self.stopped = true;
            tracing::info!(
                "Layout stopped after {} ticks (alpha {:.4})",
                self.simulation.ticks(),
                self.simulation.alpha()
            );
            return false;
        }
        if self.simulation.is_settled() {
            return false;
        }
        self.simulation.tick();
        true
    }

    /// True once the budget has elapsed. The loading indicator stays up
    /// until then, even if alpha cooled earlier.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Time left before the automatic stop.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.auto_stop
            .saturating_sub(now.saturating_duration_since(self.started_at))
    }

    /// Re-target the centering force at the middle of the new viewport.
    pub fn resize(&mut self, viewport: Vec2) {
        self.simulation.set_center(viewport / 2.0);
    }

    pub fn simulation(&self) -> &ForceSimulation {
        &self.simulation
    }

    pub fn positions(&self) -> &[Vec2] {
        self.simulation.positions()
    }
}
