//! Fixed-timestep accumulator that drives a [`World`] from real frame time.

use crate::config::WorldConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::world::World;

/// Accumulates real elapsed time and releases fixed steps.
///
/// At most `max_steps` steps are released per call; time beyond that is
/// carried forward but capped at one quantum, so a long stall never turns
/// into a burst of catch-up steps.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedTimestep<F: Float> {
    quantum: F,
    time_scale: F,
    max_steps: usize,
    accumulator: F,
}

impl<F: Float> FixedTimestep<F> {
    /// One step per `quantum` real seconds, simulating `quantum` seconds each.
    pub fn new(quantum: F) -> Result<Self, PhysicsError> {
        if quantum <= F::zero() || !quantum.is_finite() {
            return Err(PhysicsError::InvalidDuration);
        }
        Ok(FixedTimestep { quantum, time_scale: F::one(), max_steps: 1, accumulator: F::zero() })
    }

    pub fn from_config(config: &WorldConfig<F>) -> Result<Self, PhysicsError> {
        Ok(Self::new(config.timestep)?
            .with_time_scale(config.time_scale)?
            .with_max_steps(config.max_steps_per_frame))
    }

    /// Simulated seconds per real second.
    pub fn with_time_scale(mut self, time_scale: F) -> Result<Self, PhysicsError> {
        if time_scale <= F::zero() || !time_scale.is_finite() {
            return Err(PhysicsError::InvalidDuration);
        }
        self.time_scale = time_scale;
        Ok(self)
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps.max(1);
        self
    }

    /// Simulated duration of each released step.
    pub fn step_duration(&self) -> F {
        self.quantum * self.time_scale
    }

    pub fn accumulated(&self) -> F {
        self.accumulator
    }

    /// Fraction of the next step already accumulated, for render interpolation.
    pub fn alpha(&self) -> F {
        (self.accumulator / self.quantum).clamp(F::zero(), F::one())
    }

    /// Add `elapsed` real seconds and return how many steps to take now.
    /// Negative or non-finite input is ignored.
    pub fn advance(&mut self, elapsed: F) -> usize {
        if elapsed < F::zero() || !elapsed.is_finite() {
            return 0;
        }
        self.accumulator = self.accumulator + elapsed;

        let mut steps = 0;
        while self.accumulator >= self.quantum && steps < self.max_steps {
            self.accumulator = self.accumulator - self.quantum;
            steps += 1;
        }
        if self.accumulator > self.quantum {
            log::debug!("dropping {} s of simulation backlog", self.accumulator - self.quantum);
            self.accumulator = self.quantum;
        }
        steps
    }

    /// Advance by `elapsed` and step `world` as many times as released.
    pub fn run(&mut self, world: &mut World<F>, elapsed: F) -> Result<usize, PhysicsError> {
        self.run_observed(world, elapsed, &mut crate::observer::NoOpStepObserver)
    }

    pub fn run_observed<O: StepObserver<F>>(
        &mut self,
        world: &mut World<F>,
        elapsed: F,
        observer: &mut O,
    ) -> Result<usize, PhysicsError> {
        let steps = self.advance(elapsed);
        let duration = self.step_duration();
        for _ in 0..steps {
            world.step_observed(duration, observer)?;
        }
        Ok(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carries_remainder() {
        let mut ts = FixedTimestep::new(0.016f64).unwrap();
        assert_eq!(ts.advance(0.010), 0);
        assert_eq!(ts.advance(0.010), 1);
        assert!((ts.accumulated() - 0.004).abs() < 1e-12);
    }

    #[test]
    fn one_step_per_frame_without_catch_up() {
        let mut ts = FixedTimestep::new(0.016f64).unwrap();
        assert_eq!(ts.advance(0.1), 1);
        assert!((ts.accumulated() - 0.016).abs() < 1e-12);
        assert_eq!(ts.advance(0.0), 1);
        assert_eq!(ts.advance(0.0), 0);
    }

    #[test]
    fn alpha_tracks_partial_step() {
        let mut ts = FixedTimestep::new(0.02f64).unwrap();
        assert_eq!(ts.alpha(), 0.0);
        ts.advance(0.005);
        assert!((ts.alpha() - 0.25).abs() < 1e-12);
        ts.advance(0.02);
        assert!((ts.alpha() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn max_steps_allows_catch_up() {
        let mut ts = FixedTimestep::new(0.01f64).unwrap().with_max_steps(4);
        assert_eq!(ts.advance(0.035), 3);
    }

    #[test]
    fn time_scale_stretches_step_duration() {
        let ts = FixedTimestep::new(0.016f64).unwrap().with_time_scale(10.0).unwrap();
        assert!((ts.step_duration() - 0.16).abs() < 1e-12);
    }

    #[test]
    fn rejects_invalid_quantum() {
        assert_eq!(FixedTimestep::new(0.0f32), Err(PhysicsError::InvalidDuration));
        assert_eq!(FixedTimestep::new(f32::NAN), Err(PhysicsError::InvalidDuration));
        let mut ts = FixedTimestep::new(0.016f32).unwrap();
        assert_eq!(ts.advance(-1.0), 0);
    }
}
