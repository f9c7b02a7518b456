//! Configuration for the world and its fixed-timestep driver.

use crate::float::Float;

/// Configuration for the contact resolver and the fixed-timestep loop.
///
/// # Builder Pattern
/// ```
/// use tether::config::WorldConfig;
///
/// let config: WorldConfig<f32> = WorldConfig::new()
///     .with_iteration_limit(8)
///     .with_timestep(0.016)
///     .with_time_scale(10.0)
///     .with_max_steps_per_frame(1);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldConfig<F: Float> {
    /// Resolver iterations per step. `None` allows one per contact. Default: `None`.
    pub iteration_limit: Option<usize>,
    /// Penetration at or below this is treated as resolved. Default: `F::epsilon()`.
    pub penetration_tolerance: F,
    /// Real seconds per fixed step. Default: 0.016.
    pub timestep: F,
    /// Simulated seconds per real second. Default: 1.0.
    pub time_scale: F,
    /// Steps taken at most per frame; 1 means no catch-up. Default: 1.
    pub max_steps_per_frame: usize,
}

impl<F: Float> WorldConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        WorldConfig {
            iteration_limit: None,
            penetration_tolerance: F::epsilon(),
            timestep: F::from_f32(0.016),
            time_scale: F::one(),
            max_steps_per_frame: 1,
        }
    }

    pub fn with_iteration_limit(mut self, iterations: usize) -> Self {
        self.iteration_limit = Some(iterations);
        self
    }

    pub fn with_penetration_tolerance(mut self, tolerance: F) -> Self {
        self.penetration_tolerance = tolerance;
        self
    }

    pub fn with_timestep(mut self, timestep: F) -> Self {
        self.timestep = timestep;
        self
    }

    pub fn with_time_scale(mut self, time_scale: F) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_max_steps_per_frame(mut self, steps: usize) -> Self {
        self.max_steps_per_frame = steps.max(1);
        self
    }

    /// Simulated duration handed to each step.
    pub fn step_duration(&self) -> F {
        self.timestep * self.time_scale
    }
}

impl<F: Float> Default for WorldConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}
