//! Error types for physics operations.

use thiserror::Error;

/// Errors that can occur during physics operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Damping must be in [0, 1].
    #[error("damping must be in [0, 1]")]
    InvalidDamping,
    /// Step duration must be positive and finite.
    #[error("duration must be positive and finite")]
    InvalidDuration,
    /// Rod and cable lengths must be positive and finite; spring and bungee
    /// rest lengths must be non-negative and finite.
    #[error("invalid length")]
    InvalidLength,
    /// Drag coefficients and spring constants must be non-negative and finite.
    #[error("coefficient must be non-negative and finite")]
    InvalidCoefficient,
    /// Restitution must be in [0, 1].
    #[error("restitution must be in [0, 1]")]
    InvalidRestitution,
    /// A link or spring connects a particle to itself.
    #[error("link connects particle {index} to itself")]
    SelfLink { index: u32 },
    /// A chain needs at least one segment.
    #[error("chain needs at least one segment")]
    InsufficientSegments,
    /// Handle refers to a particle that was removed.
    #[error("stale particle handle (index {index}, generation {generation})")]
    StaleParticle { index: u32, generation: u32 },
    /// Handle refers to a force generator that was removed.
    #[error("stale force generator handle (index {index}, generation {generation})")]
    StaleForce { index: u32, generation: u32 },
    /// Handle refers to a link that was removed.
    #[error("stale link handle (index {index}, generation {generation})")]
    StaleLink { index: u32, generation: u32 },
}
