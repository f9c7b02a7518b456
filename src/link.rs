//! Rods and cables between a particle and another particle or a fixed anchor.
//!
//! A link never moves anything itself. Once per step, after integration, it
//! reports at most one [`Contact`] describing how far its constraint is
//! violated, and the resolver does the rest.

use crate::arena::Index;
use crate::contact::Contact;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vec::Vec3;

/// The far end of a link or spring.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkEnd<F: Float> {
    Particle(ParticleHandle),
    /// Fixed point in world space.
    Anchor(Vec3<F>),
}

impl<F: Float> LinkEnd<F> {
    pub fn particle(&self) -> Option<ParticleHandle> {
        match self {
            LinkEnd::Particle(h) => Some(*h),
            LinkEnd::Anchor(_) => None,
        }
    }

    pub fn position(&self, particles: &ParticleSet<F>) -> Result<Vec3<F>, PhysicsError> {
        match self {
            LinkEnd::Particle(h) => particles.try_get(*h).map(|p| p.position),
            LinkEnd::Anchor(anchor) => Ok(*anchor),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkKind<F: Float> {
    /// Rigid: corrects both stretch and compression, zero restitution.
    Rod { length: F },
    /// Slack below `max_length`, taut at it. Bounces back with `restitution`.
    Cable { max_length: F, restitution: F },
}

/// A constraint between `particle` and `other`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link<F: Float> {
    pub particle: ParticleHandle,
    pub other: LinkEnd<F>,
    pub kind: LinkKind<F>,
}

impl<F: Float> Link<F> {
    pub fn rod(particle: ParticleHandle, other: LinkEnd<F>, length: F) -> Self {
        Link { particle, other, kind: LinkKind::Rod { length } }
    }

    pub fn cable(particle: ParticleHandle, other: LinkEnd<F>, max_length: F, restitution: F) -> Self {
        Link { particle, other, kind: LinkKind::Cable { max_length, restitution } }
    }

    /// Check parameters and endpoints against `particles`.
    pub fn validate(&self, particles: &ParticleSet<F>) -> Result<(), PhysicsError> {
        let positive = |v: F| v > F::zero() && v.is_finite();
        match self.kind {
            LinkKind::Rod { length } => {
                if !positive(length) {
                    return Err(PhysicsError::InvalidLength);
                }
            }
            LinkKind::Cable { max_length, restitution } => {
                if !positive(max_length) {
                    return Err(PhysicsError::InvalidLength);
                }
                if !(restitution >= F::zero() && restitution <= F::one()) {
                    return Err(PhysicsError::InvalidRestitution);
                }
            }
        }
        if self.other.particle() == Some(self.particle) {
            return Err(PhysicsError::SelfLink { index: self.particle.index() });
        }
        particles.check(self.particle)?;
        self.other.position(particles).map(|_| ())
    }

    /// Distance between the two ends.
    pub fn current_length(&self, particles: &ParticleSet<F>) -> Result<F, PhysicsError> {
        let a = particles.try_get(self.particle)?.position;
        let b = self.other.position(particles)?;
        Ok(a.distance(b))
    }

    /// Every particle this link touches.
    pub fn references(&self, handle: ParticleHandle) -> bool {
        self.particle == handle || self.other.particle() == Some(handle)
    }

    /// The violation of this link at the current positions, if any.
    ///
    /// The contact normal points from the other end toward `particle` while
    /// the link is stretched; a compressed rod reports the opposite normal.
    /// Coincident ends have no usable axis and produce no contact.
    pub fn contact(&self, particles: &ParticleSet<F>) -> Result<Option<Contact<F>>, PhysicsError> {
        let a = particles.try_get(self.particle)?.position;
        let b = self.other.position(particles)?;
        let offset = a - b;
        let length = offset.length();

        let Some(axis) = offset.try_normalize() else {
            log::trace!("link on particle {} has coincident ends, skipped", self.particle.index());
            return Ok(None);
        };
        let other = self.other.particle();

        match self.kind {
            LinkKind::Rod { length: rod_length } => {
                let deviation = length - rod_length;
                if deviation.abs() <= F::epsilon() {
                    return Ok(None);
                }
                let (normal, penetration) = if deviation > F::zero() {
                    (axis, deviation)
                } else {
                    (-axis, -deviation)
                };
                Ok(Some(Contact::new(self.particle, other, normal, penetration, F::zero())))
            }
            LinkKind::Cable { max_length, restitution } => {
                let overshoot = length - max_length;
                if overshoot <= F::zero() {
                    return Ok(None);
                }
                Ok(Some(Contact::new(self.particle, other, axis, overshoot, restitution)))
            }
        }
    }
}

/// Handle to a link stored in a [`crate::World`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkHandle(pub(crate) Index);

impl LinkHandle {
    pub fn index(&self) -> u32 {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }

    pub(crate) fn stale(&self) -> PhysicsError {
        PhysicsError::StaleLink { index: self.0.index, generation: self.0.generation }
    }
}
