//! Detected constraint violations and their resolution.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::{ParticleHandle, ParticleSet};
use crate::vec::Vec3;

/// A constraint violation between particle `a` and particle `b` (or an
/// immovable anchor when `b` is `None`).
///
/// `normal` is the unit direction in which `a` has overshot relative to `b`.
/// Resolving the contact moves `a` against the normal and `b` along it, each
/// in proportion to its inverse mass. `penetration` is positive while the
/// constraint is violated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact<F: Float> {
    pub a: ParticleHandle,
    pub b: Option<ParticleHandle>,
    pub normal: Vec3<F>,
    pub penetration: F,
    /// 0 = fully inelastic, 1 = fully elastic.
    pub restitution: F,
}

/// Position change applied to each end while resolving one contact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactMovement<F: Float> {
    pub a: Vec3<F>,
    pub b: Vec3<F>,
}

impl<F: Float> ContactMovement<F> {
    pub fn none() -> Self {
        ContactMovement { a: Vec3::zero(), b: Vec3::zero() }
    }
}

#[derive(Copy, Clone)]
struct EndState<F: Float> {
    velocity: Vec3<F>,
    acceleration: Vec3<F>,
    inverse_mass: F,
}

impl<F: Float> EndState<F> {
    fn anchor() -> Self {
        EndState { velocity: Vec3::zero(), acceleration: Vec3::zero(), inverse_mass: F::zero() }
    }
}

impl<F: Float> Contact<F> {
    pub fn new(
        a: ParticleHandle,
        b: Option<ParticleHandle>,
        normal: Vec3<F>,
        penetration: F,
        restitution: F,
    ) -> Self {
        Contact { a, b, normal, penetration, restitution }
    }

    /// Fail unless both ends are live, distinct particles.
    pub fn check(&self, particles: &ParticleSet<F>) -> Result<(), PhysicsError> {
        particles.check(self.a)?;
        if let Some(b) = self.b {
            if b == self.a {
                return Err(PhysicsError::SelfLink { index: b.index() });
            }
            particles.check(b)?;
        }
        Ok(())
    }

    pub fn involves(&self, handle: ParticleHandle) -> bool {
        self.a == handle || self.b == Some(handle)
    }

    fn ends(&self, particles: &ParticleSet<F>) -> Result<(EndState<F>, EndState<F>), PhysicsError> {
        let pa = particles.try_get(self.a)?;
        let a = EndState {
            velocity: pa.velocity,
            acceleration: pa.last_acceleration(),
            inverse_mass: pa.inverse_mass(),
        };
        let b = match self.b {
            Some(h) => {
                let pb = particles.try_get(h)?;
                EndState {
                    velocity: pb.velocity,
                    acceleration: pb.last_acceleration(),
                    inverse_mass: pb.inverse_mass(),
                }
            }
            None => EndState::anchor(),
        };
        Ok((a, b))
    }

    pub fn total_inverse_mass(&self, particles: &ParticleSet<F>) -> Result<F, PhysicsError> {
        let (a, b) = self.ends(particles)?;
        Ok(a.inverse_mass + b.inverse_mass)
    }

    /// Relative speed along the normal. Negative while the violation grows.
    pub fn separating_velocity(&self, particles: &ParticleSet<F>) -> Result<F, PhysicsError> {
        let (a, b) = self.ends(particles)?;
        Ok((b.velocity - a.velocity).dot(self.normal))
    }

    /// Apply the velocity impulse, then push the ends apart.
    pub fn resolve(
        &self,
        particles: &mut ParticleSet<F>,
        duration: F,
    ) -> Result<ContactMovement<F>, PhysicsError> {
        self.check(particles)?;
        self.resolve_velocity(particles, duration)?;
        self.resolve_interpenetration(particles)
    }

    fn resolve_velocity(&self, particles: &mut ParticleSet<F>, duration: F) -> Result<(), PhysicsError> {
        let (a, b) = self.ends(particles)?;
        let separating = (b.velocity - a.velocity).dot(self.normal);
        if separating > F::zero() {
            return Ok(());
        }

        let mut new_separating = -separating * self.restitution;

        // Closing speed gained from this step's acceleration alone is not
        // bounced back, so resting contacts stay at rest.
        let acc_separating = (b.acceleration - a.acceleration).dot(self.normal) * duration;
        if acc_separating < F::zero() {
            new_separating = (new_separating + self.restitution * acc_separating).max(F::zero());
        }

        let total_inverse_mass = a.inverse_mass + b.inverse_mass;
        if total_inverse_mass <= F::zero() {
            return Ok(());
        }

        let impulse = (new_separating - separating) / total_inverse_mass;
        let impulse_per_inverse_mass = self.normal.scale(impulse);

        particles.try_get_mut(self.a)?.velocity -= impulse_per_inverse_mass.scale(a.inverse_mass);
        if let Some(h) = self.b {
            particles.try_get_mut(h)?.velocity += impulse_per_inverse_mass.scale(b.inverse_mass);
        }
        Ok(())
    }

    fn resolve_interpenetration(
        &self,
        particles: &mut ParticleSet<F>,
    ) -> Result<ContactMovement<F>, PhysicsError> {
        if self.penetration <= F::zero() {
            return Ok(ContactMovement::none());
        }
        let (a, b) = self.ends(particles)?;
        let total_inverse_mass = a.inverse_mass + b.inverse_mass;
        if total_inverse_mass <= F::zero() {
            return Ok(ContactMovement::none());
        }

        let move_per_inverse_mass = self.normal.scale(self.penetration / total_inverse_mass);
        let movement = ContactMovement {
            a: -move_per_inverse_mass.scale(a.inverse_mass),
            b: move_per_inverse_mass.scale(b.inverse_mass),
        };

        particles.try_get_mut(self.a)?.position += movement.a;
        if let Some(h) = self.b {
            particles.try_get_mut(h)?.position += movement.b;
        }
        Ok(movement)
    }
}
