//! Force generators: gravity, drag, springs and bungees.
//!
//! Generators only ever touch a particle's force accumulator. Velocity and
//! position belong to the integrator.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::link::LinkEnd;
use crate::particle::{Particle, ParticleHandle, ParticleSet};
use crate::vec::Vec3;

/// A force generator, dispatched through a single `match`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ForceKind<F: Float> {
    /// Constant acceleration scaled by the particle's mass.
    Gravity { gravity: Vec3<F> },
    /// Velocity drag: `-v̂ * (k1·|v| + k2·|v|²)`.
    Drag { k1: F, k2: F },
    /// Hookean spring toward another particle or a fixed anchor. Pushes when compressed.
    Spring { other: LinkEnd<F>, spring_constant: F, rest_length: F },
    /// Like `Spring` but only pulls, and only while stretched past `rest_length`.
    Bungee { other: LinkEnd<F>, spring_constant: F, rest_length: F },
}

impl<F: Float> ForceKind<F> {
    pub fn gravity(gravity: Vec3<F>) -> Self {
        ForceKind::Gravity { gravity }
    }

    pub fn drag(k1: F, k2: F) -> Self {
        ForceKind::Drag { k1, k2 }
    }

    pub fn spring(other: LinkEnd<F>, spring_constant: F, rest_length: F) -> Self {
        ForceKind::Spring { other, spring_constant, rest_length }
    }

    pub fn bungee(other: LinkEnd<F>, spring_constant: F, rest_length: F) -> Self {
        ForceKind::Bungee { other, spring_constant, rest_length }
    }

    /// Check coefficients once, at registration time.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        let non_negative = |v: F| v >= F::zero() && v.is_finite();
        match self {
            ForceKind::Gravity { gravity } => {
                if gravity.is_finite() { Ok(()) } else { Err(PhysicsError::InvalidCoefficient) }
            }
            ForceKind::Drag { k1, k2 } => {
                if non_negative(*k1) && non_negative(*k2) {
                    Ok(())
                } else {
                    Err(PhysicsError::InvalidCoefficient)
                }
            }
            ForceKind::Spring { spring_constant, rest_length, .. }
            | ForceKind::Bungee { spring_constant, rest_length, .. } => {
                if !non_negative(*spring_constant) {
                    Err(PhysicsError::InvalidCoefficient)
                } else if !non_negative(*rest_length) {
                    Err(PhysicsError::InvalidLength)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// The other end this generator reads, if any.
    pub fn other_end(&self) -> Option<&LinkEnd<F>> {
        match self {
            ForceKind::Spring { other, .. } | ForceKind::Bungee { other, .. } => Some(other),
            _ => None,
        }
    }

    /// Force this generator exerts on `particle`.
    ///
    /// `other_position` is the current position of the spring's other end;
    /// it is ignored by gravity and drag.
    pub fn force_on(&self, particle: &Particle<F>, other_position: Option<Vec3<F>>) -> Vec3<F> {
        match self {
            ForceKind::Gravity { gravity } => match particle.mass() {
                Some(mass) => gravity.scale(mass),
                None => Vec3::zero(),
            },
            ForceKind::Drag { k1, k2 } => {
                let speed = particle.velocity.length();
                match particle.velocity.try_normalize() {
                    Some(dir) => -dir.scale(*k1 * speed + *k2 * speed * speed),
                    None => Vec3::zero(),
                }
            }
            ForceKind::Spring { spring_constant, rest_length, .. } => {
                let Some(other) = other_position else { return Vec3::zero() };
                let offset = particle.position - other;
                let length = offset.length();
                match offset.try_normalize() {
                    Some(dir) => -dir.scale(*spring_constant * (length - *rest_length)),
                    None => Vec3::zero(),
                }
            }
            ForceKind::Bungee { spring_constant, rest_length, .. } => {
                let Some(other) = other_position else { return Vec3::zero() };
                let offset = particle.position - other;
                let length = offset.length();
                if length <= *rest_length {
                    return Vec3::zero();
                }
                match offset.try_normalize() {
                    Some(dir) => -dir.scale(*spring_constant * (length - *rest_length)),
                    None => Vec3::zero(),
                }
            }
        }
    }

    /// Fail if this generator cannot be applied to `target` in `particles`.
    pub fn check(&self, target: ParticleHandle, particles: &ParticleSet<F>) -> Result<(), PhysicsError> {
        particles.check(target)?;
        if let Some(other) = self.other_end() {
            if other.particle() == Some(target) {
                return Err(PhysicsError::SelfLink { index: target.index() });
            }
            other.position(particles)?;
        }
        Ok(())
    }

    /// Add this generator's force to `target`'s accumulator.
    pub fn update_force(
        &self,
        target: ParticleHandle,
        particles: &mut ParticleSet<F>,
        duration: F,
    ) -> Result<(), PhysicsError> {
        if duration <= F::zero() || !duration.is_finite() {
            return Ok(());
        }
        self.check(target, particles)?;
        let other_position = match self.other_end() {
            Some(other) => Some(other.position(particles)?),
            None => None,
        };
        let particle = particles.try_get_mut(target)?;
        let force = self.force_on(particle, other_position);
        particle.add_force(force);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_scales_with_mass() {
        let p = Particle::new(Vec3::<f64>::zero(), 2.0);
        let f = ForceKind::gravity(Vec3::new(0.0, -9.8, 0.0)).force_on(&p, None);
        assert!((f.y + 19.6).abs() < 1e-12);
    }

    #[test]
    fn gravity_ignores_immovable() {
        let p = Particle::immovable(Vec3::<f64>::zero());
        let f = ForceKind::gravity(Vec3::new(0.0, -9.8, 0.0)).force_on(&p, None);
        assert_eq!(f, Vec3::zero());
    }

    #[test]
    fn drag_opposes_velocity() {
        let p = Particle::new(Vec3::<f64>::zero(), 1.0).with_velocity(Vec3::new(2.0, 0.0, 0.0));
        let f = ForceKind::drag(0.5, 0.25).force_on(&p, None);
        // 0.5 * 2 + 0.25 * 4 = 2
        assert!((f.x + 2.0).abs() < 1e-12);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn drag_zero_velocity_is_zero_force() {
        let p = Particle::new(Vec3::<f32>::zero(), 1.0);
        assert_eq!(ForceKind::drag(1.0, 1.0).force_on(&p, None), Vec3::zero());
    }

    #[test]
    fn spring_pushes_when_compressed() {
        let anchor = Vec3::new(0.0f64, 0.0, 0.0);
        let p = Particle::new(Vec3::new(1.0, 0.0, 0.0), 1.0);
        let f = ForceKind::spring(LinkEnd::Anchor(anchor), 10.0, 3.0).force_on(&p, Some(anchor));
        assert!((f.x - 20.0).abs() < 1e-12);
    }

    #[test]
    fn validate_rejects_negative_coefficients() {
        assert_eq!(ForceKind::<f32>::drag(-1.0, 0.0).validate(), Err(PhysicsError::InvalidCoefficient));
        assert_eq!(
            ForceKind::bungee(LinkEnd::Anchor(Vec3::<f32>::zero()), 1.0, -1.0).validate(),
            Err(PhysicsError::InvalidLength)
        );
        assert!(ForceKind::gravity(Vec3::new(0.0f32, -9.8, 0.0)).validate().is_ok());
    }

    #[test]
    fn zero_rest_length_spring_is_valid() {
        let anchor = Vec3::new(0.0f64, 0.0, 0.0);
        let spring = ForceKind::spring(LinkEnd::Anchor(anchor), 2.0, 0.0);
        assert!(spring.validate().is_ok());
        let p = Particle::new(Vec3::new(0.0, -3.0, 0.0), 1.0);
        let f = spring.force_on(&p, Some(anchor));
        assert!((f.y - 6.0).abs() < 1e-12);
        assert_eq!(
            ForceKind::spring(LinkEnd::Anchor(anchor), 2.0, f64::NAN).validate(),
            Err(PhysicsError::InvalidLength)
        );
    }

    #[test]
    fn self_spring_is_rejected() {
        let mut set = ParticleSet::new();
        let h = set.insert(Particle::new(Vec3::<f64>::zero(), 1.0));
        let spring = ForceKind::spring(LinkEnd::Particle(h), 1.0, 1.0);
        assert_eq!(spring.update_force(h, &mut set, 0.1), Err(PhysicsError::SelfLink { index: h.index() }));
    }
}
