//! Point masses driven by accumulated forces.

use crate::arena::{Arena, Index};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec3;

/// A point mass with explicit velocity and a per-step force accumulator.
///
/// `acceleration` is a constant bias set by the caller and kept across
/// steps; `force_accum` only lives until the next [`Particle::integrate`].
/// The total acceleration of the last integration is kept for contact
/// resolution.
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub position: Vec3<F>,
    pub velocity: Vec3<F>,
    pub acceleration: Vec3<F>,
    force_accum: Vec3<F>,
    last_acceleration: Vec3<F>,
    inverse_mass: F,
    damping: F,
    destroyed: bool,
}

impl<F: Float> Particle<F> {
    /// A particle at rest. A `mass` that is near zero, negative or not
    /// finite yields an immovable particle.
    pub fn new(position: Vec3<F>, mass: F) -> Self {
        let inverse_mass = if mass.is_finite() && mass > F::from_f32(1e-10) {
            F::one() / mass
        } else {
            F::zero()
        };
        Particle {
            position,
            velocity: Vec3::zero(),
            acceleration: Vec3::zero(),
            force_accum: Vec3::zero(),
            last_acceleration: Vec3::zero(),
            inverse_mass,
            damping: F::one(),
            destroyed: false,
        }
    }

    /// A particle with infinite mass: forces and contacts never move it.
    pub fn immovable(position: Vec3<F>) -> Self {
        Particle::new(position, F::zero())
    }

    pub fn with_velocity(mut self, velocity: Vec3<F>) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec3<F>) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the damping factor, clamped into [0, 1].
    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping.clamp(F::zero(), F::one());
        self
    }

    /// Advance velocity and position by `duration`, then clear the accumulator.
    ///
    /// Velocity is damped by `damping^duration`. Position advances by the
    /// exact constant-acceleration displacement, so a particle with no net
    /// acceleration moves by exactly `velocity * duration`. A non-positive or
    /// non-finite duration leaves the particle untouched.
    pub fn integrate(&mut self, duration: F) {
        if duration <= F::zero() || !duration.is_finite() {
            return;
        }
        if !self.has_finite_mass() {
            self.force_accum = Vec3::zero();
            return;
        }

        let resulting_acc = self.acceleration + self.force_accum.scale(self.inverse_mass);
        let damped = self.velocity.scale(self.damping.powf(duration));

        self.position += damped.scale(duration)
            + resulting_acc.scale(F::half() * duration * duration);
        self.velocity = damped + resulting_acc.scale(duration);
        self.last_acceleration = resulting_acc;
        self.force_accum = Vec3::zero();
    }

    /// Bias plus force-driven acceleration applied by the last integration.
    pub fn last_acceleration(&self) -> Vec3<F> {
        self.last_acceleration
    }

    /// Accumulate a force for the next integration only.
    pub fn add_force(&mut self, force: Vec3<F>) {
        self.force_accum += force;
    }

    /// Zero the force accumulator.
    pub fn reset_force(&mut self) {
        self.force_accum = Vec3::zero();
    }

    pub fn accumulated_force(&self) -> Vec3<F> {
        self.force_accum
    }

    pub fn set_mass(&mut self, mass: F) -> Result<(), PhysicsError> {
        if mass <= F::zero() || !mass.is_finite() {
            return Err(PhysicsError::InvalidMass);
        }
        self.inverse_mass = F::one() / mass;
        Ok(())
    }

    pub fn set_infinite_mass(&mut self) {
        self.inverse_mass = F::zero();
    }

    /// `None` for an immovable particle.
    pub fn mass(&self) -> Option<F> {
        if self.has_finite_mass() {
            Some(F::one() / self.inverse_mass)
        } else {
            None
        }
    }

    pub fn inverse_mass(&self) -> F {
        self.inverse_mass
    }

    pub fn has_finite_mass(&self) -> bool {
        self.inverse_mass > F::zero()
    }

    pub fn set_damping(&mut self, damping: F) -> Result<(), PhysicsError> {
        if !(damping >= F::zero() && damping <= F::one()) {
            return Err(PhysicsError::InvalidDamping);
        }
        self.damping = damping;
        Ok(())
    }

    pub fn damping(&self) -> F {
        self.damping
    }

    /// Hide the particle from rendering. It keeps simulating until removed.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// ½·m·|v|², zero for immovable particles.
    pub fn kinetic_energy(&self) -> F {
        match self.mass() {
            Some(m) => F::half() * m * self.velocity.length_sq(),
            None => F::zero(),
        }
    }
}

/// Handle to a particle stored in a [`ParticleSet`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticleHandle(pub(crate) Index);

impl ParticleHandle {
    pub fn index(&self) -> u32 {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }

    pub(crate) fn stale(&self) -> PhysicsError {
        PhysicsError::StaleParticle { index: self.0.index, generation: self.0.generation }
    }
}

/// Arena of particles addressed by [`ParticleHandle`].
#[derive(Clone, Debug)]
pub struct ParticleSet<F: Float> {
    arena: Arena<Particle<F>>,
}

impl<F: Float> ParticleSet<F> {
    pub fn new() -> Self {
        ParticleSet { arena: Arena::new() }
    }

    pub fn insert(&mut self, particle: Particle<F>) -> ParticleHandle {
        ParticleHandle(self.arena.insert(particle))
    }

    pub fn remove(&mut self, handle: ParticleHandle) -> Option<Particle<F>> {
        self.arena.remove(handle.0)
    }

    pub fn contains(&self, handle: ParticleHandle) -> bool {
        self.arena.contains(handle.0)
    }

    pub fn get(&self, handle: ParticleHandle) -> Option<&Particle<F>> {
        self.arena.get(handle.0)
    }

    pub fn get_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle<F>> {
        self.arena.get_mut(handle.0)
    }

    pub fn try_get(&self, handle: ParticleHandle) -> Result<&Particle<F>, PhysicsError> {
        self.get(handle).ok_or_else(|| handle.stale())
    }

    pub fn try_get_mut(&mut self, handle: ParticleHandle) -> Result<&mut Particle<F>, PhysicsError> {
        self.arena.get_mut(handle.0).ok_or_else(|| handle.stale())
    }

    /// Fail with `StaleParticle` unless `handle` is live.
    pub fn check(&self, handle: ParticleHandle) -> Result<(), PhysicsError> {
        self.try_get(handle).map(|_| ())
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParticleHandle, &Particle<F>)> {
        self.arena.iter().map(|(i, p)| (ParticleHandle(i), p))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ParticleHandle, &mut Particle<F>)> {
        self.arena.iter_mut().map(|(i, p)| (ParticleHandle(i), p))
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn clear(&mut self) {
        self.arena.clear();
    }
}

impl<F: Float> Default for ParticleSet<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn near_zero_mass_is_immovable() {
        let mut p = Particle::new(Vec3::new(1.0f64, 2.0, 3.0), 0.0);
        assert!(!p.has_finite_mass());
        assert_eq!(p.mass(), None);
        p.add_force(Vec3::new(100.0, 0.0, 0.0));
        p.integrate(0.1);
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.accumulated_force(), Vec3::zero());
    }

    #[test]
    fn negative_or_nan_mass_is_immovable() {
        for mass in [-1.0f64, f64::NAN, f64::NEG_INFINITY] {
            let mut p = Particle::new(Vec3::zero(), mass);
            assert_eq!(p.inverse_mass(), 0.0, "mass {}", mass);
            assert_eq!(p.mass(), None);
            p.add_force(Vec3::new(0.0, -10.0, 0.0));
            p.integrate(0.1);
            assert_eq!(p.position, Vec3::zero());
        }
    }

    #[test]
    fn kinetic_energy_uses_mass() {
        let p = Particle::new(Vec3::<f64>::zero(), 2.0).with_velocity(Vec3::new(3.0, 4.0, 0.0));
        assert!((p.kinetic_energy() - 25.0).abs() < 1e-12);
        let wall = Particle::immovable(Vec3::<f64>::zero()).with_velocity(Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(wall.kinetic_energy(), 0.0);
    }

    #[test]
    fn set_mass_rejects_bad_values() {
        let mut p = Particle::new(Vec3::<f32>::zero(), 1.0);
        assert_eq!(p.set_mass(0.0), Err(PhysicsError::InvalidMass));
        assert_eq!(p.set_mass(-2.0), Err(PhysicsError::InvalidMass));
        assert_eq!(p.set_mass(f32::NAN), Err(PhysicsError::InvalidMass));
        assert!(p.set_mass(4.0).is_ok());
        assert!((p.inverse_mass() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn damping_is_validated() {
        let mut p = Particle::new(Vec3::<f64>::zero(), 1.0);
        assert_eq!(p.set_damping(1.5), Err(PhysicsError::InvalidDamping));
        assert_eq!(p.set_damping(f64::NAN), Err(PhysicsError::InvalidDamping));
        assert!(p.set_damping(0.9).is_ok());
        assert_eq!(Particle::new(Vec3::<f64>::zero(), 1.0).with_damping(-1.0).damping(), 0.0);
    }

    #[test]
    fn invalid_duration_is_noop() {
        let mut p = Particle::new(Vec3::<f64>::zero(), 1.0).with_velocity(Vec3::new(1.0, 0.0, 0.0));
        p.add_force(Vec3::new(0.0, 5.0, 0.0));
        p.integrate(0.0);
        p.integrate(-1.0);
        p.integrate(f64::NAN);
        assert_eq!(p.position, Vec3::zero());
        assert_eq!(p.accumulated_force(), Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn destroyed_particle_still_integrates() {
        let mut p = Particle::new(Vec3::<f64>::zero(), 1.0).with_velocity(Vec3::new(2.0, 0.0, 0.0));
        p.destroy();
        assert!(p.is_destroyed());
        p.integrate(0.5);
        assert!((p.position.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn stale_handle_reports_error() {
        let mut set = ParticleSet::new();
        let h = set.insert(Particle::new(Vec3::<f32>::zero(), 1.0));
        set.remove(h);
        assert_eq!(
            set.check(h),
            Err(PhysicsError::StaleParticle { index: h.index(), generation: h.generation() })
        );
    }
}
