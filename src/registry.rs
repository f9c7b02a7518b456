//! Pairs force generators with the particles they act on.

use crate::arena::{Arena, Index};
use crate::error::PhysicsError;
use crate::float::Float;
use crate::force::ForceKind;
use crate::particle::{ParticleHandle, ParticleSet};
use alloc::vec::Vec as AllocVec;

/// Handle to a generator stored in a [`ForceRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForceHandle(pub(crate) Index);

impl ForceHandle {
    pub fn index(&self) -> u32 {
        self.0.index
    }

    pub fn generation(&self) -> u32 {
        self.0.generation
    }

    fn stale(&self) -> PhysicsError {
        PhysicsError::StaleForce { index: self.0.index, generation: self.0.generation }
    }
}

/// One (particle, generator) pairing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub particle: ParticleHandle,
    pub generator: ForceHandle,
}

/// Generator storage plus the ordered list of registrations.
///
/// A generator may be paired with any number of particles and a particle with
/// any number of generators. Duplicate pairs are kept and each one fires.
#[derive(Clone, Debug)]
pub struct ForceRegistry<F: Float> {
    generators: Arena<ForceKind<F>>,
    registrations: AllocVec<Registration>,
}

impl<F: Float> ForceRegistry<F> {
    pub fn new() -> Self {
        ForceRegistry { generators: Arena::new(), registrations: AllocVec::new() }
    }

    pub fn add_generator(&mut self, generator: ForceKind<F>) -> Result<ForceHandle, PhysicsError> {
        generator.validate()?;
        Ok(ForceHandle(self.generators.insert(generator)))
    }

    pub fn generator(&self, handle: ForceHandle) -> Option<&ForceKind<F>> {
        self.generators.get(handle.0)
    }

    pub fn generator_mut(&mut self, handle: ForceHandle) -> Option<&mut ForceKind<F>> {
        self.generators.get_mut(handle.0)
    }

    /// Drop a generator together with all of its registrations.
    pub fn remove_generator(&mut self, handle: ForceHandle) -> Option<ForceKind<F>> {
        let generator = self.generators.remove(handle.0)?;
        self.registrations.retain(|r| r.generator != handle);
        Some(generator)
    }

    /// Append a registration. The particle is checked when forces are applied.
    pub fn add(&mut self, particle: ParticleHandle, generator: ForceHandle) -> Result<(), PhysicsError> {
        if !self.generators.contains(generator.0) {
            return Err(generator.stale());
        }
        self.registrations.push(Registration { particle, generator });
        Ok(())
    }

    /// Remove every registration of exactly this pair. Returns how many were removed.
    pub fn remove(&mut self, particle: ParticleHandle, generator: ForceHandle) -> usize {
        let before = self.registrations.len();
        self.registrations
            .retain(|r| !(r.particle == particle && r.generator == generator));
        before - self.registrations.len()
    }

    /// Forget `particle`: drop its registrations and every spring or bungee
    /// generator anchored on it. Returns how many registrations went away.
    pub fn remove_particle(&mut self, particle: ParticleHandle) -> usize {
        let before = self.registrations.len();
        let anchored: AllocVec<Index> = self
            .generators
            .iter()
            .filter(|(_, g)| g.other_end().and_then(|end| end.particle()) == Some(particle))
            .map(|(i, _)| i)
            .collect();
        for index in anchored {
            self.remove_generator(ForceHandle(index));
        }
        self.registrations.retain(|r| r.particle != particle);
        before - self.registrations.len()
    }

    /// Remove all registrations. Generators stay available for re-registration.
    pub fn clear(&mut self) {
        self.registrations.clear();
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        self.registrations.iter()
    }

    /// Fail on the first registration whose generator or particles are gone,
    /// or whose generator was edited into an invalid state.
    pub fn check(&self, particles: &ParticleSet<F>) -> Result<(), PhysicsError> {
        for r in &self.registrations {
            let generator = self.generators.get(r.generator.0).ok_or_else(|| r.generator.stale())?;
            generator.validate()?;
            generator.check(r.particle, particles)?;
        }
        Ok(())
    }

    /// Run every registration in order.
    ///
    /// All registrations are checked before any accumulator is touched, so
    /// an error leaves `particles` unchanged. A non-positive duration does
    /// nothing.
    pub fn update_forces(&self, particles: &mut ParticleSet<F>, duration: F) -> Result<(), PhysicsError> {
        if duration <= F::zero() || !duration.is_finite() {
            return Ok(());
        }
        self.check(particles)?;
        for r in &self.registrations {
            let generator = self.generators.get(r.generator.0).ok_or_else(|| r.generator.stale())?;
            generator.update_force(r.particle, particles, duration)?;
        }
        Ok(())
    }
}

impl<F: Float> Default for ForceRegistry<F> {
    fn default() -> Self {
        Self::new()
    }
}
