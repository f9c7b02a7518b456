//! The world: particles, force registrations and links advanced in fixed steps.

use crate::arena::{Arena, Index};
use crate::config::WorldConfig;
use crate::contact::Contact;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::force::ForceKind;
use crate::link::{Link, LinkHandle};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::particle::{Particle, ParticleHandle, ParticleSet};
use crate::registry::{ForceHandle, ForceRegistry};
use crate::resolver::{ContactResolver, ResolveReport};
use alloc::vec::Vec as AllocVec;

/// Summary of one [`World::step`].
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct StepReport<F: Float> {
    /// Contacts reported by links right after integration.
    pub contacts: usize,
    pub resolver: ResolveReport<F>,
}

/// Owns every particle, force generator and link, and steps them together.
///
/// Each step runs, in order: registered forces, integration, contact
/// generation from links, contact resolution.
pub struct World<F: Float> {
    particles: ParticleSet<F>,
    registry: ForceRegistry<F>,
    links: Arena<Link<F>>,
    resolver: ContactResolver<F>,
    contacts: AllocVec<Contact<F>>,
}

impl<F: Float> World<F> {
    pub fn new() -> Self {
        Self::with_config(&WorldConfig::new())
    }

    pub fn with_config(config: &WorldConfig<F>) -> Self {
        let mut resolver = ContactResolver::new().with_tolerance(config.penetration_tolerance);
        resolver.iteration_limit = config.iteration_limit;
        World {
            particles: ParticleSet::new(),
            registry: ForceRegistry::new(),
            links: Arena::new(),
            resolver,
            contacts: AllocVec::new(),
        }
    }

    // ---- particles ----

    pub fn add_particle(&mut self, particle: Particle<F>) -> ParticleHandle {
        self.particles.insert(particle)
    }

    /// Remove a particle along with every registration, spring and link that
    /// refers to it.
    pub fn remove_particle(&mut self, handle: ParticleHandle) -> Option<Particle<F>> {
        let particle = self.particles.remove(handle)?;
        let registrations = self.registry.remove_particle(handle);
        let links: AllocVec<Index> = self
            .links
            .iter()
            .filter(|(_, link)| link.references(handle))
            .map(|(i, _)| i)
            .collect();
        for index in &links {
            self.links.remove(*index);
        }
        if registrations > 0 || !links.is_empty() {
            log::debug!(
                "removed particle {}: dropped {} registrations and {} links",
                handle.index(),
                registrations,
                links.len()
            );
        }
        Some(particle)
    }

    pub fn particle(&self, handle: ParticleHandle) -> Option<&Particle<F>> {
        self.particles.get(handle)
    }

    /// Mutable access for per-frame input such as `add_force` or `reset_force`.
    pub fn particle_mut(&mut self, handle: ParticleHandle) -> Option<&mut Particle<F>> {
        self.particles.get_mut(handle)
    }

    /// Every live particle, for rendering.
    pub fn particles(&self) -> impl Iterator<Item = (ParticleHandle, &Particle<F>)> {
        self.particles.iter()
    }

    pub fn particle_set(&self) -> &ParticleSet<F> {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    // ---- forces ----

    pub fn add_force(&mut self, generator: ForceKind<F>) -> Result<ForceHandle, PhysicsError> {
        self.registry.add_generator(generator)
    }

    pub fn remove_force(&mut self, handle: ForceHandle) -> Option<ForceKind<F>> {
        self.registry.remove_generator(handle)
    }

    /// Edit a generator in place. It is validated again on the next step.
    pub fn force_mut(&mut self, handle: ForceHandle) -> Option<&mut ForceKind<F>> {
        self.registry.generator_mut(handle)
    }

    /// Apply `generator` to `particle` on every step until unregistered.
    pub fn register_force(&mut self, particle: ParticleHandle, generator: ForceHandle) -> Result<(), PhysicsError> {
        if let Some(g) = self.registry.generator(generator) {
            g.check(particle, &self.particles)?;
        }
        self.registry.add(particle, generator)
    }

    pub fn unregister_force(&mut self, particle: ParticleHandle, generator: ForceHandle) -> usize {
        self.registry.remove(particle, generator)
    }

    /// Drop all registrations. Generators remain.
    pub fn clear_forces(&mut self) {
        self.registry.clear();
    }

    pub fn registry(&self) -> &ForceRegistry<F> {
        &self.registry
    }

    // ---- links ----

    pub fn add_link(&mut self, link: Link<F>) -> Result<LinkHandle, PhysicsError> {
        link.validate(&self.particles)?;
        Ok(LinkHandle(self.links.insert(link)))
    }

    pub fn remove_link(&mut self, handle: LinkHandle) -> Option<Link<F>> {
        self.links.remove(handle.0)
    }

    pub fn link(&self, handle: LinkHandle) -> Result<&Link<F>, PhysicsError> {
        self.links.get(handle.0).ok_or_else(|| handle.stale())
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkHandle, &Link<F>)> {
        self.links.iter().map(|(i, l)| (LinkHandle(i), l))
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Contacts the links reported after the last step's resolution. Empty
    /// or within tolerance when that step converged.
    pub fn contacts(&self) -> &[Contact<F>] {
        &self.contacts
    }

    // ---- stepping ----

    fn generate_contacts(&mut self) -> Result<(), PhysicsError> {
        self.contacts.clear();
        for (_, link) in self.links.iter() {
            if let Some(contact) = link.contact(&self.particles)? {
                self.contacts.push(contact);
            }
        }
        Ok(())
    }

    /// Advance the simulation by `duration`.
    pub fn step(&mut self, duration: F) -> Result<StepReport<F>, PhysicsError> {
        self.step_observed(duration, &mut NoOpStepObserver)
    }

    /// Advance by `duration`, reporting progress to `observer`.
    ///
    /// Nothing is modified when `duration` is not positive and finite or when
    /// a registration or link refers to a particle that no longer exists.
    pub fn step_observed<O: StepObserver<F>>(
        &mut self,
        duration: F,
        observer: &mut O,
    ) -> Result<StepReport<F>, PhysicsError> {
        if duration <= F::zero() || !duration.is_finite() {
            log::warn!("ignoring step with invalid duration {}", duration);
            return Err(PhysicsError::InvalidDuration);
        }
        self.registry.check(&self.particles)?;
        for (_, link) in self.links.iter() {
            self.particles.check(link.particle)?;
            link.other.position(&self.particles)?;
        }

        self.registry.update_forces(&mut self.particles, duration)?;
        observer.on_forces_applied();

        for (_, particle) in self.particles.iter_mut() {
            particle.integrate(duration);
        }
        observer.on_integrate();

        self.generate_contacts()?;
        let generated = self.contacts.len();
        observer.on_contacts_generated(generated);

        // Moving a shared particle can stretch a link that was not in the
        // batch, so contacts are regenerated from the links after each pass
        // until they are satisfied or the budget is spent.
        let budget = self.resolver.budget(generated);
        let mut iterations = 0;
        loop {
            let reached = self.resolver.run(
                &mut self.contacts,
                &mut self.particles,
                duration,
                iterations,
                budget,
                observer,
            )?;
            let progressed = reached > iterations;
            iterations = reached;
            self.generate_contacts()?;
            if !progressed
                || iterations >= budget
                || self.resolver.residual(&self.contacts, &self.particles)? <= F::zero()
            {
                break;
            }
            log::trace!("{} contacts still violated after {} iterations", self.contacts.len(), iterations);
        }
        let resolver = self.resolver.report(iterations, &self.contacts, &self.particles)?;

        let report = StepReport { contacts: generated, resolver };
        log::debug!(
            "step {}: {} particles, {} contacts, {} resolver iterations",
            duration,
            self.particles.len(),
            report.contacts,
            report.resolver.iterations
        );
        observer.on_step_complete(&report);
        Ok(report)
    }
}

impl<F: Float> Default for World<F> {
    fn default() -> Self {
        Self::new()
    }
}
