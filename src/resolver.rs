//! Iterative contact resolver.

use crate::contact::Contact;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::observer::StepObserver;
use crate::particle::ParticleSet;

/// Outcome of one [`ContactResolver::resolve_contacts`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ResolveReport<F: Float> {
    /// Contacts resolved (one per iteration).
    pub iterations: usize,
    /// Largest penetration left above tolerance, zero when converged.
    pub residual_penetration: F,
    pub converged: bool,
}

/// Resolves contacts one at a time, deepest penetration first.
///
/// Each iteration picks the contact with the largest penetration above
/// `tolerance` (earliest wins a tie), resolves it, and corrects the
/// penetration of every other contact that shares a particle it moved. The
/// loop stops when no contact exceeds the tolerance or after
/// `iteration_limit` iterations, which defaults to the number of contacts.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactResolver<F: Float> {
    pub iteration_limit: Option<usize>,
    pub tolerance: F,
}

impl<F: Float> ContactResolver<F> {
    pub fn new() -> Self {
        ContactResolver { iteration_limit: None, tolerance: F::epsilon() }
    }

    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    pub fn with_tolerance(mut self, tolerance: F) -> Self {
        self.tolerance = tolerance.max(F::zero());
        self
    }

    pub fn resolve_contacts<O: StepObserver<F>>(
        &self,
        contacts: &mut [Contact<F>],
        particles: &mut ParticleSet<F>,
        duration: F,
        observer: &mut O,
    ) -> Result<ResolveReport<F>, PhysicsError> {
        for contact in contacts.iter() {
            contact.check(particles)?;
        }
        let limit = self.budget(contacts.len());
        let iterations = self.run(contacts, particles, duration, 0, limit, observer)?;
        self.report(iterations, contacts, particles)
    }

    /// Iterations allowed for a batch of `contacts` contacts.
    pub fn budget(&self, contacts: usize) -> usize {
        self.iteration_limit.unwrap_or(contacts)
    }

    /// Resolve from iteration `first` until nothing exceeds the tolerance or
    /// `limit` is reached. Returns the iteration count reached.
    pub(crate) fn run<O: StepObserver<F>>(
        &self,
        contacts: &mut [Contact<F>],
        particles: &mut ParticleSet<F>,
        duration: F,
        first: usize,
        limit: usize,
        observer: &mut O,
    ) -> Result<usize, PhysicsError> {
        let mut iterations = first;

        while iterations < limit {
            let Some(deepest) = self.deepest(contacts, particles)? else {
                break;
            };

            let resolved = contacts[deepest];
            let movement = resolved.resolve(particles, duration)?;
            log::trace!(
                "resolver iteration {}: contact {} penetration {}",
                iterations,
                deepest,
                resolved.penetration
            );
            observer.on_contact_resolved(iterations, &resolved);

            for contact in contacts.iter_mut() {
                for (handle, delta) in [(Some(resolved.a), movement.a), (resolved.b, movement.b)]
                    .into_iter()
                    .filter_map(|(h, d)| h.map(|h| (h, d)))
                {
                    if contact.a == handle {
                        contact.penetration = contact.penetration + delta.dot(contact.normal);
                    }
                    if contact.b == Some(handle) {
                        contact.penetration = contact.penetration - delta.dot(contact.normal);
                    }
                }
            }
            iterations += 1;
        }
        Ok(iterations)
    }

    /// Summarise `contacts` after `iterations` iterations, warning on residual.
    pub(crate) fn report(
        &self,
        iterations: usize,
        contacts: &[Contact<F>],
        particles: &ParticleSet<F>,
    ) -> Result<ResolveReport<F>, PhysicsError> {
        let residual = self.residual(contacts, particles)?;
        let converged = residual <= F::zero();
        if !converged {
            log::warn!(
                "contact resolver stopped after {} iterations with {} residual penetration",
                iterations,
                residual
            );
        }
        Ok(ResolveReport { iterations, residual_penetration: residual, converged })
    }

    /// Index of the deepest movable contact above tolerance.
    fn deepest(
        &self,
        contacts: &[Contact<F>],
        particles: &ParticleSet<F>,
    ) -> Result<Option<usize>, PhysicsError> {
        let mut best: Option<(usize, F)> = None;
        for (i, contact) in contacts.iter().enumerate() {
            if contact.penetration <= self.tolerance {
                continue;
            }
            if contact.total_inverse_mass(particles)? <= F::zero() {
                continue;
            }
            match best {
                Some((_, depth)) if contact.penetration <= depth => {}
                _ => best = Some((i, contact.penetration)),
            }
        }
        Ok(best.map(|(i, _)| i))
    }

    /// Largest penetration above tolerance on a contact that can still move.
    pub(crate) fn residual(&self, contacts: &[Contact<F>], particles: &ParticleSet<F>) -> Result<F, PhysicsError> {
        let mut residual = F::zero();
        for contact in contacts {
            if contact.penetration > self.tolerance && contact.total_inverse_mass(particles)? > F::zero() {
                residual = residual.max(contact.penetration);
            }
        }
        Ok(residual)
    }
}

impl<F: Float> Default for ContactResolver<F> {
    fn default() -> Self {
        Self::new()
    }
}
