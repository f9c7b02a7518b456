//! Hanging chains built from particles, rods or cables, and a shared gravity generator.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::force::ForceKind;
use crate::link::{Link, LinkEnd, LinkHandle};
use crate::particle::{Particle, ParticleHandle};
use crate::registry::ForceHandle;
use crate::vec::Vec3;
use crate::world::World;
use alloc::vec::Vec as AllocVec;

/// How consecutive chain particles are joined.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ChainLinkKind<F: Float> {
    Rod,
    Cable { restitution: F },
}

/// Configuration for creating a chain.
pub struct ChainConfig<F: Float> {
    pub particle_mass: F,
    pub damping: F,
    pub link: ChainLinkKind<F>,
    /// Gravity applied to every chain particle. `None` registers no generator.
    pub gravity: Option<Vec3<F>>,
}

impl<F: Float> Default for ChainConfig<F> {
    fn default() -> Self {
        ChainConfig {
            particle_mass: F::one(),
            damping: F::one(),
            link: ChainLinkKind::Rod,
            gravity: None,
        }
    }
}

/// Handles to everything a chain added to a [`World`].
#[derive(Clone, Debug)]
pub struct Chain {
    particles: AllocVec<ParticleHandle>,
    links: AllocVec<LinkHandle>,
    gravity: Option<ForceHandle>,
}

impl Chain {
    /// Hang `segments` particles from `anchor` toward `end`, evenly spaced.
    ///
    /// The first link ties particle 0 to the anchor; each later link ties a
    /// particle to the one before it.
    pub fn build<F: Float>(
        world: &mut World<F>,
        anchor: Vec3<F>,
        end: Vec3<F>,
        segments: usize,
        config: ChainConfig<F>,
    ) -> Result<Self, PhysicsError> {
        if segments == 0 {
            return Err(PhysicsError::InsufficientSegments);
        }
        let count = F::from_f32(segments as f32);
        let segment_length = anchor.distance(end) / count;
        if segment_length <= F::zero() || !segment_length.is_finite() {
            return Err(PhysicsError::InvalidLength);
        }
        let gravity = match config.gravity {
            Some(g) => Some(world.add_force(ForceKind::gravity(g))?),
            None => None,
        };

        let mut particles = AllocVec::with_capacity(segments);
        let mut links = AllocVec::with_capacity(segments);
        let mut previous = LinkEnd::Anchor(anchor);

        for i in 1..=segments {
            let t = F::from_f32(i as f32) / count;
            let particle = Particle::new(anchor.lerp(end, t), config.particle_mass)
                .with_damping(config.damping);
            let handle = world.add_particle(particle);
            if let Some(g) = gravity {
                world.register_force(handle, g)?;
            }

            let link = match config.link {
                ChainLinkKind::Rod => Link::rod(handle, previous, segment_length),
                ChainLinkKind::Cable { restitution } => {
                    Link::cable(handle, previous, segment_length, restitution)
                }
            };
            links.push(world.add_link(link)?);
            particles.push(handle);
            previous = LinkEnd::Particle(handle);
        }

        Ok(Chain { particles, links, gravity })
    }

    pub fn particles(&self) -> &[ParticleHandle] {
        &self.particles
    }

    pub fn links(&self) -> &[LinkHandle] {
        &self.links
    }

    pub fn gravity(&self) -> Option<ForceHandle> {
        self.gravity
    }

    /// The free end of the chain.
    pub fn tail(&self) -> Option<ParticleHandle> {
        self.particles.last().copied()
    }

    pub fn positions<F: Float>(&self, world: &World<F>) -> AllocVec<Vec3<F>> {
        self.particles
            .iter()
            .filter_map(|h| world.particle(*h).map(|p| p.position))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Remove the chain's particles, links and gravity generator from `world`.
    pub fn remove<F: Float>(self, world: &mut World<F>) {
        for h in self.particles {
            world.remove_particle(h);
        }
        if let Some(g) = self.gravity {
            world.remove_force(g);
        }
    }
}
