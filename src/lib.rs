//! Real-time particle physics for games.
//!
//! `tether` simulates point masses driven by accumulated forces, tied
//! together by rods and cables, with constraint violations resolved by an
//! iterative contact resolver. Designed to sit inside a fixed-timestep game
//! loop: the application feeds frame time in and reads particle positions out.
//!
//! # Features
//!
//! - **Particles**: position/velocity integration with damping and a per-step force accumulator
//! - **Force generators**: gravity, drag, springs and bungees, paired with particles through a registry
//! - **Links**: rigid rods and one-sided cables, to another particle or a fixed anchor
//! - **Contact resolver**: deepest-first, bounded iterations, velocity and position correction
//! - **Handles, not pointers**: generational handles catch use of removed particles
//! - **Observable**: Monitor physics steps via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments
//!
//! # Example
//! ```
//! use tether::{ForceKind, Link, LinkEnd, Particle, Vec3, World};
//!
//! let mut world: World<f32> = World::new();
//! let bob = world.add_particle(Particle::new(Vec3::new(0.0, -2.0, 0.0), 1.0));
//! let gravity = world.add_force(ForceKind::gravity(Vec3::new(0.0, -9.8, 0.0))).unwrap();
//! world.register_force(bob, gravity).unwrap();
//! world.add_link(Link::cable(bob, LinkEnd::Anchor(Vec3::zero()), 2.0, 0.3)).unwrap();
//!
//! for _ in 0..60 {
//!     world.step(1.0 / 60.0).unwrap();
//! }
//! let pos = world.particle(bob).unwrap().position;
//! assert!(pos.length() <= 2.0 + 1e-3);
//! ```

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod arena;
pub mod particle;
pub mod force;
pub mod registry;
pub mod link;
pub mod contact;
pub mod resolver;
pub mod world;
pub mod timestep;
pub mod chain;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use particle::{Particle, ParticleHandle, ParticleSet};
pub use force::ForceKind;
pub use registry::{ForceHandle, ForceRegistry, Registration};
pub use link::{Link, LinkEnd, LinkHandle, LinkKind};
pub use contact::{Contact, ContactMovement};
pub use resolver::{ContactResolver, ResolveReport};
pub use world::{StepReport, World};
pub use timestep::FixedTimestep;
pub use chain::{Chain, ChainConfig, ChainLinkKind};
pub use config::WorldConfig;
pub use observer::{StepObserver, NoOpStepObserver};
pub use error::PhysicsError;
