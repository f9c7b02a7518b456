//! Step observer trait for monitoring physics simulation progress.

use crate::contact::Contact;
use crate::float::Float;
use crate::world::StepReport;

/// Trait for observing physics simulation steps.
///
/// Implement this trait to monitor a [`crate::World`] step (e.g., for
/// debugging, visualization, or performance profiling). All methods have
/// default no-op implementations. Hooks fire in step order.
pub trait StepObserver<F: Float> {
    /// Called after every registered force generator has run.
    fn on_forces_applied(&mut self) {}

    /// Called after all particles have been integrated.
    fn on_integrate(&mut self) {}

    /// Called once links have reported their contacts for this step.
    fn on_contacts_generated(&mut self, _count: usize) {}

    /// Called after each resolver iteration with the contact it resolved.
    fn on_contact_resolved(&mut self, _iteration: usize, _contact: &Contact<F>) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self, _report: &StepReport<F>) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl<F: Float> StepObserver<F> for NoOpStepObserver {}
