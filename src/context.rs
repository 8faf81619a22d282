//! Per-rendering-context synchronization state.
//!
//! A [`SyncContext`] owns the one [`ResourceStates`] tracker of a rendering
//! context, together with the context-wide barrier policy. It lives exactly as
//! long as the rendering context: create it after the device, drop it at
//! teardown.
//!
//! # Thread Safety
//!
//! `SyncContext` is `Send + Sync`. The tracker sits behind a mutex so recording
//! threads can reach it safely, but the mutex only protects memory. Barrier
//! order is still the order in which threads happened to take the lock, so
//! recording that depends on a specific order must be serialized by the caller.

use ash::vk;
use parking_lot::{Mutex, MutexGuard};

use crate::error::SyncError;
use crate::params::ContextParameters;
use crate::policy::{BarrierBehavior, BarrierPolicy};
use crate::recorder::BarrierRecorder;
use crate::state::{ImageAccess, ImageSubresource, TransitionMode};
use crate::tracker::ResourceStates;

/// Owner of a rendering context's resource tracker.
#[derive(Debug)]
pub struct SyncContext {
    name: String,
    tracker: Mutex<ResourceStates>,
}

static_assertions::assert_impl_all!(SyncContext: Send, Sync);

impl SyncContext {
    /// Create a context with an empty tracker.
    pub fn new(params: ContextParameters) -> Self {
        log::info!(
            "Creating sync context '{}' (automatic barriers: {})",
            params.name,
            params.barrier_policy.generates_by_default()
        );
        Self {
            name: params.name,
            tracker: Mutex::new(ResourceStates::with_policy(params.barrier_policy)),
        }
    }

    /// Create a context configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment holds an invalid setting.
    pub fn from_env() -> Result<Self, SyncError> {
        ContextParameters::from_env().map(Self::new)
    }

    /// The context name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lock and return the resource tracker.
    pub fn resource_tracker(&self) -> MutexGuard<'_, ResourceStates> {
        self.tracker.lock()
    }

    /// The context-wide barrier policy.
    pub fn barrier_policy(&self) -> BarrierPolicy {
        self.tracker.lock().policy()
    }

    /// Replace the context-wide barrier policy.
    pub fn set_barrier_policy(&self, policy: BarrierPolicy) {
        log::debug!(
            "Sync context '{}': automatic barriers {}",
            self.name,
            if policy.generates_by_default() {
                "enabled"
            } else {
                "disabled"
            }
        );
        self.tracker.lock().set_policy(policy);
    }

    /// Resolve a call site's barrier behavior against the context policy.
    pub fn should_generate_barriers_when(&self, behavior: BarrierBehavior) -> bool {
        self.barrier_policy().should_generate_barriers_when(behavior)
    }

    /// Declare the state an image must be in for the next command on `owner`.
    pub fn set_state(
        &self,
        owner: vk::CommandBuffer,
        image: vk::Image,
        access: ImageAccess,
        subresource: ImageSubresource,
    ) {
        self.tracker.lock().set_texture_state(
            owner,
            image,
            access,
            subresource,
            TransitionMode::IfChanged,
        );
    }

    /// Record every queued barrier into `command_buffer`.
    pub fn flush_barriers<R>(&self, recorder: &mut R, command_buffer: vk::CommandBuffer)
    where
        R: BarrierRecorder + ?Sized,
    {
        self.tracker.lock().flush_barriers(recorder, command_buffer);
    }

    /// Flush the barriers left at the end of a frame's recording.
    pub fn finish_frame<R>(&self, recorder: &mut R, command_buffer: vk::CommandBuffer)
    where
        R: BarrierRecorder + ?Sized,
    {
        log::trace!("Sync context '{}': finishing frame", self.name);
        self.flush_barriers(recorder, command_buffer);
    }
}

impl Drop for SyncContext {
    fn drop(&mut self) {
        let tracker = self.tracker.get_mut();
        let pending =
            tracker.pending_image_barriers().len() + tracker.pending_buffer_barriers().len();
        if pending > 0 {
            log::warn!(
                "Sync context '{}' dropped with {} unflushed barriers",
                self.name,
                pending
            );
        }
        log::info!(
            "Destroying sync context '{}' ({} tracked resources)",
            self.name,
            tracker.tracked_count()
        );
    }
}
