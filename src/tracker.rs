//! Resource state tracking and barrier generation.
//!
//! [`ResourceStates`] remembers the last synchronization state recorded for
//! every image and buffer it has seen. Before a command uses a resource, the
//! caller declares the state the command needs; the tracker compares it with
//! the stored one and queues a barrier only when something changes. Queued
//! barriers are submitted together by [`ResourceStates::flush_barriers`].
//!
//! # Example
//!
//! ```ignore
//! let mut states = ResourceStates::new();
//! let mut recorder = VulkanRecorder::new(device, vk::API_VERSION_1_3)?;
//!
//! // Undefined -> TransferDst
//! states.set_texture_state(
//!     cmd,
//!     image,
//!     ImageAccess::TRANSFER_DST,
//!     ImageSubresource::color(),
//!     TransitionMode::IfChanged,
//! );
//! states.flush_barriers(&mut recorder, cmd);
//! // ... copy into the image ...
//!
//! // TransferDst -> ShaderReadOnly
//! states.set_texture_state(
//!     cmd,
//!     image,
//!     ImageAccess::SHADER_READ,
//!     ImageSubresource::color(),
//!     TransitionMode::IfChanged,
//! );
//! states.flush_barriers(&mut recorder, cmd);
//! ```
//!
//! # Ownership
//!
//! The command buffer passed to a transition becomes the owner of the new state
//! and takes part in the comparison: the same state requested from another
//! command buffer is treated as a change and gets its own barrier.
//!
//! # Threading
//!
//! The tracker does no locking. Callers recording on several threads must
//! serialize access themselves (see [`SyncContext`](crate::SyncContext)).

use ash::vk;

use crate::batch::{BarrierBatch, BufferBarrierInfo, ImageBarrierInfo};
use crate::handle::ResourceId;
use crate::policy::{BarrierBehavior, BarrierPolicy};
use crate::profiling::{profile_plot, profile_scope};
use crate::recorder::BarrierRecorder;
use crate::state::{
    BufferAccess, BufferRange, BufferState, ImageAccess, ImageSubresource, ResourceState,
    TextureState, TransitionMode,
};
use crate::store::StateStore;

/// Tracks resource states and batches the barriers between them.
#[derive(Debug, Default)]
pub struct ResourceStates {
    store: StateStore,
    batch: BarrierBatch,
    policy: BarrierPolicy,
}

static_assertions::assert_impl_all!(ResourceStates: Send, Sync);

impl ResourceStates {
    /// Create a tracker that generates render-target barriers by default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with the given render-target barrier policy.
    pub fn with_policy(policy: BarrierPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// The policy consulted by the render-target shortcuts.
    pub fn policy(&self) -> BarrierPolicy {
        self.policy
    }

    /// Replace the render-target barrier policy.
    pub fn set_policy(&mut self, policy: BarrierPolicy) {
        self.policy = policy;
    }

    // ------------------------------------------------------------------------
    // External state
    // ------------------------------------------------------------------------

    /// Record an image state established outside the tracker.
    ///
    /// No barrier is generated and the state has no owner. Used for images whose
    /// layout another system changes, such as swapchain images on acquire.
    pub fn set_external_texture_state(&mut self, image: vk::Image, access: ImageAccess) {
        self.store.insert(
            ResourceId::from(image),
            ResourceState::Texture(TextureState::external(access)),
        );
    }

    /// Record a buffer state established outside the tracker.
    pub fn set_external_buffer_state(&mut self, buffer: vk::Buffer, access: BufferAccess) {
        self.store.insert(
            ResourceId::from(buffer),
            ResourceState::Buffer(BufferState::external(access)),
        );
    }

    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Declare the state `image` must be in for the next command on `owner`.
    ///
    /// Queues an image barrier from the stored state unless the stored state
    /// (owner included) already matches and `mode` is
    /// [`TransitionMode::IfChanged`]. An image seen for the first time starts
    /// from the never-synchronized state with a null owner, so its first
    /// transition produces a barrier for any non-null owner.
    pub fn set_texture_state(
        &mut self,
        owner: vk::CommandBuffer,
        image: vk::Image,
        access: ImageAccess,
        subresource: ImageSubresource,
        mode: TransitionMode,
    ) {
        let id = ResourceId::from(image);
        let requested = TextureState::owned(owner, access);
        let previous = self.store.replace_texture(id, requested);
        if mode == TransitionMode::IfChanged && previous == requested {
            return;
        }

        let src = previous.image_access();

        log::trace!(
            "Image {:#x}: {:?} -> {:?}",
            id.raw(),
            src.layout,
            access.layout
        );
        self.batch.push_image(ImageBarrierInfo {
            image,
            src,
            dst: access,
            subresource,
        });
    }

    /// Declare the state `buffer` must be in for the next command on `owner`.
    ///
    /// Same rules as [`set_texture_state`](Self::set_texture_state), restricted
    /// to `range`.
    pub fn set_buffer_state(
        &mut self,
        owner: vk::CommandBuffer,
        buffer: vk::Buffer,
        access: BufferAccess,
        range: BufferRange,
        mode: TransitionMode,
    ) {
        let id = ResourceId::from(buffer);
        let requested = BufferState::owned(owner, access);
        let previous = self.store.replace_buffer(id, requested);
        if mode == TransitionMode::IfChanged && previous == requested {
            return;
        }

        let src = previous.buffer_access();

        log::trace!(
            "Buffer {:#x}: {:?} -> {:?}",
            id.raw(),
            src.access,
            access.access
        );
        self.batch.push_buffer(BufferBarrierInfo {
            buffer,
            src,
            dst: access,
            range,
        });
    }

    // ------------------------------------------------------------------------
    // Render target shortcuts
    // ------------------------------------------------------------------------

    /// Prepare `image` to be written as a color attachment.
    ///
    /// Does nothing if the policy resolves `behavior` to "no barriers".
    pub fn set_color_target(
        &mut self,
        owner: vk::CommandBuffer,
        image: vk::Image,
        behavior: BarrierBehavior,
    ) {
        self.set_target_state(
            owner,
            image,
            ImageAccess::COLOR_TARGET,
            vk::ImageAspectFlags::COLOR,
            behavior,
        );
    }

    /// Prepare `image` to be written as a depth/stencil attachment.
    pub fn set_depth_stencil_target(
        &mut self,
        owner: vk::CommandBuffer,
        image: vk::Image,
        aspect: vk::ImageAspectFlags,
        behavior: BarrierBehavior,
    ) {
        self.set_target_state(
            owner,
            image,
            ImageAccess::DEPTH_STENCIL_TARGET,
            aspect,
            behavior,
        );
    }

    /// Prepare `image` to receive a multisample resolve.
    pub fn set_resolve_target(
        &mut self,
        owner: vk::CommandBuffer,
        image: vk::Image,
        aspect: vk::ImageAspectFlags,
        behavior: BarrierBehavior,
    ) {
        self.set_target_state(
            owner,
            image,
            ImageAccess::RESOLVE_TARGET,
            aspect,
            behavior,
        );
    }

    fn set_target_state(
        &mut self,
        owner: vk::CommandBuffer,
        image: vk::Image,
        access: ImageAccess,
        aspect: vk::ImageAspectFlags,
        behavior: BarrierBehavior,
    ) {
        if !self.policy.should_generate_barriers_when(behavior) {
            return;
        }
        self.set_texture_state(
            owner,
            image,
            access,
            ImageSubresource::all(aspect),
            TransitionMode::IfChanged,
        );
    }

    // ------------------------------------------------------------------------
    // Flush
    // ------------------------------------------------------------------------

    /// Record every queued barrier as one synchronization command.
    ///
    /// Does nothing if no barriers are queued. The queue is always empty
    /// afterwards.
    pub fn flush_barriers<R>(&mut self, recorder: &mut R, command_buffer: vk::CommandBuffer)
    where
        R: BarrierRecorder + ?Sized,
    {
        let Some(dependency) = self.batch.dependency() else {
            return;
        };

        profile_scope!("flush_barriers");
        profile_plot!("Barriers: flushed", dependency.barrier_count());
        log::debug!(
            "Flushing {} image and {} buffer barriers",
            dependency.image_barriers.len(),
            dependency.buffer_barriers.len()
        );

        recorder.record_dependency(command_buffer, &dependency);
        self.batch.clear();
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Last recorded state of an image.
    pub fn texture_state(&self, image: vk::Image) -> Option<TextureState> {
        self.store.texture_state(ResourceId::from(image))
    }

    /// Last recorded state of a buffer.
    pub fn buffer_state(&self, buffer: vk::Buffer) -> Option<BufferState> {
        self.store.buffer_state(ResourceId::from(buffer))
    }

    /// Drop what the tracker knows about an image.
    ///
    /// Call this before a destroyed image's handle value can be reused,
    /// otherwise the new image inherits the old one's state.
    pub fn forget_image(&mut self, image: vk::Image) -> bool {
        self.store.remove(ResourceId::from(image)).is_some()
    }

    /// Drop what the tracker knows about a buffer.
    pub fn forget_buffer(&mut self, buffer: vk::Buffer) -> bool {
        self.store.remove(ResourceId::from(buffer)).is_some()
    }

    /// Number of resources with a recorded state.
    pub fn tracked_count(&self) -> usize {
        self.store.len()
    }

    /// The underlying state store.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Image barriers waiting for the next flush.
    pub fn pending_image_barriers(&self) -> &[ImageBarrierInfo] {
        self.batch.image_barriers()
    }

    /// Buffer barriers waiting for the next flush.
    pub fn pending_buffer_barriers(&self) -> &[BufferBarrierInfo] {
        self.batch.buffer_barriers()
    }

    /// Whether a flush would record anything.
    pub fn has_pending_barriers(&self) -> bool {
        !self.batch.is_empty()
    }
}
