//! Common utilities for tracker integration tests.
//!
//! Resources and command buffers are fake handles: the tracker only looks at
//! their raw values, so no device is needed.

use redlilium_sync::ash::vk::{self, Handle};
use redlilium_sync::{
    BufferAccess, BufferRange, ImageAccess, ImageSubresource, ResourceStates, TransitionMode,
};

/// Install a test logger once per test binary.
#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// ============================================================================
// Fake Handles
// ============================================================================

/// Hands out distinct fake Vulkan handles.
#[derive(Debug)]
pub struct Handles {
    next: u64,
}

impl Default for Handles {
    fn default() -> Self {
        Self { next: 0x1000 }
    }
}

#[allow(dead_code)]
impl Handles {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_raw(&mut self) -> u64 {
        self.next += 0x10;
        self.next
    }

    pub fn image(&mut self) -> vk::Image {
        vk::Image::from_raw(self.next_raw())
    }

    pub fn buffer(&mut self) -> vk::Buffer {
        vk::Buffer::from_raw(self.next_raw())
    }

    pub fn command_buffer(&mut self) -> vk::CommandBuffer {
        vk::CommandBuffer::from_raw(self.next_raw())
    }
}

// ============================================================================
// Resource Kinds
// ============================================================================

/// Which half of the tracker a test exercises.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Buffer,
}

#[allow(dead_code)]
impl ResourceKind {
    /// Request a transfer-write state on a fresh or existing resource.
    ///
    /// `raw` is the resource handle value.
    pub fn request(
        self,
        states: &mut ResourceStates,
        owner: vk::CommandBuffer,
        raw: u64,
        mode: TransitionMode,
    ) {
        match self {
            Self::Image => states.set_texture_state(
                owner,
                vk::Image::from_raw(raw),
                ImageAccess::TRANSFER_DST,
                ImageSubresource::color(),
                mode,
            ),
            Self::Buffer => states.set_buffer_state(
                owner,
                vk::Buffer::from_raw(raw),
                BufferAccess::TRANSFER_DST,
                BufferRange::WHOLE,
                mode,
            ),
        }
    }

    /// Number of pending barriers of this kind.
    pub fn pending(self, states: &ResourceStates) -> usize {
        match self {
            Self::Image => states.pending_image_barriers().len(),
            Self::Buffer => states.pending_buffer_barriers().len(),
        }
    }
}
