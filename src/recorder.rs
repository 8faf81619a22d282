//! Command recording backends for barrier flushes.
//!
//! The tracker never talks to a device directly. A flush hands the pending
//! dependency to a [`BarrierRecorder`], which writes it into a command buffer.
//!
//! # Available Recorders
//!
//! - [`VulkanRecorder`]: records `vkCmdPipelineBarrier2` through `ash`
//! - [`DummyRecorder`]: keeps recorded dependencies in memory, for testing

use ash::vk;

use crate::batch::{BufferBarrierInfo, ImageBarrierInfo, PendingDependency};
use crate::error::SyncError;

/// Minimum Vulkan version providing `vkCmdPipelineBarrier2` in core.
pub const REQUIRED_API_VERSION: u32 = vk::API_VERSION_1_3;

/// Destination for flushed barriers.
pub trait BarrierRecorder {
    /// Record one synchronization command covering every barrier in `dependency`.
    fn record_dependency(
        &mut self,
        command_buffer: vk::CommandBuffer,
        dependency: &PendingDependency<'_>,
    );
}

/// Records barriers into real command buffers.
pub struct VulkanRecorder {
    device: ash::Device,
}

impl std::fmt::Debug for VulkanRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VulkanRecorder")
            .field("device", &self.device.handle())
            .finish()
    }
}

impl VulkanRecorder {
    /// Create a recorder for `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_version` (the version the device was created
    /// with) predates Vulkan 1.3.
    pub fn new(device: ash::Device, api_version: u32) -> Result<Self, SyncError> {
        if !supports_synchronization2(api_version) {
            return Err(SyncError::FeatureNotSupported(format!(
                "vkCmdPipelineBarrier2 requires Vulkan 1.3, device uses {}.{}",
                vk::api_version_major(api_version),
                vk::api_version_minor(api_version)
            )));
        }
        Ok(Self { device })
    }

    /// The wrapped device.
    pub fn device(&self) -> &ash::Device {
        &self.device
    }
}

impl BarrierRecorder for VulkanRecorder {
    fn record_dependency(
        &mut self,
        command_buffer: vk::CommandBuffer,
        dependency: &PendingDependency<'_>,
    ) {
        let image_barriers = dependency.image_memory_barriers();
        let buffer_barriers = dependency.buffer_memory_barriers();
        let info = vk::DependencyInfo::default()
            .dependency_flags(dependency.flags)
            .image_memory_barriers(&image_barriers)
            .buffer_memory_barriers(&buffer_barriers);

        // SAFETY: the caller guarantees `command_buffer` was allocated from this
        // device and is in the recording state.
        unsafe {
            self.device.cmd_pipeline_barrier2(command_buffer, &info);
        }
    }
}

/// Check whether a device API version has synchronization2 in core.
pub fn supports_synchronization2(api_version: u32) -> bool {
    let major = vk::api_version_major(api_version);
    let minor = vk::api_version_minor(api_version);
    (major, minor) >= (1, 3)
}

/// A dependency captured by [`DummyRecorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDependency {
    pub command_buffer: vk::CommandBuffer,
    pub flags: vk::DependencyFlags,
    pub image_barriers: Vec<ImageBarrierInfo>,
    pub buffer_barriers: Vec<BufferBarrierInfo>,
}

impl RecordedDependency {
    /// Total number of barriers in the command.
    pub fn barrier_count(&self) -> usize {
        self.image_barriers.len() + self.buffer_barriers.len()
    }
}

/// No-op recorder that remembers every dependency it was given.
#[derive(Debug, Default)]
pub struct DummyRecorder {
    recorded: Vec<RecordedDependency>,
}

impl DummyRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far, in submission order.
    pub fn recorded(&self) -> &[RecordedDependency] {
        &self.recorded
    }

    /// Number of synchronization commands recorded.
    pub fn command_count(&self) -> usize {
        self.recorded.len()
    }

    /// Total number of barriers across all commands.
    pub fn barrier_count(&self) -> usize {
        self.recorded.iter().map(RecordedDependency::barrier_count).sum()
    }

    /// Take the recorded dependencies, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<RecordedDependency> {
        std::mem::take(&mut self.recorded)
    }
}

impl BarrierRecorder for DummyRecorder {
    fn record_dependency(
        &mut self,
        command_buffer: vk::CommandBuffer,
        dependency: &PendingDependency<'_>,
    ) {
        self.recorded.push(RecordedDependency {
            command_buffer,
            flags: dependency.flags,
            image_barriers: dependency.image_barriers.to_vec(),
            buffer_barriers: dependency.buffer_barriers.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BufferAccess, BufferRange};
    use ash::vk::Handle;

    #[test]
    fn test_supports_synchronization2() {
        assert!(supports_synchronization2(vk::API_VERSION_1_3));
        assert!(supports_synchronization2(vk::make_api_version(0, 1, 4, 0)));
        assert!(!supports_synchronization2(vk::API_VERSION_1_2));
        assert!(!supports_synchronization2(vk::API_VERSION_1_0));
        assert!(supports_synchronization2(REQUIRED_API_VERSION));
    }

    #[test]
    fn test_dummy_recorder_captures_dependency() {
        let barriers = [BufferBarrierInfo {
            buffer: vk::Buffer::from_raw(3),
            src: BufferAccess::TRANSFER_DST,
            dst: BufferAccess::COMPUTE_READ,
            range: BufferRange::WHOLE,
        }];
        let dependency = PendingDependency {
            flags: vk::DependencyFlags::BY_REGION,
            image_barriers: &[],
            buffer_barriers: &barriers,
        };

        let mut recorder = DummyRecorder::new();
        let cmd = vk::CommandBuffer::from_raw(0x10);
        recorder.record_dependency(cmd, &dependency);

        assert_eq!(recorder.command_count(), 1);
        assert_eq!(recorder.barrier_count(), 1);
        assert_eq!(recorder.recorded()[0].command_buffer, cmd);
        assert_eq!(recorder.recorded()[0].buffer_barriers, barriers.to_vec());

        let taken = recorder.take();
        assert_eq!(taken.len(), 1);
        assert_eq!(recorder.command_count(), 0);
    }
}
