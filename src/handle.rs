//! Resource identity for the state store.

use ash::vk;
use ash::vk::Handle;

/// Key of a tracked image or buffer.
///
/// Built from the raw native handle bits, so the same Vulkan object always
/// maps to the same id. Images and buffers share one key space; distinct live
/// objects never share a handle value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl From<vk::Image> for ResourceId {
    fn from(image: vk::Image) -> Self {
        Self(image.as_raw())
    }
}

impl From<vk::Buffer> for ResourceId {
    fn from(buffer: vk::Buffer) -> Self {
        Self(buffer.as_raw())
    }
}

impl ResourceId {
    /// Create a resource ID from a raw Vulkan handle.
    pub fn from_raw(handle: u64) -> Self {
        Self(handle)
    }

    /// Get the raw handle value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}
