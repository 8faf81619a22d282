//! Pending barrier batch.
//!
//! Barriers recorded by the tracker are kept here until the next flush, then
//! submitted together as a single `vkCmdPipelineBarrier2` call. Image and
//! buffer barriers live in separate lists, each in insertion order.

use ash::vk;

use crate::state::{BufferAccess, BufferRange, ImageAccess, ImageSubresource};

/// Information for a single image barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBarrierInfo {
    pub image: vk::Image,
    /// Scope and layout the image is leaving.
    pub src: ImageAccess,
    /// Scope and layout the image is entering.
    pub dst: ImageAccess,
    pub subresource: ImageSubresource,
}

impl ImageBarrierInfo {
    /// Whether the barrier changes the image layout.
    pub fn is_layout_transition(&self) -> bool {
        self.src.layout != self.dst.layout
    }

    /// Convert to a Vulkan barrier. Queue family ownership is never transferred.
    pub fn to_vk(&self) -> vk::ImageMemoryBarrier2<'static> {
        vk::ImageMemoryBarrier2::default()
            .src_stage_mask(self.src.stage)
            .src_access_mask(self.src.access)
            .dst_stage_mask(self.dst.stage)
            .dst_access_mask(self.dst.access)
            .old_layout(self.src.layout)
            .new_layout(self.dst.layout)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .image(self.image)
            .subresource_range(self.subresource.to_vk())
    }
}

/// Information for a single buffer barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferBarrierInfo {
    pub buffer: vk::Buffer,
    pub src: BufferAccess,
    pub dst: BufferAccess,
    pub range: BufferRange,
}

impl BufferBarrierInfo {
    /// Convert to a Vulkan barrier. Queue family ownership is never transferred.
    pub fn to_vk(&self) -> vk::BufferMemoryBarrier2<'static> {
        vk::BufferMemoryBarrier2::default()
            .src_stage_mask(self.src.stage)
            .src_access_mask(self.src.access)
            .dst_stage_mask(self.dst.stage)
            .dst_access_mask(self.dst.access)
            .src_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .dst_queue_family_index(vk::QUEUE_FAMILY_IGNORED)
            .buffer(self.buffer)
            .offset(self.range.offset)
            .size(self.range.size)
    }
}

/// A single synchronization command ready to be recorded.
///
/// Borrowed from a [`BarrierBatch`] for the duration of a flush.
#[derive(Debug, Clone, Copy)]
pub struct PendingDependency<'a> {
    pub flags: vk::DependencyFlags,
    pub image_barriers: &'a [ImageBarrierInfo],
    pub buffer_barriers: &'a [BufferBarrierInfo],
}

impl PendingDependency<'_> {
    /// Total number of barriers in the dependency.
    pub fn barrier_count(&self) -> usize {
        self.image_barriers.len() + self.buffer_barriers.len()
    }

    /// Vulkan image barriers, in insertion order.
    pub fn image_memory_barriers(&self) -> Vec<vk::ImageMemoryBarrier2<'static>> {
        self.image_barriers.iter().map(ImageBarrierInfo::to_vk).collect()
    }

    /// Vulkan buffer barriers, in insertion order.
    pub fn buffer_memory_barriers(&self) -> Vec<vk::BufferMemoryBarrier2<'static>> {
        self.buffer_barriers
            .iter()
            .map(BufferBarrierInfo::to_vk)
            .collect()
    }
}

/// Image and buffer barriers waiting for the next flush.
#[derive(Debug, Default)]
pub struct BarrierBatch {
    image_barriers: Vec<ImageBarrierInfo>,
    buffer_barriers: Vec<BufferBarrierInfo>,
}

impl BarrierBatch {
    /// Create a new empty barrier batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an image barrier.
    pub fn push_image(&mut self, barrier: ImageBarrierInfo) {
        self.image_barriers.push(barrier);
    }

    /// Append a buffer barrier.
    pub fn push_buffer(&mut self, barrier: BufferBarrierInfo) {
        self.buffer_barriers.push(barrier);
    }

    /// Pending image barriers in insertion order.
    pub fn image_barriers(&self) -> &[ImageBarrierInfo] {
        &self.image_barriers
    }

    /// Pending buffer barriers in insertion order.
    pub fn buffer_barriers(&self) -> &[BufferBarrierInfo] {
        &self.buffer_barriers
    }

    /// Check if the batch has any barriers.
    pub fn is_empty(&self) -> bool {
        self.image_barriers.is_empty() && self.buffer_barriers.is_empty()
    }

    /// Get the number of barriers in the batch.
    pub fn len(&self) -> usize {
        self.image_barriers.len() + self.buffer_barriers.len()
    }

    /// Describe the whole batch as one by-region dependency.
    ///
    /// Returns `None` if the batch is empty; an empty dependency is never
    /// recorded.
    pub fn dependency(&self) -> Option<PendingDependency<'_>> {
        if self.is_empty() {
            return None;
        }
        Some(PendingDependency {
            flags: vk::DependencyFlags::BY_REGION,
            image_barriers: &self.image_barriers,
            buffer_barriers: &self.buffer_barriers,
        })
    }

    /// Clear all barriers from the batch.
    pub fn clear(&mut self) {
        self.image_barriers.clear();
        self.buffer_barriers.clear();
    }
}
