//! Synchronization state of tracked resources.
//!
//! A resource's state is the (stage, access[, layout]) scope of its most recent
//! recorded use plus the command buffer that recorded it. The tracker compares
//! these values to decide whether a barrier is needed.

use ash::vk;

/// How a command is about to use an image.
///
/// The presets cover the usages the engine records most often; anything else
/// can be spelled out as a struct literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageAccess {
    /// Pipeline stages that touch the image.
    pub stage: vk::PipelineStageFlags2,
    /// Memory accesses performed in those stages.
    pub access: vk::AccessFlags2,
    /// Layout the image must be in.
    pub layout: vk::ImageLayout,
}

impl ImageAccess {
    /// Written by a color attachment output.
    pub const COLOR_TARGET: Self = Self {
        stage: vk::PipelineStageFlags2::COLOR_ATTACHMENT_OUTPUT,
        access: vk::AccessFlags2::COLOR_ATTACHMENT_WRITE,
        layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
    };

    /// Written by early and late fragment tests.
    pub const DEPTH_STENCIL_TARGET: Self = Self {
        stage: vk::PipelineStageFlags2::from_raw(
            vk::PipelineStageFlags2::EARLY_FRAGMENT_TESTS.as_raw()
                | vk::PipelineStageFlags2::LATE_FRAGMENT_TESTS.as_raw(),
        ),
        access: vk::AccessFlags2::DEPTH_STENCIL_ATTACHMENT_WRITE,
        layout: vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL,
    };

    /// Written by a multisample resolve.
    pub const RESOLVE_TARGET: Self = Self {
        stage: vk::PipelineStageFlags2::RESOLVE,
        access: vk::AccessFlags2::TRANSFER_WRITE,
        layout: vk::ImageLayout::GENERAL,
    };

    /// Destination of a copy or blit.
    pub const TRANSFER_DST: Self = Self {
        stage: vk::PipelineStageFlags2::TRANSFER,
        access: vk::AccessFlags2::TRANSFER_WRITE,
        layout: vk::ImageLayout::TRANSFER_DST_OPTIMAL,
    };

    /// Source of a copy or blit.
    pub const TRANSFER_SRC: Self = Self {
        stage: vk::PipelineStageFlags2::TRANSFER,
        access: vk::AccessFlags2::TRANSFER_READ,
        layout: vk::ImageLayout::TRANSFER_SRC_OPTIMAL,
    };

    /// Sampled in a fragment shader.
    pub const SHADER_READ: Self = Self {
        stage: vk::PipelineStageFlags2::FRAGMENT_SHADER,
        access: vk::AccessFlags2::SHADER_READ,
        layout: vk::ImageLayout::SHADER_READ_ONLY_OPTIMAL,
    };

    /// Handed to the presentation engine.
    pub const PRESENT: Self = Self {
        stage: vk::PipelineStageFlags2::BOTTOM_OF_PIPE,
        access: vk::AccessFlags2::NONE,
        layout: vk::ImageLayout::PRESENT_SRC_KHR,
    };

    /// Create an access description.
    pub fn new(
        stage: vk::PipelineStageFlags2,
        access: vk::AccessFlags2,
        layout: vk::ImageLayout,
    ) -> Self {
        Self {
            stage,
            access,
            layout,
        }
    }
}

/// How a command is about to use a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferAccess {
    /// Pipeline stages that touch the buffer.
    pub stage: vk::PipelineStageFlags2,
    /// Memory accesses performed in those stages.
    pub access: vk::AccessFlags2,
}

impl BufferAccess {
    /// Destination of a copy.
    pub const TRANSFER_DST: Self = Self {
        stage: vk::PipelineStageFlags2::TRANSFER,
        access: vk::AccessFlags2::TRANSFER_WRITE,
    };

    /// Source of a copy.
    pub const TRANSFER_SRC: Self = Self {
        stage: vk::PipelineStageFlags2::TRANSFER,
        access: vk::AccessFlags2::TRANSFER_READ,
    };

    /// Read by vertex input.
    pub const VERTEX_READ: Self = Self {
        stage: vk::PipelineStageFlags2::VERTEX_INPUT,
        access: vk::AccessFlags2::VERTEX_ATTRIBUTE_READ,
    };

    /// Written as a storage buffer by a compute shader.
    pub const COMPUTE_WRITE: Self = Self {
        stage: vk::PipelineStageFlags2::COMPUTE_SHADER,
        access: vk::AccessFlags2::SHADER_WRITE,
    };

    /// Read as a storage or uniform buffer by a compute shader.
    pub const COMPUTE_READ: Self = Self {
        stage: vk::PipelineStageFlags2::COMPUTE_SHADER,
        access: vk::AccessFlags2::SHADER_READ,
    };

    /// Create an access description.
    pub fn new(stage: vk::PipelineStageFlags2, access: vk::AccessFlags2) -> Self {
        Self { stage, access }
    }
}

/// Last recorded state of an image.
///
/// Equality covers every field, owner included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureState {
    pub stage: vk::PipelineStageFlags2,
    pub access: vk::AccessFlags2,
    pub layout: vk::ImageLayout,
    /// Command buffer that recorded this state; null when idle.
    pub owner: vk::CommandBuffer,
}

impl Default for TextureState {
    /// The never-synchronized state.
    fn default() -> Self {
        Self {
            stage: vk::PipelineStageFlags2::empty(),
            access: vk::AccessFlags2::empty(),
            layout: vk::ImageLayout::UNDEFINED,
            owner: vk::CommandBuffer::null(),
        }
    }
}

impl TextureState {
    /// State recorded by `owner` for the given access.
    pub fn owned(owner: vk::CommandBuffer, access: ImageAccess) -> Self {
        Self {
            stage: access.stage,
            access: access.access,
            layout: access.layout,
            owner,
        }
    }

    /// State established outside the tracker, with no owner.
    pub fn external(access: ImageAccess) -> Self {
        Self::owned(vk::CommandBuffer::null(), access)
    }

    /// The (stage, access, layout) part of the state.
    pub fn image_access(&self) -> ImageAccess {
        ImageAccess::new(self.stage, self.access, self.layout)
    }

    /// Whether no command buffer owns this state.
    pub fn is_idle(&self) -> bool {
        self.owner == vk::CommandBuffer::null()
    }
}

/// Last recorded state of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferState {
    pub stage: vk::PipelineStageFlags2,
    pub access: vk::AccessFlags2,
    /// Command buffer that recorded this state; null when idle.
    pub owner: vk::CommandBuffer,
}

impl Default for BufferState {
    /// The never-synchronized state.
    fn default() -> Self {
        Self {
            stage: vk::PipelineStageFlags2::empty(),
            access: vk::AccessFlags2::empty(),
            owner: vk::CommandBuffer::null(),
        }
    }
}

impl BufferState {
    /// State recorded by `owner` for the given access.
    pub fn owned(owner: vk::CommandBuffer, access: BufferAccess) -> Self {
        Self {
            stage: access.stage,
            access: access.access,
            owner,
        }
    }

    /// State established outside the tracker, with no owner.
    pub fn external(access: BufferAccess) -> Self {
        Self::owned(vk::CommandBuffer::null(), access)
    }

    /// The (stage, access) part of the state.
    pub fn buffer_access(&self) -> BufferAccess {
        BufferAccess::new(self.stage, self.access)
    }

    /// Whether no command buffer owns this state.
    pub fn is_idle(&self) -> bool {
        self.owner == vk::CommandBuffer::null()
    }
}

/// Stored state of one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceState {
    Texture(TextureState),
    Buffer(BufferState),
}

impl ResourceState {
    /// The texture state, if this entry belongs to an image.
    pub fn as_texture(&self) -> Option<&TextureState> {
        match self {
            Self::Texture(state) => Some(state),
            Self::Buffer(_) => None,
        }
    }

    /// The buffer state, if this entry belongs to a buffer.
    pub fn as_buffer(&self) -> Option<&BufferState> {
        match self {
            Self::Buffer(state) => Some(state),
            Self::Texture(_) => None,
        }
    }

    /// Owner of the state regardless of kind.
    pub fn owner(&self) -> vk::CommandBuffer {
        match self {
            Self::Texture(state) => state.owner,
            Self::Buffer(state) => state.owner,
        }
    }
}

/// Part of an image affected by a transition.
///
/// Always covers every array layer. Mip levels default to the whole chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageSubresource {
    pub aspect: vk::ImageAspectFlags,
    pub base_mip_level: u32,
    pub level_count: u32,
}

impl ImageSubresource {
    /// All mips and layers of the given aspects.
    pub fn all(aspect: vk::ImageAspectFlags) -> Self {
        Self {
            aspect,
            base_mip_level: 0,
            level_count: vk::REMAINING_MIP_LEVELS,
        }
    }

    /// All mips and layers of a color image.
    pub fn color() -> Self {
        Self::all(vk::ImageAspectFlags::COLOR)
    }

    /// Restrict to `level_count` mips starting at `base_mip_level`.
    pub fn with_mips(mut self, base_mip_level: u32, level_count: u32) -> Self {
        self.base_mip_level = base_mip_level;
        self.level_count = level_count;
        self
    }

    /// Convert to a Vulkan subresource range.
    pub fn to_vk(self) -> vk::ImageSubresourceRange {
        vk::ImageSubresourceRange {
            aspect_mask: self.aspect,
            base_mip_level: self.base_mip_level,
            level_count: self.level_count,
            base_array_layer: 0,
            layer_count: vk::REMAINING_ARRAY_LAYERS,
        }
    }
}

/// Byte range of a buffer affected by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferRange {
    pub offset: vk::DeviceSize,
    pub size: vk::DeviceSize,
}

impl Default for BufferRange {
    fn default() -> Self {
        Self::WHOLE
    }
}

impl BufferRange {
    /// The entire buffer.
    pub const WHOLE: Self = Self {
        offset: 0,
        size: vk::WHOLE_SIZE,
    };

    /// `size` bytes starting at `offset`.
    pub fn new(offset: vk::DeviceSize, size: vk::DeviceSize) -> Self {
        Self { offset, size }
    }
}

/// Whether a transition to an unchanged state still records a barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransitionMode {
    /// Record a barrier only when the stored state differs.
    #[default]
    IfChanged,
    /// Always record a barrier.
    Always,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ash::vk::Handle;

    #[test]
    fn test_default_states_are_unsynchronized() {
        let texture = TextureState::default();
        assert!(texture.stage.is_empty());
        assert!(texture.access.is_empty());
        assert_eq!(texture.layout, vk::ImageLayout::UNDEFINED);
        assert!(texture.is_idle());

        let buffer = BufferState::default();
        assert!(buffer.stage.is_empty());
        assert!(buffer.is_idle());
    }

    #[test]
    fn test_owner_participates_in_equality() {
        let a = TextureState::owned(vk::CommandBuffer::from_raw(1), ImageAccess::SHADER_READ);
        let b = TextureState::owned(vk::CommandBuffer::from_raw(2), ImageAccess::SHADER_READ);
        assert_ne!(a, b);
        assert_eq!(a.image_access(), b.image_access());
    }

    #[test]
    fn test_depth_stencil_preset_covers_both_test_stages() {
        let stage = ImageAccess::DEPTH_STENCIL_TARGET.stage;
        assert!(stage.contains(vk::PipelineStageFlags2::EARLY_FRAGMENT_TESTS));
        assert!(stage.contains(vk::PipelineStageFlags2::LATE_FRAGMENT_TESTS));
    }

    #[test]
    fn test_subresource_defaults_to_all_mips() {
        let range = ImageSubresource::color().to_vk();
        assert_eq!(range.base_mip_level, 0);
        assert_eq!(range.level_count, vk::REMAINING_MIP_LEVELS);
        assert_eq!(range.layer_count, vk::REMAINING_ARRAY_LAYERS);

        let range = ImageSubresource::color().with_mips(3, 1).to_vk();
        assert_eq!(range.base_mip_level, 3);
        assert_eq!(range.level_count, 1);
    }

    #[test]
    fn test_resource_state_accessors() {
        let state = ResourceState::Buffer(BufferState::external(BufferAccess::VERTEX_READ));
        assert!(state.as_texture().is_none());
        assert_eq!(
            state.as_buffer().map(BufferState::buffer_access),
            Some(BufferAccess::VERTEX_READ)
        );
        assert_eq!(state.owner(), vk::CommandBuffer::null());
    }
}
