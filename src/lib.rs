//! # RedLilium Sync
//!
//! Resource state tracking and barrier batching for the Vulkan backend.
//!
//! ## Overview
//!
//! Vulkan leaves every cross-stage dependency on an image or buffer to the
//! application. This crate remembers the last synchronization state recorded
//! for each resource and turns "this command needs the resource in state X"
//! into the minimal set of pipeline barriers:
//!
//! - [`ResourceStates`] - State store and transition engine
//! - [`BarrierBatch`] - Barriers pending until the next flush
//! - [`BarrierRecorder`] - Where flushed barriers go ([`VulkanRecorder`], [`DummyRecorder`])
//! - [`SyncContext`] - One tracker per rendering context, plus its barrier policy
//!
//! ## Example
//!
//! ```ignore
//! use redlilium_sync::{ContextParameters, ImageAccess, ImageSubresource, SyncContext};
//!
//! let context = SyncContext::new(ContextParameters::new());
//! let mut recorder = VulkanRecorder::new(device, vk::API_VERSION_1_3)?;
//!
//! context.set_state(cmd, image, ImageAccess::TRANSFER_DST, ImageSubresource::color());
//! context.flush_barriers(&mut recorder, cmd);
//! ```

pub mod batch;
pub mod context;
pub mod error;
pub mod handle;
pub mod params;
pub mod policy;
pub mod profiling;
pub mod recorder;
pub mod state;
pub mod store;
pub mod tracker;

// Re-export main types for convenience
pub use batch::{BarrierBatch, BufferBarrierInfo, ImageBarrierInfo, PendingDependency};
pub use context::SyncContext;
pub use error::SyncError;
pub use handle::ResourceId;
pub use params::{BARRIERS_ENV_VAR, ContextParameters};
pub use policy::{BarrierBehavior, BarrierPolicy};
pub use recorder::{BarrierRecorder, DummyRecorder, RecordedDependency, VulkanRecorder};
pub use state::{
    BufferAccess, BufferRange, BufferState, ImageAccess, ImageSubresource, ResourceState,
    TextureState, TransitionMode,
};
pub use store::StateStore;
pub use tracker::ResourceStates;

/// Re-exported so callers name the same Vulkan types as the tracker.
pub use ash;

/// Sync library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version.
///
/// Call once during renderer start-up.
pub fn init() {
    log::info!("RedLilium Sync v{} initialized", VERSION);
}
