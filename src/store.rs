//! Resource state storage.
//!
//! The store maps a resource's native handle to the last state the tracker
//! recorded for it. Entries are created on first use and persist until
//! overwritten or forgotten.

use std::collections::HashMap;

use crate::handle::ResourceId;
use crate::state::{BufferState, ResourceState, TextureState};

/// Last recorded state of every tracked resource.
#[derive(Debug, Default)]
pub struct StateStore {
    states: HashMap<ResourceId, ResourceState>,
}

impl StateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the stored state of a resource.
    pub fn get(&self, id: ResourceId) -> Option<&ResourceState> {
        self.states.get(&id)
    }

    /// Get the stored state of an image, if it is tracked as one.
    pub fn texture_state(&self, id: ResourceId) -> Option<TextureState> {
        self.get(id).and_then(ResourceState::as_texture).copied()
    }

    /// Get the stored state of a buffer, if it is tracked as one.
    pub fn buffer_state(&self, id: ResourceId) -> Option<BufferState> {
        self.get(id).and_then(ResourceState::as_buffer).copied()
    }

    /// Store `state` for an image and return the state it replaces.
    ///
    /// An untracked image replaces the never-synchronized state. An entry of the
    /// other kind is stale knowledge about a recycled handle and counts as
    /// never-synchronized too.
    pub fn replace_texture(&mut self, id: ResourceId, state: TextureState) -> TextureState {
        match self.states.insert(id, ResourceState::Texture(state)) {
            Some(ResourceState::Texture(previous)) => previous,
            Some(ResourceState::Buffer(_)) => {
                log::warn!(
                    "Resource {:#x} was tracked as a buffer, resetting it as an image",
                    id.raw()
                );
                TextureState::default()
            }
            None => TextureState::default(),
        }
    }

    /// Store `state` for a buffer and return the state it replaces.
    pub fn replace_buffer(&mut self, id: ResourceId, state: BufferState) -> BufferState {
        match self.states.insert(id, ResourceState::Buffer(state)) {
            Some(ResourceState::Buffer(previous)) => previous,
            Some(ResourceState::Texture(_)) => {
                log::warn!(
                    "Resource {:#x} was tracked as an image, resetting it as a buffer",
                    id.raw()
                );
                BufferState::default()
            }
            None => BufferState::default(),
        }
    }

    /// Overwrite the stored state of a resource.
    pub fn insert(&mut self, id: ResourceId, state: ResourceState) {
        self.states.insert(id, state);
    }

    /// Drop tracking for a resource (e.g., before its handle is recycled).
    pub fn remove(&mut self, id: ResourceId) -> Option<ResourceState> {
        self.states.remove(&id)
    }

    /// Forget every tracked resource.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Iterate over all tracked resources.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceId, &ResourceState)> {
        self.states.iter().map(|(id, state)| (*id, state))
    }

    /// Get the number of tracked resources.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if any resources are being tracked.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
