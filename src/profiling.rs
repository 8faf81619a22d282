//! Profiling support via Tracy.
//!
//! Instrumentation is enabled with the `profiling` Cargo feature:
//!
//! ```bash
//! cargo test --features profiling
//! ```
//!
//! When the feature is disabled all macros expand to nothing. When it is
//! enabled but no Tracy `Client` has been started, they do nothing either:
//! the application decides when to call `Client::start()`.
//!
//! ```ignore
//! use redlilium_sync::profiling::{profile_plot, profile_scope};
//!
//! fn flush() {
//!     profile_scope!("flush_barriers");
//!     profile_plot!("Barriers: flushed", 12);
//! }
//! ```

#[cfg(feature = "profiling")]
pub use tracy_client::{self, Client};

/// Create a profiling span that lasts until the end of the enclosing scope.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::Client::running().map(|client| {
            client.span($crate::profiling::tracy_client::span_location!($name), 0)
        });
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Plot a value over time in Tracy.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        if let Some(client) = $crate::profiling::Client::running() {
            client.plot(
                $crate::profiling::tracy_client::plot_name!($name),
                $value as f64,
            );
        }
    };
}

/// Plot a value (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_plot {
    ($name:expr, $value:expr) => {
        let _ = $value;
    };
}

pub use profile_plot;
pub use profile_scope;

#[cfg(test)]
mod tests {
    #[test]
    fn test_macros_compile() {
        profile_scope!("test_scope");
        profile_plot!("test_value", 42);
    }

    #[cfg(feature = "profiling")]
    #[test]
    fn test_flush_without_running_client() {
        use crate::recorder::DummyRecorder;
        use crate::state::{ImageAccess, ImageSubresource, TransitionMode};
        use crate::tracker::ResourceStates;
        use ash::vk::{self, Handle};

        assert!(super::Client::running().is_none());

        let mut states = ResourceStates::new();
        let mut recorder = DummyRecorder::new();
        let cmd = vk::CommandBuffer::from_raw(1);
        states.set_texture_state(
            cmd,
            vk::Image::from_raw(10),
            ImageAccess::TRANSFER_DST,
            ImageSubresource::color(),
            TransitionMode::IfChanged,
        );
        states.flush_barriers(&mut recorder, cmd);

        assert_eq!(recorder.command_count(), 1);
        assert!(!states.has_pending_barriers());
    }
}
