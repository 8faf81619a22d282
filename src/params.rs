//! Synchronization context configuration.

use std::env::VarError;

use crate::error::SyncError;
use crate::policy::BarrierPolicy;

/// Environment variable selecting the default barrier policy.
///
/// Accepts `auto` or `manual` (case-insensitive).
pub const BARRIERS_ENV_VAR: &str = "REDLILIUM_BARRIERS";

/// Parameters for creating a [`SyncContext`](crate::SyncContext).
///
/// # Example
///
/// ```ignore
/// let params = ContextParameters::new()
///     .with_name("main")
///     .with_barrier_generation(false);
/// let context = SyncContext::new(params);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextParameters {
    /// Name used in log messages.
    pub name: String,
    /// Whether render-target shortcuts generate barriers by default.
    pub barrier_policy: BarrierPolicy,
}

impl Default for ContextParameters {
    fn default() -> Self {
        Self {
            name: "main".to_string(),
            barrier_policy: BarrierPolicy::automatic(),
        }
    }
}

impl ContextParameters {
    /// Create parameters with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read parameters from the environment.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if [`BARRIERS_ENV_VAR`] holds an unknown value.
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_barriers_var(std::env::var(BARRIERS_ENV_VAR))
    }

    /// Build parameters from the result of looking up [`BARRIERS_ENV_VAR`].
    fn from_barriers_var(lookup: Result<String, VarError>) -> Result<Self, SyncError> {
        let mut params = Self::default();
        match lookup {
            Ok(value) => params.barrier_policy = parse_barrier_mode(&value)?,
            Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(_)) => {
                return Err(SyncError::InvalidParameter(format!(
                    "{BARRIERS_ENV_VAR} is not valid unicode"
                )));
            }
        }
        Ok(params)
    }

    /// Set the context name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable render-target barriers by default.
    pub fn with_barrier_generation(mut self, enabled: bool) -> Self {
        self.barrier_policy = if enabled {
            BarrierPolicy::automatic()
        } else {
            BarrierPolicy::manual()
        };
        self
    }

    /// Set the barrier policy.
    pub fn with_barrier_policy(mut self, policy: BarrierPolicy) -> Self {
        self.barrier_policy = policy;
        self
    }
}

/// Parse a barrier mode name (`auto` or `manual`).
///
/// # Errors
///
/// Returns an error for any other value.
pub fn parse_barrier_mode(value: &str) -> Result<BarrierPolicy, SyncError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "auto" => Ok(BarrierPolicy::automatic()),
        "manual" => Ok(BarrierPolicy::manual()),
        other => Err(SyncError::InvalidParameter(format!(
            "unknown barrier mode '{other}', expected 'auto' or 'manual'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let params = ContextParameters::new();
        assert_eq!(params.name, "main");
        assert!(params.barrier_policy.generates_by_default());
    }

    #[test]
    fn test_builder() {
        let params = ContextParameters::new()
            .with_name("shadow")
            .with_barrier_generation(false);
        assert_eq!(params.name, "shadow");
        assert_eq!(params.barrier_policy, BarrierPolicy::manual());

        let params = params.with_barrier_policy(BarrierPolicy::automatic());
        assert!(params.barrier_policy.generates_by_default());
    }

    #[rstest]
    #[case("auto", true)]
    #[case("AUTO", true)]
    #[case(" manual ", false)]
    #[case("Manual", false)]
    fn test_parse_barrier_mode(#[case] value: &str, #[case] generates: bool) {
        let policy = parse_barrier_mode(value).unwrap();
        assert_eq!(policy.generates_by_default(), generates);
    }

    #[test]
    fn test_barriers_var_unset_keeps_defaults() {
        let params = ContextParameters::from_barriers_var(Err(VarError::NotPresent)).unwrap();
        assert_eq!(params, ContextParameters::new());
    }

    #[test]
    fn test_barriers_var_selects_policy() {
        let params = ContextParameters::from_barriers_var(Ok("manual".to_string())).unwrap();
        assert_eq!(params.barrier_policy, BarrierPolicy::manual());
        assert_eq!(params.name, "main");

        let err = ContextParameters::from_barriers_var(Ok("never".to_string())).unwrap_err();
        assert!(matches!(err, SyncError::InvalidParameter(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_barriers_var_rejects_non_unicode() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let raw = OsString::from_vec(vec![0x6d, 0xff, 0x6e]);
        let err =
            ContextParameters::from_barriers_var(Err(VarError::NotUnicode(raw))).unwrap_err();
        assert!(err.to_string().contains(BARRIERS_ENV_VAR));
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        let expected = ContextParameters::from_barriers_var(std::env::var(BARRIERS_ENV_VAR));
        assert_eq!(ContextParameters::from_env().ok(), expected.ok());
    }

    #[test]
    fn test_parse_barrier_mode_rejects_unknown() {
        let err = parse_barrier_mode("sometimes").unwrap_err();
        assert!(matches!(err, SyncError::InvalidParameter(_)));
    }
}
