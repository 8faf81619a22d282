//! Automatic barrier generation policy.
//!
//! Render-target shortcuts on the tracker consult a [`BarrierPolicy`] before
//! touching any state. Each call site passes a [`BarrierBehavior`]; the policy
//! resolves it against the context-wide default.

/// Per-call request for automatic barrier generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BarrierBehavior {
    /// Follow the context-wide setting.
    #[default]
    Default,
    /// Generate barriers even if the context disables them by default.
    GenerateBarriers,
    /// Skip barriers; the caller manages this pass by hand.
    SuppressBarriers,
}

/// Context-wide toggle for automatic barrier generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarrierPolicy {
    generate_by_default: bool,
}

impl Default for BarrierPolicy {
    fn default() -> Self {
        Self::automatic()
    }
}

impl BarrierPolicy {
    /// Generate barriers unless a call site suppresses them.
    pub fn automatic() -> Self {
        Self {
            generate_by_default: true,
        }
    }

    /// Generate barriers only where a call site asks for them.
    pub fn manual() -> Self {
        Self {
            generate_by_default: false,
        }
    }

    /// Whether `Default` call sites generate barriers.
    pub fn generates_by_default(&self) -> bool {
        self.generate_by_default
    }

    /// Resolve a call site's behavior to a yes/no decision.
    pub fn should_generate_barriers_when(&self, behavior: BarrierBehavior) -> bool {
        match behavior {
            BarrierBehavior::Default => self.generate_by_default,
            BarrierBehavior::GenerateBarriers => true,
            BarrierBehavior::SuppressBarriers => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::auto_default(BarrierPolicy::automatic(), BarrierBehavior::Default, true)]
    #[case::auto_generate(BarrierPolicy::automatic(), BarrierBehavior::GenerateBarriers, true)]
    #[case::auto_suppress(BarrierPolicy::automatic(), BarrierBehavior::SuppressBarriers, false)]
    #[case::manual_default(BarrierPolicy::manual(), BarrierBehavior::Default, false)]
    #[case::manual_generate(BarrierPolicy::manual(), BarrierBehavior::GenerateBarriers, true)]
    #[case::manual_suppress(BarrierPolicy::manual(), BarrierBehavior::SuppressBarriers, false)]
    fn test_policy_resolution(
        #[case] policy: BarrierPolicy,
        #[case] behavior: BarrierBehavior,
        #[case] expected: bool,
    ) {
        assert_eq!(policy.should_generate_barriers_when(behavior), expected);
    }

    #[test]
    fn test_default_policy_is_automatic() {
        assert!(BarrierPolicy::default().generates_by_default());
        assert_eq!(BarrierBehavior::default(), BarrierBehavior::Default);
    }
}
