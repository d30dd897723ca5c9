use crate::config::EnforcementConfig;
use crate::models::Decision;
use std::fmt;

/// How the answer of the decision authority gates a request.
///
/// `AllowList` fails closed: only an explicit "Allow" lets a request through,
/// and an unreachable or misbehaving authority rejects it.
/// `DenyList` fails open: only an explicit "Deny" stops a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionPolicy {
    AllowList,
    DenyList,
}

impl DecisionPolicy {
    pub fn from_fail_open(fail_open: bool) -> Self {
        if fail_open {
            DecisionPolicy::DenyList
        } else {
            DecisionPolicy::AllowList
        }
    }

    /// Whether a request with the given decision may proceed
    pub fn permits(&self, decision: Option<&Decision>) -> bool {
        match self {
            DecisionPolicy::AllowList => matches!(decision, Some(Decision::Allow)),
            DecisionPolicy::DenyList => !matches!(decision, Some(Decision::Deny)),
        }
    }

    /// Whether a request may proceed when the authority could not be queried
    pub fn permits_on_error(&self) -> bool {
        matches!(self, DecisionPolicy::DenyList)
    }
}

impl From<&EnforcementConfig> for DecisionPolicy {
    fn from(config: &EnforcementConfig) -> Self {
        Self::from_fail_open(config.fail_open)
    }
}

impl fmt::Display for DecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecisionPolicy::AllowList => f.write_str("allow-list (fail-closed)"),
            DecisionPolicy::DenyList => f.write_str("deny-list (fail-open)"),
        }
    }
}
