//! Microphone permission state

use std::fmt;

/// Outcome of the one-time microphone authorization request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PermissionState {
    /// Not requested yet
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub fn is_granted(&self) -> bool {
        *self == Self::Granted
    }
}

impl fmt::Display for PermissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unknown() {
        assert_eq!(PermissionState::default(), PermissionState::Unknown);
    }

    #[test]
    fn only_granted_is_granted() {
        assert!(PermissionState::Granted.is_granted());
        assert!(!PermissionState::Denied.is_granted());
        assert!(!PermissionState::Unknown.is_granted());
    }

    #[test]
    fn display() {
        assert_eq!(PermissionState::Denied.to_string(), "denied");
    }
}
