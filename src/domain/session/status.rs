//! Recording session state machine

use std::fmt;
use thiserror::Error;

/// Recording status shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordingStatus {
    #[default]
    Idle,
    Recording,
    Stopped,
}

impl RecordingStatus {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for RecordingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while in {current_state} state")]
pub struct InvalidStateTransition {
    pub current_state: RecordingStatus,
    pub action: String,
}

/// Recording session entity.
/// Tracks the status of the single recording a session may own.
///
/// State machine:
///   IDLE -> RECORDING (begin)
///   STOPPED -> RECORDING (begin)
///   RECORDING -> STOPPED (finish)
///
/// STOPPED is only a resting point: a new recording can begin right away.
#[derive(Debug, Default)]
pub struct RecordingSession {
    status: RecordingStatus,
}

impl RecordingSession {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            status: RecordingStatus::Idle,
        }
    }

    /// Get the current status
    pub fn status(&self) -> RecordingStatus {
        self.status
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.status == RecordingStatus::Recording
    }

    /// Check that a new recording may begin, without transitioning
    pub fn can_begin(&self) -> Result<(), InvalidStateTransition> {
        if self.status == RecordingStatus::Recording {
            return Err(InvalidStateTransition {
                current_state: self.status,
                action: "start recording".to_string(),
            });
        }
        Ok(())
    }

    /// Transition from IDLE or STOPPED to RECORDING
    pub fn begin(&mut self) -> Result<(), InvalidStateTransition> {
        self.can_begin()?;
        self.status = RecordingStatus::Recording;
        Ok(())
    }

    /// Transition from RECORDING to STOPPED.
    ///
    /// Used for both successful and failed stops: a capture that was
    /// interrupted cannot be resumed.
    pub fn finish(&mut self) -> Result<(), InvalidStateTransition> {
        if self.status != RecordingStatus::Recording {
            return Err(InvalidStateTransition {
                current_state: self.status,
                action: "stop recording".to_string(),
            });
        }
        self.status = RecordingStatus::Stopped;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_idle() {
        let session = RecordingSession::new();
        assert_eq!(session.status(), RecordingStatus::Idle);
        assert!(!session.is_recording());
    }

    #[test]
    fn begin_from_idle() {
        let mut session = RecordingSession::new();
        assert!(session.begin().is_ok());
        assert!(session.is_recording());
    }

    #[test]
    fn begin_from_recording_fails() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();

        let err = session.begin().unwrap_err();
        assert_eq!(err.current_state, RecordingStatus::Recording);
        assert!(err.action.contains("start recording"));
    }

    #[test]
    fn can_begin_does_not_transition() {
        let session = RecordingSession::new();
        assert!(session.can_begin().is_ok());
        assert_eq!(session.status(), RecordingStatus::Idle);
    }

    #[test]
    fn finish_from_idle_fails() {
        let mut session = RecordingSession::new();

        let err = session.finish().unwrap_err();
        assert_eq!(err.current_state, RecordingStatus::Idle);
    }

    #[test]
    fn finish_from_stopped_fails() {
        let mut session = RecordingSession::new();
        session.begin().unwrap();
        session.finish().unwrap();

        let err = session.finish().unwrap_err();
        assert_eq!(err.current_state, RecordingStatus::Stopped);
    }

    #[test]
    fn full_cycle() {
        let mut session = RecordingSession::new();
        assert_eq!(session.status(), RecordingStatus::Idle);

        session.begin().unwrap();
        assert_eq!(session.status(), RecordingStatus::Recording);

        session.finish().unwrap();
        assert_eq!(session.status(), RecordingStatus::Stopped);

        // Stopped is immediately eligible for another cycle
        session.begin().unwrap();
        assert_eq!(session.status(), RecordingStatus::Recording);
    }

    #[test]
    fn status_display() {
        assert_eq!(RecordingStatus::Idle.to_string(), "idle");
        assert_eq!(RecordingStatus::Recording.to_string(), "recording");
        assert_eq!(RecordingStatus::Stopped.to_string(), "stopped");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: RecordingStatus::Recording,
            action: "start recording".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("start recording"));
        assert!(msg.contains("recording state"));
    }
}
