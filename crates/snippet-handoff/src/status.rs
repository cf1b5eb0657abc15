//! Session lifecycle status.

/// Lifecycle of a handoff session.
///
/// `initializing -> awaiting-peer -> connected -> transferring -> completed`,
/// with `failed` reachable from any non-terminal state. `Completed` and
/// `Failed` are terminal: no further transition occurs and the session must
/// be discarded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HandoffStatus {
    Initializing,
    AwaitingPeer,
    Connected,
    Transferring,
    Completed,
    /// Terminal failure with a human-readable reason.
    Failed { reason: String },
}

impl HandoffStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, HandoffStatus::Completed | HandoffStatus::Failed { .. })
    }
}

impl std::fmt::Display for HandoffStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandoffStatus::Initializing => write!(f, "initializing"),
            HandoffStatus::AwaitingPeer => write!(f, "awaiting-peer"),
            HandoffStatus::Connected => write!(f, "connected"),
            HandoffStatus::Transferring => write!(f, "transferring"),
            HandoffStatus::Completed => write!(f, "completed"),
            HandoffStatus::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}
