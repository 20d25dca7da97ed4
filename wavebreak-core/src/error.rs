use core::fmt;

/// Rejected control-surface calls on the simulation root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlError {
    /// `start_run` is only legal from the start screen.
    NotAtStart,
    /// `choose_upgrade` without a pending level-up.
    NoPendingLevelUp,
    /// `choose_upgrade` with an index outside the offered choices.
    InvalidUpgradeChoice { index: usize },
    /// `toggle_pause` outside of a running or paused game.
    NotPausable,
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAtStart => write!(f, "a run can only start from the start screen"),
            Self::NoPendingLevelUp => write!(f, "no level-up choice is pending"),
            Self::InvalidUpgradeChoice { index } => {
                write!(f, "upgrade choice {index} is out of range")
            }
            Self::NotPausable => write!(f, "game is not in a pausable state"),
        }
    }
}

impl std::error::Error for ControlError {}
