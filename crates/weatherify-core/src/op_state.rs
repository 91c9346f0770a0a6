//! In-flight guard for user-triggered backend operations (generate/logout).
//!
//! Ensures only one such operation runs at a time.

/// Operation state for serializing generate and logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpState {
    #[default]
    Idle,
    BusyGenerate,
    BusyLogout,
}

impl OpState {
    /// True if a playlist generation can be started.
    pub fn can_start_generate(self) -> bool {
        matches!(self, OpState::Idle)
    }

    /// True if a logout can be started.
    pub fn can_start_logout(self) -> bool {
        matches!(self, OpState::Idle)
    }

    pub fn is_busy(self) -> bool {
        !matches!(self, OpState::Idle)
    }

    /// State after processing GenerateDone.
    pub fn on_generate_done(self) -> Self {
        match self {
            OpState::BusyGenerate => OpState::Idle,
            other => other,
        }
    }

    /// State after processing LogoutDone.
    pub fn on_logout_done(self) -> Self {
        match self {
            OpState::BusyLogout => OpState::Idle,
            other => other,
        }
    }
}
