/// What the host UI must do after a routing hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeAction {
    /// First hand-off of the session: dismiss the splash screen and resume.
    DismissSplash,
    /// Already resumed earlier in the session; nothing to dismiss.
    AlreadyResumed,
}

/// Session-scoped resume state. Starts needing resume at cold start and
/// flips exactly once on the first successful hand-off; the flag never goes
/// back. Owned by the scene coordinator and passed into router entry points
/// instead of living in process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    needs_resume: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { needs_resume: true }
    }
}

impl SessionState {
    pub fn needs_resume(&self) -> bool {
        self.needs_resume
    }

    pub fn resume(&mut self) -> ResumeAction {
        if self.needs_resume {
            self.needs_resume = false;
            return ResumeAction::DismissSplash;
        }
        ResumeAction::AlreadyResumed
    }
}

#[cfg(test)]
mod tests {
    use super::{ResumeAction, SessionState};

    #[test]
    fn cold_start_needs_resume() {
        let state = SessionState::default();
        assert!(state.needs_resume());
    }

    #[test]
    fn resume_dismisses_splash_exactly_once() {
        let mut state = SessionState::default();
        assert_eq!(state.resume(), ResumeAction::DismissSplash);
        assert_eq!(state.resume(), ResumeAction::AlreadyResumed);
        assert_eq!(state.resume(), ResumeAction::AlreadyResumed);
        assert!(!state.needs_resume());
    }
}
