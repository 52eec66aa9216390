use crate::error::{Error, Result};

/// Lifecycle of a user-triggered action such as a login or a form submit.
///
/// Inside this crate every action runs to completion within one `&mut self`
/// call, so the borrow checker already rules out overlap and the state mainly
/// records how the last attempt ended. The `InFlight` check in
/// [`RequestState::begin`] matters to callers that drive the steps themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
    Done,
    Failed(String),
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight)
    }

    /// Marks the action as started. A second start while the first is still
    /// running is rejected.
    pub fn begin(&mut self, action: &'static str) -> Result<()> {
        if self.is_in_flight() {
            return Err(Error::RequestInFlight(action));
        }
        *self = RequestState::InFlight;
        Ok(())
    }

    pub fn finish<T, E: std::fmt::Display>(&mut self, outcome: &std::result::Result<T, E>) {
        *self = match outcome {
            Ok(_) => RequestState::Done,
            Err(e) => RequestState::Failed(e.to_string()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_begin_is_rejected_until_finished() {
        let mut state = RequestState::default();
        state.begin("submit").unwrap();
        assert!(matches!(state.begin("submit"), Err(Error::RequestInFlight("submit"))));

        state.finish::<(), _>(&Err("boom"));
        assert_eq!(state, RequestState::Failed("boom".into()));
        assert!(state.begin("submit").is_ok());
    }
}
