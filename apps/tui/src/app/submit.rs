use std::convert::TryFrom;
use std::fmt;

/// Lifecycle of one timeline entry submission.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubmitState {
    Idle,
    Submitting,
    Success,
    Error,
}

impl fmt::Display for SubmitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::Submitting => write!(f, "Submitting"),
            Self::Success => write!(f, "Success"),
            Self::Error => write!(f, "Error"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitEvent {
    Start,
    Saved(i64),
    Failed(String),
    Reset,
}

impl fmt::Display for SubmitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "Start"),
            Self::Saved(id) => write!(f, "Saved({id})"),
            Self::Failed(msg) => write!(f, "Failed({msg})"),
            Self::Reset => write!(f, "Reset"),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct StateTransitionError {
    from: SubmitState,
    event: SubmitEvent,
}

impl fmt::Display for StateTransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid transition from {} with event {}",
            self.from, self.event
        )
    }
}

impl std::error::Error for StateTransitionError {}

/// Guards the entry form against double submission.
#[derive(Debug)]
pub struct SubmitMachine {
    state: SubmitState,
}

impl Default for SubmitMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmitMachine {
    pub const fn new() -> Self {
        Self {
            state: SubmitState::Idle,
        }
    }

    pub const fn state(&self) -> SubmitState {
        self.state
    }

    pub const fn is_busy(&self) -> bool {
        matches!(self.state, SubmitState::Submitting)
    }

    pub fn process_event(&mut self, event: &SubmitEvent) -> Result<(), StateTransitionError> {
        let next_state = NextState::try_from((self.state, event))?;
        self.state = next_state.0;
        Ok(())
    }
}

struct NextState(SubmitState);

impl TryFrom<(SubmitState, &SubmitEvent)> for NextState {
    type Error = StateTransitionError;

    fn try_from(value: (SubmitState, &SubmitEvent)) -> Result<Self, Self::Error> {
        let (current_state, event) = value;

        match (current_state, event) {
            (SubmitState::Idle, SubmitEvent::Start) => Ok(Self(SubmitState::Submitting)),
            (SubmitState::Submitting, SubmitEvent::Saved(_)) => Ok(Self(SubmitState::Success)),
            (SubmitState::Submitting, SubmitEvent::Failed(_)) => Ok(Self(SubmitState::Error)),
            (SubmitState::Success | SubmitState::Error, SubmitEvent::Reset) => {
                Ok(Self(SubmitState::Idle))
            }
            _ => Err(StateTransitionError {
                from: current_state,
                event: event.clone(),
            }),
        }
    }
}
